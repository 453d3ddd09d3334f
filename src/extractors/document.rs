// src/extractors/document.rs
use crate::config::{ExtractionConfig, SectionSpec};
use crate::utils::error::ExtractError;

use super::grid::Grid;
use super::records::{extract_records, no_record_sentinel, Record};
use super::section::locate_section;

/// One document's contribution to the three consolidated tables. Every
/// section holds at least one record (a placeholder when nothing was found),
/// so each input document stays visible in every output table.
#[derive(Debug, Clone)]
pub struct DocumentRecords {
    pub share: Vec<Record>,
    pub rights: Vec<Record>,
    pub liens: Vec<Record>,
}

impl DocumentRecords {
    pub fn row_counts(&self) -> (usize, usize, usize) {
        (self.share.len(), self.rights.len(), self.liens.len())
    }
}

/// Extracts the property identifier: the first row mentioning the unique
/// number marker is located, then the following rows are scanned for one
/// whose joined text starts with a property-description prefix.
pub fn extract_identifier(grid: &Grid, config: &ExtractionConfig) -> String {
    for (i, row) in grid.rows().iter().enumerate() {
        if !row.joined(" ").contains(&config.id_marker) {
            continue;
        }
        let limit = (i + 1 + config.id_scan_rows).min(grid.len());
        for candidate in &grid.rows()[i + 1..limit] {
            let content = candidate.joined(" ").trim().to_string();
            if config
                .id_prefixes
                .iter()
                .any(|prefix| content.starts_with(prefix.as_str()))
            {
                return content;
            }
        }
        break;
    }
    config.unknown_id.clone()
}

/// Runs the full extraction pass over one document grid: identifier, then
/// locate + extract for each of the three target sections, the identifier
/// prepended to every record. Recoverable oddities degrade to placeholder
/// records; only a structurally unusable grid is an error, which the caller
/// converts into a skipped document.
pub fn process_document(
    grid: &Grid,
    config: &ExtractionConfig,
) -> Result<DocumentRecords, ExtractError> {
    if grid.is_empty() {
        return Err(ExtractError::EmptyGrid);
    }

    let identifier = extract_identifier(grid, config);
    tracing::debug!("Document identifier: {}", identifier);

    Ok(DocumentRecords {
        share: extract_section(grid, &config.sections.share, config, &identifier),
        rights: extract_section(grid, &config.sections.rights, config, &identifier),
        liens: extract_section(grid, &config.sections.liens, config, &identifier),
    })
}

fn extract_section(
    grid: &Grid,
    spec: &SectionSpec,
    config: &ExtractionConfig,
    identifier: &str,
) -> Vec<Record> {
    let section = locate_section(
        grid,
        &spec.start_keyword,
        &spec.end_keywords,
        spec.match_mode,
        &config.no_record,
    );

    let mut records = if section.found {
        extract_records(&section, spec, config)
    } else {
        Vec::new()
    };
    if records.is_empty() {
        records.push(no_record_sentinel(&spec.columns, &config.no_record));
    }

    for record in &mut records {
        record.shift_insert(0, config.id_column.clone(), identifier.to_string());
    }
    records
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ExtractionConfig {
        ExtractionConfig::default()
    }

    fn sample_grid() -> Grid {
        Grid::from_cells(vec![
            vec!["등기부등본 주요 정보 요약", "", "고유번호 1146-1996-100994"],
            vec!["[토지] 서울특별시 강남구 역삼동 123-4"],
            vec![""],
            vec!["1. 소유지분현황 (갑구)"],
            vec![
                "등기명의인", "", "", "", "(주민)등록번호", "", "", "", "최종지분", "", "", "",
                "주소", "", "", "", "순위번호",
            ],
            vec![
                "홍길동 123456-1234567", "", "", "", "", "", "", "", "2분의 1", "", "", "",
                "서울특별시 강남구", "", "", "", "1",
            ],
            vec!["3. (근)저당권 및 전세권 등 ( 을구 )"],
            vec![
                "순위번호", "", "", "", "등기목적", "", "", "", "접수정보", "", "", "",
                "주요등기사항", "", "", "", "대상소유자",
            ],
            vec![
                "1", "", "", "", "근저당권설정", "", "", "", "2021년1월5일 제99호", "", "", "",
                "채권최고액 금120,000,000원", "", "", "", "홍길동",
            ],
            vec!["전산자료"],
        ])
    }

    #[test]
    fn identifier_comes_from_property_description_row() {
        let grid = sample_grid();
        assert_eq!(
            extract_identifier(&grid, &config()),
            "[토지] 서울특별시 강남구 역삼동 123-4"
        );
    }

    #[test]
    fn identifier_defaults_to_unknown() {
        let grid = Grid::from_cells(vec![vec!["아무 표식 없음"]]);
        assert_eq!(extract_identifier(&grid, &config()), "알수없음");

        // marker present but no property row within reach
        let grid = Grid::from_cells(vec![vec!["고유번호 123"], vec!["다른 내용"]]);
        assert_eq!(extract_identifier(&grid, &config()), "알수없음");
    }

    #[test]
    fn full_document_pass_prepends_identifier_everywhere() {
        let cfg = config();
        let result = process_document(&sample_grid(), &cfg).unwrap();

        assert_eq!(result.share.len(), 1);
        let share = &result.share[0];
        assert_eq!(
            share.get_index(0).map(|(k, _)| k.as_str()),
            Some("파일명")
        );
        assert_eq!(share["파일명"], "[토지] 서울특별시 강남구 역삼동 123-4");
        // the embedded registry id migrated out of the name column
        assert_eq!(share["등기명의인"], "홍길동");
        assert_eq!(share["(주민)등록번호"], "123456-1234567");

        // the rights-section marker is absent from this export
        assert_eq!(result.rights.len(), 1);
        assert_eq!(result.rights[0]["순위번호"], "기록없음");
        assert_eq!(result.rights[0]["파일명"], "[토지] 서울특별시 강남구 역삼동 123-4");

        assert_eq!(result.liens.len(), 1);
        assert_eq!(result.liens[0]["등기목적"], "근저당권설정");
        assert_eq!(result.liens[0]["주요등기사항"], "채권최고액 금120,000,000원");
    }

    #[test]
    fn document_without_sections_yields_three_placeholders() {
        let grid = Grid::from_cells(vec![vec!["빈 문서"]]);
        let cfg = config();
        let result = process_document(&grid, &cfg).unwrap();
        assert_eq!(result.row_counts(), (1, 1, 1));
        assert_eq!(result.share[0]["등기명의인"], "기록없음");
        assert_eq!(result.share[0]["파일명"], "알수없음");
        assert_eq!(result.liens[0]["순위번호"], "기록없음");
    }

    #[test]
    fn empty_grid_is_an_error_for_the_caller_to_absorb() {
        let grid = Grid::new(Vec::new());
        assert!(process_document(&grid, &config()).is_err());
    }
}
