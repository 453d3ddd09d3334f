// src/config.rs
use std::path::Path;

use serde::Deserialize;

use crate::extractors::header::SplitPattern;
use crate::extractors::matching::MatchMode;
use crate::utils::AppError;

/// How records are pulled out of a located section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractMode {
    /// Header is the first section row; columns resolved with the full
    /// fuzzy strategy chain.
    Named,
    /// Header is hunted by exact keyword majority; columns resolved by
    /// exact match only.
    Precise,
}

/// Everything needed to locate and extract one target section.
#[derive(Debug, Clone, Deserialize)]
pub struct SectionSpec {
    /// Title of the output sheet this section's records land on.
    pub sheet_title: String,
    pub start_keyword: String,
    pub end_keywords: Vec<String>,
    pub match_mode: MatchMode,
    pub mode: ExtractMode,
    /// Semantic column keywords, in output order.
    pub columns: Vec<String>,
    /// Column whose value may be split across two grid cells (share fraction).
    #[serde(default)]
    pub share_column: Option<String>,
    /// Repair secured amounts wrapped onto the following grid row.
    #[serde(default)]
    pub reunify_amounts: bool,
    /// Drop records from the first reference/remarks marker onward.
    #[serde(default)]
    pub trim_notes: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SectionSet {
    pub share: SectionSpec,
    pub rights: SectionSpec,
    pub liens: SectionSpec,
}

/// Keyword dictionaries and tuning knobs for one registry template family.
///
/// The defaults cover the standard 등기사항 요약 export; other templates can
/// be supported by supplying a JSON file with the same shape, without
/// touching the extraction algorithms.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Marker row announcing the registry unique number.
    pub id_marker: String,
    /// Prefixes identifying the property-description row ("[토지]", "[건물]").
    pub id_prefixes: Vec<String>,
    /// Rows scanned below the marker for the property description.
    pub id_scan_rows: usize,
    pub unknown_id: String,
    pub no_record: String,
    /// Name of the document-identifier column prepended to every record.
    pub id_column: String,
    pub merge_gap: usize,
    pub resolve_distance: usize,
    /// Precise mode: rows scanned for a header and exact matches required.
    pub header_scan_rows: usize,
    pub header_match_threshold: usize,
    pub registrant_column: String,
    pub id_number_column: String,
    pub principal_column: String,
    /// Token marking a secured amount inside the principal-entry value.
    pub amount_marker: String,
    /// Tokens whose appearance truncates the remainder of a record list.
    pub note_markers: Vec<String>,
    pub split_patterns: Vec<SplitPattern>,
    pub sections: SectionSet,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            id_marker: "고유번호".to_string(),
            id_prefixes: vec!["[토지]".to_string(), "[건물]".to_string()],
            id_scan_rows: 10,
            unknown_id: "알수없음".to_string(),
            no_record: "기록없음".to_string(),
            id_column: "파일명".to_string(),
            merge_gap: crate::extractors::matching::DEFAULT_MERGE_GAP,
            resolve_distance: crate::extractors::resolve::DEFAULT_RESOLVE_DISTANCE,
            header_scan_rows: 15,
            header_match_threshold: 3,
            registrant_column: "등기명의인".to_string(),
            id_number_column: "(주민)등록번호".to_string(),
            principal_column: "주요등기사항".to_string(),
            amount_marker: "채권최고액".to_string(),
            note_markers: vec![
                "참고사항".to_string(),
                "참고".to_string(),
                "비고".to_string(),
            ],
            split_patterns: vec![
                SplitPattern::new("주소", &["주", "소"]),
                SplitPattern::new("등기명의인", &["등기", "명의인"]),
                SplitPattern::new("주민등록번호", &["주민", "등록번호"]),
                SplitPattern::new("최종지분", &["최종", "지분"]),
                SplitPattern::new("순위번호", &["순위", "번호"]),
                SplitPattern::new("주요등기사항", &["주요", "등기사항"]),
            ],
            sections: SectionSet {
                share: SectionSpec {
                    sheet_title: "1. 소유지분현황 (갑구)".to_string(),
                    start_keyword: "소유지분현황".to_string(),
                    end_keywords: vec!["소유권".to_string(), "저당권".to_string()],
                    match_mode: MatchMode::Partial,
                    mode: ExtractMode::Named,
                    columns: vec![
                        "등기명의인".to_string(),
                        "(주민)등록번호".to_string(),
                        "최종지분".to_string(),
                        "주소".to_string(),
                        "순위번호".to_string(),
                    ],
                    share_column: Some("최종지분".to_string()),
                    reunify_amounts: false,
                    trim_notes: false,
                },
                rights: SectionSpec {
                    sheet_title: "2. 소유권사항 (갑구)".to_string(),
                    start_keyword: "소유권.*사항".to_string(),
                    end_keywords: vec!["저당권".to_string()],
                    match_mode: MatchMode::Exact,
                    mode: ExtractMode::Precise,
                    columns: event_columns(),
                    share_column: None,
                    reunify_amounts: false,
                    trim_notes: false,
                },
                liens: SectionSpec {
                    sheet_title: "3. 저당권사항 (을구)".to_string(),
                    start_keyword: "3.(근)저당권및전세권등(을구)".to_string(),
                    end_keywords: vec![
                        "참고".to_string(),
                        "비고".to_string(),
                        "총계".to_string(),
                        "전산자료".to_string(),
                    ],
                    match_mode: MatchMode::Exact,
                    mode: ExtractMode::Precise,
                    columns: event_columns(),
                    share_column: None,
                    reunify_amounts: true,
                    trim_notes: true,
                },
            },
        }
    }
}

fn event_columns() -> Vec<String> {
    vec![
        "순위번호".to_string(),
        "등기목적".to_string(),
        "접수정보".to_string(),
        "주요등기사항".to_string(),
        "대상소유자".to_string(),
    ]
}

/// Loads the keyword configuration: built-in template defaults, or a JSON
/// override file when one is given.
pub fn load_config(path: Option<&Path>) -> Result<ExtractionConfig, AppError> {
    let Some(path) = path else {
        return Ok(ExtractionConfig::default());
    };
    let text = std::fs::read_to_string(path)?;
    let config: ExtractionConfig = serde_json::from_str(&text)
        .map_err(|e| AppError::Config(format!("{}: {}", path.display(), e)))?;
    tracing::info!("Loaded keyword configuration from {}", path.display());
    Ok(config)
}
