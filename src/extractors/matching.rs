// src/extractors/matching.rs
use serde::Deserialize;

use super::grid::{is_blank, Row};

/// Default maximum index gap when grouping thin-line cell fragments.
pub const DEFAULT_MERGE_GAP: usize = 3;

/// Keyword text with all whitespace removed. Registry exports pad labels with
/// arbitrary spaces, so every comparison happens on the stripped form.
pub fn normalize(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

/// True iff the cell equals the keyword, ignoring all whitespace.
/// Blank cells never match.
pub fn match_exact(cell: &str, keyword: &str) -> bool {
    !is_blank(cell) && normalize(cell) == normalize(keyword)
}

/// True iff the whitespace-stripped keyword occurs inside the
/// whitespace-stripped cell text. Blank cells never match.
pub fn match_partial(cell: &str, keyword: &str) -> bool {
    !is_blank(cell) && normalize(cell).contains(&normalize(keyword))
}

/// Per-section choice of marker matching strategy. Loosely-worded section
/// titles need partial matching; precise multi-word titles need exact
/// matching to avoid hitting an unrelated token elsewhere in the sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    Exact,
    Partial,
}

impl MatchMode {
    pub fn matches(self, cell: &str, keyword: &str) -> bool {
        match self {
            MatchMode::Exact => match_exact(cell, keyword),
            MatchMode::Partial => match_partial(cell, keyword),
        }
    }
}

/// Collapses runs of near-adjacent non-blank cells into their leftmost index.
///
/// Thin gridlines split one logical cell into several grid cells; any two
/// non-blank cells whose indices differ by at most `max_gap` are treated as
/// fragments of the same logical cell. Fragments are joined with a single
/// space unless the accumulated text already ends with space, `-` or `/`.
/// Applying the merge twice changes nothing.
pub fn merge_adjacent_cells(row: &Row, max_gap: usize) -> Row {
    let mut merged = row.clone();
    let indices = row.non_blank_indices();

    let mut runs: Vec<Vec<usize>> = Vec::new();
    for idx in indices {
        match runs.last_mut() {
            Some(run) if idx - run[run.len() - 1] <= max_gap => run.push(idx),
            _ => runs.push(vec![idx]),
        }
    }

    for run in runs.iter().filter(|run| run.len() > 1) {
        let mut value = String::new();
        for idx in run {
            let fragment = row.get(*idx).trim();
            if fragment.is_empty() {
                continue;
            }
            if !value.is_empty() && !value.ends_with([' ', '-', '/']) {
                value.push(' ');
            }
            value.push_str(fragment);
        }
        merged.set(run[0], value);
        for idx in &run[1..] {
            merged.set(*idx, "");
        }
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_match_ignores_whitespace() {
        assert!(match_exact(" 순위 번호 ", "순위번호"));
        assert!(match_exact("3. (근)저당권 및 전세권 등 ( 을구 )", "3.(근)저당권및전세권등(을구)"));
        assert!(!match_exact("순위번호외", "순위번호"));
        assert!(!match_exact("   ", "순위번호"));
    }

    #[test]
    fn partial_match_is_substring_on_stripped_text() {
        assert!(match_partial("1. 소유지분현황 (갑구)", "소유지분현황"));
        assert!(!match_partial("소유지분", "소유지분현황"));
        assert!(!match_partial("", "소유권"));
    }

    #[test]
    fn merge_groups_cells_within_gap() {
        let row = Row::from_cells(["등기", "명의인", "", "", "", "주소"]);
        let merged = merge_adjacent_cells(&row, DEFAULT_MERGE_GAP);
        assert_eq!(merged.get(0), "등기 명의인");
        assert_eq!(merged.get(1), "");
        // index 5 is 4 positions past index 1, beyond the gap
        assert_eq!(merged.get(5), "주소");
    }

    #[test]
    fn merge_skips_separator_before_dash_or_slash() {
        let row = Row::from_cells(["금", "-", "500"]);
        let merged = merge_adjacent_cells(&row, DEFAULT_MERGE_GAP);
        assert_eq!(merged.get(0), "금 -500");
    }

    #[test]
    fn merge_leaves_single_cells_untouched() {
        let row = Row::from_cells(["순위번호", "", "", "", "등기목적"]);
        let merged = merge_adjacent_cells(&row, DEFAULT_MERGE_GAP);
        assert_eq!(&merged, &row);
    }

    #[test]
    fn merge_is_idempotent() {
        let row = Row::from_cells(["주", "소", "", "", "", "", "최종", "지분"]);
        let once = merge_adjacent_cells(&row, DEFAULT_MERGE_GAP);
        let twice = merge_adjacent_cells(&once, DEFAULT_MERGE_GAP);
        assert_eq!(once, twice);
    }
}
