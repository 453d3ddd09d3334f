// src/extractors/header.rs
use serde::Deserialize;

use super::grid::Row;
use super::matching::merge_adjacent_cells;

/// Fragment indices located for one pattern must be ascending and pairwise
/// within this gap before they are collapsed into the canonical label.
const SPLIT_GAP: usize = 3;

/// A known way one canonical column label gets split across header cells,
/// e.g. "등기명의인" rendered as "등기" + "명의인".
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SplitPattern {
    pub label: String,
    pub fragments: Vec<String>,
}

impl SplitPattern {
    pub fn new(label: &str, fragments: &[&str]) -> Self {
        Self {
            label: label.to_string(),
            fragments: fragments.iter().map(|f| f.to_string()).collect(),
        }
    }
}

/// Reconstructs canonical column labels on a designated header row.
///
/// Stage 1 coalesces generic thin-line fragments; stage 2 applies the fixed
/// dictionary of known split patterns to whatever stage 1 left behind.
pub fn reconcile_header(row: &Row, patterns: &[SplitPattern], merge_gap: usize) -> Row {
    let merged = merge_adjacent_cells(row, merge_gap);
    apply_split_patterns(&merged, patterns)
}

/// Dictionary stage: for each pattern, locate every fragment by exact trimmed
/// match against the current cell values. When all fragments are found at
/// ascending indices pairwise within the gap, the first index is overwritten
/// with the canonical label and the rest are blanked. Patterns apply
/// independently; a blanked cell no longer matches any later fragment.
pub fn apply_split_patterns(row: &Row, patterns: &[SplitPattern]) -> Row {
    let mut out = row.clone();

    'patterns: for pattern in patterns {
        let mut found: Vec<usize> = Vec::with_capacity(pattern.fragments.len());
        for fragment in &pattern.fragments {
            let hit = out
                .iter()
                .find(|(idx, cell)| !found.contains(idx) && cell.trim() == fragment)
                .map(|(idx, _)| idx);
            match hit {
                Some(idx) => found.push(idx),
                None => continue 'patterns,
            }
        }

        let contiguous = found
            .windows(2)
            .all(|pair| pair[1] > pair[0] && pair[1] - pair[0] <= SPLIT_GAP);
        if !contiguous {
            continue;
        }

        out.set(found[0], pattern.label.clone());
        for idx in &found[1..] {
            out.set(*idx, "");
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractors::matching::DEFAULT_MERGE_GAP;

    fn patterns() -> Vec<SplitPattern> {
        vec![
            SplitPattern::new("주소", &["주", "소"]),
            SplitPattern::new("순위번호", &["순위", "번호"]),
            SplitPattern::new("최종지분", &["최종", "지분"]),
        ]
    }

    #[test]
    fn dictionary_collapses_split_label() {
        let row = Row::from_cells(["순위", "번호", "", "등기목적"]);
        let fixed = apply_split_patterns(&row, &patterns());
        assert_eq!(fixed.get(0), "순위번호");
        assert_eq!(fixed.get(1), "");
        assert_eq!(fixed.get(3), "등기목적");
    }

    #[test]
    fn dictionary_requires_fragments_within_gap() {
        let mut row = Row::new();
        row.set(0, "순위");
        row.set(5, "번호"); // 5 apart, too far to be one label
        let fixed = apply_split_patterns(&row, &patterns());
        assert_eq!(fixed.get(0), "순위");
        assert_eq!(fixed.get(5), "번호");
    }

    #[test]
    fn blanked_fragments_are_not_reconsumed() {
        // "주"+"소" consumes index 1; the 최종지분 pattern must not see it.
        let row = Row::from_cells(["주", "소", "최종", "지분"]);
        let fixed = apply_split_patterns(&row, &patterns());
        assert_eq!(fixed.get(0), "주소");
        assert_eq!(fixed.get(1), "");
        assert_eq!(fixed.get(2), "최종지분");
        assert_eq!(fixed.get(3), "");
    }

    #[test]
    fn reconcile_merges_then_applies_dictionary() {
        let mut row = Row::new();
        row.set(1, "등기");
        row.set(2, "명의인");
        row.set(8, "최종");
        row.set(9, "지분");
        let header = reconcile_header(&row, &patterns(), DEFAULT_MERGE_GAP);
        // generic merge already coalesced each pair into its left index
        assert_eq!(header.get(1), "등기 명의인");
        assert_eq!(header.get(8), "최종 지분");
        assert_eq!(header.get(2), "");
        assert_eq!(header.get(9), "");
    }
}
