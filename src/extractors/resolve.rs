// src/extractors/resolve.rs
use indexmap::IndexMap;

use super::grid::{is_blank, Row};
use super::matching::{match_exact, match_partial, normalize};

/// Default lookahead when chasing keyword fragments across header cells.
pub const DEFAULT_RESOLVE_DISTANCE: usize = 2;

/// Where a requested column lives in the header row. Most columns resolve to
/// a single index; a value split across exactly two near-adjacent cells
/// (e.g. a share fraction under "최종"+"지분" fragments) resolves to a pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnRef {
    Single(usize),
    Pair(usize, usize),
}

/// Requested semantic keyword -> resolved column position. Unresolved
/// keywords are simply absent; downstream extraction renders them as empty
/// strings rather than aborting the document.
pub type ColumnMap = IndexMap<String, ColumnRef>;

/// Resolves each keyword against a reconciled header row.
///
/// Strategies are tried in priority order, first success wins:
/// 1. plain partial match over the header cells;
/// 2. adjacency-aware fragment match within `max_distance` positions.
pub fn resolve_columns(header: &Row, keywords: &[String], max_distance: usize) -> ColumnMap {
    let mut columns = ColumnMap::new();
    for keyword in keywords {
        let resolved = scan_partial(header, keyword)
            .map(ColumnRef::Single)
            .or_else(|| adjacent_fragment_match(header, keyword, max_distance));
        match resolved {
            Some(column) => {
                columns.insert(keyword.clone(), column);
            }
            None => tracing::debug!("Column keyword '{}' not resolved in header", keyword),
        }
    }
    columns
}

/// Exact-match-only resolution, used where headers must be unambiguous.
pub fn resolve_columns_exact(header: &Row, keywords: &[String]) -> ColumnMap {
    let mut columns = ColumnMap::new();
    for keyword in keywords {
        let hit = header
            .iter()
            .find(|(_, cell)| match_exact(cell, keyword))
            .map(|(idx, _)| idx);
        if let Some(idx) = hit {
            columns.insert(keyword.clone(), ColumnRef::Single(idx));
        }
    }
    columns
}

fn scan_partial(header: &Row, keyword: &str) -> Option<usize> {
    header
        .iter()
        .find(|(_, cell)| match_partial(cell, keyword))
        .map(|(idx, _)| idx)
}

/// Chases a keyword split across neighboring cells: a cell holding a leading
/// chunk of the keyword starts the match, and each following chunk must
/// appear within `max_distance` positions ahead. Single characters are the
/// degenerate chunk size. A match consumed from exactly two cells resolves to
/// a pair so the value cells underneath can be rejoined later.
fn adjacent_fragment_match(header: &Row, keyword: &str, max_distance: usize) -> Option<ColumnRef> {
    let target = normalize(keyword);
    if target.chars().count() <= 1 {
        return None;
    }

    for (start, cell) in header.iter() {
        let first = normalize(cell);
        if first.is_empty() || first.len() >= target.len() || !target.starts_with(&first) {
            continue;
        }

        let mut consumed = first.len();
        let mut current = start;
        let mut cells_used = vec![start];

        'extend: while consumed < target.len() {
            for offset in 1..=max_distance {
                let next = current + offset;
                let chunk = normalize(header.get(next));
                if !chunk.is_empty() && target[consumed..].starts_with(&chunk) {
                    consumed += chunk.len();
                    current = next;
                    cells_used.push(next);
                    continue 'extend;
                }
            }
            break;
        }

        if consumed == target.len() {
            return Some(match cells_used.as_slice() {
                [first_idx, second_idx] => ColumnRef::Pair(*first_idx, *second_idx),
                _ => ColumnRef::Single(start),
            });
        }
    }

    None
}

/// True when the header cell immediately right of `index` carries no label,
/// i.e. a value may have spilled into it.
pub fn has_blank_right_neighbor(header: &Row, index: usize) -> bool {
    is_blank(header.get(index + 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keywords(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn partial_scan_wins_first() {
        let row = Row::from_cells(["", "등기 명의인", "", "", "주소"]);
        let cols = resolve_columns(&row, &keywords(&["등기명의인", "주소"]), 2);
        assert_eq!(cols.get("등기명의인"), Some(&ColumnRef::Single(1)));
        assert_eq!(cols.get("주소"), Some(&ColumnRef::Single(4)));
    }

    #[test]
    fn character_cells_resolve_to_start_index() {
        let row = Row::from_cells(["주", "", "소"]);
        let cols = resolve_columns(&row, &keywords(&["주소"]), 2);
        // two cells consumed -> pair, anchored at the first fragment
        assert_eq!(cols.get("주소"), Some(&ColumnRef::Pair(0, 2)));
    }

    #[test]
    fn fragment_cells_resolve_to_pair() {
        let mut row = Row::new();
        row.set(4, "최종");
        row.set(6, "지분");
        let cols = resolve_columns(&row, &keywords(&["최종지분"]), 2);
        assert_eq!(cols.get("최종지분"), Some(&ColumnRef::Pair(4, 6)));
    }

    #[test]
    fn fragments_beyond_distance_do_not_resolve() {
        let mut row = Row::new();
        row.set(0, "최종");
        row.set(4, "지분");
        let cols = resolve_columns(&row, &keywords(&["최종지분"]), 2);
        assert!(cols.is_empty());
    }

    #[test]
    fn long_fragment_chains_resolve_to_single_start() {
        let row = Row::from_cells(["순", "위", "번", "호"]);
        let cols = resolve_columns(&row, &keywords(&["순위번호"]), 2);
        assert_eq!(cols.get("순위번호"), Some(&ColumnRef::Single(0)));
    }

    #[test]
    fn unresolved_keywords_are_absent_not_errors() {
        let row = Row::from_cells(["등기목적"]);
        let cols = resolve_columns(&row, &keywords(&["대상소유자"]), 2);
        assert!(cols.get("대상소유자").is_none());
    }

    #[test]
    fn exact_resolution_rejects_supersets() {
        let row = Row::from_cells(["순위번호 외", "", "", "", "순위번호"]);
        let cols = resolve_columns_exact(&row, &keywords(&["순위번호"]));
        assert_eq!(cols.get("순위번호"), Some(&ColumnRef::Single(4)));
    }
}
