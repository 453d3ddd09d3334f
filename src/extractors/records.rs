// src/extractors/records.rs
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::{ExtractMode, ExtractionConfig, SectionSpec};

use super::grid::Row;
use super::header::reconcile_header;
use super::matching::{match_exact, normalize};
use super::resolve::{has_blank_right_neighbor, resolve_columns, resolve_columns_exact, ColumnRef};
use super::section::Section;

/// One extracted data row: semantic keyword -> value, in output column order.
pub type Record = IndexMap<String, String>;

// Currency amount as rendered in principal-entry text, e.g. "금500,000,000원".
static AMOUNT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"금[\d,]+원").expect("Failed to compile AMOUNT_RE"));

// Registry identifier embedded in a registrant-name value: six digits,
// hyphen, then one to seven digits or masking asterisks.
static REGISTRY_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d{6}-[\d*]{1,7}").expect("Failed to compile REGISTRY_ID_RE"));

/// The single sentinel record standing in for a section that produced no
/// usable columns, keyed by the section's first output column.
pub fn no_record_sentinel(columns: &[String], no_record: &str) -> Record {
    let mut record = Record::new();
    let key = columns.first().cloned().unwrap_or_default();
    record.insert(key, no_record.to_string());
    record
}

/// Materializes records from a located section and applies the section's
/// post-processing rules, preserving row order.
pub fn extract_records(
    section: &Section,
    spec: &SectionSpec,
    config: &ExtractionConfig,
) -> Vec<Record> {
    let mut records = match spec.mode {
        ExtractMode::Named => extract_named(section, spec, config),
        ExtractMode::Precise => extract_precise(section, spec, config),
    };

    if spec.reunify_amounts {
        reunify_split_amounts(&mut records, &config.principal_column, &config.amount_marker);
    }
    if spec.trim_notes {
        trim_after_reference_note(&mut records, &config.note_markers);
    }

    records
}

/// Named-column mode: the section's first row is the header. Columns are
/// resolved with the full fuzzy strategy chain; the share-fraction column may
/// be rejoined from a resolved pair or from a spill into a blank-header
/// neighbor cell.
fn extract_named(section: &Section, spec: &SectionSpec, config: &ExtractionConfig) -> Vec<Record> {
    let Some(first) = section.rows().first() else {
        return vec![no_record_sentinel(&spec.columns, &config.no_record)];
    };

    let header = reconcile_header(first, &config.split_patterns, config.merge_gap);
    let columns = resolve_columns(&header, &spec.columns, config.resolve_distance);
    if columns.is_empty() {
        tracing::debug!("No column keyword resolved for '{}'", spec.sheet_title);
        return vec![no_record_sentinel(&spec.columns, &config.no_record)];
    }

    let mut records = Vec::new();
    for row in &section.rows()[1..] {
        let mut record = Record::new();
        for keyword in &spec.columns {
            let value = match columns.get(keyword) {
                None => String::new(),
                Some(ColumnRef::Single(idx)) => {
                    let mut value = row.get(*idx).trim().to_string();
                    if spec.share_column.as_deref() == Some(keyword.as_str())
                        && has_blank_right_neighbor(&header, *idx)
                    {
                        append_fragment(&mut value, row.get(idx + 1).trim());
                    }
                    value
                }
                Some(ColumnRef::Pair(left, right)) => {
                    let mut value = row.get(*left).trim().to_string();
                    append_fragment(&mut value, row.get(*right).trim());
                    value
                }
            };
            record.insert(keyword.clone(), value);
        }
        records.push(record);
    }

    split_embedded_registry_id(
        &mut records,
        &config.registrant_column,
        &config.id_number_column,
    );
    records
}

/// Precise-header mode: hunt the header row by exact keyword majority, then
/// resolve columns by exact match only. Records carry only resolved columns.
fn extract_precise(
    section: &Section,
    spec: &SectionSpec,
    config: &ExtractionConfig,
) -> Vec<Record> {
    if section.rows().is_empty() {
        return vec![no_record_sentinel(&spec.columns, &config.no_record)];
    }

    let (header_idx, data_start) = match find_keyword_header(
        section,
        &spec.columns,
        config.header_scan_rows,
        config.header_match_threshold,
    ) {
        Some(idx) => (idx, idx + 1),
        None => (0, 1),
    };

    let header = reconcile_header(
        &section.rows()[header_idx],
        &config.split_patterns,
        config.merge_gap,
    );
    let columns = resolve_columns_exact(&header, &spec.columns);
    if columns.is_empty() {
        tracing::debug!("No exact column match for '{}'", spec.sheet_title);
        return vec![no_record_sentinel(&spec.columns, &config.no_record)];
    }

    let mut records = Vec::new();
    for row in section.rows().iter().skip(data_start) {
        let mut record = Record::new();
        for keyword in &spec.columns {
            if let Some(ColumnRef::Single(idx)) = columns.get(keyword) {
                record.insert(keyword.clone(), row.get(*idx).trim().to_string());
            }
        }
        records.push(record);
    }
    records
}

/// First row among the leading `scan_rows` whose exact keyword hit count
/// reaches `threshold`.
fn find_keyword_header(
    section: &Section,
    keywords: &[String],
    scan_rows: usize,
    threshold: usize,
) -> Option<usize> {
    section
        .rows()
        .iter()
        .take(scan_rows)
        .position(|row| {
            let hits = keywords
                .iter()
                .filter(|keyword| row.iter().any(|(_, cell)| match_exact(cell, keyword)))
                .count();
            hits >= threshold
        })
}

fn append_fragment(value: &mut String, fragment: &str) {
    if fragment.is_empty() {
        return;
    }
    if !value.is_empty() {
        value.push(' ');
    }
    value.push_str(fragment);
}

/// Moves a registry identifier embedded in the registrant-name value into
/// the identifier-number field, stripping it from the name. An already
/// populated identifier field is left alone.
pub fn split_embedded_registry_id(records: &mut [Record], name_column: &str, id_column: &str) {
    for record in records.iter_mut() {
        let Some(name) = record.get(name_column).cloned() else {
            continue;
        };
        let Some(hit) = REGISTRY_ID_RE.find(&name) else {
            continue;
        };

        let identifier = hit.as_str().to_string();
        let remainder = format!("{}{}", &name[..hit.start()], &name[hit.end()..]);
        let cleaned = remainder.split_whitespace().collect::<Vec<_>>().join(" ");
        record.insert(name_column.to_string(), cleaned);

        let entry = record.entry(id_column.to_string()).or_default();
        if entry.trim().is_empty() {
            *entry = identifier;
        }
    }
}

/// Repairs secured amounts wrapped onto the following grid row: when a
/// principal-entry value names the amount marker but carries no amount
/// pattern yet, the first amount found in this record's and the next
/// record's combined text is appended. Only the immediately following record
/// is inspected; amounts split across three or more rows stay unrepaired.
pub fn reunify_split_amounts(records: &mut [Record], principal_column: &str, marker: &str) {
    for i in 0..records.len().saturating_sub(1) {
        let main = records[i]
            .get(principal_column)
            .cloned()
            .unwrap_or_default();
        if !main.contains(marker) || AMOUNT_RE.is_match(&main) {
            continue;
        }

        let combined = records[i]
            .values()
            .chain(records[i + 1].values())
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" ");
        if let Some(amount) = AMOUNT_RE.find(&combined) {
            if !main.contains(amount.as_str()) {
                records[i].insert(
                    principal_column.to_string(),
                    format!("{} {}", main, amount.as_str()),
                );
            }
        }
    }
}

/// Truncates the record list at the first record whose whitespace-stripped
/// concatenated text contains a reference/remarks marker. Idempotent.
pub fn trim_after_reference_note(records: &mut Vec<Record>, markers: &[String]) {
    let cut = records.iter().position(|record| {
        let text = normalize(&record.values().map(String::as_str).collect::<Vec<_>>().join(""));
        markers
            .iter()
            .any(|marker| text.contains(normalize(marker).as_str()))
    });
    if let Some(idx) = cut {
        records.truncate(idx);
    }
}
