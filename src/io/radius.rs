//! Covalent-radius table loading: parses §6's `<count>` then `<symbol> <radius>` lines format and
//! caches the bundled default. Mirrors `input.c`'s radius-table reader and the XYZ reader's own
//! leading-count-line convention.

use std::path::Path;
use std::sync::OnceLock;

use crate::core::error::CageError;
use crate::substrate::RadiusTable;

const DEFAULT_RADII_TXT: &str = include_str!("../../resources/default_radii.txt");

static DEFAULT_RADII: OnceLock<RadiusTable> = OnceLock::new();

/// Parses a radius table from `<count>` then `count` lines of `<symbol> <radius>`, where radius
/// is an integer centi-ångström value (e.g. `C 77`).
pub fn parse_radius_table(content: &str) -> Result<RadiusTable, CageError> {
    let parse_err = |message: String| CageError::ParseError {
        path: Path::new("<radius table>").to_path_buf(),
        message,
    };

    let mut lines = content.lines().filter(|line| !line.trim_start().starts_with('#'));
    let count_line = lines.next().ok_or_else(|| parse_err("empty file: missing row count line".to_string()))?;
    let count: usize = count_line
        .trim()
        .parse()
        .map_err(|_| parse_err(format!("first line {count_line:?} is not a row count")))?;

    let mut table = RadiusTable::new();
    for i in 0..count {
        let line = lines.next().ok_or_else(|| parse_err(format!("expected {count} rows, found only {i}")))?;
        let mut fields = line.split_whitespace();
        let symbol = fields.next().ok_or_else(|| parse_err(format!("row {} is missing an element symbol", i + 1)))?;
        let radius: i32 = fields
            .next()
            .ok_or_else(|| parse_err(format!("row {} is missing a radius", i + 1)))?
            .parse()
            .map_err(|_| parse_err(format!("row {} has a non-numeric radius", i + 1)))?;
        table.insert(symbol.to_string(), radius);
    }

    Ok(table)
}

/// Returns the lazily parsed, embedded default covalent-radius table.
///
/// # Panics
///
/// Panics if the embedded table fails to parse; that would indicate a corrupt build, not a
/// user-facing condition.
pub fn default_radius_table() -> &'static RadiusTable {
    DEFAULT_RADII.get_or_init(|| parse_radius_table(DEFAULT_RADII_TXT).expect("embedded default radius table is malformed"))
}

/// Loads a radius table from `path` if given, falling back to [`default_radius_table`].
pub fn load_radius_table(path: Option<&Path>) -> Result<RadiusTable, CageError> {
    match path {
        Some(path) => {
            let content = std::fs::read_to_string(path).map_err(|source| CageError::InputMissing {
                path: path.to_path_buf(),
                source,
            })?;
            parse_radius_table(&content)
        }
        None => Ok(default_radius_table().clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_table_covers_common_elements() {
        let table = default_radius_table();
        assert_eq!(table.get("C"), Some(&76));
        assert_eq!(table.get("H"), Some(&31));
        assert_eq!(table.get("O"), Some(&66));
    }

    #[test]
    fn parse_radius_table_reads_a_minimal_document() {
        let table = parse_radius_table("2\nC 77\nH 32\n").unwrap();
        assert_eq!(table.get("C"), Some(&77));
        assert_eq!(table.get("H"), Some(&32));
    }

    #[test]
    fn rejects_a_truncated_table() {
        let err = parse_radius_table("2\nC 77\n").unwrap_err();
        assert!(matches!(err, CageError::ParseError { .. }));
    }
}
