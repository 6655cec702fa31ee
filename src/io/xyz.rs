//! XYZ substrate input: the standard two-header-line, one-atom-per-line format.

use std::path::Path;

use crate::core::error::CageError;
use crate::core::geometry::Point;

/// A parsed XYZ file: element symbols and Cartesian positions, in file order.
#[derive(Debug, Clone, Default)]
pub struct XyzFile {
    pub symbols: Vec<String>,
    pub positions: Vec<Point>,
}

/// Parses standard XYZ text: a line with the atom count, a comment line, then one
/// `symbol x y z` line per atom. Extra whitespace-only trailing lines are ignored.
pub fn parse_xyz(path: &Path, content: &str) -> Result<XyzFile, CageError> {
    let parse_err = |message: String| CageError::ParseError {
        path: path.to_path_buf(),
        message,
    };

    let mut lines = content.lines();
    let count_line = lines.next().ok_or_else(|| parse_err("empty file: missing atom count line".to_string()))?;
    let count: usize = count_line
        .trim()
        .parse()
        .map_err(|_| parse_err(format!("first line {count_line:?} is not an atom count")))?;
    lines.next(); // comment line, discarded

    let mut symbols = Vec::with_capacity(count);
    let mut positions = Vec::with_capacity(count);
    for i in 0..count {
        let line = lines
            .next()
            .ok_or_else(|| parse_err(format!("expected {count} atom lines, found only {i}")))?;
        let mut fields = line.split_whitespace();
        let symbol = fields
            .next()
            .ok_or_else(|| parse_err(format!("atom line {} is missing an element symbol", i + 1)))?;
        let mut coord = || -> Result<f32, CageError> {
            fields
                .next()
                .ok_or_else(|| parse_err(format!("atom line {} is missing a coordinate", i + 1)))?
                .parse()
                .map_err(|_| parse_err(format!("atom line {} has a non-numeric coordinate", i + 1)))
        };
        let x = coord()?;
        let y = coord()?;
        let z = coord()?;
        symbols.push(symbol.to_string());
        positions.push(Point::new(x, y, z));
    }

    Ok(XyzFile { symbols, positions })
}

/// Reads and parses an XYZ file from disk.
pub fn read_xyz(path: &Path) -> Result<XyzFile, CageError> {
    let content = std::fs::read_to_string(path).map_err(|source| CageError::InputMissing {
        path: path.to_path_buf(),
        source,
    })?;
    parse_xyz(path, &content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn parses_a_minimal_water_file() {
        let content = "3\nwater\nO 0.0 0.0 0.0\nH 0.96 0.0 0.0\nH -0.24 0.93 0.0\n";
        let parsed = parse_xyz(&PathBuf::from("water.xyz"), content).unwrap();
        assert_eq!(parsed.symbols, vec!["O", "H", "H"]);
        assert_eq!(parsed.positions[1], Point::new(0.96, 0.0, 0.0));
    }

    #[test]
    fn rejects_a_truncated_file() {
        let content = "3\nwater\nO 0.0 0.0 0.0\n";
        let err = parse_xyz(&PathBuf::from("water.xyz"), content).unwrap_err();
        assert!(matches!(err, CageError::ParseError { .. }));
    }

    #[test]
    fn rejects_a_non_numeric_count_line() {
        let content = "not-a-number\nwater\n";
        let err = parse_xyz(&PathBuf::from("water.xyz"), content).unwrap_err();
        assert!(matches!(err, CageError::ParseError { .. }));
    }
}
