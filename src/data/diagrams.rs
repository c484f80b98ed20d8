//! Persistence diagram collection files
//!
//! Two formats are supported:
//!
//! Text: one `birth death` pair per line, `#` comments, diagrams separated
//! by a `---` line. An empty block is an empty diagram.
//!
//! ```text
//! # diagram 0
//! 0.0 1.0
//! 0.2 0.7
//! ---
//! # diagram 1
//! 0.1 inf
//! 0.3 2.0
//! ```
//!
//! JSON: an array of diagrams, each an array of `[birth, death]` pairs.
//!
//! Essential points (infinite coordinates) are dropped while loading, since
//! the kernels require finite diagrams.

use crate::core::{KernelError, PersistenceDiagram, Point, Result};
use log::{debug, warn};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

const SEPARATOR: &str = "---";

/// Ordered collection of persistence diagrams loaded from a file
#[derive(Debug, Clone, PartialEq)]
pub struct DiagramCollection {
    diagrams: Vec<PersistenceDiagram>,
}

impl DiagramCollection {
    /// Wrap diagrams
    pub fn new(diagrams: Vec<PersistenceDiagram>) -> Self {
        Self { diagrams }
    }

    /// Load a collection, choosing the format from the file extension
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(KernelError::IoError)?;
        let reader = BufReader::new(file);

        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));

        let collection = if is_json {
            Self::from_json_reader(reader)?
        } else {
            Self::from_reader(reader)?
        };
        debug!("Loaded {} diagrams from {:?}", collection.len(), path);
        Ok(collection)
    }

    /// Parse the text format
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut diagrams = Vec::new();
        let mut current = Vec::new();
        let mut dropped = 0;

        for (line_num, line) in reader.lines().enumerate() {
            let line = line.map_err(KernelError::IoError)?;
            let line = line.trim();

            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if line == SEPARATOR {
                diagrams.push(PersistenceDiagram::new(std::mem::take(&mut current)));
                continue;
            }

            let point = Self::parse_line(line).map_err(|e| {
                KernelError::ParseError(format!("Error parsing line {}: {}", line_num + 1, e))
            })?;
            if point.is_finite() {
                current.push(point);
            } else {
                dropped += 1;
            }
        }
        diagrams.push(PersistenceDiagram::new(current));

        if dropped > 0 {
            warn!("Dropped {dropped} essential points with infinite coordinates");
        }
        Ok(Self { diagrams })
    }

    /// Parse the JSON format
    pub fn from_json_reader<R: BufRead>(reader: R) -> Result<Self> {
        let raw: Vec<Vec<[f64; 2]>> = serde_json::from_reader(reader)
            .map_err(|e| KernelError::ParseError(e.to_string()))?;

        let mut dropped = 0;
        let diagrams = raw
            .into_iter()
            .map(|points| {
                points
                    .into_iter()
                    .map(Point::from)
                    .filter(|p| {
                        let keep = p.is_finite();
                        if !keep {
                            dropped += 1;
                        }
                        keep
                    })
                    .collect()
            })
            .collect();

        if dropped > 0 {
            warn!("Dropped {dropped} essential points with infinite coordinates");
        }
        Ok(Self { diagrams })
    }

    /// Parse a `birth death` line; `inf` and `-inf` are accepted
    fn parse_line(line: &str) -> Result<Point> {
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() != 2 {
            return Err(KernelError::ParseError(format!(
                "expected 'birth death', got '{line}'"
            )));
        }

        let birth = parts[0]
            .parse::<f64>()
            .map_err(|_| KernelError::ParseError(format!("Invalid birth value: {}", parts[0])))?;
        let death = parts[1]
            .parse::<f64>()
            .map_err(|_| KernelError::ParseError(format!("Invalid death value: {}", parts[1])))?;

        Ok(Point::new(birth, death))
    }

    /// The diagrams, in file order
    pub fn diagrams(&self) -> &[PersistenceDiagram] {
        &self.diagrams
    }

    /// Consume the collection
    pub fn into_diagrams(self) -> Vec<PersistenceDiagram> {
        self.diagrams
    }

    /// Number of diagrams
    pub fn len(&self) -> usize {
        self.diagrams.len()
    }

    /// Check if the collection is empty
    pub fn is_empty(&self) -> bool {
        self.diagrams.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};
    use tempfile::NamedTempFile;

    #[test]
    fn test_text_format() {
        let data = "# first\n0.0 1.0\n0.2 0.7\n---\n\n0.5 2.0\n";
        let collection = DiagramCollection::from_reader(Cursor::new(data)).unwrap();

        assert_eq!(collection.len(), 2);
        assert_eq!(
            collection.diagrams()[0],
            PersistenceDiagram::from_pairs(&[(0.0, 1.0), (0.2, 0.7)])
        );
        assert_eq!(collection.diagrams()[1].len(), 1);
    }

    #[test]
    fn test_empty_blocks() {
        let data = "---\n0.0 1.0\n---\n";
        let collection = DiagramCollection::from_reader(Cursor::new(data)).unwrap();
        let sizes: Vec<usize> = collection.diagrams().iter().map(|d| d.len()).collect();
        assert_eq!(sizes, vec![0, 1, 0]);
    }

    #[test]
    fn test_essential_points_dropped() {
        let data = "0.0 inf\n0.1 0.4\n";
        let collection = DiagramCollection::from_reader(Cursor::new(data)).unwrap();
        assert_eq!(
            collection.diagrams()[0],
            PersistenceDiagram::from_pairs(&[(0.1, 0.4)])
        );
    }

    #[test]
    fn test_parse_errors() {
        let err = DiagramCollection::from_reader(Cursor::new("0.0 1.0\n0.5\n")).unwrap_err();
        assert!(err.to_string().contains("line 2"));

        assert!(DiagramCollection::from_reader(Cursor::new("a 1.0\n")).is_err());
        assert!(DiagramCollection::from_reader(Cursor::new("0.0 1.0 2.0\n")).is_err());
    }

    #[test]
    fn test_json_file() {
        let mut file = tempfile::Builder::new()
            .suffix(".json")
            .tempfile()
            .expect("Failed to create temp file");
        write!(file, "[[[0.0, 1.0], [0.5, 0.75]], [], [[1.0, 2.0]]]").expect("Failed to write");
        file.flush().expect("Failed to flush");

        let collection = DiagramCollection::from_file(file.path()).unwrap();
        assert_eq!(collection.len(), 3);
        assert!(collection.diagrams()[1].is_empty());
        assert_eq!(collection.diagrams()[2].points()[0], Point::new(1.0, 2.0));
    }

    #[test]
    fn test_text_file() {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        writeln!(file, "0.0 1.0").expect("Failed to write");
        writeln!(file, "---").expect("Failed to write");
        writeln!(file, "0.3 0.9").expect("Failed to write");
        file.flush().expect("Failed to flush");

        let collection = DiagramCollection::from_file(file.path()).unwrap();
        assert_eq!(collection.into_diagrams().len(), 2);
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            DiagramCollection::from_file("/nonexistent/diagrams.txt"),
            Err(KernelError::IoError(_))
        ));
    }
}
