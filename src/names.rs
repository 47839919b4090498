use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::{debug, info};

use crate::error::{Error, Result};

/// Attendee name as it appears inside a discount code: uppercase, spaces as underscores.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttendeeName(String);

impl AttendeeName {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AttendeeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn normalize(line: &str) -> AttendeeName {
    AttendeeName(line.to_uppercase().replace(' ', "_"))
}

/// Read one name per line, skipping blank lines. Bytes that are not UTF-8
/// are replaced with U+FFFD instead of failing the run.
pub fn load_names(path: &Path) -> Result<Vec<AttendeeName>> {
    let file = File::open(path).map_err(|source| Error::FileOpen {
        path: path.to_path_buf(),
        source,
    })?;
    let mut reader = BufReader::new(file);

    let mut names = Vec::new();
    let mut buf = Vec::new();
    let mut number = 0;
    loop {
        buf.clear();
        let read = reader
            .read_until(b'\n', &mut buf)
            .map_err(|source| Error::FileRead {
                path: path.to_path_buf(),
                source,
            })?;
        if read == 0 {
            break;
        }
        number += 1;

        let line = String::from_utf8_lossy(&buf);
        let line = line.trim_end_matches(['\n', '\r']);
        if line.trim().is_empty() {
            debug!("Skipping blank line {} in {}", number, path.display());
            continue;
        }
        names.push(normalize(line));
    }

    info!("Loaded {} names from {}", names.len(), path.display());
    Ok(names)
}
