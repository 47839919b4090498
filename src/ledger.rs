use std::collections::HashSet;
use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::{Error, Result};

/// Codes already created on Tito, one per line, so a re-run can skip them.
pub struct Ledger {
    path: PathBuf,
    codes: HashSet<String>,
    file: Option<File>,
}

impl Ledger {
    pub fn open(path: &Path) -> Result<Self> {
        let codes = match fs::read_to_string(path) {
            Ok(contents) => contents
                .lines()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(String::from)
                .collect(),
            Err(e) if e.kind() == ErrorKind::NotFound => HashSet::new(),
            Err(source) => {
                return Err(Error::Ledger {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        info!("Ledger {} holds {} codes", path.display(), codes.len());

        Ok(Self {
            path: path.to_path_buf(),
            codes,
            file: None,
        })
    }

    pub fn contains(&self, code: &str) -> bool {
        self.codes.contains(code)
    }

    /// Append a freshly created code and flush it straight away.
    pub fn record(&mut self, code: &str) -> Result<()> {
        if self.codes.contains(code) {
            return Ok(());
        }

        let path = &self.path;
        let wrap = |source| Error::Ledger {
            path: path.clone(),
            source,
        };
        let file = match self.file.take() {
            Some(file) => file,
            None => OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(wrap)?,
        };
        let file = self.file.insert(file);
        writeln!(file, "{code}").map_err(wrap)?;
        file.flush().map_err(wrap)?;

        self.codes.insert(code.to_string());
        Ok(())
    }
}
