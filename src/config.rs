use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, info};

use crate::error::{Error, Result};

const BUILTIN_EVENTS: &str = include_str!("../events.toml");

pub const DEFAULT_BASE_URL: &str = "https://api.tito.io/v3";

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct EventConfig {
    pub prefix: String,
    pub release_id: String,
    pub input_file: PathBuf,
    pub account: String,
    pub event: String,
    pub tier_values: Vec<String>,
    pub tier_quantities: Vec<String>,
    pub tier_codes: Vec<String>,
}

/// One discount tier: index `i` across the three tier lists of an event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tier<'a> {
    pub value: &'a str,
    pub quantity: &'a str,
    pub code: &'a str,
}

impl EventConfig {
    pub fn tiers(&self) -> impl Iterator<Item = Tier<'_>> {
        self.tier_values
            .iter()
            .zip(&self.tier_quantities)
            .zip(&self.tier_codes)
            .map(|((value, quantity), code)| Tier {
                value,
                quantity,
                code,
            })
    }

    pub fn tier_count(&self) -> usize {
        self.tier_values.len()
    }

    pub fn endpoint(&self, base_url: &str) -> String {
        format!(
            "{}/{}/{}/discount_codes",
            base_url.trim_end_matches('/'),
            self.account,
            self.event
        )
    }

    fn validate(&self, name: &str) -> Result<()> {
        let values = self.tier_values.len();
        let quantities = self.tier_quantities.len();
        let codes = self.tier_codes.len();
        if values != quantities || values != codes {
            return Err(Error::TierMismatch {
                event: name.to_string(),
                values,
                quantities,
                codes,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct EventTable {
    events: BTreeMap<String, EventConfig>,
}

impl EventTable {
    /// The table compiled into the binary from `events.toml`.
    pub fn builtin() -> Result<Self> {
        debug!("Using builtin event table");
        Self::parse(BUILTIN_EVENTS)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|source| Error::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        info!("Loading event table from {}", path.display());
        Self::parse(&contents)
    }

    pub fn parse(contents: &str) -> Result<Self> {
        let table: EventTable = toml::from_str(contents)?;
        for (name, config) in &table.events {
            config.validate(name)?;
        }
        Ok(table)
    }

    pub fn select(&self, name: &str) -> Result<&EventConfig> {
        self.events.get(name).ok_or_else(|| Error::UnknownEvent {
            name: name.to_string(),
            known: self.events.keys().cloned().collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_builtin_table() {
        let table = EventTable::builtin().unwrap();

        let dodl = table.select("DODL").unwrap();
        assert_eq!(dodl.prefix, "DODL24");
        assert_eq!(dodl.release_id, "1456279");
        assert_eq!(dodl.tier_count(), 3);

        let ffc = table.select("FFC").unwrap();
        assert_eq!(ffc.account, "fast-flow-conf");
        assert_eq!(
            ffc.tiers().collect::<Vec<_>>(),
            vec![
                Tier {
                    value: "100.00",
                    quantity: "1",
                    code: "100"
                },
                Tier {
                    value: "20.00",
                    quantity: "100",
                    code: "20"
                },
            ]
        );
    }

    #[test]
    fn test_unknown_event() {
        let table = EventTable::builtin().unwrap();
        let err = table.select("NOPE").unwrap_err();
        match err {
            Error::UnknownEvent { name, known } => {
                assert_eq!(name, "NOPE");
                assert_eq!(known, vec!["DODL".to_string(), "FFC".to_string()]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_mismatched_tiers_rejected() {
        let contents = r#"
            [events.BAD]
            prefix = "B"
            release_id = "1"
            input_file = "bad.txt"
            account = "acct"
            event = "ev"
            tier_values = ["10.00", "20.00"]
            tier_quantities = ["1"]
            tier_codes = ["10", "20"]
        "#;
        let err = EventTable::parse(contents).unwrap_err();
        assert!(matches!(
            err,
            Error::TierMismatch {
                values: 2,
                quantities: 1,
                codes: 2,
                ..
            }
        ));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
            [events.X]
            prefix = "X"
            release_id = "999"
            input_file = "x.txt"
            account = "acct"
            event = "ev"
            tier_values = ["5.00"]
            tier_quantities = ["1"]
            tier_codes = ["10"]
            "#
        )
        .unwrap();

        let table = EventTable::load(file.path()).unwrap();
        let x = table.select("X").unwrap();
        assert_eq!(x.input_file, PathBuf::from("x.txt"));
        assert_eq!(
            x.endpoint("https://api.tito.io/v3/"),
            "https://api.tito.io/v3/acct/ev/discount_codes"
        );
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = EventTable::load(&dir.path().join("events.toml")).unwrap_err();
        assert!(matches!(err, Error::ConfigRead { .. }));
    }

    #[test]
    fn test_invalid_toml() {
        let err = EventTable::parse("[events.X]\nprefix = ").unwrap_err();
        assert!(matches!(err, Error::ConfigParse(_)));
    }
}
