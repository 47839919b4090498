use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("no API token specified (pass it as the first argument or set TITO_API_TOKEN)")]
    MissingCredential,

    #[error("could not open {}: {source}", path.display())]
    FileOpen {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("could not read {}: {source}", path.display())]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("could not read event config {}: {source}", path.display())]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid event config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("unknown event {name:?} (known events: {})", known.join(", "))]
    UnknownEvent { name: String, known: Vec<String> },

    #[error(
        "event {event} has mismatched tiers: {values} values, {quantities} quantities, {codes} codes"
    )]
    TierMismatch {
        event: String,
        values: usize,
        quantities: usize,
        codes: usize,
    },

    #[error("request failed: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("ledger {}: {source}", path.display())]
    Ledger {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("could not write output: {0}")]
    Output(#[from] std::io::Error),

    #[error("could not encode request body: {0}")]
    Encode(#[from] serde_json::Error),
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Transport(Box::new(e))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
