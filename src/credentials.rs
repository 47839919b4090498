use std::fmt;

use crate::error::{Error, Result};

/// Tito API token. Formatting never reveals more than the first few characters.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiToken(String);

impl ApiToken {
    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn redacted(&self) -> String {
        let visible: String = self.0.chars().take(4).collect();
        format!("{visible}…")
    }
}

impl fmt::Debug for ApiToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ApiToken").field(&self.redacted()).finish()
    }
}

impl fmt::Display for ApiToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.redacted())
    }
}

/// Take the token from the first positional argument (clap already folds in
/// `TITO_API_TOKEN`). Blank counts as missing.
pub fn load_api_token(arg: Option<String>) -> Result<ApiToken> {
    match arg.map(|t| t.trim().to_string()) {
        Some(token) if !token.is_empty() => Ok(ApiToken(token)),
        _ => Err(Error::MissingCredential),
    }
}
