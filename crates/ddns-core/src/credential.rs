//! Provider credentials
//!
//! A credential is given either as a literal API token or as the path of a
//! config-style file holding a `key = value` token entry, e.g.
//!
//! ```text
//! # cloudflare.ini
//! dns_cloudflare_api_token = 0123456789abcdef
//! ```
//!
//! A path that does not exist is treated as a literal token. The resolved
//! token is only trusted once the provider has verified it, which yields a
//! [`VerifiedToken`].

use std::path::Path;

use crate::{Error, Result};

/// Unverified credential as given on the command line
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    raw: String,
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential").field("raw", &"<REDACTED>").finish()
    }
}

impl Credential {
    pub fn new(raw: impl Into<String>) -> Self {
        Self { raw: raw.into() }
    }

    /// Resolve the credential to a token string
    ///
    /// Reads the token file when `raw` names an existing file, otherwise
    /// returns `raw` unchanged.
    pub fn resolve(&self) -> Result<String> {
        let path = Path::new(&self.raw);
        if !path.is_file() {
            return Ok(self.raw.clone());
        }

        tracing::debug!("Reading token from {}", path.display());
        let contents = std::fs::read_to_string(path)?;

        parse_token_file(&contents).ok_or_else(|| {
            Error::config(format!(
                "No 'key = value' token entry found in {}",
                path.display()
            ))
        })
    }
}

/// Extract the token from config-style file contents
///
/// Skips blank lines, `#`/`;` comments and `[section]` headers. The first
/// `key = value` line with a non-empty value wins.
pub fn parse_token_file(contents: &str) -> Option<String> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter(|line| !line.starts_with('#') && !line.starts_with(';'))
        .filter(|line| !line.starts_with('['))
        .filter_map(|line| line.split_once('='))
        .map(|(_, value)| unquote(value.trim()))
        .find(|value| !value.is_empty())
        .map(str::to_string)
}

fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = value
            .strip_prefix(quote)
            .and_then(|v| v.strip_suffix(quote))
        {
            return inner;
        }
    }
    value
}

/// Token the provider has confirmed as valid
///
/// Only provider adapters construct this, after a successful verification
/// call. All later provider calls in the same run take it by reference.
#[derive(Clone, PartialEq, Eq)]
pub struct VerifiedToken(String);

impl std::fmt::Debug for VerifiedToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("VerifiedToken(<REDACTED>)")
    }
}

impl VerifiedToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The token value, for building request headers
    pub fn secret(&self) -> &str {
        &self.0
    }
}
