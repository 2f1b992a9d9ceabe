//! API credential handling.
//!
//! The metadata gateway authenticates with two request headers: an API key
//! and an API host. The key is sensitive and is kept in a newtype whose
//! `Debug` output is redacted, so it cannot leak through logging.
//!
//! Credentials are read from a small TOML secrets file:
//!
//! ```toml
//! key = "0123456789abcdef"
//!
//! # Optional; defaults to the scraper host.
//! host = "spotify-scraper.p.rapidapi.com"
//! ```

use std::{fs, str::FromStr};

use serde::Deserialize;
use veil::Redact;

use crate::error::{Error, Result};

/// API key presented as the `X-RapidAPI-Key` request header.
///
/// Guaranteed non-empty and free of whitespace and control characters.
/// `Debug` output is redacted.
#[derive(Clone, Eq, Hash, PartialEq, Deserialize, Redact)]
#[redact(all)]
pub struct ApiKey(String);

impl ApiKey {
    /// Returns the key as a string slice, for use as a header value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for ApiKey {
    type Err = Error;

    /// Validates and wraps an API key.
    ///
    /// # Errors
    ///
    /// Returns `Unauthenticated` when the key is empty and
    /// `InvalidArgument` when it contains characters that cannot
    /// appear in an HTTP header value.
    fn from_str(key: &str) -> Result<Self> {
        let key = key.trim();
        if key.is_empty() {
            return Err(Error::unauthenticated("api key is empty"));
        }

        if key.chars().any(|chr| chr.is_whitespace() || chr.is_control()) {
            return Err(Error::invalid_argument("api key contains illegal characters"));
        }

        Ok(Self(key.to_owned()))
    }
}

/// Credentials as read from a secrets file.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Secrets {
    /// Required API key.
    pub key: ApiKey,

    /// Optional API host override.
    pub host: Option<String>,
}

impl Secrets {
    /// Maximum allowed secrets file size in bytes.
    ///
    /// Prevents an out-of-memory condition when a wrong path is passed:
    /// a real secrets file is tiny.
    const FILE_SIZE_LIMIT: u64 = 1024;

    /// Loads credentials from a TOML secrets file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is larger than
    /// [`Self::FILE_SIZE_LIMIT`], is not valid TOML, or does not contain
    /// a usable `key` entry.
    pub fn from_file(secrets_file: &str) -> Result<Self> {
        let attributes = fs::metadata(secrets_file)?;
        if attributes.len() > Self::FILE_SIZE_LIMIT {
            return Err(Error::invalid_argument(format!(
                "{secrets_file} is too large"
            )));
        }

        let contents = fs::read_to_string(secrets_file)?;
        contents.parse()
    }
}

impl FromStr for Secrets {
    type Err = Error;

    fn from_str(contents: &str) -> Result<Self> {
        #[derive(Deserialize)]
        struct Raw {
            key: Option<String>,
            host: Option<String>,
        }

        let raw: Raw = toml::from_str(contents)?;

        let key = raw
            .key
            .ok_or_else(|| Error::unauthenticated("secrets file does not contain an api key"))?
            .parse()?;

        let host = raw
            .host
            .map(|host| host.trim().to_owned())
            .filter(|host| !host.is_empty());

        Ok(Self { key, host })
    }
}
