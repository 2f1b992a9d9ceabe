use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Audio quality tiers offered for download.
///
/// Exactly one tier is active at a time; selecting a new one replaces
/// the prior selection.
#[derive(
    Copy,
    Clone,
    Debug,
    Default,
    Hash,
    Serialize,
    Deserialize,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
)]
#[cfg_attr(feature = "binary", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum Quality {
    /// 128 kbps MP3
    Low,

    /// 320 kbps MP3 (default)
    #[default]
    Standard,

    /// FLAC lossless
    Lossless,
}

impl Quality {
    /// Label used by download endpoints for this tier.
    #[must_use]
    pub fn wire_label(&self) -> &'static str {
        match self {
            Quality::Low => "128",
            Quality::Standard => "320",
            Quality::Lossless => "flac",
        }
    }

    /// File extension of the transferred audio.
    #[must_use]
    pub fn extension(&self) -> &'static str {
        match self {
            Quality::Low | Quality::Standard => "mp3",
            Quality::Lossless => "flac",
        }
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Quality::Low => write!(f, "128 kbps MP3"),
            Quality::Standard => write!(f, "320 kbps MP3"),
            Quality::Lossless => write!(f, "FLAC"),
        }
    }
}

impl FromStr for Quality {
    type Err = Error;

    /// Parses both the tier names and the wire labels.
    fn from_str(quality: &str) -> Result<Self, Self::Err> {
        let variant = match quality {
            "128" | "low" => Quality::Low,
            "320" | "standard" => Quality::Standard,
            "flac" | "lossless" => Quality::Lossless,
            _ => return Err(Error::invalid_argument(format!("quality: {quality}"))),
        };

        Ok(variant)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_standard() {
        assert_eq!(Quality::default(), Quality::Standard);
    }

    #[test]
    fn wire_labels_round_trip() {
        for quality in [Quality::Low, Quality::Standard, Quality::Lossless] {
            assert_eq!(quality.wire_label().parse::<Quality>().unwrap(), quality);
        }
    }

    #[test]
    fn lossless_uses_flac_extension() {
        assert_eq!(Quality::Lossless.extension(), "flac");
        assert_eq!(Quality::Standard.extension(), "mp3");
    }

    #[test]
    fn unknown_label_is_rejected() {
        assert!("256".parse::<Quality>().is_err());
    }
}
