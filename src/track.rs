//! Canonical track records.
//!
//! A [`Track`] is only ever constructed from a metadata payload that has a
//! usable title; everything else falls back to placeholders or defaults, so
//! a partially filled record can never be observed downstream.

use std::{fmt, str::FromStr, time::Duration};

use url::Url;

use crate::{
    error::{Error, Result},
    protocol::metadata::{Album, Payload},
};

/// Canonical track identifier within the upstream catalog.
///
/// A fixed-length alphanumeric token as it appears in track sharing URLs.
/// Immutable once produced.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct TrackId(String);

impl TrackId {
    /// Exact length of a track identifier.
    pub const LENGTH: usize = 22;

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for TrackId {
    type Err = Error;

    fn from_str(id: &str) -> Result<Self> {
        let chars = id.chars().count();
        if chars != Self::LENGTH {
            return Err(Error::invalid_argument(format!(
                "track id should be {} characters long but is {chars}",
                Self::LENGTH
            )));
        }

        if !id.chars().all(|chr| chr.is_ascii_alphanumeric()) {
            return Err(Error::invalid_argument(format!(
                "track id contains non-alphanumeric characters: {id}"
            )));
        }

        Ok(Self(id.to_owned()))
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Canonical metadata for one track.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Track {
    id: TrackId,
    title: String,
    artist: String,
    album: String,
    duration: Duration,
    artwork_url: Option<Url>,
    preview_url: Option<Url>,
    external_url: Option<Url>,
    popularity: u32,
}

impl Track {
    /// Placeholder when a payload names no performers.
    pub const UNKNOWN_ARTIST: &'static str = "Unknown Artist";

    /// Placeholder when a payload names no album.
    pub const UNKNOWN_ALBUM: &'static str = "Unknown Album";

    /// Builds a canonical record from a wire payload.
    ///
    /// Returns `None` when the payload has no usable title: resolution
    /// fails rather than producing a partially filled record. All other
    /// fields apply fallbacks:
    /// * performers are joined with `", "`, or [`Self::UNKNOWN_ARTIST`]
    /// * missing album becomes [`Self::UNKNOWN_ALBUM`]
    /// * missing duration becomes zero
    /// * artwork prefers album images over the flat `image`/`artwork` fields
    /// * unparseable URLs are dropped, not fatal
    #[must_use]
    pub fn from_payload(id: TrackId, payload: Payload) -> Option<Self> {
        let title = payload.name.filter(|title| !title.trim().is_empty())?;

        let artist = match payload.artists {
            Some(performers) => {
                let joined = performers
                    .iter()
                    .filter_map(|performer| performer.name.as_deref())
                    .collect::<Vec<_>>()
                    .join(", ");
                if joined.is_empty() {
                    payload.artist
                } else {
                    Some(joined)
                }
            }
            None => payload.artist,
        }
        .filter(|artist| !artist.trim().is_empty())
        .unwrap_or_else(|| Self::UNKNOWN_ARTIST.to_owned());

        let (album, album_image) = match payload.album {
            Some(Album::Detail(detail)) => (
                detail.name,
                detail.images.first().map(|image| image.url.clone()),
            ),
            Some(Album::Name(name)) => (Some(name), None),
            None => (None, None),
        };
        let album = album
            .filter(|album| !album.trim().is_empty())
            .unwrap_or_else(|| Self::UNKNOWN_ALBUM.to_owned());

        let artwork_url = album_image
            .or(payload.image)
            .or(payload.artwork)
            .and_then(|artwork| artwork.parse().ok());

        let external_url = payload
            .external_urls
            .and_then(|urls| urls.spotify)
            .and_then(|link| link.parse().ok());

        Some(Self {
            id,
            title,
            artist,
            album,
            duration: Duration::from_millis(payload.duration_ms.unwrap_or(0)),
            artwork_url,
            preview_url: payload
                .preview_url
                .and_then(|preview| preview.parse().ok()),
            external_url,
            popularity: payload.popularity.unwrap_or(0),
        })
    }

    #[must_use]
    pub fn id(&self) -> &TrackId {
        &self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn artist(&self) -> &str {
        &self.artist
    }

    #[must_use]
    pub fn album(&self) -> &str {
        &self.album
    }

    #[must_use]
    pub fn duration(&self) -> Duration {
        self.duration
    }

    #[must_use]
    pub fn artwork_url(&self) -> Option<&Url> {
        self.artwork_url.as_ref()
    }

    #[must_use]
    pub fn preview_url(&self) -> Option<&Url> {
        self.preview_url.as_ref()
    }

    #[must_use]
    pub fn external_url(&self) -> Option<&Url> {
        self.external_url.as_ref()
    }

    #[must_use]
    pub fn popularity(&self) -> u32 {
        self.popularity
    }

    /// The duration formatted as `M:SS` for display.
    ///
    /// A zero or unknown duration renders as `0:00`.
    #[must_use]
    pub fn duration_display(&self) -> String {
        let secs = self.duration.as_secs();
        format!("{}:{:02}", secs / 60, secs % 60)
    }
}

impl fmt::Display for Track {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: \"{} - {}\"", self.id, self.artist, self.title)
    }
}
