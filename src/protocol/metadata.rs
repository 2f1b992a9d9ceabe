//! Track metadata payload types.
//!
//! The candidate endpoints do not agree on a response envelope or on
//! field names. The track payload may appear under a `data` key, a
//! `track` key, or at the document root, and most fields have at least
//! two spellings.
//!
//! # Wire Format
//!
//! ```json
//! {
//!     "track": {
//!         "name": "Song",
//!         "artists": [{"name": "A"}, {"name": "B"}],
//!         "album": {
//!             "name": "Album",
//!             "images": [{"url": "https://..."}]
//!         },
//!         "duration_ms": 125000,
//!         "preview_url": "https://...",
//!         "external_urls": {"spotify": "https://..."},
//!         "popularity": 64
//!     }
//! }
//! ```
//!
//! Older endpoints flatten the same data:
//!
//! ```json
//! {
//!     "title": "Song",
//!     "artist": "A",
//!     "album": "Album",
//!     "duration": 125000,
//!     "image": "https://..."
//! }
//! ```

use serde::Deserialize;
use serde_json::Value;

/// Locates the track payload in a response document.
///
/// Tries the `data` key, then the `track` key, then the document root;
/// the first key that is present and non-null wins. Returns `None` when
/// the selected node does not deserialize into a [`Payload`] or carries
/// no usable title.
#[must_use]
pub fn extract(document: &Value) -> Option<Payload> {
    let node = document
        .get("data")
        .filter(|node| !node.is_null())
        .or_else(|| document.get("track").filter(|node| !node.is_null()))
        .unwrap_or(document);

    Payload::deserialize(node)
        .ok()
        .filter(Payload::has_title)
}

/// Track payload as any of the candidate endpoints returns it.
///
/// Every field is optional; canonicalization and fallbacks happen in
/// [`Track::from_payload`](crate::track::Track::from_payload).
#[derive(Clone, Debug, Default, Deserialize, Eq, Hash, PartialEq)]
pub struct Payload {
    /// Track title, spelled `name` or `title`.
    #[serde(default, alias = "title")]
    pub name: Option<String>,

    /// Performer list, when the endpoint returns structured artists.
    #[serde(default)]
    pub artists: Option<Vec<Artist>>,

    /// Flat performer name, when it does not.
    #[serde(default)]
    pub artist: Option<String>,

    /// Album object or bare album name.
    #[serde(default)]
    pub album: Option<Album>,

    /// Duration in milliseconds, spelled `duration_ms` or `duration`.
    #[serde(default, alias = "duration")]
    pub duration_ms: Option<u64>,

    /// Flat artwork URL variants.
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub artwork: Option<String>,

    /// 30-second preview clip URL.
    #[serde(default)]
    pub preview_url: Option<String>,

    /// Catalog links keyed by service.
    #[serde(default)]
    pub external_urls: Option<ExternalUrls>,

    /// Popularity score, 0-100.
    #[serde(default)]
    pub popularity: Option<u32>,
}

impl Payload {
    /// Whether the payload carries a non-empty title.
    ///
    /// A payload without one is unusable and its candidate endpoint
    /// is skipped.
    #[must_use]
    pub fn has_title(&self) -> bool {
        self.name
            .as_deref()
            .is_some_and(|name| !name.trim().is_empty())
    }
}

/// One performer in a structured artist list.
#[derive(Clone, Debug, Default, Deserialize, Eq, Hash, PartialEq)]
pub struct Artist {
    #[serde(default)]
    pub name: Option<String>,
}

/// Album field variants.
///
/// Newer endpoints return an object with a name and artwork images,
/// older ones a bare string.
#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq)]
#[serde(untagged)]
pub enum Album {
    Detail(AlbumDetail),
    Name(String),
}

/// Structured album data.
#[derive(Clone, Debug, Default, Deserialize, Eq, Hash, PartialEq)]
pub struct AlbumDetail {
    #[serde(default)]
    pub name: Option<String>,

    /// Artwork renditions, largest first.
    #[serde(default)]
    pub images: Vec<Image>,
}

/// One artwork rendition.
#[derive(Clone, Debug, Default, Deserialize, Eq, Hash, PartialEq)]
pub struct Image {
    pub url: String,
}

/// Catalog links keyed by service.
#[derive(Clone, Debug, Default, Deserialize, Eq, Hash, PartialEq)]
pub struct ExternalUrls {
    #[serde(default)]
    pub spotify: Option<String>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn extracts_payload_under_data_key() {
        let document = json!({"data": {"name": "Song"}});
        let payload = extract(&document).unwrap();
        assert_eq!(payload.name.as_deref(), Some("Song"));
    }

    #[test]
    fn extracts_payload_under_track_key() {
        let document = json!({
            "track": {
                "title": "Song",
                "artists": [{"name": "A"}, {"name": "B"}]
            }
        });
        let payload = extract(&document).unwrap();
        assert_eq!(payload.name.as_deref(), Some("Song"));
        assert_eq!(payload.artists.as_ref().map(Vec::len), Some(2));
    }

    #[test]
    fn extracts_payload_at_document_root() {
        let document = json!({"name": "Song", "artist": "A", "album": "B"});
        let payload = extract(&document).unwrap();
        assert_eq!(payload.artist.as_deref(), Some("A"));
        assert_eq!(payload.album, Some(Album::Name("B".to_owned())));
    }

    #[test]
    fn null_data_key_falls_through_to_track_key() {
        let document = json!({"data": null, "track": {"name": "Song"}});
        assert!(extract(&document).is_some());
    }

    #[test]
    fn payload_without_title_is_unusable() {
        let document = json!({"data": {"artist": "A"}});
        assert!(extract(&document).is_none());
    }

    #[test]
    fn non_object_payload_is_unusable() {
        let document = json!({"data": ["unexpected"]});
        assert!(extract(&document).is_none());
    }

    #[test]
    fn album_object_with_images_deserializes() {
        let document = json!({
            "name": "Song",
            "album": {"name": "Album", "images": [{"url": "https://img.example/a.jpg"}]},
            "duration_ms": 125000,
            "popularity": 64
        });
        let payload = extract(&document).unwrap();
        let Some(Album::Detail(detail)) = payload.album else {
            panic!("expected structured album");
        };
        assert_eq!(detail.name.as_deref(), Some("Album"));
        assert_eq!(detail.images.len(), 1);
        assert_eq!(payload.duration_ms, Some(125_000));
        assert_eq!(payload.popularity, Some(64));
    }

    #[test]
    fn duration_alias_is_accepted() {
        let document = json!({"name": "Song", "duration": 125000});
        let payload = extract(&document).unwrap();
        assert_eq!(payload.duration_ms, Some(125_000));
    }
}
