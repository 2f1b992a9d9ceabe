//! Metadata gateway for the track scraper API.
//!
//! The upstream API is unreliable and loosely versioned: which endpoint
//! answers, and in which response shape, varies over time. The gateway
//! therefore tries a fixed, ordered chain of candidate endpoints and
//! returns the first usable record. Per-candidate failures are logged
//! for diagnostics only; the caller sees either a canonical [`Track`]
//! or a single aggregated failure.

use std::future::Future;

use reqwest::Url;
use thiserror::Error as ThisError;

use crate::{
    config::Config,
    error::{Error, Result},
    http,
    protocol::metadata,
    track::{Track, TrackId},
};

/// Metadata client over the ordered candidate endpoints.
pub struct Gateway {
    http_client: http::Client,
    host: String,
}

impl Gateway {
    /// Creates a gateway carrying the configured credentials.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built from the
    /// configuration.
    pub fn new(config: &Config) -> Result<Self> {
        let http_client = http::Client::new(config)?;

        Ok(Self {
            http_client,
            host: config.api_host.clone(),
        })
    }

    /// Candidate endpoint URLs for a track, in fallback order.
    ///
    /// The first two templates follow the configured host; the download
    /// endpoint only exists on the scraper host and stays pinned to it.
    fn candidates(&self, id: &TrackId) -> Result<Vec<Url>> {
        let templates = [
            format!("https://{}/v1/track/metadata?trackId={id}", self.host),
            format!("https://{}/track/{id}", self.host),
            format!(
                "https://{}/v1/track/download/soundcloud?trackId={id}",
                Config::DEFAULT_API_HOST
            ),
        ];

        templates
            .iter()
            .map(|template| template.parse().map_err(Into::into))
            .collect()
    }

    /// Fetches and normalizes the metadata for a track.
    ///
    /// Walks the candidate chain in order and returns the first usable
    /// record; later candidates are not tried once one succeeds.
    ///
    /// # Errors
    ///
    /// Returns `Unavailable` when every candidate either fails or
    /// returns a payload without a usable title.
    pub async fn track_metadata(&self, id: &TrackId) -> Result<Track> {
        let candidates = self.candidates(id)?;
        first_usable(self, id, &candidates).await
    }
}

/// Transport seam between the candidate walk and the HTTP client.
///
/// Lets tests drive the fallback chain with scripted responses.
pub(crate) trait Transport {
    fn get_json(&self, url: &Url) -> impl Future<Output = Result<serde_json::Value>> + Send;
}

impl Transport for Gateway {
    fn get_json(&self, url: &Url) -> impl Future<Output = Result<serde_json::Value>> + Send {
        let request = self.http_client.get(url.clone());
        async move {
            let response = self.http_client.execute(request).await?;
            let response = response.error_for_status()?;
            response.json::<serde_json::Value>().await.map_err(Into::into)
        }
    }
}

/// Why one candidate endpoint was passed over.
#[derive(Debug, ThisError)]
enum Skip {
    #[error("transport failed: {0}")]
    Transport(Error),

    #[error("response has no usable track payload")]
    Unusable,
}

/// Walks the candidate chain and returns the first usable record.
async fn first_usable<T>(transport: &T, id: &TrackId, candidates: &[Url]) -> Result<Track>
where
    T: Transport,
{
    for url in candidates {
        let outcome = match transport.get_json(url).await {
            Ok(document) => metadata::extract(&document)
                .and_then(|payload| Track::from_payload(id.clone(), payload))
                .ok_or(Skip::Unusable),
            Err(e) => Err(Skip::Transport(e)),
        };

        match outcome {
            Ok(track) => {
                debug!("candidate {} yielded track {track}", url.path());
                return Ok(track);
            }
            Err(skip) => warn!("candidate {} skipped: {skip}", url.path()),
        }
    }

    Err(Error::unavailable("metadata unavailable"))
}
