//! Built-in download collaborators.
//!
//! Real catalog search and file transfer back-ends do not exist yet.
//! [`Placeholder`] simulates them with fixed delays and placeholder
//! URLs so the full workflow can be exercised end to end; it is injected
//! into the orchestrator like any other [`Provider`], never hard-coded
//! into it.

use std::{future::Future, time::Duration};

use tokio::time;
use url::Url;

use crate::{
    audio::Quality,
    downloader::{Provider, SourceHandle, TransferTarget},
    error::Result,
    track::Track,
};

/// Simulated collaborators with fixed delays and placeholder URLs.
///
/// The delays roughly mimic the latency of a real search, URL
/// generation and transfer; nothing is actually downloaded.
#[derive(Clone, Copy, Debug, Default)]
pub struct Placeholder;

impl Placeholder {
    const LOCATE_DELAY: Duration = Duration::from_millis(1_000);
    const RESOLVE_DELAY: Duration = Duration::from_millis(1_500);
    const TRANSFER_DELAY: Duration = Duration::from_millis(2_000);

    /// Origin of the placeholder download URLs.
    const DOWNLOAD_ORIGIN: &'static str = "https://example.com";

    /// Catalog name reported on located sources.
    const CATALOG: &'static str = "youtube_music";
}

impl Provider for Placeholder {
    fn locate_source(
        &self,
        track: &Track,
    ) -> impl Future<Output = Result<Option<SourceHandle>>> + Send {
        let source = SourceHandle::new(track.id().as_str(), Self::CATALOG);
        async move {
            time::sleep(Self::LOCATE_DELAY).await;
            Ok(Some(source))
        }
    }

    fn resolve_url(
        &self,
        source: &SourceHandle,
        quality: Quality,
    ) -> impl Future<Output = Result<Option<TransferTarget>>> + Send {
        let url = format!(
            "{}/dl/{}/{}.{}",
            Self::DOWNLOAD_ORIGIN,
            quality.wire_label(),
            source.id(),
            quality.extension()
        );
        async move {
            time::sleep(Self::RESOLVE_DELAY).await;
            let url = url.parse::<Url>()?;
            Ok(Some(TransferTarget::new(url, quality)))
        }
    }

    fn transfer(
        &self,
        target: &TransferTarget,
        track: &Track,
    ) -> impl Future<Output = Result<()>> + Send {
        debug!(
            "simulated transfer of track {track} in {} from {}",
            target.quality(),
            target.url()
        );
        async move {
            time::sleep(Self::TRANSFER_DELAY).await;
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::metadata::Payload;

    fn track() -> Track {
        let payload = Payload {
            name: Some("Song".to_owned()),
            ..Payload::default()
        };
        Track::from_payload("4uLU6hMCjMI75M1A2tKUQC".parse().unwrap(), payload).unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn placeholder_urls_follow_the_quality_tier() {
        let provider = Placeholder;
        let source = provider.locate_source(&track()).await.unwrap().unwrap();
        assert_eq!(source.id(), "4uLU6hMCjMI75M1A2tKUQC");
        assert_eq!(source.provider(), "youtube_music");

        let target = provider
            .resolve_url(&source, Quality::Lossless)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(
            target.url().as_str(),
            "https://example.com/dl/flac/4uLU6hMCjMI75M1A2tKUQC.flac"
        );

        let target = provider
            .resolve_url(&source, Quality::Low)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(
            target.url().as_str(),
            "https://example.com/dl/128/4uLU6hMCjMI75M1A2tKUQC.mp3"
        );
    }
}
