//! Download orchestration.
//!
//! A download is a strictly sequential three-stage workflow over
//! pluggable collaborators:
//!
//! 1. locate a downloadable origin for the loaded track,
//! 2. resolve a quality-specific download URL for that origin,
//! 3. transfer the audio.
//!
//! Each invocation is a fresh sequence through the states
//! `Idle -> LocatingSource -> ResolvingUrl -> Transferring -> Completed`,
//! with `Failed` reachable from any active state. There is no resumption:
//! after a failure or a completion, the next start re-enters at the first
//! stage.
//!
//! The collaborators are deliberately a trait ([`Provider`]): which
//! catalogs are searched and how bytes are actually moved is up to the
//! embedding application. See [`providers`](crate::providers) for the
//! built-in stand-in.

use std::{fmt, future::Future};

use tokio::sync::mpsc::UnboundedSender;
use url::Url;

use crate::{
    audio::Quality,
    error::{Error, Result},
    events::Event,
    session::Session,
    track::Track,
};

/// Opaque reference to a located downloadable origin for a track.
///
/// Produced by [`Provider::locate_source`] and carried forward into URL
/// resolution; the orchestrator never inspects it beyond passing it on.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct SourceHandle {
    id: String,
    provider: String,
}

impl SourceHandle {
    #[must_use]
    pub fn new(id: impl Into<String>, provider: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            provider: provider.into(),
        }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Name of the catalog the origin was found in.
    #[must_use]
    pub fn provider(&self) -> &str {
        &self.provider
    }
}

impl fmt::Display for SourceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.id, self.provider)
    }
}

/// A quality-resolved, ready-to-fetch download URL.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct TransferTarget {
    url: Url,
    quality: Quality,
}

impl TransferTarget {
    #[must_use]
    pub fn new(url: Url, quality: Quality) -> Self {
        Self { url, quality }
    }

    #[must_use]
    pub fn url(&self) -> &Url {
        &self.url
    }

    #[must_use]
    pub fn quality(&self) -> Quality {
        self.quality
    }
}

/// Download collaborators injected by the embedding application.
///
/// Stage results are `Option`s: an `Ok(None)` means the stage ran but
/// found nothing, which fails the sequence with a stage-specific reason
/// rather than an underlying error.
pub trait Provider {
    /// Searches the provider's catalogs for a downloadable origin.
    fn locate_source(
        &self,
        track: &Track,
    ) -> impl Future<Output = Result<Option<SourceHandle>>> + Send;

    /// Resolves a download URL for the origin at the requested quality.
    fn resolve_url(
        &self,
        source: &SourceHandle,
        quality: Quality,
    ) -> impl Future<Output = Result<Option<TransferTarget>>> + Send;

    /// Transfers the audio behind the target.
    fn transfer(
        &self,
        target: &TransferTarget,
        track: &Track,
    ) -> impl Future<Output = Result<()>> + Send;
}

/// States of one download sequence.
///
/// Strictly ordered while a sequence is running; `Failed` is reachable
/// from any state other than `Idle` and `Completed`.
#[derive(Copy, Clone, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum State {
    /// No sequence is running.
    #[default]
    Idle,

    /// Searching for a downloadable origin.
    LocatingSource,

    /// Resolving the quality-specific download URL.
    ResolvingUrl,

    /// Transferring the audio.
    Transferring,

    /// The sequence finished successfully.
    Completed,

    /// The sequence failed; the reason travels in the returned error
    /// and the emitted [`Event::Failed`].
    Failed,
}

impl State {
    /// Percentage checkpoint to display for this state.
    #[must_use]
    pub fn checkpoint(&self) -> u8 {
        match self {
            State::Idle | State::Failed => 0,
            State::LocatingSource => 25,
            State::ResolvingUrl => 50,
            State::Transferring => 75,
            State::Completed => 100,
        }
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            State::Idle => write!(f, "idle"),
            State::LocatingSource => write!(f, "locating source"),
            State::ResolvingUrl => write!(f, "resolving download url"),
            State::Transferring => write!(f, "transferring"),
            State::Completed => write!(f, "completed"),
            State::Failed => write!(f, "failed"),
        }
    }
}

/// Drives download sequences over a [`Provider`].
///
/// Single ownership serializes everything: `start` takes `&mut self`,
/// so a second sequence cannot begin while one is in flight.
pub struct Downloader<P> {
    provider: P,
    event_tx: Option<UnboundedSender<Event>>,
    state: State,
}

impl<P> Downloader<P>
where
    P: Provider,
{
    /// Creates an orchestrator without progress reporting.
    #[must_use]
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            event_tx: None,
            state: State::Idle,
        }
    }

    /// Creates an orchestrator that reports progress on `event_tx`.
    #[must_use]
    pub fn with_events(provider: P, event_tx: UnboundedSender<Event>) -> Self {
        Self {
            provider,
            event_tx: Some(event_tx),
            state: State::Idle,
        }
    }

    /// The state of the current or last sequence.
    #[must_use]
    pub fn state(&self) -> State {
        self.state
    }

    fn emit(&self, event: Event) {
        if let Some(ref event_tx) = self.event_tx {
            // The consumer may be gone; progress is best-effort.
            let _ = event_tx.send(event);
        }
    }

    fn enter(&mut self, state: State) {
        trace!("download sequence entering state: {state}");
        self.state = state;
        self.emit(Event::Stage(state));
    }

    fn fail(&mut self, error: Error) -> Error {
        warn!("download failed while {}: {error}", self.state);
        self.state = State::Failed;
        self.emit(Event::Failed(error.to_string()));
        error
    }

    /// Runs one full download sequence for the loaded track.
    ///
    /// A start always begins a fresh sequence; a prior `Completed` or
    /// `Failed` outcome is discarded, never resumed. Fails immediately,
    /// without invoking any collaborator, when the session holds no
    /// record.
    ///
    /// # Errors
    ///
    /// Returns an error if no track is loaded, if a stage finds nothing,
    /// or if a collaborator fails; the orchestrator is left in the
    /// `Failed` state and can be started again.
    pub async fn start(&mut self, session: &Session) -> Result<()> {
        self.state = State::Idle;

        let Some(track) = session.current() else {
            return Err(self.fail(Error::failed_precondition("no track loaded")));
        };

        self.enter(State::LocatingSource);
        let located = self.provider.locate_source(track).await;
        let source = match located {
            Ok(Some(source)) => source,
            Ok(None) => return Err(self.fail(Error::not_found("no source found"))),
            Err(e) => return Err(self.fail(e)),
        };
        debug!("located source {source} for track {track}");

        self.enter(State::ResolvingUrl);
        let quality = session.quality();
        let resolved = self.provider.resolve_url(&source, quality).await;
        let target = match resolved {
            Ok(Some(target)) => target,
            Ok(None) => return Err(self.fail(Error::unavailable("no url for quality"))),
            Err(e) => return Err(self.fail(e)),
        };
        debug!("resolved {quality} download url for track {track}");

        self.enter(State::Transferring);
        let transferred = self.provider.transfer(&target, track).await;
        if let Err(e) = transferred {
            return Err(self.fail(e));
        }

        self.enter(State::Completed);
        info!("download of track {track} completed");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use tokio::sync::mpsc;

    use super::*;
    use crate::{error::ErrorKind, protocol::metadata::Payload, track::TrackId};

    fn session_with_track() -> Session {
        let id: TrackId = "4uLU6hMCjMI75M1A2tKUQC".parse().unwrap();
        let payload = Payload {
            name: Some("Song".to_owned()),
            artist: Some("A".to_owned()),
            ..Payload::default()
        };
        let mut session = Session::new();
        session.load(Track::from_payload(id, payload).unwrap());
        session
    }

    /// Scripted provider that records which collaborators ran.
    struct Scripted {
        calls: Mutex<Vec<&'static str>>,
        source: Result<Option<SourceHandle>>,
        target: Result<Option<TransferTarget>>,
        transfer: Result<()>,
    }

    impl Scripted {
        fn happy() -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                source: Ok(Some(SourceHandle::new("demo", "test_catalog"))),
                target: Ok(Some(TransferTarget::new(
                    "https://cdn.example/dl/320/demo.mp3".parse().unwrap(),
                    Quality::Standard,
                ))),
                transfer: Ok(()),
            }
        }

        fn calls(&self) -> Vec<&'static str> {
            self.calls.lock().unwrap().clone()
        }
    }

    fn clone_result<T: Clone>(result: &Result<T>) -> Result<T> {
        match result {
            Ok(value) => Ok(value.clone()),
            Err(e) => Err(Error::new(e.kind, e.error.to_string())),
        }
    }

    impl Provider for &Scripted {
        fn locate_source(
            &self,
            _track: &Track,
        ) -> impl Future<Output = Result<Option<SourceHandle>>> + Send {
            self.calls.lock().unwrap().push("locate");
            let result = clone_result(&self.source);
            async move { result }
        }

        fn resolve_url(
            &self,
            _source: &SourceHandle,
            _quality: Quality,
        ) -> impl Future<Output = Result<Option<TransferTarget>>> + Send {
            self.calls.lock().unwrap().push("resolve");
            let result = clone_result(&self.target);
            async move { result }
        }

        fn transfer(
            &self,
            _target: &TransferTarget,
            _track: &Track,
        ) -> impl Future<Output = Result<()>> + Send {
            self.calls.lock().unwrap().push("transfer");
            let result = clone_result(&self.transfer);
            async move { result }
        }
    }

    #[tokio::test]
    async fn happy_path_walks_all_stages_in_order() {
        let provider = Scripted::happy();
        let (event_tx, mut event_rx) = mpsc::unbounded_channel();
        let mut downloader = Downloader::with_events(&provider, event_tx);

        downloader.start(&session_with_track()).await.unwrap();

        assert_eq!(downloader.state(), State::Completed);
        assert_eq!(provider.calls(), vec!["locate", "resolve", "transfer"]);

        let mut checkpoints = Vec::new();
        while let Ok(event) = event_rx.try_recv() {
            if let Event::Stage(state) = event {
                checkpoints.push(state.checkpoint());
            }
        }
        assert_eq!(checkpoints, vec![25, 50, 75, 100]);
    }

    #[tokio::test]
    async fn start_without_track_invokes_no_collaborator() {
        let provider = Scripted::happy();
        let mut downloader = Downloader::new(&provider);

        let err = downloader.start(&Session::new()).await.unwrap_err();

        assert_eq!(err.kind, ErrorKind::FailedPrecondition);
        assert_eq!(err.error.to_string(), "no track loaded");
        assert_eq!(downloader.state(), State::Failed);
        assert!(provider.calls().is_empty());
    }

    #[tokio::test]
    async fn missing_source_fails_before_url_resolution() {
        let mut provider = Scripted::happy();
        provider.source = Ok(None);
        let mut downloader = Downloader::new(&provider);

        let err = downloader.start(&session_with_track()).await.unwrap_err();

        assert_eq!(err.kind, ErrorKind::NotFound);
        assert_eq!(err.error.to_string(), "no source found");
        assert_eq!(provider.calls(), vec!["locate"]);
    }

    #[tokio::test]
    async fn missing_quality_url_fails_before_transfer() {
        let mut provider = Scripted::happy();
        provider.target = Ok(None);
        let mut downloader = Downloader::new(&provider);

        let err = downloader.start(&session_with_track()).await.unwrap_err();

        assert_eq!(err.error.to_string(), "no url for quality");
        assert_eq!(provider.calls(), vec!["locate", "resolve"]);
        assert_eq!(downloader.state(), State::Failed);
    }

    #[tokio::test]
    async fn transfer_error_carries_underlying_message() {
        let mut provider = Scripted::happy();
        provider.transfer = Err(Error::internal("connection reset"));
        let (event_tx, mut event_rx) = mpsc::unbounded_channel();
        let mut downloader = Downloader::with_events(&provider, event_tx);

        let err = downloader.start(&session_with_track()).await.unwrap_err();
        assert_eq!(err.error.to_string(), "connection reset");

        let mut failed = None;
        while let Ok(event) = event_rx.try_recv() {
            if let Event::Failed(reason) = event {
                failed = Some(reason);
            }
        }
        assert_eq!(failed.as_deref(), Some("internal error: connection reset"));
    }

    #[tokio::test]
    async fn restart_after_failure_begins_a_fresh_sequence() {
        let session = session_with_track();

        let failing = {
            let mut provider = Scripted::happy();
            provider.source = Ok(None);
            provider
        };
        let mut downloader = Downloader::new(&failing);
        assert!(downloader.start(&session).await.is_err());
        assert_eq!(downloader.state(), State::Failed);

        let provider = Scripted::happy();
        let mut downloader = Downloader::new(&provider);
        downloader.start(&session).await.unwrap();
        assert_eq!(downloader.state(), State::Completed);

        // The same orchestrator can also be restarted in place.
        downloader.start(&session).await.unwrap();
        assert_eq!(provider.calls(), vec![
            "locate", "resolve", "transfer", "locate", "resolve", "transfer",
        ]);
    }
}
