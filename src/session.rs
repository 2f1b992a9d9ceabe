//! Session state for the fetch and download workflows.
//!
//! A [`Session`] holds at most one fetched track record together with the
//! active quality preference. It is created at startup, mutated only
//! through its operations, and injected into the workflows rather than
//! accessed as ambient state. There is no history and no queue: a new
//! fetch replaces the record wholesale.

use crate::{audio::Quality, track::Track};

/// The single mutable slot shared by the fetch and download workflows.
#[derive(Clone, Debug, Default)]
pub struct Session {
    track: Option<Track>,
    quality: Quality,
}

impl Session {
    /// Creates an empty session with the default quality preference.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a freshly fetched record, replacing any prior one.
    ///
    /// Loading does not touch the quality preference.
    pub fn load(&mut self, track: Track) {
        debug!("loading track {track}");
        self.track = Some(track);
    }

    /// Discards the held record and resets the quality preference.
    pub fn clear(&mut self) {
        self.track = None;
        self.quality = Quality::default();
    }

    /// Replaces the active quality preference.
    ///
    /// Independent of the loaded record: changing quality never triggers
    /// a re-fetch.
    pub fn set_quality(&mut self, quality: Quality) {
        self.quality = quality;
    }

    /// The active quality preference.
    #[must_use]
    pub fn quality(&self) -> Quality {
        self.quality
    }

    /// The currently loaded record, if any.
    #[must_use]
    pub fn current(&self) -> Option<&Track> {
        self.track.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::metadata::Payload;

    fn track(title: &str) -> Track {
        let payload = Payload {
            name: Some(title.to_owned()),
            ..Payload::default()
        };
        Track::from_payload("4uLU6hMCjMI75M1A2tKUQC".parse().unwrap(), payload).unwrap()
    }

    #[test]
    fn load_replaces_prior_record() {
        let mut session = Session::new();
        assert!(session.current().is_none());

        session.load(track("First"));
        session.load(track("Second"));
        assert_eq!(session.current().unwrap().title(), "Second");
    }

    #[test]
    fn clear_resets_quality_to_default() {
        let mut session = Session::new();
        session.load(track("Song"));
        session.set_quality(Quality::Lossless);

        session.clear();
        assert!(session.current().is_none());
        assert_eq!(session.quality(), Quality::Standard);
    }

    #[test]
    fn quality_is_independent_of_the_record() {
        let mut session = Session::new();
        session.set_quality(Quality::Low);
        assert_eq!(session.quality(), Quality::Low);
        assert!(session.current().is_none());

        session.load(track("Song"));
        assert_eq!(session.quality(), Quality::Low);
    }
}
