//! Events emitted while a download sequence advances.
//!
//! These events exist purely for user interface feedback, e.g. driving
//! a progress indicator; they are not a correctness signal. The
//! orchestrator emits them over an unbounded channel and never blocks
//! on a slow or absent consumer.

use crate::downloader::State;

/// Progress and outcome notifications for one download sequence.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum Event {
    /// The sequence entered a new stage.
    ///
    /// The stage's [`checkpoint`](State::checkpoint) gives the
    /// percentage to display.
    Stage(State),

    /// The sequence failed with a user-facing reason.
    Failed(String),
}
