//! Fetch track metadata from a streaming catalog and drive a staged
//! download workflow.
//!
//! The crate is organized around one flow: [`resolver`] extracts a track
//! identifier from a pasted sharing URL, [`gateway`] fetches and
//! normalizes the metadata over an unreliable candidate endpoint chain,
//! [`session`] holds the single loaded record plus the quality
//! preference, and [`downloader`] runs the sequential locate, resolve
//! and transfer stages over pluggable collaborators.

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

#[macro_use]
extern crate log;

pub mod audio;
pub mod config;
pub mod downloader;
pub mod error;
pub mod events;
pub mod gateway;
pub mod http;
pub mod key;
pub mod protocol;
pub mod providers;
pub mod resolver;
pub mod session;
pub mod track;
