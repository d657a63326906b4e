//! Synchronizes award entries into the Shotgun tracking service.
//!
//! [`EntrySynchronizer`] runs the per-entry phases against trait-object
//! collaborators; [`sync_one`] and [`sync_all`] are the outer entry points.
//! The REST client and HTTP slate renderer are behind the `http` feature.

mod details;
mod error;
mod locate;
mod media;
pub mod payload;
mod probe;
mod runner;
mod slate;
mod source;
mod synchronizer;
mod tracking;

#[cfg(feature = "http")]
pub mod http;

#[cfg(test)]
mod testkit;

pub use error::SyncError;
pub use locate::{ExportedMedia, MediaLocator};
pub use probe::{FfprobeProbe, MediaProbe};
pub use runner::{RunOutcome, SyncSummary, sync_all, sync_one};
pub use slate::{SlateRenderer, SlateVariant};
#[cfg(feature = "http")]
pub use slate::HttpSlateRenderer;
pub use source::EntrySource;
pub use synchronizer::{EntryStatus, EntrySynchronizer, Phase, PhaseOutcome, Phases, SyncReport};
pub use tracking::{TrackingClient, UPLOADED_MOVIE};
