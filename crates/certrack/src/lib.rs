//! `certrack` - Track personal certification progress
//!
//! This library provides the record store, the add-certificate form and the
//! text views behind the `certrack` binary. Records are kept newest first and
//! mirrored as a JSON array into a key-value slot.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod certificate;
pub mod cli;
pub mod config;
pub mod error;
pub mod form;
pub mod logging;
pub mod storage;
pub mod store;
pub mod summary;
pub mod tracker;
pub mod view;

pub use certificate::{Certificate, Status, Tone};
pub use config::Config;
pub use error::{Error, Result};
pub use form::{Draft, Field};
pub use logging::init_logging;
pub use storage::{MemorySlot, Slot, SqliteSlot};
pub use store::RecordStore;
pub use summary::Summary;
pub use tracker::{Mode, Tracker};
