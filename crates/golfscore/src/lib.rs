//! `golfscore` - A golf scorecard with durable state
//!
//! This library keeps per-hole strokes for up to four players, saves the
//! round after every change, upgrades state files written by older builds,
//! stores named course layouts and appends finished rounds to a history log.
//!
//! # Example
//!
//! ```no_run
//! use golfscore::{Config, Scorecard};
//!
//! let config = Config::load()?;
//! let mut scorecard = Scorecard::open(&config);
//! scorecard.adjust_score(0, 0, 4);
//! println!("{}", scorecard.relative_label(0));
//! # Ok::<(), golfscore::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod course;
pub mod error;
pub mod history;
pub mod logging;
pub mod model;
pub mod scorecard;
pub mod storage;

pub use config::Config;
pub use course::CoursePreset;
pub use error::{Error, Result};
pub use history::{HistoryEntry, HistoryLog};
pub use logging::init_logging;
pub use model::RoundState;
pub use scorecard::{CourseAction, CourseOutcome, NoRefresh, RefreshListener, Scorecard};
pub use storage::{LoadOutcome, LoadReport, StateStore};
