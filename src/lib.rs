//! Pollconf - option composition and connection preparation for event loops
//!
//! Callers describe an event loop with an ordered list of [`LoopOption`]s.
//! The service constructor folds them once into read-only [`Options`] and
//! turns those into the lifecycle hook run for every accepted connection.
//! Process-wide poller knobs go through the [`Tuning`] handle.

#![deny(unsafe_op_in_unsafe_fn)]
#![warn(missing_docs, clippy::all, clippy::pedantic, clippy::cargo)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::multiple_crate_versions
)]

pub mod config;
pub mod connection;
pub mod engine;
pub mod error;
pub mod options;
pub mod tuning;

pub use connection::{Connection, Context, OnPrepare, OnRequest};
pub use error::{PollconfError, Result};
pub use options::{with_idle_timeout, with_on_prepare, with_read_timeout, LoopOption, Options};
pub use tuning::{LoadBalance, PollerTuning, Tuning};
