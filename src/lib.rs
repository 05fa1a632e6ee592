#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::new_without_default,
    clippy::return_self_not_must_use
)]

pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod observability;
pub mod store;
pub mod versioning;

pub use config::{Config, ConfigHandle};
pub use error::{GateError, Result};
pub use versioning::{CheckMode, Decision, Record, StoreSnapshot, UpdateGate};
