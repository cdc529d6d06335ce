#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::unnecessary_literal_bound,
    clippy::module_name_repetitions,
    clippy::struct_field_names,
    clippy::must_use_candidate,
    clippy::new_without_default,
    clippy::return_self_not_must_use
)]

pub mod artifact;
pub mod config;
pub mod control;
pub mod error;
pub mod gate;
pub mod query;
pub mod scanner;
pub mod sensory;
pub mod stream;
pub mod vitals;
pub mod warden;

pub use config::Config;
pub use error::{Result, WardlineError};
