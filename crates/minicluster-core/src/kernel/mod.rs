//! # minicluster Kernel
//!
//! Process-wide constants and the umbrella [`Error`] type. Structural
//! failures from every subsystem (registry construction, dependency
//! resolution, configuration loading) convert into [`Error`] so callers can
//! use a single `Result` alias at the top level.
pub mod constants;
pub mod error;

pub use error::{Error, Result};
