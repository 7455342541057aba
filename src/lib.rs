//! Pull translations from a Tolgee project into a generated TypeScript
//! resource module.

pub mod api;
pub mod archive;
pub mod config;
pub mod consistency;
pub mod error;
pub mod icu;
pub mod languages;
pub mod pull;
pub mod resources;
pub mod writer;

pub use error::{PullError, Result};
