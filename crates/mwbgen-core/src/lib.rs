#[macro_use]
mod macros;

pub mod config;
pub use config::Config;

mod error;
pub use error::Error;

pub mod schema;
pub use schema::{raw, Catalog};

pub mod template;

/// A Result type alias that uses mwbgen's [`Error`] type.
pub type Result<T> = core::result::Result<T, Error>;
