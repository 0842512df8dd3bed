pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod exchange;
pub mod geometry;

pub use error::{FormatError, RasError, Result};
