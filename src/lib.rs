pub mod api;
pub mod app;
pub mod cli;
pub mod config;
pub mod console;
pub mod error;
pub mod logging;
pub mod models;
pub mod overlay;
pub mod scheduler;
pub mod signals;
pub mod store;
pub mod utils;
pub mod validation;
pub mod views;

pub use error::{Error, Result};

// Declare tests module only when testing
#[cfg(test)]
pub mod tests;
