pub mod config;
pub mod drawer;
mod error;
pub mod keyword;
pub mod pipeline;
pub mod ranker;
pub mod seed;
pub mod torrent;
pub use error::{Error, Result};
