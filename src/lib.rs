pub mod cache;
pub mod config;
pub mod export;
pub mod fetch;
pub mod loader;
pub mod process;
pub mod stats;
