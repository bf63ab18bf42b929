pub mod config;
pub mod sweep;
