pub mod alerts;
pub mod backend;
pub mod cli;
pub mod config;
pub mod database;
pub mod error;
pub mod logging;
