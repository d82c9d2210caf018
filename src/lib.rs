pub mod client;
pub mod config;
pub mod errors;
pub mod history;
pub mod payload;
pub mod services;
pub mod summary;

#[cfg(feature = "server")]
pub mod database;

#[cfg(feature = "server")]
pub mod server;
