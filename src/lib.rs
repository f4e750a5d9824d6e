pub mod analysis_client;
pub mod api_connection;
pub mod app;
pub mod cli;
pub mod config;
pub mod logging;
pub mod nutrition;
pub mod render;
