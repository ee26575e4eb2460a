pub mod client;
pub mod config;
pub mod geocoding;
pub mod prompts;
pub mod state;
pub mod weather;
