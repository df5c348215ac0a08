pub mod api_client;
pub mod config;
pub mod constants;
pub mod logging;
pub mod services;
pub mod testing;
pub mod time;
