//! Constants module for centralized configuration values

pub mod player;
pub mod routes;
