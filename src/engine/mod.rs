pub mod chain;
pub mod config;
pub mod game;
pub mod server;
pub mod target;
