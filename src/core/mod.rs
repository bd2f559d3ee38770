pub mod commands;
pub mod config;
pub mod console;
pub mod state;
