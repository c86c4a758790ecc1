pub mod app;
pub mod commands;
pub mod config;
mod effects;
pub mod logging;
mod session;
mod ui;
