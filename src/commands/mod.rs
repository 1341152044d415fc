pub mod env;
pub mod models;
pub mod tui;
