pub mod app;
pub mod backend;
pub mod config;
pub mod error;
pub mod loader;
pub mod models;
pub mod mutator;
pub mod notify;
pub mod render;
