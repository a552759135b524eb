pub mod app;
pub mod config;
pub mod controller;
pub mod plain_text;
pub mod render;
pub mod transport;
