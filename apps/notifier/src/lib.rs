pub mod app;
pub mod bot_info;
pub mod config;
pub mod pipeline;
