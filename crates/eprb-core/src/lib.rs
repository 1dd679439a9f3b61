pub mod config;
pub mod logging;

pub mod build_dir;
pub mod downloader;
pub mod http;
pub mod pipeline;
pub mod plan;
pub mod progress;
pub mod registry;
pub mod retry;
pub mod scaffold;
pub mod url_model;
pub mod verify;
