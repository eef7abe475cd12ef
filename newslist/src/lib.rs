// Library interface for newslist modules
// This allows tests and the binary to import modules

pub mod component;
pub mod error;
pub mod news;
pub mod render;
pub mod server;
pub mod service;
