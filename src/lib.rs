pub mod config;
pub mod engine;
pub mod error;
pub mod games;
pub mod server;
pub mod service;
pub mod store;
