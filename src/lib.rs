pub mod types;
pub mod status;
pub mod error;
pub mod colors;
pub mod config;
pub mod data;
pub mod filter;
pub mod map;
pub mod table;
pub mod render;
pub mod dashboard;
pub mod server;
