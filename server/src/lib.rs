pub extern crate actix_web;

pub mod config;
pub mod connection;
mod error;
pub mod handlers;
pub mod hub;
pub mod server_state;

pub use error::ApiError;
