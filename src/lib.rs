#![doc = "The `taskdesk` library crate."]
#![doc = ""]
#![doc = "Users and tasks behind a JWT-protected REST API: credential hashing, token"]
#![doc = "issuance and verification, DTO projection, the services that tie them to the"]
#![doc = "database, and the actix-web route table. `main.rs` only wires these together."]

pub mod auth;
pub mod config;
pub mod db;
pub mod dto;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

pub use error::AppError;
pub use state::AppState;
