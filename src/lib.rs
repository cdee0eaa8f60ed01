#![doc = "The `taskgate` library crate."]
#![doc = ""]
#![doc = "Personal task lists behind signed session tokens. The crate holds credential"]
#![doc = "hashing, token issuance and verification, the authentication middleware, the"]
#![doc = "task ownership policy, the persistence port with its adapters, and the HTTP"]
#![doc = "routes. The binary (`main.rs`) wires them together from `Config`."]

pub mod access;
pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod store;
pub mod validation;

pub use crate::config::Config;
pub use crate::error::AppError;
