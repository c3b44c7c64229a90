//! FreshCart Storefront library.
//!
//! Exposes the storefront's handlers and state as a library so the binary
//! stays a thin wiring layer and the pieces can be tested directly.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;
