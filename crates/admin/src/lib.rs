//! FreshCart Admin library.
//!
//! Back-office handlers, repositories and state, exposed as a library so the
//! binary only wires them together.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod routes;
pub mod state;
