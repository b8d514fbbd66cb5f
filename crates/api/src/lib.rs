//! HTTP backend for the minicart store.
//!
//! Registration and login issue HS256 bearer tokens; the catalog is public
//! to read and admin-gated to write; order placement runs a single atomic
//! transaction; the admin surface exposes aggregates and user management.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
