//! # IO Module
//!
//! The HTTP boundary: bearer-token authentication, the API error type,
//! and the REST handlers.

pub mod auth;
pub mod error;
pub mod rest;
