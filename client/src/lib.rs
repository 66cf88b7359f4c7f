//! # Net-Worth Tracker Client
//!
//! Client-side counterpart of the backend API: a bearer-token HTTP
//! client, date-input utilities, and the entry form reconciliation
//! controller that drives the exact → before-date fallback sequence.

pub mod api;
pub mod date_utils;
pub mod form_controller;
