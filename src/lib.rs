//! Classroom attendance tracker.
//!
//! Students submit attendance with a 4-digit verification code, lecturers
//! generate codes and read per-course analytics, and an admin reads the
//! aggregate statistics. Records and courses live in two JSON files under
//! the configured data directory.

pub mod api;
pub mod config;
pub mod db;
pub mod docs;
pub mod error;
pub mod model;
pub mod routes;
pub mod service;
pub mod state;
pub mod store;
