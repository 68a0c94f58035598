//! Bikeshare API - station and trip-history records with filtering, field
//! selection, pagination and grouped aggregation.
//!
//! This library exposes the core modules for testing and reuse.

pub mod common;
pub mod config;
pub mod entity;
pub mod error;
pub mod import;
pub mod query;
pub mod records;
pub mod routes;
pub mod services;
