//! Database module for the SQLite result store.
//!
//! This module provides:
//! - Database initialization and migrations
//! - SQLite pragma configuration
//! - Repository layer for match result records

pub mod migrations;
pub mod repo;

pub use migrations::init_db;
pub use repo::Repository;
