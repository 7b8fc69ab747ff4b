//! Modules layer - Infrastructure components for external integrations
//!
//! Contains the storage backends used for uploaded files.

pub mod storage;
