//! Ambient support modules shared across the application.

/// Application configuration stored as JSON in the data directory.
pub mod config;

/// Platform-specific data directory resolution.
pub mod data_storage;

/// Typed in-process change notification bus.
pub mod events;

/// Centralized user-facing message catalog and output macros.
pub mod messages;

/// Terminal table rendering for list commands.
pub mod view;
