// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Error types for the configuration engines

use thiserror::Error;

/// Errors raised while identifying or migrating a config's schema version
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// The config has no `$schema` field (or it is not a string)
    #[error("Config has no $schema field")]
    SchemaMissing,

    /// The `$schema` string does not match the grapher schema URL pattern
    #[error("Invalid schema: {0}")]
    InvalidSchema(String),

    /// A migration step failed to advance the version tag
    #[error("Migration did not terminate: stuck at version {version} after {steps} steps")]
    MigrationDidNotTerminate {
        /// Version tag found after the offending step
        version: String,
        /// Number of migration steps applied before giving up
        steps: usize,
    },
}

/// Errors raised by the diff/merge entry points that accept arbitrary JSON
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatchError {
    /// An argument that must be a JSON object held something else
    #[error("Expected {argument} to be a JSON object, found {found}")]
    NotAnObject {
        /// Which argument was malformed (e.g. "parent", "patch")
        argument: &'static str,
        /// JSON type that was found instead
        found: &'static str,
    },
}

/// Crate-level error
#[derive(Debug, Error)]
pub enum Error {
    /// Schema identification or migration failure
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// Malformed diff/merge input
    #[error(transparent)]
    Patch(#[from] PatchError),

    /// JSON (de)serialization failure
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for library operations
pub type Result<T> = std::result::Result<T, Error>;

/// Name of a JSON value's type, for error messages
#[must_use]
pub fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
