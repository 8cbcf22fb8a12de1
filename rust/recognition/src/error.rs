// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for recognition runs.
//!
//! Bad geometry never surfaces here: an element that cannot be read is kept
//! and flagged invalid. These errors cover the run's inputs and outputs.

/// Result type alias for recognition operations.
pub type Result<T> = std::result::Result<T, RecognitionError>;

/// Errors that can occur around a recognition run.
#[derive(Debug, thiserror::Error)]
pub enum RecognitionError {
    /// Reading a snapshot or configuration file failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// A snapshot, configuration or export document is malformed.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration values are out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A layer set required by the requested operation is empty.
    #[error("no layers configured for {0}")]
    UnknownLayerSet(&'static str),
}
