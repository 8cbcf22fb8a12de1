// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Process configuration loaded from environment variables.

use std::path::PathBuf;

/// Process-level settings that do not belong on the command line.
#[derive(Debug, Clone)]
pub struct Config {
    /// File that command failures are appended to.
    pub error_log: PathBuf,
    /// First id handed out when drawing recognised elements.
    pub first_drawn_id: u64,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            error_log: std::env::var("PLANREAD_ERROR_LOG")
                .unwrap_or_else(|_| "planread-error.log".into())
                .into(),
            first_drawn_id: std::env::var("PLANREAD_FIRST_DRAWN_ID")
                .unwrap_or_else(|_| "1000000".into())
                .parse()
                .unwrap_or(1_000_000),
        }
    }
}
