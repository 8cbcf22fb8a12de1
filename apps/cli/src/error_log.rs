// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Persistent log of command failures.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};

/// One log line: seconds since the epoch, the command, then the error chain.
pub fn format_entry(timestamp: u64, command: &str, error: &anyhow::Error) -> String {
    let chain: Vec<String> = error.chain().map(|cause| cause.to_string()).collect();
    format!("[{}] {}: {}\n", timestamp, command, chain.join(": "))
}

/// Appends `error` to the log at `path`, creating the file if needed.
pub fn append(path: &Path, command: &str, error: &anyhow::Error) -> Result<()> {
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open error log {}", path.display()))?;
    file.write_all(format_entry(timestamp, command, error).as_bytes())
        .context("Failed to write error log")?;
    Ok(())
}
