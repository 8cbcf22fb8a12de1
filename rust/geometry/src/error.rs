// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

/// Result type for geometry operations
pub type Result<T> = std::result::Result<T, GeometryError>;

/// Errors that can occur in the geometry kernel
///
/// These are input-shape errors, not failures: callers turn them into an
/// "invalid" flag on the element that owns the geometry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GeometryError {
    /// A containment test needs a closed outline.
    #[error("polygon is not closed")]
    NotClosed,

    /// Too few distinct vertices to describe an area.
    #[error("degenerate polygon: {0} distinct vertices")]
    Degenerate(usize),
}
