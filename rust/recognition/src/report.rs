// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Diagnostic counts of a recognition run

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecognitionReport {
    /// Entities handed to the run
    pub entities: usize,
    /// Entities on no configured layer, or of a kind the layer does not use
    pub ignored: usize,

    pub columns: usize,
    pub columns_invalid: usize,
    pub column_details: usize,
    pub column_details_skipped: usize,

    pub walls: usize,
    pub walls_single_line: usize,
    pub walls_unassigned: usize,
    pub wall_lines_discarded: usize,
    pub wall_types: usize,

    pub beams: usize,
    pub beams_bridged: usize,
    pub beams_cantilever: usize,
    pub beams_unresolved: usize,
    pub beam_lines_discarded: usize,
    pub span_rounds: usize,
    pub labels_applied: usize,
    pub labels_unmatched: usize,
}

impl RecognitionReport {
    /// Elements recognised as valid
    pub fn valid_elements(&self) -> usize {
        (self.columns - self.columns_invalid) + (self.walls - self.walls_single_line) + self.beams
    }
}

impl fmt::Display for RecognitionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "entities: {} read, {} ignored", self.entities, self.ignored)?;
        writeln!(
            f,
            "columns: {} ({} invalid), details: {} ({} skipped)",
            self.columns, self.columns_invalid, self.column_details, self.column_details_skipped
        )?;
        writeln!(
            f,
            "walls: {} ({} single-line, {} unassigned), {} lines discarded, {} wall types",
            self.walls,
            self.walls_single_line,
            self.walls_unassigned,
            self.wall_lines_discarded,
            self.wall_types
        )?;
        writeln!(
            f,
            "beams: {} ({} bridged, {} cantilever), {} unresolved, {} lines discarded, {} rounds",
            self.beams,
            self.beams_bridged,
            self.beams_cantilever,
            self.beams_unresolved,
            self.beam_lines_discarded,
            self.span_rounds
        )?;
        write!(
            f,
            "beam labels: {} applied, {} unmatched",
            self.labels_applied, self.labels_unmatched
        )
    }
}
