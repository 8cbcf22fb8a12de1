// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Recognition parameters and layer assignments

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{RecognitionError, Result};

/// A set of layer names, written as one comma-separated string.
///
/// Matching ignores ASCII case, as CAD layer tables do.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(from = "String", into = "String")]
pub struct LayerSet(Vec<String>);

impl LayerSet {
    pub fn parse(list: &str) -> Self {
        Self(
            list.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect(),
        )
    }

    pub fn contains(&self, layer: &str) -> bool {
        self.0.iter().any(|l| l.eq_ignore_ascii_case(layer.trim()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn names(&self) -> &[String] {
        &self.0
    }
}

impl From<String> for LayerSet {
    fn from(list: String) -> Self {
        Self::parse(&list)
    }
}

impl From<&str> for LayerSet {
    fn from(list: &str) -> Self {
        Self::parse(list)
    }
}

impl From<LayerSet> for String {
    fn from(set: LayerSet) -> Self {
        set.0.join(",")
    }
}

/// Which layers hold which kind of source geometry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LayerConfig {
    /// Closed column outlines
    pub columns: LayerSet,
    /// Column tag texts
    pub column_tags: LayerSet,
    /// Column detail outlines (drawn enlarged)
    pub column_details: LayerSet,
    /// Column detail name texts
    pub column_detail_names: LayerSet,
    /// Wall edge lines
    pub walls: LayerSet,
    /// Wall tag texts
    pub wall_tags: LayerSet,
    /// Beam edge lines
    pub beams: LayerSet,
    /// Beam dimension labels ("300x600")
    pub beam_labels: LayerSet,
}

impl Default for LayerConfig {
    fn default() -> Self {
        Self {
            columns: LayerSet::parse("COLU,S-COLS"),
            column_tags: LayerSet::parse("COLU_TEXT,S-COLS-IDEN"),
            column_details: LayerSet::parse("COLU_DETAIL,S-COLS-DETL"),
            column_detail_names: LayerSet::parse("COLU_DETAIL_TEXT,S-COLS-DETL-IDEN"),
            walls: LayerSet::parse("WALL,S-WALL"),
            wall_tags: LayerSet::parse("WALL_TEXT,S-WALL-IDEN"),
            beams: LayerSet::parse("BEAM,S-BEAM"),
            beam_labels: LayerSet::parse("BEAM_TEXT,S-BEAM-IDEN"),
        }
    }
}

/// Layers recognised elements are drawn on
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ResultLayers {
    pub columns: String,
    pub walls: String,
    pub beams: String,
    /// In-place beam annotations
    pub beam_labels: String,
    /// Invalid elements of any kind
    pub invalid: String,
}

impl Default for ResultLayers {
    fn default() -> Self {
        Self {
            columns: "PR-COLUMN".into(),
            walls: "PR-WALL".into(),
            beams: "PR-BEAM".into(),
            beam_labels: "PR-BEAM-TEXT".into(),
            invalid: "PR-INVALID".into(),
        }
    }
}

/// Recognition configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RecognitionConfig {
    pub layers: LayerConfig,
    pub result_layers: ResultLayers,
    /// Widest wall thickness accepted when pairing wall lines
    pub max_wall_width: f64,
    /// Widest beam accepted when pairing beam lines
    pub beam_max_width: f64,
    /// Two parallel lines closer than this (exclusive) are not a pair
    pub min_pair_width: f64,
    /// Height given to beams without a dimension label
    pub default_beam_height: f64,
    /// Scale at which column details are drawn relative to the plan
    pub column_multiple: f64,
    /// Offset and gap tolerance when merging collinear fragments
    pub merge_tolerance: f64,
    /// Perpendicular offset under which beam pieces count as one line
    pub alignment_tolerance: f64,
    /// Vertex tolerance when matching columns against details
    pub shape_tolerance: f64,
    /// How far a tag may sit from the element it names
    pub label_search_radius: f64,
    /// Merge passes per component list
    pub merge_passes: usize,
    /// Round budget for span resolution
    pub max_span_rounds: usize,
    /// Keep unpaired wall lines as invalid single-line walls
    pub keep_unpaired_as_invalid: bool,
    /// Prepended to exported names
    pub name_prefix: String,
    /// Appended to exported names
    pub name_postfix: String,
}

impl Default for RecognitionConfig {
    fn default() -> Self {
        Self {
            layers: LayerConfig::default(),
            result_layers: ResultLayers::default(),
            max_wall_width: 400.0,
            beam_max_width: 600.0,
            min_pair_width: 140.0,
            default_beam_height: 500.0,
            column_multiple: 5.0,
            merge_tolerance: 5.0,
            alignment_tolerance: 10.0,
            shape_tolerance: 5.0,
            label_search_radius: 1500.0,
            merge_passes: 5,
            max_span_rounds: 15,
            keep_unpaired_as_invalid: true,
            name_prefix: String::new(),
            name_postfix: String::new(),
        }
    }
}

impl RecognitionConfig {
    /// Parses a JSON document; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Endpoints within this distance of a support are supported.
    pub fn support_tolerance(&self) -> f64 {
        self.max_wall_width / 2.0
    }

    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("max_wall_width", self.max_wall_width),
            ("beam_max_width", self.beam_max_width),
            ("default_beam_height", self.default_beam_height),
            ("column_multiple", self.column_multiple),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(RecognitionError::InvalidConfig(format!(
                    "{} must be positive, got {}",
                    name, value
                )));
            }
        }

        let non_negative = [
            ("min_pair_width", self.min_pair_width),
            ("merge_tolerance", self.merge_tolerance),
            ("alignment_tolerance", self.alignment_tolerance),
            ("shape_tolerance", self.shape_tolerance),
            ("label_search_radius", self.label_search_radius),
        ];
        for (name, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(RecognitionError::InvalidConfig(format!(
                    "{} must not be negative, got {}",
                    name, value
                )));
            }
        }

        if self.max_wall_width <= self.min_pair_width {
            return Err(RecognitionError::InvalidConfig(format!(
                "max_wall_width ({}) must exceed min_pair_width ({})",
                self.max_wall_width, self.min_pair_width
            )));
        }
        if self.beam_max_width <= self.min_pair_width {
            return Err(RecognitionError::InvalidConfig(format!(
                "beam_max_width ({}) must exceed min_pair_width ({})",
                self.beam_max_width, self.min_pair_width
            )));
        }
        if self.merge_passes == 0 || self.max_span_rounds == 0 {
            return Err(RecognitionError::InvalidConfig(
                "merge_passes and max_span_rounds must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
