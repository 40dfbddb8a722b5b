//! Activation Report - Collected Statistics Handed to the Caller
//!
//! [`ActivationStats`] maps each observed layer name to its [`StatRecord`].
//! It lives only in memory: `to_json` and the text rendering produce
//! strings for the caller, nothing is written to disk here.
//!
//! @version 0.1.0
//! @author AutomataNexus Development Team

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::SkewResult;
use crate::stats::StatRecord;

// =============================================================================
// ActivationStats
// =============================================================================

/// Statistics of every layer that was both selected and executed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActivationStats {
    layers: BTreeMap<String, StatRecord>,
}

impl ActivationStats {
    /// Creates an empty result set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a result set from raw records.
    pub fn from_records(records: HashMap<String, StatRecord>) -> Self {
        Self {
            layers: records.into_iter().collect(),
        }
    }

    /// Returns the record for `layer`.
    pub fn get(&self, layer: &str) -> Option<&StatRecord> {
        self.layers.get(layer)
    }

    /// Returns true if `layer` was recorded.
    pub fn contains(&self, layer: &str) -> bool {
        self.layers.contains_key(layer)
    }

    /// Returns the number of recorded layers.
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Returns true if no layer was recorded.
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Returns the recorded layer names in sorted order.
    pub fn layers(&self) -> Vec<&str> {
        self.layers.keys().map(String::as_str).collect()
    }

    /// Iterates over `(layer, record)` in sorted layer order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &StatRecord)> {
        self.layers.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Returns up to `n` layers ordered by descending `|skew|`.
    ///
    /// NaN skews sort last; ties keep layer-name order.
    pub fn most_skewed(&self, n: usize) -> Vec<(&str, &StatRecord)> {
        let mut ranked: Vec<(&str, &StatRecord)> = self.iter().collect();
        ranked.sort_by(|a, b| {
            let (sa, sb) = (a.1.skew.abs(), b.1.skew.abs());
            match (sa.is_nan(), sb.is_nan()) {
                (false, false) => sb.total_cmp(&sa),
                (a_nan, b_nan) => a_nan.cmp(&b_nan),
            }
        });
        ranked.truncate(n);
        ranked
    }

    /// Serializes the result set to pretty-printed JSON.
    ///
    /// Floats are written with full precision and non-finite values as
    /// string tags, so the output parses back into an equal result set.
    pub fn to_json(&self) -> SkewResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Renders a fixed-width text table.
    pub fn to_text(&self) -> String {
        let mut output = String::new();
        output.push_str("═══════════════════════════════════════════════════════════════════════════════════\n");
        output.push_str("                           Activation Statistics\n");
        output.push_str("═══════════════════════════════════════════════════════════════════════════════════\n");

        if self.is_empty() {
            output.push_str("  No layers recorded.\n");
            return output;
        }

        output.push_str(&format!(
            "  {:<28} {:>10} {:>10} {:>10} {:>10} {:>10}\n",
            "Layer", "Mean", "Std", "Min", "Max", "Skew"
        ));
        output.push_str("  ─────────────────────────────────────────────────────────────────────────────────\n");
        for (layer, r) in self.iter() {
            let name = if layer.chars().count() > 28 {
                let tail: String = layer.chars().skip(layer.chars().count() - 25).collect();
                format!("...{tail}")
            } else {
                layer.to_string()
            };
            output.push_str(&format!(
                "  {:<28} {:>10.4} {:>10.4} {:>10.4} {:>10.4} {:>10.4}\n",
                name, r.mean, r.std, r.min, r.max, r.skew
            ));
        }
        output
    }
}

impl fmt::Display for ActivationStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

impl IntoIterator for ActivationStats {
    type Item = (String, StatRecord);
    type IntoIter = std::collections::btree_map::IntoIter<String, StatRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.layers.into_iter()
    }
}

// =============================================================================
// Tests
// =============================================================================
