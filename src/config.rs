//! Tuning knobs for the resolution loop.
//!
//! Hosts pass this as JSON (or a JS object through `serde-wasm-bindgen`);
//! every field has a default, so `{}` is a valid configuration.

use serde::{Deserialize, Serialize};

/// How two overlapping constraints are combined over their intersection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntersectionRule {
    /// Only the subset-difference rule is applied.
    Disabled,
    /// Derive `A ∩ B = k` only when the mine count of the intersection is
    /// forced, i.e. its lower and upper bounds coincide.
    #[default]
    Bounded,
    /// Always derive `A ∩ B = min(a, b)`, clamped to `|A ∩ B|`.
    /// Not sound: it can mark safe cells as mines and then surface a
    /// contradiction later.
    MinCount,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InferenceConfig {
    pub intersection: IntersectionRule,
    /// Stop resolving after this many passes. `None` runs to the fixed point.
    pub max_passes: Option<usize>,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            intersection: IntersectionRule::Bounded,
            max_passes: None,
        }
    }
}
