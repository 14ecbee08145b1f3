//! Score-explanation trees.

use serde::{Deserialize, Serialize};

use crate::search::size;

/// A diagnostic record of how a score was derived.
///
/// Present on a match only when explain mode was requested; owned
/// exclusively by that match.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Explanation {
    /// The score contribution this node accounts for.
    pub value: f64,
    /// Human-readable description of the contribution.
    pub message: String,
    /// Contributions this node was derived from.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Explanation>,
}

impl Explanation {
    /// Create a leaf explanation.
    pub fn new<S: Into<String>>(value: f64, message: S) -> Self {
        Explanation {
            value,
            message: message.into(),
            children: Vec::new(),
        }
    }

    /// Create an explanation derived from child contributions.
    pub fn with_children<S: Into<String>>(
        value: f64,
        message: S,
        children: Vec<Explanation>,
    ) -> Self {
        Explanation {
            value,
            message: message.into(),
            children,
        }
    }

    /// Structural estimate of this tree's heap footprint.
    pub fn size_in_bytes(&self) -> usize {
        let mut size_in_bytes =
            size::EXPLANATION_OVERHEAD + self.message.len() + size::SIZE_OF_SLICE;
        for child in &self.children {
            size_in_bytes += child.size_in_bytes();
        }
        size_in_bytes
    }
}
