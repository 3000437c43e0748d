use serde::{Deserialize, Serialize};

/// Options for building an instruction set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuilderConfig {
    /// Refuse to seal while any anchor is still unresolved.
    pub require_resolved_anchors: bool,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            require_resolved_anchors: true,
        }
    }
}

impl BuilderConfig {
    /// Seal even with pending anchors, logging a warning instead.
    pub fn relaxed() -> Self {
        Self {
            require_resolved_anchors: false,
        }
    }
}
