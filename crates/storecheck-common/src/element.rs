use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque reference to a live element, minted by the session that found it.
///
/// Handles are only meaningful inside the session and page they came from.
/// Navigation invalidates every handle; callers re-resolve instead of keeping
/// handles around between interactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementHandle {
    id: u32,
}

impl ElementHandle {
    pub fn new(id: u32) -> Self {
        Self { id }
    }

    pub fn id(&self) -> u32 {
        self.id
    }
}

impl fmt::Display for ElementHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "element#{}", self.id)
    }
}
