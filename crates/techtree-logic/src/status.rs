//! Research status of a single node.

use serde::{Deserialize, Serialize};

use crate::tree::{Tree, TreeError};

/// Where a node stands in the research lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// Already researched.
    Known,
    /// Every direct prerequisite is known; can be researched now.
    Available,
    /// At least one direct prerequisite is still unknown.
    Locked,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Known => "known",
            Self::Available => "available",
            Self::Locked => "locked",
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Tree {
    /// Classify `id` from its own flag and its direct prerequisites.
    ///
    /// Only immediate prerequisites are inspected; the closure invariant
    /// maintained by the known-state mutations makes that sufficient.
    pub fn status(&self, id: &str) -> Result<Status, TreeError> {
        let node = self.get(id)?;
        if node.known {
            return Ok(Status::Known);
        }
        for prereq in &node.prereqs {
            if !self.get(prereq)?.known {
                return Ok(Status::Locked);
            }
        }
        Ok(Status::Available)
    }
}
