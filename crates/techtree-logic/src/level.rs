//! Tech level: depth of the longest prerequisite chain.

use crate::tree::{Tree, TreeError};

impl Tree {
    /// Level of `id`, starting at 1 for nodes without prerequisites and
    /// one more than the deepest prerequisite otherwise.
    pub fn level(&self, id: &str) -> Result<u32, TreeError> {
        let mut cache = self.cache.borrow_mut();
        self.evaluate(
            id,
            &mut cache.levels,
            |_| None,
            |_, prereq_levels| 1 + prereq_levels.iter().copied().max().unwrap_or(0),
        )
    }
}
