//! Pure tech tree logic.
//!
//! This crate contains the research dependency engine and everything
//! derived from it, independent of any file system, UI, or runtime.
//! Functions take plain data (template JSON, localization text, parsed
//! saves) and return results, so they are unit-testable and reusable by any
//! front end.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`benefits`] | Optional per-tech benefit notes |
//! | [`catalog`] | Role groups, search, known list ordering |
//! | [`cost`] | Per-target and deduplicated batch science totals |
//! | [`effects`] | Effect descriptions, control point efficiency |
//! | [`known`] | Known-state toggling, clearing and save import |
//! | [`level`] | Tech level (longest prerequisite chain) |
//! | [`localization`] | `.en` localization line parser |
//! | [`modules`] | Ship modules indexed by unlocking project |
//! | [`node`] | Technology/project node model |
//! | [`orgs`] | Orgs indexed by unlocking tech, yield formatting |
//! | [`pinned`] | Ordered list of pinned research goals |
//! | [`requirements`] | Transitive prerequisite queries |
//! | [`save`] | Finished research extracted from a save |
//! | [`status`] | Known / available / locked classification |
//! | [`summary`] | Cost summaries and category totals |
//! | [`template`] | Technology/project template entries |
//! | [`tree`] | Node store, validation, memoized traversal |
//!
//! ```
//! use techtree_logic::{Status, Tree};
//!
//! let techs = r#"[
//!     {"dataName": "A", "researchCost": 10},
//!     {"dataName": "B", "researchCost": 20, "prereqs": ["A"]},
//!     {"dataName": "C", "researchCost": 30, "prereqs": ["A"]}
//! ]"#;
//! let mut tree = Tree::from_json(techs, "[]").unwrap();
//! assert_eq!(tree.missing_science("B").unwrap(), 30.0);
//! assert_eq!(tree.total_missing_science(&["B", "C"]).unwrap(), 60.0);
//!
//! tree.toggle_known("B").unwrap();
//! assert_eq!(tree.status("A").unwrap(), Status::Known);
//! ```

pub mod benefits;
pub mod catalog;
pub mod cost;
pub mod effects;
pub mod known;
pub mod level;
pub mod localization;
pub mod modules;
pub mod node;
pub mod orgs;
pub mod pinned;
pub mod requirements;
pub mod save;
pub mod status;
pub mod summary;
pub mod template;
pub mod tree;

pub use node::{NodeKind, ResourceGrant, TechNode};
pub use pinned::PinnedList;
pub use save::{FinishedResearch, SaveError};
pub use status::Status;
pub use summary::SummaryMode;
pub use tree::{Tree, TreeError};
