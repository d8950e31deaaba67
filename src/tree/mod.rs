//! Reference Trees
//!
//! Reconstructs the directory hierarchy of one reference from the flat,
//! parent-first listing printed by `git ls-tree -r -t`.

pub mod builder;
pub mod listing;
pub mod node;
pub mod path;
pub mod source;

pub use builder::TreeBuilder;
pub use listing::{parse_listing, LsTreeEntry};
pub use node::{EntryKind, NodeId, NodeRef, RefTree, Traverse};
pub use source::{ListingSource, StaticListing};
