//! Duplicate detection and removal.
//!
//! The pipeline has three stages, each usable on its own:
//! - [`group_duplicates`] - Partition materials into duplicate classes
//! - [`SlotRemap`] - Collapse duplicate slots and compact the list
//! - [`remove_duplicates`] - The batch operator tying both together

pub mod group;
pub mod operator;
pub mod remap;

pub use group::{group_duplicates, DuplicateGroup, DuplicateGroups};
pub use operator::{remove_duplicates, DedupOptions, DedupSummary};
pub use remap::SlotRemap;
