//! Shared lexical helpers for markup documents.

pub mod fence;
pub mod tags;

pub use fence::{body_start, leading_fence, Fence, FenceScan};
pub use tags::{elements, Attribute, Element};
