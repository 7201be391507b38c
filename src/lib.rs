//! An avl tree with parent links, backed by an arena of nodes and ordered by a pluggable
//! comparator.

mod arena;
pub mod avl_tree;
mod comparator;
mod error;

pub use crate::arena::{NodeId, DEFAULT_CHUNK_SIZE};
pub use crate::avl_tree::{AvlTree, AvlTreeIter, NodeRef};
pub use crate::comparator::{Comparator, Natural, Reverse};
pub use crate::error::{Error, Result};
