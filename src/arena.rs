//! Chunked slab that owns every node of a tree and hands out copyable handles.

use std::mem;
use std::ops::{Index, IndexMut};

/// Number of slots allocated per chunk unless a tree is configured otherwise.
pub const DEFAULT_CHUNK_SIZE: usize = 1024;

/// A handle to a slot in an `Arena<T>`.
///
/// Two handles are equal exactly when they name the same slot, so handle equality is node identity.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct NodeId {
    chunk: usize,
    slot: usize,
}

enum Slot<T> {
    Occupied(T),
    Vacant(Option<NodeId>),
}

/// A slab allocator for a single type of object.
///
/// Storage grows one chunk at a time and existing chunks are never moved, so a `NodeId` stays valid
/// until its slot is removed. Removed slots are threaded onto a free list and reused by the next
/// insertion.
pub struct Arena<T> {
    free_head: Option<NodeId>,
    chunks: Vec<Vec<Slot<T>>>,
    chunk_size: usize,
    len: usize,
    capacity: usize,
}

impl<T> Arena<T> {
    /// Constructs a new, empty `Arena<T>` that allocates `chunk_size` slots at a time.
    ///
    /// # Panics
    ///
    /// Panics if `chunk_size` is zero.
    pub fn new(chunk_size: usize) -> Self {
        assert!(chunk_size > 0, "Error: arena chunk size must be non-zero.");
        Arena {
            free_head: None,
            chunks: Vec::new(),
            chunk_size,
            len: 0,
            capacity: 0,
        }
    }

    fn slot(&self, id: NodeId) -> Option<&Slot<T>> {
        self.chunks.get(id.chunk).and_then(|chunk| chunk.get(id.slot))
    }

    fn slot_mut(&mut self, id: NodeId) -> Option<&mut Slot<T>> {
        self.chunks.get_mut(id.chunk).and_then(|chunk| chunk.get_mut(id.slot))
    }

    /// Stores `value` and returns the handle of its slot.
    pub fn insert(&mut self, value: T) -> NodeId {
        if self.len == self.capacity {
            self.chunks.push(Vec::with_capacity(self.chunk_size));
            self.capacity += self.chunk_size;
        }
        self.len += 1;

        match self.free_head.take() {
            None => {
                let chunk = self.chunks.len() - 1;
                let last_chunk = &mut self.chunks[chunk];
                last_chunk.push(Slot::Occupied(value));
                NodeId {
                    chunk,
                    slot: last_chunk.len() - 1,
                }
            },
            Some(id) => {
                let vacant = match self.slot_mut(id) {
                    Some(slot) => mem::replace(slot, Slot::Occupied(value)),
                    None => unreachable!(),
                };
                match vacant {
                    Slot::Vacant(next) => {
                        self.free_head = next;
                        id
                    },
                    Slot::Occupied(_) => panic!("Error: free list points at an occupied slot."),
                }
            },
        }
    }

    /// Vacates the slot named by `id` and returns the object it held.
    ///
    /// # Panics
    ///
    /// Panics if `id` names an invalid or vacant slot.
    pub fn remove(&mut self, id: NodeId) -> T {
        let next = self.free_head;
        let old_slot = match self.slot_mut(id) {
            Some(slot) => mem::replace(slot, Slot::Vacant(next)),
            None => panic!("Error: attempting to remove invalid slot."),
        };
        match old_slot {
            Slot::Occupied(value) => {
                self.len -= 1;
                self.free_head = Some(id);
                value
            },
            Slot::Vacant(next) => {
                // restore the slot before reporting the misuse
                if let Some(slot) = self.slot_mut(id) {
                    *slot = Slot::Vacant(next);
                }
                panic!("Error: attempting to remove vacant slot.");
            },
        }
    }

    /// Returns an immutable reference to the object in slot `id`, or `None` if the slot is invalid
    /// or vacant.
    pub fn get(&self, id: NodeId) -> Option<&T> {
        match self.slot(id) {
            Some(Slot::Occupied(value)) => Some(value),
            _ => None,
        }
    }

    /// Returns a mutable reference to the object in slot `id`, or `None` if the slot is invalid or
    /// vacant.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut T> {
        match self.slot_mut(id) {
            Some(Slot::Occupied(value)) => Some(value),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Drops every stored object and releases all chunks.
    pub fn clear(&mut self) {
        self.free_head = None;
        self.chunks.clear();
        self.len = 0;
        self.capacity = 0;
    }
}

impl<T> Index<NodeId> for Arena<T> {
    type Output = T;

    fn index(&self, id: NodeId) -> &Self::Output {
        self.get(id).expect("Error: node handle out of bounds.")
    }
}

impl<T> IndexMut<NodeId> for Arena<T> {
    fn index_mut(&mut self, id: NodeId) -> &mut Self::Output {
        self.get_mut(id).expect("Error: node handle out of bounds.")
    }
}
