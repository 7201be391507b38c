use crate::arena::{Arena, NodeId, DEFAULT_CHUNK_SIZE};
use crate::avl_tree::node::{self, Node, NodeRef};
use crate::comparator::{Comparator, Natural};
use crate::error::{Error, Result};
use log::{debug, trace};
use std::cmp::Ordering;
use std::fmt;
use std::iter::FromIterator;
use std::mem;

/// An ordered set of values stored in an avl tree.
///
/// An avl tree is a self-balancing binary search tree that maintains the invariant that the
/// heights of the two child subtrees of any node differ by at most one. Every node also keeps a
/// non-owning link to its parent. Nodes live in an arena and refer to each other by `NodeId`.
///
/// Values are ordered by the tree's `Comparator`. Inserting a value that compares equal to a
/// stored value keeps the stored value and leaves the tree unchanged.
///
/// # Examples
///
/// ```
/// use avl_collections::{AvlTree, Error};
///
/// let mut tree = AvlTree::new();
/// tree.insert(5);
/// tree.insert(3);
/// tree.insert(8);
///
/// assert!(tree.contains(&3));
/// assert_eq!(tree.to_string(), "3,5,8");
///
/// assert_eq!(tree.remove(&3), Ok(3));
/// assert_eq!(tree.remove(&3), Err(Error::ValueNotFound));
/// ```
pub struct AvlTree<T, C = Natural> {
    arena: Arena<Node<T>>,
    root: Option<NodeId>,
    comparator: C,
}

impl<T> AvlTree<T, Natural>
where
    T: Ord,
{
    /// Constructs a new, empty `AvlTree<T>` ordered by `T`'s natural ordering.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_collections::AvlTree;
    ///
    /// let tree: AvlTree<u32> = AvlTree::new();
    /// assert!(tree.is_empty());
    /// ```
    pub fn new() -> Self {
        AvlTree::with_comparator(Natural)
    }
}

impl<T, C> AvlTree<T, C>
where
    C: Comparator<T>,
{
    /// Constructs a new, empty `AvlTree<T, C>` ordered by `comparator`.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_collections::AvlTree;
    ///
    /// let mut tree = AvlTree::with_comparator(|a: &i32, b: &i32| b.cmp(a));
    /// tree.insert(1);
    /// tree.insert(2);
    /// assert_eq!(tree.to_string(), "2,1");
    /// ```
    pub fn with_comparator(comparator: C) -> Self {
        AvlTree::with_comparator_and_chunk_size(comparator, DEFAULT_CHUNK_SIZE)
    }

    /// Constructs a new, empty `AvlTree<T, C>` ordered by `comparator` whose node storage grows
    /// `chunk_size` nodes at a time.
    ///
    /// # Panics
    ///
    /// Panics if `chunk_size` is zero.
    pub fn with_comparator_and_chunk_size(comparator: C, chunk_size: usize) -> Self {
        AvlTree {
            arena: Arena::new(chunk_size),
            root: None,
            comparator,
        }
    }

    // Links `child` into the left slot of `id`. The displaced child, if any, loses its parent.
    fn set_left(&mut self, id: NodeId, child: Option<NodeId>) {
        if let Some(old) = mem::replace(&mut self.arena[id].left, child) {
            self.arena[old].parent = None;
        }
        if let Some(child) = child {
            self.arena[child].parent = Some(id);
        }
    }

    fn set_right(&mut self, id: NodeId, child: Option<NodeId>) {
        if let Some(old) = mem::replace(&mut self.arena[id].right, child) {
            self.arena[old].parent = None;
        }
        if let Some(child) = child {
            self.arena[child].parent = Some(id);
        }
    }

    fn take_left(&mut self, id: NodeId) -> Option<NodeId> {
        let left = self.arena[id].left;
        self.set_left(id, None);
        left
    }

    fn take_right(&mut self, id: NodeId) -> Option<NodeId> {
        let right = self.arena[id].right;
        self.set_right(id, None);
        right
    }

    // Detaches `child` from `parent`. Returns `false` if `child` is not a child of `parent`.
    fn remove_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        if self.arena[parent].left == Some(child) {
            self.set_left(parent, None);
            true
        } else if self.arena[parent].right == Some(child) {
            self.set_right(parent, None);
            true
        } else {
            false
        }
    }

    // Puts `replacement` into whichever slot of `parent` holds `old`. Returns `false` if `old` is
    // not a child of `parent`.
    fn replace_child(&mut self, parent: NodeId, old: NodeId, replacement: NodeId) -> bool {
        if self.arena[parent].left == Some(old) {
            self.set_left(parent, Some(replacement));
            true
        } else if self.arena[parent].right == Some(old) {
            self.set_right(parent, Some(replacement));
            true
        } else {
            false
        }
    }

    // Hangs `subtree` where `old` used to be: under `old`'s former parent, or as the root.
    fn reattach(&mut self, old_parent: Option<NodeId>, old: NodeId, subtree: NodeId) {
        match old_parent {
            Some(parent) => {
                let replaced = self.replace_child(parent, old, subtree);
                debug_assert!(replaced, "rotated node was not a child of its parent");
            },
            None => {
                self.arena[subtree].parent = None;
                self.root = Some(subtree);
            },
        }
    }

    fn rotate_left_left(&mut self, root: NodeId) {
        trace!("left-left rotation at {:?}", root);
        let parent = self.arena[root].parent;
        let left = match self.take_left(root) {
            Some(left) => left,
            None => unreachable!(),
        };

        self.reattach(parent, root, left);

        let left_right = self.take_right(left);
        self.set_left(root, left_right);
        self.set_right(left, Some(root));
    }

    fn rotate_right_right(&mut self, root: NodeId) {
        trace!("right-right rotation at {:?}", root);
        let parent = self.arena[root].parent;
        let right = match self.take_right(root) {
            Some(right) => right,
            None => unreachable!(),
        };

        self.reattach(parent, root, right);

        let right_left = self.take_left(right);
        self.set_right(root, right_left);
        self.set_left(right, Some(root));
    }

    fn rotate_left_right(&mut self, root: NodeId) {
        trace!("left-right rotation at {:?}", root);
        let left = match self.take_left(root) {
            Some(left) => left,
            None => unreachable!(),
        };
        let left_right = match self.take_right(left) {
            Some(left_right) => left_right,
            None => unreachable!(),
        };

        // the left subtree of left_right stays below left
        let left_right_left = self.take_left(left_right);
        self.set_right(left, left_right_left);

        self.set_left(root, Some(left_right));
        self.set_left(left_right, Some(left));

        self.rotate_left_left(root);
    }

    fn rotate_right_left(&mut self, root: NodeId) {
        trace!("right-left rotation at {:?}", root);
        let right = match self.take_right(root) {
            Some(right) => right,
            None => unreachable!(),
        };
        let right_left = match self.take_left(right) {
            Some(right_left) => right_left,
            None => unreachable!(),
        };

        let right_left_right = self.take_right(right_left);
        self.set_left(right, right_left_right);

        self.set_right(root, Some(right_left));
        self.set_right(right_left, Some(right));

        self.rotate_right_right(root);
    }

    // Restores the balance invariant at `id`, assuming both of its subtrees already satisfy it.
    fn balance(&mut self, id: NodeId) {
        let balance_factor = node::balance_factor(&self.arena, id);

        if balance_factor > 1 {
            let left = match self.arena[id].left {
                Some(left) => left,
                None => unreachable!(),
            };
            if node::balance_factor(&self.arena, left) >= 0 {
                self.rotate_left_left(id);
            } else {
                self.rotate_left_right(id);
            }
        } else if balance_factor < -1 {
            let right = match self.arena[id].right {
                Some(right) => right,
                None => unreachable!(),
            };
            if node::balance_factor(&self.arena, right) <= 0 {
                self.rotate_right_right(id);
            } else {
                self.rotate_right_left(id);
            }
        }
    }

    // Balances `start` and every node above it. Parents are read after balancing so that a node
    // lifted by a rotation is visited before the walk continues upward.
    fn balance_to_root(&mut self, start: Option<NodeId>) {
        let mut curr = start;
        while let Some(id) = curr {
            self.balance(id);
            curr = self.arena[id].parent;
        }
    }

    fn find_id(&self, value: &T) -> Option<NodeId> {
        let mut curr = self.root;
        while let Some(id) = curr {
            let node = &self.arena[id];
            curr = match self.comparator.compare(value, &node.value) {
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
                Ordering::Equal => return Some(id),
            };
        }
        None
    }

    fn find_min(&self, mut id: NodeId) -> NodeId {
        while let Some(left) = self.arena[id].left {
            id = left;
        }
        id
    }

    fn find_max(&self, mut id: NodeId) -> NodeId {
        while let Some(right) = self.arena[id].right {
            id = right;
        }
        id
    }

    /// Inserts a value into the tree. Returns `true` if a new node was created, or `false` if a
    /// value comparing equal to `value` is already stored. In that case the stored value is kept
    /// and `value` is dropped.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_collections::AvlTree;
    ///
    /// let mut tree = AvlTree::new();
    /// assert!(tree.insert(1));
    /// assert!(!tree.insert(1));
    /// assert_eq!(tree.len(), 1);
    /// ```
    pub fn insert(&mut self, value: T) -> bool {
        let mut curr = match self.root {
            Some(root) => root,
            None => {
                self.root = Some(self.arena.insert(Node::new(value)));
                return true;
            },
        };

        let new_id = loop {
            let ordering = self.comparator.compare(&value, &self.arena[curr].value);
            let Node { left, right, .. } = self.arena[curr];
            match ordering {
                Ordering::Less => match left {
                    Some(left) => curr = left,
                    None => {
                        let new_id = self.arena.insert(Node::new(value));
                        self.set_left(curr, Some(new_id));
                        break new_id;
                    },
                },
                Ordering::Greater => match right {
                    Some(right) => curr = right,
                    None => {
                        let new_id = self.arena.insert(Node::new(value));
                        self.set_right(curr, Some(new_id));
                        break new_id;
                    },
                },
                Ordering::Equal => return false,
            }
        };

        self.balance_to_root(Some(new_id));
        true
    }

    /// Returns a view of the node storing a value equal to `value`, or `None` if there is none.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_collections::AvlTree;
    ///
    /// let mut tree = AvlTree::new();
    /// tree.insert(1);
    /// tree.insert(2);
    /// assert_eq!(tree.find(&2).map(|node| *node.value()), Some(2));
    /// assert!(tree.find(&3).is_none());
    /// ```
    pub fn find(&self, value: &T) -> Option<NodeRef<T>> {
        self.find_id(value).map(|id| NodeRef::new(&self.arena, id))
    }

    /// Checks if a value comparing equal to `value` exists in the tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_collections::AvlTree;
    ///
    /// let mut tree = AvlTree::new();
    /// tree.insert(1);
    /// assert!(!tree.contains(&0));
    /// assert!(tree.contains(&1));
    /// ```
    pub fn contains(&self, value: &T) -> bool {
        self.find_id(value).is_some()
    }

    // Removes a node with at most one child from the tree and returns its value. The root keeps
    // its identity: when it has a single child, that child's contents are moved up into it.
    fn unlink(&mut self, id: NodeId) -> T {
        let (parent, child) = {
            let node = &self.arena[id];
            debug_assert!(node.left.is_none() || node.right.is_none());
            (node.parent, node.left.or(node.right))
        };

        match (parent, child) {
            (Some(parent), None) => {
                let removed = self.remove_child(parent, id);
                debug_assert!(removed, "unlinked node was not a child of its parent");
            },
            (Some(parent), Some(child)) => {
                let replaced = self.replace_child(parent, id, child);
                debug_assert!(replaced, "unlinked node was not a child of its parent");
            },
            (None, None) => self.root = None,
            (None, Some(child)) => {
                self.arena[id].left = None;
                self.arena[id].right = None;
                let Node {
                    value, left, right, ..
                } = self.arena.remove(child);
                self.set_left(id, left);
                self.set_right(id, right);
                return mem::replace(&mut self.arena[id].value, value);
            },
        }

        self.arena.remove(id).value
    }

    /// Removes a value from the tree and returns the stored value that compared equal to it.
    ///
    /// # Errors
    ///
    /// Returns `Error::ValueNotFound` if no such value exists, in which case the tree is left
    /// unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_collections::{AvlTree, Error};
    ///
    /// let mut tree = AvlTree::new();
    /// tree.insert(1);
    /// assert_eq!(tree.remove(&1), Ok(1));
    /// assert_eq!(tree.remove(&1), Err(Error::ValueNotFound));
    /// ```
    pub fn remove(&mut self, value: &T) -> Result<T> {
        let id = match self.find_id(value) {
            Some(id) => id,
            None => {
                debug!("remove: value not found");
                return Err(Error::ValueNotFound);
            },
        };

        let (removed, rebalance_from) = match (self.arena[id].left, self.arena[id].right) {
            (Some(_), Some(right)) => {
                // the in-order successor has no left child, so it can be unlinked directly
                let successor = self.find_min(right);
                let successor_parent = self.arena[successor].parent;
                let successor_value = self.unlink(successor);
                let removed = mem::replace(&mut self.arena[id].value, successor_value);
                (removed, successor_parent)
            },
            _ => {
                let parent = self.arena[id].parent;
                let removed = self.unlink(id);
                (removed, parent.or(self.root))
            },
        };

        self.balance_to_root(rebalance_from);
        Ok(removed)
    }

    /// Returns the number of values in the tree.
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    /// Returns `true` if the tree holds no values.
    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Clears the tree, removing all values.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_collections::AvlTree;
    ///
    /// let mut tree = AvlTree::new();
    /// tree.insert(1);
    /// tree.insert(2);
    /// tree.clear();
    /// assert!(tree.is_empty());
    /// ```
    pub fn clear(&mut self) {
        self.arena.clear();
        self.root = None;
    }

    /// Returns a view of the root node, or `None` if the tree is empty.
    pub fn root(&self) -> Option<NodeRef<T>> {
        self.root.map(|id| NodeRef::new(&self.arena, id))
    }

    /// Returns the height of the tree, counted in edges, or `None` if the tree is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_collections::AvlTree;
    ///
    /// let tree: AvlTree<u32> = (1..=7).collect();
    /// assert_eq!(tree.height(), Some(2));
    /// ```
    pub fn height(&self) -> Option<usize> {
        self.root.map(|id| node::height(&self.arena, id))
    }

    /// Returns the minimum value of the tree, or `None` if the tree is empty.
    pub fn min(&self) -> Option<&T> {
        self.root.map(|id| &self.arena[self.find_min(id)].value)
    }

    /// Returns the maximum value of the tree, or `None` if the tree is empty.
    pub fn max(&self) -> Option<&T> {
        self.root.map(|id| &self.arena[self.find_max(id)].value)
    }

    /// Returns an iterator over the tree. The iterator yields values using in-order traversal.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_collections::AvlTree;
    ///
    /// let mut tree = AvlTree::new();
    /// tree.insert(3);
    /// tree.insert(1);
    ///
    /// let mut iterator = tree.iter();
    /// assert_eq!(iterator.next(), Some(&1));
    /// assert_eq!(iterator.next(), Some(&3));
    /// assert_eq!(iterator.next(), None);
    /// ```
    pub fn iter(&self) -> AvlTreeIter<T> {
        AvlTreeIter {
            arena: &self.arena,
            next: self.root.map(|id| self.find_min(id)),
            remaining: self.len(),
        }
    }

    /// Returns the values of the tree in in-order traversal order.
    pub fn traverse_in_order(&self) -> Vec<&T> {
        self.iter().collect()
    }

    /// Checks the ordering, balance and parent link invariants of every node.
    ///
    /// # Panics
    ///
    /// Panics if any invariant is violated.
    pub fn assert_invariants(&self) {
        if let Some(root) = self.root {
            assert!(self.arena[root].parent.is_none(), "root has a parent");
            let count = self.assert_invariants_at(root);
            assert_eq!(count, self.len(), "node count does not match tree length");
        } else {
            assert_eq!(self.len(), 0, "empty tree still owns nodes");
        }
    }

    // Returns the number of nodes in the subtree rooted at `id`.
    fn assert_invariants_at(&self, id: NodeId) -> usize {
        let node = &self.arena[id];
        let balance_factor = node::balance_factor(&self.arena, id);
        assert!(
            balance_factor.abs() <= 1,
            "balance factor {} out of range",
            balance_factor,
        );

        let mut count = 1;
        if let Some(left) = node.left {
            assert_eq!(self.arena[left].parent, Some(id), "left child parent link is stale");
            let max = &self.arena[self.find_max(left)].value;
            assert_eq!(self.comparator.compare(max, &node.value), Ordering::Less);
            count += self.assert_invariants_at(left);
        }
        if let Some(right) = node.right {
            assert_eq!(self.arena[right].parent, Some(id), "right child parent link is stale");
            let min = &self.arena[self.find_min(right)].value;
            assert_eq!(self.comparator.compare(min, &node.value), Ordering::Greater);
            count += self.assert_invariants_at(right);
        }
        count
    }
}

/// An iterator for `AvlTree<T, C>`.
///
/// This iterator traverses the values of the tree in-order by following parent links, and yields
/// immutable references.
pub struct AvlTreeIter<'a, T>
where
    T: 'a,
{
    arena: &'a Arena<Node<T>>,
    next: Option<NodeId>,
    remaining: usize,
}

impl<'a, T> AvlTreeIter<'a, T>
where
    T: 'a,
{
    fn successor(&self, mut id: NodeId) -> Option<NodeId> {
        if let Some(mut curr) = self.arena[id].right {
            while let Some(left) = self.arena[curr].left {
                curr = left;
            }
            return Some(curr);
        }

        while let Some(parent) = self.arena[id].parent {
            if self.arena[parent].left == Some(id) {
                return Some(parent);
            }
            id = parent;
        }
        None
    }
}

impl<'a, T> Iterator for AvlTreeIter<'a, T>
where
    T: 'a,
{
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next?;
        self.next = self.successor(id);
        self.remaining -= 1;
        Some(&self.arena[id].value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T> ExactSizeIterator for AvlTreeIter<'a, T> where T: 'a {}

impl<'a, T, C> IntoIterator for &'a AvlTree<T, C>
where
    T: 'a,
    C: Comparator<T>,
{
    type Item = &'a T;
    type IntoIter = AvlTreeIter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T, C> fmt::Display for AvlTree<T, C>
where
    T: fmt::Display,
    C: Comparator<T>,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (index, value) in self.iter().enumerate() {
            if index > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}", value)?;
        }
        Ok(())
    }
}

impl<T, C> fmt::Debug for AvlTree<T, C>
where
    T: fmt::Debug,
    C: Comparator<T>,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T> Default for AvlTree<T, Natural>
where
    T: Ord,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T, C> Extend<T> for AvlTree<T, C>
where
    C: Comparator<T>,
{
    fn extend<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = T>,
    {
        for value in iter {
            self.insert(value);
        }
    }
}

impl<T> FromIterator<T> for AvlTree<T, Natural>
where
    T: Ord,
{
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        let mut tree = AvlTree::new();
        tree.extend(iter);
        tree
    }
}

#[cfg(test)]
mod tests {
    use super::AvlTree;
    use crate::comparator::Reverse;
    use crate::error::Error;

    fn values(tree: &AvlTree<u32>) -> Vec<u32> {
        tree.iter().cloned().collect()
    }

    fn root_value(tree: &AvlTree<u32>) -> Option<u32> {
        tree.root().map(|node| *node.value())
    }

    #[test]
    fn test_len_empty() {
        let tree: AvlTree<u32> = AvlTree::new();
        assert_eq!(tree.len(), 0);
        assert!(tree.is_empty());
        assert_eq!(tree.height(), None);
        assert!(tree.root().is_none());
        assert_eq!(tree.to_string(), "");
    }

    #[test]
    fn test_min_max_empty() {
        let tree: AvlTree<u32> = AvlTree::new();
        assert_eq!(tree.min(), None);
        assert_eq!(tree.max(), None);
    }

    #[test]
    fn test_insert_three() {
        let mut tree = AvlTree::new();
        tree.insert(5);
        tree.insert(3);
        tree.insert(8);

        assert_eq!(values(&tree), vec![3, 5, 8]);
        let root = tree.root().unwrap();
        assert_eq!(root.value(), &5);
        assert_eq!(root.balance_factor(), 0);
        tree.assert_invariants();
    }

    #[test]
    fn test_insert_duplicate() {
        let mut tree = AvlTree::new();
        assert!(tree.insert(1));
        assert!(tree.insert(2));
        assert!(!tree.insert(1));
        assert_eq!(tree.len(), 2);
        assert_eq!(values(&tree), vec![1, 2]);
    }

    #[test]
    fn test_insert_ascending() {
        let mut tree = AvlTree::new();
        for i in 1..=7 {
            tree.insert(i);
            tree.assert_invariants();
        }
        assert_eq!(tree.height(), Some(2));
        assert_eq!(root_value(&tree), Some(4));
        assert_eq!(values(&tree), vec![1, 2, 3, 4, 5, 6, 7]);
    }

    #[test]
    fn test_insert_descending() {
        let mut tree = AvlTree::new();
        for i in (1..=7).rev() {
            tree.insert(i);
            tree.assert_invariants();
        }
        assert_eq!(tree.height(), Some(2));
        assert_eq!(root_value(&tree), Some(4));
    }

    #[test]
    fn test_rotate_left_left() {
        let mut tree = AvlTree::new();
        tree.insert(3);
        tree.insert(2);
        tree.insert(1);

        let root = tree.root().unwrap();
        assert_eq!(root.value(), &2);
        assert_eq!(root.left().map(|node| *node.value()), Some(1));
        assert_eq!(root.right().map(|node| *node.value()), Some(3));
        tree.assert_invariants();
    }

    #[test]
    fn test_rotate_left_right() {
        let mut tree = AvlTree::new();
        tree.insert(3);
        tree.insert(1);
        tree.insert(2);

        let root = tree.root().unwrap();
        assert_eq!(root.value(), &2);
        assert_eq!(root.left().map(|node| *node.value()), Some(1));
        assert_eq!(root.right().map(|node| *node.value()), Some(3));
        let left_parent = root.left().and_then(|node| node.parent());
        assert_eq!(left_parent.map(|node| node.id()), Some(root.id()));
        tree.assert_invariants();
    }

    #[test]
    fn test_rotate_right_left() {
        let mut tree = AvlTree::new();
        tree.insert(1);
        tree.insert(3);
        tree.insert(2);

        let root = tree.root().unwrap();
        assert_eq!(root.value(), &2);
        assert_eq!(root.left().map(|node| *node.value()), Some(1));
        assert_eq!(root.right().map(|node| *node.value()), Some(3));
        tree.assert_invariants();
    }

    #[test]
    fn test_rotate_below_root_in_right_slot() {
        // 10 -> (5, 20 -> (30 -> (40))) forces a rotation under the root's right slot
        let mut tree = AvlTree::new();
        for &value in &[10, 5, 20, 30, 40] {
            tree.insert(value);
        }
        tree.assert_invariants();
        assert_eq!(root_value(&tree), Some(10));
        let right = tree.root().and_then(|node| node.right()).unwrap();
        assert_eq!(right.value(), &30);
        assert_eq!(right.left().map(|node| *node.value()), Some(20));
        assert_eq!(right.right().map(|node| *node.value()), Some(40));
    }

    #[test]
    fn test_rotate_left_right_moves_inner_subtree() {
        let mut tree = AvlTree::new();
        for &value in &[50, 30, 70, 20, 40, 35, 45] {
            tree.insert(value);
        }
        tree.insert(33);
        tree.assert_invariants();
        assert_eq!(values(&tree), vec![20, 30, 33, 35, 40, 45, 50, 70]);
        assert_eq!(root_value(&tree), Some(40));
    }

    #[test]
    fn test_find() {
        let mut tree = AvlTree::new();
        for i in 0..10 {
            tree.insert(i * 2);
        }
        for i in 0..10 {
            assert_eq!(tree.find(&(i * 2)).map(|node| *node.value()), Some(i * 2));
            assert!(tree.find(&(i * 2 + 1)).is_none());
        }
    }

    #[test]
    fn test_remove_leaf() {
        let mut tree = AvlTree::new();
        tree.insert(2);
        tree.insert(1);
        tree.insert(3);
        assert_eq!(tree.remove(&1), Ok(1));
        assert_eq!(values(&tree), vec![2, 3]);
        tree.assert_invariants();
    }

    #[test]
    fn test_remove_only_value() {
        let mut tree = AvlTree::new();
        tree.insert(1);
        assert_eq!(tree.remove(&1), Ok(1));
        assert!(tree.is_empty());
        assert!(!tree.contains(&1));
        tree.assert_invariants();

        tree.insert(2);
        assert_eq!(values(&tree), vec![2]);
    }

    #[test]
    fn test_remove_root_with_one_child_keeps_root_identity() {
        let mut tree = AvlTree::new();
        tree.insert(1);
        tree.insert(2);
        let root_id = tree.root().map(|node| node.id());

        assert_eq!(tree.remove(&1), Ok(1));
        assert_eq!(tree.root().map(|node| node.id()), root_id);
        assert_eq!(root_value(&tree), Some(2));
        assert!(tree.root().unwrap().is_leaf());
        tree.assert_invariants();
    }

    #[test]
    fn test_remove_single_child() {
        let mut tree = AvlTree::new();
        for &value in &[5, 3, 8, 9] {
            tree.insert(value);
        }
        assert_eq!(tree.remove(&8), Ok(8));
        assert_eq!(values(&tree), vec![3, 5, 9]);
        let right = tree.root().and_then(|node| node.right()).unwrap();
        assert_eq!(right.value(), &9);
        assert_eq!(right.parent().map(|node| *node.value()), Some(5));
        tree.assert_invariants();
    }

    #[test]
    fn test_remove_two_children_successor_chain() {
        let mut tree = AvlTree::new();
        for &value in &[10, 20, 30, 40, 50, 25] {
            tree.insert(value);
        }
        assert_eq!(tree.remove(&30), Ok(30));
        assert!(!tree.contains(&30));
        assert_eq!(values(&tree), vec![10, 20, 25, 40, 50]);
        tree.assert_invariants();
    }

    #[test]
    fn test_remove_two_children_successor_is_right_child() {
        let mut tree = AvlTree::new();
        for &value in &[2, 1, 3] {
            tree.insert(value);
        }
        assert_eq!(tree.remove(&2), Ok(2));
        assert_eq!(root_value(&tree), Some(3));
        assert_eq!(values(&tree), vec![1, 3]);
        tree.assert_invariants();
    }

    #[test]
    fn test_remove_missing() {
        let mut tree = AvlTree::new();
        for &value in &[4, 2, 6] {
            tree.insert(value);
        }
        assert_eq!(tree.remove(&5), Err(Error::ValueNotFound));
        assert_eq!(tree.to_string(), "2,4,6");
        assert_eq!(tree.len(), 3);
    }

    #[test]
    fn test_remove_rebalances_below_root() {
        let mut tree: AvlTree<u32> = (1..=12).collect();
        tree.assert_invariants();
        for value in &[1, 3, 2] {
            assert!(tree.remove(value).is_ok());
            tree.assert_invariants();
        }
    }

    #[test]
    fn test_remove_all() {
        let mut tree: AvlTree<u32> = (0..64).collect();
        for i in (0..64).rev() {
            assert_eq!(tree.remove(&i), Ok(i));
            tree.assert_invariants();
        }
        assert!(tree.is_empty());
    }

    #[test]
    fn test_min_max() {
        let tree: AvlTree<u32> = vec![4, 1, 9, 3].into_iter().collect();
        assert_eq!(tree.min(), Some(&1));
        assert_eq!(tree.max(), Some(&9));
    }

    #[test]
    fn test_iter() {
        let tree: AvlTree<u32> = vec![5, 1, 3].into_iter().collect();
        assert_eq!(tree.iter().len(), 3);
        assert_eq!(tree.iter().collect::<Vec<&u32>>(), vec![&1, &3, &5]);
        assert_eq!((&tree).into_iter().count(), 3);
        assert_eq!(tree.traverse_in_order(), vec![&1, &3, &5]);
    }

    #[test]
    fn test_display_and_debug() {
        let tree: AvlTree<u32> = vec![8, 3, 5].into_iter().collect();
        assert_eq!(tree.to_string(), "3,5,8");
        assert_eq!(format!("{:?}", tree), "{3, 5, 8}");
    }

    #[test]
    fn test_clear() {
        let mut tree: AvlTree<u32> = (0..10).collect();
        tree.clear();
        assert!(tree.is_empty());
        assert_eq!(tree.len(), 0);
        assert!(!tree.contains(&3));
    }

    #[test]
    fn test_custom_comparator() {
        let by_len = |a: &&str, b: &&str| a.len().cmp(&b.len());
        let mut tree = AvlTree::with_comparator(Reverse(by_len));
        tree.insert("a");
        tree.insert("abc");
        tree.insert("ab");
        assert!(!tree.insert("xy"));
        assert!(tree.contains(&"zz"));
        assert_eq!(tree.to_string(), "abc,ab,a");
        tree.assert_invariants();
    }

    #[test]
    fn test_small_chunks() {
        let mut tree = AvlTree::with_comparator_and_chunk_size(crate::Natural, 2);
        for i in 0..20u32 {
            tree.insert(i);
        }
        for i in 0..10u32 {
            assert_eq!(tree.remove(&(i * 2)), Ok(i * 2));
        }
        tree.assert_invariants();
        assert_eq!(tree.len(), 10);
    }
}
