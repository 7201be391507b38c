use crate::arena::{Arena, NodeId};
use std::cmp;

/// A struct representing an internal node of an avl tree.
///
/// Children are owned through the tree's arena; `parent` is a back-reference that never owns.
pub struct Node<T> {
    pub value: T,
    pub left: Option<NodeId>,
    pub right: Option<NodeId>,
    pub parent: Option<NodeId>,
}

impl<T> Node<T> {
    pub fn new(value: T) -> Self {
        Node {
            value,
            left: None,
            right: None,
            parent: None,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }
}

pub fn left_height<T>(arena: &Arena<Node<T>>, id: NodeId) -> usize {
    arena[id].left.map_or(0, |left| height(arena, left) + 1)
}

pub fn right_height<T>(arena: &Arena<Node<T>>, id: NodeId) -> usize {
    arena[id].right.map_or(0, |right| height(arena, right) + 1)
}

// Heights are recomputed from the subtree shape on every call.
pub fn height<T>(arena: &Arena<Node<T>>, id: NodeId) -> usize {
    cmp::max(left_height(arena, id), right_height(arena, id))
}

pub fn balance_factor<T>(arena: &Arena<Node<T>>, id: NodeId) -> isize {
    left_height(arena, id) as isize - right_height(arena, id) as isize
}

/// A read-only view of a single node in an `AvlTree`.
///
/// Obtained from `AvlTree::root` or `AvlTree::find`, it exposes the links and derived heights of
/// the node for diagnostics.
///
/// # Examples
///
/// ```
/// use avl_collections::AvlTree;
///
/// let mut tree = AvlTree::new();
/// tree.insert(5);
/// tree.insert(3);
/// tree.insert(8);
///
/// let root = tree.root().unwrap();
/// assert_eq!(root.value(), &5);
/// assert_eq!(root.left().map(|node| *node.value()), Some(3));
/// assert_eq!(root.height(), 1);
/// assert_eq!(root.balance_factor(), 0);
/// ```
pub struct NodeRef<'a, T>
where
    T: 'a,
{
    arena: &'a Arena<Node<T>>,
    id: NodeId,
}

impl<'a, T> Clone for NodeRef<'a, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, T> Copy for NodeRef<'a, T> {}

impl<'a, T> NodeRef<'a, T> {
    pub(crate) fn new(arena: &'a Arena<Node<T>>, id: NodeId) -> Self {
        NodeRef { arena, id }
    }

    fn node(&self) -> &'a Node<T> {
        &self.arena[self.id]
    }

    fn at(&self, id: Option<NodeId>) -> Option<NodeRef<'a, T>> {
        id.map(|id| NodeRef::new(self.arena, id))
    }

    /// Returns the handle identifying this node. Handles compare equal only for the same node.
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn value(&self) -> &'a T {
        &self.node().value
    }

    pub fn left(&self) -> Option<NodeRef<'a, T>> {
        self.at(self.node().left)
    }

    pub fn right(&self) -> Option<NodeRef<'a, T>> {
        self.at(self.node().right)
    }

    pub fn parent(&self) -> Option<NodeRef<'a, T>> {
        self.at(self.node().parent)
    }

    /// Returns the sibling of this node's parent. Returns `None` unless the grandparent exists and
    /// has two children.
    pub fn uncle(&self) -> Option<NodeRef<'a, T>> {
        let parent = self.node().parent?;
        let grandparent = &self.arena[self.arena[parent].parent?];
        match (grandparent.left, grandparent.right) {
            (Some(left), Some(right)) if left == parent => self.at(Some(right)),
            (Some(left), Some(_)) => self.at(Some(left)),
            _ => None,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.node().is_leaf()
    }

    pub fn left_height(&self) -> usize {
        left_height(self.arena, self.id)
    }

    pub fn right_height(&self) -> usize {
        right_height(self.arena, self.id)
    }

    /// Returns the number of edges on the longest downward path from this node. A leaf has height
    /// zero.
    pub fn height(&self) -> usize {
        height(self.arena, self.id)
    }

    /// Returns the left height minus the right height.
    pub fn balance_factor(&self) -> isize {
        balance_factor(self.arena, self.id)
    }
}
