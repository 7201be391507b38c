//! Ordering policies used to place values in a tree.

use std::cmp::Ordering;

/// A total order over values of type `T`.
///
/// Every placement and lookup decision a tree makes goes through its comparator. Any closure of
/// type `Fn(&T, &T) -> Ordering` is a comparator.
///
/// # Examples
///
/// ```
/// use avl_collections::{Comparator, Natural};
/// use std::cmp::Ordering;
///
/// assert_eq!(Natural.compare(&1, &2), Ordering::Less);
///
/// let by_len = |a: &&str, b: &&str| a.len().cmp(&b.len());
/// assert_eq!(by_len.compare(&"abc", &"de"), Ordering::Greater);
/// ```
pub trait Comparator<T> {
    fn compare(&self, a: &T, b: &T) -> Ordering;
}

/// The natural ordering of a type implementing `Ord`.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Natural;

impl<T> Comparator<T> for Natural
where
    T: Ord,
{
    fn compare(&self, a: &T, b: &T) -> Ordering {
        a.cmp(b)
    }
}

/// Inverts the ordering of another comparator.
///
/// # Examples
///
/// ```
/// use avl_collections::{AvlTree, Natural, Reverse};
///
/// let mut tree = AvlTree::with_comparator(Reverse(Natural));
/// tree.insert(1);
/// tree.insert(3);
/// tree.insert(2);
/// assert_eq!(tree.to_string(), "3,2,1");
/// ```
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Reverse<C>(pub C);

impl<T, C> Comparator<T> for Reverse<C>
where
    C: Comparator<T>,
{
    fn compare(&self, a: &T, b: &T) -> Ordering {
        self.0.compare(b, a)
    }
}

impl<T, F> Comparator<T> for F
where
    F: Fn(&T, &T) -> Ordering,
{
    fn compare(&self, a: &T, b: &T) -> Ordering {
        self(a, b)
    }
}
