//! Indexed priority queue: min-ordered by priority, addressable by key.
//!
//! Used twice by the guided sampler: for locally inconsistent vertices
//! (keyed by cell) and for the open list of edges (keyed by edge).
//! Pushing an existing key moves it to its new priority.

use std::collections::{BTreeSet, HashMap};
use std::hash::Hash;

use ordered_float::OrderedFloat;

/// Two-component vertex priority, compared lexicographically
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Key {
    pub k1: OrderedFloat<f64>,
    pub k2: OrderedFloat<f64>,
}

impl Key {
    pub fn new(k1: f64, k2: f64) -> Self {
        Self {
            k1: OrderedFloat(k1),
            k2: OrderedFloat(k2),
        }
    }
}

#[derive(Debug, Clone)]
pub struct IndexedPriorityQueue<K, P> {
    ordered: BTreeSet<(P, K)>,
    priorities: HashMap<K, P>,
}

impl<K, P> IndexedPriorityQueue<K, P>
where
    K: Copy + Ord + Hash,
    P: Copy + Ord,
{
    pub fn new() -> Self {
        Self {
            ordered: BTreeSet::new(),
            priorities: HashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.priorities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.priorities.is_empty()
    }

    pub fn contains(&self, key: K) -> bool {
        self.priorities.contains_key(&key)
    }

    pub fn priority(&self, key: K) -> Option<P> {
        self.priorities.get(&key).copied()
    }

    /// Insert `key`, or move it if already queued
    pub fn push(&mut self, key: K, priority: P) {
        if let Some(old) = self.priorities.insert(key, priority) {
            self.ordered.remove(&(old, key));
        }
        self.ordered.insert((priority, key));
    }

    pub fn remove(&mut self, key: K) -> Option<P> {
        let priority = self.priorities.remove(&key)?;
        self.ordered.remove(&(priority, key));
        Some(priority)
    }

    /// Minimum entry, ties broken by the smaller key
    pub fn peek(&self) -> Option<(K, P)> {
        self.ordered.iter().next().map(|&(p, k)| (k, p))
    }

    pub fn pop(&mut self) -> Option<(K, P)> {
        let (priority, key) = self.ordered.pop_first()?;
        self.priorities.remove(&key);
        Some((key, priority))
    }

    pub fn clear(&mut self) {
        self.ordered.clear();
        self.priorities.clear();
    }

    /// Entries in priority order
    pub fn iter(&self) -> impl Iterator<Item = (K, P)> + '_ {
        self.ordered.iter().map(|&(p, k)| (k, p))
    }
}

impl<K, P> Default for IndexedPriorityQueue<K, P>
where
    K: Copy + Ord + Hash,
    P: Copy + Ord,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_moves_existing_key() {
        let mut queue = IndexedPriorityQueue::new();
        queue.push(1usize, OrderedFloat(5.0));
        queue.push(2usize, OrderedFloat(3.0));
        assert_eq!(queue.peek(), Some((2, OrderedFloat(3.0))));

        queue.push(1, OrderedFloat(1.0));
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.pop(), Some((1, OrderedFloat(1.0))));
        assert_eq!(queue.pop(), Some((2, OrderedFloat(3.0))));
        assert!(queue.pop().is_none());
    }

    #[test]
    fn test_remove_and_ties() {
        let mut queue = IndexedPriorityQueue::new();
        queue.push(7usize, Key::new(2.0, 2.0));
        queue.push(3usize, Key::new(2.0, 2.0));
        queue.push(4usize, Key::new(2.0, 1.0));
        assert_eq!(queue.peek().map(|(k, _)| k), Some(4));
        assert_eq!(queue.remove(4), Some(Key::new(2.0, 1.0)));
        assert_eq!(queue.remove(4), None);
        // equal priorities fall back to key order
        assert_eq!(queue.peek().map(|(k, _)| k), Some(3));
        assert!(queue.contains(7));
    }

    #[test]
    fn test_infinite_priorities_sort_last() {
        let mut queue = IndexedPriorityQueue::new();
        queue.push(0usize, OrderedFloat(f64::INFINITY));
        queue.push(1usize, OrderedFloat(1e9));
        let order: Vec<usize> = queue.iter().map(|(k, _)| k).collect();
        assert_eq!(order, vec![1, 0]);
    }
}
