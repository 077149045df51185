//! Brute-force nearest neighbor index
//!
//! Linear scan over all stored items. Adequate for the tree sizes SST*
//! keeps after pruning and used as the default index by the planner.

use itertools::Itertools;
use ordered_float::OrderedFloat;

use crate::common::NearestNeighbors;

#[derive(Debug, Clone)]
pub struct LinearNearestNeighbors<S> {
    items: Vec<(usize, S)>,
}

impl<S> LinearNearestNeighbors<S> {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn get(&self, id: usize) -> Option<&S> {
        self.items.iter().find(|(i, _)| *i == id).map(|(_, s)| s)
    }
}

impl<S> Default for LinearNearestNeighbors<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> NearestNeighbors<S> for LinearNearestNeighbors<S> {
    fn add(&mut self, id: usize, state: S) {
        self.items.push((id, state));
    }

    fn remove(&mut self, id: usize) -> bool {
        match self.items.iter().position(|(i, _)| *i == id) {
            Some(pos) => {
                self.items.swap_remove(pos);
                true
            }
            None => false,
        }
    }

    fn nearest<D>(&self, query: &S, distance: D) -> Option<usize>
    where
        D: Fn(&S, &S) -> f64,
    {
        self.items
            .iter()
            .min_by_key(|(_, s)| OrderedFloat(distance(query, s)))
            .map(|(id, _)| *id)
    }

    fn nearest_r<D>(&self, query: &S, radius: f64, distance: D) -> Vec<usize>
    where
        D: Fn(&S, &S) -> f64,
    {
        self.items
            .iter()
            .map(|(id, s)| (OrderedFloat(distance(query, s)), *id))
            .filter(|(d, _)| d.0 <= radius)
            .sorted()
            .map(|(_, id)| id)
            .collect()
    }

    fn nearest_k<D>(&self, query: &S, k: usize, distance: D) -> Vec<usize>
    where
        D: Fn(&S, &S) -> f64,
    {
        self.items
            .iter()
            .map(|(id, s)| (OrderedFloat(distance(query, s)), *id))
            .k_smallest(k)
            .map(|(_, id)| id)
            .collect()
    }

    fn len(&self) -> usize {
        self.items.len()
    }

    fn list(&self) -> Vec<usize> {
        self.items.iter().map(|(id, _)| *id).collect()
    }

    fn clear(&mut self) {
        self.items.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dist(a: &f64, b: &f64) -> f64 {
        (a - b).abs()
    }

    fn index() -> LinearNearestNeighbors<f64> {
        let mut nn = LinearNearestNeighbors::new();
        for (id, x) in [0.0, 1.0, 2.5, 4.0].iter().enumerate() {
            nn.add(id, *x);
        }
        nn
    }

    #[test]
    fn test_nearest() {
        let nn = index();
        assert_eq!(nn.nearest(&2.2, dist), Some(2));
        assert_eq!(LinearNearestNeighbors::<f64>::new().nearest(&0.0, dist), None);
    }

    #[test]
    fn test_nearest_r_sorted() {
        let nn = index();
        assert_eq!(nn.nearest_r(&0.8, 1.0, dist), vec![1, 0]);
        assert!(nn.nearest_r(&10.0, 1.0, dist).is_empty());
    }

    #[test]
    fn test_nearest_k_and_remove() {
        let mut nn = index();
        assert_eq!(nn.nearest_k(&3.9, 2, dist), vec![3, 2]);
        assert_eq!(nn.nearest_k(&3.9, 10, dist).len(), 4);
        assert!(nn.remove(3));
        assert!(!nn.remove(3));
        assert_eq!(nn.nearest_k(&3.9, 1, dist), vec![2]);
        assert_eq!(nn.len(), 3);
        nn.clear();
        assert!(nn.is_empty());
    }
}
