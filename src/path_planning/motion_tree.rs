//! Arena of tree motions addressed by stable handles
//!
//! Parent links are handles into the arena. A slot is only released by
//! cascading reclamation, which walks up the parent chain from an
//! inactive, childless motion and stops at the first motion that is
//! still active or still has children. Released slots are reused.

use crate::common::{Cost, PlanningError, PlanningResult};

/// Stable handle of a motion in a [`MotionTree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MotionId(usize);

impl MotionId {
    /// Rebuild a handle from an index stored in a nearest neighbor structure
    pub(crate) fn from_index(index: usize) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

/// Node of the exploration tree
#[derive(Debug, Clone)]
pub struct Motion<S, C> {
    pub state: S,
    /// Control that reached `state` from the parent
    pub control: C,
    /// Accumulated cost from the root
    pub cost: Cost,
    /// Number of steps `control` is applied for
    pub steps: u32,
    pub parent: Option<MotionId>,
    pub children: u32,
    /// Inactive motions are never selected and are reclaimed once childless
    pub inactive: bool,
}

impl<S, C> Motion<S, C> {
    pub fn root(state: S, control: C, cost: Cost) -> Self {
        Self {
            state,
            control,
            cost,
            steps: 0,
            parent: None,
            children: 0,
            inactive: false,
        }
    }

    pub fn child(state: S, control: C, cost: Cost, steps: u32, parent: MotionId) -> Self {
        Self {
            state,
            control,
            cost,
            steps,
            parent: Some(parent),
            children: 0,
            inactive: false,
        }
    }

    pub fn is_active(&self) -> bool {
        !self.inactive
    }
}

/// Sparsification marker holding the best motion of its neighborhood
#[derive(Debug, Clone)]
pub struct Witness<S> {
    /// Location the witness was created at
    pub state: S,
    pub representative: Option<MotionId>,
}

#[derive(Debug, Clone)]
pub struct MotionTree<S, C> {
    slots: Vec<Option<Motion<S, C>>>,
    free: Vec<usize>,
    live: usize,
}

impl<S, C> MotionTree<S, C> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            live: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    pub fn contains(&self, id: MotionId) -> bool {
        matches!(self.slots.get(id.0), Some(Some(_)))
    }

    pub fn get(&self, id: MotionId) -> Option<&Motion<S, C>> {
        self.slots.get(id.0).and_then(|s| s.as_ref())
    }

    pub fn get_mut(&mut self, id: MotionId) -> Option<&mut Motion<S, C>> {
        self.slots.get_mut(id.0).and_then(|s| s.as_mut())
    }

    /// Store a motion and count it as a child of its parent
    pub fn insert(&mut self, motion: Motion<S, C>) -> MotionId {
        if let Some(parent) = motion.parent.and_then(|p| self.get_mut(p)) {
            parent.children += 1;
        }
        self.live += 1;
        match self.free.pop() {
            Some(index) => {
                self.slots[index] = Some(motion);
                MotionId(index)
            }
            None => {
                self.slots.push(Some(motion));
                MotionId(self.slots.len() - 1)
            }
        }
    }

    pub fn deactivate(&mut self, id: MotionId) {
        if let Some(motion) = self.get_mut(id) {
            motion.inactive = true;
        }
    }

    /// Release `id` and its ancestors while they are inactive and childless.
    /// Returns the number of released motions.
    pub fn reclaim(&mut self, id: MotionId) -> usize {
        let mut released = 0;
        let mut current = Some(id);
        while let Some(cid) = current {
            let releasable = self
                .get(cid)
                .map_or(false, |m| m.inactive && m.children == 0);
            if !releasable {
                break;
            }
            let parent = self.slots[cid.0].take().and_then(|m| m.parent);
            self.free.push(cid.0);
            self.live -= 1;
            released += 1;
            if let Some(p) = parent.and_then(|p| self.get_mut(p)) {
                p.children -= 1;
            }
            current = parent;
        }
        released
    }

    /// Handles from the root down to `id`
    pub fn path_to_root(&self, id: MotionId) -> Vec<MotionId> {
        let mut path = Vec::new();
        let mut current = Some(id);
        while let Some(cid) = current {
            match self.get(cid) {
                Some(motion) => {
                    path.push(cid);
                    current = motion.parent;
                }
                None => break,
            }
        }
        path.reverse();
        path
    }

    pub fn iter(&self) -> impl Iterator<Item = (MotionId, &Motion<S, C>)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.as_ref().map(|m| (MotionId(i), m)))
    }

    pub fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.live = 0;
    }

    /// Structural checks: parent links point to live motions, child counts
    /// match, parent chains are acyclic, costs never decrease away from the
    /// root and no inactive childless motion is left unreclaimed.
    pub fn verify(&self) -> PlanningResult<()> {
        let mut child_counts = vec![0u32; self.slots.len()];
        for (id, motion) in self.iter() {
            if let Some(parent) = motion.parent {
                let p = self.get(parent).ok_or_else(|| {
                    PlanningError::InvariantViolation(format!(
                        "motion {} references freed parent {}",
                        id.0, parent.0
                    ))
                })?;
                if motion.cost.value() < p.cost.value() {
                    return Err(PlanningError::InvariantViolation(format!(
                        "motion {} is cheaper than its parent {}",
                        id.0, parent.0
                    )));
                }
                child_counts[parent.0] += 1;
            }
            if motion.inactive && motion.children == 0 {
                return Err(PlanningError::InvariantViolation(format!(
                    "inactive childless motion {} was not reclaimed",
                    id.0
                )));
            }
            let mut hops = 0;
            let mut current = motion.parent;
            while let Some(cid) = current {
                hops += 1;
                if hops > self.live {
                    return Err(PlanningError::InvariantViolation(format!(
                        "parent chain of motion {} contains a cycle",
                        id.0
                    )));
                }
                current = self.get(cid).and_then(|m| m.parent);
            }
        }
        for (id, motion) in self.iter() {
            if child_counts[id.0] != motion.children {
                return Err(PlanningError::InvariantViolation(format!(
                    "motion {} counts {} children but has {}",
                    id.0, motion.children, child_counts[id.0]
                )));
            }
        }
        Ok(())
    }
}

impl<S, C> Default for MotionTree<S, C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S, C> std::ops::Index<MotionId> for MotionTree<S, C> {
    type Output = Motion<S, C>;

    fn index(&self, id: MotionId) -> &Motion<S, C> {
        match self.get(id) {
            Some(motion) => motion,
            None => panic!("motion {} has been reclaimed", id.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain() -> (MotionTree<f64, ()>, Vec<MotionId>) {
        let mut tree = MotionTree::new();
        let root = tree.insert(Motion::root(0.0, (), Cost::new(0.0)));
        let a = tree.insert(Motion::child(1.0, (), Cost::new(1.0), 1, root));
        let b = tree.insert(Motion::child(2.0, (), Cost::new(2.0), 1, a));
        (tree, vec![root, a, b])
    }

    #[test]
    fn test_insert_counts_children() {
        let (tree, ids) = chain();
        assert_eq!(tree.len(), 3);
        assert_eq!(tree[ids[0]].children, 1);
        assert_eq!(tree[ids[1]].children, 1);
        assert_eq!(tree.path_to_root(ids[2]), ids);
        assert!(tree.verify().is_ok());
    }

    #[test]
    fn test_cascading_reclamation() {
        let (mut tree, ids) = chain();
        tree.deactivate(ids[1]);
        // still has a child, nothing to release
        assert_eq!(tree.reclaim(ids[1]), 0);
        tree.deactivate(ids[2]);
        assert_eq!(tree.reclaim(ids[2]), 2);
        assert_eq!(tree.len(), 1);
        assert!(!tree.contains(ids[1]));
        assert_eq!(tree[ids[0]].children, 0);
        assert!(tree.verify().is_ok());
    }

    #[test]
    fn test_reclaim_stops_at_active() {
        let (mut tree, ids) = chain();
        tree.deactivate(ids[2]);
        assert_eq!(tree.reclaim(ids[2]), 1);
        assert!(tree.contains(ids[1]));
        assert_eq!(tree[ids[1]].children, 0);
    }

    #[test]
    fn test_slots_are_reused() {
        let (mut tree, ids) = chain();
        tree.deactivate(ids[2]);
        tree.reclaim(ids[2]);
        let c = tree.insert(Motion::child(3.0, (), Cost::new(3.0), 1, ids[1]));
        assert_eq!(c, ids[2]);
        assert_eq!(tree[ids[1]].children, 1);
    }

    #[test]
    fn test_verify_flags_unreclaimed_motion() {
        let (mut tree, ids) = chain();
        tree.deactivate(ids[2]);
        assert!(matches!(tree.verify(), Err(PlanningError::InvariantViolation(_))));
    }
}
