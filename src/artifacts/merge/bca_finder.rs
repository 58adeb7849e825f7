//! Best common ancestor (merge base) finder
//!
//! Finds the merge base used as the reference point of a three-way merge.
//!
//! ## Algorithm Overview
//!
//! ### Phase 1: Find All Common Ancestors
//!
//! Both histories are painted at once, walking commits from the highest
//! generation number down. Parents always have a lower generation than their
//! children, so by the time a commit is popped every descendant in the walk has
//! already handed its flags down:
//! - Commits reached from the source get `VISITED_FROM_SOURCE`
//! - Commits reached from the target get `VISITED_FROM_TARGET`
//! - A commit carrying both becomes a `RESULT` and its ancestors are painted
//!   `STALE`, since anything below a common ancestor is a worse candidate
//! - The walk stops once only stale commits are left in the queue
//!
//! ### Phase 2: Filter to Best Common Ancestors
//!
//! > A best common ancestor of commits X and Y is any common ancestor of X and Y
//! > that is not an ancestor of any other common ancestor.
//!
//! ### Phase 3: Pick One
//!
//! The candidate with the highest generation wins. Criss-cross histories can
//! leave several candidates with the same generation; the tie goes to the one
//! a breadth-first walk from the target reaches first. When the best ancestor
//! is unique this agrees with the simple "first breadth-first hit" rule, but
//! unlike that rule it never returns a farther ancestor in diamond-shaped
//! histories.

use crate::artifacts::objects::commit::SlimCommit;
use crate::artifacts::objects::object_id::CommitId;
use bitflags::bitflags;
use std::collections::{BinaryHeap, HashMap, HashSet, VecDeque};
use std::fmt;
use tracing::trace;

bitflags! {
    #[derive(Clone, Copy, PartialEq, Eq, Hash)]
    struct VisitState: u8 {
        const NONE = 0b00;
        const VISITED_FROM_SOURCE = 0b01;
        const VISITED_FROM_TARGET = 0b10;
        const VISITED_FROM_BOTH = Self::VISITED_FROM_SOURCE.bits() | Self::VISITED_FROM_TARGET.bits();
        const STALE = 0b100;
        const RESULT = 0b1000;
    }
}

impl fmt::Debug for VisitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut flags = Vec::new();
        if self.contains(VisitState::VISITED_FROM_SOURCE) {
            flags.push("SOURCE");
        }
        if self.contains(VisitState::VISITED_FROM_TARGET) {
            flags.push("TARGET");
        }
        if self.contains(VisitState::STALE) {
            flags.push("STALE");
        }
        if self.contains(VisitState::RESULT) {
            flags.push("RESULT");
        }
        if flags.is_empty() {
            write!(f, "NONE")
        } else {
            write!(f, "{}", flags.join("|"))
        }
    }
}

impl fmt::Display for VisitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Finds common ancestors between two commits
///
/// Generic over the commit loader so it works against the object store and
/// against the in-memory graphs the tests build. The loader returns `None`
/// for unknown IDs, which are treated as having no parents.
pub struct BCAFinder<'c, CommitLoaderFn>
where
    CommitLoaderFn: Fn(&CommitId) -> Option<SlimCommit<'c>>,
{
    commit_loader: CommitLoaderFn,
    _marker: std::marker::PhantomData<&'c ()>,
}

impl<'c, CommitLoaderFn> BCAFinder<'c, CommitLoaderFn>
where
    CommitLoaderFn: Fn(&CommitId) -> Option<SlimCommit<'c>>,
{
    /// Creates a new best common ancestor finder with the given commit loader function
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let finder = BCAFinder::new(|oid| database.load_slim(oid));
    /// ```
    pub fn new(commit_loader: CommitLoaderFn) -> Self {
        Self {
            commit_loader,
            _marker: std::marker::PhantomData,
        }
    }

    fn generation(&self, oid: &CommitId) -> u32 {
        (self.commit_loader)(oid)
            .map(|commit| commit.generation)
            .unwrap_or(0)
    }

    fn parents(&self, oid: &CommitId) -> &'c [CommitId] {
        (self.commit_loader)(oid)
            .map(|commit| commit.parents)
            .unwrap_or(&[])
    }

    /// Phase 1: every common ancestor not below another common ancestor found
    /// during the walk
    fn find_common_ancestors(
        &self,
        source_commit_id: &CommitId,
        target_commit_id: &CommitId,
    ) -> Vec<CommitId> {
        if source_commit_id == target_commit_id {
            return vec![source_commit_id.clone()];
        }

        let mut ancestors_states = HashMap::<CommitId, VisitState>::new();
        let mut priority_queue = BinaryHeap::new();
        let mut results = Vec::new();

        ancestors_states.insert(source_commit_id.clone(), VisitState::VISITED_FROM_SOURCE);
        priority_queue.push((self.generation(source_commit_id), source_commit_id.clone()));
        ancestors_states.insert(target_commit_id.clone(), VisitState::VISITED_FROM_TARGET);
        priority_queue.push((self.generation(target_commit_id), target_commit_id.clone()));

        while priority_queue.iter().any(|(_, oid)| {
            !ancestors_states
                .get(oid)
                .is_some_and(|state| state.contains(VisitState::STALE))
        }) {
            let Some((_, commit_id)) = priority_queue.pop() else {
                break;
            };

            let current_state = ancestors_states
                .get(&commit_id)
                .copied()
                .unwrap_or(VisitState::NONE);
            let mut flags = current_state & (VisitState::VISITED_FROM_BOTH | VisitState::STALE);

            trace!(commit = %commit_id, state = %current_state, "processing commit");

            if flags == VisitState::VISITED_FROM_BOTH {
                if !current_state.contains(VisitState::RESULT) {
                    ancestors_states.insert(commit_id.clone(), current_state | VisitState::RESULT);
                    results.push(commit_id.clone());
                }
                flags |= VisitState::STALE;
            }

            for parent_id in self.parents(&commit_id) {
                let parent_state = ancestors_states
                    .get(parent_id)
                    .copied()
                    .unwrap_or(VisitState::NONE);

                if parent_state.contains(flags) {
                    continue;
                }

                ancestors_states.insert(parent_id.clone(), parent_state | flags);
                priority_queue.push((self.generation(parent_id), parent_id.clone()));
            }
        }

        results
            .into_iter()
            .filter(|oid| {
                !ancestors_states
                    .get(oid)
                    .is_some_and(|state| state.contains(VisitState::STALE))
            })
            .collect()
    }

    /// Whether `ancestor` can be reached from `commit` through parents
    fn is_ancestor(&self, ancestor: &CommitId, commit: &CommitId) -> bool {
        let floor = self.generation(ancestor);
        let mut visited = HashSet::new();
        let mut queue = VecDeque::from([commit.clone()]);

        while let Some(current) = queue.pop_front() {
            if &current == ancestor {
                return true;
            }
            if !visited.insert(current.clone()) || self.generation(&current) <= floor {
                continue;
            }
            queue.extend(self.parents(&current).iter().cloned());
        }

        false
    }

    /// Order in which a breadth-first walk from `start` reaches each commit
    fn breadth_first_rank(&self, start: &CommitId) -> HashMap<CommitId, usize> {
        let mut rank = HashMap::new();
        let mut queue = VecDeque::from([start.clone()]);

        while let Some(current) = queue.pop_front() {
            if rank.contains_key(&current) {
                continue;
            }
            rank.insert(current.clone(), rank.len());
            queue.extend(self.parents(&current).iter().cloned());
        }

        rank
    }

    /// Every best common ancestor of the two commits
    ///
    /// None of the returned commits is an ancestor of another.
    pub fn find_best_common_ancestors(
        &self,
        source_commit_id: &CommitId,
        target_commit_id: &CommitId,
    ) -> Vec<CommitId> {
        let common_ancestors = self.find_common_ancestors(source_commit_id, target_commit_id);

        trace!(
            candidates = common_ancestors.len(),
            "found common ancestors"
        );

        common_ancestors
            .iter()
            .filter(|candidate| {
                !common_ancestors
                    .iter()
                    .any(|other| other != *candidate && self.is_ancestor(candidate, other))
            })
            .cloned()
            .collect()
    }

    /// Finds the best common ancestor between two commits
    ///
    /// # Returns
    ///
    /// - `Some(CommitId)` - the best common ancestor with the highest
    ///   generation, ties broken by breadth-first order from the target
    /// - `None` - if the commits share no history
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// // Linear history: A <- B <- C <- D
    /// assert_eq!(finder.find_best_common_ancestor(&b, &d), Some(b));
    ///
    /// // Branched history:
    /// //     A
    /// //    / \
    /// //   B   C
    /// assert_eq!(finder.find_best_common_ancestor(&b, &c), Some(a));
    /// ```
    pub fn find_best_common_ancestor(
        &self,
        source_commit_id: &CommitId,
        target_commit_id: &CommitId,
    ) -> Option<CommitId> {
        let best = self.find_best_common_ancestors(source_commit_id, target_commit_id);
        let top_generation = best.iter().map(|oid| self.generation(oid)).max()?;
        let mut tied = best
            .into_iter()
            .filter(|oid| self.generation(oid) == top_generation)
            .collect::<Vec<_>>();

        if tied.len() > 1 {
            let rank = self.breadth_first_rank(target_commit_id);
            tied.sort_by_key(|oid| rank.get(oid).copied().unwrap_or(usize::MAX));
        }

        tied.into_iter().next()
    }
}
