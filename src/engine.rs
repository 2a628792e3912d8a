//! Randomized formation of constrained groups.
//!
//! One attempt shuffles the roster, peels off random groups of the target
//! size until the next draw breaks a constraint or too few people remain,
//! then handles the leftovers with the policy from [`crate::remainder`].
//! [`GroupingEngine::best_of`] repeats independent attempts and keeps the one
//! that groups the most people.

use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

use crate::constraints::{is_valid_group, ConstraintRelation};
use crate::group::{Group, GroupingResult, StudentId, MIN_GROUP_SIZE};
use crate::remainder::{policy_for, RemainderPolicy};

pub const DEFAULT_ATTEMPTS: usize = 1000;

/// Groups formed so far plus who is already in one. Every step that changes
/// it produces a new value, so a failed step leaves the previous one intact.
#[derive(Debug, Clone, Default)]
struct Formation {
    groups: Vec<Group>,
    used: HashSet<StudentId>,
}

impl Formation {
    fn with_group(mut self, group: Group) -> Formation {
        self.used.extend(group.members.iter().cloned());
        self.groups.push(group);
        self
    }

    /// Members of `order` not yet in any group, in the order given.
    fn unused_in(&self, order: &[StudentId]) -> Vec<StudentId> {
        order
            .iter()
            .filter(|s| !self.used.contains(*s))
            .cloned()
            .collect()
    }
}

/// Best attempt found by [`GroupingEngine::best_of`].
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub result: GroupingResult,
    pub attempts_run: usize,
}

pub struct GroupingEngine<'a, R> {
    roster: &'a [StudentId],
    constraints: &'a ConstraintRelation,
    rng: R,
}

impl<'a, R: Rng> GroupingEngine<'a, R> {
    pub fn new(roster: &'a [StudentId], constraints: &'a ConstraintRelation, rng: R) -> Self {
        GroupingEngine {
            roster,
            constraints,
            rng,
        }
    }

    /// Run up to `attempts` independent attempts and keep the one with the
    /// most people grouped. Ties keep the earlier attempt; an attempt that
    /// leaves nobody over ends the search.
    pub fn best_of(&mut self, target_size: usize, attempts: usize) -> SearchOutcome {
        let mut best: Option<GroupingResult> = None;
        let mut attempts_run = 0;

        for attempt in 0..attempts {
            let candidate = self.form_groups(target_size);
            attempts_run += 1;

            let grouped = candidate.grouped_count();
            let improved = best
                .as_ref()
                .map_or(true, |current| grouped > current.grouped_count());
            if !improved {
                continue;
            }

            debug!(
                target_size,
                attempt,
                grouped,
                leftover = candidate.leftover.len(),
                "new best grouping"
            );
            let complete = candidate.leftover.is_empty();
            best = Some(candidate);
            if complete {
                break;
            }
        }

        SearchOutcome {
            result: best.unwrap_or_else(|| GroupingResult::ungrouped(self.roster)),
            attempts_run,
        }
    }

    /// One randomized attempt at grouping the whole roster.
    pub fn form_groups(&mut self, target_size: usize) -> GroupingResult {
        // Too few people means no group at all, not an undersized remainder one.
        if target_size < MIN_GROUP_SIZE || self.roster.len() < target_size {
            return GroupingResult::ungrouped(self.roster);
        }

        let mut working = self.roster.to_vec();
        working.shuffle(&mut self.rng);

        let formation = self.fill(target_size, &working, Formation::default());
        let pending = formation.unused_in(&working);
        let formation = match policy_for(target_size, pending.len()) {
            Some(policy) => self.apply_remainder(policy, &pending, formation),
            None => formation,
        };

        GroupingResult {
            leftover: formation.unused_in(self.roster),
            groups: formation.groups,
        }
    }

    fn fill(
        &mut self,
        target_size: usize,
        pool: &[StudentId],
        mut formation: Formation,
    ) -> Formation {
        loop {
            let mut available = formation.unused_in(pool);
            if available.len() < target_size {
                break;
            }

            available.shuffle(&mut self.rng);
            available.truncate(target_size);
            // No backtracking: the first bad draw ends this attempt's main loop.
            if !is_valid_group(&available, self.constraints) {
                break;
            }
            formation = formation.with_group(Group::from_members(available));
        }
        formation
    }

    fn apply_remainder(
        &mut self,
        policy: RemainderPolicy,
        pending: &[StudentId],
        formation: Formation,
    ) -> Formation {
        match policy {
            RemainderPolicy::FoldEach { from, into } => {
                let mut current = formation;
                for student in pending {
                    if let Some(next) = self.integrate(student, from, into, &current) {
                        current = next;
                    }
                }
                current
            }
            RemainderPolicy::Standalone => {
                if is_valid_group(pending, self.constraints) {
                    formation.with_group(Group::from_members(pending.to_vec()))
                } else {
                    formation
                }
            }
        }
    }

    /// Fold `student` into the first group, in random order, that has exactly
    /// `from` members and stays valid with them added.
    fn integrate(
        &mut self,
        student: &StudentId,
        from: usize,
        into: usize,
        formation: &Formation,
    ) -> Option<Formation> {
        let mut order: Vec<usize> = (0..formation.groups.len()).collect();
        order.shuffle(&mut self.rng);

        for idx in order {
            let group = &formation.groups[idx];
            if group.len() != from {
                continue;
            }

            let candidate = group.with_member(student.clone());
            if !is_valid_group(&candidate.members, self.constraints) {
                continue;
            }

            debug_assert_eq!(candidate.len(), into);
            debug!(student = %student, from, into, "folded leftover into group");
            let mut next = formation.clone();
            next.groups[idx] = candidate;
            next.used.insert(student.clone());
            return Some(next);
        }
        None
    }
}
