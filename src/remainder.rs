//! What to do with the people left over once no further full-size group
//! can be formed.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemainderPolicy {
    /// Fold each leftover person, in turn, into some group of exactly `from`
    /// members, growing it to `into`. Each fold succeeds or fails on its own.
    FoldEach { from: usize, into: usize },
    /// Keep all leftovers together as one undersized group, if they may be.
    Standalone,
}

/// Keyed by (target size, leftover count). Combinations not listed get no
/// remainder handling at all.
const POLICIES: &[((usize, usize), RemainderPolicy)] = &[
    ((2, 1), RemainderPolicy::FoldEach { from: 2, into: 3 }),
    ((3, 1), RemainderPolicy::FoldEach { from: 3, into: 4 }),
    ((3, 2), RemainderPolicy::Standalone),
    ((4, 1), RemainderPolicy::FoldEach { from: 4, into: 5 }),
    ((4, 2), RemainderPolicy::FoldEach { from: 4, into: 5 }),
    ((4, 3), RemainderPolicy::Standalone),
];

pub fn policy_for(target_size: usize, leftover: usize) -> Option<RemainderPolicy> {
    POLICIES
        .iter()
        .find(|(key, _)| *key == (target_size, leftover))
        .map(|(_, policy)| *policy)
}
