//! The "must not be grouped together" relation and the checks built on it.

use std::collections::BTreeMap;
use std::fmt;

use crate::group::StudentId;

/// Forbidden partners per student, exactly as declared in the config.
///
/// The relation may be asymmetric. A student without an entry has no
/// declared constraints, but can still be constrained by someone else's
/// entry.
pub type ConstraintRelation = BTreeMap<StudentId, Vec<StudentId>>;

/// One direction of a constraint that is not mirrored by the other side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Asymmetry {
    /// `forbidding` lists `forbidden`, who declares no constraints at all.
    Undeclared {
        forbidding: StudentId,
        forbidden: StudentId,
    },
    /// `forbidden` declares constraints, but not against `forbidding`.
    OneSided {
        forbidding: StudentId,
        forbidden: StudentId,
    },
}

impl fmt::Display for Asymmetry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Asymmetry::Undeclared {
                forbidding,
                forbidden,
            } => write!(
                f,
                "'{}' cannot work with '{}', but '{}' has no constraints",
                forbidding, forbidden, forbidden
            ),
            Asymmetry::OneSided {
                forbidding,
                forbidden,
            } => write!(
                f,
                "'{}' cannot work with '{}', but '{}' can work with '{}'",
                forbidding, forbidden, forbidden, forbidding
            ),
        }
    }
}

/// Report every declared constraint whose reverse direction is missing.
///
/// Advisory only: the relation is used as declared either way. Students and
/// their forbidden partners are visited in sorted order so the report is
/// stable between runs.
pub fn validate(constraints: &ConstraintRelation) -> Vec<Asymmetry> {
    let mut issues = Vec::new();

    for (student_a, forbidden_by_a) in constraints {
        let mut sorted = forbidden_by_a.clone();
        sorted.sort();

        for student_b in sorted {
            match constraints.get(&student_b) {
                None => issues.push(Asymmetry::Undeclared {
                    forbidding: student_a.clone(),
                    forbidden: student_b,
                }),
                Some(forbidden_by_b) if !forbidden_by_b.contains(student_a) => {
                    issues.push(Asymmetry::OneSided {
                        forbidding: student_a.clone(),
                        forbidden: student_b,
                    })
                }
                Some(_) => {}
            }
        }
    }

    issues
}

/// Whether `a` declared that they must not be grouped with `b`.
pub fn forbids(constraints: &ConstraintRelation, a: &str, b: &str) -> bool {
    constraints
        .get(a)
        .is_some_and(|forbidden| forbidden.iter().any(|s| s == b))
}

/// A group is valid when no member forbids another, from either side.
pub fn is_valid_group(members: &[StudentId], constraints: &ConstraintRelation) -> bool {
    for (i, student_a) in members.iter().enumerate() {
        for (j, student_b) in members.iter().enumerate() {
            if i == j {
                continue;
            }
            if forbids(constraints, student_a, student_b)
                || forbids(constraints, student_b, student_a)
            {
                return false;
            }
        }
    }
    true
}
