pub type StudentId = String;

/// Smallest group the engine will ever accept.
pub const MIN_GROUP_SIZE: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub members: Vec<StudentId>,
}

impl Group {
    pub fn from_members(members: Vec<StudentId>) -> Self {
        Group { members }
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Copy of this group with one more member appended.
    pub fn with_member(&self, student_id: StudentId) -> Group {
        let mut members = Vec::with_capacity(self.members.len() + 1);
        members.extend(self.members.iter().cloned());
        members.push(student_id);
        Group { members }
    }
}

/// Outcome of one grouping pass: every roster member ends up either in
/// exactly one group or in `leftover`, which keeps roster order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupingResult {
    pub groups: Vec<Group>,
    pub leftover: Vec<StudentId>,
}

impl GroupingResult {
    /// Nobody grouped; everyone is left over.
    pub fn ungrouped(roster: &[StudentId]) -> Self {
        GroupingResult {
            groups: Vec::new(),
            leftover: roster.to_vec(),
        }
    }

    pub fn grouped_count(&self) -> usize {
        self.groups.iter().map(Group::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_member_leaves_group_untouched() {
        let group = Group::from_members(vec!["S001".to_string(), "S002".to_string()]);
        let grown = group.with_member("S003".to_string());

        assert_eq!(group.len(), 2);
        assert_eq!(grown.len(), 3);
        assert_eq!(grown.members[2], "S003");
    }

    #[test]
    fn test_ungrouped_keeps_roster_order() {
        let roster = vec!["B".to_string(), "A".to_string(), "C".to_string()];
        let result = GroupingResult::ungrouped(&roster);

        assert!(result.groups.is_empty());
        assert_eq!(result.leftover, roster);
        assert_eq!(result.grouped_count(), 0);
    }

    #[test]
    fn test_grouped_count_sums_members() {
        let result = GroupingResult {
            groups: vec![
                Group::from_members(vec!["A".to_string(), "B".to_string()]),
                Group::from_members(vec!["C".to_string(), "D".to_string(), "E".to_string()]),
            ],
            leftover: vec!["F".to_string()],
        };
        assert_eq!(result.grouped_count(), 5);
    }
}
