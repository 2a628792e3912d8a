use std::io::{self, Write};

use crate::constraints::Asymmetry;
use crate::group::GroupingResult;

const RULE_WIDTH: usize = 62;

/// Label for a 0-based group index: A..Z, then AA, AB, ...
pub fn group_label(index: usize) -> String {
    let mut n = index + 1;
    let mut letters = Vec::new();
    while n > 0 {
        n -= 1;
        letters.push((b'A' + (n % 26) as u8) as char);
        n /= 26;
    }
    letters.iter().rev().collect()
}

pub fn rule(out: &mut impl Write) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", "=".repeat(RULE_WIDTH))
}

pub fn banner(out: &mut impl Write) -> io::Result<()> {
    rule(out)?;
    writeln!(out, "=== Random groups for your class.")?;
    writeln!(out)
}

pub fn symmetry(out: &mut impl Write, issues: &[Asymmetry]) -> io::Result<()> {
    writeln!(out, "\n=== Checking conflicting pairs for symmetry.")?;
    if issues.is_empty() {
        return writeln!(out, "✅ All pairs are symmetric. Continuing with grouping.");
    }

    writeln!(out, "❗️ Warning: asymmetric pairs found in the class file:")?;
    for issue in issues {
        writeln!(out, "  - {}", issue)?;
    }
    writeln!(
        out,
        "Grouping continues, but fixing the conflicts is recommended."
    )
}

pub fn grouping(
    out: &mut impl Write,
    target_size: usize,
    result: &GroupingResult,
) -> io::Result<()> {
    rule(out)?;
    writeln!(
        out,
        "=== Groups of {} (adjusted where needed).",
        target_size
    )?;

    if result.groups.is_empty() {
        if result.leftover.is_empty() {
            writeln!(out, "❌ No groups of {} could be formed.", target_size)?;
        } else {
            writeln!(
                out,
                "❌ No valid groups of {} could be formed. All students are ungrouped.",
                target_size
            )?;
        }
    }
    for (i, group) in result.groups.iter().enumerate() {
        writeln!(
            out,
            "Group {} ({} people): {}",
            group_label(i),
            group.len(),
            group.members.join(", ")
        )?;
    }

    if result.leftover.is_empty() {
        writeln!(
            out,
            "✅ All students were placed in groups of {}.",
            target_size
        )
    } else {
        writeln!(out, "❗️ Ungrouped students: {}", result.leftover.join(", "))
    }
}
