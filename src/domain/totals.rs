//! Requested-count totals for the top of the hierarchy.

use serde::Serialize;

use crate::domain::tree::{CategoryPath, CountTree};

/// Depth of the rolled-up levels (discipline, then level group).
pub const TOTALS_DEPTH: usize = 2;

/// One rolled-up entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TotalEntry {
    pub path: CategoryPath,
    pub total: u64,
}

/// Sum of requested counts beneath every node of the first two levels,
/// in document order (parent before its children).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Totals {
    entries: Vec<TotalEntry>,
    grand_total: u64,
}

impl Totals {
    pub fn from_counts(counts: &CountTree) -> Self {
        let mut entries = Vec::new();
        collect(counts, CategoryPath::root(), &mut entries);
        Self {
            entries,
            grand_total: counts.total(),
        }
    }

    pub fn get(&self, path: &CategoryPath) -> Option<u64> {
        self.entries
            .iter()
            .find(|e| &e.path == path)
            .map(|e| e.total)
    }

    pub fn entries(&self) -> &[TotalEntry] {
        &self.entries
    }

    pub fn grand_total(&self) -> u64 {
        self.grand_total
    }

    /// True when at least one draw is requested anywhere.
    pub fn has_draws(&self) -> bool {
        self.grand_total > 0
    }
}

fn collect(node: &CountTree, path: CategoryPath, out: &mut Vec<TotalEntry>) {
    if path.depth() == TOTALS_DEPTH {
        return;
    }
    for (key, child) in node.children() {
        let child_path = path.child(key);
        out.push(TotalEntry {
            path: child_path.clone(),
            total: child.total(),
        });
        collect(child, child_path, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn given_three_level_counts_when_rolling_up_then_stops_at_second_level() {
        let counts = CountTree::counts_from_json(&json!({
            "Solo": {"Adult": {"Gold": 2, "Silver": 1}, "Junior": {"Bronze": 0}},
            "Pairs": {"Open": {"Senior": 0}}
        }))
        .unwrap();

        let totals = Totals::from_counts(&counts);

        let paths: Vec<String> = totals.entries().iter().map(|e| e.path.to_string()).collect();
        assert_eq!(
            paths,
            vec!["Solo", "Solo / Adult", "Solo / Junior", "Pairs", "Pairs / Open"]
        );
        assert_eq!(totals.get(&CategoryPath::from_segments(["Solo"])), Some(3));
        assert_eq!(totals.get(&CategoryPath::from_segments(["Solo", "Junior"])), Some(0));
        assert_eq!(totals.get(&CategoryPath::from_segments(["Pairs"])), Some(0));
        assert_eq!(totals.grand_total(), 3);
        assert!(totals.has_draws());
    }

    #[test]
    fn given_flat_counts_when_rolling_up_then_leaves_are_entries() {
        let counts = CountTree::counts_from_json(&json!({"A": 0, "B": 3})).unwrap();
        let totals = Totals::from_counts(&counts);
        assert_eq!(totals.entries().len(), 2);
        assert_eq!(totals.get(&CategoryPath::from_segments(["B"])), Some(3));
    }
}
