use crate::graph::DependencyGraph;
use crate::table::RuleTable;

/// Memoized depth-first leveling.
///
/// A rule with no dependencies is level 0; otherwise it sits one above its
/// highest dependency. A dependency that is still on the DFS path (a back
/// edge of a cycle) is skipped instead of followed, so leveling terminates
/// on any graph and a rule whose only dependencies close a cycle ends up at
/// level 0. Reporting cycles is the validator's job.
pub(crate) fn assign_levels(table: &RuleTable<'_>, graph: &DependencyGraph<'_>) -> Vec<u32> {
    let mut leveler = Leveler {
        graph,
        levels: vec![0; table.len()],
        visiting: vec![false; table.len()],
        processed: vec![false; table.len()],
    };
    for &r in &table.order {
        leveler.level(r);
    }
    leveler.levels
}

struct Leveler<'g, 'a> {
    graph: &'g DependencyGraph<'a>,
    levels: Vec<u32>,
    visiting: Vec<bool>,
    processed: Vec<bool>,
}

impl Leveler<'_, '_> {
    fn level(&mut self, r: usize) -> u32 {
        if self.processed[r] {
            return self.levels[r];
        }
        if self.visiting[r] {
            return 0;
        }
        self.visiting[r] = true;

        let graph = self.graph;
        let mut level = 0;
        for &dep in &graph.depends_on[r] {
            if self.visiting[dep] {
                continue;
            }
            level = level.max(self.level(dep) + 1);
        }

        self.visiting[r] = false;
        self.processed[r] = true;
        self.levels[r] = level;
        level
    }
}
