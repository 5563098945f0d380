use std::collections::BTreeSet;

use crate::labels::LabelIndex;
use crate::table::RuleTable;
use crate::walk::extract_label_keys;

/// Depends-on edges derived from label production and consumption.
///
/// Both vectors are indexed by input position. `depends_on[r]` lists the
/// producers of every label `r` matches on, in evaluation order, excluding
/// `r` itself.
#[derive(Debug)]
pub(crate) struct DependencyGraph<'a> {
    pub(crate) depends_on: Vec<Vec<usize>>,
    pub(crate) needed_labels: Vec<BTreeSet<&'a str>>,
}

impl<'a> DependencyGraph<'a> {
    pub(crate) fn build(table: &RuleTable<'a>, index: &LabelIndex<'a>) -> Self {
        let mut depends_on = Vec::with_capacity(table.len());
        let mut needed_labels = Vec::with_capacity(table.len());

        for (r, rule) in table.rules.iter().enumerate() {
            let needed = rule
                .statement
                .as_ref()
                .map(extract_label_keys)
                .unwrap_or_default();

            let mut producers: Vec<usize> = needed
                .iter()
                .flat_map(|label| index.producers(label))
                .copied()
                .filter(|&p| p != r)
                .collect();
            producers.sort_by_key(|&p| table.rank[p]);
            producers.dedup();

            depends_on.push(producers);
            needed_labels.push(needed);
        }

        Self {
            depends_on,
            needed_labels,
        }
    }

    pub(crate) fn edge_count(&self) -> usize {
        self.depends_on.iter().map(Vec::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{label_match, opaque, AclBuilder, Acl};

    fn graph_of(acl: &Acl) -> (RuleTable<'_>, Vec<Vec<usize>>, Vec<Vec<String>>) {
        let table = RuleTable::new(acl.rules());
        let index = LabelIndex::build(&table);
        let graph = DependencyGraph::build(&table, &index);
        let needed = graph
            .needed_labels
            .iter()
            .map(|s| s.iter().map(|l| (*l).to_owned()).collect())
            .collect();
        (table, graph.depends_on, needed)
    }

    #[test]
    fn simple_producer_consumer() {
        let acl = AclBuilder::new()
            .rule("A", 0, |r| r.label("admin").when(opaque("ByteMatchStatement")))
            .rule("B", 1, |r| r.when(label_match("admin")))
            .build();
        let (_, deps, needed) = graph_of(&acl);
        assert_eq!(deps, vec![vec![], vec![0]]);
        assert_eq!(needed[1], vec!["admin"]);
    }

    #[test]
    fn self_production_is_not_an_edge() {
        let acl = AclBuilder::new()
            .rule("other", 0, |r| r.label("x"))
            .rule("both", 1, |r| r.label("x").when(label_match("x")))
            .build();
        let (_, deps, _) = graph_of(&acl);
        assert_eq!(deps[1], vec![0]);
    }

    #[test]
    fn missing_label_contributes_no_edge() {
        let acl = AclBuilder::new()
            .rule("lonely", 0, |r| r.when(label_match("ghost")))
            .build();
        let (_, deps, needed) = graph_of(&acl);
        assert!(deps[0].is_empty());
        assert_eq!(needed[0], vec!["ghost"]);
    }

    #[test]
    fn producers_deduplicated_across_labels() {
        let acl = AclBuilder::new()
            .rule("late", 5, |r| r.labels(["a", "b"]))
            .rule("early", 1, |r| r.label("a"))
            .rule("consumer", 9, |r| r.when(label_match("a").and(label_match("b"))))
            .build();
        let (table, deps, _) = graph_of(&acl);
        let names: Vec<&str> = deps[2].iter().map(|&p| table.id(p)).collect();
        assert_eq!(names, vec!["early", "late"]);
    }

    #[test]
    fn rule_without_statement_needs_nothing() {
        let acl = AclBuilder::new().rule("bare", 0, |r| r.label("a")).build();
        let (_, deps, needed) = graph_of(&acl);
        assert!(deps[0].is_empty());
        assert!(needed[0].is_empty());
    }
}
