use std::collections::BTreeMap;

use crate::table::RuleTable;

/// Label name to the rules that produce it, each list in evaluation order.
///
/// Several producers for one label are kept as-is; the validator reports them.
#[derive(Debug, Default)]
pub(crate) struct LabelIndex<'a> {
    producers: BTreeMap<&'a str, Vec<usize>>,
}

impl<'a> LabelIndex<'a> {
    pub(crate) fn build(table: &RuleTable<'a>) -> Self {
        let mut producers: BTreeMap<&'a str, Vec<usize>> = BTreeMap::new();
        for &i in &table.order {
            for label in table.rules[i].distinct_labels() {
                producers.entry(label).or_default().push(i);
            }
        }
        Self { producers }
    }

    /// Producers of `label`, or an empty slice if nothing produces it.
    pub(crate) fn producers(&self, label: &str) -> &[usize] {
        self.producers
            .get(label)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub(crate) fn contains(&self, label: &str) -> bool {
        self.producers.contains_key(label)
    }

    pub(crate) fn len(&self) -> usize {
        self.producers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Acl, AclBuilder, Rule};

    #[test]
    fn producers_in_priority_order() {
        let acl = AclBuilder::new()
            .rule("late", 9, |r| r.label("shared"))
            .rule("early", 1, |r| r.labels(["shared", "solo"]))
            .build();
        let table = RuleTable::new(acl.rules());
        let index = LabelIndex::build(&table);

        assert_eq!(index.producers("shared"), &[1, 0]);
        assert_eq!(index.producers("solo"), &[1]);
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn unknown_label_has_no_producers() {
        let acl = AclBuilder::new().rule("a", 0, |r| r.label("x")).build();
        let table = RuleTable::new(acl.rules());
        let index = LabelIndex::build(&table);

        assert!(index.producers("nope").is_empty());
        assert!(!index.contains("nope"));
        assert!(index.contains("x"));
    }

    #[test]
    fn repeated_label_indexes_rule_once() {
        let acl = Acl::from_rules(vec![Rule {
            name: Some("tag".to_owned()),
            produced_labels: vec!["x".to_owned(), "x".to_owned()],
            ..Rule::default()
        }]);
        let table = RuleTable::new(acl.rules());
        let index = LabelIndex::build(&table);

        assert_eq!(index.producers("x"), &[0]);
    }

    #[test]
    fn empty_acl() {
        let acl = AclBuilder::new().build();
        let table = RuleTable::new(acl.rules());
        assert_eq!(LabelIndex::build(&table).len(), 0);
    }
}
