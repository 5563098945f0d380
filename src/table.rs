use std::collections::HashMap;

use crate::Rule;

/// Per-invocation view of the input rules: stable identities and evaluation
/// order. Rules are addressed by their input index everywhere downstream.
#[derive(Debug)]
pub(crate) struct RuleTable<'a> {
    pub(crate) rules: &'a [Rule],
    /// Public identity of each rule.
    pub(crate) ids: Vec<String>,
    /// Input indices sorted by evaluation order.
    pub(crate) order: Vec<usize>,
    /// `rank[i]` is the position of rule `i` in `order`.
    pub(crate) rank: Vec<usize>,
    /// For a rule whose name was already taken, the earlier rule's index.
    pub(crate) shadows: Vec<Option<usize>>,
}

impl<'a> RuleTable<'a> {
    pub(crate) fn new(rules: &'a [Rule]) -> Self {
        let mut ids = Vec::with_capacity(rules.len());
        let mut shadows = Vec::with_capacity(rules.len());
        let mut taken: HashMap<String, usize> = HashMap::new();

        for (i, rule) in rules.iter().enumerate() {
            let base = rule.name.clone().unwrap_or_else(|| format!("Rule_{i}"));
            let (id, shadow) = match taken.get(&base) {
                Some(&first) => (format!("{base}#{i}"), Some(first)),
                None => (base, None),
            };
            taken.entry(id.clone()).or_insert(i);
            ids.push(id);
            shadows.push(shadow);
        }

        // Missing priorities sort last; the sort is stable so ties keep input order.
        let mut order: Vec<usize> = (0..rules.len()).collect();
        order.sort_by_key(|&i| (rules[i].priority.is_none(), rules[i].priority));

        let mut rank = vec![0; rules.len()];
        for (pos, &i) in order.iter().enumerate() {
            rank[i] = pos;
        }

        Self {
            rules,
            ids,
            order,
            rank,
            shadows,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.rules.len()
    }

    pub(crate) fn id(&self, index: usize) -> &str {
        &self.ids[index]
    }

    /// `true` when rule `a` is evaluated strictly before rule `b` by declared
    /// priority. `false` if either priority is missing.
    pub(crate) fn strictly_before(&self, a: usize, b: usize) -> bool {
        match (self.rules[a].priority, self.rules[b].priority) {
            (Some(pa), Some(pb)) => pa < pb,
            _ => false,
        }
    }
}
