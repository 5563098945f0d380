use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::issue::{Issue, IssueKind, Severity};

/// A directed "depends-on" edge: `consumer` matches on a label that
/// `producer` attaches.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DependencyEdge {
    pub consumer: String,
    pub producer: String,
}

impl DependencyEdge {
    pub(crate) fn new(consumer: &str, producer: &str) -> Self {
        Self {
            consumer: consumer.to_owned(),
            producer: producer.to_owned(),
        }
    }
}

impl fmt::Display for DependencyEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.consumer, self.producer)
    }
}

/// Result of analyzing an [`Acl`](super::Acl).
///
/// Every rule appears in `levels`, keyed by its identity (its name, or a
/// placeholder for unnamed or duplicate-named rules). Edges are ordered by
/// consumer, then producer, both in evaluation order. Issues are ordered by
/// rule in evaluation order, then by check.
///
/// Serializes to `{levels, dependencyEdges, issues, requiredLabels,
/// evaluationOrder}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[must_use]
pub struct Analysis {
    levels: BTreeMap<String, u32>,
    dependency_edges: Vec<DependencyEdge>,
    issues: Vec<Issue>,
    required_labels: BTreeMap<String, Vec<String>>,
    evaluation_order: Vec<String>,
}

impl Analysis {
    pub(crate) fn new(
        levels: BTreeMap<String, u32>,
        dependency_edges: Vec<DependencyEdge>,
        issues: Vec<Issue>,
        required_labels: BTreeMap<String, Vec<String>>,
        evaluation_order: Vec<String>,
    ) -> Self {
        Self {
            levels,
            dependency_edges,
            issues,
            required_labels,
            evaluation_order,
        }
    }

    /// Dependency level per rule. Level 0 rules depend on nothing resolvable.
    #[must_use]
    pub fn levels(&self) -> &BTreeMap<String, u32> {
        &self.levels
    }

    #[must_use]
    pub fn dependency_edges(&self) -> &[DependencyEdge] {
        &self.dependency_edges
    }

    #[must_use]
    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    /// Labels each rule's statement matches on, sorted. Includes labels no
    /// rule produces.
    #[must_use]
    pub fn required_labels(&self) -> &BTreeMap<String, Vec<String>> {
        &self.required_labels
    }

    /// Rule identities sorted by priority, ties broken by input position.
    #[must_use]
    pub fn evaluation_order(&self) -> &[String] {
        &self.evaluation_order
    }

    #[must_use]
    pub fn level_of(&self, rule: &str) -> Option<u32> {
        self.levels.get(rule).copied()
    }

    #[must_use]
    pub fn max_level(&self) -> u32 {
        self.levels.values().copied().max().unwrap_or(0)
    }

    /// Producers the given rule depends on, in evaluation order.
    #[must_use]
    pub fn dependencies_of(&self, rule: &str) -> Vec<&str> {
        self.dependency_edges
            .iter()
            .filter(|e| e.consumer == rule)
            .map(|e| e.producer.as_str())
            .collect()
    }

    /// Consumers that depend on the given rule, in evaluation order.
    #[must_use]
    pub fn dependents_of(&self, rule: &str) -> Vec<&str> {
        self.dependency_edges
            .iter()
            .filter(|e| e.producer == rule)
            .map(|e| e.consumer.as_str())
            .collect()
    }

    /// Rules grouped by level, each group in evaluation order. Only levels
    /// that hold at least one rule appear.
    #[must_use]
    pub fn layers(&self) -> BTreeMap<u32, Vec<&str>> {
        let mut layers: BTreeMap<u32, Vec<&str>> = BTreeMap::new();
        for name in &self.evaluation_order {
            if let Some(&level) = self.levels.get(name) {
                layers.entry(level).or_default().push(name.as_str());
            }
        }
        layers
    }

    #[must_use]
    pub fn issues_for(&self, rule: &str) -> Vec<&Issue> {
        self.issues.iter().filter(|i| i.rule_name == rule).collect()
    }

    /// Issues grouped under the rule they were raised against.
    #[must_use]
    pub fn issues_by_rule(&self) -> BTreeMap<&str, Vec<&Issue>> {
        let mut grouped: BTreeMap<&str, Vec<&Issue>> = BTreeMap::new();
        for issue in &self.issues {
            grouped.entry(issue.rule_name.as_str()).or_default().push(issue);
        }
        grouped
    }

    #[must_use]
    pub fn count_by_kind(&self) -> BTreeMap<IssueKind, usize> {
        let mut counts = BTreeMap::new();
        for issue in &self.issues {
            *counts.entry(issue.kind).or_insert(0) += 1;
        }
        counts
    }

    #[must_use]
    pub fn max_severity(&self) -> Option<Severity> {
        self.issues.iter().map(Issue::severity).max()
    }

    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.max_severity() == Some(Severity::Error)
    }

    /// Render as JSON.
    ///
    /// # Errors
    ///
    /// Returns the underlying `serde_json` error; serialization of this type
    /// does not fail in practice.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for Analysis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let count = |sev: Severity| self.issues.iter().filter(|i| i.severity() == sev).count();
        write!(
            f,
            "{} rules, {} edges, max level {}, {} issues ({} error, {} warning, {} info)",
            self.levels.len(),
            self.dependency_edges.len(),
            self.max_level(),
            self.issues.len(),
            count(Severity::Error),
            count(Severity::Warning),
            count(Severity::Info),
        )
    }
}
