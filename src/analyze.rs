use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, instrument};

use crate::graph::DependencyGraph;
use crate::labels::LabelIndex;
use crate::levels::assign_levels;
use crate::table::RuleTable;
use crate::validate::validate;
use crate::{Acl, Analysis, DependencyEdge, IssueKind, Severity};

/// The analysis engine.
///
/// Holds configuration only. Every call to [`analyze()`](Self::analyze)
/// builds its own label index, graph and DFS scratch state and drops them on
/// return, so one `Analyzer` can be shared freely across threads.
///
/// # Example
///
/// ```
/// use wafgraph::{label_match, Action, AclBuilder, Analyzer, IssueKind, Severity};
///
/// let acl = AclBuilder::new()
///     .rule("blocker", 0, |r| r.action(Action::Block).when(label_match("ghost")))
///     .build();
///
/// let analysis = Analyzer::new()
///     .disable(IssueKind::TerminalAction)
///     .min_severity(Severity::Warning)
///     .analyze(&acl);
///
/// assert_eq!(analysis.issues().len(), 1);
/// assert_eq!(analysis.issues()[0].kind, IssueKind::MissingLabel);
/// ```
#[derive(Debug, Clone)]
pub struct Analyzer {
    disabled: BTreeSet<IssueKind>,
    min_severity: Severity,
}

impl Default for Analyzer {
    fn default() -> Self {
        Self {
            disabled: BTreeSet::new(),
            min_severity: Severity::Info,
        }
    }
}

impl Analyzer {
    /// An analyzer that runs every check and keeps every issue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Skip a check entirely.
    #[must_use]
    pub fn disable(mut self, kind: IssueKind) -> Self {
        self.disabled.insert(kind);
        self
    }

    /// Re-enable a previously disabled check.
    #[must_use]
    pub fn enable(mut self, kind: IssueKind) -> Self {
        self.disabled.remove(&kind);
        self
    }

    /// Drop issues below `severity`. Checks whose kind falls below it are
    /// not run.
    #[must_use]
    pub fn min_severity(mut self, severity: Severity) -> Self {
        self.min_severity = severity;
        self
    }

    /// Toggle the `MetricNameMismatch` check. On by default.
    #[must_use]
    pub fn check_metric_names(self, enabled: bool) -> Self {
        if enabled {
            self.enable(IssueKind::MetricNameMismatch)
        } else {
            self.disable(IssueKind::MetricNameMismatch)
        }
    }

    /// Whether the check for `kind` runs under this configuration.
    #[must_use]
    pub fn runs(&self, kind: IssueKind) -> bool {
        !self.disabled.contains(&kind) && kind.severity() >= self.min_severity
    }

    /// Build the dependency graph, level it and lint it.
    ///
    /// Never fails: defects in the rule set are reported as issues, and
    /// levels are produced even for cyclic graphs.
    #[instrument(skip_all, fields(rules = acl.len()))]
    pub fn analyze(&self, acl: &Acl) -> Analysis {
        let table = RuleTable::new(acl.rules());

        let index = LabelIndex::build(&table);
        debug!(labels = index.len(), "label index built");

        let graph = DependencyGraph::build(&table, &index);
        debug!(edges = graph.edge_count(), "dependency graph built");

        let raw_levels = assign_levels(&table, &graph);
        debug!(
            max_level = raw_levels.iter().copied().max().unwrap_or(0),
            "levels assigned"
        );

        let issues = validate(&table, &graph, &index, self);
        debug!(issues = issues.len(), "validation finished");

        let levels: BTreeMap<String, u32> = raw_levels
            .iter()
            .enumerate()
            .map(|(i, &level)| (table.id(i).to_owned(), level))
            .collect();

        let mut dependency_edges = Vec::with_capacity(graph.edge_count());
        for &consumer in &table.order {
            for &producer in &graph.depends_on[consumer] {
                dependency_edges.push(DependencyEdge::new(
                    table.id(consumer),
                    table.id(producer),
                ));
            }
        }

        let required_labels: BTreeMap<String, Vec<String>> = graph
            .needed_labels
            .iter()
            .enumerate()
            .map(|(i, labels)| {
                let labels: Vec<String> = labels.iter().map(|l| (*l).to_owned()).collect();
                (table.id(i).to_owned(), labels)
            })
            .collect();

        let evaluation_order = table.order.iter().map(|&i| table.id(i).to_owned()).collect();

        Analysis::new(
            levels,
            dependency_edges,
            issues,
            required_labels,
            evaluation_order,
        )
    }
}
