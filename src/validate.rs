use crate::analyze::Analyzer;
use crate::graph::DependencyGraph;
use crate::labels::LabelIndex;
use crate::table::RuleTable;
use crate::{Action, Issue, IssueKind};

/// Run every enabled check against every rule.
///
/// Checks are independent: nothing short-circuits, so one defective rule
/// never hides findings on another. Issues come out rule by rule in
/// evaluation order, and per rule in [`IssueKind::ALL`] order.
///
/// The redundancy check compares every pair of rules and is `O(n²)` in the
/// rule count; it dominates for ACLs with thousands of rules.
pub(crate) fn validate(
    table: &RuleTable<'_>,
    graph: &DependencyGraph<'_>,
    index: &LabelIndex<'_>,
    analyzer: &Analyzer,
) -> Vec<Issue> {
    let validator = Validator {
        table,
        graph,
        index,
    };
    let mut issues = Vec::new();

    for &r in &table.order {
        for kind in IssueKind::ALL {
            if !analyzer.runs(kind) {
                continue;
            }
            match kind {
                IssueKind::MissingField => validator.missing_fields(r, &mut issues),
                IssueKind::SelfDependency => validator.self_dependency(r, &mut issues),
                IssueKind::MissingLabel => validator.missing_labels(r, &mut issues),
                IssueKind::InvalidDependencyAction => {
                    validator.terminal_dependencies(r, &mut issues);
                }
                IssueKind::PriorityViolation => validator.priority_order(r, &mut issues),
                IssueKind::CircularDependency => validator.circular(r, &mut issues),
                IssueKind::RedundantRule => validator.redundant(r, &mut issues),
                IssueKind::DuplicateLabelProducer => {
                    validator.duplicate_producers(r, &mut issues);
                }
                IssueKind::TerminalAction => validator.terminal_action(r, &mut issues),
                IssueKind::DuplicateRuleName => validator.duplicate_name(r, &mut issues),
                IssueKind::MetricNameMismatch => validator.metric_name(r, &mut issues),
            }
        }
    }

    issues
}

struct Validator<'t, 'a> {
    table: &'t RuleTable<'a>,
    graph: &'t DependencyGraph<'a>,
    index: &'t LabelIndex<'a>,
}

impl Validator<'_, '_> {
    fn missing_fields(&self, r: usize, out: &mut Vec<Issue>) {
        let rule = &self.table.rules[r];
        let missing = [
            ("Name", rule.name.is_none()),
            ("Priority", rule.priority.is_none()),
            ("Action", rule.action.is_none()),
            ("Statement", rule.statement.is_none()),
        ];
        for (field, absent) in missing {
            if absent {
                out.push(Issue::new(
                    self.table.id(r),
                    IssueKind::MissingField,
                    format!("missing required field: {field}"),
                ));
            }
        }
    }

    fn self_dependency(&self, r: usize, out: &mut Vec<Issue>) {
        let rule = &self.table.rules[r];
        for label in &self.graph.needed_labels[r] {
            if rule.produces(label) {
                out.push(Issue::new(
                    self.table.id(r),
                    IssueKind::SelfDependency,
                    format!("matches on label '{label}', which it produces itself"),
                ));
            }
        }
    }

    fn missing_labels(&self, r: usize, out: &mut Vec<Issue>) {
        for label in &self.graph.needed_labels[r] {
            if !self.index.contains(label) {
                out.push(Issue::new(
                    self.table.id(r),
                    IssueKind::MissingLabel,
                    format!("matches on label '{label}', which no rule produces"),
                ));
            }
        }
    }

    fn terminal_dependencies(&self, r: usize, out: &mut Vec<Issue>) {
        for &d in &self.graph.depends_on[r] {
            if let Some(action) = self.table.rules[d].action.filter(|a| a.is_terminal()) {
                out.push(Issue::new(
                    self.table.id(r),
                    IssueKind::InvalidDependencyAction,
                    format!(
                        "depends on '{}', whose action {action} ends evaluation before this rule runs",
                        self.table.id(d)
                    ),
                ));
            }
        }
    }

    fn priority_order(&self, r: usize, out: &mut Vec<Issue>) {
        let rules = self.table.rules;
        for &d in &self.graph.depends_on[r] {
            if let (Some(own), Some(dep)) = (rules[r].priority, rules[d].priority) {
                if dep > own {
                    out.push(Issue::new(
                        self.table.id(r),
                        IssueKind::PriorityViolation,
                        format!(
                            "priority {own} depends on '{}' at priority {dep}, which is evaluated later",
                            self.table.id(d)
                        ),
                    ));
                }
            }
        }
    }

    fn circular(&self, r: usize, out: &mut Vec<Issue>) {
        if let Some(cycle) = self.cycle_through(r) {
            let path: Vec<&str> = cycle.iter().map(|&i| self.table.id(i)).collect();
            out.push(Issue::new(
                self.table.id(r),
                IssueKind::CircularDependency,
                format!("circular dependency: {}", path.join(" -> ")),
            ));
        }
    }

    /// Stack-based DFS seeded at `r`. Returns the path back to `r` if one
    /// of the rules reachable from `r` depends on `r` again.
    fn cycle_through(&self, r: usize) -> Option<Vec<usize>> {
        let deps = &self.graph.depends_on;
        let mut visited = vec![false; self.table.len()];
        visited[r] = true;
        // (node, index of the next dependency to explore)
        let mut stack: Vec<(usize, usize)> = vec![(r, 0)];

        while let Some(top) = stack.last_mut() {
            let (node, next) = *top;
            top.1 += 1;
            match deps[node].get(next) {
                Some(&dep) if dep == r => {
                    let mut path: Vec<usize> = stack.iter().map(|&(n, _)| n).collect();
                    path.push(r);
                    return Some(path);
                }
                Some(&dep) => {
                    if !visited[dep] {
                        visited[dep] = true;
                        stack.push((dep, 0));
                    }
                }
                None => {
                    stack.pop();
                }
            }
        }
        None
    }

    /// A rule is redundant when a rule evaluated strictly earlier, with the
    /// same action, already attaches every label it attaches. A rule that
    /// attaches no labels is only covered by an earlier rule with an
    /// identical statement.
    fn redundant(&self, r: usize, out: &mut Vec<Issue>) {
        let rules = self.table.rules;
        let rule = &rules[r];
        let Some(action) = rule.action else {
            return;
        };

        for &other in &self.table.order {
            if other == r || rules[other].action != Some(action) {
                continue;
            }
            if !self.table.strictly_before(other, r) {
                continue;
            }
            let covered = if rule.produced_labels.is_empty() {
                rule.statement.is_some() && rule.statement == rules[other].statement
            } else {
                rule.produced_labels.iter().all(|l| rules[other].produces(l))
            };
            if covered {
                out.push(Issue::new(
                    self.table.id(r),
                    IssueKind::RedundantRule,
                    format!(
                        "covered by '{}', which is evaluated earlier with the same action ({action})",
                        self.table.id(other)
                    ),
                ));
            }
        }
    }

    fn duplicate_producers(&self, r: usize, out: &mut Vec<Issue>) {
        for label in self.table.rules[r].distinct_labels() {
            let producers = self.index.producers(label);
            if producers.len() > 1 {
                let names: Vec<&str> = producers.iter().map(|&p| self.table.id(p)).collect();
                out.push(Issue::new(
                    self.table.id(r),
                    IssueKind::DuplicateLabelProducer,
                    format!("label '{label}' is produced by multiple rules: {}", names.join(", ")),
                ));
            }
        }
    }

    fn terminal_action(&self, r: usize, out: &mut Vec<Issue>) {
        if self.table.rules[r].action == Some(Action::Block) {
            out.push(Issue::new(
                self.table.id(r),
                IssueKind::TerminalAction,
                "blocking rule; blocked requests skip every later rule",
            ));
        }
    }

    fn duplicate_name(&self, r: usize, out: &mut Vec<Issue>) {
        if let Some(first) = self.table.shadows[r] {
            out.push(Issue::new(
                self.table.id(r),
                IssueKind::DuplicateRuleName,
                format!(
                    "name already used by the rule at position {first}; reported as '{}'",
                    self.table.id(r)
                ),
            ));
        }
    }

    fn metric_name(&self, r: usize, out: &mut Vec<Issue>) {
        let rule = &self.table.rules[r];
        if let (Some(name), Some(metric)) = (&rule.name, &rule.metric_name) {
            if name != metric {
                out.push(Issue::new(
                    self.table.id(r),
                    IssueKind::MetricNameMismatch,
                    format!("metric name '{metric}' does not match rule name"),
                ));
            }
        }
    }
}
