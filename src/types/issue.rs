use std::fmt;

use serde::{Deserialize, Serialize};

/// How seriously a caller should take an [`Issue`].
///
/// Ordered: `Info < Warning < Error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// The structural defect an [`Issue`] reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum IssueKind {
    /// `Name`, `Priority`, `Action` or `Statement` is absent.
    MissingField,
    /// The rule consumes a label it produces itself.
    SelfDependency,
    /// The rule consumes a label no rule produces.
    MissingLabel,
    /// The rule depends on a `Block` or `Allow` rule.
    InvalidDependencyAction,
    /// The rule depends on a rule evaluated after it.
    PriorityViolation,
    /// The rule reaches itself through its dependencies.
    CircularDependency,
    /// An earlier rule with the same action already covers this one.
    RedundantRule,
    /// One of the rule's labels is produced by several rules.
    DuplicateLabelProducer,
    /// The rule blocks. Informational.
    TerminalAction,
    /// The rule's name was already used by an earlier rule.
    DuplicateRuleName,
    /// `VisibilityConfig.MetricName` differs from the rule name.
    MetricNameMismatch,
}

impl IssueKind {
    /// Every kind, in the order checks run.
    pub const ALL: [IssueKind; 11] = [
        IssueKind::MissingField,
        IssueKind::SelfDependency,
        IssueKind::MissingLabel,
        IssueKind::InvalidDependencyAction,
        IssueKind::PriorityViolation,
        IssueKind::CircularDependency,
        IssueKind::RedundantRule,
        IssueKind::DuplicateLabelProducer,
        IssueKind::TerminalAction,
        IssueKind::DuplicateRuleName,
        IssueKind::MetricNameMismatch,
    ];

    #[must_use]
    pub fn severity(self) -> Severity {
        match self {
            IssueKind::MissingField
            | IssueKind::SelfDependency
            | IssueKind::MissingLabel
            | IssueKind::InvalidDependencyAction
            | IssueKind::PriorityViolation
            | IssueKind::CircularDependency
            | IssueKind::DuplicateRuleName => Severity::Error,
            IssueKind::RedundantRule | IssueKind::DuplicateLabelProducer => Severity::Warning,
            IssueKind::TerminalAction | IssueKind::MetricNameMismatch => Severity::Info,
        }
    }
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            IssueKind::MissingField => "missing field",
            IssueKind::SelfDependency => "self dependency",
            IssueKind::MissingLabel => "missing label",
            IssueKind::InvalidDependencyAction => "invalid dependency action",
            IssueKind::PriorityViolation => "priority violation",
            IssueKind::CircularDependency => "circular dependency",
            IssueKind::RedundantRule => "redundant rule",
            IssueKind::DuplicateLabelProducer => "duplicate label producer",
            IssueKind::TerminalAction => "terminal action",
            IssueKind::DuplicateRuleName => "duplicate rule name",
            IssueKind::MetricNameMismatch => "metric name mismatch",
        };
        write!(f, "{s}")
    }
}

/// A single finding against one rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    pub rule_name: String,
    pub kind: IssueKind,
    pub message: String,
}

impl Issue {
    pub(crate) fn new(rule_name: &str, kind: IssueKind, message: impl Into<String>) -> Self {
        Self {
            rule_name: rule_name.to_owned(),
            kind,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn severity(&self) -> Severity {
        self.kind.severity()
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} ({}): {}",
            self.severity(),
            self.rule_name,
            self.kind,
            self.message
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_ordering() {
        assert!(Severity::Info < Severity::Warning);
        assert!(Severity::Warning < Severity::Error);
    }

    #[test]
    fn terminal_action_is_informational() {
        assert_eq!(IssueKind::TerminalAction.severity(), Severity::Info);
        assert_eq!(IssueKind::RedundantRule.severity(), Severity::Warning);
        assert_eq!(IssueKind::CircularDependency.severity(), Severity::Error);
    }

    #[test]
    fn all_lists_every_kind_once() {
        let mut kinds = IssueKind::ALL.to_vec();
        kinds.sort();
        kinds.dedup();
        assert_eq!(kinds.len(), IssueKind::ALL.len());
    }

    #[test]
    fn issue_display() {
        let issue = Issue::new("B", IssueKind::MissingLabel, "label 'x' is produced by no rule");
        assert_eq!(
            issue.to_string(),
            "[error] B (missing label): label 'x' is produced by no rule"
        );
    }

    #[test]
    fn issue_serializes_camel_case() {
        let issue = Issue::new("A", IssueKind::TerminalAction, "blocks");
        let json = serde_json::to_value(&issue).unwrap();
        assert_eq!(json["ruleName"], "A");
        assert_eq!(json["kind"], "TerminalAction");
    }
}
