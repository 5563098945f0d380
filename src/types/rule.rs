use super::action::Action;
use super::statement::Statement;

/// One entry of a web ACL.
///
/// Every field except `produced_labels` is optional so that a malformed rule
/// can still be represented and reported on instead of being dropped. Rules
/// are usually created via [`AclBuilder`](super::AclBuilder) or loaded with
/// [`Acl::from_json()`](super::Acl::from_json).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Rule {
    pub name: Option<String>,
    /// Lower values are evaluated first.
    pub priority: Option<i64>,
    pub action: Option<Action>,
    pub statement: Option<Statement>,
    /// Labels attached to a request when this rule matches, in declaration
    /// order. A set: repeats are ignored by the analysis.
    pub produced_labels: Vec<String>,
    /// `VisibilityConfig.MetricName`, if the source carried one.
    pub metric_name: Option<String>,
}

impl Rule {
    /// Add a produced label, ignoring repeats.
    pub(crate) fn push_label(&mut self, label: &str) {
        if !self.produced_labels.iter().any(|l| l == label) {
            self.produced_labels.push(label.to_owned());
        }
    }

    /// Produced labels with repeats dropped, in declaration order.
    pub(crate) fn distinct_labels(&self) -> impl Iterator<Item = &str> + '_ {
        self.produced_labels
            .iter()
            .enumerate()
            .filter(|(i, label)| !self.produced_labels[..*i].contains(*label))
            .map(|(_, label)| label.as_str())
    }

    #[must_use]
    pub fn produces(&self, label: &str) -> bool {
        self.produced_labels.iter().any(|l| l == label)
    }
}
