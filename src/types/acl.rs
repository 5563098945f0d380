use std::fmt;

use super::action::Action;
use super::analysis::Analysis;
use super::rule::Rule;
use super::statement::Statement;

/// Builder for constructing an [`Acl`] in code.
///
/// # Example
///
/// ```
/// use wafgraph::{label_match, opaque, Action, AclBuilder};
///
/// let acl = AclBuilder::new()
///     .rule("tag_admin", 0, |r| {
///         r.action(Action::Count)
///             .label("admin")
///             .when(opaque("ByteMatchStatement"))
///     })
///     .rule("block_admin", 1, |r| r.action(Action::Block).when(label_match("admin")))
///     .build();
///
/// let analysis = acl.analyze();
/// assert_eq!(analysis.level_of("block_admin"), Some(1));
/// ```
#[derive(Debug, Default)]
pub struct AclBuilder {
    rules: Vec<Rule>,
}

/// Intermediate builder passed to the rule definition closure.
#[derive(Debug)]
pub struct RuleBuilder {
    rule: Rule,
}

impl AclBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Define a rule. The closure sets the action, statement and labels; any
    /// of them left unset is reported as a missing field on analysis.
    #[must_use]
    pub fn rule(
        mut self,
        name: &str,
        priority: i64,
        f: impl FnOnce(RuleBuilder) -> RuleBuilder,
    ) -> Self {
        let builder = f(RuleBuilder {
            rule: Rule {
                name: Some(name.to_owned()),
                priority: Some(priority),
                ..Rule::default()
            },
        });
        self.rules.push(builder.rule);
        self
    }

    /// Define a rule with no name. It is given a placeholder identity
    /// (`Rule_<position>`) during analysis.
    #[must_use]
    pub fn unnamed_rule(mut self, priority: i64, f: impl FnOnce(RuleBuilder) -> RuleBuilder) -> Self {
        let builder = f(RuleBuilder {
            rule: Rule {
                priority: Some(priority),
                ..Rule::default()
            },
        });
        self.rules.push(builder.rule);
        self
    }

    #[must_use]
    pub fn build(self) -> Acl {
        Acl { rules: self.rules }
    }
}

impl RuleBuilder {
    #[must_use]
    pub fn action(mut self, action: Action) -> Self {
        self.rule.action = Some(action);
        self
    }

    /// Set the match statement.
    #[must_use]
    pub fn when(mut self, statement: Statement) -> Self {
        self.rule.statement = Some(statement);
        self
    }

    /// Attach a label the rule produces. Repeats are ignored.
    #[must_use]
    pub fn label(mut self, label: &str) -> Self {
        self.rule.push_label(label);
        self
    }

    #[must_use]
    pub fn labels<'a>(mut self, labels: impl IntoIterator<Item = &'a str>) -> Self {
        for label in labels {
            self.rule.push_label(label);
        }
        self
    }

    #[must_use]
    pub fn metric_name(mut self, metric: &str) -> Self {
        self.rule.metric_name = Some(metric.to_owned());
        self
    }
}

/// An immutable snapshot of a web ACL's rules, in input order.
///
/// Cheap to share across threads: analysis only borrows it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Acl {
    pub(crate) rules: Vec<Rule>,
}

impl Acl {
    #[must_use]
    pub fn from_rules(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// Parse a rule-set JSON document.
    ///
    /// Accepts `{"Rules": [...]}`, `{"WebACL": {"Rules": [...]}}` or a bare
    /// rule array.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError`](crate::DocumentError) if the input is not
    /// JSON or has no recognizable rule array.
    pub fn from_json(input: &str) -> Result<Self, crate::DocumentError> {
        crate::document::from_json(input)
    }

    /// Convert an already parsed JSON value.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError`](crate::DocumentError) if the value has no
    /// recognizable rule array.
    pub fn from_value(value: serde_json::Value) -> Result<Self, crate::DocumentError> {
        crate::document::from_value(value)
    }

    /// Read a rule-set document from disk.
    ///
    /// # Errors
    ///
    /// Returns [`WafGraphError`](crate::WafGraphError) on I/O or document failure.
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, crate::WafGraphError> {
        let input = std::fs::read_to_string(path)?;
        Ok(Self::from_json(&input)?)
    }

    /// Run every check with the default configuration.
    pub fn analyze(&self) -> Analysis {
        crate::Analyzer::new().analyze(self)
    }

    #[must_use]
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl fmt::Display for Acl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Acl({} rules)", self.rules.len())
    }
}
