use std::fmt;
use std::ops::Not;

/// A rule's match expression.
///
/// Only [`Statement::LabelMatch`] carries dependency information. The logical
/// variants and rate-based scope-downs are containers; every other match type
/// (byte match, geo match, IP sets, managed rule groups, ...) collapses into
/// [`Statement::Opaque`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    LabelMatch { key: String },
    And(Vec<Statement>),
    Or(Vec<Statement>),
    Not(Box<Statement>),
    RateBased { scope_down: Option<Box<Statement>> },
    /// Any match type with no label semantics. `kind` is the source statement
    /// type name, kept for display only.
    Opaque { kind: String },
}

impl Statement {
    /// Conjunction. Chained `and` calls extend the same `And` node instead of
    /// nesting.
    #[must_use]
    pub fn and(self, other: Statement) -> Statement {
        match self {
            Statement::And(mut children) => {
                children.push(other);
                Statement::And(children)
            }
            first => Statement::And(vec![first, other]),
        }
    }

    #[must_use]
    pub fn or(self, other: Statement) -> Statement {
        match self {
            Statement::Or(mut children) => {
                children.push(other);
                Statement::Or(children)
            }
            first => Statement::Or(vec![first, other]),
        }
    }

    /// Attach a scope-down to a rate-based statement. Has no effect on any
    /// other variant.
    #[must_use]
    pub fn scope_down(self, inner: Statement) -> Statement {
        match self {
            Statement::RateBased { .. } => Statement::RateBased {
                scope_down: Some(Box::new(inner)),
            },
            other => other,
        }
    }
}

impl Not for Statement {
    type Output = Statement;

    fn not(self) -> Statement {
        Statement::Not(Box::new(self))
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Statement::LabelMatch { key } => write!(f, "label({key})"),
            Statement::And(children) => write_joined(f, children, " AND "),
            Statement::Or(children) => write_joined(f, children, " OR "),
            Statement::Not(inner) => write!(f, "(NOT {inner})"),
            Statement::RateBased { scope_down: None } => write!(f, "rate()"),
            Statement::RateBased {
                scope_down: Some(inner),
            } => write!(f, "rate({inner})"),
            Statement::Opaque { kind } => write!(f, "{kind}"),
        }
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, children: &[Statement], sep: &str) -> fmt::Result {
    write!(f, "(")?;
    for (i, child) in children.iter().enumerate() {
        if i > 0 {
            write!(f, "{sep}")?;
        }
        write!(f, "{child}")?;
    }
    write!(f, ")")
}

#[must_use]
pub fn label_match(key: &str) -> Statement {
    Statement::LabelMatch {
        key: key.to_owned(),
    }
}

#[must_use]
pub fn all_of(children: impl IntoIterator<Item = Statement>) -> Statement {
    Statement::And(children.into_iter().collect())
}

#[must_use]
pub fn any_of(children: impl IntoIterator<Item = Statement>) -> Statement {
    Statement::Or(children.into_iter().collect())
}

/// A rate-based statement without a scope-down.
#[must_use]
pub fn rate_based() -> Statement {
    Statement::RateBased { scope_down: None }
}

#[must_use]
pub fn opaque(kind: &str) -> Statement {
    Statement::Opaque {
        kind: kind.to_owned(),
    }
}
