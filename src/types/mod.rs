mod acl;
mod action;
mod analysis;
mod issue;
mod rule;
mod statement;

pub use acl::{Acl, AclBuilder, RuleBuilder};
pub use action::Action;
pub use analysis::{Analysis, DependencyEdge};
pub use issue::{Issue, IssueKind, Severity};
pub use rule::Rule;
pub use statement::{Statement, all_of, any_of, label_match, opaque, rate_based};
