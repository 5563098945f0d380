//! Dependency analysis and linting for label-driven web ACL rule sets.
//!
//! Rules attach labels to requests and later rules match on them. This crate
//! derives the "depends-on" graph those labels imply, assigns each rule a
//! dependency level, and reports configuration defects: missing labels,
//! priority ordering violations, cycles, dependencies on terminating rules,
//! redundant rules and more.
//!
//! ```
//! use wafgraph::{label_match, opaque, Action, AclBuilder, IssueKind};
//!
//! let acl = AclBuilder::new()
//!     .rule("tag-admin", 0, |r| {
//!         r.action(Action::Count).label("admin").when(opaque("ByteMatchStatement"))
//!     })
//!     .rule("block-admin", 1, |r| r.action(Action::Block).when(label_match("admin")))
//!     .build();
//!
//! let analysis = acl.analyze();
//! assert_eq!(analysis.level_of("block-admin"), Some(1));
//! assert_eq!(analysis.dependencies_of("block-admin"), vec!["tag-admin"]);
//! assert!(!analysis.has_errors());
//! assert_eq!(analysis.count_by_kind().get(&IssueKind::TerminalAction), Some(&1));
//! ```

mod analyze;
mod document;
mod error;
mod graph;
mod labels;
mod levels;
mod table;
mod types;
mod validate;
mod walk;

pub use analyze::Analyzer;
pub use document::DocumentError;
pub use error::WafGraphError;
pub use types::{
    Acl, AclBuilder, Action, Analysis, DependencyEdge, Issue, IssueKind, Rule, RuleBuilder,
    Severity, Statement, all_of, any_of, label_match, opaque, rate_based,
};
