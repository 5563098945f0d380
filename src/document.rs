//! Loading of rule-set JSON documents.
//!
//! The accepted shape follows the cloud provider's web ACL export:
//!
//! ```json
//! {
//!   "Rules": [
//!     {
//!       "Name": "tag-admin",
//!       "Priority": 0,
//!       "Action": { "Count": {} },
//!       "Statement": { "ByteMatchStatement": { "SearchString": "/admin" } },
//!       "RuleLabels": [{ "Name": "admin" }],
//!       "VisibilityConfig": { "MetricName": "tag-admin" }
//!     }
//!   ]
//! }
//! ```
//!
//! The rule array may also be wrapped as `{"WebACL": {"Rules": [...]}}` or
//! given bare. Statement types other than the label-bearing ones are kept as
//! opaque leaves.

use std::collections::{BTreeMap, HashSet};

use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, instrument, warn};

use crate::{Acl, Action, Rule, Statement};

/// Errors that can occur while loading a rule-set document.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("no rule array found: expected `Rules`, `WebACL.Rules` or a top-level array")]
    NoRules,

    #[error("rule at position {index} is malformed: {source}")]
    MalformedRule {
        index: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("rule at position {index} has unknown action '{action}'")]
    UnknownAction { index: usize, action: String },
}

/// Top-level rule fields are kept untyped so one mistyped field degrades to
/// "absent" instead of failing the whole document.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawRule {
    name: Option<serde_json::Value>,
    priority: Option<serde_json::Value>,
    action: Option<serde_json::Value>,
    override_action: Option<serde_json::Value>,
    statement: Option<serde_json::Value>,
    rule_labels: Option<serde_json::Value>,
    visibility_config: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawLabel {
    name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawVisibility {
    metric_name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawStatement {
    label_match_statement: Option<RawLabelMatch>,
    and_statement: Option<RawStatementList>,
    or_statement: Option<RawStatementList>,
    not_statement: Option<RawNot>,
    rate_based_statement: Option<RawRateBased>,
    /// Every other statement type, keyed by its type name.
    #[serde(flatten)]
    other: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawLabelMatch {
    key: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawStatementList {
    #[serde(default)]
    statements: Vec<RawStatement>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawNot {
    statement: Box<RawStatement>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawRateBased {
    scope_down_statement: Option<Box<RawStatement>>,
}

pub(crate) fn from_json(input: &str) -> Result<Acl, DocumentError> {
    let value: serde_json::Value = serde_json::from_str(input)?;
    from_value(value)
}

#[instrument(skip_all)]
pub(crate) fn from_value(value: serde_json::Value) -> Result<Acl, DocumentError> {
    let entries = rule_array(value).ok_or(DocumentError::NoRules)?;

    let rules = entries
        .into_iter()
        .enumerate()
        .map(|(index, entry)| {
            let malformed = |source| DocumentError::MalformedRule { index, source };
            let object: serde_json::Map<String, serde_json::Value> =
                serde_json::from_value(entry).map_err(malformed)?;
            let raw = RawRule::deserialize(serde_json::Value::Object(object)).map_err(malformed)?;
            convert_rule(index, raw)
        })
        .collect::<Result<Vec<_>, DocumentError>>()?;

    let mut seen = HashSet::new();
    for (index, rule) in rules.iter().enumerate() {
        let Some(name) = rule.name.as_deref() else {
            continue;
        };
        if !seen.insert(name) {
            warn!(index, name, "duplicate rule name; using a placeholder identity");
        }
    }

    debug!(rules = rules.len(), "rule-set document loaded");
    Ok(Acl::from_rules(rules))
}

fn rule_array(value: serde_json::Value) -> Option<Vec<serde_json::Value>> {
    match value {
        serde_json::Value::Array(entries) => Some(entries),
        serde_json::Value::Object(mut map) => match map.remove("Rules") {
            Some(serde_json::Value::Array(entries)) => Some(entries),
            Some(_) => None,
            None => map.remove("WebACL").and_then(rule_array),
        },
        _ => None,
    }
}

/// Decode an optional field, treating a value of the wrong shape as absent.
fn typed<T: DeserializeOwned>(
    index: usize,
    field: &'static str,
    value: Option<serde_json::Value>,
) -> Option<T> {
    let value = value.filter(|v| !v.is_null())?;
    match serde_json::from_value(value) {
        Ok(decoded) => Some(decoded),
        Err(error) => {
            warn!(index, field, %error, "ignoring malformed field");
            None
        }
    }
}

fn convert_rule(index: usize, raw: RawRule) -> Result<Rule, DocumentError> {
    let name: Option<String> = typed(index, "Name", raw.name);
    if name.is_none() {
        warn!(index, "rule has no name; using a placeholder identity");
    }

    let action_map: Option<BTreeMap<String, serde_json::Value>> =
        typed(index, "Action", raw.action);
    let action = match action_map {
        Some(action) => Some(parse_action(index, &action)?),
        None if raw.override_action.is_some() => Some(Action::OverrideManaged),
        None => None,
    };

    let mut rule = Rule {
        name,
        priority: typed(index, "Priority", raw.priority),
        action,
        statement: raw.statement.map(|value| decode_statement(index, value)),
        produced_labels: Vec::new(),
        metric_name: typed::<RawVisibility>(index, "VisibilityConfig", raw.visibility_config)
            .and_then(|v| v.metric_name),
    };

    let labels: Vec<serde_json::Value> =
        typed(index, "RuleLabels", raw.rule_labels).unwrap_or_default();
    for entry in labels {
        match serde_json::from_value::<RawLabel>(entry) {
            Ok(label) => rule.push_label(&label.name),
            Err(error) => warn!(index, %error, "skipping rule label without a name"),
        }
    }
    Ok(rule)
}

/// A statement that does not fit the known shapes stays an opaque leaf named
/// after its type key, so the rule still counts as having a statement.
fn decode_statement(index: usize, value: serde_json::Value) -> Statement {
    let kind = value
        .as_object()
        .and_then(|map| map.keys().next().cloned())
        .unwrap_or_else(|| "Malformed".to_owned());
    match serde_json::from_value::<RawStatement>(value) {
        Ok(raw) => convert_statement(raw),
        Err(error) => {
            warn!(index, %error, "statement not understood; treating it as opaque");
            Statement::Opaque { kind }
        }
    }
}

fn parse_action(
    index: usize,
    action: &BTreeMap<String, serde_json::Value>,
) -> Result<Action, DocumentError> {
    let Some(key) = action.keys().next() else {
        return Err(DocumentError::UnknownAction {
            index,
            action: String::new(),
        });
    };
    match key.as_str() {
        "Block" => Ok(Action::Block),
        "Allow" => Ok(Action::Allow),
        "Count" => Ok(Action::Count),
        "Captcha" | "Challenge" => Ok(Action::CaptchaOrChallenge),
        other => Err(DocumentError::UnknownAction {
            index,
            action: other.to_owned(),
        }),
    }
}

fn convert_statement(raw: RawStatement) -> Statement {
    if let Some(label) = raw.label_match_statement {
        return Statement::LabelMatch { key: label.key };
    }
    if let Some(list) = raw.and_statement {
        return Statement::And(list.statements.into_iter().map(convert_statement).collect());
    }
    if let Some(list) = raw.or_statement {
        return Statement::Or(list.statements.into_iter().map(convert_statement).collect());
    }
    if let Some(not) = raw.not_statement {
        return Statement::Not(Box::new(convert_statement(*not.statement)));
    }
    if let Some(rate) = raw.rate_based_statement {
        return Statement::RateBased {
            scope_down: rate
                .scope_down_statement
                .map(|inner| Box::new(convert_statement(*inner))),
        };
    }
    let kind = raw
        .other
        .into_keys()
        .next()
        .unwrap_or_else(|| "Empty".to_owned());
    Statement::Opaque { kind }
}
