use std::collections::BTreeSet;

use crate::Statement;

/// Every label key a statement matches on, at any depth.
pub(crate) fn extract_label_keys(statement: &Statement) -> BTreeSet<&str> {
    let mut keys = BTreeSet::new();
    collect_label_keys(statement, &mut keys);
    keys
}

fn collect_label_keys<'a>(statement: &'a Statement, keys: &mut BTreeSet<&'a str>) {
    if let Statement::LabelMatch { key } = statement {
        keys.insert(key.as_str());
    }
    for child in find_sub_statements(statement) {
        collect_label_keys(child, keys);
    }
}

/// Direct children of a statement: the operands of `And`/`Or`, the operand of
/// `Not`, and a rate-based scope-down if one is present. Leaves have none.
pub(crate) fn find_sub_statements(statement: &Statement) -> Vec<&Statement> {
    match statement {
        Statement::And(children) | Statement::Or(children) => children.iter().collect(),
        Statement::Not(inner) => vec![inner.as_ref()],
        Statement::RateBased {
            scope_down: Some(inner),
        } => vec![inner.as_ref()],
        Statement::RateBased { scope_down: None }
        | Statement::LabelMatch { .. }
        | Statement::Opaque { .. } => Vec::new(),
    }
}
