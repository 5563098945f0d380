use std::process::ExitCode;

use wafgraph::{Acl, Analyzer, Severity};

const SAMPLE: &str = r#"{"Rules": [
    {"Name": "tag-admin", "Priority": 0, "Action": {"Count": {}},
     "Statement": {"ByteMatchStatement": {"SearchString": "/admin"}},
     "RuleLabels": [{"Name": "app:admin"}],
     "VisibilityConfig": {"MetricName": "tag-admin"}},
    {"Name": "block-admin", "Priority": 1, "Action": {"Block": {}},
     "Statement": {"LabelMatchStatement": {"Scope": "LABEL", "Key": "app:admin"}},
     "RuleLabels": [{"Name": "blocked"}],
     "VisibilityConfig": {"MetricName": "block-admin"}},
    {"Name": "count-blocked", "Priority": 2, "Action": {"Count": {}},
     "Statement": {"LabelMatchStatement": {"Scope": "LABEL", "Key": "blocked"}},
     "VisibilityConfig": {"MetricName": "count-blocked"}}
]}"#;

/// Analyze the rule-set document named on the command line, or a built-in
/// sample, and print the result as JSON. Exits non-zero on error issues.
fn main() -> ExitCode {
    let acl = match std::env::args().nth(1) {
        Some(path) => Acl::from_file(&path),
        None => Acl::from_json(SAMPLE).map_err(Into::into),
    };
    let acl = match acl {
        Ok(acl) => acl,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::from(2);
        }
    };

    let analysis = Analyzer::new().min_severity(Severity::Warning).analyze(&acl);
    match analysis.to_json() {
        Ok(json) => println!("{json}"),
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::from(2);
        }
    }

    if analysis.has_errors() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
