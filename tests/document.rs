use wafgraph::{Acl, Action, DocumentError, IssueKind, WafGraphError};

const WEB_ACL: &str = r#"{
  "WebACL": {
    "Name": "edge-acl",
    "DefaultAction": {"Allow": {}},
    "Rules": [
      {
        "Name": "AWS-AWSManagedRulesBotControlRuleSet",
        "Priority": 0,
        "OverrideAction": {"None": {}},
        "Statement": {"ManagedRuleGroupStatement": {"VendorName": "AWS", "Name": "AWSManagedRulesBotControlRuleSet"}},
        "RuleLabels": [{"Name": "bot:verified"}],
        "VisibilityConfig": {"MetricName": "AWS-AWSManagedRulesBotControlRuleSet"}
      },
      {
        "Name": "tag-admin",
        "Priority": 1,
        "Action": {"Count": {}},
        "Statement": {"ByteMatchStatement": {"SearchString": "/admin", "FieldToMatch": {"UriPath": {}}}},
        "RuleLabels": [{"Name": "app:admin"}],
        "VisibilityConfig": {"MetricName": "tag-admin"}
      },
      {
        "Name": "block-unverified-admin",
        "Priority": 2,
        "Action": {"Block": {}},
        "Statement": {"AndStatement": {"Statements": [
          {"LabelMatchStatement": {"Scope": "LABEL", "Key": "app:admin"}},
          {"NotStatement": {"Statement": {"LabelMatchStatement": {"Scope": "LABEL", "Key": "bot:verified"}}}}
        ]}},
        "VisibilityConfig": {"MetricName": "block-admin"}
      },
      {
        "Name": "throttle-admin",
        "Priority": 3,
        "Action": {"Captcha": {}},
        "Statement": {"RateBasedStatement": {"Limit": 100, "AggregateKeyType": "IP",
          "ScopeDownStatement": {"LabelMatchStatement": {"Scope": "LABEL", "Key": "app:admin"}}}}
      }
    ]
  }
}"#;

#[test]
fn web_acl_document_end_to_end() {
    let acl = Acl::from_json(WEB_ACL).unwrap();
    assert_eq!(acl.len(), 4);
    assert_eq!(acl.rules()[0].action, Some(Action::OverrideManaged));
    assert_eq!(acl.rules()[3].action, Some(Action::CaptchaOrChallenge));

    let analysis = acl.analyze();
    assert_eq!(
        analysis.dependencies_of("block-unverified-admin"),
        vec!["AWS-AWSManagedRulesBotControlRuleSet", "tag-admin"]
    );
    assert_eq!(analysis.dependencies_of("throttle-admin"), vec!["tag-admin"]);
    assert_eq!(analysis.level_of("block-unverified-admin"), Some(1));
    assert_eq!(
        analysis.required_labels()["block-unverified-admin"],
        vec!["app:admin", "bot:verified"]
    );

    let kinds: Vec<(&str, IssueKind)> = analysis
        .issues()
        .iter()
        .map(|i| (i.rule_name.as_str(), i.kind))
        .collect();
    assert_eq!(
        kinds,
        vec![
            ("block-unverified-admin", IssueKind::TerminalAction),
            ("block-unverified-admin", IssueKind::MetricNameMismatch),
        ]
    );
}

#[test]
fn analysis_serializes_to_camel_case_json() {
    let analysis = Acl::from_json(WEB_ACL).unwrap().analyze();
    let value: serde_json::Value = serde_json::from_str(&analysis.to_json().unwrap()).unwrap();

    assert_eq!(value["levels"]["tag-admin"], 0);
    assert_eq!(value["dependencyEdges"][0]["consumer"], "block-unverified-admin");
    assert_eq!(value["issues"][0]["ruleName"], "block-unverified-admin");
    assert!(value["requiredLabels"]["throttle-admin"].is_array());
    assert_eq!(value["evaluationOrder"].as_array().map(Vec::len), Some(4));
}

#[test]
fn from_value_accepts_parsed_documents() {
    let value: serde_json::Value = serde_json::from_str(WEB_ACL).unwrap();
    assert_eq!(Acl::from_value(value).unwrap().len(), 4);
}

#[test]
fn unnamed_rule_in_document_gets_missing_field() {
    let acl = Acl::from_json(r#"{"Rules": [{"Priority": 0, "Action": {"Count": {}}, "Statement": {"GeoMatchStatement": {}}}]}"#).unwrap();
    let analysis = acl.analyze();
    assert_eq!(analysis.evaluation_order(), &["Rule_0"]);
    assert_eq!(analysis.issues()[0].kind, IssueKind::MissingField);
}

#[test]
fn from_file_reads_and_parses() {
    let dir = std::env::temp_dir().join("wafgraph_test_document");
    std::fs::create_dir_all(&dir).unwrap();

    let good = dir.join("acl.json");
    std::fs::write(&good, WEB_ACL).unwrap();
    assert_eq!(Acl::from_file(&good).unwrap().len(), 4);

    let bad = dir.join("bad.json");
    std::fs::write(&bad, r#"{"Rules": [{"Name": "x", "Action": {"Explode": {}}}]}"#).unwrap();
    let err = Acl::from_file(&bad).unwrap_err();
    assert!(matches!(
        err,
        WafGraphError::Document(DocumentError::UnknownAction { index: 0, .. })
    ));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn mistyped_fields_do_not_sink_the_document() {
    let acl = Acl::from_json(
        r#"{"Rules": [
            {"Name": "ok", "Priority": 0, "Action": {"Count": {}},
             "Statement": {"GeoMatchStatement": {}}, "RuleLabels": [{"Name": "geo"}, {}]},
            {"Name": "bad", "Priority": "3", "Action": {"Block": {}},
             "Statement": {"LabelMatchStatement": {"Scope": "LABEL", "Key": "geo"}}}
        ]}"#,
    )
    .unwrap();
    let analysis = acl.analyze();

    assert_eq!(analysis.evaluation_order(), &["ok", "bad"]);
    assert_eq!(analysis.dependencies_of("bad"), vec!["ok"]);
    let kinds: Vec<IssueKind> = analysis.issues_for("bad").iter().map(|i| i.kind).collect();
    assert_eq!(kinds, vec![IssueKind::MissingField, IssueKind::TerminalAction]);
    assert!(analysis.issues_for("ok").is_empty());
}
