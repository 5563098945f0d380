use wafgraph::{label_match, opaque, AclBuilder, Action};

fn main() {
    // Define rules
    let acl = AclBuilder::new()
        .rule("tag-admin", 0, |r| {
            r.action(Action::Count)
                .label("app:admin")
                .when(opaque("ByteMatchStatement"))
        })
        .rule("tag-bot", 1, |r| {
            r.action(Action::Count)
                .label("bot")
                .when(opaque("RegexPatternSetReferenceStatement"))
        })
        .rule("block-bot-admin", 2, |r| {
            r.action(Action::Block)
                .when(label_match("app:admin").and(label_match("bot")))
        })
        .rule("count-scanner", 3, |r| {
            r.action(Action::Count).when(label_match("scanner"))
        })
        .build();

    println!("{acl}");

    let analysis = acl.analyze();
    println!("{analysis}");

    for (level, rules) in &analysis.layers() {
        println!("  level {level}: {}", rules.join(", "));
    }
    for edge in analysis.dependency_edges() {
        println!("  {edge}");
    }
    for issue in analysis.issues() {
        println!("  {issue}");
    }
}
