use std::sync::Arc;
use std::thread;

use wafgraph::{label_match, opaque, AclBuilder, Action, Analyzer};

fn main() {
    let analyzer = Arc::new(Analyzer::new());

    let handles: Vec<_> = (0..4_i64)
        .map(|i| {
            let analyzer = Arc::clone(&analyzer);
            thread::spawn(move || {
                // Each worker owns its ACL; the consumer's priority moves
                // past the producer's as `i` grows.
                let acl = AclBuilder::new()
                    .rule("producer", 2, |r| {
                        r.action(Action::Count).label("x").when(opaque("GeoMatchStatement"))
                    })
                    .rule("consumer", i, |r| r.action(Action::Count).when(label_match("x")))
                    .build();

                let analysis = analyzer.analyze(&acl);
                println!("Thread {i}: {analysis}");
            })
        })
        .collect();

    for h in handles {
        h.join().unwrap();
    }
}
