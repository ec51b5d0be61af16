use std::collections::HashMap;

use solvra_gremlin::structure::modern;
use solvra_gremlin::traversal::lambda::Lambda;
use solvra_gremlin::{ErrorCode, GraphTraversalSource, Pick, Traversal, Value, anon};

fn g() -> GraphTraversalSource {
    GraphTraversalSource::new(modern().expect("modern graph"))
}

fn sorted_strings(traversal: Traversal) -> Vec<String> {
    let mut results: Vec<String> = traversal
        .map(|result| result.expect("traverser").to_string())
        .collect();
    results.sort();
    results
}

fn sorted(expected: &[&str]) -> Vec<String> {
    let mut expected: Vec<String> = expected.iter().map(|s| s.to_string()).collect();
    expected.sort();
    expected
}

#[test]
fn choose_by_out_count_with_options() {
    let mut traversal = g()
        .v()
        .choose(anon::out().count())
        .option(2, anon::values("name"))
        .and_then(|t| t.option(3, anon::value_map()))
        .expect("options");
    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut counter = 0;
    while traversal.has_next().expect("has next") {
        let value = traversal.next().expect("value").expect("traverser");
        *counts.entry(value.to_string()).or_default() += 1;
        counter += 1;
    }
    assert!(!traversal.has_next().expect("has next"));
    assert_eq!(counter, 2);
    assert_eq!(counts.len(), 2);
    assert_eq!(counts.get("{name=[marko], age=[29]}"), Some(&1));
    assert_eq!(counts.get("josh"), Some(&1));
}

#[test]
fn choose_by_lambda_on_label() {
    let traversal = g()
        .v()
        .choose_lambda(
            Lambda::predicate("label_is_person", |graph, v| {
                graph.label(v).as_deref() == Some("person")
            }),
            anon::out_labeled("knows"),
            anon::in_labeled("created"),
        )
        .values("name");
    assert_eq!(
        sorted_strings(traversal),
        sorted(&["josh", "vadas", "josh", "josh", "marko", "peter"])
    );
}

#[test]
fn choose_by_lambda_follows_vertex_order() {
    let traversal = g()
        .v()
        .choose_lambda(
            Lambda::predicate("label_is_person", |graph, v| {
                graph.label(v).as_deref() == Some("person")
            }),
            anon::out_labeled("knows"),
            anon::in_labeled("created"),
        )
        .values("name");
    let names: Vec<String> = traversal
        .to_list()
        .expect("traversal")
        .iter()
        .map(ToString::to_string)
        .collect();
    // marko, vadas, lop, josh, ripple, peter in turn.
    assert_eq!(names, ["vadas", "josh", "marko", "josh", "peter", "josh"]);
}

#[test]
fn choose_by_traversal_predicate() {
    let traversal = g()
        .v()
        .choose_if(
            anon::has_label("person").and(vec![anon::out_labeled("created")]),
            anon::out_labeled("knows"),
            anon::identity(),
        )
        .values("name");
    assert_eq!(
        sorted_strings(traversal),
        sorted(&["lop", "ripple", "josh", "vadas", "vadas"])
    );
}

#[test]
fn unmatched_tokens_without_default_are_filtered() {
    let names = g()
        .v()
        .choose(anon::label())
        .option("software", anon::values("name"))
        .expect("option")
        .to_list()
        .expect("traversal");
    assert_eq!(names, vec![Value::from("lop"), Value::from("ripple")]);
}

#[test]
fn none_option_catches_the_rest() {
    let results = g()
        .v()
        .choose(anon::label())
        .option("software", anon::values("lang"))
        .and_then(|t| t.option(Pick::None, anon::values("age")))
        .expect("options")
        .to_list()
        .expect("traversal");
    let rendered: Vec<String> = results.iter().map(ToString::to_string).collect();
    assert_eq!(rendered, ["29", "27", "java", "32", "java", "35"]);
}

#[test]
fn selector_yielding_many_values_fails() {
    let mut traversal = g()
        .v()
        .choose(anon::out())
        .option(Pick::None, anon::identity())
        .expect("option");
    let err = traversal.next().expect("an item").expect_err("selection error");
    assert_eq!(err.code(), ErrorCode::Selection);

    // Only peter has exactly one outgoing neighbour.
    let rest: Vec<_> = traversal.collect();
    assert_eq!(rest.len(), 5);
    let kept: Vec<String> = rest
        .iter()
        .filter_map(|result| result.as_ref().ok())
        .filter_map(|value| g().graph().property(value, "name"))
        .map(|name| name.to_string())
        .collect();
    assert_eq!(kept, ["peter"]);
}

#[test]
fn selection_failure_keeps_earlier_results() {
    let mut traversal = g()
        .v()
        .choose(anon::out_labeled("created"))
        .option(Pick::None, anon::values("name"))
        .expect("option");
    let first = traversal.next().expect("marko").expect("one created edge");
    assert_eq!(first, Value::from("marko"));
    let err = traversal.next().expect("vadas").expect_err("no created edge");
    assert_eq!(err.code(), ErrorCode::Selection);
    assert!(traversal.has_next().is_err());
}

#[test]
fn limit_stops_before_a_failing_item() {
    let names = g()
        .v()
        .choose(anon::out_labeled("created"))
        .option(Pick::None, anon::values("name"))
        .expect("option")
        .limit(1)
        .to_list()
        .expect("only marko is evaluated");
    assert_eq!(names, vec![Value::from("marko")]);
}

#[test]
fn mutations_run_only_as_far_as_pulled() {
    let g = g();
    g.v()
        .add_v("clone")
        .limit(2)
        .iterate()
        .expect("addV");
    assert_eq!(g.v().count().to_list().expect("count"), vec![Value::Integer(8)]);
}

#[test]
fn predicate_choose_rejects_options() {
    let err = g()
        .v()
        .choose_if(anon::out(), anon::identity(), anon::identity())
        .option(1, anon::identity())
        .expect_err("predicate branches are fixed");
    assert_eq!(err.code(), ErrorCode::Configuration);
}
