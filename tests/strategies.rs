use solvra_gremlin::strategy::{
    Computer, IdentityRemovalStrategy, IncidentToAdjacentStrategy, LambdaRestrictionStrategy,
    ReadOnlyStrategy, SubgraphStrategy,
};
use solvra_gremlin::structure::modern;
use solvra_gremlin::traversal::lambda::Lambda;
use solvra_gremlin::{ErrorCode, ExecutionMode, GraphTraversalSource, Value, anon};

fn g() -> GraphTraversalSource {
    GraphTraversalSource::new(modern().expect("modern graph"))
}

fn strings(values: Vec<Value>) -> Vec<String> {
    values.iter().map(ToString::to_string).collect()
}

#[test]
fn source_orders_strategies_by_category_and_constraints() {
    let source = g()
        .with_strategies(ReadOnlyStrategy)
        .and_then(|g| g.with_strategies(SubgraphStrategy::build().vertices(anon::has_label("person")).create()))
        .expect("strategies");
    assert_eq!(
        source.strategies().names(),
        [
            "SubgraphStrategy",
            IdentityRemovalStrategy::NAME,
            IncidentToAdjacentStrategy::NAME,
            "ReadOnlyStrategy",
        ]
    );
}

#[test]
fn applying_twice_changes_nothing() {
    solvra_gremlin::logging::init("strategy");
    let source = g()
        .with_strategies(SubgraphStrategy::build().edges(anon::has_label("knows")).create())
        .expect("subgraph");
    let mut traversal = source.v().out_e().in_v().identity().values("name");
    let strategies = traversal.strategies().clone();

    strategies.apply(&mut traversal).expect("first pass");
    let once = traversal.to_string();
    assert_eq!(once, "[V, outE, filter, inV, values]");

    strategies.apply(&mut traversal).expect("second pass");
    assert_eq!(traversal.to_string(), once);
}

#[test]
fn apply_strategies_runs_once() {
    let mut traversal = g().v().out_e().in_v();
    traversal.apply_strategies().expect("apply");
    assert_eq!(traversal.to_string(), "[V, out]");
    traversal.apply_strategies().expect("apply again");
    assert_eq!(traversal.to_string(), "[V, out]");
    assert_eq!(traversal.bytecode().step_instructions().len(), 3);
}

#[test]
fn optimizations_reach_child_traversals() {
    let mut traversal = g()
        .v()
        .filter(anon::out_e().in_v().identity().has_label("software"));
    traversal.apply_strategies().expect("apply");
    let child = traversal.steps()[1].children()[0].to_string();
    assert_eq!(child, "[out, hasLabel]");
}

#[test]
fn subgraph_edges_restrict_walks() {
    let source = g()
        .with_strategies(SubgraphStrategy::build().edges(anon::has_label("knows")).create())
        .expect("subgraph");
    let names = source.v_ids([1]).out().values("name").to_list().expect("traversal");
    assert_eq!(strings(names), ["vadas", "josh"]);
}

#[test]
fn subgraph_vertices_hide_others() {
    let source = g()
        .with_strategies(SubgraphStrategy::build().vertices(anon::has_label("person")).create())
        .expect("subgraph");
    let names = source.v().values("name").to_list().expect("traversal");
    assert_eq!(strings(names), ["marko", "vadas", "josh", "peter"]);
    let created = source.v().out_labeled("created").count().to_list().expect("traversal");
    assert_eq!(created, vec![Value::Integer(0)]);
}

#[test]
fn read_only_blocks_mutation_at_any_depth() {
    let source = g().with_strategies(ReadOnlyStrategy).expect("read only");
    let err = source.v().drop().iterate().expect_err("drop is a write");
    assert_eq!(err.code(), ErrorCode::Verification);

    let err = source
        .v()
        .filter(anon::out().drop())
        .iterate()
        .expect_err("nested drop is a write");
    assert_eq!(err.code(), ErrorCode::Verification);
    assert_eq!(source.graph().vertex_ids().len(), 6);
}

#[test]
fn lambda_restriction_blocks_closures() {
    let source = g().with_strategies(LambdaRestrictionStrategy).expect("restriction");
    let err = source
        .v()
        .choose_lambda(Lambda::predicate("any", |_, _| true), anon::identity(), anon::identity())
        .to_list()
        .expect_err("lambda");
    assert_eq!(err.code(), ErrorCode::Verification);
}

#[test]
fn without_strategies_turns_off_an_optimization() {
    let mut traversal = g()
        .without_strategies(&[IncidentToAdjacentStrategy::NAME])
        .v()
        .out_e()
        .in_v();
    traversal.apply_strategies().expect("apply");
    assert_eq!(traversal.to_string(), "[V, outE, inV]");
}

#[test]
fn computer_marks_execution_mode_and_still_runs() {
    let source = g().with_computer(Computer::compute().workers(4)).expect("computer");
    let mut traversal = source.v().count();
    traversal.apply_strategies().expect("apply");
    assert_eq!(
        traversal.execution_mode(),
        ExecutionMode::Computer { workers: Some(4) }
    );
    assert_eq!(traversal.to_list().expect("count"), vec![Value::Integer(6)]);
}
