use springbok::{
    ConstantCost, Error, FalloffCurve, Graph, InitialPlacement, LayoutConfig, LayoutEngine, Node,
    UnitCost, layout,
};

fn sample_graph() -> Graph {
    serde_json::from_str(include_str!("fixtures/sample_graph.json")).expect("sample graph json")
}

fn pair(ax: f64, ay: f64, bx: f64, by: f64) -> Graph {
    let mut g = Graph::new();
    g.add_node(Node::new("a", 10.0, 10.0).at(ax, ay))
        .add_node(Node::new("b", 10.0, 10.0).at(bx, by))
        .add_edge("a", "b");
    g
}

fn separation(engine: &LayoutEngine) -> f64 {
    let a = engine.position(0).unwrap();
    let b = engine.position(1).unwrap();
    (b.x - a.x).hypot(b.y - a.y)
}

fn bits(values: &[f64]) -> Vec<u64> {
    values.iter().map(|v| v.to_bits()).collect()
}

#[test]
fn identical_inputs_give_bit_identical_layouts() {
    let cfg = LayoutConfig::default()
        .with_edge_cost(ConstantCost(60))
        .with_iterations(300)
        .with_initial_placement(InitialPlacement::Scatter { extent: 200.0 });

    let run = || {
        let mut engine = LayoutEngine::new(&sample_graph(), cfg.clone()).unwrap();
        engine.run();
        bits(engine.positions())
    };
    assert_eq!(run(), run());
}

#[test]
fn coincident_nodes_separate_over_time() {
    let cfg = LayoutConfig::default()
        .with_edge_cost(ConstantCost(50))
        .with_iterations(200);
    let mut engine = LayoutEngine::new(&pair(0.0, 0.0, 0.0, 0.0), cfg).unwrap();
    assert_eq!(separation(&engine), 0.0);

    engine.step();
    let first = separation(&engine);
    assert!(first.is_finite() && first > 0.0, "first step: {first}");
    assert!(engine.clock().angle > 0.0, "degenerate pair used the rotating direction");

    let mut previous = first;
    for _ in 0..10 {
        for _ in 0..19 {
            engine.step();
        }
        let now = separation(&engine);
        assert!(now.is_finite());
        assert!(now > previous, "separation shrank: {previous} -> {now}");
        previous = now;
    }
    assert!(engine.positions().iter().all(|v| v.is_finite()));
}

#[test]
fn all_nodes_on_one_spot_stay_finite() {
    let cfg = LayoutConfig::default()
        .with_edge_cost(ConstantCost(40))
        .with_iterations(100);
    let mut engine = LayoutEngine::new(&sample_graph(), cfg).unwrap();
    assert!(engine.positions().iter().all(|v| *v == 0.0));
    engine.run();
    assert!(engine.positions().iter().all(|v| v.is_finite()));
    assert!(engine.positions().iter().any(|v| *v != 0.0));
}

#[test]
fn springs_approach_the_graph_distance_from_below() {
    let cfg = LayoutConfig::default()
        .with_edge_cost(ConstantCost(40))
        .with_repulsion_start(1.0)
        .with_iterations(1000);
    let mut engine = LayoutEngine::new(&pair(0.0, 0.0, 10.0, 0.0), cfg).unwrap();

    let mut previous = separation(&engine);
    while engine.steps_taken() < 1000 {
        for _ in 0..100 {
            engine.step();
        }
        let now = separation(&engine);
        assert!(
            now > previous && now < 40.0,
            "step {}: {previous} -> {now}",
            engine.steps_taken()
        );
        previous = now;
    }
    assert!(previous > 35.0, "separation {previous}");

    // Equal and opposite reactions keep the midpoint in place.
    let a = engine.position(0).unwrap();
    let b = engine.position(1).unwrap();
    assert!(((a.x + b.x) / 2.0 - 5.0).abs() < 1e-9);
    assert!(((a.y + b.y) / 2.0).abs() < 1e-9);
}

#[test]
fn repulsion_pushes_unconnected_nodes_apart_once_enabled() {
    let mut g = Graph::new();
    g.add_node(Node::new("a", 1.0, 1.0).at(0.0, 0.0))
        .add_node(Node::new("b", 1.0, 1.0).at(10.0, 0.0));

    let cfg = LayoutConfig::default()
        .with_edge_cost(UnitCost)
        .with_iterations(100)
        .with_repulsion_start(0.5)
        .with_repulsion_falloff(FalloffCurve::new(0.5, 1.0, 0.5, 1.0, 1.0, 5.0));
    let mut engine = LayoutEngine::new(&g, cfg).unwrap();

    for _ in 0..45 {
        engine.step();
    }
    assert_eq!(separation(&engine), 10.0, "no force before repulsion starts");

    engine.run();
    assert!(separation(&engine) > 10.0);
    assert!(!engine.are_all_nodes_connected());
}

#[test]
fn write_back_updates_nodes_and_reports_bounds() {
    let mut graph = sample_graph();
    let cfg = LayoutConfig::default()
        .with_edge_cost(ConstantCost(60))
        .with_iterations(200)
        .with_initial_placement(InitialPlacement::Scatter { extent: 300.0 });
    let mut engine = LayoutEngine::new(&graph, cfg).unwrap();
    engine.run();
    let bounds = engine.write_back(&mut graph).unwrap();

    for (i, id) in ["A", "B", "C", "D", "E", "F", "G", "H", "I", "J", "K"]
        .iter()
        .enumerate()
    {
        let p = engine.position(i).unwrap();
        let n = graph.node(id).unwrap();
        assert_eq!((n.x, n.y), (p.x, p.y), "node {id}");
        assert!(n.x >= bounds.min_x && n.x <= bounds.max_x());
        assert!(n.y >= bounds.min_y && n.y <= bounds.max_y());
    }

    let min_x = graph.nodes.values().map(|n| n.x).fold(f64::INFINITY, f64::min);
    let max_y = graph.nodes.values().map(|n| n.y).fold(f64::NEG_INFINITY, f64::max);
    assert_eq!(bounds.min_x, min_x);
    assert_eq!(bounds.max_y(), bounds.min_y + bounds.height);
    assert!((bounds.max_y() - max_y).abs() < 1e-9);
}

#[test]
fn write_back_refuses_foreign_graphs() {
    let engine = LayoutEngine::new(
        &pair(1.0, 2.0, 3.0, 4.0),
        LayoutConfig::default().with_edge_cost(UnitCost),
    )
    .unwrap();

    let mut other = Graph::new();
    other.add_node(Node::new("a", 1.0, 1.0).at(-9.0, -9.0));
    match engine.write_back(&mut other) {
        Err(Error::NodeNotFound { id }) => assert_eq!(id, "b"),
        r => panic!("unexpected: {r:?}"),
    }
    assert_eq!(other.node("a").map(|n| (n.x, n.y)), Some((-9.0, -9.0)));
}

#[test]
fn lookup_of_unknown_ids_fails() {
    let engine =
        LayoutEngine::new(&sample_graph(), LayoutConfig::default().with_edge_cost(UnitCost))
            .unwrap();
    assert_eq!(engine.find_node_index("D").unwrap(), 3);
    assert!(matches!(
        engine.find_node_index("nope"),
        Err(Error::NodeNotFound { id }) if id == "nope"
    ));
    assert_eq!(engine.id_for_index(10), Some("K"));
    assert_eq!(engine.id_for_index(11), None);
    assert!(engine.position(11).is_none());
}

#[test]
fn construction_rejects_incomplete_input() {
    let graph = sample_graph();
    assert!(matches!(
        LayoutEngine::new(&graph, LayoutConfig::default()),
        Err(Error::InvalidConfiguration(_))
    ));

    let mut cfg = LayoutConfig::default().with_edge_cost(UnitCost);
    cfg.repulsion_falloff = None;
    assert!(matches!(
        LayoutEngine::new(&graph, cfg),
        Err(Error::InvalidConfiguration(_))
    ));

    let mut dangling = graph.clone();
    dangling.add_edge("A", "missing");
    assert!(matches!(
        LayoutEngine::new(&dangling, LayoutConfig::default().with_edge_cost(UnitCost)),
        Err(Error::MissingEndpoint { .. })
    ));
}

#[test]
fn empty_graphs_lay_out_to_an_empty_box() {
    let mut graph = Graph::new();
    let bounds = layout(
        &mut graph,
        &LayoutConfig::default()
            .with_edge_cost(UnitCost)
            .with_iterations(3),
    )
    .unwrap();
    assert_eq!(bounds, springbok::Bounds::default());
}

#[test]
fn layout_function_runs_to_completion() {
    let mut graph = pair(0.0, 0.0, 10.0, 0.0);
    let bounds = layout(
        &mut graph,
        &LayoutConfig::default()
            .with_edge_cost(ConstantCost(40))
            .with_iterations(50),
    )
    .unwrap();
    let a = graph.node("a").unwrap();
    let b = graph.node("b").unwrap();
    assert_eq!(bounds.min_x, a.x.min(b.x));
    assert!(bounds.width > 10.0, "spring pushed the pair towards 40: {bounds:?}");
}

#[test]
fn engines_run_independently_on_separate_threads() {
    let cfg = LayoutConfig::default()
        .with_edge_cost(ConstantCost(60))
        .with_iterations(100)
        .with_initial_placement(InitialPlacement::Scatter { extent: 100.0 });

    let results: Vec<Vec<u64>> = std::thread::scope(|s| {
        let handles: Vec<_> = (0..2)
            .map(|_| {
                let cfg = cfg.clone();
                s.spawn(move || {
                    let mut engine = LayoutEngine::new(&sample_graph(), cfg).unwrap();
                    engine.run();
                    bits(engine.positions())
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    assert_eq!(results[0], results[1]);
}
