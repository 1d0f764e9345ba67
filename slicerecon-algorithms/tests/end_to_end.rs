use approx::assert_relative_eq;
use serde_json::json;
use slicerecon_algorithms::builtin_registry;
use slicerecon_core::{EventStore, Hit, ListKey, NeutrinoParent, ParentSettings, View};

fn settings() -> ParentSettings {
    let names = json!({"u": "ClustersU", "v": "ClustersV", "w": "ClustersW"});
    serde_json::from_value(json!({
        "hit_list_names": {"u": "HitsU", "v": "HitsV", "w": "HitsW"},
        "cluster_list_names": names,
        "clustering": {"type": "ProximityClustering", "params": {"radius": 1.5}},
        "slicing": {"type": "DriftGapSlicing", "params": {"max_gap": 10.0}},
        "list_deletion": "ListDeletion",
        "list_moving": {"type": "ListMoving", "params": {"cluster_list_names": names}},
        "two_d_algorithms": [{"type": "SmallClusterRemoval", "params": {"min_hits": 2}}],
        "three_d_algorithms": ["ListSummary"],
        "three_d_hit_algorithms": [],
        "vertex_algorithms": [],
        "mop_up_algorithms": [],
        "neutrino_algorithms": [{"type": "ListSummary", "params": {"label": "neutrino"}}]
    }))
    .unwrap()
}

// Two straight tracks per view, far apart in drift, plus one isolated W hit.
fn event() -> EventStore {
    let mut store = EventStore::new();
    let mut id = 0;
    for (view, name, z0) in [(View::U, "HitsU", 0.0), (View::V, "HitsV", 30.0), (View::W, "HitsW", 60.0)] {
        let mut hits = Vec::new();
        for x0 in [10.0, 80.0] {
            for i in 0..5_u32 {
                let step = 0.5 * f64::from(i);
                hits.push(Hit::new(id, view, x0 + step, z0 + step, 2.0));
                id += 1;
            }
        }
        if view == View::W {
            hits.push(Hit::new(id, view, 12.0, 200.0, 7.0));
            id += 1;
        }
        store.save_hits(ListKey::named(name), hits).unwrap();
    }
    store
}

#[test]
fn test_builtin_pipeline_reconstructs_two_slices() {
    let registry = builtin_registry();
    let mut parent = NeutrinoParent::from_settings(&settings(), &registry).unwrap();
    let mut store = event();

    parent.run(&mut store).unwrap();

    let stats = parent.last_run();
    assert_eq!(stats.slices, 2);
    assert_eq!(stats.working_lists, 6);
    assert_eq!(stats.views_skipped, 0);

    let output = store.output();
    assert_eq!(output.len(), 6);
    for (i, list) in output.iter().enumerate() {
        assert_eq!(list.slice, i / 3);
        assert_eq!(list.view, View::ALL[i % 3]);
        assert_eq!(list.clusters.len(), 1, "{} in slice {}", list.name, list.slice);
        assert_relative_eq!(list.clusters[0].total_charge(), 10.0);
    }
    assert!(store.cluster_list_keys().is_empty());
}

#[test]
fn test_builtin_pipeline_reuses_parent_across_events() {
    let registry = builtin_registry();
    let mut parent = NeutrinoParent::from_settings(&settings(), &registry).unwrap();

    for _ in 0..2 {
        let mut store = event();
        parent.run(&mut store).unwrap();
        assert_eq!(store.output().len(), 6);
        assert_eq!(store.output()[0].slice, 0);
        assert_eq!(store.statistics().resets, 1);
    }
}

#[test]
fn test_single_slice_on_empty_event() {
    let mut settings = settings();
    settings.slicing = Some(slicerecon_core::AlgorithmSpec::new("SingleSlice"));
    let registry = builtin_registry();
    let mut parent = NeutrinoParent::from_settings(&settings, &registry).unwrap();

    let mut store = EventStore::new();
    for name in ["HitsU", "HitsV", "HitsW"] {
        store.save_hits(ListKey::named(name), Vec::new()).unwrap();
    }
    parent.run(&mut store).unwrap();

    assert_eq!(parent.last_run().slices, 0);
    assert_eq!(parent.last_run().views_skipped, 3);
    assert!(store.output().is_empty());
}

#[test]
fn test_demo_settings_bind() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../demos/settings.json");
    let settings = ParentSettings::from_path(path).unwrap();
    let parent = NeutrinoParent::from_settings(&settings, &builtin_registry()).unwrap();
    assert_eq!(parent.hit_list_names()[View::U], "CaloHitListU");
}
