use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use leaf_core::{derive_visible, FilterState, Reconciler, SelectableSet, ViewConfig};
use leaf_runtime::{ElementId, ElementType, LayoutMode, TimeKey, ViewEvent};
use leaf_schema::{InfrastructureTimeline, TopologyNode, TopologySlice};
use rand::{rngs::SmallRng, Rng, SeedableRng};

const PREFIXES: [&str; 3] = ["taxi", "traffic", "fog_node"];

fn generate_slice(time: u64, node_count: usize, rng: &mut SmallRng) -> TopologySlice {
    let nodes: Vec<TopologyNode> = (0..node_count)
        .map(|index| {
            let prefix = PREFIXES[index % PREFIXES.len()];
            TopologyNode::new(format!("{prefix}_{index}"))
                .with_position(rng.gen_range(0.0..1000.0), rng.gen_range(0.0..1000.0))
        })
        .collect();
    let edges = (0..node_count * 2)
        .map(|_| {
            let a = rng.gen_range(0..node_count);
            let b = rng.gen_range(0..node_count);
            (ElementId::new(format!("{}${}", nodes[a].id, nodes[b].id)), None)
        })
        .collect::<std::collections::BTreeMap<_, _>>()
        .into_iter()
        .collect();
    TopologySlice::new(TimeKey(time), nodes, edges).expect("generated slice")
}

fn bench_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("derive_visible");
    for &size in &[500usize, 5_000] {
        let mut rng = SmallRng::seed_from_u64(7);
        let slice = generate_slice(100, size, &mut rng);
        let selectable = SelectableSet::new(slice.nodes().iter().map(|node| node.id.clone()));
        let mut filter = FilterState::new(TimeKey(100));
        filter.set_types(&[ElementType::of("traffic"), ElementType::of("fognode")]);

        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| derive_visible(&filter, &slice, &selectable, LayoutMode::Preset));
        });
    }
    group.finish();
}

fn bench_reconcile(c: &mut Criterion) {
    let mut rng = SmallRng::seed_from_u64(11);
    let slices = (1..=4)
        .map(|step| generate_slice(step * 100, 2_000, &mut rng))
        .collect();
    let timeline = InfrastructureTimeline::from_slices(slices).expect("timeline");
    let selectable = SelectableSet::new(
        timeline
            .iter()
            .flat_map(|slice| slice.nodes().iter().map(|node| node.id.clone())),
    );
    let config = ViewConfig::default();
    let reconciler = Reconciler::new(&timeline, &selectable, &config);
    let initial = reconciler.initial_state();

    let events = [
        ViewEvent::SelectAll,
        ViewEvent::SearchSubmitted {
            query: "taxi_1, fog".to_string(),
        },
        ViewEvent::TimeChanged { time: TimeKey(300) },
    ];

    let mut group = c.benchmark_group("reconcile");
    for event in events {
        group.bench_function(event.category().key(), |b| {
            b.iter_batched(
                || initial.clone(),
                |state| reconciler.apply(&state, &event),
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

criterion_group!(benches, bench_filter, bench_reconcile);
criterion_main!(benches);
