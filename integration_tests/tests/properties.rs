mod common;

use common::load_context;
use leaf_core::{SelectableSet, ViewState};
use leaf_runtime::{ElementId, ElementType, LayoutMode, TimeKey, TopologyStore, ViewEvent};
use rand::{rngs::SmallRng, seq::SliceRandom, Rng, SeedableRng};

const ID_POOL: [&str; 10] = [
    "taxi_1",
    "taxi_2",
    "traffic_1",
    "traffic_2",
    "fog_node_1",
    "ghost_99",
    "taxi_1$traffic_1",
    "traffic_1$fog_node_1",
    "traffic_2$fog_node_1",
    "nope$nothing",
];
const SEARCH_POOL: [&str; 6] = ["taxi", "traffic", "fog", ", ,", "ghost", "1"];
const TYPE_POOL: [&str; 4] = ["taxi", "traffic", "fognode", "cloud"];

fn pick_ids(rng: &mut SmallRng) -> Vec<ElementId> {
    let count = rng.gen_range(0..4);
    ID_POOL
        .choose_multiple(rng, count)
        .map(|id| ElementId::new(*id))
        .collect()
}

fn random_event(rng: &mut SmallRng) -> ViewEvent {
    match rng.gen_range(0..11) {
        0 => ViewEvent::DropdownChanged {
            values: if rng.gen_bool(0.2) {
                vec!["select all".to_string()]
            } else {
                pick_ids(rng).into_iter().map(|id| id.to_string()).collect()
            },
        },
        1 => ViewEvent::SearchSubmitted {
            query: SEARCH_POOL
                .choose(rng)
                .copied()
                .unwrap_or_default()
                .to_string(),
        },
        2 => ViewEvent::SelectAll,
        3 => ViewEvent::DeselectAll,
        4 => ViewEvent::EdgeSelection {
            edge_ids: pick_ids(rng),
        },
        5 => ViewEvent::NodeTap {
            node_id: ElementId::new(*ID_POOL.choose(rng).unwrap_or(&"ghost_99")),
        },
        6 => ViewEvent::NodeSelectionCleared,
        7 => {
            let count = rng.gen_range(0..3);
            ViewEvent::TypeFilterChanged {
                types: TYPE_POOL
                    .choose_multiple(rng, count)
                    .map(|ty| ElementType::of(ty))
                    .collect(),
            }
        }
        8 => ViewEvent::TimeChanged {
            time: TimeKey(*[100, 200, 999].choose(rng).unwrap_or(&100)),
        },
        9 => ViewEvent::LayoutChanged {
            layout: *LayoutMode::ALL.choose(rng).unwrap_or(&LayoutMode::Preset),
        },
        _ => ViewEvent::FilterPanelToggled,
    }
}

fn assert_legal(state: &ViewState, selectable: &SelectableSet) {
    for id in state
        .selection
        .active_ids
        .iter()
        .chain(state.selection.previous_active_ids.iter())
        .chain(state.styles.selected_ids().iter())
    {
        assert!(selectable.contains(id.as_str()), "{id} is not selectable");
    }
    assert!(state.styles.len() <= selectable.len() + ID_POOL.len());
}

#[test]
fn random_walk_only_reaches_legal_states() -> anyhow::Result<()> {
    let context = load_context()?;
    let reconciler = context.reconciler();
    let mut rng = SmallRng::seed_from_u64(0x1eaf);
    let mut state = reconciler.initial_state();

    for _ in 0..2_000 {
        let event = random_event(&mut rng);
        let out = reconciler.apply(&state, &event);
        assert_legal(&out.state, &context.selectable);
        assert!(context.topology.slice(out.state.filter.time).is_ok());
        if out.state.panel.is_open {
            assert_eq!(
                out.state.styles.selected_ids(),
                out.state.selection.active_ids.as_slice()
            );
        } else {
            assert!(out.state.styles.selected_ids().is_empty());
        }
        state = out.state;
    }
    Ok(())
}

#[test]
fn repeated_triggers_are_idempotent() -> anyhow::Result<()> {
    let context = load_context()?;
    let reconciler = context.reconciler();
    let mut rng = SmallRng::seed_from_u64(42);
    let mut state = reconciler.initial_state();

    for _ in 0..500 {
        let event = random_event(&mut rng);
        let once = reconciler.apply(&state, &event);
        if event != ViewEvent::FilterPanelToggled {
            let twice = reconciler.apply(&once.state, &event);
            assert_eq!(twice.state, once.state, "not idempotent: {event:?}");
            assert_eq!(twice.charts, once.charts);
            assert_eq!(twice.visible, once.visible);
        }
        state = once.state;
    }
    Ok(())
}

#[test]
fn overlay_never_holds_duplicate_records() -> anyhow::Result<()> {
    let context = load_context()?;
    let reconciler = context.reconciler();
    let mut state = reconciler.initial_state();
    let baseline = state.styles.len();

    for _ in 0..3 {
        state = reconciler.apply(&state, &ViewEvent::SelectAll).state;
        state = reconciler
            .apply(
                &state,
                &ViewEvent::NodeTap {
                    node_id: ElementId::new("taxi_1"),
                },
            )
            .state;
    }
    assert_eq!(state.styles.len(), baseline);
    assert_eq!(state.styles.selected_ids().len(), 1);
    Ok(())
}
