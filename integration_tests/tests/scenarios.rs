mod common;

use common::{ids, load_context};
use leaf_core::{PanelMode, SearchOutcome, StyleRole};
use leaf_runtime::{
    ElementId, ElementKind, ElementType, LayoutMode, TimeKey, TriggerCategory, TriggerFrame,
    ViewEvent,
};

fn tap(id: &str) -> ViewEvent {
    ViewEvent::NodeTap {
        node_id: ElementId::new(id),
    }
}

fn filter(types: &[&str]) -> ViewEvent {
    ViewEvent::TypeFilterChanged {
        types: types.iter().map(|ty| ElementType::of(ty)).collect(),
    }
}

#[test]
fn illegal_tap_after_legal_tap_keeps_selection() -> anyhow::Result<()> {
    let context = load_context()?;
    let reconciler = context.reconciler();

    let first = reconciler.apply(&reconciler.initial_state(), &tap("taxi_1"));
    let second = reconciler.apply(&first.state, &tap("ghost_99"));

    assert_eq!(second.state.selection.active_ids, ids(&["taxi_1"]));
    assert_eq!(second.state.panel.mode, PanelMode::SingleOrMultiSelected);
    assert!(second.state.panel.is_open);
    assert_eq!(second.state.panel.width_percent, 50);
    assert_eq!(second.charts.len(), 1);
    assert_eq!(second.charts[0].ids, ids(&["taxi_1"]));
    Ok(())
}

#[test]
fn search_selects_matching_taxis() -> anyhow::Result<()> {
    let context = load_context()?;
    let reconciler = context.reconciler();

    let out = reconciler.apply(
        &reconciler.initial_state(),
        &ViewEvent::SearchSubmitted {
            query: "taxi".to_string(),
        },
    );

    assert_eq!(out.state.selection.active_ids, ids(&["taxi_1", "taxi_2"]));
    let message = out.message.expect("search message");
    assert_eq!(message.outcome, SearchOutcome::Found);
    assert_eq!(message.text, "The following nodes were found: taxi_1 taxi_2");
    assert_eq!(
        out.state.styles.record("taxi_2").map(|record| record.role),
        Some(StyleRole::Selected)
    );
    Ok(())
}

#[test]
fn search_ignores_hidden_and_unmeasured_nodes() -> anyhow::Result<()> {
    let context = load_context()?;
    let reconciler = context.reconciler();
    let filtered = reconciler.apply(&reconciler.initial_state(), &filter(&["traffic"]));

    let out = reconciler.apply(
        &filtered.state,
        &ViewEvent::SearchSubmitted {
            query: "traffic_2, taxi".to_string(),
        },
    );

    assert!(out.state.selection.active_ids.is_empty());
    assert!(!out.state.panel.is_open);
    assert_eq!(
        out.message.map(|message| message.outcome),
        Some(SearchOutcome::NotFound)
    );
    Ok(())
}

#[test]
fn traffic_filter_hides_taxis_and_their_links() -> anyhow::Result<()> {
    let context = load_context()?;
    let reconciler = context.reconciler();

    let out = reconciler.apply(&reconciler.initial_state(), &filter(&["traffic"]));
    let visible: Vec<&str> = out.visible.ids().map(ElementId::as_str).collect();

    assert_eq!(visible, vec!["traffic_1", "traffic_2", "traffic_1$traffic_2"]);
    assert!(!out.visible.contains("taxi_1"));
    assert!(!out.visible.contains("taxi_1$traffic_1"));
    Ok(())
}

#[test]
fn fog_links_need_both_endpoint_types() -> anyhow::Result<()> {
    let context = load_context()?;
    let reconciler = context.reconciler();

    let fog_only = reconciler.apply(&reconciler.initial_state(), &filter(&["fognode"]));
    assert!(fog_only.visible.contains("fog_node_1"));
    assert!(fog_only.visible.edges.is_empty());

    let with_traffic = reconciler.apply(&fog_only.state, &filter(&["fognode", "traffic"]));
    assert!(with_traffic.visible.contains("traffic_1$fog_node_1"));
    assert!(with_traffic.visible.contains("traffic_2$fog_node_1"));
    assert!(!with_traffic.visible.contains("taxi_2$traffic_1"));
    Ok(())
}

#[test]
fn slider_move_recomputes_visibility_only() -> anyhow::Result<()> {
    let context = load_context()?;
    let reconciler = context.reconciler();

    let tapped = reconciler.apply(&reconciler.initial_state(), &tap("taxi_2"));
    let filtered = reconciler.apply(&tapped.state, &filter(&["taxi"]));
    let before: Vec<&str> = filtered.visible.ids().map(ElementId::as_str).collect();
    assert_eq!(before, vec!["taxi_1", "taxi_2"]);

    let moved = reconciler.apply(
        &filtered.state,
        &ViewEvent::TimeChanged {
            time: TimeKey(200),
        },
    );
    let after: Vec<&str> = moved.visible.ids().map(ElementId::as_str).collect();
    assert_eq!(after, vec!["taxi_1"]);
    assert_eq!(moved.state.selection, tapped.state.selection);
    assert_eq!(moved.state.filter.active_types, vec![ElementType::of("taxi")]);
    assert_eq!(moved.slider_caption, "Current selected timeslot: \"200\"");
    Ok(())
}

#[test]
fn unknown_time_key_falls_back_to_first_slice() -> anyhow::Result<()> {
    let context = load_context()?;
    let reconciler = context.reconciler();

    let out = reconciler.apply(
        &reconciler.initial_state(),
        &ViewEvent::TimeChanged {
            time: TimeKey(12345),
        },
    );
    assert_eq!(out.state.filter.time, TimeKey(100));
    assert_eq!(out.visible.time, TimeKey(100));
    Ok(())
}

#[test]
fn select_all_then_deselect_all_round_trip() -> anyhow::Result<()> {
    let context = load_context()?;
    let reconciler = context.reconciler();
    let initial = reconciler.initial_state();
    let filtered = reconciler.apply(&initial, &filter(&["taxi"]));

    let all = reconciler.apply(&filtered.state, &ViewEvent::SelectAll);
    assert_eq!(all.state.panel.mode, PanelMode::AllSelected);
    assert_eq!(all.state.panel.width_percent, 75);
    assert!(all.state.panel.overlay_visible);
    assert_eq!(
        all.state.selection.active_ids,
        ids(&[
            "taxi_1",
            "taxi_2",
            "traffic_1",
            "fog_node_1",
            "taxi_1$traffic_1",
            "traffic_1$fog_node_1"
        ])
    );
    let kinds: Vec<(ElementKind, bool)> = all
        .charts
        .iter()
        .map(|chart| (chart.source_kind, chart.aggregate))
        .collect();
    assert_eq!(
        kinds,
        vec![
            (ElementKind::Node, false),
            (ElementKind::Node, true),
            (ElementKind::Edge, true)
        ]
    );

    let none = reconciler.apply(&all.state, &ViewEvent::DeselectAll);
    assert_eq!(none.state.panel.mode, PanelMode::Hidden);
    assert!(!none.state.panel.is_open);
    assert!(!none.state.panel.overlay_visible);
    assert!(none.state.selection.active_ids.is_empty());
    assert!(none.state.styles.selected_ids().is_empty());
    assert_eq!(none.state.filter, filtered.state.filter);
    assert!(none.state.toolbar.select_all_visible);
    assert!(!none.state.toolbar.deselect_all_visible);
    Ok(())
}

#[test]
fn dropdown_select_all_sentinel_selects_everything() -> anyhow::Result<()> {
    let context = load_context()?;
    let reconciler = context.reconciler();

    let out = reconciler.apply(
        &reconciler.initial_state(),
        &ViewEvent::DropdownChanged {
            values: vec!["select all".to_string()],
        },
    );
    assert_eq!(out.state.panel.mode, PanelMode::AllSelected);
    assert_eq!(out.state.selection.active_ids.len(), 6);
    assert_eq!(out.charts.len(), 3);
    Ok(())
}

#[test]
fn clearing_keeps_charts_for_the_last_plot() -> anyhow::Result<()> {
    let context = load_context()?;
    let reconciler = context.reconciler();

    let tapped = reconciler.apply(&reconciler.initial_state(), &tap("traffic_1"));
    let cleared = reconciler.apply(&tapped.state, &ViewEvent::NodeSelectionCleared);

    assert!(!cleared.state.panel.is_open);
    assert_eq!(cleared.state.panel.right_offset_percent, -50);
    assert!(cleared.state.selection.active_ids.is_empty());
    assert_eq!(cleared.charts[0].ids, ids(&["traffic_1"]));
    assert_eq!(
        cleared.state.styles.record("traffic_1").map(|record| record.role),
        Some(StyleRole::Selectable)
    );
    Ok(())
}

#[test]
fn edge_selection_beats_node_tap_in_one_frame() -> anyhow::Result<()> {
    let context = load_context()?;
    let reconciler = context.reconciler();
    let initial = reconciler.initial_state();

    let mut frame = TriggerFrame::idle(TimeKey(100), LayoutMode::Breadthfirst);
    frame.tapped_node = Some(ElementId::new("taxi_1"));
    frame.selected_nodes = Some(ids(&["taxi_1"]));
    frame.selected_edges = Some(ids(&["taxi_1$traffic_1"]));

    let out = reconciler.apply_frame(&initial, &frame);
    assert_eq!(out.trigger, TriggerCategory::EdgeSelection);
    assert_eq!(out.state.selection.active_ids, ids(&["taxi_1$traffic_1"]));
    assert_eq!(out.charts[0].source_kind, ElementKind::Edge);
    Ok(())
}

#[test]
fn non_preset_layout_strips_positions() -> anyhow::Result<()> {
    let context = load_context()?;
    let reconciler = context.reconciler();
    let initial = reconciler.initial_state();

    let laid_out = reconciler.apply(
        &initial,
        &ViewEvent::LayoutChanged {
            layout: LayoutMode::Concentric,
        },
    );
    assert!(laid_out.visible.nodes.iter().all(|node| node.position.is_none()));
    assert_eq!(
        laid_out.layout_request.map(|request| request.name),
        Some(LayoutMode::Concentric)
    );

    let preset = reconciler.apply(
        &laid_out.state,
        &ViewEvent::LayoutChanged {
            layout: LayoutMode::Preset,
        },
    );
    assert!(preset.layout_request.is_none());
    assert!(preset.visible.nodes.iter().all(|node| node.position.is_some()));
    Ok(())
}

#[test]
fn slider_frame_with_stale_tap_keeps_search_selection() -> anyhow::Result<()> {
    let context = load_context()?;
    let reconciler = context.reconciler();

    let mut frame = TriggerFrame::idle(TimeKey(100), LayoutMode::Breadthfirst);
    frame.tapped_node = Some(ElementId::new("taxi_1"));
    frame.selected_nodes = Some(ids(&["taxi_1"]));
    let tapped = reconciler.apply_frame(&reconciler.initial_state(), &frame);
    assert_eq!(tapped.state.selection.active_ids, ids(&["taxi_1"]));

    frame.search_clicks = 1;
    frame.search_value = "taxi".to_string();
    let searched = reconciler.apply_frame(&tapped.state, &frame);
    assert_eq!(searched.trigger, TriggerCategory::Search);
    assert_eq!(searched.state.selection.active_ids, ids(&["taxi_1", "taxi_2"]));

    frame.time = TimeKey(200);
    let moved = reconciler.apply_frame(&searched.state, &frame);
    assert_eq!(moved.state.filter.time, TimeKey(200));
    assert_eq!(moved.state.selection, searched.state.selection);
    assert!(moved.state.panel.is_open);
    Ok(())
}

#[test]
fn emptied_node_selection_closes_despite_stale_tap() -> anyhow::Result<()> {
    let context = load_context()?;
    let reconciler = context.reconciler();

    let mut frame = TriggerFrame::idle(TimeKey(100), LayoutMode::Breadthfirst);
    frame.tapped_node = Some(ElementId::new("taxi_1"));
    frame.selected_nodes = Some(ids(&["taxi_1"]));
    let tapped = reconciler.apply_frame(&reconciler.initial_state(), &frame);
    assert!(tapped.state.panel.is_open);

    frame.selected_nodes = Some(Vec::new());
    let cleared = reconciler.apply_frame(&tapped.state, &frame);
    assert_eq!(cleared.trigger, TriggerCategory::NodeSelectionCleared);
    assert!(!cleared.state.panel.is_open);
    assert!(cleared.state.selection.active_ids.is_empty());
    assert_eq!(cleared.charts[0].ids, ids(&["taxi_1"]));
    Ok(())
}
