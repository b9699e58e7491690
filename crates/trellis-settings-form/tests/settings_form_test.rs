//! Panel behavior: render gate, form memoization, idle-paced updates and
//! snapshots.

use serde_json::json;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;
use trellis_core::{DesignNode, GlobalRegistry, NodeId, Workbench, UPDATE_NODE_PROPS};
use trellis_settings_form::{
    should_render_form, AppInfo, FieldPattern, SettingsForm, SettingsFormOptions, SettingsView,
};
use trellis_testing::{
    registry_with_locales, sample_locales, sample_schema, selected_workspace, workbench_for,
    ManualIdleScheduler, NodeFixture,
};

struct Panel {
    registry: Rc<GlobalRegistry>,
    scheduler: Rc<ManualIdleScheduler>,
    settings: SettingsForm,
}

fn panel() -> Panel {
    let registry = registry_with_locales(&sample_locales());
    let scheduler = Rc::new(ManualIdleScheduler::new());
    let settings = SettingsForm::new(
        registry.clone(),
        scheduler.clone(),
        SettingsFormOptions::default(),
    );
    Panel {
        registry,
        scheduler,
        settings,
    }
}

fn node(id: &str) -> Rc<dyn DesignNode> {
    NodeFixture::new(id).schema(sample_schema()).build()
}

fn ids(ids: &[&str]) -> Vec<NodeId> {
    ids.iter().map(|id| NodeId::from(*id)).collect()
}

#[test]
fn gate_needs_one_selected_node_with_a_schema() {
    let with_schema = node("a");
    let without_schema = NodeFixture::new("b").build();

    assert!(should_render_form(&ids(&["a"]), Some(with_schema.as_ref())));
    assert!(!should_render_form(&ids(&["a", "b"]), Some(with_schema.as_ref())));
    assert!(!should_render_form(&ids(&["b"]), Some(without_schema.as_ref())));
    assert!(!should_render_form(&ids(&["a"]), None));
    assert!(!should_render_form(&[], Some(with_schema.as_ref())));
}

#[test]
fn render_follows_the_selection() {
    let mut panel = panel();
    let (workspace, _) = selected_workspace(
        "main",
        &[node("a"), node("b"), NodeFixture::new("bare").build()],
        &["a", "b"],
    );
    let workbench = workbench_for(&workspace);
    assert!(panel.settings.render(&workbench).is_empty());

    workspace.select(ids(&["bare"]));
    assert!(panel.settings.render(&workbench).is_empty());

    workspace.select(ids(&["a"]));
    match panel.settings.render(&workbench) {
        SettingsView::Active {
            workspace_id,
            node_id,
            form,
            layout,
        } => {
            assert_eq!(workspace_id.as_str(), "main");
            assert_eq!(node_id.as_str(), "a");
            assert!(form.borrow().field("title").is_some());
            assert_eq!(layout, SettingsFormOptions::default().layout);
        }
        SettingsView::Empty => panic!("expected an active form"),
    }

    workspace.select(Vec::<NodeId>::new());
    assert!(panel.settings.render(&workbench).is_empty());
    assert!(panel.settings.form().is_none());
}

#[test]
fn no_workspace_renders_empty() {
    let mut panel = panel();
    let workbench = Workbench::new();
    assert!(panel.settings.render(&workbench).is_empty());
}

#[test]
fn same_inputs_reuse_the_form() {
    let mut panel = panel();
    let (workspace, _) = selected_workspace("main", &[node("a")], &["a"]);
    let workbench = workbench_for(&workspace);

    let first = panel.settings.render(&workbench).form().cloned().unwrap();
    let second = panel.settings.render(&workbench).form().cloned().unwrap();
    assert!(first.ptr_eq(&second));
}

#[test]
fn new_node_identity_rebuilds_with_its_own_props() {
    let mut panel = panel();
    let schema = Rc::new(sample_schema());
    let a = NodeFixture::new("a").shared_schema(schema.clone()).build();
    let b = NodeFixture::new("b")
        .shared_schema(schema)
        .props(json!({ "title": "from b" }))
        .build();
    let (workspace, _) = selected_workspace("main", &[a.clone(), b.clone()], &["a"]);
    let workbench = workbench_for(&workspace);

    let form_a = panel.settings.render(&workbench).form().cloned().unwrap();
    workspace.select(ids(&["b"]));
    let form_b = panel.settings.render(&workbench).form().cloned().unwrap();
    assert!(!form_a.ptr_eq(&form_b));
    assert_ne!(form_a.id(), form_b.id());

    form_b.borrow_mut().input("title", json!("edited")).unwrap();
    assert_eq!(b.props().borrow().get("title"), Some(&json!("edited")));
    assert_eq!(a.props().borrow().get("title"), None);
}

#[test]
fn replacing_a_node_with_the_same_id_rebuilds() {
    let mut panel = panel();
    let (workspace, _) = selected_workspace("main", &[node("a")], &["a"]);
    let workbench = workbench_for(&workspace);
    let before = panel.settings.render(&workbench).form().cloned().unwrap();

    workspace.add_node(node("a"));
    let after = panel.settings.render(&workbench).form().cloned().unwrap();
    assert!(!before.ptr_eq(&after));
}

#[test]
fn app_info_changes_rebuild_and_reach_the_form() {
    let mut panel = panel();
    let (workspace, _) = selected_workspace("main", &[node("a")], &["a"]);
    let workbench = workbench_for(&workspace);
    let before = panel.settings.render(&workbench).form().cloned().unwrap();
    assert_eq!(before.borrow().app_info(), None);

    panel.settings.set_app_info(Some(AppInfo::new("studio")));
    let after = panel.settings.render(&workbench).form().cloned().unwrap();
    assert!(!before.ptr_eq(&after));
    assert_eq!(
        after.borrow().app_info().map(|info| info.app_id.as_str()),
        Some("studio")
    );
}

#[test]
fn malformed_schema_renders_empty() {
    let mut panel = panel();
    let broken = NodeFixture::new("broken")
        .schema(json!({ "properties": "not an object" }))
        .build();
    let dotted = NodeFixture::new("dotted")
        .schema(json!({ "properties": { "a.b": {} } }))
        .build();
    let (workspace, _) = selected_workspace("main", &[broken, dotted], &["broken"]);
    let workbench = workbench_for(&workspace);

    assert!(panel.settings.render(&workbench).is_empty());
    workspace.select(ids(&["dotted"]));
    assert!(panel.settings.render(&workbench).is_empty());
}

#[test]
fn language_change_is_picked_up_on_the_next_render() {
    let mut panel = panel();
    let (workspace, _) = selected_workspace("main", &[node("a")], &["a"]);
    let workbench = workbench_for(&workspace);
    let form = panel.settings.render(&workbench).form().cloned().unwrap();
    assert_eq!(form.borrow().field("size").unwrap().title(), Some("Size"));

    panel.registry.set_designer_language("zh-cn");
    let again = panel.settings.render(&workbench).form().cloned().unwrap();
    assert!(form.ptr_eq(&again));
    assert_eq!(form.borrow().field("size").unwrap().title(), Some("尺寸"));
}

#[test]
fn bursts_of_updates_run_once_with_the_last_callback() {
    let panel = panel();
    let ran = Rc::new(RefCell::new(Vec::new()));
    for round in 1..=3 {
        let ran = Rc::clone(&ran);
        panel.settings.schedule_update(move || ran.borrow_mut().push(round));
    }
    assert!(panel.settings.is_update_pending());

    assert_eq!(panel.scheduler.advance(Duration::from_millis(499)), 0);
    assert_eq!(panel.scheduler.advance(Duration::from_millis(1)), 1);
    assert_eq!(*ran.borrow(), vec![3]);
    assert!(!panel.settings.is_update_pending());
}

#[test]
fn idle_time_runs_updates_before_the_ceiling() {
    let panel = panel();
    let ran = Rc::new(Cell::new(false));
    let flag = Rc::clone(&ran);
    panel.settings.schedule_update(move || flag.set(true));
    assert_eq!(panel.scheduler.run_idle(), 1);
    assert!(ran.get());
}

#[test]
fn workspace_notifications_are_debounced() {
    let panel = panel();
    let (workspace, _) = selected_workspace("main", &[node("a"), node("b")], &["a"]);
    let updates = Rc::new(Cell::new(0));
    let counter = Rc::clone(&updates);
    let subscription = panel
        .settings
        .observe(&workspace, move || counter.set(counter.get() + 1));

    workspace.select(ids(&["b"]));
    workspace.select(ids(&["a"]));
    workspace.remove_node(&NodeId::from("b"));
    assert_eq!(updates.get(), 0);
    panel.scheduler.advance(Duration::from_millis(500));
    assert_eq!(updates.get(), 1);

    workspace.unsubscribe(subscription);
    workspace.select(ids(&["a"]));
    panel.scheduler.run_idle();
    assert_eq!(updates.get(), 1);
}

#[test]
fn dropping_the_panel_cancels_observed_updates() {
    let panel = panel();
    let (workspace, _) = selected_workspace("main", &[node("a"), node("b")], &["a"]);
    let updates = Rc::new(Cell::new(0));
    let counter = Rc::clone(&updates);
    panel
        .settings
        .observe(&workspace, move || counter.set(counter.get() + 1));

    workspace.select(ids(&["b"]));
    assert_eq!(panel.scheduler.pending(), 1);

    drop(panel.settings);
    assert_eq!(panel.scheduler.pending(), 0);
    workspace.select(ids(&["a"]));
    assert_eq!(panel.scheduler.pending(), 0);
    panel.scheduler.run_idle();
    assert_eq!(updates.get(), 0);
}

#[test]
fn edits_record_one_snapshot_per_window() {
    let mut panel = panel();
    let (workspace, history) = selected_workspace("main", &[node("a")], &["a"]);
    let workbench = workbench_for(&workspace);
    let form = panel.settings.render(&workbench).form().cloned().unwrap();

    for text in ["a", "ab", "abc"] {
        form.borrow_mut().input("title", json!(text)).unwrap();
    }
    panel.scheduler.advance(Duration::from_millis(999));
    assert!(history.is_empty());
    panel.scheduler.advance(Duration::from_millis(1));
    assert_eq!(history.len(), 1);
    assert_eq!(history.records()[0].kind, UPDATE_NODE_PROPS);

    form.borrow_mut().input("size", json!("small")).unwrap();
    panel.scheduler.run_idle();
    assert_eq!(history.len(), 2);
}

#[test]
fn custom_effects_run_before_fields_mount() {
    let registry = Rc::new(GlobalRegistry::new());
    let scheduler = Rc::new(ManualIdleScheduler::new());
    let mut settings = SettingsForm::new(registry, scheduler, SettingsFormOptions::default())
        .with_effect(|form| {
            assert!(form.is_empty());
            form.on_field_react(FieldPattern::All, |field| {
                field.set_description("from effect");
            });
        });
    let (workspace, _) = selected_workspace("main", &[node("a")], &["a"]);
    let workbench = workbench_for(&workspace);
    let form = settings.render(&workbench).form().cloned().unwrap();
    let form = form.borrow();
    assert!(form.fields().all(|field| field.description() == Some("from effect")));
}
