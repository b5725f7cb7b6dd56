//! Integration tests: editing session flows (mm-editor).
//!
//! Each test opens a map from a store, drives the session like a user
//! would, and checks the document, layout, and what reached the store.

use mm_core::config::{LinkDirection, MutationPolicy};
use mm_core::error::{Error, PersistenceError, ValidationError};
use mm_core::id::NodeId;
use mm_core::parser::parse_document;
use mm_editor::session::{SaveStatus, Session, SessionConfig};
use mm_editor::store::{DocumentStore, FileStore, MemoryStore};
use pretty_assertions::assert_eq;

fn open(fixture: &str, config: SessionConfig) -> Session<MemoryStore> {
    let store = MemoryStore::new().with_map("m", "Map", fixture);
    Session::open(store, "m", config).unwrap()
}

// ─── Collapse ────────────────────────────────────────────────────────────

#[test]
fn toggle_root_hides_and_restores_child() {
    let mut s = open(include_str!("fixtures/minimal.json"), SessionConfig::default());
    let (r, a) = (NodeId::intern("r"), NodeId::intern("a"));
    assert!(s.layout().is_visible(a));

    s.toggle_collapse(r).unwrap();
    assert!(!s.layout().is_visible(a));
    assert!(s.document().contains(a));
    let saved = parse_document(&s.store().get("m").unwrap().data).unwrap();
    assert!(saved.contains(a));
    assert!(saved.root.collapsed);

    s.toggle_collapse(r).unwrap();
    assert!(s.layout().is_visible(a));
}

#[test]
fn adding_under_collapsed_parent_expands_it() {
    let mut s = open(include_str!("fixtures/team_map.json"), SessionConfig::default());
    let frontend = NodeId::intern("frontend");
    assert!(!s.layout().is_visible(NodeId::intern("dashboard")));

    let child = s.add_child(frontend).unwrap();
    assert!(s.layout().is_visible(child));
    assert!(s.layout().is_visible(NodeId::intern("dashboard")));
}

#[test]
fn hidden_link_reappears_on_expand() {
    let mut s = open(include_str!("fixtures/team_map.json"), SessionConfig::default());
    assert!(s.layout().links.is_empty());
    assert_eq!(s.document().cross_links.len(), 1);

    s.toggle_collapse(NodeId::intern("frontend")).unwrap();
    let ids: Vec<&str> = s.layout().links.iter().map(|l| l.id.as_str()).collect();
    assert_eq!(ids, vec!["api_dash"]);
}

// ─── Validation ──────────────────────────────────────────────────────────

#[test]
fn validation_errors_leave_document_unchanged() {
    let mut s = open(include_str!("fixtures/team_map.json"), SessionConfig::default());
    let before = s.document().clone();
    let api = NodeId::intern("api");

    let results = [
        s.delete_node(NodeId::intern("team")).err(),
        s.rename_node(api, "  ", "").err(),
        s.create_cross_link(api, api).err(),
        s.create_cross_link(NodeId::intern("dashboard"), api).err(),
        s.add_child(NodeId::intern("nobody")).err(),
    ];
    assert_eq!(
        results,
        [
            Some(Error::Validation(ValidationError::DeleteRoot)),
            Some(Error::Validation(ValidationError::EmptyTitle)),
            Some(Error::Validation(ValidationError::SelfLink)),
            Some(Error::Validation(ValidationError::DuplicateLink {
                from: NodeId::intern("dashboard"),
                to: api,
            })),
            Some(Error::Validation(ValidationError::NodeNotFound(
                NodeId::intern("nobody")
            ))),
        ]
    );
    assert_eq!(s.document(), &before);
    assert!(!s.can_undo());
    assert_eq!(s.save_status(), &SaveStatus::Idle);
}

#[test]
fn directed_policy_allows_reverse_link() {
    let config = SessionConfig {
        policy: MutationPolicy {
            link_direction: LinkDirection::Directed,
            ..MutationPolicy::default()
        },
        ..SessionConfig::default()
    };
    let mut s = open(include_str!("fixtures/team_map.json"), config);
    let link = s
        .create_cross_link(NodeId::intern("dashboard"), NodeId::intern("api"))
        .unwrap();
    assert!(s.document().link(link).is_some());
    assert_eq!(s.document().cross_links.len(), 2);
}

// ─── Deletion ────────────────────────────────────────────────────────────

#[test]
fn deleting_branch_drops_its_links_and_collapse() {
    let mut s = open(include_str!("fixtures/team_map.json"), SessionConfig::default());
    s.delete_node(NodeId::intern("dashboard")).unwrap();

    assert!(s.document().cross_links.is_empty());
    // Frontend lost its only child, so it is no longer collapsed.
    let frontend = s.document().get_by_id(NodeId::intern("frontend")).unwrap();
    assert!(!frontend.collapsed);
    assert!(!frontend.has_children());
}

// ─── Persistence ─────────────────────────────────────────────────────────

#[test]
fn auth_failure_is_reported_not_fatal() {
    let mut s = open(include_str!("fixtures/minimal.json"), SessionConfig::default());
    s.store_mut().set_save_failure(Some(PersistenceError::Auth));

    let child = s.add_child(NodeId::intern("r")).unwrap();
    assert!(s.document().contains(child));
    assert_eq!(s.save_status(), &SaveStatus::Failed(PersistenceError::Auth));
    assert_eq!(s.retry_save(), Err(PersistenceError::Auth));
}

#[test]
fn file_store_session_roundtrip() {
    let dir = std::env::temp_dir().join(format!("mm-session-{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);

    let mut store = FileStore::new(&dir);
    store
        .save(
            "roadmap",
            &mm_editor::store::StoredMap {
                title: "Roadmap".into(),
                data: include_str!("fixtures/minimal.json").into(),
            },
        )
        .unwrap();

    let mut s = Session::open(store, "roadmap", SessionConfig::default()).unwrap();
    let child = s.add_child(NodeId::intern("a")).unwrap();
    s.rename_node(child, "Milestone 1", "Ship beta").unwrap();
    let expected = s.document().clone();

    let reopened = Session::open(FileStore::new(&dir), "roadmap", SessionConfig::default()).unwrap();
    assert_eq!(reopened.document(), &expected);
    assert_eq!(reopened.title(), "Roadmap");

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn deep_chain_survives_reload() {
    let mut s = open(include_str!("fixtures/minimal.json"), SessionConfig::default());
    let mut parent = NodeId::intern("a");
    for _ in 0..200 {
        parent = s.add_child(parent).unwrap();
    }
    assert_eq!(s.save_status(), &SaveStatus::Saved);
    let expected = s.document().clone();

    let data = s.store().get("m").unwrap().data.clone();
    let reopened = open(&data, SessionConfig::default());
    assert_eq!(reopened.document(), &expected);
    assert!(reopened.document().contains(parent));
}

// ─── Configuration ───────────────────────────────────────────────────────

#[test]
fn inverted_width_bounds_still_lay_out() {
    let config = SessionConfig::from_json(r#"{ "layout": { "min_width": 300 } }"#).unwrap();
    let mut s = open(include_str!("fixtures/minimal.json"), config);
    let child = s.add_child(NodeId::intern("r")).unwrap();
    s.rename_node(child, "A much longer title than fits", "").unwrap();

    // The maximum wins when the bounds cross.
    let width = s.layout().get(child).unwrap().width;
    assert_eq!(width, 240.0);
}
