//! End-to-end tests for the reconciliation pipeline.
//!
//! # Tiers
//!
//! - **Tier 1:** `EventHandler::handle` against an `InfoContainer`: batch in,
//!   one update out, rebuild only when something changed
//! - **Tier 2:** `EventsBunch::send` → `EventRegistry` → `Document`, dispatch
//!   by document id, including misses
//! - **Tier 3:** Cross-thread producers marshalled through the document lock

use std::sync::Arc;
use std::thread;

use serde_json::json;
use tessera_events::{
    BlockContainer, DataSourceEvent, Document, EventHandler, EventHandlerUpdate, EventRegistry,
    EventsBunch, HandlerConfig, InfoContainer, LocalEvent, MiddlewareEvent, MiddlewarePayload,
};
use tessera_types::{BlockId, BlockInformation, Details, DocumentId, TextStyle};

// ============================================================================
// Shared test setup
// ============================================================================

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn id(s: &str) -> BlockId {
    BlockId::new(s)
}

fn doc_id() -> DocumentId {
    DocumentId::new("page")
}

/// page
/// ├── title
/// ├── x
/// └── list
///     └── item
fn page() -> InfoContainer {
    InfoContainer::with_blocks(
        id("page"),
        vec![
            BlockInformation::root(id("page")).with_children(vec![id("title"), id("x"), id("list")]),
            BlockInformation::text(id("title"), "Notes").with_style(TextStyle::Title),
            BlockInformation::text(id("x"), "first paragraph"),
            BlockInformation::text(id("list"), "todo").with_style(TextStyle::Checkbox)
                .with_children(vec![id("item")]),
            BlockInformation::text(id("item"), "nested"),
        ],
    )
}

fn configured() -> (EventHandler, InfoContainer) {
    init_tracing();
    let container = page();
    let mut handler = EventHandler::new(HandlerConfig::lenient());
    handler.configure(&container);
    (handler, container)
}

fn text_changed(block: &str, text: &str) -> MiddlewareEvent {
    MiddlewareEvent::new(MiddlewarePayload::BlockSetText {
        id: id(block),
        text: Some(text.to_string()),
        style: None,
        checked: None,
        color: None,
    })
}

fn details_changed(object: &str, name: &str) -> MiddlewareEvent {
    let mut details = Details::new();
    details.insert("name", json!(name));
    MiddlewareEvent::new(MiddlewarePayload::ObjectDetailsAmend {
        id: id(object),
        details,
    })
}

// ============================================================================
// Tier 1: handler
// ============================================================================

#[test]
fn test_single_text_change() {
    let (mut handler, mut container) = configured();
    let mut rx = handler.subscribe();

    let bunch = EventsBunch::new(doc_id()).with_middleware([text_changed("x", "edited")]);
    let update = handler.handle(&mut container, &bunch).unwrap();

    assert_eq!(update, EventHandlerUpdate::block(id("x")));
    assert!(update.has_update());
    assert_eq!(container.rebuild_count(), 1);
    assert_eq!(rx.try_recv().unwrap(), update);
}

#[test]
fn test_details_dominates_local_text_change() {
    let (mut handler, mut container) = configured();

    let bunch = EventsBunch::new(doc_id())
        .with_middleware([details_changed("page", "Renamed")])
        .with_local([LocalEvent::SetText {
            id: id("x"),
            text: "typed".into(),
        }]);
    let update = handler.handle(&mut container, &bunch).unwrap();

    assert_eq!(update, EventHandlerUpdate::details(id("page")));
    assert!(update.has_update());
    assert_eq!(container.rebuild_count(), 1);

    // both events were still applied
    assert_eq!(container.details(&id("page")).unwrap().title(), Some("Renamed"));
    let text = container.get(&id("x")).unwrap().content.as_text().unwrap();
    assert_eq!(text.text, "typed");
}

#[test]
fn test_only_unrecognized_events() {
    let (mut handler, mut container) = configured();
    let mut rx = handler.subscribe();

    let bunch = EventsBunch::new(doc_id()).with_middleware([
        MiddlewareEvent::new(MiddlewarePayload::Unknown),
        MiddlewareEvent::empty(),
        MiddlewareEvent::new(MiddlewarePayload::Unknown),
    ]);
    let update = handler.handle(&mut container, &bunch).unwrap();

    assert_eq!(update, EventHandlerUpdate::empty());
    assert!(!update.has_update());
    assert_eq!(container.rebuild_count(), 0);
    assert_eq!(rx.try_recv().unwrap(), EventHandlerUpdate::empty());
}

#[test]
fn test_changed_ids_accumulate_across_streams() {
    let (mut handler, mut container) = configured();

    let bunch = EventsBunch::new(doc_id())
        .with_middleware([
            text_changed("x", "one"),
            MiddlewareEvent::new(MiddlewarePayload::Unknown),
            text_changed("title", "Plan"),
        ])
        .with_local([LocalEvent::SetToggled {
            id: id("x"),
            toggled: true,
        }]);
    let update = handler.handle(&mut container, &bunch).unwrap();

    assert_eq!(update, EventHandlerUpdate::blocks([id("x"), id("title")]));
    assert_eq!(update.changed_ids().map(|ids| ids.len()), Some(2));
    assert_eq!(container.rebuild_count(), 1);
}

#[test]
fn test_middleware_applies_before_local() {
    let (mut handler, mut container) = configured();

    // local runs second, so its text wins
    let bunch = EventsBunch::new(doc_id())
        .with_local([LocalEvent::SetText {
            id: id("x"),
            text: "local".into(),
        }])
        .with_middleware([text_changed("x", "remote")]);
    handler.handle(&mut container, &bunch).unwrap();

    let text = container.get(&id("x")).unwrap().content.as_text().unwrap();
    assert_eq!(text.text, "local");
}

#[test]
fn test_structural_change_relayouts() {
    let (mut handler, mut container) = configured();
    assert_eq!(container.position(&id("item")), Some(3));

    let bunch = EventsBunch::new(doc_id()).with_middleware([
        MiddlewareEvent::new(MiddlewarePayload::BlockAdd {
            blocks: vec![BlockInformation::text(id("new"), "inserted")],
        }),
        MiddlewareEvent::new(MiddlewarePayload::BlockSetChildrenIds {
            id: id("page"),
            children_ids: vec![id("title"), id("new"), id("x"), id("list")],
        }),
        text_changed("x", "after"),
    ]);
    let update = handler.handle(&mut container, &bunch).unwrap();

    assert_eq!(update, EventHandlerUpdate::General);
    assert_eq!(container.position(&id("new")), Some(1));
    assert_eq!(container.position(&id("item")), Some(4));
}

#[test]
fn test_delete_renumbers_positions() {
    let (mut handler, mut container) = configured();

    let bunch = EventsBunch::new(doc_id()).with_middleware([MiddlewareEvent::new(
        MiddlewarePayload::BlockDelete {
            block_ids: vec![id("title")],
        },
    )]);
    handler.handle(&mut container, &bunch).unwrap();

    let order: Vec<_> = container.flattened().cloned().collect();
    assert_eq!(order, vec![id("x"), id("list"), id("item")]);
    assert_eq!(container.position(&id("title")), None);
    assert_eq!(container.position(&id("x")), Some(0));
}

#[test]
fn test_data_source_events_bypass_merge() {
    let (mut handler, mut container) = configured();
    let mut rows = handler.subscribe_data_source();

    let bunch = EventsBunch::new(doc_id())
        .with_data_source([DataSourceEvent::UpdateRows { ids: vec![id("row")] }]);
    let update = handler.handle(&mut container, &bunch).unwrap();

    assert!(!update.has_update());
    assert_eq!(rows.try_recv().unwrap(), DataSourceEvent::UpdateRows { ids: vec![id("row")] });
}

// ============================================================================
// Tier 2: dispatch
// ============================================================================

#[test]
fn test_send_without_registered_handler() {
    init_tracing();
    let registry = EventRegistry::new();

    let delivered = EventsBunch::new(DocumentId::new("closed"))
        .with_middleware([text_changed("x", "stale")])
        .send(&registry);

    assert!(!delivered);
    assert!(registry.is_empty());
}

#[test]
fn test_send_reaches_open_document() {
    init_tracing();
    let registry = EventRegistry::new();
    let doc = Document::new(doc_id(), page(), HandlerConfig::lenient()).open(&registry);
    let mut rx = doc.lock().subscribe();

    assert!(
        EventsBunch::new(doc_id())
            .with_middleware([details_changed("page", "Inbox")])
            .send(&registry)
    );

    assert_eq!(rx.try_recv().unwrap(), EventHandlerUpdate::details(id("page")));
    assert_eq!(
        doc.lock().container().details(&id("page")).unwrap().title(),
        Some("Inbox")
    );
}

#[test]
fn test_send_only_reaches_addressed_document() {
    init_tracing();
    let registry = EventRegistry::new();
    let first = Document::new(DocumentId::new("page"), page(), HandlerConfig::lenient()).open(&registry);
    let second = Document::new(
        DocumentId::new("other"),
        InfoContainer::new(id("other")),
        HandlerConfig::lenient(),
    )
    .open(&registry);
    let mut second_rx = second.lock().subscribe();

    EventsBunch::new(DocumentId::new("page"))
        .with_local([LocalEvent::Reload])
        .send(&registry);

    assert_eq!(first.lock().container().rebuild_count(), 1);
    assert_eq!(second.lock().container().rebuild_count(), 0);
    assert!(second_rx.try_recv().is_err());
}

// ============================================================================
// Tier 3: producers on other threads
// ============================================================================

#[test]
fn test_background_producers_serialize_on_document() {
    init_tracing();
    let registry = Arc::new(EventRegistry::new());
    let doc = Document::new(doc_id(), page(), HandlerConfig::lenient()).open(&registry);
    let mut rx = doc.lock().subscribe();

    let producers: Vec<_> = (0..4)
        .map(|n| {
            let registry = Arc::clone(&registry);
            thread::spawn(move || {
                EventsBunch::new(DocumentId::new("page"))
                    .with_local([LocalEvent::SetText {
                        id: BlockId::new("x"),
                        text: format!("writer {n}"),
                    }])
                    .send(&registry)
            })
        })
        .collect();

    for producer in producers {
        assert!(producer.join().unwrap());
    }

    let mut received = 0;
    while let Ok(update) = rx.try_recv() {
        assert_eq!(update, EventHandlerUpdate::block(id("x")));
        received += 1;
    }
    assert_eq!(received, 4);
    assert_eq!(doc.lock().container().rebuild_count(), 4);
}
