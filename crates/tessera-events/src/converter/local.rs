//! Converter for locally originated events.
//!
//! Mutations mirror the middleware converter's so a local edit and its later
//! middleware echo produce the same update downstream.

use tessera_types::{BlockId, FileState};

use super::applied;
use crate::container::{BlockContainer, BlockUpdater};
use crate::event::LocalEvent;
use crate::update::EventHandlerUpdate;

#[derive(Clone, Debug)]
pub struct LocalConverter {
    root_id: BlockId,
}

impl LocalConverter {
    pub fn new(root_id: BlockId) -> Self {
        Self { root_id }
    }

    pub fn root_id(&self) -> &BlockId {
        &self.root_id
    }

    /// Apply one local event. `None` means nothing changed.
    pub fn convert<C: BlockContainer + ?Sized>(
        &self,
        event: &LocalEvent,
        container: &mut C,
    ) -> Option<EventHandlerUpdate> {
        let subject = event.subject();
        let mut updater = BlockUpdater::new(container);

        match event {
            LocalEvent::SetText { id, text } => applied(
                subject,
                updater.update_text(id, |content| content.text = text.clone()),
                || EventHandlerUpdate::block(id.clone()),
            ),

            LocalEvent::SetStyle { id, style } => applied(
                subject,
                updater.update_text(id, |content| content.style = *style),
                || EventHandlerUpdate::block(id.clone()),
            ),

            LocalEvent::SetToggled { id, toggled } => applied(
                subject,
                updater.update_text(id, |content| content.toggled = *toggled),
                || EventHandlerUpdate::block(id.clone()),
            ),

            LocalEvent::SetLoadingState { id } => applied(
                subject,
                updater.update_file(id, |file| file.state = FileState::Uploading),
                || EventHandlerUpdate::block(id.clone()),
            ),

            LocalEvent::SetChildren { id, children_ids } => applied(
                subject,
                updater.set_children(id, children_ids.clone()),
                || EventHandlerUpdate::General,
            ),

            LocalEvent::SetDetails { id, details } => {
                updater.amend_details(id.clone(), details);
                Some(EventHandlerUpdate::details(id.clone()))
            }

            LocalEvent::Reload => Some(EventHandlerUpdate::General),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use tessera_types::{BlockContent, BlockInformation, Details, FileContent, TextStyle};

    use super::*;
    use crate::container::InfoContainer;
    use crate::converter::InnerConverter;
    use crate::event::MiddlewarePayload;

    fn id(s: &str) -> BlockId {
        BlockId::new(s)
    }

    fn container() -> InfoContainer {
        InfoContainer::with_blocks(
            id("page"),
            vec![
                BlockInformation::root(id("page")).with_children(vec![id("a"), id("f")]),
                BlockInformation::text(id("a"), "alpha"),
                BlockInformation::new(id("f"), BlockContent::File(FileContent::default())),
            ],
        )
    }

    #[test]
    fn test_text_edits() {
        let mut c = container();
        let conv = LocalConverter::new(id("page"));

        let update = conv.convert(
            &LocalEvent::SetText {
                id: id("a"),
                text: "typed".into(),
            },
            &mut c,
        );
        assert_eq!(update, Some(EventHandlerUpdate::block(id("a"))));

        conv.convert(
            &LocalEvent::SetStyle {
                id: id("a"),
                style: TextStyle::Toggle,
            },
            &mut c,
        )
        .unwrap();
        conv.convert(
            &LocalEvent::SetToggled {
                id: id("a"),
                toggled: true,
            },
            &mut c,
        )
        .unwrap();

        let text = c.get(&id("a")).unwrap().content.as_text().unwrap();
        assert_eq!(text.text, "typed");
        assert_eq!(text.style, TextStyle::Toggle);
        assert!(text.toggled);
    }

    #[test]
    fn test_loading_state_requires_file() {
        let mut c = container();
        let conv = LocalConverter::new(id("page"));

        assert_eq!(
            conv.convert(&LocalEvent::SetLoadingState { id: id("f") }, &mut c),
            Some(EventHandlerUpdate::block(id("f")))
        );
        assert_eq!(conv.convert(&LocalEvent::SetLoadingState { id: id("a") }, &mut c), None);
        assert_eq!(
            c.get(&id("f")).unwrap().content,
            BlockContent::File(FileContent {
                name: String::new(),
                state: FileState::Uploading,
            })
        );
    }

    #[test]
    fn test_reload_and_children_are_general() {
        let mut c = container();
        let conv = LocalConverter::new(id("page"));

        assert_eq!(conv.convert(&LocalEvent::Reload, &mut c), Some(EventHandlerUpdate::General));
        assert_eq!(
            conv.convert(
                &LocalEvent::SetChildren {
                    id: id("page"),
                    children_ids: vec![id("f"), id("a")],
                },
                &mut c,
            ),
            Some(EventHandlerUpdate::General)
        );
        assert_eq!(
            conv.convert(
                &LocalEvent::SetChildren {
                    id: id("ghost"),
                    children_ids: vec![],
                },
                &mut c,
            ),
            None
        );
    }

    #[test]
    fn test_details_amend() {
        let mut c = container();
        let mut details = Details::new();
        details.insert("name", json!("Renamed"));

        let update = LocalConverter::new(id("page")).convert(
            &LocalEvent::SetDetails {
                id: id("page"),
                details,
            },
            &mut c,
        );
        assert_eq!(update, Some(EventHandlerUpdate::details(id("page"))));
        assert_eq!(c.details(&id("page")).unwrap().title(), Some("Renamed"));
    }

    #[test]
    fn test_local_matches_middleware_echo() {
        let mut local = container();
        let mut remote = container();

        let from_local = LocalConverter::new(id("page")).convert(
            &LocalEvent::SetText {
                id: id("a"),
                text: "same".into(),
            },
            &mut local,
        );
        let from_remote = InnerConverter::new(id("page"), false).convert(
            &MiddlewarePayload::BlockSetText {
                id: id("a"),
                text: Some("same".into()),
                style: None,
                checked: None,
                color: None,
            },
            &mut remote,
        );

        assert_eq!(from_local, from_remote);
        assert_eq!(local.get(&id("a")), remote.get(&id("a")));
    }
}
