//! Converter for middleware-originated events.

use std::collections::HashSet;

use tessera_types::BlockId;

use super::applied;
use crate::container::{BlockContainer, BlockUpdater};
use crate::error::ContainerError;
use crate::event::MiddlewarePayload;
use crate::update::EventHandlerUpdate;

/// Applies middleware change messages to a container.
#[derive(Clone, Debug)]
pub struct InnerConverter {
    root_id: BlockId,
    log_dropped: bool,
}

impl InnerConverter {
    pub fn new(root_id: BlockId, log_dropped: bool) -> Self {
        Self {
            root_id,
            log_dropped,
        }
    }

    pub fn root_id(&self) -> &BlockId {
        &self.root_id
    }

    /// Apply one payload. `None` means nothing changed.
    pub fn convert<C: BlockContainer + ?Sized>(
        &self,
        payload: &MiddlewarePayload,
        container: &mut C,
    ) -> Option<EventHandlerUpdate> {
        let subject = payload.subject();
        let mut updater = BlockUpdater::new(container);

        match payload {
            MiddlewarePayload::BlockAdd { blocks } => {
                if blocks.is_empty() {
                    return None;
                }
                let mut seen = HashSet::new();
                if let Some(dup) = blocks.iter().find(|b| !seen.insert(&b.id)) {
                    let error = ContainerError::DuplicateBlock(dup.id.clone());
                    tracing::warn!(subject, %error, "event not applicable, dropped");
                    return None;
                }
                for info in blocks {
                    updater.insert(info.clone());
                }
                Some(EventHandlerUpdate::General)
            }

            MiddlewarePayload::BlockDelete { block_ids } => {
                if block_ids.contains(&self.root_id) {
                    tracing::warn!(subject, root = %self.root_id, "refusing to delete document root");
                    return None;
                }
                let deleted = block_ids
                    .iter()
                    .filter(|id| updater.delete(id).is_ok())
                    .count();
                if deleted == 0 {
                    self.dropped(subject, "no listed block present");
                    return None;
                }
                Some(EventHandlerUpdate::General)
            }

            MiddlewarePayload::BlockSetChildrenIds { id, children_ids } => applied(
                subject,
                updater.set_children(id, children_ids.clone()),
                || EventHandlerUpdate::General,
            ),

            MiddlewarePayload::BlockSetText {
                id,
                text,
                style,
                checked,
                color,
            } => applied(
                subject,
                updater.update_text(id, |content| {
                    if let Some(text) = text {
                        content.text = text.clone();
                    }
                    if let Some(style) = style {
                        content.style = *style;
                    }
                    if let Some(checked) = checked {
                        content.checked = *checked;
                    }
                    if let Some(color) = color {
                        content.color = Some(color.clone()).filter(|c| !c.is_empty());
                    }
                }),
                || EventHandlerUpdate::block(id.clone()),
            ),

            MiddlewarePayload::BlockSetFields { id, fields } => applied(
                subject,
                updater.update(id, |info| info.fields = fields.clone()),
                || EventHandlerUpdate::block(id.clone()),
            ),

            MiddlewarePayload::BlockSetBackgroundColor { id, color } => applied(
                subject,
                updater.update(id, |info| {
                    info.background_color = color.clone().filter(|c| !c.is_empty())
                }),
                || EventHandlerUpdate::block(id.clone()),
            ),

            MiddlewarePayload::BlockSetAlign { id, align } => applied(
                subject,
                updater.update(id, |info| info.alignment = *align),
                || EventHandlerUpdate::block(id.clone()),
            ),

            MiddlewarePayload::BlockSetFile { id, name, state } => applied(
                subject,
                updater.update_file(id, |file| {
                    if let Some(name) = name {
                        file.name = name.clone();
                    }
                    if let Some(state) = state {
                        file.state = *state;
                    }
                }),
                || EventHandlerUpdate::block(id.clone()),
            ),

            MiddlewarePayload::BlockSetLink { id, target } => applied(
                subject,
                updater.set_link_target(id, target.clone()),
                || EventHandlerUpdate::block(id.clone()),
            ),

            MiddlewarePayload::ObjectDetailsSet { id, details } => {
                updater.set_details(id.clone(), details.clone());
                Some(EventHandlerUpdate::details(id.clone()))
            }

            MiddlewarePayload::ObjectDetailsAmend { id, details } => {
                updater.amend_details(id.clone(), details);
                Some(EventHandlerUpdate::details(id.clone()))
            }

            MiddlewarePayload::ObjectDetailsUnset { id, keys } => {
                if updater.unset_details(id, keys) {
                    Some(EventHandlerUpdate::details(id.clone()))
                } else {
                    self.dropped(subject, "object has no details");
                    None
                }
            }

            MiddlewarePayload::Unknown => {
                self.dropped(subject, "unrecognized event kind");
                None
            }
        }
    }

    fn dropped(&self, subject: &'static str, reason: &str) {
        if self.log_dropped {
            tracing::debug!(subject, reason, "middleware event dropped");
        }
    }
}
