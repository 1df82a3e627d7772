//! Block snapshots.
//!
//! A [`BlockInformation`] is one node of a document's content tree. It knows
//! its direct children only (`children_ids`); the tree is rebuilt from those
//! lists by the container, never stored inline.
//!
//! ## Design: BlockContent + companion enums
//!
//! `BlockContent` says what a block *is*. Presentation lives next to it:
//!
//! - `TextStyle` on Text: paragraph, heading, checkbox, toggle, ...
//! - `FileState` on File: upload lifecycle
//! - `Alignment` on every block

use std::collections::BTreeMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::EnumString;

use crate::ids::BlockId;

/// Free-form per-block fields (collapsed state, widths, ...).
pub type Fields = BTreeMap<String, serde_json::Value>;

/// Horizontal alignment of a block.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(ascii_case_insensitive)]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

impl Alignment {
    /// Convert to string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Alignment::Left => "left",
            Alignment::Center => "center",
            Alignment::Right => "right",
            Alignment::Justify => "justify",
        }
    }
}

impl std::fmt::Display for Alignment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Style of a text block.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(ascii_case_insensitive)]
pub enum TextStyle {
    /// Plain paragraph.
    #[default]
    #[strum(serialize = "paragraph", serialize = "text")]
    Paragraph,
    /// Document title (first block of a page).
    Title,
    #[strum(serialize = "header1", serialize = "h1")]
    Header1,
    #[strum(serialize = "header2", serialize = "h2")]
    Header2,
    #[strum(serialize = "header3", serialize = "h3")]
    Header3,
    Quote,
    Code,
    Checkbox,
    Bulleted,
    Numbered,
    /// Collapsible block; children are hidden unless toggled open.
    Toggle,
    Description,
}

impl TextStyle {
    /// Parse from string (case-insensitive).
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        <Self as FromStr>::from_str(s).ok()
    }

    /// Convert to string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            TextStyle::Paragraph => "paragraph",
            TextStyle::Title => "title",
            TextStyle::Header1 => "header1",
            TextStyle::Header2 => "header2",
            TextStyle::Header3 => "header3",
            TextStyle::Quote => "quote",
            TextStyle::Code => "code",
            TextStyle::Checkbox => "checkbox",
            TextStyle::Bulleted => "bulleted",
            TextStyle::Numbered => "numbered",
            TextStyle::Toggle => "toggle",
            TextStyle::Description => "description",
        }
    }

    /// Check if this is a list-like style whose children are indented.
    pub fn is_list(&self) -> bool {
        matches!(
            self,
            TextStyle::Checkbox | TextStyle::Bulleted | TextStyle::Numbered | TextStyle::Toggle
        )
    }
}

impl std::fmt::Display for TextStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Upload lifecycle of a file block.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(ascii_case_insensitive)]
pub enum FileState {
    /// No file attached yet.
    #[default]
    Empty,
    /// Upload in progress.
    #[strum(serialize = "uploading", serialize = "loading")]
    Uploading,
    /// File attached.
    Done,
    /// Upload failed.
    Error,
}

impl FileState {
    /// Check if this state is still changing.
    pub fn is_pending(&self) -> bool {
        matches!(self, FileState::Uploading)
    }
}

/// Content of a text block.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TextContent {
    pub text: String,
    #[serde(default)]
    pub style: TextStyle,
    #[serde(default)]
    pub checked: bool,
    #[serde(default)]
    pub color: Option<String>,
    /// Toggle blocks only: whether children are shown.
    #[serde(default)]
    pub toggled: bool,
}

/// Content of a file block.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileContent {
    pub name: String,
    #[serde(default)]
    pub state: FileState,
}

/// What a block *is*.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BlockContent {
    /// Page-level container (the root of a document).
    Smartblock,
    Text(TextContent),
    Divider,
    Link { target: BlockId },
    File(FileContent),
    /// Content type this client doesn't render.
    Unsupported,
}

impl BlockContent {
    /// Short kind name for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            BlockContent::Smartblock => "smartblock",
            BlockContent::Text(_) => "text",
            BlockContent::Divider => "divider",
            BlockContent::Link { .. } => "link",
            BlockContent::File(_) => "file",
            BlockContent::Unsupported => "unsupported",
        }
    }

    pub fn as_text(&self) -> Option<&TextContent> {
        match self {
            BlockContent::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_text_mut(&mut self) -> Option<&mut TextContent> {
        match self {
            BlockContent::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_file_mut(&mut self) -> Option<&mut FileContent> {
        match self {
            BlockContent::File(file) => Some(file),
            _ => None,
        }
    }
}

/// Snapshot of one block.
///
/// Invariant: `children_ids` lists direct children only, in display order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BlockInformation {
    pub id: BlockId,
    pub content: BlockContent,
    #[serde(default)]
    pub children_ids: Vec<BlockId>,
    #[serde(default)]
    pub background_color: Option<String>,
    #[serde(default)]
    pub alignment: Alignment,
    #[serde(default)]
    pub fields: Fields,
}

impl BlockInformation {
    /// Create a block with the given content and no children.
    pub fn new(id: BlockId, content: BlockContent) -> Self {
        Self {
            id,
            content,
            children_ids: Vec::new(),
            background_color: None,
            alignment: Alignment::default(),
            fields: Fields::new(),
        }
    }

    /// Create a page root (smartblock) with no children.
    pub fn root(id: BlockId) -> Self {
        Self::new(id, BlockContent::Smartblock)
    }

    /// Create a paragraph text block.
    pub fn text(id: BlockId, text: impl Into<String>) -> Self {
        Self::new(
            id,
            BlockContent::Text(TextContent {
                text: text.into(),
                ..TextContent::default()
            }),
        )
    }

    /// Replace the children list.
    pub fn with_children(mut self, children_ids: Vec<BlockId>) -> Self {
        self.children_ids = children_ids;
        self
    }

    /// Set the text style (no-op for non-text blocks).
    pub fn with_style(mut self, style: TextStyle) -> Self {
        if let Some(text) = self.content.as_text_mut() {
            text.style = style;
        }
        self
    }

    /// Check if this block hides its children (closed toggle).
    pub fn is_collapsed(&self) -> bool {
        self.content
            .as_text()
            .is_some_and(|t| t.style == TextStyle::Toggle && !t.toggled)
    }

    /// Check if this block has children.
    pub fn has_children(&self) -> bool {
        !self.children_ids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_parse_aliases() {
        assert_eq!(TextStyle::from_str("h1"), Some(TextStyle::Header1));
        assert_eq!(TextStyle::from_str("TEXT"), Some(TextStyle::Paragraph));
        assert_eq!(TextStyle::from_str("nope"), None);
    }

    #[test]
    fn test_style_and_file_state_predicates() {
        assert!(TextStyle::Checkbox.is_list());
        assert!(!TextStyle::Title.is_list());

        let loading: FileState = "loading".parse().unwrap();
        assert_eq!(loading, FileState::Uploading);
        assert!(loading.is_pending());
        assert!(!FileState::Done.is_pending());
    }

    #[test]
    fn test_collapsed_toggle() {
        let toggle = BlockInformation::text(BlockId::new("t"), "section").with_style(TextStyle::Toggle);
        assert!(toggle.is_collapsed());

        let mut open = toggle.clone();
        open.content.as_text_mut().unwrap().toggled = true;
        assert!(!open.is_collapsed());

        let para = BlockInformation::text(BlockId::new("p"), "plain");
        assert!(!para.is_collapsed());
    }

    #[test]
    fn test_with_style_ignores_non_text() {
        let divider = BlockInformation::new(BlockId::new("d"), BlockContent::Divider)
            .with_style(TextStyle::Header1);
        assert_eq!(divider.content, BlockContent::Divider);
    }

    #[test]
    fn test_content_serde_tagged() {
        let content = BlockContent::Link { target: BlockId::new("other") };
        let json = serde_json::to_value(&content).unwrap();
        assert_eq!(json["type"], "link");
        assert_eq!(json["target"], "other");
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let info: BlockInformation = serde_json::from_value(serde_json::json!({
            "id": "b1",
            "content": { "type": "divider" }
        }))
        .unwrap();
        assert!(info.children_ids.is_empty());
        assert_eq!(info.alignment, Alignment::Left);
    }
}
