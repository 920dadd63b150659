//! Page and content block model.

use std::collections::BTreeMap;

use uuid::Uuid;

use super::style;

/// Styling applied to a fresh text block: autofocus pulls the cursor into
/// the new field, and is stripped again after the first focus.
pub const DEFAULT_TEXT_STYLING: &str = "normal; autofocus; color: #000000;";

/// Default emoji for a fresh callout block.
pub const DEFAULT_CALLOUT_EMOJI: &str = "\u{1F4A1}";

/// Kind tag of a content block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlockKind {
    #[default]
    Paragraph,
    Heading1,
    Heading2,
    Heading3,
    Checkbox,
    Callout,
    CodeBlock,
    /// Web embed; the wire tag is `iFrame` for historical reasons.
    Embed,
    NestedPage,
    Analytics,
}

impl BlockKind {
    /// Tag used on the wire and in persisted pages.
    pub fn wire_tag(&self) -> &'static str {
        match self {
            BlockKind::Paragraph => "Paragraph",
            BlockKind::Heading1 => "Heading 1",
            BlockKind::Heading2 => "Heading 2",
            BlockKind::Heading3 => "Heading 3",
            BlockKind::Checkbox => "Checkbox",
            BlockKind::Callout => "Callout",
            BlockKind::CodeBlock => "Code Block",
            BlockKind::Embed => "iFrame",
            BlockKind::NestedPage => "Nested Page",
            BlockKind::Analytics => "Page Analytics",
        }
    }

    /// Parse a wire tag; unknown tags degrade to a paragraph rather than
    /// failing the whole page fetch.
    pub fn from_wire(tag: &str) -> Self {
        match tag {
            "Paragraph" => BlockKind::Paragraph,
            "Heading 1" => BlockKind::Heading1,
            "Heading 2" => BlockKind::Heading2,
            "Heading 3" => BlockKind::Heading3,
            "Checkbox" => BlockKind::Checkbox,
            "Callout" => BlockKind::Callout,
            "Code Block" => BlockKind::CodeBlock,
            "iFrame" => BlockKind::Embed,
            "Nested Page" => BlockKind::NestedPage,
            "Page Analytics" => BlockKind::Analytics,
            _ => BlockKind::Paragraph,
        }
    }

    /// Human label for menus.
    pub fn label(&self) -> &'static str {
        match self {
            BlockKind::Embed => "Web Embed",
            other => other.wire_tag(),
        }
    }

    /// Paragraph or heading, i.e. rendered through the text field.
    pub fn is_text(&self) -> bool {
        matches!(
            self,
            BlockKind::Paragraph | BlockKind::Heading1 | BlockKind::Heading2 | BlockKind::Heading3
        )
    }

    /// Menu ordering for the insert menu.
    pub fn menu_order() -> &'static [BlockKind] {
        &[
            BlockKind::Heading1,
            BlockKind::Heading2,
            BlockKind::Heading3,
            BlockKind::Paragraph,
            BlockKind::Checkbox,
            BlockKind::Callout,
            BlockKind::CodeBlock,
            BlockKind::Embed,
            BlockKind::NestedPage,
            BlockKind::Analytics,
        ]
    }
}

/// A single content block on a page.
///
/// `content` and `styling` carry kind-specific meaning; see the accessors.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub uuid: String,
    pub kind: BlockKind,
    pub content: String,
    pub styling: String,
}

impl Block {
    /// Create a fresh block of the given kind with its default styling.
    pub fn new(kind: BlockKind) -> Self {
        let styling = if kind.is_text() {
            DEFAULT_TEXT_STYLING.to_string()
        } else if kind == BlockKind::Callout {
            DEFAULT_CALLOUT_EMOJI.to_string()
        } else {
            String::new()
        };

        Self {
            uuid: Uuid::new_v4().to_string(),
            kind,
            content: String::new(),
            styling,
        }
    }

    /// Create a nested-page block pointing at `child`. The styling field
    /// holds the child page uuid; keep that detail behind the accessors.
    pub fn nested_page(child: &Page) -> Self {
        Self {
            uuid: Uuid::new_v4().to_string(),
            kind: BlockKind::NestedPage,
            content: child.name.clone(),
            styling: child.uuid.clone(),
        }
    }

    /// The child page uuid of a nested-page block.
    pub fn nested_page_uuid(&self) -> Option<&str> {
        if self.kind != BlockKind::NestedPage || self.styling.trim().is_empty() {
            return None;
        }
        Some(self.styling.trim())
    }

    /// Checkbox state; the styling field holds the literal marker `checked`.
    pub fn is_checked(&self) -> bool {
        self.styling.trim() == "checked"
    }

    pub fn set_checked(&mut self, checked: bool) {
        self.styling = if checked { "checked".to_string() } else { String::new() };
    }

    /// Whether this block should grab focus on first render.
    pub fn wants_autofocus(&self) -> bool {
        style::has_marker(&self.styling, "autofocus")
    }

    /// Strip the transient autofocus marker. Returns true if it was present.
    pub fn clear_autofocus(&mut self) -> bool {
        if !self.wants_autofocus() {
            return false;
        }
        self.styling = style::remove_marker(&self.styling, "autofocus");
        true
    }
}

/// Code block presentation themes, matching the persisted names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CodeTheme {
    #[default]
    Github,
    Dracula,
    TomorrowNightBlue,
    Chaos,
}

impl CodeTheme {
    pub fn wire_name(&self) -> &'static str {
        match self {
            CodeTheme::Github => "github",
            CodeTheme::Dracula => "dracula",
            CodeTheme::TomorrowNightBlue => "tomorrow_night_blue",
            CodeTheme::Chaos => "chaos",
        }
    }

    pub fn from_wire(name: &str) -> Self {
        match name {
            "dracula" => CodeTheme::Dracula,
            "tomorrow_night_blue" => CodeTheme::TomorrowNightBlue,
            "chaos" => CodeTheme::Chaos,
            _ => CodeTheme::Github,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CodeTheme::Github => "GitHub",
            CodeTheme::Dracula => "Dracula",
            CodeTheme::TomorrowNightBlue => "Tomorrow Night Blue",
            CodeTheme::Chaos => "Chaos",
        }
    }

    pub fn all() -> &'static [CodeTheme] {
        &[
            CodeTheme::Github,
            CodeTheme::Dracula,
            CodeTheme::TomorrowNightBlue,
            CodeTheme::Chaos,
        ]
    }
}

/// Persisted settings of a code block, stored in its styling string.
#[derive(Debug, Clone, PartialEq)]
pub struct CodeSettings {
    pub theme: CodeTheme,
    pub language: String,
    pub show_line_numbers: bool,
    pub wrap_lines: bool,
}

impl Default for CodeSettings {
    fn default() -> Self {
        Self {
            theme: CodeTheme::Github,
            language: "javascript".to_string(),
            show_line_numbers: true,
            wrap_lines: false,
        }
    }
}

impl CodeSettings {
    pub fn from_styling(styling: &str) -> Self {
        let defaults = Self::default();
        Self {
            theme: style::get_value(styling, "theme")
                .map(CodeTheme::from_wire)
                .unwrap_or(defaults.theme),
            language: style::get_value(styling, "language")
                .map(str::to_string)
                .unwrap_or(defaults.language),
            show_line_numbers: style::get_value(styling, "showLineNumbers")
                .map(|v| v == "true")
                .unwrap_or(defaults.show_line_numbers),
            wrap_lines: style::get_value(styling, "wrapLines")
                .map(|v| v == "true")
                .unwrap_or(defaults.wrap_lines),
        }
    }

    pub fn to_styling(&self) -> String {
        format!(
            "theme: {}; language: {}; showLineNumbers: {}; wrapLines: {}",
            self.theme.wire_name(),
            self.language,
            self.show_line_numbers,
            self.wrap_lines
        )
    }
}

/// Page metadata as held in the sidebar list and editor.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub uuid: String,
    pub name: String,
    pub is_root: bool,
    /// Ordered uuids of all elements on the page, as persisted.
    pub element_positions: Vec<String>,
    pub parent_page_uuid: Option<String>,
    pub public_page: bool,
    pub is_favourite: bool,
    /// View counts keyed by `YYYY-MM-DD`; owned by the backend.
    pub date_view_count: BTreeMap<String, u64>,
}

impl Page {
    /// New top-level page with a client-generated uuid.
    pub fn new_root(name: impl Into<String>) -> Self {
        Self {
            uuid: Uuid::new_v4().to_string(),
            name: name.into(),
            is_root: true,
            ..Default::default()
        }
    }

    /// New nested page under `parent_uuid`.
    pub fn new_child(parent_uuid: &str) -> Self {
        Self {
            uuid: Uuid::new_v4().to_string(),
            name: "Untitled".to_string(),
            is_root: false,
            parent_page_uuid: Some(parent_uuid.to_string()),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_tag_round_trip() {
        for kind in BlockKind::menu_order() {
            assert_eq!(BlockKind::from_wire(kind.wire_tag()), *kind);
        }
    }

    #[test]
    fn test_unknown_wire_tag_degrades_to_paragraph() {
        assert_eq!(BlockKind::from_wire("Kanban Board"), BlockKind::Paragraph);
    }

    #[test]
    fn test_new_text_block_defaults() {
        let block = Block::new(BlockKind::Heading2);
        assert!(block.wants_autofocus());
        assert_eq!(
            super::super::style::get_value(&block.styling, "color"),
            Some("#000000")
        );
    }

    #[test]
    fn test_clear_autofocus_is_one_shot() {
        let mut block = Block::new(BlockKind::Paragraph);
        assert!(block.clear_autofocus());
        assert!(!block.wants_autofocus());
        assert!(!block.clear_autofocus());
    }

    #[test]
    fn test_nested_page_uuid_accessor() {
        let parent = Page::new_root("Home");
        let child = Page::new_child(&parent.uuid);
        let block = Block::nested_page(&child);
        assert_eq!(block.nested_page_uuid(), Some(child.uuid.as_str()));
        assert_eq!(block.content, "Untitled");

        let plain = Block::new(BlockKind::Paragraph);
        assert_eq!(plain.nested_page_uuid(), None);
    }

    #[test]
    fn test_checkbox_marker() {
        let mut block = Block::new(BlockKind::Checkbox);
        assert!(!block.is_checked());
        block.set_checked(true);
        assert!(block.is_checked());
        assert_eq!(block.styling, "checked");
        block.set_checked(false);
        assert!(!block.is_checked());
    }

    #[test]
    fn test_code_settings_round_trip() {
        let settings = CodeSettings {
            theme: CodeTheme::Dracula,
            language: "rust".to_string(),
            show_line_numbers: false,
            wrap_lines: true,
        };
        let parsed = CodeSettings::from_styling(&settings.to_styling());
        assert_eq!(parsed, settings);
    }

    #[test]
    fn test_code_settings_defaults_on_empty_styling() {
        let settings = CodeSettings::from_styling("");
        assert_eq!(settings, CodeSettings::default());
    }
}
