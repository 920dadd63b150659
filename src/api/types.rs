//! Wire types for the backend REST contract.
//!
//! Element `content` and `etc` travel as `{ "text": … }` envelopes around
//! the flat strings the client works with; the conversions below keep that
//! detail out of the rest of the codebase.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::editor::PageEditor;
use crate::core::page::{Block, BlockKind, Page};

/// Single-field envelope used by element `content` and `etc`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextPayload {
    #[serde(default)]
    pub text: String,
}

/// A content element on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElementDto {
    pub element_uuid: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub content: TextPayload,
    #[serde(default)]
    pub etc: TextPayload,
}

impl From<&Block> for ElementDto {
    fn from(block: &Block) -> Self {
        Self {
            element_uuid: block.uuid.clone(),
            kind: block.kind.wire_tag().to_string(),
            content: TextPayload {
                text: block.content.clone(),
            },
            etc: TextPayload {
                text: block.styling.clone(),
            },
        }
    }
}

impl From<ElementDto> for Block {
    fn from(dto: ElementDto) -> Self {
        Self {
            uuid: dto.element_uuid,
            kind: BlockKind::from_wire(&dto.kind),
            content: dto.content.text,
            styling: dto.etc.text,
        }
    }
}

/// Page metadata on the wire.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageDto {
    pub page_uuid: String,
    #[serde(default)]
    pub page_name: String,
    #[serde(default)]
    pub is_root: bool,
    #[serde(default)]
    pub element_positions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_page_uuid: Option<String>,
    #[serde(default)]
    pub public_page: bool,
    #[serde(default)]
    pub is_favourite: bool,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub date_view_count: BTreeMap<String, u64>,
}

impl From<PageDto> for Page {
    fn from(dto: PageDto) -> Self {
        Self {
            uuid: dto.page_uuid,
            name: dto.page_name,
            is_root: dto.is_root,
            element_positions: dto.element_positions,
            parent_page_uuid: dto.parent_page_uuid,
            public_page: dto.public_page,
            is_favourite: dto.is_favourite,
            date_view_count: dto.date_view_count,
        }
    }
}

impl From<&Page> for PageDto {
    fn from(page: &Page) -> Self {
        Self {
            page_uuid: page.uuid.clone(),
            page_name: page.name.clone(),
            is_root: page.is_root,
            element_positions: page.element_positions.clone(),
            parent_page_uuid: page.parent_page_uuid.clone(),
            public_page: page.public_page,
            is_favourite: page.is_favourite,
            date_view_count: page.date_view_count.clone(),
        }
    }
}

/// Response of `GET page-get/{uuid}`.
#[derive(Debug, Clone, Deserialize)]
pub struct PageGetResponse {
    pub page: PageDto,
    #[serde(default)]
    pub elements: Vec<ElementDto>,
}

/// Response of `GET page-list`.
#[derive(Debug, Clone, Deserialize)]
pub struct PageListResponse {
    #[serde(default)]
    pub pages: Vec<PageDto>,
}

/// Page half of a `POST page-update` request. `element_positions` lists ALL
/// element uuids in page order, even when no element bodies are shipped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageUpdateDto {
    pub page_uuid: String,
    pub page_name: String,
    pub is_root: bool,
    pub element_positions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_page_uuid: Option<String>,
    pub public_page: bool,
    pub is_favourite: bool,
}

/// Body of `POST page-update`. Only created/changed elements are included;
/// removed elements travel as bare uuids.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageUpdateRequest {
    pub page: PageUpdateDto,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elements: Option<Vec<ElementDto>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remove_elements: Option<Vec<String>>,
}

impl PageUpdateRequest {
    /// Build a request from the open editor, draining its change log.
    pub fn from_editor(editor: &mut PageEditor) -> Self {
        let payload = editor.save_payload();
        let elements = if payload.changed.is_empty() {
            None
        } else {
            Some(payload.changed.iter().map(ElementDto::from).collect())
        };
        let remove_elements = if payload.removed.is_empty() {
            None
        } else {
            Some(payload.removed)
        };

        Self {
            page: PageUpdateDto {
                page_uuid: editor.page_uuid.clone(),
                page_name: editor.title.clone(),
                is_root: editor.is_root,
                element_positions: editor.element_positions(),
                parent_page_uuid: editor.parent_page_uuid.clone(),
                public_page: editor.public_page,
                is_favourite: editor.is_favourite,
            },
            elements,
            remove_elements,
        }
    }

    /// Metadata-only update (rename/favourite/publish from the sidebar),
    /// with positions taken from the page summary.
    pub fn metadata_only(page: &Page) -> Self {
        Self {
            page: PageUpdateDto {
                page_uuid: page.uuid.clone(),
                page_name: page.name.clone(),
                is_root: page.is_root,
                element_positions: page.element_positions.clone(),
                parent_page_uuid: page.parent_page_uuid.clone(),
                public_page: page.public_page,
                is_favourite: page.is_favourite,
            },
            elements: None,
            remove_elements: None,
        }
    }
}

/// Body of `POST page-delete`.
#[derive(Debug, Clone, Serialize)]
pub struct PageDeleteRequest {
    pub page_uuid: String,
}

/// Response of `GET user-get`.
#[derive(Debug, Clone, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub email: String,
    #[serde(default = "default_status")]
    pub status: String,
}

fn default_status() -> String {
    "freemium".to_string()
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            email: String::new(),
            status: default_status(),
        }
    }
}

impl UserProfile {
    /// Freemium accounts cannot publish and don't get analytics.
    pub fn is_premium(&self) -> bool {
        self.status != "freemium"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::page::BlockKind;

    #[test]
    fn test_element_envelope_round_trip() {
        let mut block = Block::new(BlockKind::CodeBlock);
        block.content = "fn main() {}".to_string();
        block.styling = "theme: dracula; language: rust; showLineNumbers: true; wrapLines: false"
            .to_string();

        let dto = ElementDto::from(&block);
        assert_eq!(dto.kind, "Code Block");
        assert_eq!(dto.content.text, "fn main() {}");

        let back = Block::from(dto);
        assert_eq!(back, block);
    }

    #[test]
    fn test_element_missing_envelopes_decode_to_empty() {
        let json = r#"{"element_uuid":"e1","type":"Paragraph"}"#;
        let dto: ElementDto = serde_json::from_str(json).expect("decode");
        let block = Block::from(dto);
        assert_eq!(block.content, "");
        assert_eq!(block.styling, "");
        assert_eq!(block.kind, BlockKind::Paragraph);
    }

    #[test]
    fn test_page_get_response_without_elements() {
        let json = r#"{"page":{"page_uuid":"p1","page_name":"Home","is_root":true,
            "element_positions":[],"public_page":false,"is_favourite":false,
            "date_view_count":{"2026-08-01":3}}}"#;
        let resp: PageGetResponse = serde_json::from_str(json).expect("decode");
        assert!(resp.elements.is_empty());
        assert_eq!(resp.page.date_view_count.get("2026-08-01"), Some(&3));
    }

    #[test]
    fn test_update_request_from_editor_ships_only_changes() {
        let page = Page::new_root("Home");
        let blocks = vec![Block::new(BlockKind::Paragraph), Block::new(BlockKind::Checkbox)];
        let mut editor = PageEditor::new(page, blocks);
        editor.save_payload(); // fetched state is clean

        editor.update(0, |b| b.content = "hello".to_string());
        let removed_uuid = editor.block(1).map(|b| b.uuid.clone()).unwrap_or_default();
        editor.remove(1);

        let req = PageUpdateRequest::from_editor(&mut editor);
        let elements = req.elements.as_deref().unwrap_or_default();
        assert_eq!(elements.len(), 1);
        assert_eq!(elements[0].content.text, "hello");
        assert_eq!(req.remove_elements, Some(vec![removed_uuid]));
        assert_eq!(req.page.element_positions.len(), 1);

        // a reorder-only follow-up has positions but no element bodies
        let req = PageUpdateRequest::from_editor(&mut editor);
        assert!(req.elements.is_none());
        assert!(req.remove_elements.is_none());

        let json = serde_json::to_string(&req).expect("encode");
        assert!(!json.contains("remove_elements"));
        assert!(!json.contains("\"elements\""));
    }

    #[test]
    fn test_user_profile_defaults_to_freemium() {
        let profile: UserProfile = serde_json::from_str("{}").expect("decode");
        assert!(!profile.is_premium());

        let paid: UserProfile =
            serde_json::from_str(r#"{"status":"premium"}"#).expect("decode");
        assert!(paid.is_premium());
    }
}
