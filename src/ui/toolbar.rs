//! Per-block toolbars and the insert menu.
//!
//! Toolbars appear above the focused block in edit mode and feed their
//! effects back either as direct styling mutations or as a [`BlockAction`]
//! for the editor panel to apply after the block loop.

use eframe::egui::{self, Color32, FontId, RichText, Ui};

use super::block_renderer::BlockAction;
use crate::core::page::{Block, BlockKind, CodeSettings, CodeTheme};
use crate::core::style;

/// Languages offered by the code block toolbar.
const CODE_LANGUAGES: &[&str] = &[
    "javascript",
    "typescript",
    "python",
    "rust",
    "go",
    "html",
    "css",
    "json",
    "sql",
    "markdown",
];

/// Emojis offered by the callout picker.
pub const CALLOUT_EMOJIS: &[&str] = &[
    "\u{1F4A1}",
    "\u{1F4CC}",
    "\u{26A0}\u{FE0F}",
    "\u{1F525}",
    "\u{2705}",
    "\u{2757}",
    "\u{1F4D6}",
    "\u{1F3AF}",
    "\u{1F4AC}",
    "\u{1F680}",
];

/// The "+" menu for inserting a block. `index` is the block the new one
/// should land below; `None` appends at the end of the page.
pub fn new_element_menu(ui: &mut Ui, index: Option<usize>) -> Option<BlockAction> {
    let mut action = None;

    let response = ui
        .menu_button("+", |ui| {
            for kind in BlockKind::menu_order() {
                if ui.button(kind.label()).clicked() {
                    action = Some(BlockAction::Insert { index, kind: *kind });
                    ui.close();
                }
            }
        })
        .response;
    if response.hovered() {
        response.on_hover_text("Insert element");
    }

    action
}

/// Move up/down and delete, shared by every toolbar.
pub fn common_controls(ui: &mut Ui, index: usize) -> Option<BlockAction> {
    let mut action = None;

    if ui.button("\u{2191}").on_hover_text("Move up").clicked() {
        action = Some(BlockAction::Move { index, offset: -1 });
    }
    if ui.button("\u{2193}").on_hover_text("Move down").clicked() {
        action = Some(BlockAction::Move { index, offset: 1 });
    }
    if ui.button("\u{1F5D1}").on_hover_text("Delete").clicked() {
        action = Some(BlockAction::Delete(index));
    }

    action
}

/// The shared controls on their own toolbar row, for kinds without extra
/// settings.
pub fn common_controls_row(ui: &mut Ui, index: usize) -> Option<BlockAction> {
    let mut action = None;
    ui.horizontal(|ui| {
        if let Some(a) = common_controls(ui, index) {
            action = Some(a);
        }
    });
    action
}

/// Toolbar for paragraph/heading blocks: kind switch, bold/italic/underline,
/// text and highlight colours. Returns the chosen action and whether the
/// block changed.
pub fn text_toolbar(ui: &mut Ui, block: &mut Block, index: usize) -> (Option<BlockAction>, bool) {
    let mut action = None;
    let mut changed = false;

    ui.horizontal(|ui| {
        // Kind switch between paragraph and heading levels
        let mut kind = block.kind;
        egui::ComboBox::from_id_salt(("text_kind", index))
            .selected_text(kind.label())
            .show_ui(ui, |ui| {
                for candidate in [
                    BlockKind::Paragraph,
                    BlockKind::Heading1,
                    BlockKind::Heading2,
                    BlockKind::Heading3,
                ] {
                    ui.selectable_value(&mut kind, candidate, candidate.label());
                }
            });
        if kind != block.kind {
            block.kind = kind;
            changed = true;
        }

        ui.separator();

        for (marker, label) in [("bold", "B"), ("italic", "I"), ("underline", "U")] {
            let active = style::has_marker(&block.styling, marker);
            let text = match marker {
                "bold" => RichText::new(label).strong(),
                "italic" => RichText::new(label).italics(),
                _ => RichText::new(label).underline(),
            };
            if ui.selectable_label(active, text).clicked() {
                block.styling = style::toggle_marker(&block.styling, marker);
                changed = true;
            }
        }

        ui.separator();

        // Text colour
        let mut color = style::get_value(&block.styling, "color")
            .and_then(hex_to_color)
            .unwrap_or(Color32::BLACK);
        if ui
            .color_edit_button_srgba(&mut color)
            .on_hover_text("Text colour")
            .changed()
        {
            block.styling = style::set_value(&block.styling, "color", &color_to_hex(color));
            changed = true;
        }

        // Highlight colour
        let mut highlight = style::get_value(&block.styling, "background-color")
            .and_then(hex_to_color)
            .unwrap_or(Color32::TRANSPARENT);
        if ui
            .color_edit_button_srgba(&mut highlight)
            .on_hover_text("Highlight")
            .changed()
        {
            block.styling =
                style::set_value(&block.styling, "background-color", &color_to_hex(highlight));
            changed = true;
        }

        ui.separator();
        if let Some(a) = common_controls(ui, index) {
            action = Some(a);
        }
    });

    (action, changed)
}

/// Toolbar for code blocks: language, theme, line numbers, wrapping.
pub fn code_toolbar(ui: &mut Ui, block: &mut Block, index: usize) -> (Option<BlockAction>, bool) {
    let mut action = None;
    let mut settings = CodeSettings::from_styling(&block.styling);
    let before = settings.clone();

    ui.horizontal(|ui| {
        egui::ComboBox::from_id_salt(("code_lang", index))
            .selected_text(settings.language.clone())
            .show_ui(ui, |ui| {
                for lang in CODE_LANGUAGES {
                    ui.selectable_value(&mut settings.language, lang.to_string(), *lang);
                }
            });

        egui::ComboBox::from_id_salt(("code_theme", index))
            .selected_text(settings.theme.label())
            .show_ui(ui, |ui| {
                for theme in CodeTheme::all() {
                    ui.selectable_value(&mut settings.theme, *theme, theme.label());
                }
            });

        ui.checkbox(&mut settings.show_line_numbers, "Line numbers");
        ui.checkbox(&mut settings.wrap_lines, "Wrap");

        ui.separator();
        if let Some(a) = common_controls(ui, index) {
            action = Some(a);
        }
    });

    let changed = settings != before;
    if changed {
        block.styling = settings.to_styling();
    }

    (action, changed)
}

/// Toolbar for a nested-page block: open, move, and the cascading delete.
pub fn nested_page_toolbar(
    ui: &mut Ui,
    index: usize,
    page_uuid: &str,
    page_name: &str,
) -> Option<BlockAction> {
    let mut action = None;

    ui.horizontal(|ui| {
        if ui.button("Open").clicked() {
            action = Some(BlockAction::OpenSubPage {
                page_uuid: page_uuid.to_string(),
                page_name: page_name.to_string(),
            });
        }

        ui.separator();

        if ui.button("\u{2191}").on_hover_text("Move up").clicked() {
            action = Some(BlockAction::Move { index, offset: -1 });
        }
        if ui.button("\u{2193}").on_hover_text("Move down").clicked() {
            action = Some(BlockAction::Move { index, offset: 1 });
        }

        // Deleting the block also deletes the child page it points at.
        if ui
            .button("\u{1F5D1}")
            .on_hover_text("Delete page and block")
            .clicked()
        {
            action = Some(BlockAction::DeleteSubPage {
                index,
                page_uuid: page_uuid.to_string(),
            });
        }
    });

    action
}

/// Parse `#RRGGBB` (or `#RRGGBBAA`) into a colour.
pub fn hex_to_color(hex: &str) -> Option<Color32> {
    let hex = hex.trim().strip_prefix('#')?;
    let parse = |range: std::ops::Range<usize>| u8::from_str_radix(hex.get(range)?, 16).ok();
    match hex.len() {
        6 => Some(Color32::from_rgb(parse(0..2)?, parse(2..4)?, parse(4..6)?)),
        8 => Some(Color32::from_rgba_unmultiplied(
            parse(0..2)?,
            parse(2..4)?,
            parse(4..6)?,
            parse(6..8)?,
        )),
        _ => None,
    }
}

/// Format a colour back into the persisted `#RRGGBB` / `#RRGGBBAA` form.
pub fn color_to_hex(color: Color32) -> String {
    if color.a() == 255 {
        format!("#{:02x}{:02x}{:02x}", color.r(), color.g(), color.b())
    } else {
        format!(
            "#{:02x}{:02x}{:02x}{:02x}",
            color.r(),
            color.g(),
            color.b(),
            color.a()
        )
    }
}

/// Label style for secondary toolbar text.
pub fn hint_text(text: &str) -> RichText {
    RichText::new(text)
        .font(FontId::proportional(12.0))
        .color(Color32::from_rgb(128, 128, 128))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_color_round_trip() {
        let color = Color32::from_rgb(0x12, 0xab, 0xff);
        assert_eq!(hex_to_color(&color_to_hex(color)), Some(color));
        assert_eq!(color_to_hex(color), "#12abff");
    }

    #[test]
    fn test_hex_color_rejects_garbage() {
        assert_eq!(hex_to_color("#12"), None);
        assert_eq!(hex_to_color("12abff"), None);
        assert_eq!(hex_to_color("#12abzz"), None);
    }
}
