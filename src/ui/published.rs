//! Read-only rendering of a published page.
//!
//! This is the in-app preview of what visitors see at
//! `{site_url}/live/{uuid}`: no toolbars, no insert menus, no mutation.

use eframe::egui::{self, Color32, CornerRadius, FontId, Margin, RichText};

use super::{analytics, block_renderer::BlockAction, toolbar};
use crate::app::OpaliteApp;
use crate::core::page::{Block, BlockKind, CodeSettings, CodeTheme};
use crate::core::style;

/// Published page panel
pub struct PublishedPanel;

impl PublishedPanel {
    /// Show the published read-only view of the open page
    pub fn show(ui: &mut egui::Ui, app: &mut OpaliteApp) {
        let Some(editor) = app.editor.take() else {
            ui.vertical_centered(|ui| {
                ui.add_space(100.0);
                ui.label("No page selected");
            });
            return;
        };

        let mut action: Option<BlockAction> = None;

        ui.horizontal(|ui| {
            ui.label(RichText::new("Published preview").weak());
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if editor.public_page && ui.button("Open in browser").clicked() {
                    let url = format!(
                        "{}/live/{}",
                        app.config.site_url.trim_end_matches('/'),
                        editor.page_uuid
                    );
                    action = Some(BlockAction::OpenUrl(url));
                }
            });
        });
        ui.separator();

        if !editor.public_page {
            ui.vertical_centered(|ui| {
                ui.add_space(100.0);
                ui.heading("\u{1F512} This page is not published");
                ui.label("Switch to reading mode and publish it to share a read-only copy.");
            });
            app.editor = Some(editor);
            return;
        }

        egui::ScrollArea::vertical()
            .id_salt("published_scroll")
            .show(ui, |ui| {
                ui.vertical_centered(|ui| {
                    ui.set_max_width(760.0);

                    let title = if editor.title.is_empty() {
                        "Untitled"
                    } else {
                        &editor.title
                    };
                    ui.label(RichText::new(title).font(FontId::proportional(40.0)).strong());
                    ui.add_space(12.0);

                    for (index, block) in editor.blocks().iter().enumerate() {
                        ui.push_id(("published", index), |ui| {
                            if let Some(a) = Self::render_published_block(
                                ui,
                                app,
                                block,
                                index,
                                &editor.date_view_count,
                            ) {
                                action = Some(a);
                            }
                        });
                        ui.add_space(6.0);
                    }

                    ui.add_space(60.0);
                });
            });

        app.editor = Some(editor);

        match action {
            Some(BlockAction::OpenUrl(url)) => app.open_external(&url),
            Some(BlockAction::OpenSubPage {
                page_uuid,
                page_name,
            }) => app.navigate_to(&page_uuid, &page_name),
            _ => {}
        }
    }

    fn render_published_block(
        ui: &mut egui::Ui,
        app: &OpaliteApp,
        block: &Block,
        index: usize,
        views: &std::collections::BTreeMap<String, u64>,
    ) -> Option<BlockAction> {
        let mut action = None;

        match block.kind {
            kind if kind.is_text() => Self::render_text(ui, app, block),
            BlockKind::Checkbox => {
                ui.horizontal(|ui| {
                    let mut checked = block.is_checked();
                    // display only; visitors cannot toggle
                    ui.add_enabled(false, egui::Checkbox::without_text(&mut checked));
                    ui.label(&block.content);
                });
            }
            BlockKind::Callout => {
                let fill = if app.dark_mode {
                    Color32::from_rgb(45, 45, 48)
                } else {
                    Color32::from_rgb(241, 241, 239)
                };
                egui::Frame::new()
                    .fill(fill)
                    .inner_margin(Margin::same(10))
                    .corner_radius(CornerRadius::same(4))
                    .show(ui, |ui| {
                        ui.horizontal(|ui| {
                            let emoji = if block.styling.is_empty() {
                                crate::core::page::DEFAULT_CALLOUT_EMOJI
                            } else {
                                block.styling.as_str()
                            };
                            ui.label(emoji);
                            ui.label(&block.content);
                        });
                    });
            }
            BlockKind::CodeBlock => {
                let settings = CodeSettings::from_styling(&block.styling);
                let fill = match settings.theme {
                    CodeTheme::Github => Color32::from_rgb(0xf5, 0xf5, 0xf5),
                    CodeTheme::Dracula => Color32::from_rgb(0x28, 0x2a, 0x36),
                    CodeTheme::TomorrowNightBlue => Color32::from_rgb(0x00, 0x24, 0x51),
                    CodeTheme::Chaos => Color32::from_rgb(0x16, 0x16, 0x16),
                };
                egui::Frame::new()
                    .fill(fill)
                    .inner_margin(Margin::same(10))
                    .corner_radius(CornerRadius::same(4))
                    .show(ui, |ui| {
                        let theme = egui_extras::syntax_highlighting::CodeTheme::from_memory(
                            ui.ctx(),
                            ui.style(),
                        );
                        egui_extras::syntax_highlighting::code_view_ui(
                            ui,
                            &theme,
                            &block.content,
                            &settings.language,
                        );
                    });
            }
            BlockKind::Embed => {
                if !block.content.is_empty() {
                    ui.horizontal(|ui| {
                        ui.label("\u{1F310}");
                        if ui.link(&block.content).clicked() {
                            action = Some(BlockAction::OpenUrl(block.content.clone()));
                        }
                    });
                }
            }
            BlockKind::NestedPage => {
                let child_uuid = block.nested_page_uuid().unwrap_or_default().to_string();
                let child_name = app
                    .pages
                    .iter()
                    .find(|p| p.uuid == child_uuid)
                    .map(|p| p.name.clone())
                    .unwrap_or_else(|| block.content.clone());
                let response = ui.link(format!("\u{1F4C4} {child_name}"));
                if response.clicked() {
                    action = Some(BlockAction::OpenSubPage {
                        page_uuid: child_uuid,
                        page_name: child_name,
                    });
                }
            }
            BlockKind::Analytics => {
                analytics::render_analytics(ui, views, true, index);
            }
            _ => {}
        }

        action
    }

    /// Text block with the stored styling applied through rich text.
    fn render_text(ui: &mut egui::Ui, app: &OpaliteApp, block: &Block) {
        let font_size = match block.kind {
            BlockKind::Heading1 => 32.0,
            BlockKind::Heading2 => 26.0,
            BlockKind::Heading3 => 21.0,
            _ => app.config.editor.font_size,
        };

        let color = if app.dark_mode {
            Color32::WHITE
        } else {
            style::get_value(&block.styling, "color")
                .and_then(toolbar::hex_to_color)
                .unwrap_or(Color32::BLACK)
        };

        let mut text = RichText::new(&block.content)
            .font(FontId::proportional(font_size))
            .color(color);
        if style::has_marker(&block.styling, "bold") {
            text = text.strong();
        }
        if style::has_marker(&block.styling, "italic") {
            text = text.italics();
        }
        if style::has_marker(&block.styling, "underline") {
            text = text.underline();
        }
        if let Some(background) =
            style::get_value(&block.styling, "background-color").and_then(toolbar::hex_to_color)
        {
            text = text.background_color(background);
        }

        ui.with_layout(egui::Layout::top_down(egui::Align::Min), |ui| {
            ui.label(text);
        });
    }
}
