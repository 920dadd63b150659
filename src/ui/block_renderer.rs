//! Per-kind rendering of content blocks in the page editor.
//!
//! Each renderer draws one block, mutates its content/styling in place, and
//! reports structural requests (insert, delete, move, navigation) as a
//! [`BlockAction`] that the editor panel applies after the block loop.

use std::collections::{BTreeMap, HashMap};
use std::sync::OnceLock;

use eframe::egui::{self, Color32, CornerRadius, FontId, Margin, RichText, TextEdit, Ui};
use regex_lite::Regex;

use super::{analytics, toolbar};
use crate::app::OpaliteApp;
use crate::core::page::{Block, BlockKind, CodeSettings, CodeTheme};
use crate::core::style;

/// Structural request raised by block interaction.
#[derive(Debug, Clone)]
pub enum BlockAction {
    /// Insert a new block below `index`; `None` appends at the end.
    Insert {
        index: Option<usize>,
        kind: BlockKind,
    },
    /// Delete the block at this index.
    Delete(usize),
    /// Move a block by an offset (no-op at the array bounds).
    Move { index: usize, offset: isize },
    /// Drag/drop reorder.
    Reorder { from: usize, to: usize },
    /// Navigate into a nested page.
    OpenSubPage {
        page_uuid: String,
        page_name: String,
    },
    /// Delete a nested-page block together with its child page.
    DeleteSubPage { index: usize, page_uuid: String },
    /// Open an external URL in the browser.
    OpenUrl(String),
}

/// Result of rendering one block.
#[derive(Debug, Default)]
pub struct BlockOutcome {
    pub action: Option<BlockAction>,
    /// Whether content or styling changed and the block must be marked dirty.
    pub changed: bool,
}

/// Pending URL entry for an embed block.
#[derive(Debug, Clone, Default)]
pub struct EmbedDraft {
    pub url: String,
    pub invalid: bool,
}

/// Transient per-block UI state that does not belong in the document model.
#[derive(Debug, Default)]
pub struct BlockUiState {
    /// Element uuid owning the toolbar.
    pub focused: Option<String>,
    /// Element uuid with an open emoji picker.
    pub emoji_picker: Option<String>,
    /// In-progress URL entries keyed by element uuid.
    pub embed_drafts: HashMap<String, EmbedDraft>,
}

impl BlockUiState {
    pub fn is_focused(&self, uuid: &str) -> bool {
        self.focused.as_deref() == Some(uuid)
    }

    pub fn focus(&mut self, uuid: &str) {
        if self.focused.as_deref() != Some(uuid) {
            self.focused = Some(uuid.to_string());
            self.emoji_picker = None;
        }
    }

    /// Drop state attached to an element that no longer exists.
    pub fn forget(&mut self, uuid: &str) {
        if self.focused.as_deref() == Some(uuid) {
            self.focused = None;
        }
        if self.emoji_picker.as_deref() == Some(uuid) {
            self.emoji_picker = None;
        }
        self.embed_drafts.remove(uuid);
    }
}

/// Accepts `http(s)` URLs with a host part; everything else shows the
/// inline error instead of being applied.
pub fn is_valid_embed_url(url: &str) -> bool {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"^https?://[^\s/$.?#]+\.[^\s]+$").ok());
    match re {
        Some(re) => re.is_match(url.trim()),
        None => false,
    }
}

/// Render one block and collect its outcome.
pub fn render_block(
    ui: &mut Ui,
    app: &mut OpaliteApp,
    block: &mut Block,
    index: usize,
    views: &BTreeMap<String, u64>,
) -> BlockOutcome {
    let mut outcome = BlockOutcome::default();

    ui.push_id(("block", block.uuid.clone()), |ui| {
        let show_toolbar =
            app.edit_mode && !app.drag_mode && app.block_ui.is_focused(&block.uuid);

        match block.kind {
            kind if kind.is_text() => {
                if show_toolbar {
                    let (action, changed) = toolbar::text_toolbar(ui, block, index);
                    outcome.action = action;
                    outcome.changed |= changed;
                }
                render_text(ui, app, block, index, &mut outcome);
            }
            BlockKind::Checkbox => {
                if show_toolbar {
                    if let Some(action) = toolbar::common_controls_row(ui, index) {
                        outcome.action = Some(action);
                    }
                }
                render_checkbox(ui, app, block, &mut outcome);
            }
            BlockKind::Callout => {
                if show_toolbar {
                    if let Some(action) = toolbar::common_controls_row(ui, index) {
                        outcome.action = Some(action);
                    }
                }
                render_callout(ui, app, block, &mut outcome);
            }
            BlockKind::CodeBlock => {
                if show_toolbar {
                    let (action, changed) = toolbar::code_toolbar(ui, block, index);
                    outcome.action = action;
                    outcome.changed |= changed;
                }
                render_code(ui, app, block, &mut outcome);
            }
            BlockKind::Embed => {
                if show_toolbar {
                    if let Some(action) = toolbar::common_controls_row(ui, index) {
                        outcome.action = Some(action);
                    }
                }
                render_embed(ui, app, block, &mut outcome);
            }
            BlockKind::NestedPage => {
                render_nested_page(ui, app, block, index, show_toolbar, &mut outcome);
            }
            BlockKind::Analytics => {
                if show_toolbar {
                    if let Some(action) = toolbar::common_controls_row(ui, index) {
                        outcome.action = Some(action);
                    }
                }
                let premium = app.user.is_premium();
                analytics::render_analytics(ui, views, premium, index);
                focus_on_click(ui, app, block);
            }
            _ => {}
        }
    });

    outcome
}

/// Make the area drawn so far in this block focusable by click.
fn focus_on_click(ui: &mut Ui, app: &mut OpaliteApp, block: &Block) {
    let response = ui
        .interact(
            ui.min_rect(),
            ui.id().with("focus"),
            egui::Sense::click(),
        );
    if response.clicked() {
        app.block_ui.focus(&block.uuid);
    }
}

fn render_text(
    ui: &mut Ui,
    app: &mut OpaliteApp,
    block: &mut Block,
    index: usize,
    outcome: &mut BlockOutcome,
) {
    let font_size = match block.kind {
        BlockKind::Heading1 => 32.0,
        BlockKind::Heading2 => 26.0,
        BlockKind::Heading3 => 21.0,
        _ => app.config.editor.font_size,
    };

    // Dark mode overrides the stored colour the same way the published
    // rendering does, otherwise light text disappears on light pages.
    let text_color = if app.dark_mode {
        Color32::WHITE
    } else {
        style::get_value(&block.styling, "color")
            .and_then(toolbar::hex_to_color)
            .unwrap_or(Color32::BLACK)
    };

    let highlight = style::get_value(&block.styling, "background-color")
        .and_then(toolbar::hex_to_color)
        .unwrap_or(Color32::TRANSPARENT);

    let frame = egui::Frame::new()
        .fill(highlight)
        .inner_margin(Margin::symmetric(4, 2))
        .corner_radius(CornerRadius::same(2));

    frame.show(ui, |ui| {
        let editable = app.edit_mode && !app.drag_mode;
        let response = ui.add(
            TextEdit::multiline(&mut block.content)
                .font(FontId::proportional(font_size))
                .text_color(text_color)
                .desired_width(f32::INFINITY)
                .desired_rows(1)
                .frame(false)
                .hint_text("Type something\u{2026}")
                .interactive(editable),
        );

        if response.changed() {
            outcome.changed = true;
        }
        if block.wants_autofocus() {
            response.request_focus();
        }
        if response.has_focus() {
            app.block_ui.focus(&block.uuid);
            if block.clear_autofocus() {
                outcome.changed = true;
            }
        }
        if response.clicked() {
            app.block_ui.focus(&block.uuid);
        }

        // Empty text blocks are dropped when they lose focus.
        if editable && response.lost_focus() && block.content.is_empty() {
            outcome.action = Some(BlockAction::Delete(index));
        }
    });
}

fn render_checkbox(
    ui: &mut Ui,
    app: &mut OpaliteApp,
    block: &mut Block,
    outcome: &mut BlockOutcome,
) {
    let editable = app.edit_mode && !app.drag_mode;

    ui.horizontal(|ui| {
        let mut checked = block.is_checked();
        if ui
            .add_enabled(editable, egui::Checkbox::without_text(&mut checked))
            .changed()
        {
            block.set_checked(checked);
            outcome.changed = true;
        }

        let response = ui.add(
            TextEdit::singleline(&mut block.content)
                .font(FontId::proportional(app.config.editor.font_size))
                .desired_width(f32::INFINITY)
                .frame(false)
                .hint_text("To-do")
                .interactive(editable),
        );
        if response.changed() {
            outcome.changed = true;
        }
        if response.has_focus() || response.clicked() {
            app.block_ui.focus(&block.uuid);
        }
    });
}

fn render_callout(
    ui: &mut Ui,
    app: &mut OpaliteApp,
    block: &mut Block,
    outcome: &mut BlockOutcome,
) {
    let editable = app.edit_mode && !app.drag_mode;
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

                let emoji_clicked = ui
                    .add_enabled(editable, egui::Button::new(emoji).frame(false))
                    .on_hover_text("Change emoji")
                    .clicked();
                if emoji_clicked {
                    app.block_ui.focus(&block.uuid);
                    app.block_ui.emoji_picker = match app.block_ui.emoji_picker.as_deref() {
                        Some(open) if open == block.uuid => None,
                        _ => Some(block.uuid.clone()),
                    };
                }

                let response = ui.add(
                    TextEdit::multiline(&mut block.content)
                        .font(FontId::proportional(app.config.editor.font_size))
                        .desired_width(f32::INFINITY)
                        .desired_rows(1)
                        .frame(false)
                        .hint_text("Callout")
                        .interactive(editable),
                );
                if response.changed() {
                    outcome.changed = true;
                }
                if response.has_focus() || response.clicked() {
                    app.block_ui.focus(&block.uuid);
                }
            });

            if app.block_ui.emoji_picker.as_deref() == Some(block.uuid.as_str()) {
                ui.horizontal_wrapped(|ui| {
                    for emoji in toolbar::CALLOUT_EMOJIS {
                        if ui.button(*emoji).clicked() {
                            block.styling = emoji.to_string();
                            outcome.changed = true;
                            app.block_ui.emoji_picker = None;
                        }
                    }
                });
            }
        });
}

fn code_background(theme: CodeTheme) -> Color32 {
    match theme {
        CodeTheme::Github => Color32::from_rgb(0xf5, 0xf5, 0xf5),
        CodeTheme::Dracula => Color32::from_rgb(0x28, 0x2a, 0x36),
        CodeTheme::TomorrowNightBlue => Color32::from_rgb(0x00, 0x24, 0x51),
        CodeTheme::Chaos => Color32::from_rgb(0x16, 0x16, 0x16),
    }
}

fn render_code(ui: &mut Ui, app: &mut OpaliteApp, block: &mut Block, outcome: &mut BlockOutcome) {
    let editable = app.edit_mode && !app.drag_mode;
    let settings = CodeSettings::from_styling(&block.styling);
    let font_size = app.config.editor.code_font_size;

    egui::Frame::new()
        .fill(code_background(settings.theme))
        .inner_margin(Margin::same(10))
        .corner_radius(CornerRadius::same(4))
        .show(ui, |ui| {
            let highlight_theme =
                egui_extras::syntax_highlighting::CodeTheme::from_memory(ui.ctx(), ui.style());
            let language = settings.language.clone();
            let mut layouter = |ui: &Ui, buf: &dyn egui::TextBuffer, wrap_width: f32| {
                let mut job = egui_extras::syntax_highlighting::highlight(
                    ui.ctx(),
                    ui.style(),
                    &highlight_theme,
                    buf.as_str(),
                    &language,
                );
                if settings.wrap_lines {
                    job.wrap.max_width = wrap_width;
                }
                ui.fonts(|f| f.layout_job(job))
            };

            ui.horizontal_top(|ui| {
                if settings.show_line_numbers {
                    let lines = block.content.lines().count().max(1);
                    let gutter: String = (1..=lines)
                        .map(|n| format!("{n}\n"))
                        .collect();
                    ui.label(
                        RichText::new(gutter.trim_end())
                            .font(FontId::monospace(font_size))
                            .color(Color32::from_rgb(128, 128, 128)),
                    );
                }

                let response = ui.add(
                    TextEdit::multiline(&mut block.content)
                        .font(FontId::monospace(font_size))
                        .desired_width(f32::INFINITY)
                        .desired_rows(1)
                        .frame(false)
                        .code_editor()
                        .layouter(&mut layouter)
                        .interactive(editable),
                );
                if response.changed() {
                    outcome.changed = true;
                }
                if response.has_focus() || response.clicked() {
                    app.block_ui.focus(&block.uuid);
                }
            });
        });
}

fn render_embed(ui: &mut Ui, app: &mut OpaliteApp, block: &mut Block, outcome: &mut BlockOutcome) {
    let editable = app.edit_mode && !app.drag_mode;
    let uuid = block.uuid.clone();
    let editing = editable
        && (block.content.is_empty() || app.block_ui.embed_drafts.contains_key(&uuid));

    if !editing && block.content.is_empty() {
        ui.label(RichText::new("\u{1F310} Empty web embed").weak());
        return;
    }

    if editing {
        // Work on a copy of the draft so the URL field, the focus bookkeeping
        // and the apply handling don't fight over the state map.
        let mut draft = app
            .block_ui
            .embed_drafts
            .get(&uuid)
            .cloned()
            .unwrap_or_else(|| EmbedDraft {
                url: block.content.clone(),
                invalid: false,
            });
        let mut applied = false;
        let mut focus_me = false;

        ui.horizontal(|ui| {
            ui.label("\u{1F310}");
            let response = ui.add(
                TextEdit::singleline(&mut draft.url)
                    .desired_width(360.0)
                    .hint_text("https://\u{2026}"),
            );
            if response.has_focus() || response.clicked() {
                focus_me = true;
            }

            let apply = ui.button("Apply").clicked()
                || (response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)));
            if apply {
                let url = draft.url.trim().to_string();
                if url.is_empty() || is_valid_embed_url(&url) {
                    block.content = url;
                    outcome.changed = true;
                    applied = true;
                } else {
                    draft.invalid = true;
                }
            }
        });

        if draft.invalid {
            ui.label(
                RichText::new("Enter a valid http(s) URL")
                    .color(Color32::from_rgb(0xff, 0x52, 0x52)),
            );
        }

        if focus_me {
            app.block_ui.focus(&uuid);
        }
        if applied {
            app.block_ui.embed_drafts.remove(&uuid);
        } else {
            app.block_ui.embed_drafts.insert(uuid.clone(), draft);
        }
        return;
    }

    // Applied state: a link card standing in for the embedded page
    egui::Frame::new()
        .fill(ui.visuals().faint_bg_color)
        .stroke(egui::Stroke::new(1.0, ui.visuals().weak_text_color()))
        .inner_margin(Margin::same(10))
        .corner_radius(CornerRadius::same(4))
        .show(ui, |ui| {
            ui.horizontal(|ui| {
                ui.label("\u{1F310}");
                if ui.link(&block.content).clicked() {
                    outcome.action = Some(BlockAction::OpenUrl(block.content.clone()));
                }
                ui.label(toolbar::hint_text("web embed"));
                if editable && ui.small_button("Edit").clicked() {
                    app.block_ui.focus(&uuid);
                    app.block_ui.embed_drafts.insert(
                        uuid.clone(),
                        EmbedDraft {
                            url: block.content.clone(),
                            invalid: false,
                        },
                    );
                }
            });
        });

    focus_on_click(ui, app, block);
}

fn render_nested_page(
    ui: &mut Ui,
    app: &mut OpaliteApp,
    block: &mut Block,
    index: usize,
    show_toolbar: bool,
    outcome: &mut BlockOutcome,
) {
    let child_uuid = block.nested_page_uuid().unwrap_or_default().to_string();
    // Prefer the live page list; the block content is only a snapshot of
    // the child name at creation time.
    let child_name = app
        .pages
        .iter()
        .find(|p| p.uuid == child_uuid)
        .map(|p| p.name.clone())
        .unwrap_or_else(|| block.content.clone());

    if show_toolbar {
        if let Some(action) = toolbar::nested_page_toolbar(ui, index, &child_uuid, &child_name) {
            outcome.action = Some(action);
        }
    }

    let response = ui
        .selectable_label(
            false,
            RichText::new(format!("\u{1F4C4} {child_name}"))
                .font(FontId::proportional(app.config.editor.font_size))
                .underline(),
        )
        .on_hover_text("Double-click to open");

    if response.double_clicked() {
        outcome.action = Some(BlockAction::OpenSubPage {
            page_uuid: child_uuid,
            page_name: child_name,
        });
    } else if response.clicked() {
        app.block_ui.focus(&block.uuid);
    }
}
