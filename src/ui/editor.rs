//! Page editor panel: header, title, and the block list.

use eframe::egui::{self, FontId, Margin, RichText, TextEdit};

use super::block_renderer::{self, BlockAction};
use super::toolbar;
use crate::app::OpaliteApp;
use crate::core::nav::Segment;

/// Effects raised from the page header.
#[derive(Default)]
struct HeaderOutcome {
    save: bool,
    publish: bool,
    navigate: Option<(String, String)>,
    sign_out: bool,
}

/// Page editor panel
pub struct PageEditorPanel;

impl PageEditorPanel {
    /// Show the page editor panel
    pub fn show(ui: &mut egui::Ui, app: &mut OpaliteApp) {
        if app.loading {
            ui.vertical_centered(|ui| {
                ui.add_space(120.0);
                ui.spinner();
                ui.label("Loading page\u{2026}");
            });
            return;
        }

        let Some(mut editor) = app.editor.take() else {
            Self::show_welcome(ui);
            return;
        };

        let mut action: Option<BlockAction> = None;
        let header = Self::show_header(ui, app, &mut editor);
        ui.separator();

        egui::ScrollArea::vertical()
            .id_salt("page_scroll")
            .show(ui, |ui| {
                ui.vertical_centered(|ui| {
                    ui.set_max_width(760.0);

                    // Page title
                    let title_response = ui.add(
                        TextEdit::singleline(&mut editor.title)
                            .font(FontId::proportional(40.0))
                            .hint_text("Untitled")
                            .desired_width(f32::INFINITY)
                            .frame(false)
                            .interactive(app.edit_mode),
                    );
                    if title_response.changed() {
                        app.breadcrumbs.set_current_name(&editor.title);
                    }
                    ui.add_space(8.0);

                    // Top insert menu appends at the end of the page
                    if app.edit_mode && !app.drag_mode {
                        if let Some(a) = toolbar::new_element_menu(ui, None) {
                            action = Some(a);
                        }
                    }

                    let views = editor.date_view_count.clone();

                    for index in 0..editor.len() {
                        let uuid = match editor.block(index) {
                            Some(block) => block.uuid.clone(),
                            None => break,
                        };

                        if app.edit_mode && app.drag_mode {
                            // Every row is both a drag source (the handle)
                            // and a drop target for other rows.
                            let frame = egui::Frame::new().inner_margin(Margin::same(2));
                            let (_, payload) = ui.dnd_drop_zone::<usize, ()>(frame, |ui| {
                                ui.horizontal(|ui| {
                                    ui.dnd_drag_source(
                                        egui::Id::new(("drag_block", uuid.as_str())),
                                        index,
                                        |ui| {
                                            ui.label(
                                                RichText::new("\u{2630}")
                                                    .color(ui.visuals().weak_text_color()),
                                            );
                                        },
                                    );
                                    ui.vertical(|ui| {
                                        if let Some(block) = editor.block_mut(index) {
                                            let outcome = block_renderer::render_block(
                                                ui, app, block, index, &views,
                                            );
                                            if outcome.changed {
                                                editor.mark_dirty_at(index);
                                            }
                                        }
                                    });
                                });
                            });
                            if let Some(from) = payload {
                                if *from != index {
                                    action = Some(BlockAction::Reorder {
                                        from: *from,
                                        to: index,
                                    });
                                }
                            }
                        } else {
                            if let Some(block) = editor.block_mut(index) {
                                let outcome =
                                    block_renderer::render_block(ui, app, block, index, &views);
                                if outcome.changed {
                                    editor.mark_dirty_at(index);
                                }
                                if outcome.action.is_some() {
                                    action = outcome.action;
                                }
                            }

                            if app.edit_mode {
                                if let Some(a) = toolbar::new_element_menu(ui, Some(index)) {
                                    action = Some(a);
                                }
                            }
                        }
                    }

                    if editor.is_empty() && app.edit_mode {
                        ui.add_space(16.0);
                        ui.label(
                            RichText::new("This page is empty. Add an element with +").weak(),
                        );
                    }

                    ui.add_space(60.0);
                });
            });

        app.editor = Some(editor);

        // Header effects and block actions run after the editor is back in
        // place, since several of them save or refetch the page.
        if header.save {
            app.save_current();
        }
        if header.publish {
            app.publish_current();
        }
        if let Some(a) = action {
            Self::apply(a, app);
        }
        if let Some((uuid, name)) = header.navigate {
            app.navigate_to(&uuid, &name);
        }
        if header.sign_out {
            app.sign_out();
        }
    }

    fn show_header(
        ui: &mut egui::Ui,
        app: &mut OpaliteApp,
        editor: &mut crate::core::editor::PageEditor,
    ) -> HeaderOutcome {
        let mut outcome = HeaderOutcome::default();

        ui.horizontal(|ui| {
            // Breadcrumb trail, condensed past three entries
            let segments = app.breadcrumbs.condensed();
            let crumbs: Vec<_> = app.breadcrumbs.entries().to_vec();
            for (i, segment) in segments.iter().enumerate() {
                match segment {
                    Segment::Ellipsis => {
                        ui.label("\u{2026}");
                    }
                    Segment::Crumb(pos) => {
                        if let Some(crumb) = crumbs.get(*pos) {
                            let name = if crumb.page_name.is_empty() {
                                "Untitled"
                            } else {
                                &crumb.page_name
                            };
                            if ui.link(name).clicked() {
                                outcome.navigate =
                                    Some((crumb.page_uuid.clone(), crumb.page_name.clone()));
                            }
                        }
                    }
                }
                if i + 1 < segments.len() {
                    ui.label("/");
                }
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("Sign Out").clicked() {
                    outcome.sign_out = true;
                }

                if app.edit_mode {
                    if ui.button("\u{1F4BE} Save").clicked() {
                        outcome.save = true;
                    }
                } else {
                    let premium = app.user.is_premium();
                    let label = if editor.public_page { "Unpublish" } else { "Publish" };
                    let response = ui.add_enabled(premium, egui::Button::new(label));
                    if premium {
                        if response.clicked() {
                            outcome.publish = true;
                        }
                    } else {
                        response.on_hover_text("Upgrade to unlock publishing");
                    }
                }

                // Edit / read-only switch
                let edit_label = if app.edit_mode { "\u{270F} Editing" } else { "\u{1F441} Reading" };
                if ui.selectable_label(app.edit_mode, edit_label).clicked() {
                    app.edit_mode = !app.edit_mode;
                    if !app.edit_mode {
                        // reordering only makes sense while editing
                        app.drag_mode = false;
                    }
                }

                // Theme switch
                let theme_icon = if app.dark_mode { "\u{2600}" } else { "\u{1F319}" };
                if ui.button(theme_icon).on_hover_text("Toggle theme").clicked() {
                    app.toggle_theme(ui.ctx());
                }

                // Favourite star
                let star = if editor.is_favourite { "\u{2B50}" } else { "\u{2606}" };
                if ui.button(star).on_hover_text("Favourite").clicked() {
                    editor.is_favourite = !editor.is_favourite;
                    outcome.save = true;
                }

                // Drag & drop mode
                if app.edit_mode {
                    if ui
                        .selectable_label(app.drag_mode, "\u{2725}")
                        .on_hover_text("Drag & drop")
                        .clicked()
                    {
                        app.drag_mode = !app.drag_mode;
                    }
                }
            });
        });

        outcome
    }

    fn apply(action: BlockAction, app: &mut OpaliteApp) {
        match action {
            BlockAction::Insert { index, kind } => app.insert_block(index, kind),
            BlockAction::Delete(index) => app.delete_block(index),
            BlockAction::Move { index, offset } => {
                if let Some(editor) = app.editor.as_mut() {
                    editor.move_by(index, offset);
                }
            }
            BlockAction::Reorder { from, to } => {
                if let Some(editor) = app.editor.as_mut() {
                    editor.reorder(from, to);
                }
            }
            BlockAction::OpenSubPage {
                page_uuid,
                page_name,
            } => app.navigate_to(&page_uuid, &page_name),
            BlockAction::DeleteSubPage { index, page_uuid } => {
                app.delete_sub_page(index, &page_uuid);
            }
            BlockAction::OpenUrl(url) => app.open_external(&url),
        }
    }

    /// Show welcome screen when no page is open
    fn show_welcome(ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| {
            ui.add_space(100.0);

            ui.heading("Welcome to Opalite");
            ui.add_space(20.0);

            ui.label("Select a page in the sidebar or create a new one to get started.");
            ui.add_space(10.0);

            ui.label("Keyboard shortcuts:");
            ui.label("  Ctrl+S - Save");
            ui.label("  Ctrl+E - Toggle edit mode");
            ui.label("  Ctrl+B - Toggle sidebar");
        });
    }
}
