//! Sidebar panel listing the user's pages.

use eframe::egui::{self, RichText};

use crate::app::OpaliteApp;

/// Row actions collected during the render pass.
enum SidebarAction {
    Select { uuid: String, name: String },
    Create,
    Delete(String),
    ToggleFavourite(String),
}

/// Sidebar with favourites and the root page list
pub struct SidebarPanel;

impl SidebarPanel {
    /// Show the sidebar panel
    pub fn show(ui: &mut egui::Ui, app: &mut OpaliteApp) {
        let mut action = None;

        ui.vertical(|ui| {
            // Header
            ui.horizontal(|ui| {
                ui.heading("Pages");
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("+").on_hover_text("New page").clicked() {
                        action = Some(SidebarAction::Create);
                    }
                });
            });

            ui.separator();

            egui::ScrollArea::vertical()
                .id_salt("sidebar_scroll")
                .show(ui, |ui| {
                    // Favourites section, only when at least one exists
                    let favourites: Vec<(String, String)> = app
                        .pages
                        .iter()
                        .filter(|p| p.is_favourite)
                        .map(|p| (p.uuid.clone(), p.name.clone()))
                        .collect();

                    if !favourites.is_empty() {
                        ui.label(RichText::new("Favourites").small().weak());
                        for (uuid, name) in favourites {
                            if let Some(a) = Self::show_row(ui, app, &uuid, &name, "\u{2B50}") {
                                action = Some(a);
                            }
                        }
                        ui.add_space(8.0);
                    }

                    ui.label(RichText::new("Private").small().weak());
                    let roots: Vec<(String, String)> = app
                        .pages
                        .iter()
                        .filter(|p| p.is_root)
                        .map(|p| (p.uuid.clone(), p.name.clone()))
                        .collect();

                    if roots.is_empty() {
                        ui.label("No pages yet");
                    }
                    for (uuid, name) in roots {
                        if let Some(a) = Self::show_row(ui, app, &uuid, &name, "\u{1F4DD}") {
                            action = Some(a);
                        }
                    }
                });
        });

        if let Some(action) = action {
            Self::apply(action, app);
        }
    }

    /// One selectable page row with its context menu.
    fn show_row(
        ui: &mut egui::Ui,
        app: &OpaliteApp,
        uuid: &str,
        name: &str,
        icon: &str,
    ) -> Option<SidebarAction> {
        let mut action = None;

        let display_name = if name.is_empty() { "Untitled" } else { name };
        let is_selected = app.selected_page.as_deref() == Some(uuid);
        let is_favourite = app
            .pages
            .iter()
            .find(|p| p.uuid == uuid)
            .map(|p| p.is_favourite)
            .unwrap_or(false);

        let response =
            ui.selectable_label(is_selected, format!("{icon} {display_name}"));
        if response.clicked() {
            action = Some(SidebarAction::Select {
                uuid: uuid.to_string(),
                name: name.to_string(),
            });
        }

        response.context_menu(|ui| {
            let favourite_label = if is_favourite { "Unfavourite" } else { "Favourite" };
            if ui.button(favourite_label).clicked() {
                action = Some(SidebarAction::ToggleFavourite(uuid.to_string()));
                ui.close();
            }
            if ui.button("Delete").clicked() {
                action = Some(SidebarAction::Delete(uuid.to_string()));
                ui.close();
            }
        });

        action
    }

    fn apply(action: SidebarAction, app: &mut OpaliteApp) {
        match action {
            SidebarAction::Select { uuid, name } => app.select_page(&uuid, &name),
            SidebarAction::Create => app.create_root_page(),
            SidebarAction::Delete(uuid) => app.delete_page(&uuid),
            SidebarAction::ToggleFavourite(uuid) => app.toggle_favourite(&uuid),
        }
    }
}
