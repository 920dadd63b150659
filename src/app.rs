//! Main application state and UI coordination

use eframe::egui;

use crate::api::types::{PageDto, PageUpdateRequest, UserProfile};
use crate::api::worker::{ApiCommand, ApiEvent, ApiHandle};
use crate::core::config::AppConfig;
use crate::core::editor::PageEditor;
use crate::core::nav::Breadcrumbs;
use crate::core::page::{Block, BlockKind, Page};
use crate::ui::block_renderer::BlockUiState;
use crate::ui::{editor::PageEditorPanel, published::PublishedPanel, sidebar::SidebarPanel};

/// View mode for the main content area
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    Editor,
    Published,
}

/// Main application state
pub struct OpaliteApp {
    /// Application configuration
    pub config: AppConfig,
    /// Backend API worker
    pub api: ApiHandle,
    /// All pages of the current user, as listed in the sidebar
    pub pages: Vec<Page>,
    /// Uuid of the currently selected page
    pub selected_page: Option<String>,
    /// Editor state of the open page, absent while nothing is loaded
    pub editor: Option<PageEditor>,
    /// Navigation trail through nested pages
    pub breadcrumbs: Breadcrumbs,
    /// Whether a page fetch is in flight
    pub loading: bool,
    /// Edit mode vs read-only mode
    pub edit_mode: bool,
    /// Drag & drop reorder mode
    pub drag_mode: bool,
    /// Dark theme active
    pub dark_mode: bool,
    /// Current view mode
    pub view_mode: ViewMode,
    /// Whether sidebar is visible
    pub sidebar_visible: bool,
    /// Profile of the signed-in user
    pub user: UserProfile,
    /// Transient per-block UI state
    pub block_ui: BlockUiState,
    /// Last transient status message
    pub status: Option<String>,
    /// Session ended; show the goodbye screen
    pub signed_out: bool,
}

impl OpaliteApp {
    /// Create a new application instance
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        // Load config or use defaults
        let config = AppConfig::load().unwrap_or_default();
        let dark_mode = config.dark_mode();
        Self::apply_visuals(&cc.egui_ctx, dark_mode);

        let api = ApiHandle::spawn(
            config.backend_url.clone(),
            config.session_token.clone(),
            cc.egui_ctx.clone(),
        );
        api.send(ApiCommand::FetchPageList);
        api.send(ApiCommand::FetchUser);

        Self {
            config,
            api,
            pages: Vec::new(),
            selected_page: None,
            editor: None,
            breadcrumbs: Breadcrumbs::default(),
            loading: true,
            edit_mode: true,
            drag_mode: false,
            dark_mode,
            view_mode: ViewMode::Editor,
            sidebar_visible: true,
            user: UserProfile::default(),
            block_ui: BlockUiState::default(),
            status: None,
            signed_out: false,
        }
    }

    fn apply_visuals(ctx: &egui::Context, dark: bool) {
        ctx.set_visuals(if dark {
            egui::Visuals::dark()
        } else {
            egui::Visuals::light()
        });
    }

    /// Flip between light and dark theme and remember the choice.
    pub fn toggle_theme(&mut self, ctx: &egui::Context) {
        self.dark_mode = !self.dark_mode;
        self.config.set_dark_mode(self.dark_mode);
        if let Err(e) = self.config.save() {
            tracing::error!("Failed to save config: {}", e);
        }
        Self::apply_visuals(ctx, self.dark_mode);
    }

    /// Drain events from the API worker.
    fn process_api_events(&mut self) {
        while let Some(event) = self.api.poll() {
            match event {
                ApiEvent::PageList(dtos) => self.on_page_list(dtos),
                ApiEvent::PageFetched(response) => {
                    let page = Page::from(response.page);
                    let blocks = response.elements.into_iter().map(Block::from).collect();
                    self.on_page_fetched(page, blocks);
                }
                ApiEvent::User(profile) => self.user = profile,
                ApiEvent::LoggedOut => {
                    tracing::info!("Session ended");
                    self.signed_out = true;
                }
                ApiEvent::RequestFailed(what) => {
                    self.status = Some(format!("{what} failed"));
                }
            }
        }
    }

    fn on_page_list(&mut self, dtos: Vec<PageDto>) {
        self.pages = dtos.into_iter().map(Page::from).collect();

        // A user always has at least one page; an empty list means a fresh
        // account, so create the bootstrap page.
        if self.pages.is_empty() {
            let page = Page::new_root("Page 1");
            self.api
                .send(ApiCommand::CreatePage(Box::new(PageDto::from(&page))));
            self.pages.push(page);
        }

        if self.selected_page.is_none() {
            let first = self
                .pages
                .iter()
                .find(|p| p.is_root)
                .or_else(|| self.pages.first())
                .map(|p| (p.uuid.clone(), p.name.clone()));
            if let Some((uuid, name)) = first {
                self.select_page(&uuid, &name);
            }
        }
    }

    fn on_page_fetched(&mut self, page: Page, blocks: Vec<Block>) {
        // Stale responses for previously selected pages are dropped.
        if self.selected_page.as_deref() != Some(page.uuid.as_str()) {
            return;
        }

        // Keep the sidebar entry in sync with the fetched metadata
        if let Some(entry) = self.pages.iter_mut().find(|p| p.uuid == page.uuid) {
            *entry = page.clone();
        }

        let uuid = page.uuid.clone();
        let title = page.name.clone();
        let is_root = page.is_root;

        self.editor = Some(PageEditor::new(page, blocks));
        self.loading = false;

        // Root pages restart the trail; nested pages keep it and pick up
        // the real title once it arrives.
        let on_trail = self
            .breadcrumbs
            .current()
            .map(|c| c.page_uuid == uuid)
            .unwrap_or(false);
        if is_root || !on_trail {
            self.breadcrumbs.reset(&uuid, &title);
        } else {
            self.breadcrumbs.set_current_name(&title);
        }
    }

    /// Select a page from the sidebar, restarting the breadcrumb trail.
    pub fn select_page(&mut self, uuid: &str, name: &str) {
        self.selected_page = Some(uuid.to_string());
        self.editor = None;
        self.loading = true;
        self.block_ui = BlockUiState::default();
        self.view_mode = ViewMode::Editor;
        self.breadcrumbs.reset(uuid, name);
        self.api.send(ApiCommand::FetchPage(uuid.to_string()));
    }

    /// Navigate along the breadcrumb trail or into a nested page.
    pub fn navigate_to(&mut self, uuid: &str, name: &str) {
        self.breadcrumbs.navigate(uuid, name);
        if self.selected_page.as_deref() == Some(uuid) {
            return;
        }
        self.selected_page = Some(uuid.to_string());
        self.editor = None;
        self.loading = true;
        self.block_ui = BlockUiState::default();
        self.api.send(ApiCommand::FetchPage(uuid.to_string()));
    }

    /// Save the open page: metadata, the full element order, and only the
    /// elements that changed since the last save.
    pub fn save_current(&mut self) {
        let Some(editor) = self.editor.as_mut() else {
            return;
        };
        let request = PageUpdateRequest::from_editor(editor);
        let uuid = editor.page_uuid.clone();
        let name = editor.title.clone();
        let is_favourite = editor.is_favourite;
        let public_page = editor.public_page;
        let positions = editor.element_positions();

        if let Some(entry) = self.pages.iter_mut().find(|p| p.uuid == uuid) {
            entry.name = name;
            entry.is_favourite = is_favourite;
            entry.public_page = public_page;
            entry.element_positions = positions;
        }

        self.api.send(ApiCommand::SavePage(Box::new(request)));
        self.status = Some("Saved".to_string());
    }

    /// Toggle the published state; publishing opens the live rendering.
    pub fn publish_current(&mut self) {
        if !self.user.is_premium() {
            return;
        }
        let Some(editor) = self.editor.as_mut() else {
            return;
        };
        editor.public_page = !editor.public_page;
        let now_public = editor.public_page;
        let uuid = editor.page_uuid.clone();
        self.save_current();

        if now_public {
            let url = format!(
                "{}/live/{}",
                self.config.site_url.trim_end_matches('/'),
                uuid
            );
            self.open_external(&url);
        }
    }

    /// Favourite/unfavourite a page from the sidebar without loading it.
    pub fn toggle_favourite(&mut self, uuid: &str) {
        if self
            .editor
            .as_ref()
            .map(|e| e.page_uuid == uuid)
            .unwrap_or(false)
        {
            if let Some(editor) = self.editor.as_mut() {
                editor.is_favourite = !editor.is_favourite;
            }
            self.save_current();
            return;
        }

        let request = match self.pages.iter_mut().find(|p| p.uuid == uuid) {
            Some(page) => {
                page.is_favourite = !page.is_favourite;
                Some(PageUpdateRequest::metadata_only(page))
            }
            None => None,
        };
        if let Some(request) = request {
            self.api.send(ApiCommand::SavePage(Box::new(request)));
        }
    }

    /// Create a new top-level page and open it.
    pub fn create_root_page(&mut self) {
        let page = Page::new_root("Untitled");
        self.api
            .send(ApiCommand::CreatePage(Box::new(PageDto::from(&page))));
        self.pages.insert(0, page.clone());
        self.select_page(&page.uuid, &page.name);
    }

    /// Create a child page under the open page for a nested-page block.
    fn create_child_page(&mut self) -> Option<Page> {
        let parent = self.selected_page.clone()?;
        let child = Page::new_child(&parent);
        self.api
            .send(ApiCommand::CreatePage(Box::new(PageDto::from(&child))));
        self.pages.insert(0, child.clone());
        Some(child)
    }

    /// Insert a new block below `index` (`None` appends at the end).
    pub fn insert_block(&mut self, index: Option<usize>, kind: BlockKind) {
        let block = if kind == BlockKind::NestedPage {
            match self.create_child_page() {
                Some(child) => Block::nested_page(&child),
                None => return,
            }
        } else {
            Block::new(kind)
        };

        let Some(editor) = self.editor.as_mut() else {
            return;
        };
        match index {
            Some(i) => editor.insert_after(i, block),
            None => editor.append(block),
        };

        // A new nested page persists the parent immediately so neither side
        // can dangle.
        if kind == BlockKind::NestedPage {
            self.save_current();
        }
    }

    /// Delete the block at `index`.
    pub fn delete_block(&mut self, index: usize) {
        let removed = self.editor.as_mut().and_then(|e| e.remove(index));
        if let Some(block) = removed {
            self.block_ui.forget(&block.uuid);
        }
    }

    /// Delete a nested-page block together with its child page.
    pub fn delete_sub_page(&mut self, index: usize, page_uuid: &str) {
        self.delete_block(index);
        self.api.send(ApiCommand::DeletePage(page_uuid.to_string()));
        self.pages.retain(|p| p.uuid != page_uuid);
        // the parent loses an element; persist right away
        self.save_current();
    }

    /// Delete a page from the sidebar; the backend cascades to children.
    pub fn delete_page(&mut self, uuid: &str) {
        self.api.send(ApiCommand::DeletePage(uuid.to_string()));
        self.pages.retain(|p| p.uuid != uuid);

        if self.selected_page.as_deref() == Some(uuid) {
            self.selected_page = None;
            self.editor = None;
            let next = self
                .pages
                .iter()
                .find(|p| p.is_root)
                .or_else(|| self.pages.first())
                .map(|p| (p.uuid.clone(), p.name.clone()));
            match next {
                Some((next_uuid, next_name)) => self.select_page(&next_uuid, &next_name),
                None => self.loading = false,
            }
        }
    }

    /// End the backend session.
    pub fn sign_out(&mut self) {
        self.api.send(ApiCommand::Logout);
    }

    /// Open a URL in the system browser.
    pub fn open_external(&mut self, url: &str) {
        if let Err(e) = open::that(url) {
            tracing::error!("Failed to open {}: {}", url, e);
        }
    }

    /// Render the top menu bar
    fn render_menu_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Save").clicked() {
                        self.save_current();
                        ui.close();
                    }
                    if ui.button("Sign Out").clicked() {
                        self.sign_out();
                        ui.close();
                    }
                    ui.separator();
                    if ui.button("Exit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });

                ui.menu_button("View", |ui| {
                    if ui.button("Toggle Sidebar").clicked() {
                        self.sidebar_visible = !self.sidebar_visible;
                        ui.close();
                    }
                    if ui.button("Toggle Dark Mode").clicked() {
                        self.toggle_theme(ctx);
                        ui.close();
                    }
                    ui.separator();
                    if ui
                        .selectable_label(self.view_mode == ViewMode::Editor, "Editor")
                        .clicked()
                    {
                        self.view_mode = ViewMode::Editor;
                        ui.close();
                    }
                    if ui
                        .selectable_label(
                            self.view_mode == ViewMode::Published,
                            "Published Preview",
                        )
                        .clicked()
                    {
                        self.view_mode = ViewMode::Published;
                        ui.close();
                    }
                });

                ui.menu_button("Account", |ui| {
                    let email = if self.user.email.is_empty() {
                        "Signed in"
                    } else {
                        &self.user.email
                    };
                    ui.label(email);
                    ui.label(format!("Plan: {}", self.user.status));
                    ui.separator();
                    if ui.button("Refresh Profile").clicked() {
                        self.api.send(ApiCommand::FetchUser);
                        ui.close();
                    }
                });

                if let Some(status) = self.status.clone() {
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.label(egui::RichText::new(status).weak());
                    });
                }
            });
        });
    }

    fn show_goodbye(ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(140.0);
                ui.heading("Signed out");
                ui.label("Restart Opalite to sign in again.");
            });
        });
    }
}

impl eframe::App for OpaliteApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_api_events();

        if self.signed_out {
            Self::show_goodbye(ctx);
            return;
        }

        // Handle keyboard shortcuts
        let (save, toggle_sidebar, toggle_edit) = ctx.input(|i| {
            (
                i.modifiers.ctrl && i.key_pressed(egui::Key::S),
                i.modifiers.ctrl && i.key_pressed(egui::Key::B),
                i.modifiers.ctrl && i.key_pressed(egui::Key::E),
            )
        });
        if save && self.edit_mode {
            self.save_current();
        }
        if toggle_sidebar {
            self.sidebar_visible = !self.sidebar_visible;
        }
        if toggle_edit {
            self.edit_mode = !self.edit_mode;
            if !self.edit_mode {
                self.drag_mode = false;
            }
        }

        // Render menu bar
        self.render_menu_bar(ctx);

        // Render sidebar with the page list
        if self.sidebar_visible {
            egui::SidePanel::left("sidebar")
                .resizable(true)
                .default_width(self.config.ui.sidebar_width)
                .min_width(160.0)
                .show(ctx, |ui| {
                    SidebarPanel::show(ui, self);
                });
        }

        // Render main content area
        egui::CentralPanel::default().show(ctx, |ui| match self.view_mode {
            ViewMode::Editor => {
                PageEditorPanel::show(ui, self);
            }
            ViewMode::Published => {
                PublishedPanel::show(ui, self);
            }
        });
    }
}
