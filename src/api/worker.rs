//! Background bridge between the UI thread and the async API client.
//!
//! A dedicated thread owns a tokio runtime; each command is spawned as an
//! independent task. Mutating calls are fire-and-forget: there is no
//! ordering guarantee across concurrent edits, no retry, and the last write
//! wins. Responses that the UI needs flow back over a channel drained once
//! per frame.

use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread;

use super::client::ApiClient;
use super::types::{PageDto, PageGetResponse, PageUpdateRequest, UserProfile};

/// Requests from the UI thread.
#[derive(Debug)]
pub enum ApiCommand {
    FetchPageList,
    FetchPage(String),
    CreatePage(Box<PageDto>),
    SavePage(Box<PageUpdateRequest>),
    DeletePage(String),
    FetchUser,
    Logout,
}

impl ApiCommand {
    fn describe(&self) -> &'static str {
        match self {
            ApiCommand::FetchPageList => "page list fetch",
            ApiCommand::FetchPage(_) => "page fetch",
            ApiCommand::CreatePage(_) => "page create",
            ApiCommand::SavePage(_) => "page save",
            ApiCommand::DeletePage(_) => "page delete",
            ApiCommand::FetchUser => "profile fetch",
            ApiCommand::Logout => "sign out",
        }
    }
}

/// Responses delivered back to the UI thread.
#[derive(Debug)]
pub enum ApiEvent {
    PageList(Vec<PageDto>),
    PageFetched(Box<PageGetResponse>),
    User(UserProfile),
    LoggedOut,
    RequestFailed(&'static str),
}

/// UI-side handle to the worker.
pub struct ApiHandle {
    commands: Sender<ApiCommand>,
    events: Receiver<ApiEvent>,
}

impl ApiHandle {
    /// Spawn the worker thread. Failures to build the runtime or client are
    /// logged; the handle stays usable and commands are dropped.
    pub fn spawn(base_url: String, session_token: String, ctx: egui::Context) -> Self {
        let (command_tx, command_rx) = mpsc::channel::<ApiCommand>();
        let (event_tx, event_rx) = mpsc::channel::<ApiEvent>();

        let spawned = thread::Builder::new()
            .name("api-worker".to_string())
            .spawn(move || worker_loop(&base_url, &session_token, command_rx, event_tx, ctx));
        if let Err(e) = spawned {
            tracing::error!("Failed to spawn API worker: {}", e);
        }

        Self {
            commands: command_tx,
            events: event_rx,
        }
    }

    /// Queue a command; failures only mean the worker is gone.
    pub fn send(&self, command: ApiCommand) {
        if let Err(e) = self.commands.send(command) {
            tracing::error!("API worker unavailable: {}", e);
        }
    }

    /// Drain one pending event, if any.
    pub fn poll(&self) -> Option<ApiEvent> {
        match self.events.try_recv() {
            Ok(event) => Some(event),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }
}

fn worker_loop(
    base_url: &str,
    session_token: &str,
    commands: Receiver<ApiCommand>,
    events: Sender<ApiEvent>,
    ctx: egui::Context,
) {
    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            tracing::error!("Failed to build API runtime: {}", e);
            return;
        }
    };

    let client = match ApiClient::new(base_url, session_token) {
        Ok(client) => client,
        Err(e) => {
            tracing::error!("Failed to build API client: {}", e);
            return;
        }
    };

    while let Ok(command) = commands.recv() {
        let client = client.clone();
        let events = events.clone();
        let ctx = ctx.clone();

        runtime.spawn(async move {
            let what = command.describe();
            match run_command(command, &client).await {
                Ok(Some(event)) => {
                    let _ = events.send(event);
                    ctx.request_repaint();
                }
                Ok(None) => {}
                Err(e) => {
                    // Inherited error model: log and move on, no retry.
                    tracing::error!("{} failed: {}", what, e);
                    let _ = events.send(ApiEvent::RequestFailed(what));
                    ctx.request_repaint();
                }
            }
        });
    }
}

async fn run_command(
    command: ApiCommand,
    client: &ApiClient,
) -> Result<Option<ApiEvent>, super::client::ApiError> {
    match command {
        ApiCommand::FetchPageList => Ok(Some(ApiEvent::PageList(client.page_list().await?))),
        ApiCommand::FetchPage(uuid) => Ok(Some(ApiEvent::PageFetched(Box::new(
            client.page_get(&uuid).await?,
        )))),
        ApiCommand::CreatePage(page) => {
            client.page_create(&page).await?;
            tracing::info!("Created page {}", page.page_uuid);
            Ok(None)
        }
        ApiCommand::SavePage(request) => {
            client.page_update(&request).await?;
            tracing::info!("Saved page {}", request.page.page_uuid);
            Ok(None)
        }
        ApiCommand::DeletePage(uuid) => {
            client.page_delete(&uuid).await?;
            tracing::info!("Deleted page {}", uuid);
            Ok(None)
        }
        ApiCommand::FetchUser => Ok(Some(ApiEvent::User(client.user_get().await?))),
        ApiCommand::Logout => {
            client.user_logout().await?;
            Ok(Some(ApiEvent::LoggedOut))
        }
    }
}
