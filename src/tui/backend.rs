//! Async backend: bridges the TUI event loop with the API client.
//!
//! Uses an mpsc channel pair. The TUI sends `BackendCommand` values, and a
//! background tokio task executes them and sends `BackendResponse` values
//! back. The client is built once and shared; commands run as independent
//! tasks with no ordering guarantees beyond the channel itself.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::api::{ApiError, ArchiveClient};
use crate::models::{Conversation, ConversationList, User};

/// Commands sent from the TUI event loop to the async backend.
pub enum BackendCommand {
    LoadConversations {
        limit: u32,
        exclude_ads: bool,
    },
    /// Fetch one conversation with its recent messages inlined.
    LoadConversation {
        conversation_id: i64,
        message_limit: u32,
    },
    LoadCurrentUser,
    /// One-shot reachability probe of a media file. The answer drives the
    /// element's loaded/errored render state; it is never retried.
    ProbeMedia {
        message_id: i64,
        media_id: i64,
    },
    /// One-shot reachability probe of an avatar image reference.
    /// `index` is the stacked-participant position; None means the
    /// single conversation avatar.
    ProbeAvatar {
        index: Option<usize>,
        url: String,
    },
}

/// Responses from the async backend to the TUI.
pub enum BackendResponse {
    Conversations(Result<ConversationList, ApiError>),
    Conversation(Result<Conversation, ApiError>),
    CurrentUser(Result<User, ApiError>),
    MediaProbe {
        message_id: i64,
        media_id: i64,
        ok: bool,
    },
    AvatarProbe {
        index: Option<usize>,
        ok: bool,
    },
}

/// Handle for interacting with the backend from the TUI side.
pub struct Backend {
    cmd_tx: mpsc::UnboundedSender<BackendCommand>,
    resp_rx: mpsc::UnboundedReceiver<BackendResponse>,
}

impl Backend {
    /// Start the backend with an already-constructed client.
    pub fn start(client: ArchiveClient) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let (resp_tx, resp_rx) = mpsc::unbounded_channel();

        tokio::spawn(backend_loop(Arc::new(client), cmd_rx, resp_tx));

        Self { cmd_tx, resp_rx }
    }

    /// Send a command to the backend (non-blocking).
    pub fn send(&self, cmd: BackendCommand) {
        if self.cmd_tx.send(cmd).is_err() {
            tracing::error!("Backend channel closed -- command dropped");
        }
    }

    /// Receive a response. Suspends until one is available; returns `None`
    /// only when the backend channel is permanently closed. Designed for
    /// use inside `tokio::select!`.
    pub async fn recv(&mut self) -> Option<BackendResponse> {
        self.resp_rx.recv().await
    }
}

/// Background loop that processes commands.
async fn backend_loop(
    client: Arc<ArchiveClient>,
    mut cmd_rx: mpsc::UnboundedReceiver<BackendCommand>,
    resp_tx: mpsc::UnboundedSender<BackendResponse>,
) {
    while let Some(cmd) = cmd_rx.recv().await {
        let client = Arc::clone(&client);
        let resp_tx = resp_tx.clone();

        // Each command runs as its own task so slow requests don't block
        // the loop.
        tokio::spawn(async move {
            match cmd {
                BackendCommand::LoadConversations { limit, exclude_ads } => {
                    let result = client.list_conversations(limit, 0, exclude_ads).await;
                    let _ = resp_tx.send(BackendResponse::Conversations(result));
                }
                BackendCommand::LoadConversation {
                    conversation_id,
                    message_limit,
                } => {
                    let result = client
                        .get_conversation(conversation_id, true, message_limit)
                        .await;
                    let _ = resp_tx.send(BackendResponse::Conversation(result));
                }
                BackendCommand::LoadCurrentUser => {
                    let result = client.current_user().await;
                    let _ = resp_tx.send(BackendResponse::CurrentUser(result));
                }
                BackendCommand::ProbeMedia {
                    message_id,
                    media_id,
                } => {
                    let url = client.media_file_url(media_id);
                    let ok = client.probe_url(&url).await.is_ok();
                    let _ = resp_tx.send(BackendResponse::MediaProbe {
                        message_id,
                        media_id,
                        ok,
                    });
                }
                BackendCommand::ProbeAvatar { index, url } => {
                    let ok = client.probe_url(&url).await.is_ok();
                    let _ = resp_tx.send(BackendResponse::AvatarProbe { index, ok });
                }
            }
        });
    }
}
