//! TUI application state and main event loop

use anyhow::Result;
use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind};
use futures::StreamExt;
use ratatui::DefaultTerminal;

use super::avatar::AvatarState;
use super::backend::{Backend, BackendCommand, BackendResponse};
use super::messages::{group_messages, MediaProbe, MessagesState};
use super::sidebar::SidebarState;
use super::ui;
use crate::api::ArchiveClient;
use crate::config::Config;
use crate::models::{Conversation, User};
use crate::tui::avatar::MAX_STACKED;

/// Active pane in the TUI
#[derive(Default, Clone, Copy, PartialEq, Eq)]
pub enum Pane {
    #[default]
    Sidebar,
    Messages,
}

impl Pane {
    pub fn as_str(&self) -> &'static str {
        match self {
            Pane::Sidebar => "conversations",
            Pane::Messages => "messages",
        }
    }

    fn next(self) -> Self {
        match self {
            Pane::Sidebar => Pane::Messages,
            Pane::Messages => Pane::Sidebar,
        }
    }
}

/// Application state
pub struct App {
    pub should_exit: bool,
    pub active_pane: Pane,
    pub show_help: bool,
    pub sidebar: SidebarState,
    pub messages: MessagesState,
    /// Conversation currently open in the messages pane.
    pub conversation: Option<Conversation>,
    /// Image state of the conversation-header avatar badge(s).
    pub avatar_state: AvatarState,
    pub current_user: Option<User>,
    pub is_online: bool,
    pub status_message: Option<String>,
    pub status_is_error: bool,
    page_size: u32,
    exclude_ads: bool,
    /// Used only for pure URL building; requests go through the backend task.
    client: ArchiveClient,
}

impl App {
    fn new(config: &Config, client: ArchiveClient) -> Self {
        Self {
            should_exit: false,
            active_pane: Pane::default(),
            show_help: false,
            sidebar: SidebarState::default(),
            messages: MessagesState::default(),
            conversation: None,
            avatar_state: AvatarState::new(),
            current_user: None,
            is_online: false,
            status_message: None,
            status_is_error: false,
            page_size: config.page_size,
            exclude_ads: config.exclude_ads,
            client,
        }
    }

    fn handle_event(&mut self, event: Event, backend: &Backend) {
        if let Event::Key(key) = event {
            if key.kind == KeyEventKind::Press {
                self.handle_key(key, backend);
            }
        }
    }

    fn handle_key(&mut self, key: KeyEvent, backend: &Backend) {
        if self.show_help {
            // Any key dismisses the help popup.
            self.show_help = false;
            return;
        }

        match key.code {
            KeyCode::Char('q') => self.should_exit = true,
            KeyCode::Esc => self.should_exit = true,
            KeyCode::Char('?') => self.show_help = true,
            KeyCode::Tab => self.active_pane = self.active_pane.next(),
            KeyCode::Char('r') => self.refresh(backend),
            KeyCode::Up | KeyCode::Char('k') => match self.active_pane {
                Pane::Sidebar => self.sidebar.select_previous(),
                Pane::Messages => self.messages.select_previous(),
            },
            KeyCode::Down | KeyCode::Char('j') => match self.active_pane {
                Pane::Sidebar => self.sidebar.select_next(),
                Pane::Messages => self.messages.select_next(),
            },
            KeyCode::Enter => {
                if self.active_pane == Pane::Sidebar {
                    self.open_selected_conversation(backend);
                }
            }
            KeyCode::Char('o') => self.show_media_url("view"),
            KeyCode::Char('s') => self.show_media_url("download"),
            _ => {}
        }
    }

    fn refresh(&mut self, backend: &Backend) {
        self.sidebar.loading = true;
        backend.send(BackendCommand::LoadConversations {
            limit: self.page_size,
            exclude_ads: self.exclude_ads,
        });
        if let Some(conv) = &self.conversation {
            self.messages.loading = true;
            backend.send(BackendCommand::LoadConversation {
                conversation_id: conv.id,
                message_limit: self.page_size,
            });
        }
    }

    fn open_selected_conversation(&mut self, backend: &Backend) {
        if let Some(entry) = self.sidebar.selected_entry() {
            self.messages.loading = true;
            backend.send(BackendCommand::LoadConversation {
                conversation_id: entry.id,
                message_limit: self.page_size,
            });
            self.active_pane = Pane::Messages;
        }
    }

    fn handle_response(&mut self, resp: BackendResponse, backend: &Backend) {
        match resp {
            BackendResponse::Conversations(Ok(list)) => {
                self.is_online = true;
                self.status_message = None;
                self.sidebar.update(&list.conversations);
            }
            BackendResponse::Conversations(Err(e)) => {
                self.sidebar.loading = false;
                self.report_error(e);
            }
            BackendResponse::Conversation(Ok(conv)) => {
                self.is_online = true;
                self.status_message = None;
                let messages = conv.messages.clone().unwrap_or_default();
                let current_id = self.current_user.as_ref().map(|u| u.id);
                self.messages
                    .update(conv.display_name(), group_messages(messages, current_id));

                // Fresh conversation: fresh avatar state, fresh probes.
                self.avatar_state = AvatarState::new();
                self.send_avatar_probes(&conv, backend);
                for (message_id, media_id) in self.messages.pending_probes() {
                    backend.send(BackendCommand::ProbeMedia {
                        message_id,
                        media_id,
                    });
                }
                self.conversation = Some(conv);
            }
            BackendResponse::Conversation(Err(e)) => {
                self.messages.loading = false;
                self.report_error(e);
            }
            BackendResponse::CurrentUser(Ok(user)) => {
                self.current_user = Some(user);
            }
            BackendResponse::CurrentUser(Err(e)) => self.report_error(e),
            BackendResponse::MediaProbe {
                message_id,
                media_id,
                ok,
            } => {
                let probe = if ok {
                    MediaProbe::Loaded
                } else {
                    MediaProbe::Errored
                };
                self.messages.set_media_probe(message_id, media_id, probe);
            }
            BackendResponse::AvatarProbe { index, ok } => {
                if !ok {
                    match index {
                        Some(i) => self.avatar_state.mark_participant_error(i),
                        None => self.avatar_state.mark_image_error(),
                    }
                }
            }
        }
    }

    /// Probe the avatar references shown in the conversation header.
    fn send_avatar_probes(&self, conv: &Conversation, backend: &Backend) {
        if conv.is_group {
            for (index, participant) in conv.participants.iter().take(MAX_STACKED).enumerate() {
                if let Some(url) = &participant.bitmoji_url {
                    backend.send(BackendCommand::ProbeAvatar {
                        index: Some(index),
                        url: url.clone(),
                    });
                }
            }
        } else if let Some(url) = conv
            .participants
            .first()
            .and_then(|p| p.bitmoji_url.as_ref())
        {
            backend.send(BackendCommand::ProbeAvatar {
                index: None,
                url: url.clone(),
            });
        }
    }

    /// Surface the selected group's media file URL in the status bar.
    /// Terminals can't open or save the file themselves; the URL is the
    /// handoff to whatever the user pastes it into.
    fn show_media_url(&mut self, action: &str) {
        if self.active_pane != Pane::Messages {
            return;
        }
        self.status_is_error = false;
        self.status_message = Some(match self.messages.selected_media() {
            Some(media_id) => format!("{}: {}", action, self.client.media_file_url(media_id)),
            None => "no media in selected group".to_string(),
        });
    }

    fn report_error(&mut self, e: crate::api::ApiError) {
        // Status 0 means we never reached the backend at all.
        self.is_online = e.status != 0;
        self.status_message = Some(e.to_string());
        self.status_is_error = true;
    }
}

/// Run the TUI application with terminal restore on exit.
pub async fn run(config: Config) -> Result<()> {
    let client = ArchiveClient::new(config.base_url.clone());
    let mut terminal = ratatui::init();
    let result = run_app(&mut terminal, client, &config).await;
    ratatui::restore();
    result
}

async fn run_app(
    terminal: &mut DefaultTerminal,
    client: ArchiveClient,
    config: &Config,
) -> Result<()> {
    let mut backend = Backend::start(client.clone());
    let mut app = App::new(config, client);

    backend.send(BackendCommand::LoadConversations {
        limit: config.page_size,
        exclude_ads: config.exclude_ads,
    });
    backend.send(BackendCommand::LoadCurrentUser);

    let mut events = EventStream::new();

    while !app.should_exit {
        terminal.draw(|frame| ui::render(frame, &app))?;

        tokio::select! {
            maybe_event = events.next() => {
                match maybe_event {
                    Some(Ok(event)) => app.handle_event(event, &backend),
                    Some(Err(e)) => return Err(e.into()),
                    None => break,
                }
            }
            maybe_resp = backend.recv() => {
                match maybe_resp {
                    Some(resp) => app.handle_response(resp, &backend),
                    None => break,
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiError;
    use crate::models::{FileKind, MediaAsset, Message};

    fn test_app() -> (App, Backend) {
        let client = ArchiveClient::new("http://vault:9000");
        let backend = Backend::start(client.clone());
        (App::new(&Config::default(), client), backend)
    }

    fn media_message() -> Message {
        Message {
            id: 1,
            conversation_id: 1,
            sender: None,
            created_at: None,
            content_type: 0,
            text: None,
            media: Some(MediaAsset {
                id: 9,
                file_type: FileKind::Image,
                mime_type: Some("image/png".to_string()),
                original_filename: Some("pic.png".to_string()),
                file_size: None,
            }),
            cache_id: None,
            parsing_successful: true,
        }
    }

    #[tokio::test]
    async fn test_list_error_clears_sidebar_loading() {
        let (mut app, backend) = test_app();
        app.sidebar.loading = true;
        app.handle_response(
            BackendResponse::Conversations(Err(ApiError::transport("connection refused"))),
            &backend,
        );
        assert!(!app.sidebar.loading);
        assert!(app.status_is_error);
        assert!(!app.is_online);
    }

    #[tokio::test]
    async fn test_media_keys_surface_file_url() {
        let (mut app, backend) = test_app();
        app.messages.update(
            "pics".to_string(),
            group_messages(vec![media_message()], None),
        );
        app.active_pane = Pane::Messages;

        app.handle_key(KeyEvent::from(KeyCode::Char('o')), &backend);
        let status = app.status_message.clone().unwrap();
        assert!(status.contains("http://vault:9000/api/media/9/file"));
        assert!(!app.status_is_error);

        app.handle_key(KeyEvent::from(KeyCode::Char('s')), &backend);
        assert!(app.status_message.unwrap().starts_with("download:"));
    }

    #[tokio::test]
    async fn test_media_keys_ignored_outside_messages_pane() {
        let (mut app, backend) = test_app();
        app.active_pane = Pane::Sidebar;
        app.handle_key(KeyEvent::from(KeyCode::Char('o')), &backend);
        assert!(app.status_message.is_none());
    }
}
