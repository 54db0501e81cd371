//! chatvault - terminal client for a self-hosted chat-archive server
//!
//! Browse archived conversations, messages, media and users from the
//! command line or a full-screen TUI.

mod api;
mod config;
mod format;
mod models;
mod tui;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api::{ArchiveClient, MessageFilter};
use config::Config;
use format::{decode_html_entities, format_file_size, message_type_label, short_timestamp};
use models::{Message, MessageContent};

#[derive(Parser)]
#[command(name = "chatvault")]
#[command(about = "Terminal client for a self-hosted chat archive", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Backend base URL (overrides config file and CHATVAULT_BASE_URL)
    #[arg(long, global = true)]
    base_url: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// List conversations
    Conversations {
        /// Maximum number of conversations to show
        #[arg(short, long, default_value = "20")]
        limit: u32,

        /// Skip this many conversations
        #[arg(short, long, default_value = "0")]
        offset: u32,

        /// Include conversations flagged as ads
        #[arg(long)]
        include_ads: bool,
    },

    /// Read messages from a conversation
    Read {
        /// Conversation id (from `conversations` output)
        conversation_id: i64,

        /// Maximum number of messages to show
        #[arg(short, long, default_value = "50")]
        limit: u32,
    },

    /// Search messages across the archive
    Messages {
        #[arg(long)]
        conversation_id: Option<i64>,
        #[arg(long)]
        sender_id: Option<i64>,
        /// Only messages at or after this time (RFC 3339)
        #[arg(long)]
        since: Option<chrono::DateTime<chrono::Utc>>,
        /// Only messages before this time (RFC 3339)
        #[arg(long)]
        until: Option<chrono::DateTime<chrono::Utc>>,
        /// Content type code (0=media, 1=text, 2=mixed)
        #[arg(long)]
        content_type: Option<i64>,
        /// Only messages with (or without) resolved media
        #[arg(long)]
        has_media: Option<bool>,
        #[arg(short, long, default_value = "50")]
        limit: u32,
        #[arg(short, long, default_value = "0")]
        offset: u32,
    },

    /// Show one message by id
    Message { id: i64 },

    /// Print the direct file URL for a media id
    MediaUrl { media_id: i64 },

    /// Resolve media by its opaque cache identifier
    MediaResolve { cache_id: String },

    /// List users
    Users {
        /// Search term matched against names
        #[arg(short, long)]
        search: Option<String>,
        #[arg(short, long, default_value = "50")]
        limit: u32,
        #[arg(short, long, default_value = "0")]
        offset: u32,
    },

    /// Show one user by id
    User { id: i64 },

    /// Show the archive owner (current user)
    Whoami,

    /// Check backend health
    Health,

    /// Inspect or change server settings
    Settings {
        #[command(subcommand)]
        command: SettingsCommands,
    },

    /// Manage the ingestion SSH key
    SshKey {
        #[command(subcommand)]
        command: SshKeyCommands,
    },

    /// Show or edit the local client configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Launch the terminal user interface
    Tui,
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Print the effective configuration (after env/flag overrides)
    Show,
    /// Persist a new backend base URL to the config file
    SetUrl { url: String },
}

#[derive(Subcommand)]
enum SettingsCommands {
    /// Print current settings as JSON
    Show,
    /// Replace a single settings field (full-object PUT under the hood)
    Set { key: String, value: String },
    /// Initialize default settings server-side
    Init,
    /// Print raw settings rows, optionally one category
    Raw {
        #[arg(short, long)]
        category: Option<String>,
    },
}

#[derive(Subcommand)]
enum SshKeyCommands {
    /// Upload a private key file
    Upload { path: std::path::PathBuf },
    /// Show key metadata
    Info,
    /// Delete the stored key
    Delete,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let config = Config::load()?.with_overrides(cli.base_url);

    if let Commands::Tui = cli.command {
        return tui::run(config).await;
    }

    let client = ArchiveClient::new(config.base_url.clone());

    match cli.command {
        Commands::Conversations {
            limit,
            offset,
            include_ads,
        } => {
            let list = client
                .list_conversations(limit, offset, !include_ads)
                .await?;
            if list.conversations.is_empty() {
                println!("(no conversations)");
                return Ok(());
            }
            for conv in &list.conversations {
                let kind = if conv.is_group { "group" } else { "1:1" };
                println!("{:>6}  [{}] {}", conv.id, kind, conv.display_name());
                if let Some(count) = conv.message_count {
                    println!("        {} messages", count);
                }
            }
            if let Some(total) = list.total {
                println!("\n{} of {} conversations", list.conversations.len(), total);
            }
        }

        Commands::Read {
            conversation_id,
            limit,
        } => {
            let conv = client.get_conversation(conversation_id, true, limit).await?;
            println!("{}\n{:-<60}", conv.display_name(), "");
            for msg in conv.messages.as_deref().unwrap_or_default() {
                println!("{}", message_line(msg));
            }
        }

        Commands::Messages {
            conversation_id,
            sender_id,
            since,
            until,
            content_type,
            has_media,
            limit,
            offset,
        } => {
            let filter = MessageFilter {
                conversation_id,
                sender_id,
                since,
                until,
                content_type,
                has_media,
                limit: Some(limit),
                offset: Some(offset),
            };
            let list = client.list_messages(&filter).await?;
            for msg in &list.messages {
                println!("{}", message_line(msg));
            }
            if let Some(total) = list.total {
                println!("\n{} of {} messages", list.messages.len(), total);
            }
        }

        Commands::Message { id } => {
            let msg = client.get_message(id).await?;
            println!("id:           {}", msg.id);
            println!("conversation: {}", msg.conversation_id);
            println!(
                "sender:       {}",
                msg.sender.as_ref().map(|u| u.name()).unwrap_or("(unknown)")
            );
            println!("type:         {}", message_type_label(msg.content_type));
            if !msg.parsing_successful {
                println!("warning:      source record was not fully parsed");
            }
            println!("content:      {}", message_summary(&msg));
        }

        Commands::MediaUrl { media_id } => {
            println!("{}", client.media_file_url(media_id));
        }

        Commands::MediaResolve { cache_id } => {
            let asset = client.resolve_media_by_cache(&cache_id).await?;
            println!("id:       {}", asset.id);
            println!("name:     {}", asset.display_name());
            println!("mime:     {}", asset.mime_type.as_deref().unwrap_or("?"));
            if let Some(size) = asset.file_size {
                println!("size:     {}", format_file_size(size));
            }
            println!("url:      {}", client.media_file_url(asset.id));
        }

        Commands::Users {
            search,
            limit,
            offset,
        } => {
            let list = client.list_users(search.as_deref(), limit, offset).await?;
            for user in &list.users {
                println!(
                    "{:>6}  {}  {}",
                    user.id,
                    user.name(),
                    user.username.as_deref().unwrap_or("")
                );
            }
            if let Some(total) = list.total {
                println!("\n{} of {} users", list.users.len(), total);
            }
        }

        Commands::User { id } => {
            let user = client.get_user(id).await?;
            println!("id:       {}", user.id);
            println!("name:     {}", user.name());
            println!("username: {}", user.username.as_deref().unwrap_or("-"));
            println!("avatar:   {}", user.bitmoji_url.as_deref().unwrap_or("-"));
        }

        Commands::Whoami => {
            let user = client.current_user().await?;
            println!("{} (id {})", user.name(), user.id);
        }

        Commands::Health => {
            let health = client.health().await?;
            match health.version {
                Some(version) => println!("{} (version {})", health.status, version),
                None => println!("{}", health.status),
            }
        }

        Commands::Settings { command } => run_settings(&client, command).await?,

        Commands::SshKey { command } => run_ssh_key(&client, command).await?,

        Commands::Config { command } => match command {
            ConfigCommands::Show => print!("{}", toml::to_string_pretty(&config)?),
            ConfigCommands::SetUrl { url } => {
                // Persist to the stored file, not the override-patched view.
                let mut stored = Config::load()?;
                stored.base_url = url;
                stored.save()?;
                println!("base_url saved");
            }
        },

        Commands::Tui => unreachable!("handled above"),
    }

    Ok(())
}

async fn run_settings(client: &ArchiveClient, command: SettingsCommands) -> Result<()> {
    match command {
        SettingsCommands::Show => {
            let settings = client.get_settings().await?;
            println!("{}", serde_json::to_string_pretty(&settings)?);
        }
        SettingsCommands::Set { key, value } => {
            // Replacement is whole-object: fetch, patch one field, put back.
            let settings = client.get_settings().await?;
            let mut doc = serde_json::to_value(&settings)?;
            let parsed: serde_json::Value =
                serde_json::from_str(&value).unwrap_or(serde_json::Value::String(value));
            doc.as_object_mut()
                .context("settings are not a JSON object")?
                .insert(key.clone(), parsed);
            let updated = client.put_settings(&serde_json::from_value(doc)?).await?;
            println!("updated; {}", settings_diff_hint(&key, &updated));
        }
        SettingsCommands::Init => {
            client.initialize_settings().await?;
            println!("default settings initialized");
        }
        SettingsCommands::Raw { category } => {
            let raw = client.raw_settings(category.as_deref()).await?;
            println!("{}", serde_json::to_string_pretty(&raw)?);
        }
    }
    Ok(())
}

fn settings_diff_hint(key: &str, updated: &models::Settings) -> String {
    let doc = serde_json::to_value(updated).unwrap_or_default();
    match doc.get(key) {
        Some(value) => format!("{} = {}", key, value),
        None => format!("{} not echoed by server", key),
    }
}

async fn run_ssh_key(client: &ArchiveClient, command: SshKeyCommands) -> Result<()> {
    match command {
        SshKeyCommands::Upload { path } => {
            let bytes = std::fs::read(&path)
                .with_context(|| format!("Failed to read key file {}", path.display()))?;
            let filename = path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("id_key")
                .to_string();
            let info = client.upload_ssh_key(&filename, bytes).await?;
            println!(
                "uploaded {}",
                info.filename.as_deref().unwrap_or(&filename)
            );
            if let Some(fp) = info.fingerprint {
                println!("fingerprint: {}", fp);
            }
        }
        SshKeyCommands::Info => {
            let info = client.ssh_key_info().await?;
            if !info.exists {
                println!("no key uploaded");
                return Ok(());
            }
            println!("file:        {}", info.filename.as_deref().unwrap_or("?"));
            println!(
                "fingerprint: {}",
                info.fingerprint.as_deref().unwrap_or("?")
            );
            if let Some(at) = info.uploaded_at {
                println!("uploaded:    {}", short_timestamp(at));
            }
        }
        SshKeyCommands::Delete => {
            client.delete_ssh_key().await?;
            println!("key deleted");
        }
    }
    Ok(())
}

/// One-line rendering of a message for CLI output.
fn message_line(msg: &Message) -> String {
    let time = msg
        .created_at
        .map(short_timestamp)
        .unwrap_or_else(|| "--".to_string());
    let sender = msg.sender.as_ref().map(|u| u.name()).unwrap_or("?");
    let warn = if msg.parsing_successful { "" } else { " [!]" };
    format!("[{}] {}: {}{}", time, sender, message_summary(msg), warn)
}

/// Content summary shared by `read`, `messages` and `message`.
fn message_summary(msg: &Message) -> String {
    match msg.content() {
        MessageContent::Text(text) => decode_html_entities(text),
        MessageContent::Media(asset) => {
            let size = asset.file_size.map(format_file_size).unwrap_or_default();
            format!("[media: {} {}]", asset.display_name(), size)
        }
        MessageContent::Mixed { text, media } => {
            let mut parts = Vec::new();
            if let Some(text) = text {
                parts.push(decode_html_entities(text));
            }
            if let Some(asset) = media {
                parts.push(format!("[media: {}]", asset.display_name()));
            }
            if parts.is_empty() {
                "(content not available)".to_string()
            } else {
                parts.join(" ")
            }
        }
        MessageContent::CacheOnly(cache_id) => format!("(media pending: {})", cache_id),
        MessageContent::Unavailable => "(content not available)".to_string(),
    }
}
