//! Best-effort durability for the store's collections.
//!
//! The in-memory store is the source of truth for a running session;
//! persistence mirrors each collection as one JSON document and is never on
//! the critical path of a mutation. Save failures are logged and swallowed
//! by the store, load failures degrade to "absent" so the caller can seed.

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::model::{AppNotification, KbArticle, OutboxMessage, Ticket, User};

/// Shape-preserving collection storage. Implementations must round-trip
/// collections exactly (no schema translation); the core does no
/// normalization on load.
pub trait Persistence {
    fn load_users(&self) -> Option<Vec<User>>;
    fn load_tickets(&self) -> Option<Vec<Ticket>>;
    fn load_articles(&self) -> Option<Vec<KbArticle>>;
    fn load_outbox(&self) -> Option<Vec<OutboxMessage>>;
    fn load_notifications(&self) -> Option<Vec<AppNotification>>;

    fn save_users(&self, users: &[User]) -> Result<()>;
    fn save_tickets(&self, tickets: &[Ticket]) -> Result<()>;
    fn save_articles(&self, articles: &[KbArticle]) -> Result<()>;
    fn save_outbox(&self, outbox: &[OutboxMessage]) -> Result<()>;
    fn save_notifications(&self, notifications: &[AppNotification]) -> Result<()>;
}

/// No durability at all; every load is absent. Used by tests and demos.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPersistence;

impl Persistence for NoPersistence {
    fn load_users(&self) -> Option<Vec<User>> {
        None
    }
    fn load_tickets(&self) -> Option<Vec<Ticket>> {
        None
    }
    fn load_articles(&self) -> Option<Vec<KbArticle>> {
        None
    }
    fn load_outbox(&self) -> Option<Vec<OutboxMessage>> {
        None
    }
    fn load_notifications(&self) -> Option<Vec<AppNotification>> {
        None
    }

    fn save_users(&self, _: &[User]) -> Result<()> {
        Ok(())
    }
    fn save_tickets(&self, _: &[Ticket]) -> Result<()> {
        Ok(())
    }
    fn save_articles(&self, _: &[KbArticle]) -> Result<()> {
        Ok(())
    }
    fn save_outbox(&self, _: &[OutboxMessage]) -> Result<()> {
        Ok(())
    }
    fn save_notifications(&self, _: &[AppNotification]) -> Result<()> {
        Ok(())
    }
}

/// One JSON document per collection under a data directory.
#[derive(Debug, Clone)]
pub struct JsonDirStore {
    dir: PathBuf,
}

impl JsonDirStore {
    pub const USERS: &'static str = "users.json";
    pub const TICKETS: &'static str = "tickets.json";
    pub const ARTICLES: &'static str = "kb.json";
    pub const OUTBOX: &'static str = "outbox.json";
    pub const NOTIFICATIONS: &'static str = "notifications.json";

    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn load<T: DeserializeOwned>(&self, file: &str) -> Option<Vec<T>> {
        let path = self.dir.join(file);
        if !path.exists() {
            return None;
        }
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(err) => {
                warn!(path = %path.display(), %err, "failed to read collection, treating as absent");
                return None;
            }
        };
        match serde_json::from_str(&content) {
            Ok(collection) => Some(collection),
            Err(err) => {
                warn!(path = %path.display(), %err, "failed to parse collection, treating as absent");
                None
            }
        }
    }

    fn save<T: Serialize>(&self, file: &str, collection: &[T]) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create {}", self.dir.display()))?;
        let path = self.dir.join(file);
        let content = serde_json::to_string_pretty(collection)
            .with_context(|| format!("Failed to serialize {file}"))?;
        fs::write(&path, content).with_context(|| format!("Failed to write {}", path.display()))
    }
}

impl Persistence for JsonDirStore {
    fn load_users(&self) -> Option<Vec<User>> {
        self.load(Self::USERS)
    }
    fn load_tickets(&self) -> Option<Vec<Ticket>> {
        self.load(Self::TICKETS)
    }
    fn load_articles(&self) -> Option<Vec<KbArticle>> {
        self.load(Self::ARTICLES)
    }
    fn load_outbox(&self) -> Option<Vec<OutboxMessage>> {
        self.load(Self::OUTBOX)
    }
    fn load_notifications(&self) -> Option<Vec<AppNotification>> {
        self.load(Self::NOTIFICATIONS)
    }

    fn save_users(&self, users: &[User]) -> Result<()> {
        self.save(Self::USERS, users)
    }
    fn save_tickets(&self, tickets: &[Ticket]) -> Result<()> {
        self.save(Self::TICKETS, tickets)
    }
    fn save_articles(&self, articles: &[KbArticle]) -> Result<()> {
        self.save(Self::ARTICLES, articles)
    }
    fn save_outbox(&self, outbox: &[OutboxMessage]) -> Result<()> {
        self.save(Self::OUTBOX, outbox)
    }
    fn save_notifications(&self, notifications: &[AppNotification]) -> Result<()> {
        self.save(Self::NOTIFICATIONS, notifications)
    }
}
