//! Сессия CLI в JSON-файле.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use blog_client::Session;
use blog_client::session::parse_token;

#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Битый или неполный файл означает, что сессии нет.
    pub fn load(&self) -> Result<Option<Session>> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                return Err(err)
                    .with_context(|| format!("не удалось прочитать {}", self.path.display()));
            }
        };
        Ok(parse_session(&raw))
    }

    pub fn save(&self, session: &Session) -> Result<()> {
        let json = serde_json::to_string_pretty(session).context("не удалось сериализовать сессию")?;
        fs::write(&self.path, json)
            .with_context(|| format!("не удалось сохранить {}", self.path.display()))
    }

    pub fn clear(&self) -> Result<bool> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(true),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(err) => {
                Err(err).with_context(|| format!("не удалось удалить {}", self.path.display()))
            }
        }
    }
}

fn parse_session(raw: &str) -> Option<Session> {
    match serde_json::from_str::<Session>(raw) {
        Ok(session) => {
            let token = parse_token(&session.token)?;
            Some(Session::new(token, session.user))
        }
        Err(err) => {
            tracing::warn!(error = %err, "ignoring malformed session file");
            None
        }
    }
}
