//! Сессия пользователя и её восстановление из постоянного хранилища.

use serde::{Deserialize, Serialize};

use crate::models::{AuthResponse, User};

/// Ключ токена в постоянном хранилище браузера.
pub const TOKEN_KEY: &str = "token";
/// Ключ пользователя в постоянном хранилище браузера.
pub const USER_KEY: &str = "user";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Авторизованный пользователь и его bearer-токен.
pub struct Session {
    /// Bearer-токен.
    pub token: String,
    /// Пользователь.
    pub user: User,
}

impl Session {
    /// Создаёт сессию.
    pub fn new(token: impl Into<String>, user: User) -> Self {
        Self {
            token: token.into(),
            user,
        }
    }

    /// Восстанавливает сессию из сохранённых строк.
    ///
    /// Сессия считается валидной только если есть и токен, и пользователь.
    pub fn restore(token_raw: Option<&str>, user_raw: Option<&str>) -> Option<Self> {
        let token = parse_token(token_raw?)?;
        let user = parse_user(user_raw?)?;
        Some(Self { token, user })
    }

    /// Пользователь в виде JSON для хранилища.
    pub fn user_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.user)
    }
}

impl From<AuthResponse> for Session {
    fn from(value: AuthResponse) -> Self {
        Self::new(value.token, value.user)
    }
}

/// Токен без пробелов по краям; пустой токен не считается токеном.
pub fn parse_token(raw: &str) -> Option<String> {
    let token = raw.trim();
    if token.is_empty() {
        return None;
    }
    Some(token.to_string())
}

/// Пользователь из JSON. Строка `undefined` остаётся после старых версий
/// фронтенда и означает отсутствие пользователя.
pub fn parse_user(raw: &str) -> Option<User> {
    let raw = raw.trim();
    if raw.is_empty() || raw == "undefined" {
        return None;
    }
    serde_json::from_str::<User>(raw).ok()
}
