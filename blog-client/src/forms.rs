//! Формы: черновик поста, регистрация, вход, комментарий.

use serde::{Deserialize, Serialize};
use validator::ValidateEmail;

use crate::error::ValidationError;
use crate::models::Post;

const MIN_PASSWORD_CHARS: usize = 8;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
/// Данные формы создания/редактирования поста.
pub struct PostDraft {
    /// Заголовок.
    pub title: String,
    /// Краткое описание для карточки.
    pub description: String,
    /// HTML-содержимое.
    pub content: String,
    /// Категория.
    pub category: String,
    /// Подкатегория.
    pub subcategory: String,
    /// URL миниатюры.
    pub thumbnail: String,
}

impl PostDraft {
    /// Черновик из существующего поста (режим редактирования).
    pub fn from_post(post: &Post) -> Self {
        Self {
            title: post.title.clone(),
            description: post.description.clone(),
            content: post.content.clone(),
            category: post.category.clone(),
            subcategory: post.subcategory.clone(),
            thumbnail: post.thumbnail.clone(),
        }
    }

    /// Проверяет черновик и обрезает пробелы по краям текстовых полей.
    /// HTML-содержимое отправляется как есть.
    pub fn validate(self) -> Result<Self, ValidationError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(ValidationError::new("title", "must not be empty"));
        }
        if self.content.trim().is_empty() {
            return Err(ValidationError::new("content", "must not be empty"));
        }

        Ok(Self {
            title: title.to_string(),
            description: self.description.trim().to_string(),
            content: self.content,
            category: self.category.trim().to_string(),
            subcategory: self.subcategory.trim().to_string(),
            thumbnail: self.thumbnail,
        })
    }

    /// Вставляет картинку в конец HTML-содержимого.
    pub fn append_image(&mut self, url: &str, alt: &str) {
        if !self.content.is_empty() && !self.content.ends_with('\n') {
            self.content.push('\n');
        }
        self.content.push_str(&image_tag(url, alt));
    }
}

/// `<img>` с экранированными атрибутами.
pub fn image_tag(url: &str, alt: &str) -> String {
    format!(
        r#"<p><img src="{}" alt="{}"></p>"#,
        escape_attr(url),
        escape_attr(alt)
    )
}

fn escape_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
/// Форма регистрации.
pub struct RegisterForm {
    /// Логин.
    pub username: String,
    /// Email.
    pub email: String,
    /// Пароль.
    pub password: String,
    /// Подтверждение пароля, на сервер не отправляется.
    #[serde(skip)]
    pub password_confirm: String,
}

impl RegisterForm {
    /// Проверки идут в порядке: длина пароля, совпадение паролей, email,
    /// затем логин.
    pub fn validate(self) -> Result<Self, ValidationError> {
        if self.password.chars().count() < MIN_PASSWORD_CHARS {
            return Err(ValidationError::new("password", "must be at least 8 chars"));
        }
        if self.password != self.password_confirm {
            return Err(ValidationError::new("password_confirm", "passwords do not match"));
        }
        let email = self.email.trim().to_string();
        if !email.validate_email() {
            return Err(ValidationError::new("email", "must be a valid email"));
        }
        let username = self.username.trim().to_string();
        if username.is_empty() {
            return Err(ValidationError::new("username", "must not be empty"));
        }

        Ok(Self {
            username,
            email,
            password: self.password,
            password_confirm: self.password_confirm,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
/// Форма входа.
pub struct LoginForm {
    /// Логин.
    pub username: String,
    /// Пароль.
    pub password: String,
}

impl LoginForm {
    /// Логин обрезается, пароль отправляется как есть.
    pub fn validate(self) -> Result<Self, ValidationError> {
        let username = self.username.trim();
        if username.is_empty() {
            return Err(ValidationError::new("username", "must not be empty"));
        }
        if self.password.is_empty() {
            return Err(ValidationError::new("password", "must not be empty"));
        }
        Ok(Self {
            username: username.to_string(),
            password: self.password,
        })
    }
}

/// Текст комментария не может быть пустым.
pub fn validate_comment(content: &str) -> Result<&str, ValidationError> {
    if content.trim().is_empty() {
        return Err(ValidationError::new("content", "must not be empty"));
    }
    Ok(content)
}
