//! Клиентская библиотека для REST API блога.
//!
//! Содержит модель данных, общую для браузерного и терминального клиентов,
//! состояние страницы списка (пагинация, поиск, сортировка, сопоставление
//! категорий), карусель подборки, проверки форм и правила доступа.
//!
//! С фичей `http` (включена по умолчанию) доступен `BlogClient`: он хранит
//! сессию после `login` и автоматически использует токен в защищённых
//! операциях.
#![warn(missing_docs)]

pub mod access;
pub mod carousel;
mod error;
pub mod forms;
#[cfg(feature = "http")]
mod http_client;
pub mod listing;
mod models;
pub mod session;
pub mod slug;

pub use error::{BlogClientError, BlogClientResult, ValidationError};
pub use models::{
    AuthResponse, Category, Comment, FeaturedPost, FeaturedPosts, FeaturedSection, Post, PostPage,
    Role, User, timestamp,
};
pub use session::Session;

#[cfg(feature = "http")]
pub use http_client::{CONNECT_TIMEOUT, DEFAULT_TIMEOUT, HttpClient};

#[cfg(feature = "http")]
use forms::{LoginForm, PostDraft, RegisterForm};
#[cfg(feature = "http")]
use listing::{CanonicalNames, ListingState, resolve_canonical};

#[cfg(feature = "http")]
#[derive(Debug, Clone)]
/// Клиент блога поверх HTTP.
pub struct BlogClient {
    http: HttpClient,
    session: Option<Session>,
}

#[cfg(feature = "http")]
impl BlogClient {
    /// Клиент для API по адресу `base_url`.
    pub fn new(base_url: &str) -> BlogClientResult<Self> {
        Ok(Self::with_http(HttpClient::new(base_url)?))
    }

    /// Клиент поверх уже настроенного `HttpClient`.
    pub fn with_http(http: HttpClient) -> Self {
        Self {
            http,
            session: None,
        }
    }

    /// Устанавливает сессию (например, восстановленную из файла).
    pub fn set_session(&mut self, session: Session) {
        self.session = Some(session);
    }

    /// Текущая сессия.
    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Выход: забывает сессию.
    pub fn clear_session(&mut self) -> Option<Session> {
        self.session.take()
    }

    /// Текущий токен, если пользователь вошёл.
    pub fn token(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.token.as_str())
    }

    /// Текущий пользователь.
    pub fn user(&self) -> Option<&User> {
        self.session.as_ref().map(|s| &s.user)
    }

    /// Вход. Сохраняет сессию в клиенте.
    pub async fn login(&mut self, username: &str, password: &str) -> BlogClientResult<&Session> {
        let form = LoginForm {
            username: username.to_string(),
            password: password.to_string(),
        }
        .validate()?;

        let auth = self.http.login(&form).await?;
        tracing::info!(username = %auth.user.username, "logged in");
        Ok(&*self.session.insert(Session::from(auth)))
    }

    /// Регистрация. После неё нужно войти отдельно.
    pub async fn register(&self, form: RegisterForm) -> BlogClientResult<()> {
        let form = form.validate()?;
        self.http.register(&form).await
    }

    /// Список категорий.
    pub async fn categories(&self) -> BlogClientResult<Vec<Category>> {
        self.http.categories().await
    }

    /// Создаёт категорию.
    ///
    /// Требует сессию.
    pub async fn create_category(
        &self,
        category: &str,
        subcategories: &[String],
    ) -> BlogClientResult<()> {
        let category = category.trim();
        if category.is_empty() {
            return Err(ValidationError {
                field: "category",
                message: "must not be empty",
            }
            .into());
        }
        let token = self.require_token()?;
        self.http.create_category(token, category, subcategories).await
    }

    /// Удаляет категорию.
    ///
    /// Требует сессию.
    pub async fn delete_category(&self, category: &str) -> BlogClientResult<()> {
        let token = self.require_token()?;
        self.http.delete_category(token, category).await
    }

    /// Страница постов для подкатегории, адресованной сегментами URL.
    ///
    /// Названия сначала сопоставляются со списком категорий сервера; если
    /// список получить не удалось, используются названия из URL как есть.
    pub async fn list_posts(
        &self,
        url_category: &str,
        url_subcategory: &str,
        state: &ListingState,
    ) -> BlogClientResult<(CanonicalNames, PostPage)> {
        let names = match self.http.categories().await {
            Ok(categories) => resolve_canonical(&categories, url_category, url_subcategory),
            Err(err) => {
                tracing::warn!(error = %err, "category list unavailable, using url names");
                CanonicalNames::from_url(url_category, url_subcategory)
            }
        };

        let page = self.http.list_posts(&state.to_request(&names)).await?;
        Ok((names, page))
    }

    /// Подборки для главной.
    pub async fn featured_posts(&self) -> BlogClientResult<FeaturedPosts> {
        self.http.featured_posts().await
    }

    /// Пост с комментариями.
    pub async fn get_post(&self, category: &str, subcategory: &str, id: i64) -> BlogClientResult<Post> {
        self.http.get_post(category, subcategory, id).await
    }

    /// Пост по идентификатору.
    pub async fn get_post_by_id(&self, id: i64) -> BlogClientResult<Post> {
        self.http.get_post_by_id(id).await
    }

    /// Создаёт пост.
    ///
    /// Требует сессию.
    pub async fn create_post(&self, draft: PostDraft) -> BlogClientResult<()> {
        let draft = draft.validate()?;
        let token = self.require_token()?;
        self.http.create_post(token, &draft).await
    }

    /// Обновляет пост.
    ///
    /// Требует сессию.
    pub async fn update_post(&self, id: i64, draft: PostDraft) -> BlogClientResult<()> {
        let draft = draft.validate()?;
        let token = self.require_token()?;
        self.http.update_post(token, id, &draft).await
    }

    /// Удаляет пост.
    ///
    /// Требует сессию.
    pub async fn delete_post(&self, id: i64) -> BlogClientResult<()> {
        let token = self.require_token()?;
        self.http.delete_post(token, id).await
    }

    /// Лайк. Работает и без сессии.
    pub async fn like_post(&self, id: i64) -> BlogClientResult<()> {
        self.http.like_post(self.token(), id).await
    }

    /// Комментарий к посту.
    ///
    /// Требует сессию.
    pub async fn add_comment(&self, post_id: i64, content: &str) -> BlogClientResult<()> {
        let content = forms::validate_comment(content)?;
        let token = self.require_token()?;
        self.http.create_comment(token, post_id, content).await
    }

    /// Удаляет комментарий.
    ///
    /// Требует сессию.
    pub async fn delete_comment(&self, id: i64) -> BlogClientResult<()> {
        let token = self.require_token()?;
        self.http.delete_comment(token, id).await
    }

    /// Загружает файл, возвращает URL.
    ///
    /// Требует сессию.
    pub async fn upload(&self, file_name: &str, bytes: Vec<u8>, mime: &str) -> BlogClientResult<String> {
        let token = self.require_token()?;
        self.http.upload(token, file_name, bytes, mime).await
    }

    fn require_token(&self) -> BlogClientResult<&str> {
        self.token().ok_or(BlogClientError::Unauthorized)
    }
}
