use std::time::Duration;

use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode, Url};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tracing::debug;

use crate::error::{BlogClientError, BlogClientResult};
use crate::forms::{LoginForm, PostDraft, RegisterForm};
use crate::listing::PostListQuery;
use crate::models::{AuthResponse, Category, FeaturedPosts, Post, PostPage};

/// Таймаут установки соединения.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
/// Таймаут запроса по умолчанию.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Serialize)]
struct CommentRequestDto<'a> {
    post_id: i64,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct CategoryRequestDto<'a> {
    category: &'a str,
    subcategories: &'a [String],
}

#[derive(Debug, Deserialize)]
struct ErrorResponseDto {
    message: Option<String>,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UploadResponseDto {
    url: Option<String>,
}

#[derive(Debug, Clone)]
/// HTTP-клиент для REST API блога.
pub struct HttpClient {
    base_url: Url,
    client: Client,
}

impl HttpClient {
    /// Клиент с базовым URL API, например `http://127.0.0.1:5000/api`.
    pub fn new(base_url: &str) -> BlogClientResult<Self> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    /// Клиент с заданным таймаутом запроса.
    pub fn with_timeout(base_url: &str, timeout: Duration) -> BlogClientResult<Self> {
        let parsed = Url::parse(base_url).map_err(|err| {
            BlogClientError::InvalidRequest(format!("invalid base url '{base_url}': {err}"))
        })?;
        if parsed.cannot_be_a_base() {
            return Err(BlogClientError::InvalidRequest(format!(
                "base url '{base_url}' cannot have a path"
            )));
        }

        let client = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            base_url: parsed,
            client,
        })
    }

    /// Базовый URL API.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// URL из сегментов пути; сегменты экранируются, поэтому категории с
    /// пробелами и не-ASCII символами безопасны.
    fn endpoint(&self, segments: &[&str]) -> BlogClientResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| BlogClientError::InvalidRequest("base url cannot have a path".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(
        &self,
        method: Method,
        segments: &[&str],
        token: Option<&str>,
    ) -> BlogClientResult<RequestBuilder> {
        let url = self.endpoint(segments)?;
        debug!(%method, %url, authorized = token.is_some(), "api request");

        let mut request = self.client.request(method, url);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        Ok(request)
    }

    async fn decode_error(response: Response) -> BlogClientError {
        let status = response.status();
        let message = response
            .json::<ErrorResponseDto>()
            .await
            .ok()
            .and_then(|body| body.message.or(body.error));
        debug!(%status, ?message, "api error response");
        BlogClientError::from_status(status.as_u16(), message)
    }

    async fn execute(request: RequestBuilder) -> BlogClientResult<Response> {
        let response = request
            .send()
            .await
            .map_err(BlogClientError::from_reqwest)?;
        if !response.status().is_success() {
            return Err(Self::decode_error(response).await);
        }
        Ok(response)
    }

    async fn fetch_json<T: DeserializeOwned>(request: RequestBuilder) -> BlogClientResult<T> {
        Self::execute(request)
            .await?
            .json::<T>()
            .await
            .map_err(BlogClientError::from_reqwest)
    }

    /// Список категорий с подкатегориями.
    pub async fn categories(&self) -> BlogClientResult<Vec<Category>> {
        Self::fetch_json(self.request(Method::GET, &["categories"], None)?).await
    }

    /// Создаёт категорию.
    pub async fn create_category(
        &self,
        token: &str,
        category: &str,
        subcategories: &[String],
    ) -> BlogClientResult<()> {
        let payload = CategoryRequestDto {
            category,
            subcategories,
        };
        let request = self
            .request(Method::POST, &["categories"], Some(token))?
            .json(&payload);
        Self::execute(request).await.map(drop)
    }

    /// Удаляет категорию.
    pub async fn delete_category(&self, token: &str, category: &str) -> BlogClientResult<()> {
        let request = self.request(Method::DELETE, &["categories", category], Some(token))?;
        Self::execute(request).await.map(drop)
    }

    /// Страница постов с фильтрами.
    pub async fn list_posts(&self, query: &PostListQuery) -> BlogClientResult<PostPage> {
        let request = self.request(Method::GET, &["posts"], None)?.query(query);
        Self::fetch_json(request).await
    }

    /// Подборки для главной.
    pub async fn featured_posts(&self) -> BlogClientResult<FeaturedPosts> {
        Self::fetch_json(self.request(Method::GET, &["posts", "featured"], None)?).await
    }

    /// Пост вместе с комментариями по адресу страницы.
    pub async fn get_post(
        &self,
        category: &str,
        subcategory: &str,
        id: i64,
    ) -> BlogClientResult<Post> {
        let id = id.to_string();
        let request = self.request(Method::GET, &["posts", category, subcategory, &id], None)?;
        Self::fetch_json(request).await
    }

    /// Пост по идентификатору (для формы редактирования).
    pub async fn get_post_by_id(&self, id: i64) -> BlogClientResult<Post> {
        let id = id.to_string();
        Self::fetch_json(self.request(Method::GET, &["posts", "id", &id], None)?).await
    }

    /// Создаёт пост.
    pub async fn create_post(&self, token: &str, draft: &PostDraft) -> BlogClientResult<()> {
        let request = self
            .request(Method::POST, &["posts"], Some(token))?
            .json(draft);
        Self::execute(request).await.map(drop)
    }

    /// Обновляет пост.
    pub async fn update_post(&self, token: &str, id: i64, draft: &PostDraft) -> BlogClientResult<()> {
        let id = id.to_string();
        let request = self
            .request(Method::PUT, &["posts", &id], Some(token))?
            .json(draft);
        Self::execute(request).await.map(drop)
    }

    /// Удаляет пост.
    pub async fn delete_post(&self, token: &str, id: i64) -> BlogClientResult<()> {
        let id = id.to_string();
        let request = self.request(Method::DELETE, &["posts", &id], Some(token))?;
        Self::execute(request).await.map(drop)
    }

    /// +1 лайк. Токен передаётся, если он есть.
    pub async fn like_post(&self, token: Option<&str>, id: i64) -> BlogClientResult<()> {
        let id = id.to_string();
        let request = self.request(Method::POST, &["posts", &id, "like"], token)?;
        Self::execute(request).await.map(drop)
    }

    /// Добавляет комментарий к посту.
    pub async fn create_comment(&self, token: &str, post_id: i64, content: &str) -> BlogClientResult<()> {
        let payload = CommentRequestDto { post_id, content };
        let request = self
            .request(Method::POST, &["comments"], Some(token))?
            .json(&payload);
        Self::execute(request).await.map(drop)
    }

    /// Удаляет комментарий.
    pub async fn delete_comment(&self, token: &str, id: i64) -> BlogClientResult<()> {
        let id = id.to_string();
        let request = self.request(Method::DELETE, &["comments", &id], Some(token))?;
        Self::execute(request).await.map(drop)
    }

    /// Загружает файл и возвращает его URL.
    pub async fn upload(
        &self,
        token: &str,
        file_name: &str,
        bytes: Vec<u8>,
        mime: &str,
    ) -> BlogClientResult<String> {
        let part = Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str(mime)?;
        let request = self
            .request(Method::POST, &["uploads"], Some(token))?
            .multipart(Form::new().part("file", part));

        let response = request
            .send()
            .await
            .map_err(BlogClientError::from_reqwest)?;
        match response.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                return Err(BlogClientError::Upload(
                    "upload is not permitted, please log in again".to_string(),
                ));
            }
            status if !status.is_success() => {
                return Err(match Self::decode_error(response).await {
                    BlogClientError::InvalidRequest(message) => BlogClientError::Upload(message),
                    other => BlogClientError::Upload(other.to_string()),
                });
            }
            _ => {}
        }

        let dto = response
            .json::<UploadResponseDto>()
            .await
            .map_err(BlogClientError::from_reqwest)?;
        dto.url
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| BlogClientError::Upload("server did not return a file url".to_string()))
    }

    /// Вход. Возвращает токен и пользователя.
    pub async fn login(&self, form: &LoginForm) -> BlogClientResult<AuthResponse> {
        Self::fetch_json(self.request(Method::POST, &["login"], None)?.json(form)).await
    }

    /// Регистрация. Сессию не создаёт: после неё нужно войти.
    pub async fn register(&self, form: &RegisterForm) -> BlogClientResult<()> {
        let request = self.request(Method::POST, &["register"], None)?.json(form);
        Self::execute(request).await.map(drop)
    }
}
