use blog_client::forms::{LoginForm, PostDraft, RegisterForm};
use blog_client::listing::PostListQuery;
use blog_client::{AuthResponse, Category, FeaturedPosts, Post, PostPage};
use gloo_net::http::{Request, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use web_sys::{File, FormData};

use crate::logger;

const API_BASE_URL: &str = match option_env!("WASM_API_BASE_URL") {
    Some(value) => value,
    None => "/api",
};

#[derive(Debug, Clone)]
pub(crate) enum ApiError {
    Network(String),
    Http { status: u16, message: String },
    Decode(String),
    Upload(String),
}

impl ApiError {
    pub(crate) fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl core::fmt::Display for ApiError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Network(msg) => write!(f, "Сетевая ошибка: {msg}"),
            Self::Http { message, .. } => f.write_str(message),
            Self::Decode(msg) => write!(f, "Некорректный ответ сервера: {msg}"),
            Self::Upload(msg) => f.write_str(msg),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UploadBody {
    url: Option<String>,
}

#[derive(Debug, Serialize)]
struct CommentRequest<'a> {
    post_id: i64,
    content: &'a str,
}

fn endpoint(segments: &[&str]) -> String {
    let mut url = API_BASE_URL.trim_end_matches('/').to_string();
    for segment in segments {
        url.push('/');
        url.push_str(&String::from(js_sys::encode_uri_component(segment)));
    }
    url
}

fn authorized(request: RequestBuilder, token: Option<&str>) -> RequestBuilder {
    match token {
        Some(token) => request.header("Authorization", &format!("Bearer {token}")),
        None => request,
    }
}

fn network(err: gloo_net::Error) -> ApiError {
    ApiError::Network(err.to_string())
}

fn fallback_message(status: u16) -> String {
    match status {
        400 => "Некорректный запрос".to_string(),
        401 => "Требуется авторизация".to_string(),
        403 => "Недостаточно прав для этой операции".to_string(),
        404 => "Ресурс не найден".to_string(),
        409 => "Конфликт данных".to_string(),
        500..=599 => "Ошибка сервера, попробуйте позже".to_string(),
        _ => format!("HTTP ошибка {status}"),
    }
}

async fn parse_error_body(response: Response) -> ApiError {
    let status = response.status();
    let message = response
        .text()
        .await
        .ok()
        .and_then(|text| serde_json::from_str::<ErrorBody>(&text).ok())
        .and_then(|body| body.message.or(body.error))
        .filter(|message| !message.trim().is_empty())
        .unwrap_or_else(|| fallback_message(status));

    logger::warn("api", &format!("http {status}: {message}"));
    ApiError::Http { status, message }
}

async fn parse_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    response
        .json::<T>()
        .await
        .map_err(|err| ApiError::Decode(err.to_string()))
}

async fn execute(request: Result<Request, gloo_net::Error>) -> Result<Response, ApiError> {
    let request = request.map_err(network)?;
    logger::debug("api", &format!("{} {}", request.method(), request.url()));

    let response = request.send().await.map_err(|err| {
        logger::error("api", &format!("network failure: {err}"));
        network(err)
    })?;
    if !response.ok() {
        return Err(parse_error_body(response).await);
    }
    Ok(response)
}

async fn fetch_json<T: DeserializeOwned>(
    request: Result<Request, gloo_net::Error>,
) -> Result<T, ApiError> {
    parse_json(execute(request).await?).await
}

pub(crate) async fn categories() -> Result<Vec<Category>, ApiError> {
    fetch_json(Request::get(&endpoint(&["categories"])).build()).await
}

pub(crate) async fn list_posts(query: &PostListQuery) -> Result<PostPage, ApiError> {
    let pairs = query.to_pairs();
    let request = Request::get(&endpoint(&["posts"]))
        .query(pairs.iter().map(|(key, value)| (*key, value.as_str())))
        .build();
    fetch_json(request).await
}

pub(crate) async fn featured_posts() -> Result<FeaturedPosts, ApiError> {
    fetch_json(Request::get(&endpoint(&["posts", "featured"])).build()).await
}

pub(crate) async fn get_post(category: &str, subcategory: &str, id: i64) -> Result<Post, ApiError> {
    let id = id.to_string();
    fetch_json(Request::get(&endpoint(&["posts", category, subcategory, &id])).build()).await
}

pub(crate) async fn get_post_by_id(id: i64) -> Result<Post, ApiError> {
    let id = id.to_string();
    fetch_json(Request::get(&endpoint(&["posts", "id", &id])).build()).await
}

pub(crate) async fn create_post(token: &str, draft: &PostDraft) -> Result<(), ApiError> {
    let request = authorized(Request::post(&endpoint(&["posts"])), Some(token)).json(draft);
    execute(request).await.map(drop)
}

pub(crate) async fn update_post(token: &str, id: i64, draft: &PostDraft) -> Result<(), ApiError> {
    let id = id.to_string();
    let request = authorized(Request::put(&endpoint(&["posts", &id])), Some(token)).json(draft);
    execute(request).await.map(drop)
}

pub(crate) async fn delete_post(token: &str, id: i64) -> Result<(), ApiError> {
    let id = id.to_string();
    let request = authorized(Request::delete(&endpoint(&["posts", &id])), Some(token)).build();
    execute(request).await.map(drop)
}

pub(crate) async fn like_post(token: Option<&str>, id: i64) -> Result<(), ApiError> {
    let id = id.to_string();
    let request = authorized(Request::post(&endpoint(&["posts", &id, "like"])), token).build();
    execute(request).await.map(drop)
}

pub(crate) async fn create_comment(token: &str, post_id: i64, content: &str) -> Result<(), ApiError> {
    let payload = CommentRequest { post_id, content };
    let request = authorized(Request::post(&endpoint(&["comments"])), Some(token)).json(&payload);
    execute(request).await.map(drop)
}

pub(crate) async fn delete_comment(token: &str, id: i64) -> Result<(), ApiError> {
    let id = id.to_string();
    let request = authorized(Request::delete(&endpoint(&["comments", &id])), Some(token)).build();
    execute(request).await.map(drop)
}

/// Загружает файл полем `file` и возвращает URL.
pub(crate) async fn upload(token: &str, file: &File) -> Result<String, ApiError> {
    let form = FormData::new()
        .map_err(|_| ApiError::Upload("Не удалось подготовить файл".to_string()))?;
    form.append_with_blob_and_filename("file", file, &file.name())
        .map_err(|_| ApiError::Upload("Не удалось подготовить файл".to_string()))?;

    let request = authorized(Request::post(&endpoint(&["uploads"])), Some(token))
        .body(form)
        .map_err(network)?;
    let response = request.send().await.map_err(network)?;

    match response.status() {
        401 | 403 => {
            return Err(ApiError::Upload(
                "Нет прав на загрузку. Войдите заново.".to_string(),
            ));
        }
        _ if !response.ok() => {
            return Err(match parse_error_body(response).await {
                ApiError::Http { message, .. } => ApiError::Upload(message),
                other => ApiError::Upload(other.to_string()),
            });
        }
        _ => {}
    }

    let body: UploadBody = parse_json(response).await?;
    body.url
        .filter(|url| !url.trim().is_empty())
        .ok_or_else(|| ApiError::Upload("Сервер не вернул URL файла".to_string()))
}

pub(crate) async fn login(form: &LoginForm) -> Result<AuthResponse, ApiError> {
    fetch_json(Request::post(&endpoint(&["login"])).json(form)).await
}

pub(crate) async fn register(form: &RegisterForm) -> Result<(), ApiError> {
    execute(Request::post(&endpoint(&["register"])).json(form))
        .await
        .map(drop)
}
