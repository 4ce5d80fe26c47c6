use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("validation failed for '{field}': {message}")]
/// Ошибка проверки формы до отправки на сервер.
pub struct ValidationError {
    /// Имя поля формы.
    pub field: &'static str,
    /// Что именно не так.
    pub message: &'static str,
}

impl ValidationError {
    pub(crate) const fn new(field: &'static str, message: &'static str) -> Self {
        Self { field, message }
    }
}

#[derive(Debug, Error)]
/// Ошибки клиентской библиотеки `blog-client`.
pub enum BlogClientError {
    /// Ошибка HTTP-транспорта (`reqwest`).
    #[cfg(feature = "http")]
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Требуется авторизация (отсутствует/некорректен токен).
    #[error("unauthorized")]
    Unauthorized,

    /// Токен есть, но прав на операцию нет.
    #[error("forbidden")]
    Forbidden,

    /// Запрошенный ресурс не найден.
    #[error("not found")]
    NotFound,

    /// Некорректный запрос или отказ сервера с сообщением.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Форма не прошла локальную проверку.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Загрузка файла не удалась.
    #[error("upload failed: {0}")]
    Upload(String),
}

/// Результат операций `blog-client`.
pub type BlogClientResult<T> = Result<T, BlogClientError>;

impl BlogClientError {
    /// Переводит HTTP-статус ответа в ошибку клиента.
    pub fn from_status(status: u16, message: Option<String>) -> Self {
        match status {
            401 => Self::Unauthorized,
            403 => Self::Forbidden,
            404 => Self::NotFound,
            _ => {
                let message = message.unwrap_or_else(|| format!("http status {status}"));
                Self::InvalidRequest(message)
            }
        }
    }

    #[cfg(feature = "http")]
    pub(crate) fn from_reqwest(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            return Self::from_status(status.as_u16(), None);
        }
        Self::Http(err)
    }
}
