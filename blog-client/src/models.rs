use std::fmt;

use chrono::{DateTime, Utc};
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// Роль пользователя, как её отдаёт сервер.
pub enum Role {
    /// Владелец блога: пишет, правит и удаляет посты.
    Master,
    /// Зарегистрированный читатель.
    User,
    /// Любое другое значение.
    #[default]
    #[serde(other)]
    Guest,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Публичная модель пользователя.
pub struct User {
    /// Идентификатор пользователя.
    pub id: i64,
    /// Логин.
    pub username: String,
    /// Email, если сервер его вернул.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Роль.
    #[serde(default)]
    pub role: Role,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Комментарий к посту.
pub struct Comment {
    /// Идентификатор комментария.
    pub id: i64,
    /// Имя автора.
    #[serde(default, deserialize_with = "null_as_default")]
    pub user_name: String,
    /// Текст.
    #[serde(default, deserialize_with = "null_as_default")]
    pub content: String,
    /// Дата и время создания (UTC).
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Публичная модель поста.
///
/// Сервер не всегда присылает все поля (в списке нет `content` и
/// `comments`, `thumbnail` бывает `null`), поэтому всё, кроме `id`,
/// `title` и `created_at`, имеет значение по умолчанию.
pub struct Post {
    /// Идентификатор поста.
    pub id: i64,
    /// Заголовок.
    pub title: String,
    /// Краткое описание для карточки в списке.
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    /// HTML-содержимое.
    #[serde(default, deserialize_with = "null_as_default")]
    pub content: String,
    /// Категория.
    #[serde(default, deserialize_with = "null_as_default")]
    pub category: String,
    /// Подкатегория.
    #[serde(default, deserialize_with = "null_as_default")]
    pub subcategory: String,
    /// URL миниатюры, пустая строка если её нет.
    #[serde(default, deserialize_with = "null_as_default")]
    pub thumbnail: String,
    /// Количество лайков.
    #[serde(default, deserialize_with = "null_as_default")]
    pub likes_count: u64,
    /// Количество комментариев.
    #[serde(default, deserialize_with = "null_as_default")]
    pub comments_count: u64,
    /// Дата и время создания (UTC).
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    /// Комментарии (только в детальном ответе).
    #[serde(default, deserialize_with = "null_as_default")]
    pub comments: Vec<Comment>,
}

impl Post {
    /// Число комментариев для отображения: из загруженного списка, если он
    /// есть, иначе счётчик сервера.
    pub fn comment_total(&self) -> u64 {
        if self.comments.is_empty() {
            self.comments_count
        } else {
            self.comments.len() as u64
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Категория и её подкатегории в порядке сервера.
pub struct Category {
    /// Название категории.
    pub category: String,
    /// Подкатегории.
    #[serde(default, deserialize_with = "null_as_default")]
    pub subcategories: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
/// Одна страница списка постов.
pub struct PostPage {
    /// Посты текущей страницы.
    #[serde(default, deserialize_with = "null_as_default")]
    pub items: Vec<Post>,
    /// Общее количество постов по запросу.
    #[serde(default, deserialize_with = "null_as_default")]
    pub total: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Пост в подборке на главной.
pub struct FeaturedPost {
    /// Идентификатор поста.
    pub id: i64,
    /// Заголовок.
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    /// URL миниатюры.
    #[serde(default, deserialize_with = "null_as_default")]
    pub thumbnail: String,
    /// Подкатегория (нужна для ссылки на пост).
    #[serde(default, deserialize_with = "null_as_default")]
    pub subcategory: String,
}

#[derive(Debug, Clone, PartialEq)]
/// Подборка постов одной категории.
pub struct FeaturedSection {
    /// Категория.
    pub category: String,
    /// Посты категории.
    pub posts: Vec<FeaturedPost>,
}

#[derive(Debug, Clone, Default, PartialEq)]
/// Ответ `/posts/featured`: объект `категория -> [посты]`.
///
/// Порядок категорий сохраняется таким, каким его прислал сервер.
pub struct FeaturedPosts {
    /// Секции в порядке ответа.
    pub sections: Vec<FeaturedSection>,
}

impl<'de> Deserialize<'de> for FeaturedPosts {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct SectionsVisitor;

        impl<'de> Visitor<'de> for SectionsVisitor {
            type Value = FeaturedPosts;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an object mapping category to a list of posts")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut sections = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((category, posts)) =
                    map.next_entry::<String, Option<Vec<FeaturedPost>>>()?
                {
                    sections.push(FeaturedSection {
                        category,
                        posts: posts.unwrap_or_default(),
                    });
                }
                Ok(FeaturedPosts { sections })
            }
        }

        deserializer.deserialize_map(SectionsVisitor)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Ответ после успешного входа.
pub struct AuthResponse {
    /// Bearer-токен.
    pub token: String,
    /// Данные пользователя.
    pub user: User,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Временные метки: сервер присылает RFC 3339, но старые записи приходят
/// в виде `YYYY-MM-DD HH:MM:SS` без зоны; такие считаем UTC.
pub mod timestamp {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer, de};

    const NAIVE_FORMATS: [&str; 4] = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S",
    ];

    /// Разбирает метку времени в одном из поддерживаемых форматов.
    pub fn parse(raw: &str) -> Option<DateTime<Utc>> {
        let raw = raw.trim();
        if let Ok(value) = DateTime::parse_from_rfc3339(raw) {
            return Some(value.with_timezone(&Utc));
        }
        NAIVE_FORMATS
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
            .map(|naive| naive.and_utc())
    }

    pub(crate) fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_rfc3339())
    }

    pub(crate) fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| de::Error::custom(format!("unsupported timestamp: {raw}")))
    }
}
