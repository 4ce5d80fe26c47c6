//! Адреса страниц приложения.
#![cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]

use blog_client::slug::slugify;

pub(crate) const HOME: &str = "/";
pub(crate) const LOGIN: &str = "/login";
pub(crate) const REGISTER: &str = "/register";
pub(crate) const WRITE: &str = "/write";

/// Список постов подкатегории.
pub(crate) fn listing_href(category: &str, subcategory: &str) -> String {
    format!("/{}/{}", slugify(category), slugify(subcategory))
}

/// Страница поста.
pub(crate) fn post_href(category: &str, subcategory: &str, id: i64) -> String {
    format!("{}/{id}", listing_href(category, subcategory))
}

pub(crate) fn edit_href(id: i64) -> String {
    format!("/edit/{id}")
}

/// Id редактируемого поста. Поддерживаются три формы адреса:
/// `/edit/:post_id`, `/write?postId=N` и старая `/write/postId=N`.
pub(crate) fn edit_post_id(
    path_param: Option<&str>,
    query_param: Option<&str>,
    legacy_segment: Option<&str>,
) -> Option<i64> {
    let legacy = legacy_segment.and_then(|segment| {
        let (key, value) = segment.split_once('=')?;
        key.eq_ignore_ascii_case("postid").then_some(value)
    });

    [path_param, query_param, legacy]
        .into_iter()
        .flatten()
        .find_map(|raw| raw.trim().parse::<i64>().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listing_href_uses_slugs() {
        assert_eq!(listing_href("Study", "JSP MVC"), "/study/jsp-mvc");
        assert_eq!(listing_href("Album", "일상"), "/album/일상");
    }

    #[test]
    fn post_href_appends_id() {
        assert_eq!(post_href("Travel", "jeju", 12), "/travel/jeju/12");
    }

    #[test]
    fn edit_id_from_any_supported_form() {
        assert_eq!(edit_post_id(Some("7"), None, None), Some(7));
        assert_eq!(edit_post_id(None, Some("8"), None), Some(8));
        assert_eq!(edit_post_id(None, None, Some("postId=9")), Some(9));
        assert_eq!(edit_post_id(None, None, Some("POSTID=10")), Some(10));
    }

    #[test]
    fn edit_id_prefers_path_and_skips_garbage() {
        assert_eq!(edit_post_id(Some("3"), Some("4"), None), Some(3));
        assert_eq!(edit_post_id(Some("abc"), Some("4"), None), Some(4));
        assert_eq!(edit_post_id(None, None, Some("other=1")), None);
        assert_eq!(edit_post_id(None, None, None), None);
    }
}
