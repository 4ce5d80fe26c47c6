//! Состояние страницы списка постов: номер страницы, поиск, сортировка,
//! синхронизация с query-строкой URL и окно номеров страниц.

use std::ops::RangeInclusive;

use serde::Serialize;

use crate::models::Category;
use crate::slug::normalize;

/// Постов на одной странице списка.
pub const PER_PAGE: u32 = 9;

/// Сколько номеров страниц видно в пагинации одновременно.
pub const PAGE_WINDOW: u32 = 10;

/// Верхняя граница номера страницы из URL.
pub const MAX_PAGE: u32 = 1_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// Порядок сортировки списка.
pub enum SortOrder {
    /// Сначала новые.
    #[default]
    Latest,
    /// Сначала старые.
    Oldest,
}

impl SortOrder {
    /// Значение из URL: `oldest` выбирает старые, всё остальное новые.
    pub fn from_query(raw: Option<&str>) -> Self {
        match raw {
            Some("oldest") => Self::Oldest,
            _ => Self::Latest,
        }
    }

    /// Значение для `<select>` и URL.
    pub fn as_query(self) -> &'static str {
        match self {
            Self::Latest => "latest",
            Self::Oldest => "oldest",
        }
    }

    /// Значение параметра `sort` для API.
    pub fn api_value(self) -> &'static str {
        match self {
            Self::Latest => "desc_created",
            Self::Oldest => "asc_created",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Фильтры и номер страницы списка.
pub struct ListingState {
    /// Текущая страница, с 1.
    pub page: u32,
    /// Поисковая строка как её ввёл пользователь.
    pub search: String,
    /// Сортировка.
    pub sort: SortOrder,
}

impl Default for ListingState {
    fn default() -> Self {
        Self {
            page: 1,
            search: String::new(),
            sort: SortOrder::Latest,
        }
    }
}

impl ListingState {
    /// Восстанавливает состояние из параметров `page`, `q`, `sort`.
    pub fn from_query(page: Option<&str>, search: Option<&str>, sort: Option<&str>) -> Self {
        Self {
            page: parse_page(page),
            search: search.unwrap_or_default().to_string(),
            sort: SortOrder::from_query(sort),
        }
    }

    /// Параметры для адресной строки. Значения по умолчанию опускаются.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if self.page > 1 {
            pairs.push(("page", self.page.to_string()));
        }
        if !self.search.is_empty() {
            pairs.push(("q", self.search.clone()));
        }
        if self.sort == SortOrder::Oldest {
            pairs.push(("sort", self.sort.as_query().to_string()));
        }
        pairs
    }

    /// Новый поиск всегда начинается с первой страницы.
    pub fn set_search(&mut self, search: impl Into<String>) {
        self.search = search.into();
        self.page = 1;
    }

    /// Смена сортировки всегда начинается с первой страницы.
    pub fn set_sort(&mut self, sort: SortOrder) {
        self.sort = sort;
        self.page = 1;
    }

    /// Переход на страницу `page`, зажатую в `1..=total_pages`.
    pub fn go_to(&mut self, page: i64, total_pages: u32) -> u32 {
        let last = i64::from(total_pages.max(1));
        self.page = page.clamp(1, last) as u32;
        self.page
    }

    /// На первую страницу.
    pub fn first(&mut self, total_pages: u32) -> u32 {
        self.go_to(1, total_pages)
    }

    /// На предыдущую страницу.
    pub fn prev(&mut self, total_pages: u32) -> u32 {
        self.go_to(i64::from(self.page) - 1, total_pages)
    }

    /// На следующую страницу.
    pub fn next(&mut self, total_pages: u32) -> u32 {
        self.go_to(i64::from(self.page) + 1, total_pages)
    }

    /// На последнюю страницу.
    pub fn last(&mut self, total_pages: u32) -> u32 {
        self.go_to(i64::from(total_pages), total_pages)
    }

    /// Параметры запроса `/posts` для уже разрешённых названий.
    pub fn to_request(&self, names: &CanonicalNames) -> PostListQuery {
        let search = self.search.trim();
        PostListQuery {
            category: names.category.clone(),
            subcategory: names.subcategory.clone(),
            page: self.page,
            per_page: PER_PAGE,
            search: (!search.is_empty()).then(|| search.to_string()),
            sort: self.sort.api_value(),
        }
    }
}

fn parse_page(raw: Option<&str>) -> u32 {
    raw.and_then(|value| value.trim().parse::<u32>().ok())
        .filter(|page| *page > 0)
        .map_or(1, |page| page.min(MAX_PAGE))
}

/// Количество страниц: всегда хотя бы одна.
pub fn total_pages(total: u64, per_page: u32) -> u32 {
    let per_page = u64::from(per_page.max(1));
    let pages = total.div_ceil(per_page).max(1);
    u32::try_from(pages).unwrap_or(u32::MAX)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Окно номеров страниц в пагинации.
pub struct PageWindow {
    /// Первый номер в окне.
    pub start: u32,
    /// Последний номер в окне.
    pub end: u32,
    /// Всего страниц.
    pub total_pages: u32,
}

impl PageWindow {
    /// Окно из [`PAGE_WINDOW`] номеров, в которое попадает `page`.
    pub fn new(page: u32, total_pages: u32) -> Self {
        let total_pages = total_pages.max(1);
        let page = page.max(1);
        let start = (page - 1) / PAGE_WINDOW * PAGE_WINDOW + 1;
        let end = start.saturating_add(PAGE_WINDOW - 1).min(total_pages);
        Self {
            start,
            end,
            total_pages,
        }
    }

    /// Номера страниц окна.
    pub fn pages(&self) -> RangeInclusive<u32> {
        self.start..=self.end
    }

    /// Пагинация нужна только когда страниц больше одной.
    pub fn is_visible(&self) -> bool {
        self.total_pages > 1
    }

    /// Отдельная кнопка «1» перед окном.
    pub fn show_first(&self) -> bool {
        self.start > 1
    }

    /// Многоточие между «1» и окном.
    pub fn leading_ellipsis(&self) -> bool {
        self.start > 2
    }

    /// Многоточие между окном и последней страницей.
    pub fn trailing_ellipsis(&self) -> bool {
        self.end.saturating_add(1) < self.total_pages
    }

    /// Отдельная кнопка последней страницы после окна.
    pub fn show_last(&self) -> bool {
        self.end < self.total_pages
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Названия категории и подкатегории в том виде, в каком их знает сервер.
pub struct CanonicalNames {
    /// Категория.
    pub category: String,
    /// Подкатегория.
    pub subcategory: String,
}

impl CanonicalNames {
    /// Названия из URL без сопоставления.
    pub fn from_url(category: &str, subcategory: &str) -> Self {
        Self {
            category: category.to_string(),
            subcategory: subcategory.to_string(),
        }
    }
}

/// Сопоставляет сегменты URL с названиями с сервера.
///
/// Сначала сравниваются нормализованные строки, затем нормализованные
/// строки с `-` вместо пробелов. Не найденное значение остаётся как в URL.
pub fn resolve_canonical(categories: &[Category], url_cat: &str, url_sub: &str) -> CanonicalNames {
    let category = find_by_name(categories, url_cat, |c| c.category.as_str());

    let subcategory = category.and_then(|c| {
        find_by_name(&c.subcategories, url_sub, String::as_str).map(String::clone)
    });

    CanonicalNames {
        category: category.map_or_else(|| url_cat.to_string(), |c| c.category.clone()),
        subcategory: subcategory.unwrap_or_else(|| url_sub.to_string()),
    }
}

fn find_by_name<'a, T>(items: &'a [T], url_value: &str, name: impl Fn(&T) -> &str) -> Option<&'a T> {
    let exact = normalize(url_value);
    let spaced = normalize(&url_value.replace('-', " "));

    items
        .iter()
        .find(|item| normalize(name(item)) == exact)
        .or_else(|| items.iter().find(|item| normalize(name(item)) == spaced))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
/// Query-параметры `GET /posts`.
pub struct PostListQuery {
    /// Категория.
    pub category: String,
    /// Подкатегория.
    pub subcategory: String,
    /// Страница, с 1.
    pub page: u32,
    /// Размер страницы.
    pub per_page: u32,
    /// Поисковая строка.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    /// `desc_created` или `asc_created`.
    pub sort: &'static str,
}

impl PostListQuery {
    /// Параметры в виде пар для клиентов, которые не умеют сериализовать
    /// query сами. `search` пропускается, если не задан.
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("category", self.category.clone()),
            ("subcategory", self.subcategory.clone()),
            ("page", self.page.to_string()),
            ("per_page", self.per_page.to_string()),
        ];
        if let Some(search) = &self.search {
            pairs.push(("search", search.clone()));
        }
        pairs.push(("sort", self.sort.to_string()));
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn categories() -> Vec<Category> {
        vec![
            Category {
                category: "Study".to_string(),
                subcategories: vec![
                    "react.js".to_string(),
                    "next.js".to_string(),
                    "JSP MVC".to_string(),
                ],
            },
            Category {
                category: "Travel Notes".to_string(),
                subcategories: vec!["Jeju".to_string()],
            },
        ]
    }

    #[test]
    fn from_query_falls_back_to_defaults() {
        let state = ListingState::from_query(Some("abc"), None, Some("weird"));
        assert_eq!(state, ListingState::default());

        let state = ListingState::from_query(Some("0"), Some("rust"), Some("oldest"));
        assert_eq!(state.page, 1);
        assert_eq!(state.search, "rust");
        assert_eq!(state.sort, SortOrder::Oldest);
    }

    #[test]
    fn query_pairs_omit_defaults() {
        assert!(ListingState::default().query_pairs().is_empty());

        let state = ListingState {
            page: 3,
            search: "hooks".to_string(),
            sort: SortOrder::Oldest,
        };
        assert_eq!(
            state.query_pairs(),
            vec![
                ("page", "3".to_string()),
                ("q", "hooks".to_string()),
                ("sort", "oldest".to_string()),
            ]
        );
    }

    #[test]
    fn search_and_sort_changes_reset_page() {
        let mut state = ListingState {
            page: 4,
            ..ListingState::default()
        };
        state.set_search("rust");
        assert_eq!(state.page, 1);

        state.page = 5;
        state.set_sort(SortOrder::Oldest);
        assert_eq!(state.page, 1);
        assert_eq!(state.sort, SortOrder::Oldest);
    }

    #[test]
    fn navigation_is_clamped() {
        let mut state = ListingState::default();
        assert_eq!(state.prev(5), 1);
        assert_eq!(state.next(5), 2);
        assert_eq!(state.last(5), 5);
        assert_eq!(state.next(5), 5);
        assert_eq!(state.go_to(-3, 5), 1);
        assert_eq!(state.go_to(42, 0), 1);
    }

    #[test]
    fn total_pages_is_at_least_one() {
        assert_eq!(total_pages(0, PER_PAGE), 1);
        assert_eq!(total_pages(9, PER_PAGE), 1);
        assert_eq!(total_pages(10, PER_PAGE), 2);
        assert_eq!(total_pages(95, PER_PAGE), 11);
    }

    #[test]
    fn page_window_in_first_block() {
        let window = PageWindow::new(3, 25);
        assert_eq!(window.pages(), 1..=10);
        assert!(!window.show_first());
        assert!(!window.leading_ellipsis());
        assert!(window.trailing_ellipsis());
        assert!(window.show_last());
    }

    #[test]
    fn page_window_in_middle_and_last_blocks() {
        let window = PageWindow::new(12, 25);
        assert_eq!(window.pages(), 11..=20);
        assert!(window.show_first());
        assert!(window.leading_ellipsis());
        assert!(window.show_last());

        let window = PageWindow::new(21, 21);
        assert_eq!(window.pages(), 21..=21);
        assert!(!window.show_last());
        assert!(!window.trailing_ellipsis());

        let window = PageWindow::new(10, 11);
        assert_eq!(window.pages(), 1..=10);
        assert!(window.show_last());
        assert!(!window.trailing_ellipsis());
    }

    #[test]
    fn huge_page_from_url_is_capped() {
        let state = ListingState::from_query(Some("4294967295"), None, None);
        assert_eq!(state.page, MAX_PAGE);

        let window = PageWindow::new(state.page, total_pages(0, PER_PAGE));
        assert_eq!(window.total_pages, 1);
        assert!(!window.is_visible());
    }

    #[test]
    fn page_window_near_u32_max_does_not_overflow() {
        let window = PageWindow::new(u32::MAX, u32::MAX);
        assert_eq!(window.end, u32::MAX);
        assert!(window.start <= window.end);
        assert!(!window.show_last());
        assert!(!window.trailing_ellipsis());
    }

    #[test]
    fn single_page_hides_pagination() {
        assert!(!PageWindow::new(1, 1).is_visible());
        assert!(PageWindow::new(1, 2).is_visible());
    }

    #[test]
    fn resolve_canonical_matches_normalized_names() {
        let names = resolve_canonical(&categories(), "study", "jsp-mvc");
        assert_eq!(names.category, "Study");
        assert_eq!(names.subcategory, "JSP MVC");

        let names = resolve_canonical(&categories(), "travel-notes", "jeju");
        assert_eq!(names.category, "Travel Notes");
        assert_eq!(names.subcategory, "Jeju");
    }

    #[test]
    fn resolve_canonical_falls_back_to_url_values() {
        let names = resolve_canonical(&categories(), "album", "일상");
        assert_eq!(names, CanonicalNames::from_url("album", "일상"));

        let names = resolve_canonical(&categories(), "Study", "rust");
        assert_eq!(names.category, "Study");
        assert_eq!(names.subcategory, "rust");
    }

    #[test]
    fn to_request_maps_sort_and_drops_blank_search() {
        let mut state = ListingState::default();
        state.set_search("   ");
        state.set_sort(SortOrder::Oldest);

        let query = state.to_request(&CanonicalNames::from_url("Study", "react.js"));
        assert_eq!(query.search, None);
        assert_eq!(query.sort, "asc_created");
        assert_eq!(query.per_page, PER_PAGE);
        assert_eq!(query.page, 1);
    }

    #[test]
    fn request_pairs_keep_trimmed_search() {
        let mut state = ListingState::default();
        state.set_search("  hooks ");

        let pairs = state
            .to_request(&CanonicalNames::from_url("Study", "react.js"))
            .to_pairs();
        assert_eq!(
            pairs,
            vec![
                ("category", "Study".to_string()),
                ("subcategory", "react.js".to_string()),
                ("page", "1".to_string()),
                ("per_page", "9".to_string()),
                ("search", "hooks".to_string()),
                ("sort", "desc_created".to_string()),
            ]
        );
    }
}
