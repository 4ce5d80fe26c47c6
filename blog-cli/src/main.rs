mod logging;
mod session_store;
mod settings;

use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use blog_client::forms::{PostDraft, RegisterForm};
use blog_client::listing::{ListingState, PER_PAGE, PageWindow, SortOrder, total_pages};
use blog_client::{
    BlogClient, BlogClientError, Category, FeaturedPosts, HttpClient, Post, PostPage, Session,
};
use clap::{Parser, Subcommand, ValueEnum};

use crate::logging::init_logging;
use crate::session_store::SessionStore;
use crate::settings::Settings;

#[derive(Debug, Parser)]
#[command(name = "blog-cli", version, about = "Терминальный клиент блога")]
struct Cli {
    /// Адрес API, например `http://127.0.0.1:5000/api`.
    #[arg(long, global = true)]
    server: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SortArg {
    Latest,
    Oldest,
}

impl From<SortArg> for SortOrder {
    fn from(value: SortArg) -> Self {
        match value {
            SortArg::Latest => SortOrder::Latest,
            SortArg::Oldest => SortOrder::Oldest,
        }
    }
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Регистрация пользователя.
    Register {
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        /// Подтверждение; по умолчанию совпадает с паролем.
        #[arg(long)]
        password_confirm: Option<String>,
    },
    /// Вход пользователя.
    Login {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
    },
    /// Выход: удаляет сохранённую сессию.
    Logout,
    /// Текущий пользователь.
    Whoami,
    /// Категории и подкатегории.
    Categories,
    /// Создание категории (требует вход).
    CategoryAdd {
        name: String,
        /// Подкатегория, можно указать несколько раз.
        #[arg(long = "sub")]
        subcategories: Vec<String>,
    },
    /// Удаление категории (требует вход).
    CategoryRemove { name: String },
    /// Список постов подкатегории.
    List {
        category: String,
        subcategory: String,
        #[arg(long)]
        search: Option<String>,
        #[arg(long, value_enum, default_value_t = SortArg::Latest)]
        sort: SortArg,
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Подборки главной страницы.
    Featured,
    /// Получение поста.
    ///
    /// С `--category` и `--subcategory` пост запрашивается по адресу
    /// страницы, иначе по id.
    Get {
        #[arg(long)]
        id: i64,
        #[arg(long, requires = "subcategory")]
        category: Option<String>,
        #[arg(long, requires = "category")]
        subcategory: Option<String>,
    },
    /// Создание поста (требует вход).
    Create {
        #[arg(long)]
        title: String,
        #[arg(long, conflicts_with = "content_file")]
        content: Option<String>,
        /// HTML-содержимое из файла.
        #[arg(long)]
        content_file: Option<PathBuf>,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long)]
        category: String,
        #[arg(long)]
        subcategory: String,
        #[arg(long, default_value = "")]
        thumbnail: String,
    },
    /// Обновление поста (требует вход).
    ///
    /// Неуказанные поля остаются как есть.
    Update {
        #[arg(long)]
        id: i64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long, conflicts_with = "content_file")]
        content: Option<String>,
        #[arg(long)]
        content_file: Option<PathBuf>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        subcategory: Option<String>,
        #[arg(long)]
        thumbnail: Option<String>,
    },
    /// Удаление поста (требует вход).
    Delete {
        #[arg(long)]
        id: i64,
    },
    /// Лайк посту.
    Like {
        #[arg(long)]
        id: i64,
    },
    /// Комментарий к посту (требует вход).
    Comment {
        #[arg(long)]
        post_id: i64,
        #[arg(long)]
        content: String,
    },
    /// Удаление комментария (требует вход).
    Uncomment {
        #[arg(long)]
        id: i64,
    },
    /// Загрузка файла (требует вход). Печатает URL.
    Upload {
        path: PathBuf,
        /// MIME-тип; по умолчанию определяется по расширению.
        #[arg(long)]
        mime: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("Ошибка: {err:#}");
        process::exit(1);
    }
}

async fn run() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let settings = Settings::from_env()?.with_server(cli.server);
    init_logging(&settings.log_level)?;
    tracing::debug!(api_url = %settings.api_url, "settings loaded");

    let store = SessionStore::new(settings.session_file.clone());
    let http = HttpClient::with_timeout(
        &settings.api_url,
        Duration::from_secs(settings.http_timeout_secs),
    )
    .map_err(map_client_error)?;
    let mut client = BlogClient::with_http(http);
    if let Some(session) = store.load()? {
        client.set_session(session);
    }

    match cli.command {
        Command::Register {
            username,
            email,
            password,
            password_confirm,
        } => {
            let password_confirm = password_confirm.unwrap_or_else(|| password.clone());
            client
                .register(RegisterForm {
                    username: username.clone(),
                    email,
                    password,
                    password_confirm,
                })
                .await
                .map_err(map_client_error)?;
            println!("Регистрация успешна: {username}. Теперь выполните `blog-cli login`.");
        }
        Command::Login { username, password } => {
            let session = client
                .login(&username, &password)
                .await
                .map_err(map_client_error)?;
            store.save(session)?;
            print_session("Вход выполнен", session);
        }
        Command::Logout => {
            if store.clear()? {
                println!("Сессия удалена: {}", store.path().display());
            } else {
                println!("Сессии не было");
            }
        }
        Command::Whoami => match client.session() {
            Some(session) => print_session("Текущий пользователь", session),
            None => println!("Вход не выполнен"),
        },
        Command::Categories => {
            let categories = client.categories().await.map_err(map_client_error)?;
            print_categories(&categories);
        }
        Command::CategoryAdd {
            name,
            subcategories,
        } => {
            client
                .create_category(&name, &subcategories)
                .await
                .map_err(map_client_error)?;
            println!("Категория создана: {name}");
        }
        Command::CategoryRemove { name } => {
            client
                .delete_category(&name)
                .await
                .map_err(map_client_error)?;
            println!("Категория удалена: {name}");
        }
        Command::List {
            category,
            subcategory,
            search,
            sort,
            page,
        } => {
            let mut state = ListingState::default();
            state.set_sort(sort.into());
            if let Some(search) = search {
                state.set_search(search);
            }
            state.page = page.max(1);

            let (names, posts) = client
                .list_posts(&category, &subcategory, &state)
                .await
                .map_err(map_client_error)?;
            println!("{} / {}", names.category, names.subcategory);
            print_page(&posts, state.page);
        }
        Command::Featured => {
            let featured = client.featured_posts().await.map_err(map_client_error)?;
            print_featured(&featured);
        }
        Command::Get {
            id,
            category,
            subcategory,
        } => {
            let post = match (category, subcategory) {
                (Some(category), Some(subcategory)) => {
                    client.get_post(&category, &subcategory, id).await
                }
                _ => client.get_post_by_id(id).await,
            }
            .map_err(map_client_error)?;
            print_post(&post);
        }
        Command::Create {
            title,
            content,
            content_file,
            description,
            category,
            subcategory,
            thumbnail,
        } => {
            let content = read_content(content, content_file.as_deref())?
                .ok_or_else(|| anyhow!("укажите --content или --content-file"))?;
            client
                .create_post(PostDraft {
                    title,
                    description,
                    content,
                    category,
                    subcategory,
                    thumbnail,
                })
                .await
                .map_err(map_client_error)?;
            println!("Пост создан");
        }
        Command::Update {
            id,
            title,
            content,
            content_file,
            description,
            category,
            subcategory,
            thumbnail,
        } => {
            let current = client.get_post_by_id(id).await.map_err(map_client_error)?;
            let mut draft = PostDraft::from_post(&current);
            if let Some(content) = read_content(content, content_file.as_deref())? {
                draft.content = content;
            }
            draft.title = title.unwrap_or(draft.title);
            draft.description = description.unwrap_or(draft.description);
            draft.category = category.unwrap_or(draft.category);
            draft.subcategory = subcategory.unwrap_or(draft.subcategory);
            draft.thumbnail = thumbnail.unwrap_or(draft.thumbnail);

            client
                .update_post(id, draft)
                .await
                .map_err(map_client_error)?;
            println!("Пост обновлён: id={id}");
        }
        Command::Delete { id } => {
            client.delete_post(id).await.map_err(map_client_error)?;
            println!("Пост удалён: id={id}");
        }
        Command::Like { id } => {
            client.like_post(id).await.map_err(map_client_error)?;
            println!("Лайк отправлен: id={id}");
        }
        Command::Comment { post_id, content } => {
            client
                .add_comment(post_id, &content)
                .await
                .map_err(map_client_error)?;
            println!("Комментарий добавлен к посту id={post_id}");
        }
        Command::Uncomment { id } => {
            client.delete_comment(id).await.map_err(map_client_error)?;
            println!("Комментарий удалён: id={id}");
        }
        Command::Upload { path, mime } => {
            let bytes =
                fs::read(&path).with_context(|| format!("не удалось прочитать {}", path.display()))?;
            let file_name = path
                .file_name()
                .and_then(|name| name.to_str())
                .unwrap_or("upload")
                .to_string();
            let mime = mime.unwrap_or_else(|| guess_mime(&path));
            let url = client
                .upload(&file_name, bytes, &mime)
                .await
                .map_err(map_client_error)?;
            println!("{url}");
        }
    }

    Ok(())
}

fn read_content(content: Option<String>, file: Option<&Path>) -> Result<Option<String>> {
    match (content, file) {
        (Some(content), _) => Ok(Some(content)),
        (None, Some(path)) => fs::read_to_string(path)
            .map(Some)
            .with_context(|| format!("не удалось прочитать {}", path.display())),
        (None, None) => Ok(None),
    }
}

fn guess_mime(path: &Path) -> String {
    mime_guess::from_path(path).first_or_octet_stream().to_string()
}

fn map_client_error(err: BlogClientError) -> anyhow::Error {
    let message = match err {
        BlogClientError::Unauthorized => {
            "требуется авторизация: выполните `blog-cli login ...`".to_string()
        }
        BlogClientError::Forbidden => "недостаточно прав".to_string(),
        BlogClientError::NotFound => "ресурс не найден".to_string(),
        BlogClientError::InvalidRequest(message) => format!("некорректный запрос: {message}"),
        BlogClientError::Validation(err) => format!("ошибка ввода: {err}"),
        BlogClientError::Upload(message) => format!("ошибка загрузки: {message}"),
        BlogClientError::Http(err) => format!("ошибка HTTP: {err}"),
    };
    anyhow!(message)
}

fn print_session(title: &str, session: &Session) {
    println!("{title}");
    println!("  id: {}", session.user.id);
    println!("  username: {}", session.user.username);
    if let Some(email) = &session.user.email {
        println!("  email: {email}");
    }
    println!("  role: {:?}", session.user.role);
}

fn print_categories(categories: &[Category]) {
    if categories.is_empty() {
        println!("Категорий нет");
        return;
    }
    for category in categories {
        println!("{}", category.category);
        for subcategory in &category.subcategories {
            println!("  - {subcategory}");
        }
    }
}

fn print_featured(featured: &FeaturedPosts) {
    for section in &featured.sections {
        println!("{} ({})", section.category, section.posts.len());
        for post in &section.posts {
            println!("  - [{}] {} / {}", post.id, post.subcategory, post.title);
        }
    }
}

fn print_post(post: &Post) {
    println!("id: {}", post.id);
    println!("title: {}", post.title);
    println!("category: {} / {}", post.category, post.subcategory);
    println!("created_at: {}", post.created_at.format("%Y-%m-%d %H:%M"));
    println!("likes: {}", post.likes_count);
    if !post.thumbnail.is_empty() {
        println!("thumbnail: {}", post.thumbnail);
    }
    if !post.description.is_empty() {
        println!("description: {}", post.description);
    }
    println!("content:\n{}", post.content);

    println!("comments ({}):", post.comment_total());
    for comment in &post.comments {
        println!(
            "  [{}] {} {}: {}",
            comment.id,
            comment.created_at.format("%Y-%m-%d %H:%M"),
            comment.user_name,
            comment.content
        );
    }
}

fn print_page(page: &PostPage, current: u32) {
    if page.items.is_empty() {
        println!("Постов нет");
        return;
    }

    println!("Постов: {} (всего {})", page.items.len(), page.total);
    for post in &page.items {
        println!(
            "- [{}] {} ({}, likes={}, comments={})",
            post.id,
            post.title,
            post.created_at.format("%Y-%m-%d"),
            post.likes_count,
            post.comment_total()
        );
    }

    let window = PageWindow::new(current, total_pages(page.total, PER_PAGE));
    if window.is_visible() {
        println!("{}", render_page_window(&window, current));
    }
}

/// Строка пагинации: `1 … 11 [12] 13 … 40`.
fn render_page_window(window: &PageWindow, current: u32) -> String {
    let mut parts = Vec::new();
    if window.show_first() {
        parts.push("1".to_string());
    }
    if window.leading_ellipsis() {
        parts.push("…".to_string());
    }
    for page in window.pages() {
        if page == current {
            parts.push(format!("[{page}]"));
        } else {
            parts.push(page.to_string());
        }
    }
    if window.trailing_ellipsis() {
        parts.push("…".to_string());
    }
    if window.show_last() {
        parts.push(window.total_pages.to_string());
    }
    parts.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_window_line_for_first_window() {
        let window = PageWindow::new(3, 25);
        assert_eq!(
            render_page_window(&window, 3),
            "1 2 [3] 4 5 6 7 8 9 10 … 25"
        );
    }

    #[test]
    fn page_window_line_for_middle_window() {
        let window = PageWindow::new(12, 40);
        assert_eq!(
            render_page_window(&window, 12),
            "1 … 11 [12] 13 14 15 16 17 18 19 20 … 40"
        );
    }

    #[test]
    fn page_window_line_for_last_window() {
        let window = PageWindow::new(21, 21);
        assert_eq!(render_page_window(&window, 21), "1 … [21]");
    }

    #[test]
    fn guess_mime_by_extension() {
        assert_eq!(guess_mime(Path::new("a/b/cat.PNG")), "image/png");
        assert_eq!(guess_mime(Path::new("photo.jpeg")), "image/jpeg");
        assert_eq!(guess_mime(Path::new("docs/report.pdf")), "application/pdf");
        assert_eq!(guess_mime(Path::new("notes")), "application/octet-stream");
    }

    #[test]
    fn read_content_prefers_inline_text() {
        let dir = tempfile::tempdir().expect("tempdir");
        let file = dir.path().join("body.html");
        fs::write(&file, "<p>from file</p>").expect("write");

        let inline = read_content(Some("<p>inline</p>".to_string()), Some(&file)).expect("read");
        assert_eq!(inline.as_deref(), Some("<p>inline</p>"));

        let from_file = read_content(None, Some(&file)).expect("read");
        assert_eq!(from_file.as_deref(), Some("<p>from file</p>"));

        assert!(read_content(None, None).expect("read").is_none());
    }

    #[test]
    fn cli_parses_list_with_defaults() {
        let cli = Cli::try_parse_from(["blog-cli", "list", "study", "jsp-mvc"]).expect("parse");
        match cli.command {
            Command::List {
                category,
                sort,
                page,
                search,
                ..
            } => {
                assert_eq!(category, "study");
                assert!(matches!(sort, SortArg::Latest));
                assert_eq!(page, 1);
                assert!(search.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn cli_get_requires_both_route_parts() {
        assert!(Cli::try_parse_from(["blog-cli", "get", "--id", "3", "--category", "Study"]).is_err());
        assert!(
            Cli::try_parse_from([
                "blog-cli",
                "get",
                "--id",
                "3",
                "--category",
                "Study",
                "--subcategory",
                "JSP MVC"
            ])
            .is_ok()
        );
    }
}
