//! Клиент против фейкового backend на axum, поднятого в том же процессе.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::extract::{Multipart, Path, Query, State};
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde_json::{Value, json};

use blog_client::forms::{PostDraft, RegisterForm};
use blog_client::listing::{ListingState, SortOrder};
use blog_client::{BlogClient, BlogClientError, Role, Session, User};

const TOKEN: &str = "test-token";
const PASSWORD: &str = "secret-pass";

#[derive(Default)]
struct Store {
    categories: Vec<Value>,
    categories_down: bool,
    posts: Vec<Value>,
    next_id: i64,
    last_list_query: HashMap<String, String>,
    last_post_path: Option<(String, String)>,
    like_auth: Vec<bool>,
    uploads: Vec<(String, usize)>,
}

type Shared = Arc<Mutex<Store>>;
type Reply = (StatusCode, Json<Value>);

impl Store {
    fn seeded() -> Self {
        let mut store = Self {
            categories: vec![
                json!({"category": "Study", "subcategories": ["react.js", "JSP MVC"]}),
                json!({"category": "Travel", "subcategories": ["jeju"]}),
            ],
            next_id: 1,
            ..Self::default()
        };
        for n in 1..=12 {
            store.insert_post(json!({
                "title": format!("mvc note {n}"),
                "description": "notes",
                "content": "<p>body</p>",
                "category": "Study",
                "subcategory": "JSP MVC",
                "thumbnail": null,
            }));
        }
        store
    }

    fn insert_post(&mut self, mut body: Value) -> i64 {
        let id = self.next_id;
        self.next_id += 1;
        body["id"] = json!(id);
        body["likes_count"] = json!(0);
        body["comments"] = json!([]);
        body["created_at"] = json!(format!("2025-01-{:02} 09:00:00", (id % 28) + 1));
        self.posts.push(body);
        id
    }

    fn post_mut(&mut self, id: i64) -> Option<&mut Value> {
        self.posts.iter_mut().find(|post| post["id"] == json!(id))
    }
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        == Some(&format!("Bearer {TOKEN}"))
}

fn reply(status: StatusCode, body: Value) -> Reply {
    (status, Json(body))
}

fn unauthorized() -> Reply {
    reply(StatusCode::UNAUTHORIZED, json!({"message": "login required"}))
}

fn not_found() -> Reply {
    reply(StatusCode::NOT_FOUND, json!({"message": "post not found"}))
}

async fn list_categories(State(store): State<Shared>) -> Reply {
    let store = store.lock().expect("store lock");
    if store.categories_down {
        return reply(StatusCode::INTERNAL_SERVER_ERROR, json!({"error": "db down"}));
    }
    reply(StatusCode::OK, json!(store.categories))
}

async fn create_category(
    State(store): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Reply {
    if !authorized(&headers) {
        return unauthorized();
    }
    store.lock().expect("store lock").categories.push(body);
    reply(StatusCode::CREATED, json!({"message": "created"}))
}

async fn delete_category(
    State(store): State<Shared>,
    headers: HeaderMap,
    Path(name): Path<String>,
) -> Reply {
    if !authorized(&headers) {
        return unauthorized();
    }
    let mut store = store.lock().expect("store lock");
    let before = store.categories.len();
    store.categories.retain(|c| c["category"] != json!(name));
    if store.categories.len() == before {
        return reply(StatusCode::NOT_FOUND, json!({"message": "no such category"}));
    }
    reply(StatusCode::OK, json!({"message": "deleted"}))
}

async fn list_posts(
    State(store): State<Shared>,
    Query(query): Query<HashMap<String, String>>,
) -> Reply {
    let mut store = store.lock().expect("store lock");
    store.last_list_query = query.clone();

    let category = query.get("category").cloned().unwrap_or_default();
    let subcategory = query.get("subcategory").cloned().unwrap_or_default();
    let search = query.get("search").cloned().unwrap_or_default();
    let page: usize = query.get("page").and_then(|v| v.parse().ok()).unwrap_or(1);
    let per_page: usize = query.get("per_page").and_then(|v| v.parse().ok()).unwrap_or(9);

    let mut matching: Vec<Value> = store
        .posts
        .iter()
        .filter(|p| p["category"] == json!(category) && p["subcategory"] == json!(subcategory))
        .filter(|p| p["title"].as_str().unwrap_or_default().contains(&search))
        .cloned()
        .collect();
    matching.sort_by_key(|p| p["id"].as_i64().unwrap_or_default());
    if query.get("sort").map(String::as_str) != Some("asc_created") {
        matching.reverse();
    }

    let total = matching.len();
    let items: Vec<Value> = matching
        .into_iter()
        .skip((page - 1) * per_page)
        .take(per_page)
        .collect();
    reply(StatusCode::OK, json!({"items": items, "total": total}))
}

async fn featured_posts() -> impl IntoResponse {
    (
        [(CONTENT_TYPE, "application/json")],
        r#"{"Travel":[{"id":20,"title":"Jeju","thumbnail":"/t.png","subcategory":"jeju"}],
            "Study":[{"id":1,"title":"mvc note 1","subcategory":"JSP MVC"}]}"#,
    )
}

async fn get_post_by_id(State(store): State<Shared>, Path(id): Path<i64>) -> Reply {
    let mut store = store.lock().expect("store lock");
    match store.post_mut(id) {
        Some(post) => reply(StatusCode::OK, post.clone()),
        None => not_found(),
    }
}

async fn get_post(
    State(store): State<Shared>,
    Path((category, subcategory, id)): Path<(String, String, i64)>,
) -> Reply {
    let mut store = store.lock().expect("store lock");
    store.last_post_path = Some((category, subcategory));
    match store.post_mut(id) {
        Some(post) => reply(StatusCode::OK, post.clone()),
        None => not_found(),
    }
}

async fn create_post(
    State(store): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Reply {
    if !authorized(&headers) {
        return unauthorized();
    }
    let id = store.lock().expect("store lock").insert_post(body);
    reply(StatusCode::CREATED, json!({"id": id}))
}

async fn update_post(
    State(store): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Reply {
    if !authorized(&headers) {
        return unauthorized();
    }
    let mut store = store.lock().expect("store lock");
    let Some(post) = store.post_mut(id) else {
        return not_found();
    };
    for key in ["title", "description", "content", "category", "subcategory", "thumbnail"] {
        post[key] = body[key].clone();
    }
    reply(StatusCode::OK, json!({"message": "updated"}))
}

async fn delete_post(State(store): State<Shared>, headers: HeaderMap, Path(id): Path<i64>) -> Reply {
    if !authorized(&headers) {
        return unauthorized();
    }
    let mut store = store.lock().expect("store lock");
    store.posts.retain(|p| p["id"] != json!(id));
    reply(StatusCode::OK, json!({"message": "deleted"}))
}

async fn like_post(State(store): State<Shared>, headers: HeaderMap, Path(id): Path<i64>) -> Reply {
    let mut store = store.lock().expect("store lock");
    store.like_auth.push(authorized(&headers));
    let Some(post) = store.post_mut(id) else {
        return not_found();
    };
    let likes = post["likes_count"].as_i64().unwrap_or_default() + 1;
    post["likes_count"] = json!(likes);
    reply(StatusCode::OK, json!({"likes_count": likes}))
}

async fn create_comment(
    State(store): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Reply {
    if !authorized(&headers) {
        return unauthorized();
    }
    let mut store = store.lock().expect("store lock");
    let comment_id = store.next_id;
    store.next_id += 1;
    let post_id = body["post_id"].as_i64().unwrap_or_default();
    let Some(post) = store.post_mut(post_id) else {
        return not_found();
    };
    let comments = post["comments"].as_array_mut().expect("comments array");
    comments.push(json!({
        "id": comment_id,
        "user_name": "bin",
        "content": body["content"],
        "created_at": "2025-02-01T12:30:00Z",
    }));
    reply(StatusCode::CREATED, json!({"id": comment_id}))
}

async fn delete_comment(
    State(store): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Reply {
    if !authorized(&headers) {
        return unauthorized();
    }
    let mut store = store.lock().expect("store lock");
    for post in &mut store.posts {
        if let Some(comments) = post["comments"].as_array_mut() {
            comments.retain(|c| c["id"] != json!(id));
        }
    }
    reply(StatusCode::OK, json!({"message": "deleted"}))
}

async fn upload(State(store): State<Shared>, headers: HeaderMap, mut multipart: Multipart) -> Reply {
    if !authorized(&headers) {
        return reply(StatusCode::FORBIDDEN, json!({"message": "forbidden"}));
    }
    while let Ok(Some(field)) = multipart.next_field().await {
        if field.name() != Some("file") {
            continue;
        }
        let name = field.file_name().unwrap_or("blob").to_string();
        let size = field.bytes().await.map(|b| b.len()).unwrap_or_default();
        store.lock().expect("store lock").uploads.push((name.clone(), size));
        if name == "nourl.png" {
            return reply(StatusCode::OK, json!({}));
        }
        return reply(StatusCode::OK, json!({"url": format!("/uploads/{name}")}));
    }
    reply(StatusCode::BAD_REQUEST, json!({"message": "file field is required"}))
}

async fn login(Json(body): Json<Value>) -> Reply {
    if body["password"] != json!(PASSWORD) {
        return reply(StatusCode::UNAUTHORIZED, json!({"message": "invalid credentials"}));
    }
    reply(
        StatusCode::OK,
        json!({
            "token": TOKEN,
            "user": {"id": 1, "username": body["username"], "role": "master"},
        }),
    )
}

async fn register(Json(body): Json<Value>) -> Reply {
    if body.get("password_confirm").is_some() {
        return reply(StatusCode::BAD_REQUEST, json!({"message": "unexpected field"}));
    }
    if body["username"] == json!("taken") {
        return reply(StatusCode::CONFLICT, json!({"message": "username already exists"}));
    }
    reply(StatusCode::CREATED, json!({"message": "registered"}))
}

fn router(store: Shared) -> Router {
    Router::new()
        .route("/api/categories", get(list_categories).post(create_category))
        .route("/api/categories/{key}", delete(delete_category))
        .route("/api/posts", get(list_posts).post(create_post))
        .route("/api/posts/featured", get(featured_posts))
        .route("/api/posts/id/{id}", get(get_post_by_id))
        .route("/api/posts/{key}", axum::routing::put(update_post).delete(delete_post))
        .route("/api/posts/{key}/like", post(like_post))
        .route("/api/posts/{key}/{sub}/{id}", get(get_post))
        .route("/api/comments", post(create_comment))
        .route("/api/comments/{key}", delete(delete_comment))
        .route("/api/uploads", post(upload))
        .route("/api/login", post(login))
        .route("/api/register", post(register))
        .with_state(store)
}

async fn spawn_backend() -> (String, Shared) {
    let store = Arc::new(Mutex::new(Store::seeded()));
    let app = router(store.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("test server");
    });

    (format!("http://{addr}/api"), store)
}

async fn logged_in_client(base_url: &str) -> BlogClient {
    let mut client = BlogClient::new(base_url).expect("client");
    client.login("bin", PASSWORD).await.expect("login");
    client
}

fn draft(title: &str) -> PostDraft {
    PostDraft {
        title: title.to_string(),
        description: "desc".to_string(),
        content: "<p>hello</p>".to_string(),
        category: "Travel".to_string(),
        subcategory: "jeju".to_string(),
        thumbnail: String::new(),
    }
}

#[tokio::test]
async fn login_stores_session_for_protected_calls() {
    let (base_url, store) = spawn_backend().await;
    let mut client = BlogClient::new(&base_url).expect("client");

    let err = client.create_post(draft("early")).await.expect_err("no session yet");
    assert!(matches!(err, BlogClientError::Unauthorized));

    let err = client.login("bin", "wrong").await.expect_err("bad password");
    assert!(matches!(err, BlogClientError::Unauthorized));
    assert!(client.session().is_none());

    let session = client.login("bin", PASSWORD).await.expect("login");
    assert_eq!(session.token, TOKEN);
    assert_eq!(session.user.role, Role::Master);

    client.create_post(draft("  Jeju trip  ")).await.expect("create");
    let store = store.lock().expect("store lock");
    let created = store.posts.last().expect("post stored");
    assert_eq!(created["title"], "Jeju trip");
    assert_eq!(created["subcategory"], "jeju");
}

#[tokio::test]
async fn list_posts_resolves_names_and_paginates() {
    let (base_url, store) = spawn_backend().await;
    let client = BlogClient::new(&base_url).expect("client");

    let mut state = ListingState::default();
    state.set_sort(SortOrder::Oldest);
    state.go_to(2, 2);

    let (names, page) = client
        .list_posts("study", "jsp-mvc", &state)
        .await
        .expect("list");
    assert_eq!(names.category, "Study");
    assert_eq!(names.subcategory, "JSP MVC");
    assert_eq!(page.total, 12);
    assert_eq!(page.items.len(), 3);
    assert_eq!(page.items[0].title, "mvc note 10");
    assert_eq!(page.items[0].thumbnail, "");

    let query = store.lock().expect("store lock").last_list_query.clone();
    assert_eq!(query.get("sort").map(String::as_str), Some("asc_created"));
    assert_eq!(query.get("per_page").map(String::as_str), Some("9"));
    assert_eq!(query.get("page").map(String::as_str), Some("2"));
    assert!(!query.contains_key("search"));
}

#[tokio::test]
async fn list_posts_sends_search_and_falls_back_to_url_names() {
    let (base_url, store) = spawn_backend().await;
    let client = BlogClient::new(&base_url).expect("client");

    let mut state = ListingState::default();
    state.set_search("note 1");
    let (_, page) = client
        .list_posts("study", "jsp-mvc", &state)
        .await
        .expect("list");
    // note 1, note 10, note 11, note 12
    assert_eq!(page.total, 4);
    assert_eq!(page.items[0].title, "mvc note 12");

    store.lock().expect("store lock").categories_down = true;
    let (names, page) = client
        .list_posts("study", "jsp-mvc", &ListingState::default())
        .await
        .expect("list without categories");
    assert_eq!(names.category, "study");
    assert_eq!(names.subcategory, "jsp-mvc");
    assert_eq!(page.total, 0);
}

#[tokio::test]
async fn featured_sections_keep_server_order() {
    let (base_url, _store) = spawn_backend().await;
    let client = BlogClient::new(&base_url).expect("client");

    let featured = client.featured_posts().await.expect("featured");
    let names: Vec<&str> = featured
        .sections
        .iter()
        .map(|section| section.category.as_str())
        .collect();
    assert_eq!(names, ["Travel", "Study"]);
    assert_eq!(featured.sections[0].posts[0].thumbnail, "/t.png");
}

#[tokio::test]
async fn post_detail_comments_and_likes() {
    let (base_url, store) = spawn_backend().await;
    let client = logged_in_client(&base_url).await;

    let post = client.get_post("Study", "JSP MVC", 3).await.expect("post");
    assert_eq!(post.title, "mvc note 3");
    assert!(post.comments.is_empty());
    assert_eq!(
        store.lock().expect("store lock").last_post_path,
        Some(("Study".to_string(), "JSP MVC".to_string()))
    );

    let err = client.add_comment(3, "   ").await.expect_err("blank comment");
    assert!(matches!(err, BlogClientError::Validation(_)));

    client.add_comment(3, "great post").await.expect("comment");
    client.like_post(3).await.expect("like");

    let post = client.get_post("Study", "JSP MVC", 3).await.expect("post");
    assert_eq!(post.likes_count, 1);
    assert_eq!(post.comments.len(), 1);
    assert_eq!(post.comments[0].user_name, "bin");

    client
        .delete_comment(post.comments[0].id)
        .await
        .expect("delete comment");
    let post = client.get_post_by_id(3).await.expect("post");
    assert!(post.comments.is_empty());
}

#[tokio::test]
async fn like_without_session_sends_no_token() {
    let (base_url, store) = spawn_backend().await;
    let anonymous = BlogClient::new(&base_url).expect("client");
    anonymous.like_post(1).await.expect("anonymous like");

    let client = logged_in_client(&base_url).await;
    client.like_post(1).await.expect("like");

    assert_eq!(store.lock().expect("store lock").like_auth, vec![false, true]);
}

#[tokio::test]
async fn update_and_delete_post() {
    let (base_url, _store) = spawn_backend().await;
    let client = logged_in_client(&base_url).await;

    let mut edited = PostDraft::from_post(&client.get_post_by_id(5).await.expect("post"));
    edited.title = "renamed".to_string();
    client.update_post(5, edited).await.expect("update");
    assert_eq!(client.get_post_by_id(5).await.expect("post").title, "renamed");

    client.delete_post(5).await.expect("delete");
    let err = client.get_post_by_id(5).await.expect_err("gone");
    assert!(matches!(err, BlogClientError::NotFound));
}

#[tokio::test]
async fn upload_returns_url_or_fails() {
    let (base_url, store) = spawn_backend().await;

    let anonymous = BlogClient::new(&base_url).expect("client");
    let err = anonymous
        .upload("a.png", vec![1, 2, 3], "image/png")
        .await
        .expect_err("needs session");
    assert!(matches!(err, BlogClientError::Unauthorized));

    let client = logged_in_client(&base_url).await;
    let url = client
        .upload("cat.png", vec![0; 16], "image/png")
        .await
        .expect("upload");
    assert_eq!(url, "/uploads/cat.png");

    let err = client
        .upload("nourl.png", vec![0; 4], "image/png")
        .await
        .expect_err("missing url");
    assert!(matches!(err, BlogClientError::Upload(_)));

    let uploads = store.lock().expect("store lock").uploads.clone();
    assert_eq!(uploads[0], ("cat.png".to_string(), 16));
}

#[tokio::test]
async fn upload_with_stale_token_asks_to_log_in_again() {
    let (base_url, store) = spawn_backend().await;

    let mut client = BlogClient::new(&base_url).expect("client");
    client.set_session(Session::new(
        "stale",
        User {
            id: 1,
            username: "bin".to_string(),
            email: None,
            role: Role::Master,
        },
    ));

    let err = client
        .upload("cat.png", vec![0; 8], "image/png")
        .await
        .expect_err("stale token");
    match err {
        BlogClientError::Upload(message) => {
            assert_eq!(message, "upload is not permitted, please log in again");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(store.lock().expect("store lock").uploads.is_empty());
}

#[tokio::test]
async fn error_field_in_body_becomes_message() {
    let (base_url, store) = spawn_backend().await;
    store.lock().expect("store lock").categories_down = true;

    let client = BlogClient::new(&base_url).expect("client");
    match client.categories().await.expect_err("categories down") {
        BlogClientError::InvalidRequest(message) => assert_eq!(message, "db down"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn register_validates_before_sending() {
    let (base_url, _store) = spawn_backend().await;
    let client = BlogClient::new(&base_url).expect("client");

    let form = |username: &str, password: &str| RegisterForm {
        username: username.to_string(),
        email: "bin@example.com".to_string(),
        password: password.to_string(),
        password_confirm: password.to_string(),
    };

    let err = client.register(form("bin", "short")).await.expect_err("short password");
    assert!(matches!(err, BlogClientError::Validation(_)));

    match client.register(form("taken", "long-enough")).await {
        Err(BlogClientError::InvalidRequest(message)) => {
            assert_eq!(message, "username already exists");
        }
        other => panic!("unexpected result: {other:?}"),
    }

    client
        .register(form("newbie", "long-enough"))
        .await
        .expect("register");
}

#[tokio::test]
async fn category_management() {
    let (base_url, store) = spawn_backend().await;
    let client = logged_in_client(&base_url).await;

    client
        .create_category("Album", &["daily".to_string(), "food".to_string()])
        .await
        .expect("create category");
    let categories = client.categories().await.expect("categories");
    assert_eq!(categories.len(), 3);
    assert_eq!(categories[2].subcategories, ["daily", "food"]);

    client.delete_category("Album").await.expect("delete category");
    let err = client.delete_category("Album").await.expect_err("already gone");
    assert!(matches!(err, BlogClientError::NotFound));
    assert_eq!(store.lock().expect("store lock").categories.len(), 2);
}
