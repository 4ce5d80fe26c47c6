use blog_client::Post;
use blog_client::listing::{
    CanonicalNames, ListingState, PER_PAGE, SortOrder, resolve_canonical, total_pages,
};
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::components::A;
use leptos_router::hooks::{use_location, use_navigate, use_params_map, use_query_map};

use crate::components::pagination::Pagination;
use crate::pages::{begin_request, is_current_request};
use crate::request_seq::RequestSeq;
use crate::{api, logger, routes};

fn encode_query(pairs: &[(&'static str, String)]) -> String {
    pairs
        .iter()
        .map(|(key, value)| format!("{key}={}", String::from(js_sys::encode_uri_component(value))))
        .collect::<Vec<_>>()
        .join("&")
}

/// Категория и подкатегория с сервера, а если список категорий недоступен,
/// то как в адресе.
async fn resolve_names(url_category: &str, url_subcategory: &str) -> CanonicalNames {
    match api::categories().await {
        Ok(list) => resolve_canonical(&list, url_category, url_subcategory),
        Err(err) => {
            logger::warn("post_list", &format!("category list unavailable: {err}"));
            CanonicalNames::from_url(url_category, url_subcategory)
        }
    }
}

#[component]
pub(crate) fn PostListPage() -> impl IntoView {
    let params = use_params_map();
    let query = use_query_map();
    let location = use_location();
    let navigate = use_navigate();

    let url_category = Memo::new(move |_| params.with(|p| p.get("category").unwrap_or_default()));
    let url_subcategory =
        Memo::new(move |_| params.with(|p| p.get("subcategory").unwrap_or_default()));
    let listing = Memo::new(move |_| {
        query.with(|q| {
            ListingState::from_query(
                q.get("page").as_deref(),
                q.get("q").as_deref(),
                q.get("sort").as_deref(),
            )
        })
    });

    let posts = RwSignal::new(Vec::<Post>::new());
    let total = RwSignal::new(0_u64);
    let loading = RwSignal::new(true);
    let request_seq = StoredValue::new(RequestSeq::default());
    let pages = Memo::new(move |_| total_pages(total.get(), PER_PAGE));

    Effect::new(move |_| {
        let category = url_category.get();
        let subcategory = url_subcategory.get();
        let state = listing.get();

        let ticket = begin_request(request_seq);
        loading.set(true);

        spawn_local(async move {
            let names = resolve_names(&category, &subcategory).await;
            let result = api::list_posts(&state.to_request(&names)).await;
            if !is_current_request(request_seq, ticket) {
                return;
            }
            match result {
                Ok(page) => {
                    posts.set(page.items);
                    total.set(page.total);
                }
                Err(err) => {
                    logger::error("post_list", &format!("failed to load posts: {err}"));
                    posts.set(Vec::new());
                    total.set(0);
                }
            }
            loading.set(false);
        });
    });

    let push_state = Callback::new({
        let navigate = navigate.clone();
        move |next: ListingState| {
            let path = location.pathname.get_untracked();
            let query = encode_query(&next.query_pairs());
            let url = if query.is_empty() {
                path
            } else {
                format!("{path}?{query}")
            };
            navigate(&url, Default::default());
        }
    });

    let on_search = move |ev| {
        let mut next = listing.get_untracked();
        next.set_search(event_target_value(&ev));
        push_state.run(next);
    };

    let on_sort = move |ev| {
        let mut next = listing.get_untracked();
        next.set_sort(SortOrder::from_query(Some(event_target_value(&ev).as_str())));
        push_state.run(next);
    };

    let on_go = Callback::new(move |target: i64| {
        let mut next = listing.get_untracked();
        next.go_to(target, pages.get_untracked());
        push_state.run(next);
    });

    let on_back = move |_| navigate(routes::HOME, Default::default());

    let cards = move || {
        let category = url_category.get();
        let subcategory = url_subcategory.get();
        posts
            .get()
            .into_iter()
            .map(|post| {
                let href = routes::post_href(&category, &subcategory, post.id);
                let date = post.created_at.format("%Y-%m-%d").to_string();
                let comments = post.comment_total();
                let thumbnail = (!post.thumbnail.is_empty()).then(|| {
                    view! { <img class="thumbnail" src=post.thumbnail.clone() alt=post.title.clone() /> }
                });
                view! {
                    <A href=href attr:class="post-card">
                        {thumbnail}
                        <div class="post-card-content">
                            <h3 class="post-title">{post.title}</h3>
                            <p class="post-desc">{post.description}</p>
                            <p class="post-meta">
                                {format!("❤️ {} · 💬 {} · {date}", post.likes_count, comments)}
                            </p>
                        </div>
                    </A>
                }
            })
            .collect_view()
    };

    view! {
        <div class="post-list card">
            <button class="back-btn" on:click=on_back>"← Назад"</button>
            <h2 class="title">{move || format!("{}: записи", url_subcategory.get())}</h2>

            <div class="filters">
                <input
                    class="search-input"
                    type="text"
                    placeholder="Поиск..."
                    prop:value=move || listing.with(|l| l.search.clone())
                    on:input=on_search
                />
                <select class="sort-select" on:change=on_sort>
                    <option value="latest" prop:selected=move || listing.with(|l| l.sort == SortOrder::Latest)>
                        "Сначала новые"
                    </option>
                    <option value="oldest" prop:selected=move || listing.with(|l| l.sort == SortOrder::Oldest)>
                        "Сначала старые"
                    </option>
                </select>
            </div>

            <Show
                when=move || !loading.get()
                fallback=|| view! { <p class="loading">"Загрузка..."</p> }
            >
                <Show
                    when=move || posts.with(|p| !p.is_empty())
                    fallback=|| view! { <p class="no-post">"Записей нет."</p> }
                >
                    <div class="post-grid">{cards}</div>
                </Show>
                <Pagination
                    page=Signal::derive(move || listing.with(|l| l.page))
                    total_pages=Signal::derive(move || pages.get())
                    on_go=on_go
                />
            </Show>
        </div>
    }
}
