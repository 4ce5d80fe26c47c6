use blog_client::access::can_delete_comment;
use blog_client::forms::validate_comment;
use blog_client::{Comment, Post};
use leptos::ev::SubmitEvent;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::{use_navigate, use_params_map};

use crate::pages::{alert, begin_request, confirm, go_back, is_current_request};
use crate::request_seq::RequestSeq;
use crate::state::{AppState, use_app_state};
use crate::{api, logger, routes};

#[derive(Debug, Clone, PartialEq)]
struct PostRoute {
    category: String,
    subcategory: String,
    id: Option<i64>,
}

fn comment_item(state: AppState, comment: Comment, on_delete: Callback<i64>) -> impl IntoView {
    let deletable = can_delete_comment(state.user().as_ref(), &comment);
    let id = comment.id;
    let when = comment.created_at.format("%Y-%m-%d %H:%M").to_string();

    view! {
        <div class="comment">
            <div class="comment-meta">
                <strong>{comment.user_name}</strong>
                {format!(" · {when}")}
                {deletable.then(|| view! {
                    <button class="comment-delete" on:click=move |_| on_delete.run(id)>"Удалить"</button>
                })}
            </div>
            <div class="comment-content">{comment.content}</div>
        </div>
    }
}

#[component]
pub(crate) fn PostDetailPage() -> impl IntoView {
    let state = use_app_state();
    let params = use_params_map();
    let navigate = use_navigate();

    let route = Memo::new(move |_| {
        params.with(|p| PostRoute {
            category: p.get("category").unwrap_or_default(),
            subcategory: p.get("subcategory").unwrap_or_default(),
            id: p.get("post_id").and_then(|id| id.trim().parse::<i64>().ok()),
        })
    });

    let post = RwSignal::new(None::<Post>);
    let missing = RwSignal::new(false);
    let comment_text = RwSignal::new(String::new());
    let busy = RwSignal::new(false);
    let request_seq = StoredValue::new(RequestSeq::default());

    let reload = move || {
        let PostRoute {
            category,
            subcategory,
            id,
        } = route.get_untracked();
        let ticket = begin_request(request_seq);
        let Some(id) = id else {
            missing.set(true);
            return;
        };
        spawn_local(async move {
            let result = api::get_post(&category, &subcategory, id).await;
            if !is_current_request(request_seq, ticket) {
                return;
            }
            match result {
                Ok(loaded) => {
                    missing.set(false);
                    post.set(Some(loaded));
                }
                Err(err) => {
                    logger::error("post_detail", &format!("failed to load post {id}: {err}"));
                    if err.status() == Some(404) {
                        missing.set(true);
                    } else {
                        state.set_error(err.to_string());
                    }
                }
            }
        });
    };

    Effect::new(move |_| {
        route.track();
        post.set(None);
        reload();
    });

    let post_id = move || post.with_untracked(|p| p.as_ref().map(|p| p.id));

    let on_like = move |_| {
        let Some(id) = post_id() else {
            return;
        };
        post.update(|p| {
            if let Some(p) = p {
                p.likes_count += 1;
            }
        });
        let token = state.token();
        spawn_local(async move {
            if let Err(err) = api::like_post(token.as_deref(), id).await {
                logger::error("post_detail", &format!("like failed: {err}"));
                post.update(|p| {
                    if let Some(p) = p {
                        p.likes_count = p.likes_count.saturating_sub(1);
                    }
                });
            }
        });
    };

    let on_comment = move |ev: SubmitEvent| {
        ev.prevent_default();
        let content = comment_text.get_untracked();
        if validate_comment(&content).is_err() {
            alert("Введите текст комментария.");
            return;
        }
        let Some(token) = state.token() else {
            alert("Войдите, чтобы оставить комментарий.");
            return;
        };
        let Some(id) = post_id() else {
            return;
        };

        busy.set(true);
        spawn_local(async move {
            match api::create_comment(&token, id, &content).await {
                Ok(()) => {
                    comment_text.set(String::new());
                    reload();
                }
                Err(err) => alert(&err.to_string()),
            }
            busy.set(false);
        });
    };

    let on_delete_comment = Callback::new(move |comment_id: i64| {
        if !confirm("Удалить комментарий?") {
            return;
        }
        let Some(token) = state.token() else {
            alert("Требуется авторизация");
            return;
        };
        spawn_local(async move {
            match api::delete_comment(&token, comment_id).await {
                Ok(()) => reload(),
                Err(err) => alert(&err.to_string()),
            }
        });
    });

    let on_delete_post = move |_| {
        let Some(id) = post_id() else {
            return;
        };
        if !confirm("Удалить пост?") {
            return;
        }
        let Some(token) = state.token() else {
            alert("Требуется авторизация");
            return;
        };
        spawn_local(async move {
            match api::delete_post(&token, id).await {
                Ok(()) => {
                    alert("Пост удалён.");
                    go_back();
                }
                Err(err) => {
                    logger::error("post_detail", &format!("delete failed: {err}"));
                    alert("Не удалось удалить пост.");
                }
            }
        });
    };

    let on_edit = Callback::new(move |()| {
        if let Some(id) = post_id() {
            navigate(&routes::edit_href(id), Default::default());
        }
    });

    let article = move || {
        if missing.get() {
            return view! { <p class="not-found">"Пост не найден."</p> }.into_any();
        }
        let Some(p) = post.get() else {
            return view! { <p class="loading">"Загрузка..."</p> }.into_any();
        };

        let date = p.created_at.format("%Y-%m-%d").to_string();
        let thumbnail = (!p.thumbnail.is_empty())
            .then(|| view! { <img class="thumbnail" src=p.thumbnail.clone() alt=p.title.clone() /> });
        let comment_count = p.comment_total();
        let comments = p
            .comments
            .into_iter()
            .map(|comment| comment_item(state, comment, on_delete_comment))
            .collect_view();

        view! {
            <div class="header-row">
                <h1 class="title">{p.title}</h1>
                <Show when=move || state.can_manage_posts()>
                    <div class="action-buttons">
                        <button class="edit-btn" on:click=move |_| on_edit.run(())>"Редактировать"</button>
                        <button class="delete-btn" on:click=on_delete_post>"Удалить"</button>
                    </div>
                </Show>
            </div>
            <p class="date">{date}</p>
            {thumbnail}
            <div class="content" inner_html=p.content></div>
            <div class="meta">
                <button class="like-btn" on:click=on_like>{format!("❤️ Нравится {}", p.likes_count)}</button>
            </div>

            <form class="comment-form" on:submit=on_comment>
                <textarea
                    placeholder="Комментарий..."
                    prop:value=move || comment_text.get()
                    on:input=move |ev| comment_text.set(event_target_value(&ev))
                ></textarea>
                <button type="submit" disabled=move || busy.get()>"Отправить"</button>
            </form>

            <div class="comments">
                <h3>{format!("Комментарии ({comment_count})")}</h3>
                {comments}
            </div>
        }
        .into_any()
    };

    view! {
        <div class="post-detail card">
            <button class="back-btn" on:click=move |_| go_back()>"← Назад"</button>
            {article}
        </div>
    }
}
