use blog_client::Category;
use blog_client::forms::PostDraft;
use leptos::ev::{Event, SubmitEvent};
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::{use_navigate, use_params_map, use_query_map};
use web_sys::{File, HtmlInputElement};

use crate::pages::{alert, begin_request, go_back, is_current_request, validation_message};
use crate::request_seq::RequestSeq;
use crate::state::use_app_state;
use crate::{api, logger, routes};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UploadTarget {
    Thumbnail,
    Inline,
}

/// Выбранный файл; поле очищается, чтобы тот же файл можно было выбрать снова.
fn take_selected_file(ev: &Event) -> Option<File> {
    let input = event_target::<HtmlInputElement>(ev);
    let file = input.files().and_then(|files| files.get(0));
    input.set_value("");
    file
}

#[component]
pub(crate) fn PostWritePage() -> impl IntoView {
    let state = use_app_state();
    let params = use_params_map();
    let query = use_query_map();
    let navigate = use_navigate();

    let edit_id = Memo::new(move |_| {
        let path_id = params.with(|p| p.get("post_id"));
        let legacy = params.with(|p| p.get("legacy"));
        let query_id = query.with(|q| q.get("postId"));
        routes::edit_post_id(path_id.as_deref(), query_id.as_deref(), legacy.as_deref())
    });

    let draft = RwSignal::new(PostDraft::default());
    let categories = RwSignal::new(Vec::<Category>::new());
    let saving = RwSignal::new(false);
    let uploading = RwSignal::new(false);
    let request_seq = StoredValue::new(RequestSeq::default());

    spawn_local(async move {
        match api::categories().await {
            Ok(list) => categories.set(list),
            Err(err) => logger::warn("post_write", &format!("category list unavailable: {err}")),
        }
    });

    Effect::new(move |_| {
        let ticket = begin_request(request_seq);
        let Some(id) = edit_id.get() else {
            draft.set(PostDraft::default());
            return;
        };
        spawn_local(async move {
            let result = api::get_post_by_id(id).await;
            if !is_current_request(request_seq, ticket) {
                return;
            }
            match result {
                Ok(post) => draft.set(PostDraft::from_post(&post)),
                Err(err) => {
                    logger::error("post_write", &format!("failed to load post {id}: {err}"));
                    alert("Не удалось загрузить пост для редактирования.");
                    go_back();
                }
            }
        });
    });

    let require_token = Callback::new(move |()| {
        let token = state.token();
        if token.is_none() {
            alert("Требуется авторизация");
            navigate(routes::LOGIN, Default::default());
        }
        token
    });

    let upload = move |ev: Event, target: UploadTarget| {
        let Some(file) = take_selected_file(&ev) else {
            return;
        };
        let Some(token) = require_token.run(()) else {
            return;
        };

        uploading.set(true);
        spawn_local(async move {
            match api::upload(&token, &file).await {
                Ok(url) => draft.update(|d| match target {
                    UploadTarget::Thumbnail => d.thumbnail = url,
                    UploadTarget::Inline => d.append_image(&url, &file.name()),
                }),
                Err(err) => {
                    logger::error("post_write", &format!("upload failed: {err}"));
                    alert(&err.to_string());
                }
            }
            uploading.set(false);
        });
    };

    let on_submit = move |ev: SubmitEvent| {
        ev.prevent_default();
        if saving.get_untracked() {
            return;
        }
        let payload = match draft.get_untracked().validate() {
            Ok(payload) => payload,
            Err(err) => {
                alert(validation_message(&err));
                return;
            }
        };
        let Some(token) = require_token.run(()) else {
            return;
        };
        let editing = edit_id.get_untracked();

        saving.set(true);
        spawn_local(async move {
            let result = match editing {
                Some(id) => api::update_post(&token, id, &payload).await,
                None => api::create_post(&token, &payload).await,
            };
            saving.set(false);
            match result {
                Ok(()) => {
                    alert(if editing.is_some() {
                        "Пост обновлён."
                    } else {
                        "Пост опубликован."
                    });
                    go_back();
                }
                Err(err) => {
                    logger::error("post_write", &format!("save failed: {err}"));
                    alert(&err.to_string());
                }
            }
        });
    };

    let category_options = move || {
        categories
            .get()
            .into_iter()
            .map(|c| view! { <option value=c.category.clone()></option> })
            .collect_view()
    };
    let subcategory_options = move || {
        let selected = draft.with(|d| d.category.clone());
        categories
            .get()
            .into_iter()
            .filter(|c| c.category == selected)
            .flat_map(|c| c.subcategories)
            .map(|sub| view! { <option value=sub></option> })
            .collect_view()
    };

    view! {
        <div class="post-write card">
            <button class="back-btn" on:click=move |_| go_back()>"← Назад"</button>
            <h2>{move || if edit_id.get().is_some() { "Редактирование" } else { "Новый пост" }}</h2>

            <form class="write-form" on:submit=on_submit>
                <input
                    type="text"
                    placeholder="Заголовок"
                    prop:value=move || draft.with(|d| d.title.clone())
                    on:input=move |ev| draft.update(|d| d.title = event_target_value(&ev))
                />
                <input
                    type="text"
                    placeholder="Краткое описание"
                    prop:value=move || draft.with(|d| d.description.clone())
                    on:input=move |ev| draft.update(|d| d.description = event_target_value(&ev))
                />
                <div class="row">
                    <input
                        type="text"
                        list="write-categories"
                        placeholder="Категория"
                        prop:value=move || draft.with(|d| d.category.clone())
                        on:input=move |ev| draft.update(|d| d.category = event_target_value(&ev))
                    />
                    <datalist id="write-categories">{category_options}</datalist>
                    <input
                        type="text"
                        list="write-subcategories"
                        placeholder="Подкатегория"
                        prop:value=move || draft.with(|d| d.subcategory.clone())
                        on:input=move |ev| draft.update(|d| d.subcategory = event_target_value(&ev))
                    />
                    <datalist id="write-subcategories">{subcategory_options}</datalist>
                </div>

                <label class="upload">
                    "Миниатюра: "
                    <input
                        type="file"
                        accept="image/*"
                        on:change=move |ev| upload(ev, UploadTarget::Thumbnail)
                    />
                </label>
                <Show when=move || draft.with(|d| !d.thumbnail.is_empty())>
                    <img class="thumbnail-preview" src=move || draft.with(|d| d.thumbnail.clone()) alt="thumbnail" />
                </Show>

                <label class="upload">
                    "Картинка в текст: "
                    <input
                        type="file"
                        accept="image/*"
                        on:change=move |ev| upload(ev, UploadTarget::Inline)
                    />
                </label>
                <textarea
                    class="content-editor"
                    placeholder="Содержимое (HTML)"
                    prop:value=move || draft.with(|d| d.content.clone())
                    on:input=move |ev| draft.update(|d| d.content = event_target_value(&ev))
                ></textarea>

                <Show when=move || uploading.get()>
                    <p class="loading">"Загрузка файла..."</p>
                </Show>
                <button type="submit" disabled=move || saving.get() || uploading.get()>
                    {move || if saving.get() { "Сохранение..." } else { "Сохранить" }}
                </button>
            </form>
        </div>
    }
}
