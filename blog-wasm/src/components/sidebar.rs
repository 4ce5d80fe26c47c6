use blog_client::Category;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::components::A;

use crate::{api, logger, routes};

#[component]
pub(crate) fn Sidebar() -> impl IntoView {
    let categories = RwSignal::new(Vec::<Category>::new());

    spawn_local(async move {
        match api::categories().await {
            Ok(list) => categories.set(list),
            Err(err) => logger::error("sidebar", &format!("failed to load categories: {err}")),
        }
    });

    view! {
        <aside class="sidebar card">
            <p class="profile-name"><strong>"BIN"</strong></p>
            <p class="profile-description">
                "Заметки о коде, путешествиях и еде."
            </p>
            <hr class="divider" />
            <p class="category-title"><strong>"Category"</strong></p>
            <ul class="category-list">
                <For
                    each=move || categories.get()
                    key=|category| category.category.clone()
                    children=move |category| {
                        let name = category.category.clone();
                        let links = category
                            .subcategories
                            .into_iter()
                            .map(|sub| {
                                let href = routes::listing_href(&name, &sub);
                                view! { <li><A href=href>{sub}</A></li> }
                            })
                            .collect_view();
                        view! {
                            <li>
                                <strong>{category.category}</strong>
                                <ul>{links}</ul>
                            </li>
                        }
                    }
                />
            </ul>
        </aside>
    }
}
