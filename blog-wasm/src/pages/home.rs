use blog_client::FeaturedPosts;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::components::A;

use crate::components::featured_carousel::FeaturedCarousel;
use crate::state::use_app_state;
use crate::{api, logger, routes};

#[component]
pub(crate) fn HomePage() -> impl IntoView {
    let state = use_app_state();
    let featured = RwSignal::new(None::<FeaturedPosts>);

    spawn_local(async move {
        match api::featured_posts().await {
            Ok(data) => featured.set(Some(data)),
            Err(err) => logger::error("home", &format!("failed to load featured posts: {err}")),
        }
    });

    let sections = move || {
        featured.get().map(|data| {
            data.sections
                .into_iter()
                .map(|section| {
                    view! { <FeaturedCarousel category=section.category posts=section.posts /> }
                })
                .collect_view()
        })
    };

    view! {
        <div class="card home-header">
            <h2>"Recent Post"</h2>
            <Show when=move || state.can_manage_posts()>
                <A href=routes::WRITE attr:class="write-btn">"Написать"</A>
            </Show>
        </div>
        {sections}
    }
}
