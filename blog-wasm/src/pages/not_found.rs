use leptos::prelude::*;
use leptos_router::components::A;

use crate::routes;

#[component]
pub(crate) fn NotFoundPage() -> impl IntoView {
    view! {
        <div class="card not-found">
            <h2>"Страница не найдена"</h2>
            <A href=routes::HOME>"На главную"</A>
        </div>
    }
}
