use leptos::prelude::*;

use crate::state::use_app_state;

#[component]
pub(crate) fn ErrorBanner() -> impl IntoView {
    let state = use_app_state();
    let message = move || state.error.get().unwrap_or_default();

    view! {
        <Show when=move || state.error.with(|e| e.as_deref().is_some_and(|m| !m.is_empty()))>
            <div class="error-banner" role="alert">
                <strong>"Ошибка: "</strong>
                {message}
                <button class="error-close" on:click=move |_| state.clear_error()>"×"</button>
            </div>
        </Show>
    }
}
