use leptos::prelude::*;
use leptos_router::components::A;
use leptos_router::hooks::use_navigate;

use crate::routes;
use crate::state::use_app_state;

#[component]
pub(crate) fn Header() -> impl IntoView {
    let state = use_app_state();
    let navigate = use_navigate();

    let on_logout = move |_| {
        state.sign_out();
        state.clear_error();
        navigate(routes::HOME, Default::default());
    };

    let username = move || state.user().map(|u| u.username).unwrap_or_default();

    view! {
        <header class="header">
            <A href=routes::HOME attr:class="brand">"BINARY"</A>
            <nav class="header-auth">
                <Show
                    when=move || state.session.with(Option::is_some)
                    fallback=|| view! {
                        <A href=routes::LOGIN>"Войти"</A>
                        <A href=routes::REGISTER>"Регистрация"</A>
                    }
                >
                    <span class="header-user">{username}</span>
                    <button class="link-btn" on:click=on_logout.clone()>"Выйти"</button>
                </Show>
            </nav>
        </header>
    }
}
