use blog_client::Session;
use blog_client::forms::LoginForm;
use leptos::ev::SubmitEvent;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::components::A;
use leptos_router::hooks::use_navigate;

use crate::pages::validation_message;
use crate::state::use_app_state;
use crate::{api, logger, routes};

#[component]
pub(crate) fn LoginPage() -> impl IntoView {
    let state = use_app_state();
    let navigate = use_navigate();

    let username = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());

    let on_submit = move |ev: SubmitEvent| {
        ev.prevent_default();
        if state.loading.get_untracked() {
            return;
        }
        state.clear_error();

        let form = LoginForm {
            username: username.get_untracked(),
            password: password.get_untracked(),
        };
        let form = match form.validate() {
            Ok(form) => form,
            Err(err) => {
                state.set_error(validation_message(&err));
                return;
            }
        };

        state.loading.set(true);
        let navigate = navigate.clone();
        spawn_local(async move {
            match api::login(&form).await {
                Ok(auth) => {
                    logger::info("login", &format!("signed in as {}", auth.user.username));
                    state.sign_in(Session::from(auth));
                    password.set(String::new());
                    navigate(routes::HOME, Default::default());
                }
                Err(err) => {
                    logger::warn("login", &format!("login failed: {err}"));
                    state.set_error(err.to_string());
                }
            }
            state.loading.set(false);
        });
    };

    view! {
        <div class="auth card">
            <h2>"Вход"</h2>
            <form class="auth-form" on:submit=on_submit>
                <input
                    type="text"
                    placeholder="Логин"
                    autocomplete="username"
                    prop:value=move || username.get()
                    on:input=move |ev| username.set(event_target_value(&ev))
                />
                <input
                    type="password"
                    placeholder="Пароль"
                    autocomplete="current-password"
                    prop:value=move || password.get()
                    on:input=move |ev| password.set(event_target_value(&ev))
                />
                <button type="submit" disabled=move || state.loading.get()>
                    {move || if state.loading.get() { "Вход..." } else { "Войти" }}
                </button>
            </form>
            <p class="auth-switch">
                "Нет аккаунта? " <A href=routes::REGISTER>"Зарегистрироваться"</A>
            </p>
        </div>
    }
}
