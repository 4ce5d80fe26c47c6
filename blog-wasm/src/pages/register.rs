use blog_client::forms::RegisterForm;
use leptos::ev::SubmitEvent;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::components::A;
use leptos_router::hooks::use_navigate;

use crate::pages::{alert, validation_message};
use crate::state::use_app_state;
use crate::{api, logger, routes};

#[component]
pub(crate) fn RegisterPage() -> impl IntoView {
    let state = use_app_state();
    let navigate = use_navigate();

    let form = RwSignal::new(RegisterForm::default());

    let on_submit = move |ev: SubmitEvent| {
        ev.prevent_default();
        if state.loading.get_untracked() {
            return;
        }
        state.clear_error();

        let payload = match form.get_untracked().validate() {
            Ok(payload) => payload,
            Err(err) => {
                alert(validation_message(&err));
                return;
            }
        };

        state.loading.set(true);
        let navigate = navigate.clone();
        spawn_local(async move {
            match api::register(&payload).await {
                Ok(()) => {
                    logger::info("register", &format!("registered {}", payload.username));
                    form.set(RegisterForm::default());
                    alert("Регистрация прошла успешно. Теперь войдите.");
                    navigate(routes::LOGIN, Default::default());
                }
                Err(err) => {
                    logger::warn("register", &format!("register failed: {err}"));
                    state.set_error(err.to_string());
                }
            }
            state.loading.set(false);
        });
    };

    view! {
        <div class="auth card">
            <h2>"Регистрация"</h2>
            <form class="auth-form" on:submit=on_submit>
                <input
                    type="text"
                    placeholder="Логин"
                    autocomplete="username"
                    prop:value=move || form.with(|f| f.username.clone())
                    on:input=move |ev| form.update(|f| f.username = event_target_value(&ev))
                />
                <input
                    type="email"
                    placeholder="Email"
                    autocomplete="email"
                    prop:value=move || form.with(|f| f.email.clone())
                    on:input=move |ev| form.update(|f| f.email = event_target_value(&ev))
                />
                <input
                    type="password"
                    placeholder="Пароль (не короче 8 символов)"
                    autocomplete="new-password"
                    prop:value=move || form.with(|f| f.password.clone())
                    on:input=move |ev| form.update(|f| f.password = event_target_value(&ev))
                />
                <input
                    type="password"
                    placeholder="Повторите пароль"
                    autocomplete="new-password"
                    prop:value=move || form.with(|f| f.password_confirm.clone())
                    on:input=move |ev| form.update(|f| f.password_confirm = event_target_value(&ev))
                />
                <button type="submit" disabled=move || state.loading.get()>
                    {move || if state.loading.get() { "Отправка..." } else { "Зарегистрироваться" }}
                </button>
            </form>
            <p class="auth-switch">
                "Уже есть аккаунт? " <A href=routes::LOGIN>"Войти"</A>
            </p>
        </div>
    }
}
