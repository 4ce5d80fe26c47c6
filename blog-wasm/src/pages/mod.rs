pub(crate) mod home;
pub(crate) mod login;
pub(crate) mod not_found;
pub(crate) mod post_detail;
pub(crate) mod post_list;
pub(crate) mod post_write;
pub(crate) mod register;

use blog_client::ValidationError;
use leptos::prelude::*;

use crate::logger;
use crate::request_seq::RequestSeq;

/// Блокирующее сообщение браузера.
pub(crate) fn alert(message: &str) {
    if let Some(window) = web_sys::window() {
        if window.alert_with_message(message).is_err() {
            logger::warn("ui", message);
        }
    }
}

/// Подтверждение перед необратимым действием. Без окна считается отказом.
pub(crate) fn confirm(message: &str) -> bool {
    web_sys::window()
        .and_then(|window| window.confirm_with_message(message).ok())
        .unwrap_or(false)
}

/// Шаг назад по истории браузера.
pub(crate) fn go_back() {
    let result = web_sys::window()
        .ok_or(())
        .and_then(|window| window.history().map_err(drop))
        .and_then(|history| history.back().map_err(drop));
    if result.is_err() {
        logger::warn("ui", "history is not available");
    }
}

/// Сообщение об ошибке формы для пользователя.
pub(crate) fn validation_message(err: &ValidationError) -> &'static str {
    match err.field {
        "title" => "Введите заголовок.",
        "content" => "Введите содержимое.",
        "username" => "Введите логин.",
        "password" if err.message.contains("at least") => {
            "Пароль должен быть не короче 8 символов."
        }
        "password" => "Введите пароль.",
        "password_confirm" => "Пароли не совпадают.",
        "email" => "Некорректный email.",
        _ => "Проверьте заполнение формы.",
    }
}

/// Номер нового запроса страницы.
pub(crate) fn begin_request(seq: StoredValue<RequestSeq>) -> u64 {
    let mut ticket = 0;
    seq.update_value(|seq| ticket = seq.begin());
    ticket
}

/// Ответ ещё актуален: страница жива и более нового запроса не было.
pub(crate) fn is_current_request(seq: StoredValue<RequestSeq>, ticket: u64) -> bool {
    seq.try_get_value().is_some_and(|seq| seq.is_current(ticket))
}
