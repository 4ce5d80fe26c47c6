use blog_client::Session;
use blog_client::session::{TOKEN_KEY, USER_KEY};
use web_sys::Storage;

fn local_storage() -> Result<Storage, String> {
    let window = web_sys::window().ok_or_else(|| "window is not available".to_string())?;
    window
        .local_storage()
        .map_err(|_| "failed to access localStorage".to_string())?
        .ok_or_else(|| "localStorage is not available".to_string())
}

fn get_item(storage: &Storage, key: &str) -> Option<String> {
    storage.get_item(key).ok().flatten()
}

/// Сессия восстанавливается, только если в хранилище есть и токен, и
/// пользователь.
pub(crate) fn load_session() -> Option<Session> {
    let storage = local_storage().ok()?;
    let token = get_item(&storage, TOKEN_KEY);
    let user = get_item(&storage, USER_KEY);
    Session::restore(token.as_deref(), user.as_deref())
}

pub(crate) fn save_session(session: &Session) -> Result<(), String> {
    let storage = local_storage()?;
    let user = session
        .user_json()
        .map_err(|_| "failed to serialize user".to_string())?;

    storage
        .set_item(TOKEN_KEY, &session.token)
        .map_err(|_| "failed to save token".to_string())?;
    storage
        .set_item(USER_KEY, &user)
        .map_err(|_| "failed to save user".to_string())
}

pub(crate) fn clear_session() -> Result<(), String> {
    let storage = local_storage()?;
    storage
        .remove_item(TOKEN_KEY)
        .map_err(|_| "failed to clear token".to_string())?;
    storage
        .remove_item(USER_KEY)
        .map_err(|_| "failed to clear user".to_string())
}
