//! Кто что может делать в интерфейсе. Окончательное решение всё равно за
//! сервером, здесь только то, какие кнопки показывать.

use crate::models::{Comment, Role, User};

/// Писать, править и удалять посты может только владелец блога.
pub fn can_manage_posts(user: Option<&User>) -> bool {
    matches!(user, Some(User { role: Role::Master, .. }))
}

/// Комментарий удаляет владелец блога или его автор.
pub fn can_delete_comment(user: Option<&User>, comment: &Comment) -> bool {
    match user {
        Some(user) if user.role == Role::Master => true,
        Some(user) if user.role == Role::User => user.username == comment.user_name,
        _ => false,
    }
}
