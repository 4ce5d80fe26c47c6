use blog_client::access::can_manage_posts;
use blog_client::{Session, User};
use leptos::prelude::*;

use crate::{logger, storage};

#[derive(Debug, Clone, Copy)]
pub(crate) struct AppState {
    pub(crate) session: RwSignal<Option<Session>>,
    pub(crate) error: RwSignal<Option<String>>,
    pub(crate) loading: RwSignal<bool>,
}

impl AppState {
    pub(crate) fn new() -> Self {
        Self {
            session: RwSignal::new(storage::load_session()),
            error: RwSignal::new(None),
            loading: RwSignal::new(false),
        }
    }

    pub(crate) fn set_error(&self, message: impl Into<String>) {
        self.error.set(Some(message.into()));
    }

    pub(crate) fn clear_error(&self) {
        self.error.set(None);
    }

    pub(crate) fn token(&self) -> Option<String> {
        self.session.with(|s| s.as_ref().map(|s| s.token.clone()))
    }

    pub(crate) fn user(&self) -> Option<User> {
        self.session.with(|s| s.as_ref().map(|s| s.user.clone()))
    }

    pub(crate) fn can_manage_posts(&self) -> bool {
        self.session
            .with(|s| can_manage_posts(s.as_ref().map(|s| &s.user)))
    }

    pub(crate) fn sign_in(&self, session: Session) {
        if let Err(err) = storage::save_session(&session) {
            logger::warn("state", &err);
        }
        self.session.set(Some(session));
    }

    pub(crate) fn sign_out(&self) {
        if let Err(err) = storage::clear_session() {
            logger::warn("state", &err);
        }
        self.session.set(None);
    }
}

pub(crate) fn provide_app_state() -> AppState {
    let state = AppState::new();
    provide_context(state);
    state
}

pub(crate) fn use_app_state() -> AppState {
    expect_context::<AppState>()
}
