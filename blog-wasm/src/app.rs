use leptos::prelude::*;
use leptos_router::components::{Route, Router, Routes};
use leptos_router::path;

use crate::components::error_banner::ErrorBanner;
use crate::components::footer::Footer;
use crate::components::header::Header;
use crate::components::sidebar::Sidebar;
use crate::pages::home::HomePage;
use crate::pages::login::LoginPage;
use crate::pages::not_found::NotFoundPage;
use crate::pages::post_detail::PostDetailPage;
use crate::pages::post_list::PostListPage;
use crate::pages::post_write::PostWritePage;
use crate::pages::register::RegisterPage;
use crate::state::provide_app_state;

/// Корневой компонент: состояние, роутер и общий каркас страницы.
///
/// Статические маршруты объявлены раньше параметрических, чтобы `/write/...`
/// и `/edit/...` не попадали в `/:category/:subcategory`.
#[component]
pub fn App() -> impl IntoView {
    provide_app_state();

    view! {
        <Router>
            <Header />
            <div class="layout">
                <Sidebar />
                <main class="content">
                    <ErrorBanner />
                    <Routes fallback=|| view! { <NotFoundPage /> }>
                        <Route path=path!("/") view=HomePage />
                        <Route path=path!("/login") view=LoginPage />
                        <Route path=path!("/register") view=RegisterPage />
                        <Route path=path!("/write") view=PostWritePage />
                        <Route path=path!("/write/:legacy") view=PostWritePage />
                        <Route path=path!("/edit/:post_id") view=PostWritePage />
                        <Route path=path!("/:category/:subcategory") view=PostListPage />
                        <Route path=path!("/:category/:subcategory/:post_id") view=PostDetailPage />
                    </Routes>
                </main>
            </div>
            <Footer />
        </Router>
    }
}
