//! Браузерный клиент блога на Leptos (CSR): рубрики, посты, комментарии, редактор.

#[cfg(target_arch = "wasm32")]
mod api;
#[cfg(target_arch = "wasm32")]
mod app;
#[cfg(target_arch = "wasm32")]
mod components;
mod logger;
#[cfg(target_arch = "wasm32")]
mod pages;
mod request_seq;
mod routes;
#[cfg(target_arch = "wasm32")]
mod state;
#[cfg(target_arch = "wasm32")]
mod storage;

#[cfg(target_arch = "wasm32")]
fn main() {
    console_error_panic_hook::set_once();
    logger::info("app", "starting");
    leptos::mount::mount_to_body(app::App);
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    // На хосте собираются только логгер и маршруты.
}
