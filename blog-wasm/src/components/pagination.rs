use blog_client::listing::PageWindow;
use leptos::prelude::*;

/// Пагинация с окном из 10 номеров. `on_go` получает желаемую страницу
/// без ограничений, зажимать её должен вызывающий.
#[component]
pub(crate) fn Pagination(
    page: Signal<u32>,
    total_pages: Signal<u32>,
    on_go: Callback<i64>,
) -> impl IntoView {
    let window = Memo::new(move |_| PageWindow::new(page.get(), total_pages.get()));
    let at_first = move || page.get() <= 1;
    let at_last = move || page.get() >= total_pages.get();
    let current = move || i64::from(page.get_untracked());

    view! {
        <Show when=move || window.get().is_visible()>
            <nav class="pagination" aria-label="pagination">
                <button class="page-btn" disabled=at_first on:click=move |_| on_go.run(1)>
                    "«"
                </button>
                <button class="page-btn" disabled=at_first on:click=move |_| on_go.run(current() - 1)>
                    "‹"
                </button>

                <Show when=move || window.get().show_first()>
                    <button class="page-btn" on:click=move |_| on_go.run(1)>"1"</button>
                </Show>
                <Show when=move || window.get().leading_ellipsis()>
                    <span class="ellipsis">"…"</span>
                </Show>

                <For
                    each=move || window.get().pages()
                    key=|p| *p
                    children=move |p| {
                        view! {
                            <button
                                class=move || if page.get() == p { "page-btn active" } else { "page-btn" }
                                on:click=move |_| on_go.run(i64::from(p))
                            >
                                {p}
                            </button>
                        }
                    }
                />

                <Show when=move || window.get().trailing_ellipsis()>
                    <span class="ellipsis">"…"</span>
                </Show>
                <Show when=move || window.get().show_last()>
                    <button class="page-btn" on:click=move |_| on_go.run(i64::from(total_pages.get_untracked()))>
                        {move || total_pages.get()}
                    </button>
                </Show>

                <button class="page-btn" disabled=at_last on:click=move |_| on_go.run(current() + 1)>
                    "›"
                </button>
                <button
                    class="page-btn"
                    disabled=at_last
                    on:click=move |_| on_go.run(i64::from(total_pages.get_untracked()))
                >
                    "»"
                </button>
            </nav>
        </Show>
    }
}
