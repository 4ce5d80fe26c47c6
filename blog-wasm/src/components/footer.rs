use leptos::prelude::*;

#[component]
pub(crate) fn Footer() -> impl IntoView {
    view! {
        <footer class="footer">
            <p>"Copyright ©2025 BIN."</p>
        </footer>
    }
}
