use crate::shared::icons::icon;
use leptos::prelude::*;

/// Page shell: a top bar, the main content and the copilot panel on the right.
///
/// ```text
/// +------------------------------------------+
/// |              TopHeader                   |
/// +------------------------------------------+
/// |          Content           |  Copilot    |
/// +------------------------------------------+
/// ```
#[component]
pub fn Shell<C, R>(title: &'static str, center: C, right: R) -> impl IntoView
where
    C: Fn() -> AnyView + 'static + Send,
    R: Fn() -> AnyView + 'static + Send,
{
    view! {
        <div class="app-layout">
            <header class="app-header">
                {icon("sparkle")}
                <h1>{title}</h1>
            </header>
            <div class="app-body">
                <main class="app-main">{center()}</main>
                {right()}
            </div>
        </div>
    }
}
