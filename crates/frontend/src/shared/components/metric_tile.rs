use crate::shared::icons::icon;
use leptos::prelude::*;

/// Small summary tile: icon, label and an already formatted value
#[component]
pub fn MetricTile(
    /// Label displayed above the value
    label: &'static str,
    /// Icon name from the icon() helper
    icon_name: &'static str,
    #[prop(into)] value: Signal<String>,
) -> impl IntoView {
    view! {
        <div class="metric-tile">
            <div class="metric-tile__icon">{icon(icon_name)}</div>
            <div class="metric-tile__content">
                <p class="metric-tile__label">{label}</p>
                <p class="metric-tile__value">{move || value.get()}</p>
            </div>
        </div>
    }
}
