//! ChartCard: thaw [`Card`] with a title, a short description and an
//! appear animation (`@keyframes card-appear` in `dashboard.css`).
//!
//! ```rust,ignore
//! <ChartCard title="Regional Sales" description="Sales by country" span="half" delay_ms=80>
//!     <BarChart ... />
//! </ChartCard>
//! ```

use leptos::prelude::*;
use thaw::Card;

#[component]
pub fn ChartCard(
    title: &'static str,
    description: &'static str,
    /// Grid width: "full" or "half"
    #[prop(optional)]
    span: &'static str,
    /// Animation delay, for a staggered appearance
    #[prop(optional)]
    delay_ms: u32,
    children: Children,
) -> impl IntoView {
    let class = match span {
        "full" => "chart-card chart-card--full",
        _ => "chart-card chart-card--half",
    };
    let style = format!("animation: card-appear 0.28s ease-out {}ms both;", delay_ms);

    view! {
        <div class=class>
            <Card attr:style=style>
                <div class="chart-card__header">
                    <h3 class="chart-card__title">{title}</h3>
                    <p class="chart-card__description">{description}</p>
                </div>
                <div class="chart-card__body">{children()}</div>
            </Card>
        </div>
    }
}
