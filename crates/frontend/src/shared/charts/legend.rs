use leptos::prelude::*;

#[component]
pub fn ChartLegend(labels: Vec<String>, colors: &'static [&'static str]) -> impl IntoView {
    view! {
        <div class="chart-legend">
            {labels
                .into_iter()
                .enumerate()
                .map(|(i, label)| {
                    let color = colors[i % colors.len()];
                    view! {
                        <span class="chart-legend__item">
                            <span
                                class="chart-legend__swatch"
                                style=format!("background: {};", color)
                            ></span>
                            {label}
                        </span>
                    }
                })
                .collect_view()}
        </div>
    }
}
