use super::data::{max_value, ChartRow};
use super::geometry::{area_path, line_path, nice_max, ticks, Frame};
use super::legend::ChartLegend;
use leptos::prelude::*;

const FRAME: Frame = Frame {
    width: 720.0,
    height: 240.0,
    left: 64.0,
    right: 16.0,
    top: 12.0,
    bottom: 28.0,
};

/// Stacked-free area chart: one translucent area per category over a shared
/// x axis made of the row labels
#[component]
pub fn AreaChart(
    #[prop(into)] rows: Signal<Vec<ChartRow>>,
    /// Series names, in the order of `ChartRow::values`
    categories: Vec<&'static str>,
    colors: &'static [&'static str],
    /// Formats y-axis labels
    value_formatter: fn(f64) -> String,
    #[prop(optional)] show_legend: bool,
) -> impl IntoView {
    let legend_labels: Vec<String> = categories.iter().map(|c| c.to_string()).collect();

    let chart = move || {
        let rows = rows.get();
        if rows.is_empty() {
            return view! { <div class="chart-empty">"No data"</div> }.into_any();
        }

        let max = nice_max(max_value(&rows));
        let n = rows.len();

        let grid = ticks(max, 4)
            .into_iter()
            .map(|t| {
                let y = FRAME.y_for(t, max);
                view! {
                    <g class="chart-grid">
                        <line x1=FRAME.left x2=FRAME.width - FRAME.right y1=y y2=y />
                        <text x=FRAME.left - 8.0 y=y + 4.0 text-anchor="end">
                            {value_formatter(t)}
                        </text>
                    </g>
                }
            })
            .collect_view();

        let x_labels = rows
            .iter()
            .enumerate()
            .map(|(i, row)| {
                view! {
                    <text
                        class="chart-axis-label"
                        x=FRAME.x_at(i, n)
                        y=FRAME.height - 8.0
                        text-anchor="middle"
                    >
                        {row.label.clone()}
                    </text>
                }
            })
            .collect_view();

        let series = (0..categories.len())
            .map(|c| {
                let points: Vec<(f64, f64)> = rows
                    .iter()
                    .enumerate()
                    .map(|(i, row)| {
                        let value = row.values.get(c).copied().unwrap_or(0.0);
                        (FRAME.x_at(i, n), FRAME.y_for(value, max))
                    })
                    .collect();
                let color = colors[c % colors.len()];
                view! {
                    <g class="chart-series">
                        <path d=area_path(&points, FRAME.baseline()) fill=color fill-opacity="0.15" />
                        <path d=line_path(&points) fill="none" stroke=color stroke-width="2" />
                    </g>
                }
            })
            .collect_view();

        view! {
            <svg
                class="chart-svg"
                viewBox=format!("0 0 {} {}", FRAME.width, FRAME.height)
                preserveAspectRatio="none"
            >
                {grid}
                {series}
                {x_labels}
            </svg>
        }
        .into_any()
    };

    view! {
        <div class="chart chart--area">
            {chart}
            {show_legend.then(|| view! { <ChartLegend labels=legend_labels colors=colors /> })}
        </div>
    }
}
