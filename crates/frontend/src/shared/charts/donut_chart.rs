use super::data::ChartRow;
use super::geometry::donut_segments;
use super::legend::ChartLegend;
use leptos::prelude::*;

const SIZE: f64 = 200.0;
const INNER_RADIUS: f64 = 45.0;
// 90% of the half-size
const OUTER_RADIUS: f64 = 90.0;

/// Donut of the first value of each row, labels become the legend
#[component]
pub fn DonutChart(
    #[prop(into)] rows: Signal<Vec<ChartRow>>,
    colors: &'static [&'static str],
    value_formatter: fn(f64) -> String,
    #[prop(into, optional)] center_text: String,
    #[prop(optional)] show_legend: bool,
) -> impl IntoView {
    let chart = move || {
        let rows = rows.get();
        if rows.is_empty() {
            return view! { <div class="chart-empty">"No data"</div> }.into_any();
        }

        let values: Vec<f64> = rows
            .iter()
            .map(|r| r.values.first().copied().unwrap_or(0.0))
            .collect();
        let center = SIZE / 2.0;
        let slices = donut_segments(&values, center, center, INNER_RADIUS, OUTER_RADIUS)
            .into_iter()
            .zip(rows.iter().zip(values.iter()))
            .enumerate()
            .filter(|(_, (segment, _))| !segment.path.is_empty())
            .map(|(i, (segment, (row, value)))| {
                view! {
                    <path class="chart-slice" d=segment.path fill=colors[i % colors.len()]>
                        <title>
                            {format!(
                                "{}: {} ({:.1}%)",
                                row.label,
                                value_formatter(*value),
                                segment.fraction * 100.0,
                            )}
                        </title>
                    </path>
                }
            })
            .collect_view();

        let labels: Vec<String> = rows.iter().map(|r| r.label.clone()).collect();
        let center_text = center_text.clone();

        view! {
            <div class="chart-donut">
                <svg class="chart-svg chart-svg--square" viewBox=format!("0 0 {} {}", SIZE, SIZE)>
                    {slices}
                    <text class="chart-center-text" x=center y=center + 4.0 text-anchor="middle">
                        {center_text}
                    </text>
                </svg>
                {show_legend.then(|| view! { <ChartLegend labels=labels colors=colors /> })}
            </div>
        }
        .into_any()
    };

    view! { <div class="chart chart--donut">{chart}</div> }
}
