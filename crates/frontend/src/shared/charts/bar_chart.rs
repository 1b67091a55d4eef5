use super::data::{max_value, ChartRow};
use super::geometry::{nice_max, ticks, Frame};
use super::legend::ChartLegend;
use leptos::prelude::*;

const WIDTH: f64 = 480.0;
const HEIGHT: f64 = 240.0;
const LABEL_WIDTH: f64 = 120.0;
const BAR_GAP: f64 = 0.25;

/// Horizontal bar chart: one band per row, one bar per category inside it
#[component]
pub fn BarChart(
    #[prop(into)] rows: Signal<Vec<ChartRow>>,
    categories: Vec<&'static str>,
    colors: &'static [&'static str],
    value_formatter: fn(f64) -> String,
    #[prop(optional)] show_legend: bool,
) -> impl IntoView {
    let legend_labels: Vec<String> = categories.iter().map(|c| c.to_string()).collect();
    let series = categories.len().max(1);

    let chart = move || {
        let rows = rows.get();
        if rows.is_empty() {
            return view! { <div class="chart-empty">"No data"</div> }.into_any();
        }

        let frame = Frame {
            width: WIDTH,
            height: HEIGHT,
            left: LABEL_WIDTH,
            right: 16.0,
            top: 4.0,
            bottom: 20.0,
        };
        let max = nice_max(max_value(&rows));
        let band = frame.inner_height() / rows.len() as f64;
        let bar = band * (1.0 - BAR_GAP) / series as f64;
        let bar_x = |value: f64| {
            if value.is_finite() && value > 0.0 {
                frame.inner_width() * (value / max).min(1.0)
            } else {
                0.0
            }
        };

        let grid = ticks(max, 4)
            .into_iter()
            .map(|t| {
                let x = frame.left + bar_x(t);
                view! {
                    <g class="chart-grid">
                        <line x1=x x2=x y1=frame.top y2=frame.baseline() />
                        <text x=x y=HEIGHT - 4.0 text-anchor="middle">
                            {value_formatter(t)}
                        </text>
                    </g>
                }
            })
            .collect_view();

        let bars = rows
            .iter()
            .enumerate()
            .map(|(i, row)| {
                let band_top = frame.top + band * i as f64 + band * BAR_GAP / 2.0;
                let label_y = frame.top + band * (i as f64 + 0.5) + 4.0;
                let rects = (0..series)
                    .map(|c| {
                        let value = row.values.get(c).copied().unwrap_or(0.0);
                        view! {
                            <rect
                                x=frame.left
                                y=band_top + bar * c as f64
                                width=bar_x(value)
                                height=bar
                                rx="3"
                                fill=colors[c % colors.len()]
                            >
                                <title>{format!("{}: {}", row.label, value_formatter(value))}</title>
                            </rect>
                        }
                    })
                    .collect_view();
                view! {
                    <g class="chart-band">
                        <text
                            class="chart-axis-label"
                            x=frame.left - 8.0
                            y=label_y
                            text-anchor="end"
                        >
                            {truncate_label(&row.label, 18)}
                        </text>
                        {rects}
                    </g>
                }
            })
            .collect_view();

        view! {
            <svg
                class="chart-svg"
                viewBox=format!("0 0 {} {}", WIDTH, HEIGHT)
                preserveAspectRatio="none"
            >
                {grid}
                {bars}
            </svg>
        }
        .into_any()
    };

    view! {
        <div class="chart chart--bar">
            {chart}
            {show_legend.then(|| view! { <ChartLegend labels=legend_labels colors=colors /> })}
        </div>
    }
}

/// Cuts long axis labels at a char boundary and adds an ellipsis
fn truncate_label(label: &str, max_chars: usize) -> String {
    if label.chars().count() <= max_chars {
        return label.to_string();
    }
    let cut: String = label.chars().take(max_chars.saturating_sub(1)).collect();
    format!("{}…", cut.trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_label() {
        assert_eq!(truncate_label("India", 18), "India");
        assert_eq!(truncate_label("BUCKET BROTHERHOOD", 18), "BUCKET BROTHERHOOD");
        assert_eq!(truncate_label("SCALAWAG DUCK EXTRA LONG", 10), "SCALAWAG…");
    }
}
