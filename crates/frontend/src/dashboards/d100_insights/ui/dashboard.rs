use std::sync::Arc;

use super::search_results::{query_from_args, SearchResults};
use super::view_model::*;
use crate::dashboards::d100_insights::api;
use crate::shared::charts::{tabulate, AreaChart, BarChart, ChartRow, DonutChart};
use crate::shared::components::chart_card::ChartCard;
use crate::shared::components::metric_tile::MetricTile;
use crate::shared::copilot::{
    use_copilot_action, use_copilot_readable, ActionRender, ActionStatus,
};
use crate::shared::number_format::format_currency;
use contracts::dashboards::d100_insights::InsightEndpoint;
use contracts::shared::copilot::{ActionAvailability, ActionDefinition, ActionParameter};
use leptos::prelude::*;
use leptos::task::spawn_local;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Loads one collection in its own task; failures only reach the log
fn load<T, F>(endpoint: InsightEndpoint, apply: F)
where
    T: DeserializeOwned + 'static,
    F: FnOnce(Vec<T>) + 'static,
{
    spawn_local(async move {
        match api::fetch_insight::<T>(endpoint).await {
            Ok(data) => apply(data),
            Err(e) => log::error!("Error fetching {} data: {}", endpoint.slug(), e),
        }
    });
}

fn search_internet_action() -> ActionDefinition {
    ActionDefinition {
        name: "searchInternet".to_string(),
        description: "Searches the internet for information.".to_string(),
        parameters: vec![ActionParameter {
            name: "query".to_string(),
            kind: "string".to_string(),
            description: "The query to search the internet for.".to_string(),
            required: true,
        }],
        available: ActionAvailability::Disabled,
    }
}

/// Sales, films, categories, regions and customers with the copilot wired in
#[component]
pub fn InsightsDashboard() -> impl IntoView {
    let vm = InsightsVm::new();

    // One fetch cycle per mount, five independent requests
    Effect::new(move |_| {
        load(InsightEndpoint::SalesOverview, move |data| vm.set_sales(data));
        load(InsightEndpoint::TopFilms, move |data| vm.products.set(data));
        load(InsightEndpoint::CategoryPerformance, move |data| vm.categories.set(data));
        load(InsightEndpoint::RegionalSales, move |data| vm.regions.set(data));
        load(InsightEndpoint::CustomerActivity, move |data| vm.customers.set(data));
    });

    use_copilot_readable(
        READABLE_DESCRIPTION,
        Signal::derive(move || serde_json::to_value(vm.snapshot()).unwrap_or(Value::Null)),
    );

    let render: ActionRender = Arc::new(|args: Value, status: ActionStatus| {
        view! { <SearchResults query=query_from_args(&args) status=status /> }.into_any()
    });
    use_copilot_action(search_internet_action(), Some(render));

    let sales_rows: Signal<Vec<ChartRow>> = Signal::derive(move || {
        vm.sales
            .with(|d| tabulate(d, "date", &["Sales", "Profit", "Expenses"]))
    });
    let product_rows: Signal<Vec<ChartRow>> =
        Signal::derive(move || vm.products.with(|d| tabulate(d, "title", &["total_revenue"])));
    let category_rows: Signal<Vec<ChartRow>> = Signal::derive(move || {
        vm.categories
            .with(|d| tabulate(d, "category", &["total_revenue"]))
    });
    let region_rows: Signal<Vec<ChartRow>> =
        Signal::derive(move || vm.regions.with(|d| tabulate(d, "region", &["sales"])));
    let customer_rows: Signal<Vec<ChartRow>> = Signal::derive(move || {
        vm.customers
            .with(|d| tabulate(d, "customer_name", &["total_spent"]))
    });

    let tiles = move || {
        metric_tiles(&vm.metrics.get())
            .into_iter()
            .map(|tile| {
                view! {
                    <MetricTile label=tile.label icon_name=tile.icon value=tile.value />
                }
            })
            .collect_view()
    };

    view! {
        <div class="insights-dashboard">
            <div class="metric-grid">{tiles}</div>

            <ChartCard title="Sales Overview" description="Monthly sales and profit data" span="full">
                <AreaChart
                    rows=sales_rows
                    categories=vec!["Sales", "Profit", "Expenses"]
                    colors=SALES_OVERVIEW_COLORS
                    value_formatter=format_currency
                    show_legend=true
                />
            </ChartCard>

            <ChartCard title="Top Films" description="Most rented films" delay_ms=60>
                <BarChart
                    rows=product_rows
                    categories=vec!["total_revenue"]
                    colors=PRODUCT_COLORS
                    value_formatter=format_currency
                />
            </ChartCard>

            <ChartCard title="Category Performance" description="Revenue by film category" delay_ms=120>
                <DonutChart
                    rows=category_rows
                    colors=CATEGORY_COLORS
                    value_formatter=format_currency
                    center_text="Categories"
                    show_legend=true
                />
            </ChartCard>

            <ChartCard title="Regional Sales" description="Sales by country" delay_ms=180>
                <BarChart
                    rows=region_rows
                    categories=vec!["sales"]
                    colors=REGIONAL_COLORS
                    value_formatter=format_currency
                />
            </ChartCard>

            <ChartCard title="Top Customers" description="Highest spending customers" delay_ms=240>
                <BarChart
                    rows=customer_rows
                    categories=vec!["total_spent"]
                    colors=CUSTOMER_COLORS
                    value_formatter=format_currency
                />
            </ChartCard>
        </div>
    }
}
