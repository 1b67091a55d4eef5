use crate::shared::copilot::ActionStatus;
use crate::shared::icons::icon;
use leptos::prelude::*;
use serde_json::Value;

pub const NO_QUERY: &str = "No query provided";

/// `query` argument of a searchInternet call
pub fn query_from_args(args: &Value) -> String {
    args.get("query")
        .and_then(Value::as_str)
        .filter(|q| !q.is_empty())
        .unwrap_or(NO_QUERY)
        .to_string()
}

/// Card shown in the chat when the assistant searches the internet
#[component]
pub fn SearchResults(query: String, status: ActionStatus) -> impl IntoView {
    let (class, caption) = match status {
        ActionStatus::InProgress => ("search-results search-results--pending", "Searching..."),
        ActionStatus::Complete => ("search-results", "Search complete"),
    };

    view! {
        <div class=class data-status=status.as_str()>
            <div class="search-results__header">
                {icon("search")}
                <span class="search-results__query">{query}</span>
            </div>
            <div class="search-results__status">{caption}</div>
        </div>
    }
}
