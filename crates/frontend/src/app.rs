use crate::dashboards::InsightsDashboard;
use crate::layout::Shell;
use crate::shared::copilot::{CopilotContext, CopilotSidebar};
use leptos::prelude::*;
use thaw::ConfigProvider;

#[component]
pub fn App() -> impl IntoView {
    // Readables and actions registered anywhere on the page end up here
    provide_context(CopilotContext::new());

    view! {
        <ConfigProvider>
            <Shell
                title="Data Insights Dashboard"
                center=|| view! { <InsightsDashboard /> }.into_any()
                right=|| {
                    view! {
                        <CopilotSidebar
                            title="Data Insights Assistant"
                            initial="Hi! Ask me anything about the sales, films, categories, regions or customers on this dashboard."
                            default_open=true
                        />
                    }
                        .into_any()
                }
            />
        </ConfigProvider>
    }
}
