use leptos::prelude::*;
use leptos_router::hooks::use_location;

use super::{AppContext, StoredKey};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum Status {
    Info(String),
    Success(String),
    Error(String),
}

impl Status {
    fn class(&self) -> &'static str {
        match self {
            Status::Info(_) => "status-line info",
            Status::Success(_) => "status-line success",
            Status::Error(_) => "status-line error",
        }
    }

    fn message(&self) -> &str {
        match self {
            Status::Info(m) | Status::Success(m) | Status::Error(m) => m,
        }
    }
}

#[component]
pub(super) fn Topbar() -> impl IntoView {
    let ctx = expect_context::<AppContext>();
    let stored = expect_context::<StoredKey>();
    let pathname = use_location().pathname;

    let links = ctx
        .routes
        .entries()
        .iter()
        .map(|route| {
            let href = ctx.href(route.name).unwrap_or_else(|| route.path.to_string());
            let routes = ctx.routes;
            let base_path = ctx.config.base_path.clone();
            let class = move || {
                let current = routes.resolve(&pathname.get(), &base_path);
                if current.map(|r| r.name) == Some(route.name) {
                    "nav-link active"
                } else {
                    "nav-link"
                }
            };
            view! {
                <a class=class href=href>
                    {route.view.title()}
                </a>
            }
        })
        .collect_view();

    view! {
        <header class="app-header">
            <div class="app-header-left">
                <h1 class="brand">"d2j"</h1>
                <nav class="app-nav">{links}</nav>
            </div>
            <div class="app-header-right">
                <span class="status">
                    {move || {
                        if stored.get().is_some() {
                            "database key stored"
                        } else {
                            "not connected"
                        }
                    }}
                </span>
            </div>
        </header>
    }
}

#[component]
pub(super) fn StatusLine(status: RwSignal<Option<Status>>) -> impl IntoView {
    view! {
        <Show when=move || status.with(Option::is_some)>
            <div
                class=move || status.with(|s| s.as_ref().map_or("status-line", Status::class))
                role="status"
                aria-live="polite"
            >
                <div style="flex: 1; white-space: pre-wrap;">
                    {move || status.with(|s| s.as_ref().map(|s| s.message().to_string()).unwrap_or_default())}
                </div>
                <button class="status-close" title="Dismiss" on:click=move |_| status.set(None)>
                    "×"
                </button>
            </div>
        </Show>
    }
}
