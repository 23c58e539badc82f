use std::sync::Arc;

use d2j::{AppConfig, RouteTable, StorageError, ViewKind};
use leptos::prelude::*;
use leptos_router::components::Router;
use leptos_router::hooks::use_location;
use wasm_bindgen::JsCast;

mod api_client;
mod local_storage;
mod logging;
mod shell;
mod views;

use api_client::ApiClient;
use shell::Topbar;
use views::{ConnectionView, ConvertView, HomeView, NotFoundView};

/// Element the app mounts into; `<body>` is used when it is missing.
const MOUNT_ELEMENT_ID: &str = "app";

/// Everything the views need that is fixed for the lifetime of the page.
#[derive(Clone)]
pub(super) struct AppContext {
    pub(super) config: Arc<AppConfig>,
    pub(super) routes: RouteTable,
    pub(super) api: ApiClient,
}

impl AppContext {
    fn new(config: AppConfig) -> Self {
        let routes = RouteTable::new(config.route_set);
        let api = ApiClient::new(config.api_url.clone());
        Self {
            config: Arc::new(config),
            routes,
            api,
        }
    }

    /// Href for a route name, or `None` if this route set does not declare it.
    pub(super) fn href(&self, name: &str) -> Option<String> {
        self.routes.href(name, &self.config.base_path)
    }
}

/// The persisted database key, mirrored into a signal so the UI follows it.
#[derive(Clone, Copy)]
pub(super) struct StoredKey(RwSignal<Option<String>>);

impl StoredKey {
    fn load() -> Self {
        Self(RwSignal::new(local_storage::key_storage().get_stored_key()))
    }

    pub(super) fn get(&self) -> Option<String> {
        self.0.get()
    }

    pub(super) fn get_untracked(&self) -> Option<String> {
        self.0.get_untracked()
    }

    pub(super) fn save(&self, value: String) -> Result<(), StorageError> {
        local_storage::key_storage().set_stored_key(&value)?;
        self.0.set(Some(value));
        Ok(())
    }

    pub(super) fn forget(&self) -> Result<(), StorageError> {
        local_storage::key_storage().clear_stored_key()?;
        self.0.set(None);
        Ok(())
    }
}

pub fn start() {
    console_error_panic_hook::set_once();
    logging::init();

    let config = AppConfig::from_build_env().unwrap_or_else(|e| {
        tracing::warn!("invalid build configuration, using defaults: {e}");
        AppConfig::default()
    });
    config.log_startup();
    let ctx = AppContext::new(config);

    match mount_target() {
        Some(el) => leptos::mount::mount_to(el, move || view! { <App ctx=ctx /> }).forget(),
        None => {
            tracing::warn!("#{MOUNT_ELEMENT_ID} not found, mounting to <body>");
            leptos::mount::mount_to_body(move || view! { <App ctx=ctx /> });
        }
    }
}

fn mount_target() -> Option<web_sys::HtmlElement> {
    web_sys::window()?
        .document()?
        .get_element_by_id(MOUNT_ELEMENT_ID)?
        .dyn_into::<web_sys::HtmlElement>()
        .ok()
}

#[component]
fn App(ctx: AppContext) -> impl IntoView {
    provide_context(ctx);
    provide_context(StoredKey::load());

    view! {
        <Router>
            <div class="app">
                <Topbar />
                <main class="app-main">
                    <RouteOutlet />
                </main>
            </div>
        </Router>
    }
}

/// Renders the view the route table assigns to the current location.
#[component]
fn RouteOutlet() -> impl IntoView {
    let ctx = expect_context::<AppContext>();
    let location = use_location().pathname;

    move || {
        let pathname = location.get();
        match ctx.routes.resolve(&pathname, &ctx.config.base_path) {
            Some(route) => render_view(route.view),
            None => view! { <NotFoundView path=pathname /> }.into_any(),
        }
    }
}

fn render_view(kind: ViewKind) -> AnyView {
    match kind {
        ViewKind::Home => view! { <HomeView /> }.into_any(),
        ViewKind::Connection => view! { <ConnectionView /> }.into_any(),
        ViewKind::Convert => view! { <ConvertView /> }.into_any(),
    }
}
