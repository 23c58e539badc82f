use d2j::api::{ConnectionForm, ConvertForm};
use d2j::ApiError;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::use_navigate;
use leptos_router::NavigateOptions;

use super::shell::{Status, StatusLine};
use super::{AppContext, StoredKey};

const DEFAULT_PORT: &str = "5432";
const DEFAULT_SESSION_TIME: &str = "1h";

#[component]
pub(super) fn HomeView() -> impl IntoView {
    let ctx = expect_context::<AppContext>();
    let connection_href = ctx.href("connection");
    let convert_href = ctx.href("convert");

    view! {
        <section class="page home">
            <h2>"Database to JSON"</h2>
            <p class="subtle">
                "Connect to a PostgreSQL database, pick a table and get its rows back as JSON."
            </p>
            <ol class="steps">
                <li>
                    {connection_href
                        .map(|href| view! { <a href=href>"Connect"</a> })}
                    " with your database credentials. The server keeps them for the session time you choose and hands back a database key."
                </li>
                <li>
                    "The key is saved in this browser, so a reload keeps you connected."
                </li>
                {convert_href
                    .map(|href| {
                        view! {
                            <li>
                                <a href=href>"Convert"</a>
                                " a table, optionally narrowing it down by columns, a WHERE clause or a row limit."
                            </li>
                        }
                    })}
            </ol>
        </section>
    }
}

#[component]
pub(super) fn ConnectionView() -> impl IntoView {
    let ctx = expect_context::<AppContext>();
    let stored = expect_context::<StoredKey>();
    let navigate = use_navigate();

    let form = RwSignal::new(ConnectionForm {
        port: DEFAULT_PORT.to_string(),
        session_time: DEFAULT_SESSION_TIME.to_string(),
        ..ConnectionForm::default()
    });
    let status = RwSignal::new(None::<Status>);
    let pending = RwSignal::new(false);

    let do_test = {
        let api = ctx.api.clone();
        move || {
            let options = match form.with_untracked(ConnectionForm::to_options) {
                Ok(o) => o,
                Err(e) => {
                    status.set(Some(Status::Error(e.to_string())));
                    return;
                }
            };
            let api = api.clone();
            pending.set(true);
            status.set(Some(Status::Info("testing connection…".to_string())));
            spawn_local(async move {
                let res = api.test_connection(&options).await;
                pending.set(false);
                match res {
                    Ok(r) => {
                        tracing::info!("connection test succeeded");
                        status.set(Some(Status::Success(r.message)));
                    }
                    Err(e) => status.set(Some(Status::Error(e.to_string()))),
                }
            });
        }
    };

    let do_connect = {
        let api = ctx.api.clone();
        let convert_href = ctx.href("convert");
        move || {
            let request = match form.with_untracked(ConnectionForm::to_connect_request) {
                Ok(r) => r,
                Err(e) => {
                    status.set(Some(Status::Error(e.to_string())));
                    return;
                }
            };
            let api = api.clone();
            let navigate = navigate.clone();
            let convert_href = convert_href.clone();
            pending.set(true);
            status.set(Some(Status::Info("connecting…".to_string())));
            spawn_local(async move {
                let res = api.connect(&request).await;
                pending.set(false);
                let key = match res {
                    Ok(r) => r.database_key,
                    Err(e) => {
                        status.set(Some(Status::Error(e.to_string())));
                        return;
                    }
                };
                tracing::info!(
                    session = %request.connection_session_time,
                    "connected to database"
                );
                match stored.save(key) {
                    Ok(()) => {
                        status.set(Some(Status::Success(
                            "Connected. Database key saved in this browser.".to_string(),
                        )));
                        if let Some(href) = convert_href {
                            navigate(&href, NavigateOptions::default());
                        }
                    }
                    Err(e) => {
                        tracing::warn!("could not persist database key: {e}");
                        status.set(Some(Status::Error(format!(
                            "Connected, but the database key could not be saved: {e}"
                        ))));
                    }
                }
            });
        }
    };

    view! {
        <section class="page connection">
            <h2>"Connection"</h2>
            <StatusLine status=status />
            <form class="form" on:submit=|ev| ev.prevent_default()>
                <label class="field">
                    <span>"Host"</span>
                    <input
                        type="text"
                        placeholder="localhost"
                        prop:value=move || form.with(|f| f.host.clone())
                        on:input=move |ev| form.update(|f| f.host = event_target_value(&ev))
                    />
                </label>
                <label class="field">
                    <span>"Port"</span>
                    <input
                        type="number"
                        min="1"
                        max="65535"
                        prop:value=move || form.with(|f| f.port.clone())
                        on:input=move |ev| form.update(|f| f.port = event_target_value(&ev))
                    />
                </label>
                <label class="field">
                    <span>"Database"</span>
                    <input
                        type="text"
                        prop:value=move || form.with(|f| f.database_name.clone())
                        on:input=move |ev| {
                            form.update(|f| f.database_name = event_target_value(&ev))
                        }
                    />
                </label>
                <label class="field">
                    <span>"Username"</span>
                    <input
                        type="text"
                        autocomplete="username"
                        prop:value=move || form.with(|f| f.username.clone())
                        on:input=move |ev| form.update(|f| f.username = event_target_value(&ev))
                    />
                </label>
                <label class="field">
                    <span>"Password"</span>
                    <input
                        type="password"
                        autocomplete="current-password"
                        prop:value=move || form.with(|f| f.password.clone())
                        on:input=move |ev| form.update(|f| f.password = event_target_value(&ev))
                    />
                </label>
                <label class="field checkbox">
                    <input
                        type="checkbox"
                        prop:checked=move || form.with(|f| f.ssl_mode_enabled)
                        on:change=move |ev| {
                            form.update(|f| f.ssl_mode_enabled = event_target_checked(&ev))
                        }
                    />
                    <span>"Require SSL"</span>
                </label>
                <label class="field">
                    <span>"Session time"</span>
                    <input
                        type="text"
                        placeholder="30m, 1h, 2h 30m"
                        prop:value=move || form.with(|f| f.session_time.clone())
                        on:input=move |ev| {
                            form.update(|f| f.session_time = event_target_value(&ev))
                        }
                    />
                </label>
                <div class="actions">
                    <button
                        type="button"
                        class="btn ghost"
                        disabled=move || pending.get()
                        on:click=move |_| do_test()
                    >
                        "Test connection"
                    </button>
                    <button
                        type="button"
                        class="btn"
                        disabled=move || pending.get()
                        on:click=move |_| do_connect()
                    >
                        "Connect"
                    </button>
                </div>
            </form>
        </section>
    }
}

#[component]
pub(super) fn ConvertView() -> impl IntoView {
    let ctx = expect_context::<AppContext>();
    let stored = expect_context::<StoredKey>();

    let form = RwSignal::new(ConvertForm::default());
    let tables = RwSignal::new(Vec::<String>::new());
    let result = RwSignal::new(None::<String>);
    let status = RwSignal::new(None::<Status>);
    let pending = RwSignal::new(false);

    let report_error = move |e: ApiError| {
        if !e.invalidates_key() {
            status.set(Some(Status::Error(e.to_string())));
            return;
        }
        if let Err(err) = stored.forget() {
            tracing::warn!("could not clear expired database key: {err}");
        }
        tables.set(Vec::new());
        status.set(Some(Status::Error(
            "Your connection session expired. Connect to the database again.".to_string(),
        )));
    };

    let load_tables = {
        let api = ctx.api.clone();
        move || {
            let Some(key) = stored.get_untracked() else {
                status.set(Some(Status::Info(
                    "No database key stored yet. Connect to a database first.".to_string(),
                )));
                return;
            };
            let api = api.clone();
            pending.set(true);
            spawn_local(async move {
                let res = api.list_tables(&key).await;
                pending.set(false);
                match res {
                    Ok(list) => {
                        tracing::info!(count = list.len(), "loaded tables");
                        form.update(|f| {
                            if !list.contains(&f.table_name) {
                                f.table_name = list.first().cloned().unwrap_or_default();
                            }
                        });
                        status.set(Some(Status::Info(format!("{} tables", list.len()))));
                        tables.set(list);
                    }
                    Err(e) => report_error(e),
                }
            });
        }
    };

    let do_convert = {
        let api = ctx.api.clone();
        move || {
            let key = stored.get_untracked().unwrap_or_default();
            let request = match form.with_untracked(|f| f.to_request(&key)) {
                Ok(r) => r,
                Err(e) => {
                    status.set(Some(Status::Error(e.to_string())));
                    return;
                }
            };
            let api = api.clone();
            pending.set(true);
            spawn_local(async move {
                let res = api.convert(&request).await;
                pending.set(false);
                match res {
                    Ok(r) => {
                        tracing::info!(table = %request.table_name, "converted table to JSON");
                        result.set(Some(r.pretty_result()));
                        status.set(None);
                    }
                    Err(e) => report_error(e),
                }
            });
        }
    };

    let do_forget = move || match stored.forget() {
        Ok(()) => {
            tables.set(Vec::new());
            result.set(None);
            status.set(Some(Status::Info("Database key removed.".to_string())));
        }
        Err(e) => status.set(Some(Status::Error(e.to_string()))),
    };

    if stored.get_untracked().is_some() {
        load_tables();
    }

    let connection_href = ctx.href("connection");

    view! {
        <section class="page convert">
            <h2>"Convert"</h2>
            <StatusLine status=status />
            <Show
                when=move || stored.get().is_some()
                fallback=move || {
                    let href = connection_href.clone();
                    view! {
                        <p class="subtle">
                            "There is no database key in this browser yet. "
                            {href.map(|href| view! { <a href=href>"Connect to a database"</a> })}
                        </p>
                    }
                }
            >
                <form class="form" on:submit=|ev| ev.prevent_default()>
                    <label class="field">
                        <span>"Table"</span>
                        <select
                            prop:value=move || form.with(|f| f.table_name.clone())
                            on:change=move |ev| {
                                form.update(|f| f.table_name = event_target_value(&ev))
                            }
                        >
                            <option value="">"(choose a table)"</option>
                            <For
                                each=move || tables.get()
                                key=|t| t.clone()
                                children=move |t| {
                                    let label = t.clone();
                                    view! { <option value=t>{label}</option> }
                                }
                            />
                        </select>
                    </label>
                    <label class="field">
                        <span>"Columns"</span>
                        <input
                            type="text"
                            placeholder="all columns (or: id, name, email)"
                            prop:value=move || form.with(|f| f.fields.clone())
                            on:input=move |ev| form.update(|f| f.fields = event_target_value(&ev))
                        />
                    </label>
                    <label class="field">
                        <span>"WHERE"</span>
                        <input
                            type="text"
                            placeholder="id > 10"
                            prop:value=move || form.with(|f| f.where_clause.clone())
                            on:input=move |ev| {
                                form.update(|f| f.where_clause = event_target_value(&ev))
                            }
                        />
                    </label>
                    <label class="field">
                        <span>"Limit"</span>
                        <input
                            type="number"
                            min="0"
                            placeholder="no limit"
                            prop:value=move || form.with(|f| f.limit.clone())
                            on:input=move |ev| form.update(|f| f.limit = event_target_value(&ev))
                        />
                    </label>
                    <div class="actions">
                        <button
                            type="button"
                            class="btn ghost"
                            disabled=move || pending.get()
                            on:click={
                                let load_tables = load_tables.clone();
                                move |_| load_tables()
                            }
                        >
                            "Reload tables"
                        </button>
                        <button
                            type="button"
                            class="btn"
                            disabled=move || pending.get()
                            on:click={
                                let do_convert = do_convert.clone();
                                move |_| do_convert()
                            }
                        >
                            "Get JSON"
                        </button>
                        <button type="button" class="btn ghost" on:click=move |_| do_forget()>
                            "Forget key"
                        </button>
                    </div>
                </form>
                <Show when=move || result.with(Option::is_some)>
                    <pre class="json-result">{move || result.get().unwrap_or_default()}</pre>
                </Show>
            </Show>
        </section>
    }
}

#[component]
pub(super) fn NotFoundView(path: String) -> impl IntoView {
    let ctx = expect_context::<AppContext>();
    let home = ctx.routes.home();
    let home_href = ctx.href(home.name).unwrap_or_else(|| home.path.to_string());

    view! {
        <section class="page not-found">
            <h2>"Page not found"</h2>
            <p class="subtle">"Nothing lives at " <code>{path}</code> "."</p>
            <a href=home_href>"Back to " {home.view.title()}</a>
        </section>
    }
}
