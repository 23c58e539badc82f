use d2j::api::{
    self, ConnectResponse, ConnectToDatabaseRequest, ConvertResponse, ConvertToJsonRequest,
    DatabaseConnectionOptions, Endpoint, ListDatabaseTablesRequest, ListTablesResponse,
    MessageResponse,
};
use d2j::ApiError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;

/// `fetch`-based client for the backend's `/api/database` endpoints.
#[derive(Debug, Clone)]
pub(super) struct ApiClient {
    api_url: String,
}

impl ApiClient {
    pub(super) fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
        }
    }

    pub(super) async fn test_connection(
        &self,
        options: &DatabaseConnectionOptions,
    ) -> Result<MessageResponse, ApiError> {
        self.post(Endpoint::TestConnection, options).await
    }

    pub(super) async fn connect(
        &self,
        request: &ConnectToDatabaseRequest,
    ) -> Result<ConnectResponse, ApiError> {
        self.post(Endpoint::Connect, request).await
    }

    pub(super) async fn list_tables(&self, database_key: &str) -> Result<Vec<String>, ApiError> {
        let request = ListDatabaseTablesRequest {
            database_key: database_key.to_string(),
        };
        let resp: ListTablesResponse = self.post(Endpoint::ListTables, &request).await?;
        Ok(resp.tables)
    }

    pub(super) async fn convert(
        &self,
        request: &ConvertToJsonRequest,
    ) -> Result<ConvertResponse, ApiError> {
        self.post(Endpoint::GetJson, request).await
    }

    async fn post<B, R>(&self, endpoint: Endpoint, body: &B) -> Result<R, ApiError>
    where
        B: Serialize,
        R: DeserializeOwned,
    {
        let url = endpoint.url(&self.api_url);
        let payload = api::encode_body(body)?;
        let window = web_sys::window().ok_or_else(|| ApiError::Transport("no window".to_string()))?;

        let init = web_sys::RequestInit::new();
        init.set_method(endpoint.method());
        init.set_mode(web_sys::RequestMode::Cors);
        init.set_body(&JsValue::from_str(&payload));

        let request =
            web_sys::Request::new_with_str_and_init(&url, &init).map_err(transport_error)?;
        request
            .headers()
            .set("Content-Type", "application/json")
            .map_err(transport_error)?;

        let value = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(transport_error)?;
        let response: web_sys::Response = value.dyn_into().map_err(transport_error)?;
        let status = response.status();
        let text = JsFuture::from(response.text().map_err(transport_error)?)
            .await
            .map_err(transport_error)?
            .as_string()
            .unwrap_or_default();

        tracing::debug!(endpoint = endpoint.path(), status, "api response");
        api::decode_response(status, &text)
    }
}

fn transport_error(err: JsValue) -> ApiError {
    let message = err
        .dyn_ref::<js_sys::Error>()
        .map(|e| String::from(e.message()))
        .or_else(|| err.as_string())
        .unwrap_or_else(|| format!("{err:?}"));
    ApiError::Transport(message)
}
