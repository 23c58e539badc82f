//! Contract of the backend's `/api/database` endpoints.
//!
//! The backend is a separate service; this module only knows its wire
//! format. Bodies are JSON with camelCase field names. Every endpoint is a
//! `POST`. A 200 carries the response body, a 422 carries a user-facing
//! `{"message": ..}` and a 500 carries either the same shape or nothing,
//! depending on how the server is configured.

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Message the backend sends (with a 422) when the credentials cached under a
/// database key have expired.
pub const SESSION_EXPIRED_MESSAGE: &str = "Connection session time expired";

const DEFAULT_SERVER_ERROR: &str = "internal server error";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    TestConnection,
    Connect,
    ListTables,
    GetJson,
}

impl Endpoint {
    pub fn path(self) -> &'static str {
        match self {
            Endpoint::TestConnection => "/database/test-connection",
            Endpoint::Connect => "/database/connect",
            Endpoint::ListTables => "/database/list-tables",
            Endpoint::GetJson => "/database/get-json",
        }
    }

    pub fn method(self) -> &'static str {
        "POST"
    }

    pub fn url(self, api_url: &str) -> String {
        format!("{}{}", api_url.trim_end_matches('/'), self.path())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseConnectionOptions {
    pub host: String,
    pub port: u16,
    pub database_name: String,
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub ssl_mode_enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectToDatabaseRequest {
    /// Go-style duration, e.g. `1h30m`.
    pub connection_session_time: String,
    pub database_connection_options: DatabaseConnectionOptions,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListDatabaseTablesRequest {
    pub database_key: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConvertToJsonRequest {
    pub database_key: String,
    pub table_name: String,
    pub fields: Vec<String>,
    /// 0 means no limit.
    pub limit: u32,
    #[serde(rename = "where")]
    pub where_clause: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectResponse {
    pub database_key: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListTablesResponse {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub tables: Vec<String>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConvertResponse {
    pub result: String,
}

impl ConvertResponse {
    /// The result re-indented when it parses as JSON, verbatim otherwise.
    pub fn pretty_result(&self) -> String {
        serde_json::from_str::<serde_json::Value>(&self.result)
            .ok()
            .and_then(|v| serde_json::to_string_pretty(&v).ok())
            .unwrap_or_else(|| self.result.clone())
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

pub fn encode_body<T: Serialize>(body: &T) -> Result<String, ApiError> {
    serde_json::to_string(body).map_err(|e| ApiError::InvalidInput(e.to_string()))
}

/// Turns an HTTP status and body into the endpoint's response type.
pub fn decode_response<T: DeserializeOwned>(status: u16, body: &str) -> Result<T, ApiError> {
    match status {
        200 => serde_json::from_str(body).map_err(|e| ApiError::Decode(e.to_string())),
        422 => {
            let message = error_message(body).ok_or_else(|| ApiError::Decode(body.to_string()))?;
            if message == SESSION_EXPIRED_MESSAGE {
                Err(ApiError::SessionExpired)
            } else {
                Err(ApiError::Client(message))
            }
        }
        500..=599 => Err(ApiError::Server(
            error_message(body).unwrap_or_else(|| DEFAULT_SERVER_ERROR.to_string()),
        )),
        other => Err(ApiError::UnexpectedStatus(other)),
    }
}

fn error_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .map(|b| b.message)
        .filter(|m| !m.trim().is_empty())
}

/// Raw connection form input, as typed by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectionForm {
    pub host: String,
    pub port: String,
    pub database_name: String,
    pub username: String,
    pub password: String,
    pub ssl_mode_enabled: bool,
    pub session_time: String,
}

impl ConnectionForm {
    pub fn to_options(&self) -> Result<DatabaseConnectionOptions, ApiError> {
        let host = required("host", &self.host)?;
        let database_name = required("database name", &self.database_name)?;
        let username = required("username", &self.username)?;
        let port = parse_port(&self.port)?;

        Ok(DatabaseConnectionOptions {
            host,
            port,
            database_name,
            username,
            // Passwords are sent as typed.
            password: self.password.clone(),
            ssl_mode_enabled: self.ssl_mode_enabled,
        })
    }

    pub fn to_connect_request(&self) -> Result<ConnectToDatabaseRequest, ApiError> {
        let database_connection_options = self.to_options()?;
        let session = parse_session_time(&self.session_time)?;
        Ok(ConnectToDatabaseRequest {
            connection_session_time: format_go_duration(session),
            database_connection_options,
        })
    }
}

/// Raw convert form input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConvertForm {
    pub table_name: String,
    /// Comma separated column names; blank means every column.
    pub fields: String,
    /// Blank means no limit.
    pub limit: String,
    pub where_clause: String,
}

impl ConvertForm {
    pub fn to_request(&self, database_key: &str) -> Result<ConvertToJsonRequest, ApiError> {
        if database_key.trim().is_empty() {
            return Err(ApiError::InvalidInput(
                "no database key stored; connect to a database first".to_string(),
            ));
        }
        let table_name = required("table", &self.table_name)?;
        let limit = match self.limit.trim() {
            "" => 0,
            v => v
                .parse::<u32>()
                .map_err(|_| ApiError::InvalidInput(format!("invalid limit {v:?}")))?,
        };

        Ok(ConvertToJsonRequest {
            database_key: database_key.to_string(),
            table_name,
            fields: split_fields(&self.fields),
            limit,
            where_clause: self.where_clause.trim().to_string(),
        })
    }
}

pub fn split_fields(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parses human input like `30m`, `1h 30m` or `2days` into a whole number of
/// seconds (at least one).
pub fn parse_session_time(raw: &str) -> Result<Duration, ApiError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ApiError::InvalidInput("session time is required".to_string()));
    }
    let d = humantime::parse_duration(raw)
        .map_err(|e| ApiError::InvalidInput(format!("invalid session time {raw:?}: {e}")))?;
    if d.as_secs() == 0 {
        return Err(ApiError::InvalidInput(
            "session time must be at least one second".to_string(),
        ));
    }
    Ok(Duration::from_secs(d.as_secs()))
}

/// Renders a duration in the `1h2m3s` form the backend parses.
pub fn format_go_duration(d: Duration) -> String {
    let total = d.as_secs();
    let (h, m, s) = (total / 3600, (total % 3600) / 60, total % 60);

    let mut out = String::new();
    if h > 0 {
        out.push_str(&format!("{h}h"));
    }
    if m > 0 {
        out.push_str(&format!("{m}m"));
    }
    if s > 0 || out.is_empty() {
        out.push_str(&format!("{s}s"));
    }
    out
}

fn required(label: &str, value: &str) -> Result<String, ApiError> {
    let v = value.trim();
    if v.is_empty() {
        Err(ApiError::InvalidInput(format!("{label} is required")))
    } else {
        Ok(v.to_string())
    }
}

fn parse_port(raw: &str) -> Result<u16, ApiError> {
    match raw.trim().parse::<u16>() {
        Ok(p) if p > 0 => Ok(p),
        _ => Err(ApiError::InvalidInput(format!(
            "invalid port {:?} (expected 1-65535)",
            raw.trim()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn form() -> ConnectionForm {
        ConnectionForm {
            host: " db.internal ".to_string(),
            port: "5432".to_string(),
            database_name: "shop".to_string(),
            username: "reader".to_string(),
            password: " s3cret ".to_string(),
            ssl_mode_enabled: false,
            session_time: "1h 30m".to_string(),
        }
    }

    #[test]
    fn endpoint_urls_join_cleanly() {
        assert_eq!(
            Endpoint::Connect.url("http://localhost:8080/api"),
            "http://localhost:8080/api/database/connect"
        );
        assert_eq!(
            Endpoint::GetJson.url("http://localhost:8080/api/"),
            "http://localhost:8080/api/database/get-json"
        );
        for e in [
            Endpoint::TestConnection,
            Endpoint::Connect,
            Endpoint::ListTables,
            Endpoint::GetJson,
        ] {
            assert_eq!(e.method(), "POST");
            assert!(e.path().starts_with("/database/"));
        }
    }

    #[test]
    fn connect_request_uses_backend_field_names() {
        let req = form().to_connect_request().unwrap();
        let v: serde_json::Value = serde_json::from_str(&encode_body(&req).unwrap()).unwrap();
        assert_eq!(
            v,
            json!({
                "connectionSessionTime": "1h30m",
                "databaseConnectionOptions": {
                    "host": "db.internal",
                    "port": 5432,
                    "databaseName": "shop",
                    "username": "reader",
                    "password": " s3cret ",
                    "sslModeEnabled": false
                }
            })
        );
    }

    #[test]
    fn convert_request_renames_where() {
        let req = ConvertForm {
            table_name: "orders".to_string(),
            fields: "id, total,, ".to_string(),
            limit: "10".to_string(),
            where_clause: " total > 5 ".to_string(),
        }
        .to_request("key-1")
        .unwrap();
        let v: serde_json::Value = serde_json::from_str(&encode_body(&req).unwrap()).unwrap();
        assert_eq!(
            v,
            json!({
                "databaseKey": "key-1",
                "tableName": "orders",
                "fields": ["id", "total"],
                "limit": 10,
                "where": "total > 5"
            })
        );
    }

    #[test]
    fn convert_form_defaults_and_errors() {
        let req = ConvertForm {
            table_name: "orders".to_string(),
            ..ConvertForm::default()
        }
        .to_request("k")
        .unwrap();
        assert!(req.fields.is_empty());
        assert_eq!(req.limit, 0);
        assert_eq!(req.where_clause, "");

        let missing_key = ConvertForm {
            table_name: "orders".to_string(),
            ..ConvertForm::default()
        }
        .to_request("  ");
        assert!(matches!(missing_key, Err(ApiError::InvalidInput(_))));

        let bad_limit = ConvertForm {
            table_name: "orders".to_string(),
            limit: "-1".to_string(),
            ..ConvertForm::default()
        }
        .to_request("k");
        assert!(matches!(bad_limit, Err(ApiError::InvalidInput(_))));

        let no_table = ConvertForm::default().to_request("k");
        assert_eq!(
            no_table,
            Err(ApiError::InvalidInput("table is required".to_string()))
        );
    }

    #[test]
    fn connection_form_validation() {
        let mut f = form();
        f.port = "0".to_string();
        assert!(matches!(f.to_options(), Err(ApiError::InvalidInput(_))));
        f.port = "70000".to_string();
        assert!(matches!(f.to_options(), Err(ApiError::InvalidInput(_))));

        let mut f = form();
        f.host = "   ".to_string();
        assert_eq!(
            f.to_options(),
            Err(ApiError::InvalidInput("host is required".to_string()))
        );

        let mut f = form();
        f.session_time = "soon".to_string();
        assert!(f.to_options().is_ok());
        assert!(matches!(
            f.to_connect_request(),
            Err(ApiError::InvalidInput(_))
        ));
    }

    #[test]
    fn session_time_is_normalized_for_the_backend() {
        let cases = [
            ("30m", "30m"),
            ("1h30m", "1h30m"),
            ("90s", "1m30s"),
            ("2days", "48h"),
            ("1h 0m 5s", "1h5s"),
        ];
        for (input, expected) in cases {
            let d = parse_session_time(input).unwrap();
            assert_eq!(format_go_duration(d), expected, "input {input:?}");
        }
        assert!(parse_session_time("").is_err());
        assert!(parse_session_time("500ms").is_err());
        assert_eq!(format_go_duration(Duration::ZERO), "0s");
    }

    #[test]
    fn decodes_success_bodies() {
        let r: ConnectResponse = decode_response(200, r#"{"databaseKey":"$2a$14$abc"}"#).unwrap();
        assert_eq!(r.database_key, "$2a$14$abc");

        let t: ListTablesResponse = decode_response(200, r#"{"tables":null}"#).unwrap();
        assert!(t.tables.is_empty());
        let t: ListTablesResponse = decode_response(200, "{}").unwrap();
        assert!(t.tables.is_empty());

        let t: ListTablesResponse = decode_response(200, r#"{"tables":["a","b"]}"#).unwrap();
        assert_eq!(t.tables, ["a", "b"]);

        let bad: Result<ConnectResponse, _> = decode_response(200, "not json");
        assert!(matches!(bad, Err(ApiError::Decode(_))));
    }

    #[test]
    fn classifies_error_responses() {
        let expired: Result<ListTablesResponse, _> =
            decode_response(422, r#"{"message":"Connection session time expired"}"#);
        assert_eq!(expired, Err(ApiError::SessionExpired));
        assert!(ApiError::SessionExpired.invalidates_key());

        let client: Result<ListTablesResponse, _> =
            decode_response(422, r#"{"message":"invalid request body"}"#);
        assert_eq!(
            client,
            Err(ApiError::Client("invalid request body".to_string()))
        );
        assert!(!ApiError::Client(String::new()).invalidates_key());

        let server: Result<MessageResponse, _> =
            decode_response(500, r#"{"message":"connect to database"}"#);
        assert_eq!(
            server,
            Err(ApiError::Server("connect to database".to_string()))
        );

        let hidden: Result<MessageResponse, _> = decode_response(500, "");
        assert_eq!(
            hidden,
            Err(ApiError::Server("internal server error".to_string()))
        );

        let other: Result<MessageResponse, _> = decode_response(404, "404 page not found");
        assert_eq!(other, Err(ApiError::UnexpectedStatus(404)));
    }

    #[test]
    fn pretty_result_reindents_json_and_keeps_other_text() {
        let r = ConvertResponse {
            result: "[ {\"id\": 1},\n{\"id\": 2}\n ]".to_string(),
        };
        assert_eq!(
            r.pretty_result(),
            "[\n  {\n    \"id\": 1\n  },\n  {\n    \"id\": 2\n  }\n]"
        );

        let raw = ConvertResponse {
            result: "[ ]x".to_string(),
        };
        assert_eq!(raw.pretty_result(), "[ ]x");
    }

    #[test]
    fn split_fields_drops_blanks() {
        assert_eq!(split_fields(" a ,b,, c "), ["a", "b", "c"]);
        assert!(split_fields(" , ").is_empty());
    }
}
