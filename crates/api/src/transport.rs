//! HTTP transport for the HAP open API: credential injection and response
//! envelope unwrapping.

use crate::config::ApiConfig;
use crate::error::{HapError, HapResult};
use reqwest::Client;
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::debug;

/// HTTP transport for making API requests. POST requests carry the
/// credentials in the JSON body, GET requests in the query string, matching
/// the platform contract.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    config: Arc<ApiConfig>,
}

impl HttpTransport {
    pub fn new(config: Arc<ApiConfig>) -> HapResult<Self> {
        // Reject malformed custom hosts up front instead of per request.
        url::Url::parse(&config.api_base())?;
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    fn endpoint_url(&self, path: &str) -> String {
        format!("{}{}", self.config.api_base(), path)
    }

    pub(crate) fn report_url(&self) -> String {
        self.config.report_url()
    }

    /// Merge the credentials into a JSON payload. Non-object payloads are
    /// wrapped into a fresh object.
    fn with_credentials(&self, payload: Value) -> Value {
        let mut body = match payload {
            Value::Object(map) => map,
            Value::Null => Map::new(),
            other => {
                let mut map = Map::new();
                map.insert("payload".to_string(), other);
                map
            }
        };
        body.insert(
            "appKey".to_string(),
            Value::String(self.config.app_key.clone()),
        );
        body.insert("sign".to_string(), Value::String(self.config.sign.clone()));
        Value::Object(body)
    }

    /// Execute a GET request with the credentials and extra parameters in
    /// the query string.
    pub async fn get(&self, path: &str, query: &[(&str, String)]) -> HapResult<Value> {
        let url = self.endpoint_url(path);
        debug!(url = %url, "GET request");

        let mut params: Vec<(&str, &str)> = vec![
            ("appKey", self.config.app_key.as_str()),
            ("sign", self.config.sign.as_str()),
        ];
        params.extend(query.iter().map(|(k, v)| (*k, v.as_str())));

        let response = self.client.get(&url).query(&params).send().await?;
        unwrap_envelope(response.json().await?)
    }

    /// Execute a POST request against an open-API path.
    pub async fn post(&self, path: &str, payload: Value) -> HapResult<Value> {
        self.post_url(&self.endpoint_url(path), payload).await
    }

    /// Execute a POST request against an absolute URL (the report endpoint
    /// lives on a different host).
    pub async fn post_url(&self, url: &str, payload: Value) -> HapResult<Value> {
        debug!(url = %url, "POST request");
        let body = self.with_credentials(payload);
        let response = self.client.post(url).json(&body).send().await?;
        unwrap_envelope(response.json().await?)
    }
}

/// Unwrap the upstream response envelope. The open API answers either
/// `{error_code, error_msg, data}` or `{success, data, ...}` depending on
/// the endpoint family; anything else passes through untouched.
pub(crate) fn unwrap_envelope(value: Value) -> HapResult<Value> {
    let Some(body) = value.as_object() else {
        return Ok(value);
    };

    if let Some(code) = body.get("error_code").and_then(Value::as_i64) {
        if code != 1 {
            let message = body
                .get("error_msg")
                .and_then(Value::as_str)
                .unwrap_or("upstream request failed");
            return Err(HapError::upstream(code, message));
        }
        return Ok(body.get("data").cloned().unwrap_or(Value::Null));
    }

    if let Some(success) = body.get("success").and_then(Value::as_bool) {
        if !success {
            let message = body
                .get("error_msg")
                .or_else(|| body.get("msg"))
                .and_then(Value::as_str)
                .unwrap_or("upstream request failed");
            return Err(HapError::upstream(None, message));
        }
        return Ok(body.get("data").cloned().unwrap_or(value.clone()));
    }

    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn transport_for(server: &MockServer) -> HttpTransport {
        let config = ApiConfig::new("key-1", "sig-1").with_host(server.uri());
        HttpTransport::new(Arc::new(config)).unwrap()
    }

    #[test]
    fn test_malformed_host_is_rejected() {
        let config = ApiConfig::new("k", "s").with_host("not a url");
        let err = HttpTransport::new(Arc::new(config)).unwrap_err();
        assert!(matches!(err, HapError::InvalidUrl(_)));
    }

    #[test]
    fn test_envelope_error_code_failure() {
        let err = unwrap_envelope(json!({
            "error_code": 10101,
            "error_msg": "invalid worksheet"
        }))
        .unwrap_err();
        match err {
            HapError::Api { code, message } => {
                assert_eq!(code, Some(10101));
                assert_eq!(message, "invalid worksheet");
            }
            other => panic!("expected Api error, got {:?}", other),
        }
    }

    #[test]
    fn test_envelope_error_code_success_extracts_data() {
        let data = unwrap_envelope(json!({"error_code": 1, "data": {"rowid": "r1"}})).unwrap();
        assert_eq!(data, json!({"rowid": "r1"}));
    }

    #[test]
    fn test_envelope_success_false() {
        let err = unwrap_envelope(json!({"success": false, "error_msg": "denied"})).unwrap_err();
        assert!(matches!(err, HapError::Api { code: None, .. }));
    }

    #[test]
    fn test_envelope_passthrough_for_plain_documents() {
        let doc = json!({"metadata": {}, "data": []});
        assert_eq!(unwrap_envelope(doc.clone()).unwrap(), doc);
    }

    #[tokio::test]
    async fn test_post_injects_credentials() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/v2/open/worksheet/getWorksheetInfo"))
            .and(body_partial_json(json!({
                "appKey": "key-1",
                "sign": "sig-1",
                "worksheetId": "ws1"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "error_code": 1,
                "data": {"name": "Orders"}
            })))
            .mount(&server)
            .await;

        let transport = transport_for(&server);
        let data = transport
            .post(
                "/v2/open/worksheet/getWorksheetInfo",
                json!({"worksheetId": "ws1"}),
            )
            .await
            .unwrap();
        assert_eq!(data, json!({"name": "Orders"}));
    }

    #[tokio::test]
    async fn test_get_puts_credentials_in_query() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v1/open/app/get"))
            .and(query_param("appKey", "key-1"))
            .and(query_param("sign", "sig-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "error_code": 1,
                "data": {"sections": []}
            })))
            .mount(&server)
            .await;

        let transport = transport_for(&server);
        let data = transport.get("/v1/open/app/get", &[]).await.unwrap();
        assert_eq!(data, json!({"sections": []}));
    }

    #[tokio::test]
    async fn test_upstream_error_is_surfaced() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/v2/open/worksheet/getFilterRows"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "error_code": 10005,
                "error_msg": "permission denied"
            })))
            .mount(&server)
            .await;

        let transport = transport_for(&server);
        let err = transport
            .post("/v2/open/worksheet/getFilterRows", json!({}))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("permission denied"));
    }
}
