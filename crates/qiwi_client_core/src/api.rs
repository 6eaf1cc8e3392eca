//! HTTP transport for the wallet API. Thin by intent: build the request, attach
//! the bearer token, hand back the JSON body. No retries and no throttling; the
//! service enforces its own limits.

use log::{debug, warn};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::RequestBuilder;
use serde_json::Value;

use crate::config::ClientConfig;
use crate::error::{Error, Result};

/// Query or form pairs, sent in order.
pub type Params = [(String, String)];

/// What the wallet facade needs from an HTTP client.
///
/// `path` is either relative to the API root (`person-profile/v1/profile/current`)
/// or an absolute `https://` URL for endpoints hosted elsewhere.
pub trait Transport {
    fn get_json(&self, path: &str, query: &Params) -> Result<Value>;

    fn post_json(&self, path: &str, query: &Params, body: &Value) -> Result<Value>;

    fn post_form(&self, path: &str, form: &Params) -> Result<Value>;

    fn get_bytes(&self, path: &str, query: &Params) -> Result<Vec<u8>>;
}

/// `reqwest` transport driven by its own runtime, so callers stay synchronous.
pub struct HttpTransport {
    client: reqwest::Client,
    runtime: tokio::runtime::Runtime,
    api_url: String,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder()
            .timeout(config.timeout)
            .default_headers(default_headers(&config.token)?);
        if let Some(proxy) = &config.proxy {
            builder = builder.proxy(reqwest::Proxy::all(proxy)?);
        }

        Ok(Self {
            client: builder.build()?,
            runtime: tokio::runtime::Runtime::new()?,
            api_url: config.api_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with("https://") || path.starts_with("http://") {
            path.to_string()
        } else {
            format!("{}/{}", self.api_url, path.trim_start_matches('/'))
        }
    }

    fn send(&self, method: &str, path: &str, request: RequestBuilder) -> Result<Vec<u8>> {
        debug!("{method} {path}");
        self.runtime.block_on(async {
            let resp = request.send().await?;
            let status = resp.status();
            let body = resp.bytes().await?;
            if !status.is_success() {
                let text = String::from_utf8_lossy(&body).into_owned();
                warn!("{method} {path} failed: {status}");
                return Err(Error::Api {
                    status: status.as_u16(),
                    body: text,
                });
            }
            Ok::<_, Error>(body.to_vec())
        })
    }

    fn send_json(&self, method: &str, path: &str, request: RequestBuilder) -> Result<Value> {
        let body = self.send(method, path, request)?;
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_slice(&body)?)
    }
}

/// Headers sent with every request. Form posts override `Content-Type`.
fn default_headers(token: &str) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    let mut bearer = HeaderValue::from_str(&format!("Bearer {token}"))
        .map_err(|e| Error::Config(format!("token is not a valid header value: {e}")))?;
    bearer.set_sensitive(true);
    headers.insert(AUTHORIZATION, bearer);
    Ok(headers)
}

impl Transport for HttpTransport {
    fn get_json(&self, path: &str, query: &Params) -> Result<Value> {
        let req = self.client.get(self.url(path)).query(query);
        self.send_json("GET", path, req)
    }

    fn post_json(&self, path: &str, query: &Params, body: &Value) -> Result<Value> {
        let req = self.client.post(self.url(path)).query(query).json(body);
        self.send_json("POST", path, req)
    }

    fn post_form(&self, path: &str, form: &Params) -> Result<Value> {
        let req = self.client.post(self.url(path)).form(form);
        self.send_json("POST", path, req)
    }

    fn get_bytes(&self, path: &str, query: &Params) -> Result<Vec<u8>> {
        let req = self.client.get(self.url(path)).query(query);
        self.send("GET", path, req)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_relative_paths_and_keeps_absolute_urls() {
        let config = ClientConfig::new("token");
        let transport = HttpTransport::new(&config).expect("transport");
        assert_eq!(
            transport.url("person-profile/v1/profile/current"),
            "https://edge.qiwi.com/person-profile/v1/profile/current"
        );
        assert_eq!(transport.url("/sinap/crossRates"), "https://edge.qiwi.com/sinap/crossRates");
        assert_eq!(
            transport.url("https://qiwi.com/mobile/detect.action"),
            "https://qiwi.com/mobile/detect.action"
        );
    }

    #[test]
    fn default_headers_carry_json_and_sensitive_bearer() {
        let headers = default_headers("secret").expect("headers");
        assert_eq!(headers.get(ACCEPT).and_then(|v| v.to_str().ok()), Some("application/json"));
        assert_eq!(headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok()), Some("application/json"));
        let bearer = headers.get(AUTHORIZATION).expect("authorization");
        assert!(bearer.is_sensitive());
        assert_eq!(bearer.to_str().ok(), Some("Bearer secret"));
    }

    #[test]
    fn rejects_token_that_cannot_be_a_header() {
        let config = ClientConfig::new("bad\ntoken");
        assert!(matches!(HttpTransport::new(&config), Err(Error::Config(_))));
    }
}
