//! In-memory transport that serves canned replies by path and records every call.

use std::cell::RefCell;
use std::collections::HashMap;

use qiwi_client_core::{ClientConfig, Error, Params, Result, Transport, Wallet};
use serde_json::{json, Value};

pub const WALLET: &str = "79991234567";

#[derive(Clone, Debug, PartialEq)]
pub struct Call {
    pub method: &'static str,
    pub path: String,
    pub params: Vec<(String, String)>,
    pub body: Option<Value>,
}

#[derive(Default)]
pub struct RecordingTransport {
    json: HashMap<String, Value>,
    bytes: HashMap<String, Vec<u8>>,
    calls: RefCell<Vec<Call>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(mut self, path: &str, body: Value) -> Self {
        self.json.insert(path.to_string(), body);
        self
    }

    pub fn reply_bytes(mut self, path: &str, body: &[u8]) -> Self {
        self.bytes.insert(path.to_string(), body.to_vec());
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn last_call(&self) -> Call {
        self.calls.borrow().last().cloned().expect("no calls recorded")
    }

    fn record(&self, method: &'static str, path: &str, params: &Params, body: Option<&Value>) {
        self.calls.borrow_mut().push(Call {
            method,
            path: path.to_string(),
            params: params.to_vec(),
            body: body.cloned(),
        });
    }

    fn canned(&self, path: &str) -> Result<Value> {
        self.json.get(path).cloned().ok_or_else(|| Error::Api {
            status: 404,
            body: format!("no reply for {path}"),
        })
    }
}

impl Transport for RecordingTransport {
    fn get_json(&self, path: &str, query: &Params) -> Result<Value> {
        self.record("GET", path, query, None);
        self.canned(path)
    }

    fn post_json(&self, path: &str, query: &Params, body: &Value) -> Result<Value> {
        self.record("POST", path, query, Some(body));
        self.canned(path)
    }

    fn post_form(&self, path: &str, form: &Params) -> Result<Value> {
        self.record("FORM", path, form, None);
        self.canned(path)
    }

    fn get_bytes(&self, path: &str, query: &Params) -> Result<Vec<u8>> {
        self.record("GET", path, query, None);
        self.bytes.get(path).cloned().ok_or_else(|| Error::Api {
            status: 404,
            body: format!("no reply for {path}"),
        })
    }
}

/// Wallet with a fixed number and no profile lookup on connect.
pub fn wallet(transport: RecordingTransport) -> Wallet<RecordingTransport> {
    let mut config = ClientConfig::new("token").with_wallet(WALLET);
    config.contract_info = false;
    Wallet::with_transport(config, transport).expect("wallet")
}

pub fn pairs(params: &[(String, String)]) -> Vec<(&str, &str)> {
    params.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect()
}

pub fn rub(amount: f64) -> Value {
    json!({"amount": amount, "currency": "643"})
}
