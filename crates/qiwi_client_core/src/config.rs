//! Client settings: token, wallet number, endpoint, proxy and timeout, from code or the environment.

use std::env;
use std::time::Duration;

use crate::error::{Error, Result};

pub const DEFAULT_API_URL: &str = "https://edge.qiwi.com";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Everything a wallet client needs. Passed explicitly to the transport; there is
/// no process-wide proxy or token.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub token: String,
    /// Wallet number without `+`, e.g. `79991234567`. Resolved from the profile
    /// when `None` and `contract_info` is enabled.
    pub wallet: Option<String>,
    pub api_url: String,
    /// Proxy URL for every request, e.g. `http://127.0.0.1:3128`.
    pub proxy: Option<String>,
    pub timeout: Duration,
    pub contract_info: bool,
    pub auth_info: bool,
    pub user_info: bool,
}

impl ClientConfig {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            wallet: None,
            api_url: DEFAULT_API_URL.to_string(),
            proxy: None,
            timeout: DEFAULT_TIMEOUT,
            contract_info: true,
            auth_info: true,
            user_info: true,
        }
    }

    pub fn with_wallet(mut self, number: &str) -> Self {
        self.wallet = Some(normalize_wallet(number));
        self
    }

    pub fn with_proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    /// Read `QIWI_TOKEN` (required), `QIWI_WALLET`, `QIWI_API_URL`, `QIWI_PROXY`
    /// and `QIWI_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self> {
        let token = env::var("QIWI_TOKEN").map_err(|_| Error::Config("QIWI_TOKEN is not set".to_string()))?;
        let mut config = Self::new(token);
        if let Ok(wallet) = env::var("QIWI_WALLET") {
            config = config.with_wallet(&wallet);
        }
        if let Ok(url) = env::var("QIWI_API_URL") {
            config.api_url = url.trim_end_matches('/').to_string();
        }
        config.proxy = env::var("QIWI_PROXY").ok().filter(|p| !p.is_empty());
        if let Ok(secs) = env::var("QIWI_TIMEOUT_SECS") {
            let secs: u64 = secs
                .parse()
                .map_err(|_| Error::Config(format!("QIWI_TIMEOUT_SECS is not a number: {secs}")))?;
            config.timeout = Duration::from_secs(secs);
        }
        Ok(config)
    }
}

/// `+7 999...` and `8999...` both become `7999...`.
pub fn normalize_wallet(number: &str) -> String {
    let digits = number.replace('+', "");
    match digits.strip_prefix('8') {
        Some(rest) => format!("7{rest}"),
        None => digits,
    }
}
