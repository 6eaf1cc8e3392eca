//! Endpoint facade: one method per wallet operation, each assembling its request,
//! calling the transport and decoding the reply.

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, Utc};
use log::{debug, info};
use rust_decimal::Decimal;
use serde_json::{json, Value};

use crate::api::{HttpTransport, Transport};
use crate::config::ClientConfig;
use crate::decode::{decode_list, format_date, Decode, Fields};
use crate::error::{Error, Result};
use crate::form::WALLET_TRANSFER_PID;
use crate::models::{
    find_balance, Account, Commission, History, Identity, MobileProvider, OnlineCommission, Payment, Profile,
    Rate, Statistics, Transaction,
};
use crate::params::indexed;
use crate::requests::{
    Cheque, ChequeFormat, HistoryQuery, IdentificationRequest, OnlineCommissionBody, Operation, SendRequest,
    Source,
};

pub const MOBILE_DETECT_URL: &str = "https://qiwi.com/mobile/detect.action";

/// A single wallet bound to a token.
pub struct Wallet<T: Transport = HttpTransport> {
    transport: T,
    config: ClientConfig,
    number: Option<String>,
}

impl Wallet<HttpTransport> {
    /// Build the HTTP transport from `config` and bind the wallet.
    pub fn connect(config: ClientConfig) -> Result<Self> {
        let transport = HttpTransport::new(&config)?;
        Self::with_transport(config, transport)
    }
}

impl<T: Transport> Wallet<T> {
    /// Bind a wallet to any transport. With `contract_info` enabled the wallet
    /// number is taken from the profile's contract id, overriding the configured one.
    pub fn with_transport(config: ClientConfig, transport: T) -> Result<Self> {
        let mut wallet = Self {
            number: config.wallet.clone(),
            config,
            transport,
        };
        if wallet.config.contract_info {
            if let Some(contract) = wallet.profile()?.contract_info {
                info!("wallet bound to contract {}", contract.contract_id);
                wallet.number = Some(contract.contract_id.to_string());
            }
        }
        Ok(wallet)
    }

    pub fn number(&self) -> Option<&str> {
        self.number.as_deref()
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    fn person(&self) -> Result<&str> {
        self.number
            .as_deref()
            .ok_or_else(|| Error::Config("wallet number is unknown: set it or enable contract_info".to_string()))
    }

    pub fn accounts(&self) -> Result<Vec<Account>> {
        let path = format!("funding-sources/v2/persons/{}/accounts", self.person()?);
        let json = self.transport.get_json(&path, &[])?;
        list_in(&json, "AccountsResponse", "accounts")
    }

    /// Balance of the first account in `currency` holding a non-zero amount.
    pub fn balance(&self, currency: u16) -> Result<Decimal> {
        find_balance(&self.accounts()?, currency)
    }

    pub fn cross_rates(&self) -> Result<Vec<Rate>> {
        let json = self.transport.get_json("sinap/crossRates", &[])?;
        list_in(&json, "CrossRatesResponse", "result")
    }

    pub fn profile(&self) -> Result<Profile> {
        let flag = |on: bool| (if on { "true" } else { "false" }).to_string();
        let query = [
            ("authInfoEnabled".to_string(), flag(self.config.auth_info)),
            ("contractInfoEnabled".to_string(), flag(self.config.contract_info)),
            ("userInfoEnabled".to_string(), flag(self.config.user_info)),
        ];
        let json = self.transport.get_json("person-profile/v1/profile/current", &query)?;
        Profile::decode(&json)
    }

    pub fn history(&self, query: &HistoryQuery) -> Result<History> {
        let params = query.to_params()?;
        let path = format!("payment-history/v2/persons/{}/payments", self.person()?);
        debug!("history page of {} rows", query.rows);
        History::decode(&self.transport.get_json(&path, &params)?)
    }

    pub fn transaction(&self, txn_id: u64, txn_type: &str) -> Result<Transaction> {
        let path = format!("payment-history/v2/transactions/{txn_id}");
        let query = [("type".to_string(), txn_type.to_string())];
        Transaction::decode(&self.transport.get_json(&path, &query)?)
    }

    /// Incoming and outgoing totals. The period defaults to the current month so far.
    pub fn stat(
        &self,
        start: Option<DateTime<FixedOffset>>,
        end: Option<DateTime<FixedOffset>>,
        operation: Option<Operation>,
        sources: &[Source],
    ) -> Result<Statistics> {
        let now = Utc::now();
        let start = start.unwrap_or_else(|| month_start(now));
        let end = end.unwrap_or_else(|| now.fixed_offset());

        let mut query = vec![
            ("startDate".to_string(), format_date(&start)),
            ("endDate".to_string(), format_date(&end)),
        ];
        if let Some(op) = operation {
            query.push(("operation".to_string(), op.as_str().to_string()));
        }
        query.extend(indexed("sources", sources.iter().map(Source::as_str)));

        let path = format!("payment-history/v2/persons/{}/payments/total", self.person()?);
        Statistics::decode(&self.transport.get_json(&path, &query)?)
    }

    /// Commission the service would charge for paying `amount` to `recipient`.
    pub fn commission(&self, provider_id: &str, recipient: &str, amount: Decimal) -> Result<OnlineCommission> {
        let path = format!("sinap/providers/{provider_id}/onlineCommission");
        let body = serde_json::to_value(OnlineCommissionBody::new(recipient, amount))?;
        OnlineCommission::decode(&self.transport.post_json(&path, &[], &body)?)
    }

    /// Submit a payment. The request id is the current Unix time in milliseconds.
    pub fn send(&self, request: &SendRequest) -> Result<Payment> {
        let id = Utc::now().timestamp_millis().to_string();
        let body = serde_json::to_value(request.body(id)?)?;
        let path = format!("sinap/api/v2/terms/{}/payments", request.provider_id);
        debug!("payment to provider {}", request.provider_id);
        Payment::decode(&self.transport.post_json(&path, &[], &body)?)
    }

    /// Transfer to another wallet by phone number.
    pub fn qiwi_transfer(&self, account: &str, amount: Decimal, comment: Option<&str>) -> Result<Payment> {
        let mut request = SendRequest::new(WALLET_TRANSFER_PID, account, amount);
        if let Some(comment) = comment {
            request = request.comment(comment);
        }
        self.send(&request)
    }

    /// Provider id serving `phone`.
    pub fn detect_mobile(&self, phone: &str) -> Result<String> {
        let form = [("phone".to_string(), phone.to_string())];
        let json = self.transport.post_form(MOBILE_DETECT_URL, &form)?;
        MobileProvider::decode(&json)?
            .provider_id()
            .map(str::to_string)
            .ok_or_else(|| Error::UnknownMobileProvider(phone.to_string()))
    }

    /// Top up a mobile phone. `phone` carries the country code (`7...`); the
    /// operator account is the number without it.
    pub fn mobile(&self, phone: &str, amount: Decimal) -> Result<Payment> {
        let provider_id = self.detect_mobile(phone)?;
        let account: String = phone.chars().skip(1).collect();
        self.send(&SendRequest::new(provider_id, account, amount))
    }

    /// Submit personal data for simplified identification.
    pub fn identification(&self, request: &IdentificationRequest) -> Result<Identity> {
        let path = format!("identification/v1/persons/{}/identification", self.person()?);
        let body = serde_json::to_value(request)?;
        let json = self.transport.post_json(&path, &[], &body)?;
        Identity::decode_with_base_inn(&json, request.inn.as_deref())
    }

    /// Open a new balance account. `alias` is one of [`Wallet::offered_accounts`].
    pub fn create_account(&self, alias: &str) -> Result<()> {
        let path = format!("funding-sources/v2/persons/{}/accounts", self.person()?);
        self.transport.post_json(&path, &[], &json!({ "alias": alias }))?;
        info!("account {alias} created");
        Ok(())
    }

    pub fn offered_accounts(&self) -> Result<Vec<Account>> {
        let path = format!("funding-sources/v2/persons/{}/accounts/offer", self.person()?);
        decode_list(&self.transport.get_json(&path, &[])?)
    }

    /// Mail the receipt when `email` is given, download it otherwise.
    pub fn cheque(&self, txn_id: u64, txn_type: &str, format: ChequeFormat, email: Option<&str>) -> Result<Cheque> {
        let kind = ("type".to_string(), txn_type.to_string());
        match email {
            Some(email) => {
                let path = format!("payment-history/v1/transactions/{txn_id}/cheque/send");
                self.transport.post_json(&path, &[kind], &json!({ "email": email }))?;
                Ok(Cheque::Sent)
            }
            None => {
                let path = format!("payment-history/v1/transactions/{txn_id}/cheque/file");
                let query = [kind, ("format".to_string(), format.as_str().to_string())];
                Ok(Cheque::File(self.transport.get_bytes(&path, &query)?))
            }
        }
    }

    /// Provider's published commission ranges.
    pub fn standard_commission(&self, provider_id: &str) -> Result<Commission> {
        let path = format!("sinap/providers/{provider_id}/form");
        Commission::decode(&self.transport.get_json(&path, &[])?)
    }
}

fn list_in<D: Decode>(json: &Value, entity: &'static str, key: &'static str) -> Result<Vec<D>> {
    let map = json.as_object().ok_or(Error::NotAnObject { entity })?;
    Fields::new(entity, map).list(key)
}

/// First day of `now`'s month at 00:00:01 UTC.
fn month_start(now: DateTime<Utc>) -> DateTime<FixedOffset> {
    NaiveDate::from_ymd_opt(now.year(), now.month(), 1)
        .and_then(|day| day.and_hms_opt(0, 0, 1))
        .map(|start| start.and_utc().fixed_offset())
        .unwrap_or_else(|| now.fixed_offset())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn month_start_is_first_second_of_month() {
        let now = Utc.with_ymd_and_hms(2024, 2, 29, 18, 30, 0).single().expect("now");
        assert_eq!(format_date(&month_start(now)), "2024-02-01T00:00:01+00:00");
    }
}
