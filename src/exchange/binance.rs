// =================================================================
// exchange/binance.rs - Binance USDT-M Futures REST client
// =================================================================

use async_trait::async_trait;
use hmac::{Hmac, Mac};
use log::debug;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use sha2::Sha256;
use std::time::Duration;

use super::{
    error::ExchangeError,
    traits::FuturesExchange,
    types::{AccountInfo, ApiErrorBody, ExchangeInfo, LeverageAck, OrderAck, OrderTicket, TickerPrice},
};
use crate::config::Credentials;

type HmacSha256 = Hmac<Sha256>;

// Constants
pub const TESTNET_BASE_URL: &str = "https://testnet.binancefuture.com";
pub const MAINNET_BASE_URL: &str = "https://fapi.binance.com";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const API_KEY_HEADER: &str = "X-MBX-APIKEY";

/// Binance futures client
pub struct BinanceFuturesClient {
    http: Client,
    base_url: String,
    credentials: Credentials,
    recv_window_ms: u64,
}

impl BinanceFuturesClient {
    pub fn new(
        base_url: impl Into<String>,
        credentials: Credentials,
        recv_window_ms: u64,
    ) -> Result<Self, ExchangeError> {
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            credentials,
            recv_window_ms,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// HMAC-SHA256 of the query string, hex encoded
    pub fn sign(&self, query: &str) -> Result<String, ExchangeError> {
        sign_query(&self.credentials.api_secret, query)
    }

    /// Appends recvWindow, timestamp and signature to `params`.
    fn signed_query(&self, params: &[(&str, String)]) -> Result<String, ExchangeError> {
        let timestamp = chrono::Utc::now().timestamp_millis();
        let mut query = encode_params(params);
        if !query.is_empty() {
            query.push('&');
        }
        query.push_str(&format!(
            "recvWindow={}&timestamp={}",
            self.recv_window_ms, timestamp
        ));

        let signature = self.sign(&query)?;
        Ok(format!("{}&signature={}", query, signature))
    }

    fn url(&self, path: &str, query: &str) -> String {
        if query.is_empty() {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}{}?{}", self.base_url, path, query)
        }
    }

    async fn public_get<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, ExchangeError> {
        let url = self.url(path, &encode_params(params));
        send_json(self.http.get(url)).await
    }

    async fn signed_get<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, ExchangeError> {
        let url = self.url(path, &self.signed_query(params)?);
        send_json(
            self.http
                .get(url)
                .header(API_KEY_HEADER, &self.credentials.api_key),
        )
        .await
    }

    async fn signed_post<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, ExchangeError> {
        let url = self.url(path, &self.signed_query(params)?);
        send_json(
            self.http
                .post(url)
                .header(API_KEY_HEADER, &self.credentials.api_key),
        )
        .await
    }
}

#[async_trait]
impl FuturesExchange for BinanceFuturesClient {
    async fn exchange_info(&self) -> Result<ExchangeInfo, ExchangeError> {
        self.public_get("/fapi/v1/exchangeInfo", &[]).await
    }

    async fn account(&self) -> Result<AccountInfo, ExchangeError> {
        self.signed_get("/fapi/v2/account", &[]).await
    }

    async fn change_leverage(&self, symbol: &str, leverage: u32) -> Result<LeverageAck, ExchangeError> {
        self.signed_post(
            "/fapi/v1/leverage",
            &[("symbol", symbol.to_string()), ("leverage", leverage.to_string())],
        )
        .await
    }

    async fn ticker_price(&self, symbol: &str) -> Result<TickerPrice, ExchangeError> {
        self.public_get("/fapi/v1/ticker/price", &[("symbol", symbol.to_string())])
            .await
    }

    async fn create_order(&self, ticket: &OrderTicket) -> Result<OrderAck, ExchangeError> {
        self.signed_post("/fapi/v1/order", &ticket.to_params()).await
    }
}

pub fn sign_query(secret: &str, query: &str) -> Result<String, ExchangeError> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| ExchangeError::Signing(e.to_string()))?;
    mac.update(query.as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Symbols, sides and decimals never need percent-encoding.
fn encode_params(params: &[(&str, String)]) -> String {
    params
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&")
}

async fn send_json<T: DeserializeOwned>(builder: RequestBuilder) -> Result<T, ExchangeError> {
    let resp = builder.send().await?;
    let status = resp.status();
    let body = resp.text().await?;
    debug!("binance response {}: {}", status, body);

    if status.is_success() {
        return Ok(serde_json::from_str(&body)?);
    }

    match serde_json::from_str::<ApiErrorBody>(&body) {
        Ok(err) => Err(ExchangeError::Api {
            status: status.as_u16(),
            code: err.code,
            msg: err.msg,
        }),
        Err(_) => Err(ExchangeError::UnexpectedResponse {
            status: status.as_u16(),
            body,
        }),
    }
}
