//! CoinGecko price quotes.

use crate::error::MarketDataError;
use crate::format::{format_change, format_number_br, format_number_us};
use crate::types::{CoinDetail, PriceSnapshot};
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::{debug, instrument, warn};
use urlencoding::encode;

pub const DEFAULT_COINGECKO_URL: &str = "https://api.coingecko.com/api/v3";

/// Ticker aliases that do not match their CoinGecko id.
const ALIASES: &[(&str, &str)] = &[
    ("btc", "bitcoin"),
    ("eth", "ethereum"),
    ("usdt", "tether"),
    ("usdc", "usd-coin"),
    ("xrp", "ripple"),
    ("sol", "solana"),
    ("bnb", "binancecoin"),
    ("ada", "cardano"),
    ("doge", "dogecoin"),
    ("dot", "polkadot"),
    ("ltc", "litecoin"),
    ("trx", "tron"),
    ("avax", "avalanche-2"),
    ("link", "chainlink"),
    ("matic", "matic-network"),
    ("shib", "shiba-inu"),
    ("ton", "the-open-network"),
];

/// Map a user-typed symbol to a CoinGecko coin id.
pub fn resolve_alias(symbol: &str) -> String {
    let symbol = symbol.trim().to_lowercase();
    ALIASES
        .iter()
        .find(|(alias, _)| *alias == symbol)
        .map(|(_, id)| id.to_string())
        .unwrap_or(symbol)
}

#[derive(Clone)]
pub struct CoinGeckoClient {
    client: Client,
    base_url: String,
}

impl CoinGeckoClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, MarketDataError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Fetch market data for a coin id.
    #[instrument(skip(self))]
    pub async fn coin(&self, id: &str) -> Result<CoinDetail, MarketDataError> {
        let response = self
            .client
            .get(format!("{}/coins/{}", self.base_url, encode(id)))
            .query(&[
                ("localization", "false"),
                ("tickers", "false"),
                ("market_data", "true"),
                ("community_data", "false"),
                ("developer_data", "false"),
                ("sparkline", "false"),
            ])
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(MarketDataError::UnknownCoin(id.to_string()));
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            warn!("CoinGecko returned {}", status);
            return Err(MarketDataError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Formatted price quote for a symbol such as `btc`.
    pub async fn quote(&self, symbol: &str) -> Result<String, MarketDataError> {
        let id = resolve_alias(symbol);
        if id.is_empty() {
            return Err(MarketDataError::UnknownCoin(symbol.to_string()));
        }

        debug!("Resolved {} to {}", symbol, id);
        let coin = self.coin(&id).await?;
        Ok(render_quote(&coin))
    }

    /// USD price and official ATH for a symbol such as `btc`.
    pub async fn usd_snapshot(&self, symbol: &str) -> Result<PriceSnapshot, MarketDataError> {
        let id = resolve_alias(symbol);
        if id.is_empty() {
            return Err(MarketDataError::UnknownCoin(symbol.to_string()));
        }

        let coin = self.coin(&id).await?;
        Ok(PriceSnapshot {
            current_usd: coin.market_data.price("usd"),
            ath_usd: coin.market_data.ath("usd"),
        })
    }
}

/// Render a coin's market data as a chat message.
pub fn render_quote(coin: &CoinDetail) -> String {
    let md = &coin.market_data;
    let rank = md
        .market_cap_rank
        .map(|r| format!("#{}", r))
        .unwrap_or_else(|| "-".into());
    let change = |v: Option<f64>| format_change(v.unwrap_or_default());
    let brl = |map: &std::collections::HashMap<String, f64>| {
        format_number_br(map.get("brl").copied().unwrap_or_default())
    };

    format!(
        "🪙 *{} ({})*  |  🏅 Rank: {}\n\n\
         💵 *Preço Atual*\n🇧🇷 R$ {}\n🇺🇸 $ {}\n\n\
         📊 *Variação*\n1h: {}\n24h: {}\n7d: {}\n30d: {}\n1y: {}\n\n\
         💰 *Market Cap:* R$ {}\n📈 *Volume 24h:* R$ {}",
        coin.name,
        coin.symbol.to_uppercase(),
        rank,
        format_number_br(md.price("brl")),
        format_number_us(md.price("usd")),
        change(md.price_change_percentage_1h_in_currency.get("brl").copied()),
        change(md.price_change_percentage_24h),
        change(md.price_change_percentage_7d),
        change(md.price_change_percentage_30d),
        change(md.price_change_percentage_1y),
        brl(&md.market_cap),
        brl(&md.total_volume),
    )
}
