//! CoinGecko and CryptoPanic response types.

use serde::Deserialize;
use std::collections::HashMap;

/// `/coins/{id}` response, reduced to what the quote needs.
#[derive(Debug, Clone, Deserialize)]
pub struct CoinDetail {
    pub id: String,
    pub name: String,
    pub symbol: String,
    pub market_data: MarketData,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MarketData {
    #[serde(default)]
    pub current_price: HashMap<String, f64>,
    /// Official all-time high per currency.
    #[serde(default)]
    pub ath: HashMap<String, f64>,
    #[serde(default)]
    pub market_cap: HashMap<String, f64>,
    #[serde(default)]
    pub total_volume: HashMap<String, f64>,
    #[serde(default)]
    pub market_cap_rank: Option<u32>,
    #[serde(default)]
    pub price_change_percentage_1h_in_currency: HashMap<String, f64>,
    #[serde(default)]
    pub price_change_percentage_24h: Option<f64>,
    #[serde(default)]
    pub price_change_percentage_7d: Option<f64>,
    #[serde(default)]
    pub price_change_percentage_30d: Option<f64>,
    #[serde(default)]
    pub price_change_percentage_1y: Option<f64>,
}

impl MarketData {
    pub fn price(&self, currency: &str) -> f64 {
        self.current_price.get(currency).copied().unwrap_or_default()
    }

    pub fn ath(&self, currency: &str) -> f64 {
        self.ath.get(currency).copied().unwrap_or_default()
    }
}

/// Current USD price of a coin next to its official all-time high.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceSnapshot {
    pub current_usd: f64,
    pub ath_usd: f64,
}

/// A CryptoPanic post.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Post {
    pub title: String,
    #[serde(default)]
    pub slug: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PostsResponse {
    #[serde(default)]
    pub results: Vec<Post>,
}
