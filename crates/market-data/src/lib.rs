//! Market data collaborators: CoinGecko price quotes and the CryptoPanic
//! news digest, rendered as WhatsApp-formatted text.

mod coingecko;
mod cryptopanic;
mod error;
mod format;
mod types;

pub use coingecko::{render_quote, resolve_alias, CoinGeckoClient, DEFAULT_COINGECKO_URL};
pub use cryptopanic::{
    render_digest, without_duplicates, CryptoPanicClient, DEFAULT_CRYPTOPANIC_URL,
    MAX_ITEMS_PER_SECTION, SOURCE_LINK,
};
pub use error::MarketDataError;
pub use format::{format_change, format_number_br, format_number_us};
pub use types::*;
