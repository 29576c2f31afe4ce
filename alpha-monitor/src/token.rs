//! Token records as delivered by the Alpha token list, and their normalised form.

use crate::de::{self, de_bool_lenient, de_i64_lenient, de_tag_lenient, de_text};
use chrono::{DateTime, Utc};
use derive_more::{Display, From};
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

/// Unique identifier of a token in the Alpha pool (the API `tokenId`).
#[derive(
    Debug, Clone, Default, Eq, PartialEq, Ord, PartialOrd, Hash, Deserialize, Serialize, Display, From,
)]
#[serde(transparent)]
pub struct TokenId(pub SmolStr);

impl TokenId {
    pub fn new(id: impl AsRef<str>) -> Self {
        Self(SmolStr::new(id))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<&str> for TokenId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Response envelope of the token list endpoint.
///
/// ```json
/// { "code": "000000", "message": null, "data": [ ... ] }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ApiEnvelope {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<Vec<RawTokenRecord>>,
}

/// ### Raw Payload Example
/// ```json
/// {
///     "tokenId": "A1B2C3",
///     "chainId": "56",
///     "chainIconUrl": "https://bin.bnbstatic.com/chain/bsc.png",
///     "chainName": "BSC",
///     "contractAddress": "0x1234567890abcdef1234567890abcdef12345678",
///     "name": "BTCWrap",
///     "symbol": "BTCW",
///     "iconUrl": "https://bin.bnbstatic.com/token/btcw.png",
///     "price": "0.0123",
///     "percentChange24h": "-4.12",
///     "volume24h": "1523456.12",
///     "marketCap": "12345678.9",
///     "fdv": "23456789.1",
///     "liquidity": "456789.33",
///     "totalSupply": "1000000000",
///     "circulatingSupply": "500000000",
///     "holders": "15234",
///     "decimals": 18,
///     "listingTime": 1732000000000,
///     "priceHigh24h": "0.0131",
///     "priceLow24h": "0.0119",
///     "count24h": "8812",
///     "listingCex": false,
///     "hotTag": 1
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawTokenRecord {
    #[serde(deserialize_with = "de_token_id")]
    pub token_id: TokenId,
    #[serde(deserialize_with = "de_text")]
    pub chain_id: String,
    #[serde(deserialize_with = "de_text")]
    pub chain_icon_url: String,
    #[serde(deserialize_with = "de_text")]
    pub chain_name: String,
    #[serde(deserialize_with = "de_text")]
    pub contract_address: String,
    #[serde(deserialize_with = "de_text")]
    pub name: String,
    #[serde(deserialize_with = "de_text")]
    pub symbol: String,
    #[serde(deserialize_with = "de_text")]
    pub icon_url: String,
    #[serde(deserialize_with = "de_text")]
    pub price: String,
    #[serde(rename = "percentChange24h", deserialize_with = "de_text")]
    pub percent_change_24h: String,
    #[serde(rename = "volume24h", deserialize_with = "de_text")]
    pub volume_24h: String,
    #[serde(deserialize_with = "de_text")]
    pub market_cap: String,
    #[serde(deserialize_with = "de_text")]
    pub fdv: String,
    #[serde(deserialize_with = "de_text")]
    pub liquidity: String,
    #[serde(deserialize_with = "de_text")]
    pub total_supply: String,
    #[serde(deserialize_with = "de_text")]
    pub circulating_supply: String,
    #[serde(deserialize_with = "de_text")]
    pub holders: String,
    #[serde(deserialize_with = "de_i64_lenient")]
    pub decimals: i64,
    /// Epoch milliseconds.
    #[serde(deserialize_with = "de_i64_lenient")]
    pub listing_time: i64,
    #[serde(rename = "priceHigh24h", deserialize_with = "de_text")]
    pub price_high_24h: String,
    #[serde(rename = "priceLow24h", deserialize_with = "de_text")]
    pub price_low_24h: String,
    /// Number of trades over the last 24h.
    #[serde(rename = "count24h", deserialize_with = "de_text")]
    pub count_24h: String,
    /// `true` once the token graduated to a centralised exchange listing and left the pool.
    #[serde(deserialize_with = "de_bool_lenient")]
    pub listing_cex: bool,
    #[serde(deserialize_with = "de_tag_lenient")]
    pub hot_tag: Option<i64>,
}

fn de_token_id<'de, D>(deserializer: D) -> Result<TokenId, D::Error>
where
    D: serde::Deserializer<'de>,
{
    de_text(deserializer).map(TokenId::new)
}

impl RawTokenRecord {
    pub fn is_cex_listed(&self) -> bool {
        self.listing_cex
    }
}

/// A [`RawTokenRecord`] with numeric projections of its text fields.
///
/// The projections are derived once per poll by [`EnrichedToken::from`] and are never patched in
/// place; a fresh poll produces fresh tokens.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct EnrichedToken {
    #[serde(flatten)]
    pub raw: RawTokenRecord,
    #[serde(rename = "priceNum")]
    pub price: f64,
    #[serde(rename = "holdersNum")]
    pub holders: u64,
    #[serde(rename = "marketCapNum")]
    pub market_cap: f64,
    #[serde(rename = "volume24hNum")]
    pub volume_24h: f64,
    #[serde(rename = "change24hNum")]
    pub change_24h: f64,
}

impl From<RawTokenRecord> for EnrichedToken {
    fn from(raw: RawTokenRecord) -> Self {
        Self {
            price: de::f64_or_zero(&raw.price),
            holders: de::u64_or_zero(&raw.holders),
            market_cap: de::f64_or_zero(&raw.market_cap),
            volume_24h: de::f64_or_zero(&raw.volume_24h),
            change_24h: de::f64_or_zero(&raw.percent_change_24h),
            raw,
        }
    }
}

impl EnrichedToken {
    pub fn id(&self) -> &TokenId {
        &self.raw.token_id
    }

    pub fn name(&self) -> &str {
        &self.raw.name
    }

    pub fn symbol(&self) -> &str {
        &self.raw.symbol
    }

    pub fn is_hot(&self) -> bool {
        self.raw.hot_tag.is_some_and(|tag| tag != 0)
    }

    pub fn listing_time(&self) -> i64 {
        self.raw.listing_time
    }

    pub fn listed_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.raw.listing_time)
    }

    pub fn liquidity(&self) -> f64 {
        de::f64_or_zero(&self.raw.liquidity)
    }

    pub fn fdv(&self) -> f64 {
        de::f64_or_zero(&self.raw.fdv)
    }

    pub fn price_high_24h(&self) -> f64 {
        de::f64_or_zero(&self.raw.price_high_24h)
    }

    pub fn price_low_24h(&self) -> f64 {
        de::f64_or_zero(&self.raw.price_low_24h)
    }

    pub fn trades_24h(&self) -> u64 {
        de::u64_or_zero(&self.raw.count_24h)
    }

    pub fn total_supply(&self) -> f64 {
        de::f64_or_zero(&self.raw.total_supply)
    }

    pub fn circulating_supply(&self) -> f64 {
        de::f64_or_zero(&self.raw.circulating_supply)
    }

    /// Case-insensitive substring match against name or symbol. An empty needle matches all.
    pub fn matches(&self, needle_lower: &str) -> bool {
        needle_lower.is_empty()
            || self.raw.name.to_lowercase().contains(needle_lower)
            || self.raw.symbol.to_lowercase().contains(needle_lower)
    }
}

/// Normalise one raw record. Total: malformed numeric text yields zero for that field.
pub fn normalize(raw: RawTokenRecord) -> EnrichedToken {
    EnrichedToken::from(raw)
}
