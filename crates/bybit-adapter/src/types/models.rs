/*
[INPUT]:  API schema definitions and serde requirements
[OUTPUT]: Typed Rust structs for market and account data
[POS]:    Data layer - type definitions for API communication
[UPDATE]: When API schema changes or new types added
*/

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::Side;

/// One price level of the L2 order book
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct OrderBookLevel {
    pub symbol: String,
    pub price: Decimal,
    pub size: Decimal,
    pub side: Side,
}

/// 24h ticker snapshot
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Ticker {
    pub symbol: String,
    pub bid_price: Decimal,
    pub ask_price: Decimal,
    pub last_price: Decimal,
    #[serde(default)]
    pub prev_price_24h: Option<Decimal>,
    #[serde(default)]
    pub volume_24h: Option<Decimal>,
}

/// Historical kline/candle
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Kline {
    pub symbol: String,
    pub interval: String,
    pub open_time: i64,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    pub volume: Decimal,
}

/// Open position
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Position {
    pub symbol: String,
    pub side: Side,
    pub size: Decimal,
    pub entry_price: Decimal,
    pub leverage: Decimal,
    #[serde(default)]
    pub liq_price: Option<Decimal>,
    #[serde(default)]
    pub unrealised_pnl: Option<Decimal>,
}

/// Per-coin wallet balance
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct WalletBalance {
    pub equity: Decimal,
    pub available_balance: Decimal,
    pub wallet_balance: Decimal,
    #[serde(default)]
    pub unrealised_pnl: Option<Decimal>,
}
