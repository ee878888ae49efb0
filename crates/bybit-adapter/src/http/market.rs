/*
[INPUT]:  Symbol identifiers and query parameters
[OUTPUT]: Market data (server time, depth, tickers, klines)
[POS]:    HTTP layer - public market data endpoints (no auth required)
[UPDATE]: When adding new public endpoints or changing response format
*/

use chrono::Utc;
use reqwest::Method;

use crate::http::{BybitClient, BybitError, Result};
use crate::types::{Kline, OrderBookLevel, ServerTime, Ticker};

impl BybitClient {
    /// Query the server clock
    ///
    /// GET /v2/public/time (the payload of interest is the envelope's
    /// `time_now` field; `result` is an empty object)
    pub async fn server_time(&self) -> Result<ServerTime> {
        let builder = self.request(Method::GET, "/v2/public/time")?;
        let envelope = self.send_envelope::<serde_json::Value>(builder).await?;
        let time_now = envelope
            .time_now
            .ok_or_else(|| BybitError::InvalidResponse("missing time_now field".to_string()))?;
        Ok(ServerTime { time_now })
    }

    /// Difference between the server clock and the local clock, in ms.
    /// Used to correct auth expiry timestamps for local clock drift.
    pub async fn time_offset_ms(&self) -> Result<i64> {
        let server_ms = self.server_time().await?.epoch_ms()?;
        Ok(server_ms - Utc::now().timestamp_millis())
    }

    /// Query L2 order book depth
    ///
    /// GET /v2/public/orderBook/L2?symbol={symbol}
    pub async fn order_book(&self, symbol: &str) -> Result<Vec<OrderBookLevel>> {
        let builder = self
            .request(Method::GET, "/v2/public/orderBook/L2")?
            .query(&[("symbol", symbol)]);
        self.send_json(builder).await
    }

    /// Query ticker snapshots, all symbols when `symbol` is None
    ///
    /// GET /v2/public/tickers
    pub async fn tickers(&self, symbol: Option<&str>) -> Result<Vec<Ticker>> {
        let mut builder = self.request(Method::GET, "/v2/public/tickers")?;
        if let Some(symbol) = symbol {
            builder = builder.query(&[("symbol", symbol)]);
        }
        self.send_json(builder).await
    }

    /// Query kline history
    ///
    /// GET /v2/public/kline/list?symbol={symbol}&interval={interval}&from={from}
    pub async fn kline(
        &self,
        symbol: &str,
        interval: &str,
        from: i64,
        limit: Option<u32>,
    ) -> Result<Vec<Kline>> {
        let from = from.to_string();
        let mut builder = self.request(Method::GET, "/v2/public/kline/list")?.query(&[
            ("symbol", symbol),
            ("interval", interval),
            ("from", from.as_str()),
        ]);
        if let Some(limit) = limit {
            builder = builder.query(&[("limit", limit.to_string())]);
        }
        self.send_json(builder).await
    }
}
