/*
[INPUT]:  Order and account queries with signed parameters
[OUTPUT]: Order confirmations, positions and balances
[POS]:    HTTP layer - private endpoints (require credentials + signature)
[UPDATE]: When adding new private endpoints or changing order flow
*/

use std::collections::BTreeMap;
use std::collections::HashMap;

use crate::http::{BybitClient, Result};
use crate::types::{
    CancelOrderRequest, Order, OrderList, PlaceOrderRequest, Position, WalletBalance,
};

impl BybitClient {
    /// Create a new order
    ///
    /// POST /v2/private/order/create
    pub async fn place_order(&self, req: PlaceOrderRequest) -> Result<Order> {
        self.post_signed("/v2/private/order/create", req.into_params())
            .await
    }

    /// Cancel an active order
    ///
    /// POST /v2/private/order/cancel
    pub async fn cancel_order(&self, req: CancelOrderRequest) -> Result<Order> {
        self.post_signed("/v2/private/order/cancel", req.into_params())
            .await
    }

    /// List active orders for a symbol
    ///
    /// GET /v2/private/order/list?symbol={symbol}
    pub async fn active_orders(&self, symbol: &str) -> Result<OrderList> {
        let mut params = BTreeMap::new();
        params.insert("symbol".to_string(), symbol.to_string());
        self.get_signed("/v2/private/order/list", params).await
    }

    /// List open positions for a symbol
    ///
    /// GET /v2/private/position/list?symbol={symbol}
    pub async fn positions(&self, symbol: &str) -> Result<Vec<Position>> {
        let mut params = BTreeMap::new();
        params.insert("symbol".to_string(), symbol.to_string());
        self.get_signed("/v2/private/position/list", params).await
    }

    /// Query wallet balances, keyed by coin
    ///
    /// GET /v2/private/wallet/balance?coin={coin}
    pub async fn wallet_balance(&self, coin: &str) -> Result<HashMap<String, WalletBalance>> {
        let mut params = BTreeMap::new();
        params.insert("coin".to_string(), coin.to_string());
        self.get_signed("/v2/private/wallet/balance", params).await
    }
}
