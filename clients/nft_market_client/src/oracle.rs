//! SOL/USD price oracle.

use serde_json::Value;
use tracing::{debug, error};

use crate::context::MarketContext;
use crate::fetch::JsonFetcher;
use crate::rpc::MarketRpc;
use crate::Error;

fn parse_sol_usd(doc: &Value) -> Result<f64, Error> {
    doc.get("solana")
        .and_then(|s| s.get("usd"))
        .and_then(Value::as_f64)
        .ok_or_else(|| Error::Decode(format!("unexpected price response: {doc}")))
}

/// Current SOL price in USD, or `0.0` when the oracle cannot be reached.
pub async fn fetch_sol_usd_price<R: MarketRpc, F: JsonFetcher>(ctx: &MarketContext<R, F>) -> f64 {
    let result = match ctx.http.get_json(&ctx.price_oracle_url).await {
        Ok(doc) => parse_sol_usd(&doc),
        Err(e) => Err(e),
    };
    match result {
        Ok(price) => {
            debug!(price, "SOL/USD price fetched");
            price
        }
        Err(e) => {
            error!(error = %e, "Price oracle unavailable");
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Wallet;
    use crate::test_utils::{test_context, MockFetcher, MockRpc};
    use serde_json::json;

    #[tokio::test]
    async fn test_reads_usd_price() {
        let url = crate::Config::default().price_oracle_url;
        let http = MockFetcher::default().with_document(&url, json!({"solana": {"usd": 142.37}}));
        let ctx = test_context(MockRpc::default(), http, Wallet::disconnected());
        assert_eq!(fetch_sol_usd_price(&ctx).await, 142.37);
    }

    #[tokio::test]
    async fn test_malformed_or_missing_price_is_zero() {
        let url = crate::Config::default().price_oracle_url;
        let http = MockFetcher::default().with_document(&url, json!({"solana": {}}));
        let ctx = test_context(MockRpc::default(), http, Wallet::disconnected());
        assert_eq!(fetch_sol_usd_price(&ctx).await, 0.0);

        let ctx = test_context(MockRpc::default(), MockFetcher::default(), Wallet::disconnected());
        assert_eq!(fetch_sol_usd_price(&ctx).await, 0.0);
    }
}
