use std::time::Duration;

use super::types::{EndpointDescriptor, ExchangeProfile};

/// Endpoint measured when only a quick check is wanted.
pub const DEFAULT_ENDPOINT: &str = "market_data";

const OKX_MARKET_DATA: &str = "https://www.okx.com/api/v5/market/ticker?instId=BTC-USDT";
const OKX_BOOK: &str = "https://www.okx.com/api/v5/market/books?instId=BTC-USDT&sz=10";
const OKX_TRADES: &str = "https://www.okx.com/api/v5/market/trades?instId=BTC-USDT";

const BITGET_MARKET_DATA: &str = "https://api.bitget.com/api/spot/v1/market/ticker?symbol=BTCUSDT";
const BITGET_BOOK: &str =
    "https://api.bitget.com/api/spot/v1/market/depth?symbol=BTCUSDT&limit=10";
const BITGET_TRADES: &str = "https://api.bitget.com/api/spot/v1/market/fills?symbol=BTCUSDT";

/// Built-in OKX and Bitget spot market-data endpoints.
#[must_use]
pub fn builtin_exchanges(timeout: Duration) -> Vec<ExchangeProfile> {
    let okx = ExchangeProfile::new("okx", "OKX", "OKX Cryptocurrency Exchange")
        .with_endpoint(EndpointDescriptor::get(
            "okx",
            DEFAULT_ENDPOINT,
            OKX_MARKET_DATA,
            timeout,
        ))
        .with_endpoint(EndpointDescriptor::get("okx", "book", OKX_BOOK, timeout))
        .with_endpoint(EndpointDescriptor::get("okx", "trades", OKX_TRADES, timeout));

    let bitget = ExchangeProfile::new("bitget", "Bitget", "Bitget Cryptocurrency Exchange")
        .with_endpoint(EndpointDescriptor::get(
            "bitget",
            DEFAULT_ENDPOINT,
            BITGET_MARKET_DATA,
            timeout,
        ))
        .with_endpoint(EndpointDescriptor::get("bitget", "book", BITGET_BOOK, timeout))
        .with_endpoint(EndpointDescriptor::get(
            "bitget",
            "trades",
            BITGET_TRADES,
            timeout,
        ));

    vec![okx, bitget]
}
