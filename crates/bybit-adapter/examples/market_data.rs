/*
[INPUT]:  Public REST endpoints on testnet
[OUTPUT]: Server time, order book and ticker snapshots on stdout
[POS]:    Examples - public market data
[UPDATE]: When public endpoints change
*/

use bybit_adapter::BybitClient;

/// Example: public market data over REST (no credentials needed)
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let client = BybitClient::new(false)?;

    let time = client.server_time().await?;
    println!("server time: {}", time.time_now);

    let book = client.order_book("BTCUSD").await?;
    println!("order book: {} levels", book.len());
    for level in book.iter().take(5) {
        println!("  {} {} x {}", level.side.as_str(), level.price, level.size);
    }

    let tickers = client.tickers(Some("BTCUSD")).await?;
    for ticker in tickers {
        println!(
            "{}: last {} bid {} ask {}",
            ticker.symbol, ticker.last_price, ticker.bid_price, ticker.ask_price
        );
    }

    Ok(())
}
