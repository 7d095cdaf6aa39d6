//! NFT market command-line client.

use nft_market_client::{
    available_action, buy_nft, fetch_detail, fetch_sol_usd_price, find_listing_by_mint, list_nft,
    quote, sol_to_lamports, withdraw_nft, Config, Error, FilterCriteria, Listing, MarketContext,
    MarketView, PaymentToken,
};
use serde_json::json;
use solana_sdk::pubkey::Pubkey;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const USAGE: &str = "usage: nft-market <market [--min SOL] [--max SOL] [--name TEXT] \
[--collection TEXT] [--description TEXT] [--designer TEXT] [--website TEXT] [--year TEXT] | \
show <mint> | sell <mint> <price_sol> | buy <mint> <USDC|USDT|WSOL> | withdraw <mint> | \
price | balance>";

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if let Err(e) = run(&args).await {
        error!(error = %e, "Command failed");
        eprintln!("{e}");
        std::process::exit(1);
    }
}

async fn run(args: &[String]) -> Result<(), Error> {
    let config = Config::load()?;
    info!(rpc = %config.rpc_url, commitment = %config.commitment, "Configuration loaded");
    let ctx = Arc::new(MarketContext::from_config(&config)?);

    let arg = |i: usize| {
        args.get(i)
            .map(String::as_str)
            .ok_or_else(|| Error::Config(USAGE.into()))
    };

    let output = match arg(0)? {
        "market" => {
            let mut view = MarketView::new();
            *view.filter_mut() = parse_filter(&args[1..])?;
            view.refresh(&ctx).await?;
            if !view.filter().is_empty() {
                view.apply_filter();
            }
            json!(view.assets())
        }
        "show" => {
            let listing = listing_for(&ctx, arg(1)?).await?;
            let detail = fetch_detail(&ctx, &listing).await;
            let sol_usd = fetch_sol_usd_price(&ctx).await;
            let quotes: Vec<_> = PaymentToken::ALL
                .into_iter()
                .map(|t| quote(detail.price, t, sol_usd))
                .collect();
            json!({
                "detail": detail,
                "action": available_action(&detail, ctx.wallet.pubkey()),
                "quotes": quotes,
            })
        }
        "sell" => {
            let mint = parse_pubkey(arg(1)?)?;
            let lamports = parse_sol(arg(2)?).and_then(sol_to_lamports)?;
            json!(list_nft(&ctx, &mint, lamports).await?)
        }
        "buy" => {
            let listing = listing_for(&ctx, arg(1)?).await?;
            let token = PaymentToken::from_str(arg(2)?)?;
            let signature = buy_nft(&ctx, &listing, token).await?;
            json!({ "signature": signature.to_string() })
        }
        "withdraw" => {
            let listing = listing_for(&ctx, arg(1)?).await?;
            let signature = withdraw_nft(&ctx, &listing).await?;
            json!({ "signature": signature.to_string() })
        }
        "price" => json!({ "solana": { "usd": fetch_sol_usd_price(&ctx).await } }),
        "balance" => json!({ "lamports": ctx.wallet_balance().await? }),
        _ => return Err(Error::Config(USAGE.into())),
    };

    println!(
        "{}",
        serde_json::to_string_pretty(&output).map_err(|e| Error::Decode(e.to_string()))?
    );
    Ok(())
}

fn parse_sol(s: &str) -> Result<f64, Error> {
    s.parse()
        .map_err(|e| Error::InvalidPrice(format!("{s}: {e}")))
}

/// `--flag value` pairs for the `market` command.
fn parse_filter(args: &[String]) -> Result<FilterCriteria, Error> {
    let mut filter = FilterCriteria::default();
    let mut rest = args.iter();
    while let Some(flag) = rest.next() {
        let value = rest
            .next()
            .ok_or_else(|| Error::Config(format!("{flag} needs a value")))?
            .clone();
        match flag.as_str() {
            "--min" => {
                if !filter.set_min_price(parse_sol(&value)?) {
                    return Err(Error::InvalidPrice(format!("--min {value}")));
                }
            }
            "--max" => {
                if !filter.set_max_price(parse_sol(&value)?) {
                    return Err(Error::InvalidPrice(format!("--max {value}")));
                }
            }
            "--name" => filter.name = Some(value),
            "--collection" => filter.collection = Some(value),
            "--description" => filter.description = Some(value),
            "--designer" => filter.designer = Some(value),
            "--website" => filter.website = Some(value),
            "--year" => filter.year = Some(value),
            _ => return Err(Error::Config(format!("unknown flag {flag}\n{USAGE}"))),
        }
    }
    Ok(filter)
}

fn parse_pubkey(s: &str) -> Result<Pubkey, Error> {
    Pubkey::from_str(s).map_err(|e| Error::Config(format!("invalid address {s}: {e}")))
}

async fn listing_for(ctx: &MarketContext, mint: &str) -> Result<Listing, Error> {
    let mint = parse_pubkey(mint)?;
    find_listing_by_mint(ctx, &mint)
        .await?
        .ok_or_else(|| Error::ListingNotFound(mint.to_string()))
}
