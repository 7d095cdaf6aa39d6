//! Supported payment tokens and price conversion.

use anchor_lang::prelude::pubkey;
use serde::Serialize;
use solana_sdk::native_token::LAMPORTS_PER_SOL;
use solana_sdk::pubkey::Pubkey;
use std::fmt;
use std::str::FromStr;

use crate::Error;

/// Tokens a buyer may pay with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PaymentToken {
    #[serde(rename = "USDC")]
    Usdc,
    #[serde(rename = "USDT")]
    Usdt,
    #[serde(rename = "WSOL")]
    Wsol,
}

impl PaymentToken {
    pub const ALL: [PaymentToken; 3] = [PaymentToken::Usdc, PaymentToken::Usdt, PaymentToken::Wsol];

    /// Devnet mint addresses.
    pub fn mint(self) -> Pubkey {
        match self {
            PaymentToken::Usdc => pubkey!("Gh9ZwEmdLJ8DscKNTkTqPbNwLNNBjuSzaG9Vp2KGtKJr"),
            PaymentToken::Usdt => pubkey!("EJwZgeZrdC8TXTQbQBoL6bfuAnFUUy1PVCMB4DYPzVaS"),
            PaymentToken::Wsol => pubkey!("So11111111111111111111111111111111111111112"),
        }
    }

    pub fn decimals(self) -> u8 {
        match self {
            PaymentToken::Usdc | PaymentToken::Usdt => 6,
            PaymentToken::Wsol => 9,
        }
    }

    /// Priced in dollars rather than SOL.
    pub fn is_usd(self) -> bool {
        matches!(self, PaymentToken::Usdc | PaymentToken::Usdt)
    }
}

impl fmt::Display for PaymentToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            PaymentToken::Usdc => "USDC",
            PaymentToken::Usdt => "USDT",
            PaymentToken::Wsol => "WSOL",
        };
        f.write_str(symbol)
    }
}

impl FromStr for PaymentToken {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PaymentToken::ALL
            .into_iter()
            .find(|t| t.to_string().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::UnsupportedToken(s.to_string()))
    }
}

/// A listing price expressed in a payment token.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Quote {
    pub token: PaymentToken,
    /// Whole-token amount, for display.
    pub amount: f64,
    /// Amount in the token's smallest unit.
    pub base_units: u64,
}

/// Convert a lamport price into `token`. USD tokens go through `sol_usd`.
pub fn quote(price_lamports: u64, token: PaymentToken, sol_usd: f64) -> Quote {
    let sol = price_lamports as f64 / LAMPORTS_PER_SOL as f64;
    if !token.is_usd() {
        return Quote {
            token,
            amount: sol,
            base_units: price_lamports,
        };
    }
    let amount = sol * sol_usd;
    let base_units = (amount * 10f64.powi(token.decimals() as i32)).round() as u64;
    Quote {
        token,
        amount,
        base_units,
    }
}

/// Whole SOL to lamports. Negative, non-finite and out-of-range amounts are
/// rejected instead of saturating.
pub fn sol_to_lamports(sol: f64) -> Result<u64, Error> {
    let lamports = (sol * LAMPORTS_PER_SOL as f64).round();
    if !lamports.is_finite() || lamports < 0.0 || lamports > u64::MAX as f64 {
        return Err(Error::InvalidPrice(sol.to_string()));
    }
    Ok(lamports as u64)
}
