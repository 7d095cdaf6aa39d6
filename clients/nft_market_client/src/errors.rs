//! Error types for the marketplace client.

use solana_client::client_error::ClientError;
use std::fmt;

/// Client error type.
///
/// Every failure is terminal for the action that triggered it; nothing is
/// retried and no partial state is rolled back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// An action that needs a signer was invoked without a connected wallet.
    WalletNotConnected,
    /// Configuration error.
    Config(String),
    /// RPC communication error, including on-chain rejection.
    Rpc(String),
    /// HTTP error talking to a metadata service or price oracle.
    Http(String),
    /// Account or document could not be decoded.
    Decode(String),
    /// Transaction could not be signed.
    Signing(String),
    /// No listing exists for the given mint.
    ListingNotFound(String),
    /// Payment token outside the supported set.
    UnsupportedToken(String),
    /// Price that is negative, not a number, or too large for lamports.
    InvalidPrice(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::WalletNotConnected => write!(f, "Connect the wallet!"),
            Error::Config(msg) => write!(f, "config error: {msg}"),
            Error::Rpc(msg) => write!(f, "rpc error: {msg}"),
            Error::Http(msg) => write!(f, "http error: {msg}"),
            Error::Decode(msg) => write!(f, "decode error: {msg}"),
            Error::Signing(msg) => write!(f, "signing error: {msg}"),
            Error::ListingNotFound(mint) => write!(f, "no listing for mint {mint}"),
            Error::UnsupportedToken(token) => write!(f, "unsupported payment token: {token}"),
            Error::InvalidPrice(price) => write!(f, "invalid price: {price}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<ClientError> for Error {
    fn from(e: ClientError) -> Self {
        Error::Rpc(e.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Http(e.to_string())
    }
}
