//! Client binding for the marketplace program's instructions.

use sha2::{Digest, Sha256};

pub mod trade;

pub use trade::*;

/// Anchor instruction discriminator: `sha256("global:<name>")[..8]`.
pub fn sighash(name: &str) -> [u8; 8] {
    let digest = Sha256::digest(format!("global:{name}").as_bytes());
    let mut out = [0u8; 8];
    out.copy_from_slice(&digest[..8]);
    out
}
