//! Detail enricher: joins a listing with its Token-2022 and off-chain metadata.

use anchor_spl::token_2022::spl_token_2022::extension::{BaseStateWithExtensions, StateWithExtensions};
use anchor_spl::token_2022::spl_token_2022::state::Mint;
use anchor_spl::token_2022_extensions::spl_token_metadata_interface::state::TokenMetadata;
use serde::Serialize;
use serde_json::Value;
use solana_sdk::pubkey::Pubkey;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::context::MarketContext;
use crate::fetch::JsonFetcher;
use crate::listing::{as_base58, Listing};
use crate::rpc::MarketRpc;
use crate::Error;

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp", "svg"];

/// A listing joined with its metadata. Missing text fields are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NftDetail {
    pub name: String,
    pub symbol: String,
    #[serde(serialize_with = "as_base58")]
    pub mint: Pubkey,
    /// First additional-metadata value of the mint, usually a group address.
    pub group: Option<String>,
    pub image: String,
    #[serde(serialize_with = "as_base58")]
    pub seller: Pubkey,
    /// Lamports.
    pub price: u64,
    #[serde(serialize_with = "as_base58")]
    pub listing: Pubkey,
    pub collection: String,
    pub description: String,
    pub designer: String,
    pub website: String,
    pub year: String,
}

impl NftDetail {
    fn from_listing(listing: &Listing) -> Self {
        Self {
            mint: listing.mint,
            seller: listing.seller,
            price: listing.price,
            listing: listing.address,
            ..Self::default()
        }
    }

    fn merge(&mut self, doc: OffChainMetadata) {
        self.image = doc.image.unwrap_or_default();
        self.collection = doc.collection.unwrap_or_default();
        self.description = doc.description.unwrap_or_default();
        self.designer = doc.designer.unwrap_or_default();
        self.website = doc.website.unwrap_or_default();
        self.year = doc.year.unwrap_or_default();
    }
}

/// Metadata embedded in a Token-2022 mint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MintMetadata {
    pub name: String,
    pub symbol: String,
    pub uri: String,
    pub additional_metadata: Vec<(String, String)>,
}

/// Recognized keys of an off-chain JSON metadata document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OffChainMetadata {
    pub image: Option<String>,
    pub collection: Option<String>,
    pub description: Option<String>,
    pub designer: Option<String>,
    pub website: Option<String>,
    pub year: Option<String>,
}

impl OffChainMetadata {
    /// Strings are taken as-is, numbers are rendered, anything else is absent.
    pub fn from_document(doc: &Value) -> Self {
        let text = |key: &str| match doc.get(key) {
            Some(Value::String(s)) => Some(s.clone()),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        };
        Self {
            image: text("image"),
            collection: text("collection"),
            description: text("description"),
            designer: text("designer"),
            website: text("website"),
            year: text("year"),
        }
    }
}

pub fn parse_mint_metadata(data: &[u8]) -> Result<MintMetadata, Error> {
    let mint = StateWithExtensions::<Mint>::unpack(data)
        .map_err(|e| Error::Decode(format!("token-2022 mint: {e}")))?;
    let metadata = mint
        .get_variable_len_extension::<TokenMetadata>()
        .map_err(|e| Error::Decode(format!("token metadata extension: {e}")))?;
    Ok(MintMetadata {
        name: metadata.name,
        symbol: metadata.symbol,
        uri: metadata.uri,
        additional_metadata: metadata.additional_metadata,
    })
}

/// True when the uri's path ends in a known image extension.
pub fn is_image_uri(uri: &str) -> bool {
    let path = uri.split(['?', '#']).next().unwrap_or_default();
    let file = path.rsplit('/').next().unwrap_or_default();
    match file.rsplit_once('.') {
        Some((_, ext)) => IMAGE_EXTENSIONS
            .iter()
            .any(|known| ext.eq_ignore_ascii_case(known)),
        None => false,
    }
}

async fn fetch_mint_metadata<R: MarketRpc, F: JsonFetcher>(
    ctx: &MarketContext<R, F>,
    mint: &Pubkey,
) -> Result<MintMetadata, Error> {
    let account = ctx
        .rpc
        .get_account(mint)
        .await?
        .ok_or_else(|| Error::Decode(format!("mint account {mint} not found")))?;
    parse_mint_metadata(&account.data)
}

/// Enrich one listing. Never fails: whatever cannot be fetched stays empty.
pub async fn fetch_detail<R: MarketRpc, F: JsonFetcher>(
    ctx: &MarketContext<R, F>,
    listing: &Listing,
) -> NftDetail {
    let mut detail = NftDetail::from_listing(listing);

    let metadata = match fetch_mint_metadata(ctx, &listing.mint).await {
        Ok(m) => m,
        Err(e) => {
            warn!(mint = %listing.mint, error = %e, "Mint metadata unavailable");
            return detail;
        }
    };

    detail.name = metadata.name;
    detail.symbol = metadata.symbol;
    detail.group = metadata.additional_metadata.first().map(|(_, v)| v.clone());

    if is_image_uri(&metadata.uri) {
        detail.image = metadata.uri;
        return detail;
    }
    if metadata.uri.is_empty() {
        return detail;
    }

    match ctx.http.get_json(&metadata.uri).await {
        Ok(doc) => {
            detail.merge(OffChainMetadata::from_document(&doc));
            debug!(mint = %listing.mint, uri = %metadata.uri, "Merged off-chain metadata");
        }
        Err(e) => {
            warn!(mint = %listing.mint, uri = %metadata.uri, error = %e, "Metadata fetch failed");
        }
    }
    detail
}

/// Enrich listings concurrently. Results come back in completion order.
pub async fn fetch_details<R: MarketRpc, F: JsonFetcher>(
    ctx: &Arc<MarketContext<R, F>>,
    listings: Vec<Listing>,
) -> Vec<NftDetail> {
    let mut handles = tokio::task::JoinSet::new();
    for listing in listings {
        let ctx = Arc::clone(ctx);
        handles.spawn(async move { fetch_detail(&ctx, &listing).await });
    }

    let mut details = Vec::with_capacity(handles.len());
    while let Some(result) = handles.join_next().await {
        match result {
            Ok(detail) => details.push(detail),
            Err(e) => warn!(error = %e, "Detail task panicked"),
        }
    }
    details
}
