//! Market view: the active listings, enriched, plus filtering.

use serde::Serialize;
use solana_sdk::pubkey::Pubkey;
use std::sync::Arc;
use tracing::{error, info};

use crate::context::MarketContext;
use crate::fetch::JsonFetcher;
use crate::listing::fetch_listings;
use crate::metadata::{fetch_details, NftDetail};
use crate::rpc::MarketRpc;
use crate::tokens::sol_to_lamports;
use crate::Error;

/// Filter over enriched listings. Text fields match case-insensitive
/// substrings; price bounds are set in SOL, kept in lamports, and inclusive.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterCriteria {
    pub name: Option<String>,
    pub collection: Option<String>,
    pub description: Option<String>,
    pub designer: Option<String>,
    pub website: Option<String>,
    pub year: Option<String>,
    min_lamports: Option<u64>,
    max_lamports: Option<u64>,
}

impl FilterCriteria {
    pub fn min_lamports(&self) -> Option<u64> {
        self.min_lamports
    }

    pub fn max_lamports(&self) -> Option<u64> {
        self.max_lamports
    }

    /// Rejected (returns false) when not a valid price or above the current
    /// maximum.
    pub fn set_min_price(&mut self, sol: f64) -> bool {
        let Ok(min) = sol_to_lamports(sol) else {
            return false;
        };
        if self.max_lamports.is_some_and(|max| min > max) {
            return false;
        }
        self.min_lamports = Some(min);
        true
    }

    /// Rejected (returns false) when not a valid price or below the current
    /// minimum.
    pub fn set_max_price(&mut self, sol: f64) -> bool {
        let Ok(max) = sol_to_lamports(sol) else {
            return false;
        };
        if self.min_lamports.is_some_and(|min| max < min) {
            return false;
        }
        self.max_lamports = Some(max);
        true
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn matches(&self, asset: &NftDetail) -> bool {
        let text = [
            (&self.name, &asset.name),
            (&self.collection, &asset.collection),
            (&self.description, &asset.description),
            (&self.designer, &asset.designer),
            (&self.website, &asset.website),
            (&self.year, &asset.year),
        ];
        let text_ok = text.iter().all(|(wanted, actual)| match wanted {
            Some(w) => actual.to_lowercase().contains(&w.to_lowercase()),
            None => true,
        });

        text_ok
            && self.min_lamports.is_none_or(|min| asset.price >= min)
            && self.max_lamports.is_none_or(|max| asset.price <= max)
    }

    pub fn apply(&self, assets: &[NftDetail]) -> Vec<NftDetail> {
        assets.iter().filter(|a| self.matches(a)).cloned().collect()
    }
}

/// What the viewer can do with a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Action {
    Buy,
    Withdraw,
    ConnectWallet,
}

pub fn available_action(asset: &NftDetail, viewer: Option<Pubkey>) -> Action {
    match viewer {
        Some(v) if v == asset.seller => Action::Withdraw,
        Some(_) => Action::Buy,
        None => Action::ConnectWallet,
    }
}

/// The market page: active, enriched listings.
#[derive(Debug, Default)]
pub struct MarketView {
    assets: Vec<NftDetail>,
    filter: FilterCriteria,
}

impl MarketView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn assets(&self) -> &[NftDetail] {
        &self.assets
    }

    pub fn filter(&self) -> &FilterCriteria {
        &self.filter
    }

    pub fn filter_mut(&mut self) -> &mut FilterCriteria {
        &mut self.filter
    }

    /// Re-read listings, keep the active ones and enrich them. On failure the
    /// previous assets stay in place.
    pub async fn refresh<R: MarketRpc, F: JsonFetcher>(
        &mut self,
        ctx: &Arc<MarketContext<R, F>>,
    ) -> Result<(), Error> {
        let listings = match fetch_listings(ctx).await {
            Ok(l) => l,
            Err(e) => {
                error!(error = %e, "Market refresh failed, keeping previous listings");
                return Err(e);
            }
        };
        let active: Vec<_> = listings.into_iter().filter(|l| l.is_active).collect();
        self.assets = fetch_details(ctx, active).await;
        info!(count = self.assets.len(), "Market refreshed");
        Ok(())
    }

    /// Narrow the current assets by the filter.
    pub fn apply_filter(&mut self) {
        self.assets = self.filter.apply(&self.assets);
    }

    /// Drop the filter and reload everything.
    pub async fn clear_filter<R: MarketRpc, F: JsonFetcher>(
        &mut self,
        ctx: &Arc<MarketContext<R, F>>,
    ) -> Result<(), Error> {
        self.filter = FilterCriteria::default();
        self.refresh(ctx).await
    }
}
