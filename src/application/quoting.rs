use super::engine::PricingEngine;
use crate::domain::config::PricingConfig;
use crate::domain::ports::ConfigSourceBox;
use crate::domain::quote::{QuoteBreakdown, QuoteRequest};
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// A priced request together with the configuration version it was priced at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub config_version: u64,
    pub request: QuoteRequest,
    pub breakdown: QuoteBreakdown,
}

/// Loads a pricing snapshot and runs the engine against it.
pub struct QuoteService {
    source: ConfigSourceBox,
}

impl QuoteService {
    pub fn new(source: ConfigSourceBox) -> Self {
        Self { source }
    }

    /// Prices a single request against a freshly loaded snapshot.
    pub async fn quote(&self, request: QuoteRequest) -> Result<Quote> {
        let snapshot = self.source.load().await?;
        Ok(price(snapshot.version, &snapshot.config, request))
    }

    /// Prices a batch of requests against one snapshot, so every quote in the
    /// batch shares a configuration version.
    pub async fn quote_all(&self, requests: Vec<QuoteRequest>) -> Result<Vec<Quote>> {
        let snapshot = self.source.load().await?;
        Ok(requests
            .into_iter()
            .map(|request| price(snapshot.version, &snapshot.config, request))
            .collect())
    }
}

fn price(
    config_version: u64,
    config: &PricingConfig,
    request: QuoteRequest,
) -> Quote {
    let breakdown = PricingEngine::new(config).quote(&request);
    tracing::debug!(
        config_version,
        zipcode = %request.zipcode,
        total = %breakdown.total,
        "priced quote"
    );
    Quote {
        config_version,
        request,
        breakdown,
    }
}
