use super::money::Money;
use crate::error::QuoteError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A flat price for every whole-foot value in `[min, max]`.
///
/// `max == None` marks the open-ended top tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceTier {
    pub min: u32,
    #[serde(default)]
    pub max: Option<u32>,
    pub price: Money,
}

impl PriceTier {
    pub fn new(min: u32, max: Option<u32>, price: Money) -> Self {
        Self { min, max, price }
    }

    /// Whether `value` (already truncated to whole feet) falls inside this tier.
    pub fn contains(&self, value: Decimal) -> bool {
        value >= Decimal::from(self.min)
            && self.max.is_none_or(|max| value <= Decimal::from(max))
    }
}

/// Problems found by [`TierTable::coverage_issues`].
///
/// None of these make a table unusable: lookups that miss every tier fall back to
/// the last tier's price.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TierIssue {
    #[error("first tier starts at {0} instead of 0")]
    StartsAbove(u32),
    #[error("no tier covers {from}..={to}")]
    Gap { from: u32, to: u32 },
    #[error("tier starting at {0} overlaps the tier before it")]
    Overlap(u32),
    #[error("last tier ends at {0} instead of being open-ended")]
    Bounded(u32),
}

/// An ordered, non-empty list of price tiers, scanned first-match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<PriceTier>", into = "Vec<PriceTier>")]
pub struct TierTable {
    tiers: Vec<PriceTier>,
}

impl TierTable {
    pub fn new(tiers: Vec<PriceTier>) -> Result<Self, QuoteError> {
        if tiers.is_empty() {
            return Err(QuoteError::ValidationError(
                "Tier table must contain at least one tier".to_string(),
            ));
        }
        if let Some(bad) = tiers
            .iter()
            .find(|t| t.max.is_some_and(|max| max < t.min))
        {
            return Err(QuoteError::ValidationError(format!(
                "Tier minimum {} exceeds its maximum",
                bad.min
            )));
        }
        Ok(Self { tiers })
    }

    pub fn tiers(&self) -> &[PriceTier] {
        &self.tiers
    }

    /// Returns the price of the first tier containing `value`.
    ///
    /// The value is truncated to whole units first, so integer-contiguous tables
    /// (`0..=999`, `1000..=1999`, ...) cover every non-negative input. When no tier
    /// matches, the last tier's price is used.
    pub fn price_for(&self, value: Decimal) -> Money {
        let whole = value.trunc();
        self.tiers
            .iter()
            .find(|tier| tier.contains(whole))
            .or_else(|| self.tiers.last())
            .map_or(Money::ZERO, |tier| tier.price)
    }

    /// Checks that the table partitions `[0, ∞)` on whole units.
    pub fn coverage_issues(&self) -> Vec<TierIssue> {
        let mut issues = Vec::new();

        if let Some(first) = self.tiers.first()
            && first.min != 0
        {
            issues.push(TierIssue::StartsAbove(first.min));
        }

        for pair in self.tiers.windows(2) {
            let (prev, next) = (&pair[0], &pair[1]);
            match prev.max {
                None => issues.push(TierIssue::Overlap(next.min)),
                Some(max) if next.min <= max => issues.push(TierIssue::Overlap(next.min)),
                Some(max) if next.min > max + 1 => issues.push(TierIssue::Gap {
                    from: max + 1,
                    to: next.min - 1,
                }),
                Some(_) => {}
            }
        }

        if let Some(last) = self.tiers.last()
            && let Some(max) = last.max
        {
            issues.push(TierIssue::Bounded(max));
        }

        issues
    }
}

impl TryFrom<Vec<PriceTier>> for TierTable {
    type Error = QuoteError;

    fn try_from(tiers: Vec<PriceTier>) -> Result<Self, Self::Error> {
        Self::new(tiers)
    }
}

impl From<TierTable> for Vec<PriceTier> {
    fn from(table: TierTable) -> Self {
        table.tiers
    }
}
