//! RFM scorer - Recency/Frequency/Monetary donor scoring and segmentation.
//!
//! Consumes the persisted giving aggregates plus today's date and produces a
//! three-digit score (each digit 1-5) and a segment label. The computation is
//! total over all valid inputs; a contact who has never donated scores the
//! maximal recency penalty. Score and segment are persisted as a cache and
//! can always be recomputed from the aggregates.

use crate::{
    entities::{Contact, contact},
    errors::{Error, Result},
};
use chrono::NaiveDate;
use sea_orm::{ConnectionTrait, Set, prelude::*};

/// Donor segment labels assigned from the RFM digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DonorSegment {
    /// Recent, frequent, high-value donors
    Champions,
    /// Recent donors with solid frequency and value
    LoyalCustomers,
    /// Recent donors without an established giving pattern yet
    NewCustomers,
    /// Previously engaged donors who have gone quiet
    AtRisk,
    /// Everyone else
    NeedsAttention,
}

impl DonorSegment {
    /// The segment string stored in the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Champions => "champions",
            Self::LoyalCustomers => "loyal_customers",
            Self::NewCustomers => "new_customers",
            Self::AtRisk => "at_risk",
            Self::NeedsAttention => "needs_attention",
        }
    }
}

/// An RFM score: one digit each for recency, frequency, and monetary value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RfmScore {
    /// Recency digit, 5 for a gift within 90 days down to 1 beyond two years
    pub recency: u8,
    /// Frequency digit, 5 for ten or more gifts down to 1 for none
    pub frequency: u8,
    /// Monetary digit, 5 for $1,000+ lifetime giving down to 1 below $25
    pub monetary: u8,
}

impl RfmScore {
    /// Scores a donor from their giving aggregates as of `today`.
    #[must_use]
    pub fn compute(
        last_donation_date: Option<NaiveDate>,
        donation_count: i32,
        total_lifetime_giving: f64,
        today: NaiveDate,
    ) -> Self {
        Self {
            recency: recency_digit(last_donation_date, today),
            frequency: frequency_digit(donation_count),
            monetary: monetary_digit(total_lifetime_giving),
        }
    }

    /// The three-character score string stored in the database, e.g. `"522"`.
    #[must_use]
    pub fn digits(&self) -> String {
        format!("{}{}{}", self.recency, self.frequency, self.monetary)
    }

    /// Assigns the donor segment. Rules are evaluated in priority order and
    /// the first match wins.
    #[must_use]
    pub const fn segment(&self) -> DonorSegment {
        let (r, f, m) = (self.recency, self.frequency, self.monetary);
        if r >= 4 && f >= 4 && m >= 4 {
            DonorSegment::Champions
        } else if r >= 4 && f >= 3 && m >= 3 {
            DonorSegment::LoyalCustomers
        } else if r >= 4 && f <= 2 {
            DonorSegment::NewCustomers
        } else if r <= 2 && f >= 3 && m >= 3 {
            DonorSegment::AtRisk
        } else {
            DonorSegment::NeedsAttention
        }
    }
}

fn recency_digit(last_donation_date: Option<NaiveDate>, today: NaiveDate) -> u8 {
    let Some(last) = last_donation_date else {
        return 1;
    };

    let days_since = (today - last).num_days();
    if days_since <= 90 {
        5
    } else if days_since <= 180 {
        4
    } else if days_since <= 365 {
        3
    } else if days_since <= 730 {
        2
    } else {
        1
    }
}

fn frequency_digit(donation_count: i32) -> u8 {
    if donation_count >= 10 {
        5
    } else if donation_count >= 5 {
        4
    } else if donation_count >= 3 {
        3
    } else if donation_count >= 1 {
        2
    } else {
        1
    }
}

fn monetary_digit(total_lifetime_giving: f64) -> u8 {
    if total_lifetime_giving >= 1000.0 {
        5
    } else if total_lifetime_giving >= 500.0 {
        4
    } else if total_lifetime_giving >= 100.0 {
        3
    } else if total_lifetime_giving >= 25.0 {
        2
    } else {
        1
    }
}

/// Recomputes and persists a contact's RFM score and donor segment from the
/// contact's persisted giving aggregates.
///
/// Callers that may be holding stale aggregates run
/// [`crate::core::aggregation::recalculate_contact`] first; the trigger
/// coordinator always chains the two in that order.
pub async fn recalculate_score<C>(
    db: &C,
    contact_id: i64,
    today: NaiveDate,
) -> Result<contact::Model>
where
    C: ConnectionTrait,
{
    let existing = Contact::find_by_id(contact_id)
        .one(db)
        .await?
        .ok_or(Error::ContactNotFound { id: contact_id })?;

    let score = RfmScore::compute(
        existing.last_donation_date,
        existing.donation_count,
        existing.total_lifetime_giving,
        today,
    );

    let mut model: contact::ActiveModel = existing.into();
    model.rfm_score = Set(score.digits());
    model.donor_segment = Set(score.segment().as_str().to_string());

    model.update(db).await.map_err(Into::into)
}
