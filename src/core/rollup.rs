//! Campaign and pledge rollups - derived fields recomputed from the set of
//! completed transactions attributed to a campaign or matching a pledge.
//!
//! Rollups are independent of the contact-level aggregates and may run in any
//! order relative to them. Like the contact aggregates they always scan live
//! transaction rows and are idempotent.

use crate::{
    core::{
        rates,
        transactions::{DONATION_KIND, TransactionStatus},
    },
    entities::{Campaign, Pledge, Transaction, campaign, pledge, transaction},
    errors::{Error, Result},
};
use chrono::NaiveDate;
use sea_orm::{ConnectionTrait, QueryFilter, Set, prelude::*};
use std::collections::HashSet;

/// Pledge lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PledgeStatus {
    /// Open commitment, still collecting payments
    Active,
    /// Fully paid; a one-way state
    Fulfilled,
    /// Past its due date without full payment
    Overdue,
    /// Withdrawn; never changed by rollups
    Cancelled,
}

impl PledgeStatus {
    /// The status string stored in the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Fulfilled => "fulfilled",
            Self::Overdue => "overdue",
            Self::Cancelled => "cancelled",
        }
    }

    /// Parses a stored status string.
    pub fn parse(status: &str) -> Result<Self> {
        match status {
            "active" => Ok(Self::Active),
            "fulfilled" => Ok(Self::Fulfilled),
            "overdue" => Ok(Self::Overdue),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(Error::InvalidStatus {
                status: status.to_string(),
            }),
        }
    }
}

/// Recomputes and persists a campaign's `total_raised` and `donor_count`
/// from the completed donations attributed to it.
pub async fn recalculate_campaign<C>(db: &C, campaign_id: i64) -> Result<campaign::Model>
where
    C: ConnectionTrait,
{
    let existing = Campaign::find_by_id(campaign_id)
        .one(db)
        .await?
        .ok_or(Error::CampaignNotFound { id: campaign_id })?;

    let donations = Transaction::find()
        .filter(transaction::Column::CampaignId.eq(campaign_id))
        .filter(transaction::Column::Kind.eq(DONATION_KIND))
        .filter(transaction::Column::Status.eq(TransactionStatus::Completed.as_str()))
        .all(db)
        .await?;

    let total_raised = donations.iter().map(|t| t.amount).sum();
    let donors: HashSet<i64> = donations.iter().map(|t| t.contact_id).collect();
    let donor_count = i32::try_from(donors.len()).unwrap_or(i32::MAX);

    let mut model: campaign::ActiveModel = existing.into();
    model.total_raised = Set(total_raised);
    model.donor_count = Set(donor_count);

    model.update(db).await.map_err(Into::into)
}

/// Campaign progress toward its goal as a percentage, 0 when no goal is set.
#[must_use]
pub fn campaign_progress(campaign: &campaign::Model) -> f64 {
    rates::progress_percentage(campaign.total_raised, campaign.goal_amount)
}

/// Whether the campaign is running as of `today`.
#[must_use]
pub fn campaign_is_ongoing(campaign: &campaign::Model, today: NaiveDate) -> bool {
    if !campaign.is_active || campaign.start_date > today {
        return false;
    }
    campaign.end_date.is_none_or(|end| today <= end)
}

/// Recomputes and persists a pledge's `amount_paid` and derives its status.
///
/// Qualifying payments are the completed transactions for the pledge's
/// contact and campaign dated on or after the pledge date. Status moves one
/// way only: an active or overdue pledge that reaches its total becomes
/// fulfilled (stamping `fulfillment_date` the first time), an active pledge
/// past its due date becomes overdue, and cancelled or fulfilled pledges are
/// never changed - a refund that drops `amount_paid` back below the total
/// does not revert fulfillment.
pub async fn recalculate_pledge<C>(
    db: &C,
    pledge_id: i64,
    today: NaiveDate,
) -> Result<pledge::Model>
where
    C: ConnectionTrait,
{
    let existing = Pledge::find_by_id(pledge_id)
        .one(db)
        .await?
        .ok_or(Error::PledgeNotFound { id: pledge_id })?;

    let mut query = Transaction::find()
        .filter(transaction::Column::ContactId.eq(existing.contact_id))
        .filter(transaction::Column::Status.eq(TransactionStatus::Completed.as_str()));
    query = match existing.campaign_id {
        Some(campaign_id) => query.filter(transaction::Column::CampaignId.eq(campaign_id)),
        None => query.filter(transaction::Column::CampaignId.is_null()),
    };
    let payments = query.all(db).await?;

    let amount_paid: f64 = payments
        .iter()
        .filter(|t| t.transaction_date.date_naive() >= existing.pledge_date)
        .map(|t| t.amount)
        .sum();

    let status = PledgeStatus::parse(&existing.status)?;
    let mut next_status = status;
    let mut fulfillment_date = existing.fulfillment_date;

    if amount_paid >= existing.total_amount {
        if matches!(status, PledgeStatus::Active | PledgeStatus::Overdue) {
            next_status = PledgeStatus::Fulfilled;
            if fulfillment_date.is_none() {
                fulfillment_date = Some(today);
            }
        }
    } else if status == PledgeStatus::Active
        && existing.due_date.is_some_and(|due| today > due)
    {
        next_status = PledgeStatus::Overdue;
    }

    let mut model: pledge::ActiveModel = existing.into();
    model.amount_paid = Set(amount_paid);
    model.status = Set(next_status.as_str().to_string());
    model.fulfillment_date = Set(fulfillment_date);

    model.update(db).await.map_err(Into::into)
}

/// Dollars still owed on the pledge.
#[must_use]
pub fn pledge_amount_remaining(pledge: &pledge::Model) -> f64 {
    pledge.total_amount - pledge.amount_paid
}

/// Whether the pledge has been fully paid.
#[must_use]
pub fn pledge_is_fulfilled(pledge: &pledge::Model) -> bool {
    pledge.amount_paid >= pledge.total_amount
}

/// Whether the pledge is past due without full payment as of `today`.
#[must_use]
pub fn pledge_is_overdue(pledge: &pledge::Model, today: NaiveDate) -> bool {
    pledge.due_date.is_some_and(|due| today > due) && !pledge_is_fulfilled(pledge)
}
