//! Aggregation recalculator - rebuilds a contact's giving aggregates from
//! that contact's completed donation transactions.
//!
//! The persisted aggregates (`total_lifetime_giving`, `donation_count`,
//! `last_donation_date`) are a cache over the transaction table. A recompute
//! always scans the live rows, never adjusts a stored partial sum, so running
//! it twice with unchanged transactions yields identical output. Recomputing
//! the RFM score afterwards is the caller's responsibility; the trigger
//! coordinator chains the two.

use crate::{
    core::transactions::{DONATION_KIND, TransactionStatus},
    entities::{Contact, Transaction, contact, transaction},
    errors::{Error, Result},
};
use chrono::NaiveDate;
use sea_orm::{ConnectionTrait, Set, prelude::*};

/// Giving aggregates computed from a contact's completed donations.
#[derive(Debug, Clone, PartialEq)]
pub struct GivingSummary {
    /// Sum of completed donation amounts
    pub total_lifetime_giving: f64,
    /// Number of completed donations
    pub donation_count: i32,
    /// Date of the most recent completed donation, None if there are none
    pub last_donation_date: Option<NaiveDate>,
}

/// Computes a contact's giving aggregates from the live transaction set.
///
/// Only `"donation"`-kind transactions in `"completed"` status qualify;
/// refunded, failed, and pending rows are ignored.
pub async fn giving_summary<C>(db: &C, contact_id: i64) -> Result<GivingSummary>
where
    C: ConnectionTrait,
{
    let donations = Transaction::find()
        .filter(transaction::Column::ContactId.eq(contact_id))
        .filter(transaction::Column::Kind.eq(DONATION_KIND))
        .filter(transaction::Column::Status.eq(TransactionStatus::Completed.as_str()))
        .all(db)
        .await?;

    let total_lifetime_giving = donations.iter().map(|t| t.amount).sum();
    let donation_count = i32::try_from(donations.len()).unwrap_or(i32::MAX);
    let last_donation_date = donations
        .iter()
        .map(|t| t.transaction_date)
        .max()
        .map(|latest| latest.date_naive());

    Ok(GivingSummary {
        total_lifetime_giving,
        donation_count,
        last_donation_date,
    })
}

/// Recomputes and persists a contact's giving aggregates.
///
/// Returns the contact with the fresh aggregates. Does not recompute the RFM
/// score; callers that need both chain [`crate::core::rfm::recalculate_score`]
/// after this.
pub async fn recalculate_contact<C>(db: &C, contact_id: i64) -> Result<contact::Model>
where
    C: ConnectionTrait,
{
    let existing = Contact::find_by_id(contact_id)
        .one(db)
        .await?
        .ok_or(Error::ContactNotFound { id: contact_id })?;

    let summary = giving_summary(db, contact_id).await?;

    let mut model: contact::ActiveModel = existing.into();
    model.total_lifetime_giving = Set(summary.total_lifetime_giving);
    model.donation_count = Set(summary.donation_count);
    model.last_donation_date = Set(summary.last_donation_date);

    model.update(db).await.map_err(Into::into)
}
