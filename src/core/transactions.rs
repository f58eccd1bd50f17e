//! Transaction mutation service - the entry point for recording payments and
//! moving them through their lifecycle.
//!
//! Every mutation that can change whether a transaction counts toward derived
//! aggregates explicitly hands the saved row to the [`TriggerCoordinator`],
//! which decides what to recompute. Recompute failures are logged by the
//! coordinator and never fail the mutation itself.

use crate::{
    core::trigger::TriggerCoordinator,
    entities::{Contact, Transaction, transaction},
    errors::{Error, Result},
};
use sea_orm::{DatabaseConnection, Set, TransactionTrait, prelude::*};

/// Transaction kind that counts toward donor giving aggregates.
pub const DONATION_KIND: &str = "donation";

/// Payment lifecycle states for a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionStatus {
    /// Recorded but not yet handed to a payment processor
    Pending,
    /// In flight at the payment processor
    Processing,
    /// Settled; counts toward all derived aggregates
    Completed,
    /// Rejected by the payment processor
    Failed,
    /// Withdrawn before processing
    Cancelled,
    /// Previously completed, then returned to the donor
    Refunded,
    /// Contested by the donor with the payment processor
    Disputed,
}

impl TransactionStatus {
    /// The status string stored in the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Cancelled => "cancelled",
            Self::Refunded => "refunded",
            Self::Disputed => "disputed",
        }
    }

    /// Parses a stored status string.
    pub fn parse(status: &str) -> Result<Self> {
        match status {
            "pending" => Ok(Self::Pending),
            "processing" => Ok(Self::Processing),
            "completed" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            "cancelled" => Ok(Self::Cancelled),
            "refunded" => Ok(Self::Refunded),
            "disputed" => Ok(Self::Disputed),
            _ => Err(Error::InvalidStatus {
                status: status.to_string(),
            }),
        }
    }

    /// Whether transactions in this status count toward derived aggregates.
    #[must_use]
    pub const fn counts_toward_aggregates(self) -> bool {
        matches!(self, Self::Completed)
    }
}

/// Records a new transaction and notifies the trigger coordinator.
///
/// The amount must be finite and non-negative; zero-dollar transactions are
/// allowed (in-kind gifts are recorded with a zero amount). The owning contact
/// must exist. If the transaction is recorded directly in `completed` status,
/// the coordinator recomputes the contact's aggregates and score plus any
/// affected campaign and pledge rollups before this function returns.
#[allow(clippy::too_many_arguments)]
pub async fn record_transaction(
    db: &DatabaseConnection,
    triggers: &TriggerCoordinator,
    contact_id: i64,
    campaign_id: Option<i64>,
    kind: &str,
    amount: f64,
    payment_method: &str,
    description: String,
    status: TransactionStatus,
) -> Result<transaction::Model> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(Error::InvalidAmount { amount });
    }

    // Use a transaction to ensure atomicity of the existence check + insert
    let txn = db.begin().await?;

    Contact::find_by_id(contact_id)
        .one(&txn)
        .await?
        .ok_or(Error::ContactNotFound { id: contact_id })?;

    let now = chrono::Utc::now();
    let processed_date = if status == TransactionStatus::Completed {
        Some(now)
    } else {
        None
    };

    let model = transaction::ActiveModel {
        contact_id: Set(contact_id),
        campaign_id: Set(campaign_id),
        kind: Set(kind.to_string()),
        amount: Set(amount),
        status: Set(status.as_str().to_string()),
        payment_method: Set(payment_method.to_string()),
        description: Set(description),
        transaction_date: Set(now),
        processed_date: Set(processed_date),
        ..Default::default()
    };

    let saved = model.insert(&txn).await?;
    txn.commit().await?;

    // Recomputes scan committed rows, so this must happen after the commit
    triggers.transaction_changed(&saved, None).await;

    Ok(saved)
}

/// Transitions a transaction to a new lifecycle status and notifies the
/// trigger coordinator with the previous status.
///
/// Setting the current status again is a no-op. Completing a transaction
/// stamps `processed_date` if it was never processed before.
pub async fn set_transaction_status(
    db: &DatabaseConnection,
    triggers: &TriggerCoordinator,
    transaction_id: i64,
    new_status: TransactionStatus,
) -> Result<transaction::Model> {
    let existing = Transaction::find_by_id(transaction_id)
        .one(db)
        .await?
        .ok_or(Error::TransactionNotFound { id: transaction_id })?;

    let previous = TransactionStatus::parse(&existing.status)?;
    if previous == new_status {
        return Ok(existing);
    }

    let stamp_processed =
        new_status == TransactionStatus::Completed && existing.processed_date.is_none();

    let mut model: transaction::ActiveModel = existing.into();
    model.status = Set(new_status.as_str().to_string());
    if stamp_processed {
        model.processed_date = Set(Some(chrono::Utc::now()));
    }
    let updated = model.update(db).await?;

    triggers.transaction_changed(&updated, Some(previous)).await;

    Ok(updated)
}

/// Marks a transaction as settled by the payment processor.
pub async fn process_payment(
    db: &DatabaseConnection,
    triggers: &TriggerCoordinator,
    transaction_id: i64,
) -> Result<transaction::Model> {
    set_transaction_status(db, triggers, transaction_id, TransactionStatus::Completed).await
}

/// Returns a previously completed transaction to the donor.
pub async fn refund_transaction(
    db: &DatabaseConnection,
    triggers: &TriggerCoordinator,
    transaction_id: i64,
) -> Result<transaction::Model> {
    set_transaction_status(db, triggers, transaction_id, TransactionStatus::Refunded).await
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::*;

    #[test]
    fn test_status_round_trips_through_strings() {
        for status in [
            TransactionStatus::Pending,
            TransactionStatus::Processing,
            TransactionStatus::Completed,
            TransactionStatus::Failed,
            TransactionStatus::Cancelled,
            TransactionStatus::Refunded,
            TransactionStatus::Disputed,
        ] {
            assert_eq!(TransactionStatus::parse(status.as_str()).unwrap(), status);
        }
    }

    #[test]
    fn test_parse_rejects_unknown_status() {
        let result = TransactionStatus::parse("settled");
        assert!(matches!(result, Err(Error::InvalidStatus { status }) if status == "settled"));
    }

    #[test]
    fn test_only_completed_counts_toward_aggregates() {
        assert!(TransactionStatus::Completed.counts_toward_aggregates());
        assert!(!TransactionStatus::Pending.counts_toward_aggregates());
        assert!(!TransactionStatus::Refunded.counts_toward_aggregates());
        assert!(!TransactionStatus::Failed.counts_toward_aggregates());
    }

    #[tokio::test]
    async fn test_record_transaction_rejects_invalid_amounts() -> Result<()> {
        let (db, contact) = setup_with_contact().await?;
        let triggers = TriggerCoordinator::new(db.clone());

        for bad in [-5.0, f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let result = record_transaction(
                &db,
                &triggers,
                contact.id,
                None,
                DONATION_KIND,
                bad,
                "credit_card",
                "test".to_string(),
                TransactionStatus::Completed,
            )
            .await;
            assert!(matches!(result, Err(Error::InvalidAmount { .. })));
        }

        Ok(())
    }

    #[tokio::test]
    async fn test_record_transaction_allows_zero_amount() -> Result<()> {
        let (db, contact) = setup_with_contact().await?;
        let triggers = TriggerCoordinator::new(db.clone());

        let saved = record_transaction(
            &db,
            &triggers,
            contact.id,
            None,
            DONATION_KIND,
            0.0,
            "in_kind",
            "Donated print run".to_string(),
            TransactionStatus::Completed,
        )
        .await?;

        assert_eq!(saved.amount, 0.0);
        Ok(())
    }

    #[tokio::test]
    async fn test_record_transaction_unknown_contact() -> Result<()> {
        let db = setup_test_db().await?;
        let triggers = TriggerCoordinator::new(db.clone());

        let result = record_transaction(
            &db,
            &triggers,
            999,
            None,
            DONATION_KIND,
            50.0,
            "credit_card",
            "test".to_string(),
            TransactionStatus::Completed,
        )
        .await;
        assert!(matches!(result, Err(Error::ContactNotFound { id: 999 })));

        Ok(())
    }

    #[tokio::test]
    async fn test_completed_donation_updates_contact_aggregates() -> Result<()> {
        let (db, contact) = setup_with_contact().await?;
        let triggers = TriggerCoordinator::new(db.clone());

        record_transaction(
            &db,
            &triggers,
            contact.id,
            None,
            DONATION_KIND,
            75.0,
            "check",
            "Annual appeal".to_string(),
            TransactionStatus::Completed,
        )
        .await?;

        let refreshed = Contact::find_by_id(contact.id).one(&db).await?.unwrap();
        assert_eq!(refreshed.total_lifetime_giving, 75.0);
        assert_eq!(refreshed.donation_count, 1);
        assert!(refreshed.last_donation_date.is_some());
        assert!(!refreshed.rfm_score.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_pending_donation_does_not_touch_aggregates() -> Result<()> {
        let (db, contact) = setup_with_contact().await?;
        let triggers = TriggerCoordinator::new(db.clone());

        record_transaction(
            &db,
            &triggers,
            contact.id,
            None,
            DONATION_KIND,
            75.0,
            "check",
            "Annual appeal".to_string(),
            TransactionStatus::Pending,
        )
        .await?;

        let refreshed = Contact::find_by_id(contact.id).one(&db).await?.unwrap();
        assert_eq!(refreshed.total_lifetime_giving, 0.0);
        assert_eq!(refreshed.donation_count, 0);
        assert_eq!(refreshed.rfm_score, "");

        Ok(())
    }

    #[tokio::test]
    async fn test_process_payment_completes_and_stamps() -> Result<()> {
        let (db, contact) = setup_with_contact().await?;
        let triggers = TriggerCoordinator::new(db.clone());

        let pending = record_transaction(
            &db,
            &triggers,
            contact.id,
            None,
            DONATION_KIND,
            40.0,
            "credit_card",
            "Online gift".to_string(),
            TransactionStatus::Pending,
        )
        .await?;
        assert!(pending.processed_date.is_none());

        let completed = process_payment(&db, &triggers, pending.id).await?;
        assert_eq!(completed.status, "completed");
        assert!(completed.processed_date.is_some());

        let refreshed = Contact::find_by_id(contact.id).one(&db).await?.unwrap();
        assert_eq!(refreshed.total_lifetime_giving, 40.0);
        assert_eq!(refreshed.donation_count, 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_refund_reverses_aggregates_and_rescores() -> Result<()> {
        let (db, contact) = setup_with_contact().await?;
        let triggers = TriggerCoordinator::new(db.clone());

        let first = record_transaction(
            &db,
            &triggers,
            contact.id,
            None,
            DONATION_KIND,
            100.0,
            "credit_card",
            "Gala gift".to_string(),
            TransactionStatus::Completed,
        )
        .await?;
        record_transaction(
            &db,
            &triggers,
            contact.id,
            None,
            DONATION_KIND,
            30.0,
            "cash",
            "Door donation".to_string(),
            TransactionStatus::Completed,
        )
        .await?;

        let before = Contact::find_by_id(contact.id).one(&db).await?.unwrap();
        assert_eq!(before.total_lifetime_giving, 130.0);
        assert_eq!(before.donation_count, 2);

        refund_transaction(&db, &triggers, first.id).await?;

        let after = Contact::find_by_id(contact.id).one(&db).await?.unwrap();
        assert_eq!(after.total_lifetime_giving, 30.0);
        assert_eq!(after.donation_count, 1);
        // $30 lifetime drops the monetary digit from 3 to 2
        assert_eq!(before.rfm_score.as_bytes()[2], b'3');
        assert_eq!(after.rfm_score.as_bytes()[2], b'2');

        Ok(())
    }

    #[tokio::test]
    async fn test_set_status_same_status_is_noop() -> Result<()> {
        let (db, contact) = setup_with_contact().await?;
        let triggers = TriggerCoordinator::new(db.clone());

        let saved = record_transaction(
            &db,
            &triggers,
            contact.id,
            None,
            DONATION_KIND,
            25.0,
            "check",
            "test".to_string(),
            TransactionStatus::Pending,
        )
        .await?;

        let unchanged = set_transaction_status(
            &db,
            &triggers,
            saved.id,
            TransactionStatus::Pending,
        )
        .await?;
        assert_eq!(unchanged, saved);

        Ok(())
    }

    #[tokio::test]
    async fn test_set_status_unknown_transaction() -> Result<()> {
        let db = setup_test_db().await?;
        let triggers = TriggerCoordinator::new(db.clone());

        let result =
            set_transaction_status(&db, &triggers, 42, TransactionStatus::Completed).await;
        assert!(matches!(result, Err(Error::TransactionNotFound { id: 42 })));

        Ok(())
    }

    #[tokio::test]
    async fn test_non_donation_kind_does_not_count_toward_giving() -> Result<()> {
        let (db, contact) = setup_with_contact().await?;
        let triggers = TriggerCoordinator::new(db.clone());

        record_transaction(
            &db,
            &triggers,
            contact.id,
            None,
            "event_ticket",
            60.0,
            "credit_card",
            "Reading series ticket".to_string(),
            TransactionStatus::Completed,
        )
        .await?;

        let refreshed = Contact::find_by_id(contact.id).one(&db).await?.unwrap();
        assert_eq!(refreshed.total_lifetime_giving, 0.0);
        assert_eq!(refreshed.donation_count, 0);

        Ok(())
    }
}
