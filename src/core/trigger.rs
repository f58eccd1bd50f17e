//! Trigger coordinator - decides which recalculations run after a transaction
//! mutation, and in what order.
//!
//! Replaces the save-hook pattern with an explicit command interface: the
//! mutation service hands each saved transaction (plus its previous status)
//! to [`TriggerCoordinator::transaction_changed`], which recomputes exactly
//! what that mutation could have invalidated. The coordinator holds the
//! database handle and calls the recalculators directly.
//!
//! Ordering within one mutation: the contact's aggregates are recomputed
//! strictly before the RFM score, inside one database transaction, so the
//! score always reads fresh aggregates. Campaign and pledge rollups are
//! independent of the contact-level pass. Recompute failures are logged and
//! swallowed here so they never fail the business mutation that triggered
//! them.

use crate::{
    core::{aggregation, rfm, rollup, transactions::TransactionStatus},
    entities::{Contact, Pledge, campaign, contact, pledge, transaction},
    errors::Result,
};
use chrono::Utc;
use sea_orm::{DatabaseConnection, TransactionTrait, prelude::*};
use tracing::{debug, error, info};

/// Owns the database handle and exposes the recompute commands invoked by
/// mutation sources, batch runners, and tests.
pub struct TriggerCoordinator {
    db: DatabaseConnection,
}

impl TriggerCoordinator {
    /// Creates a coordinator over the given database handle.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Recomputes one contact's giving aggregates and RFM score, in that
    /// order, as one atomic unit of work.
    ///
    /// Both passes run inside a single database transaction scoped to the
    /// contact: the recompute reads the full live transaction set at the time
    /// it runs, and concurrent recomputes for the same contact resolve
    /// last-writer-wins without ever mixing partial state.
    pub async fn recalculate_contact(&self, contact_id: i64) -> Result<contact::Model> {
        let txn = self.db.begin().await?;
        aggregation::recalculate_contact(&txn, contact_id).await?;
        let scored = rfm::recalculate_score(&txn, contact_id, Utc::now().date_naive()).await?;
        txn.commit().await?;
        Ok(scored)
    }

    /// Recomputes a campaign's rollup fields.
    pub async fn recalculate_campaign(&self, campaign_id: i64) -> Result<campaign::Model> {
        rollup::recalculate_campaign(&self.db, campaign_id).await
    }

    /// Recomputes a pledge's rollup fields and derived status.
    pub async fn recalculate_pledge(&self, pledge_id: i64) -> Result<pledge::Model> {
        rollup::recalculate_pledge(&self.db, pledge_id, Utc::now().date_naive()).await
    }

    /// Reacts to a saved transaction mutation.
    ///
    /// Recomputation runs only when the status crossed the counts-toward-
    /// aggregates boundary: a transition into `completed` (including being
    /// recorded as completed, `previous_status` None) or out of it. Failures
    /// in any recompute step are logged and swallowed; the mutation that
    /// triggered this has already committed and must not be failed
    /// retroactively.
    pub async fn transaction_changed(
        &self,
        transaction: &transaction::Model,
        previous_status: Option<TransactionStatus>,
    ) {
        let current = match TransactionStatus::parse(&transaction.status) {
            Ok(status) => status,
            Err(e) => {
                error!(
                    "Transaction {} has unparseable status, skipping recompute: {e}",
                    transaction.id
                );
                return;
            }
        };

        if !crosses_aggregate_boundary(previous_status, current) {
            debug!(
                "Transaction {} status change did not cross the completed boundary",
                transaction.id
            );
            return;
        }

        debug!(
            "Transaction {} crossed the completed boundary; recomputing derived fields",
            transaction.id
        );

        if let Err(e) = self.recalculate_contact(transaction.contact_id).await {
            error!(
                "Aggregate/score recompute failed for contact {}: {e}",
                transaction.contact_id
            );
        }

        if let Some(campaign_id) = transaction.campaign_id {
            if let Err(e) = self.recalculate_campaign(campaign_id).await {
                error!("Rollup recompute failed for campaign {campaign_id}: {e}");
            }
        }

        match self.matching_pledges(transaction).await {
            Ok(pledges) => {
                for matched in pledges {
                    if let Err(e) = self.recalculate_pledge(matched.id).await {
                        error!("Rollup recompute failed for pledge {}: {e}", matched.id);
                    }
                }
            }
            Err(e) => {
                error!(
                    "Pledge lookup failed for contact {}: {e}",
                    transaction.contact_id
                );
            }
        }
    }

    /// Recomputes aggregates and scores for every contact with at least one
    /// recorded donation. Returns the number of contacts updated.
    ///
    /// Safe to run while individual recomputes are being triggered by new
    /// donations: every recompute scans live rows, so the batch can only
    /// rewrite a contact's fields with equally fresh values.
    pub async fn recalculate_all_donors(&self) -> Result<usize> {
        let donors = Contact::find()
            .filter(contact::Column::DonationCount.gt(0))
            .all(&self.db)
            .await?;

        let mut updated = 0usize;
        for donor in donors {
            self.recalculate_contact(donor.id).await?;
            updated += 1;
        }

        info!("Updated giving totals and RFM scores for {updated} contacts");
        Ok(updated)
    }

    /// Pledges whose contact and campaign both match the transaction.
    async fn matching_pledges(
        &self,
        transaction: &transaction::Model,
    ) -> Result<Vec<pledge::Model>> {
        let mut query =
            Pledge::find().filter(pledge::Column::ContactId.eq(transaction.contact_id));
        query = match transaction.campaign_id {
            Some(campaign_id) => query.filter(pledge::Column::CampaignId.eq(campaign_id)),
            None => query.filter(pledge::Column::CampaignId.is_null()),
        };
        query.all(&self.db).await.map_err(Into::into)
    }
}

/// Whether a status change crossed the counts-toward-aggregates boundary.
fn crosses_aggregate_boundary(
    previous: Option<TransactionStatus>,
    current: TransactionStatus,
) -> bool {
    match previous {
        None => current.counts_toward_aggregates(),
        Some(prev) => {
            prev != current
                && (prev.counts_toward_aggregates() || current.counts_toward_aggregates())
        }
    }
}
