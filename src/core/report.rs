//! Dashboard report generation.
//!
//! Assembles organization-wide metrics for the presentation layer. Everything
//! here is read-only: giving totals and segments come from the persisted
//! derived fields, revenue comes from a live scan of completed donations.

use crate::{
    core::{
        rates, rollup,
        transactions::{DONATION_KIND, TransactionStatus},
    },
    entities::{Campaign, Contact, Transaction, transaction},
    errors::Result,
};
use sea_orm::{DatabaseConnection, prelude::*};
use std::collections::BTreeMap;

/// One campaign's row in the dashboard.
#[derive(Debug, Clone)]
pub struct CampaignPerformance {
    /// Campaign ID
    pub campaign_id: i64,
    /// Campaign name
    pub name: String,
    /// Fundraising goal in dollars
    pub goal_amount: f64,
    /// Total raised so far
    pub total_raised: f64,
    /// Distinct donors so far
    pub donor_count: i32,
    /// Progress toward the goal, 0-100
    pub progress_percentage: f64,
}

/// Organization-wide donor metrics.
#[derive(Debug, Clone)]
pub struct DashboardReport {
    /// Contacts with at least one completed donation
    pub total_donors: u64,
    /// Sum of all completed donation amounts
    pub total_revenue: f64,
    /// Number of completed donations
    pub donation_count: u64,
    /// Mean completed donation amount
    pub average_gift_size: f64,
    /// Donor counts per segment label, for contacts that have been scored
    pub segment_distribution: BTreeMap<String, u64>,
    /// Per-campaign performance rows
    pub campaigns: Vec<CampaignPerformance>,
}

/// Builds the dashboard report.
pub async fn generate_dashboard(db: &DatabaseConnection) -> Result<DashboardReport> {
    let contacts = Contact::find().all(db).await?;
    let total_donors = contacts.iter().filter(|c| c.donation_count > 0).count() as u64;

    let mut segment_distribution: BTreeMap<String, u64> = BTreeMap::new();
    for contact in contacts.iter().filter(|c| !c.donor_segment.is_empty()) {
        *segment_distribution
            .entry(contact.donor_segment.clone())
            .or_insert(0) += 1;
    }

    let donations = Transaction::find()
        .filter(transaction::Column::Kind.eq(DONATION_KIND))
        .filter(transaction::Column::Status.eq(TransactionStatus::Completed.as_str()))
        .all(db)
        .await?;
    let total_revenue: f64 = donations.iter().map(|t| t.amount).sum();
    let donation_count = donations.len() as u64;
    let average_gift_size = rates::average_gift_size(total_revenue, donation_count);

    let campaigns = Campaign::find()
        .all(db)
        .await?
        .into_iter()
        .map(|campaign| CampaignPerformance {
            campaign_id: campaign.id,
            progress_percentage: rollup::campaign_progress(&campaign),
            name: campaign.name,
            goal_amount: campaign.goal_amount,
            total_raised: campaign.total_raised,
            donor_count: campaign.donor_count,
        })
        .collect();

    Ok(DashboardReport {
        total_donors,
        total_revenue,
        donation_count,
        average_gift_size,
        segment_distribution,
        campaigns,
    })
}
