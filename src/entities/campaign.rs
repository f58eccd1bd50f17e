//! Campaign entity - Represents a fundraising campaign.
//!
//! `total_raised` and `donor_count` are derived rollups recomputed from the
//! campaign's completed donation transactions whenever one of them changes.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Campaign database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "campaigns")]
pub struct Model {
    /// Unique identifier for the campaign
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Campaign name
    pub name: String,
    /// Longer description of the campaign
    pub description: String,
    /// When the campaign opens
    pub start_date: Date,
    /// When the campaign closes, None for open-ended campaigns
    pub end_date: Option<Date>,
    /// Fundraising goal in dollars
    pub goal_amount: f64,
    /// Whether the campaign is accepting attributions
    pub is_active: bool,
    /// Sum of completed donation amounts attributed to this campaign (derived)
    pub total_raised: f64,
    /// Distinct contacts with at least one completed donation here (derived)
    pub donor_count: i32,
}

/// Defines relationships between Campaign and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One campaign has many attributed transactions
    #[sea_orm(has_many = "super::transaction::Entity")]
    Transactions,
    /// One campaign has many pledges
    #[sea_orm(has_many = "super::pledge::Entity")]
    Pledges,
}

impl Related<super::transaction::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactions.def()
    }
}

impl Related<super::pledge::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Pledges.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
