//! Pledge entity - A commitment by a contact to give a total amount,
//! usually toward a campaign, paid off through one or more transactions.
//!
//! `amount_paid` is a derived rollup over the contact's completed transactions
//! for the pledged campaign dated on or after the pledge date. `status` is
//! derived from `amount_paid` against `total_amount` and from `due_date`
//! against the current date; `fulfilled` is a one-way ratchet.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Pledge database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "pledges")]
pub struct Model {
    /// Unique identifier for the pledge
    #[sea_orm(primary_key)]
    pub id: i64,
    /// ID of the contact who made the pledge
    pub contact_id: i64,
    /// ID of the campaign pledged to, if any
    pub campaign_id: Option<i64>,
    /// Total committed amount in dollars
    pub total_amount: f64,
    /// Sum of qualifying completed transactions so far (derived)
    pub amount_paid: f64,
    /// Lifecycle status: `"active"`, `"fulfilled"`, `"overdue"`, or `"cancelled"`
    pub status: String,
    /// When the pledge was made; only transactions on or after this date count
    pub pledge_date: Date,
    /// When the pledge is expected to be paid off, if a deadline exists
    pub due_date: Option<Date>,
    /// When the pledge was first fulfilled, if it has been
    pub fulfillment_date: Option<Date>,
}

/// Defines relationships between Pledge and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each pledge belongs to one contact
    #[sea_orm(
        belongs_to = "super::contact::Entity",
        from = "Column::ContactId",
        to = "super::contact::Column::Id"
    )]
    Contact,
    /// Each pledge may target one campaign
    #[sea_orm(
        belongs_to = "super::campaign::Entity",
        from = "Column::CampaignId",
        to = "super::campaign::Column::Id"
    )]
    Campaign,
}

impl Related<super::contact::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Contact.def()
    }
}

impl Related<super::campaign::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Campaign.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
