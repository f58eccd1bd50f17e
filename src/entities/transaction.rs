//! Transaction entity - Represents all financial transactions in the system.
//!
//! Each transaction has an owning contact, an optional campaign attribution,
//! an amount, a kind (`"donation"`, `"event_ticket"`, ...), and a status from
//! the payment lifecycle. Only `"donation"`-kind, `"completed"`-status rows
//! count toward a contact's giving aggregates.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Transaction database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    /// Unique identifier for the transaction
    #[sea_orm(primary_key)]
    pub id: i64,
    /// ID of the contact this transaction belongs to
    pub contact_id: i64,
    /// ID of the campaign this transaction is attributed to, if any
    pub campaign_id: Option<i64>,
    /// Kind of transaction: `"donation"`, `"event_ticket"`, `"membership"`, ...
    pub kind: String,
    /// Transaction amount in dollars, non-negative
    pub amount: f64,
    /// Lifecycle status: `"pending"`, `"processing"`, `"completed"`, `"failed"`,
    /// `"cancelled"`, `"refunded"`, or `"disputed"`
    pub status: String,
    /// How the payment was made: `"credit_card"`, `"check"`, `"cash"`, ...
    pub payment_method: String,
    /// Human-readable description of the transaction
    pub description: String,
    /// When the transaction took place
    pub transaction_date: DateTimeUtc,
    /// When the payment finished processing, if it has
    pub processed_date: Option<DateTimeUtc>,
}

/// Defines relationships between Transaction and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each transaction belongs to one contact
    #[sea_orm(
        belongs_to = "super::contact::Entity",
        from = "Column::ContactId",
        to = "super::contact::Column::Id"
    )]
    Contact,
    /// Each transaction may be attributed to one campaign
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
