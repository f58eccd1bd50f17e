//! Contact entity - Represents donors, prospects, volunteers, and board members.
//!
//! Each contact carries identity fields plus derived donor-analytics fields
//! (`total_lifetime_giving`, `donation_count`, `last_donation_date`, `rfm_score`,
//! `donor_segment`). The analytics fields are a cache recomputed from the
//! contact's completed donation transactions; they are never edited directly.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Contact database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "contacts")]
pub struct Model {
    /// Unique identifier for the contact
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Contact's first name
    pub first_name: String,
    /// Contact's last name
    pub last_name: String,
    /// Email address, if known
    pub email: Option<String>,
    /// Classification: `"prospect"`, `"donor"`, `"volunteer"`, `"board_member"`, ...
    pub contact_type: String,
    /// Sum of this contact's completed donation amounts (derived)
    pub total_lifetime_giving: f64,
    /// Number of completed donations (derived)
    pub donation_count: i32,
    /// Date of the most recent completed donation, None if never donated (derived)
    pub last_donation_date: Option<Date>,
    /// Three-digit RFM score such as `"522"`, empty until first computed (derived)
    pub rfm_score: String,
    /// Segment label such as `"champions"`, empty until first computed (derived)
    pub donor_segment: String,
}

/// Defines relationships between Contact and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One contact has many transactions
    #[sea_orm(has_many = "super::transaction::Entity")]
    Transactions,
    /// One contact has many pledges
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
