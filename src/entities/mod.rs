//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod campaign;
pub mod contact;
pub mod pledge;
pub mod transaction;

// Re-export specific types to avoid conflicts
pub use campaign::{Column as CampaignColumn, Entity as Campaign, Model as CampaignModel};
pub use contact::{Column as ContactColumn, Entity as Contact, Model as ContactModel};
pub use pledge::{Column as PledgeColumn, Entity as Pledge, Model as PledgeModel};
pub use transaction::{
    Column as TransactionColumn, Entity as Transaction, Model as TransactionModel,
};
