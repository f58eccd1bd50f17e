//! Shared test utilities for DonorTrack.
//!
//! Provides helpers for setting up in-memory test databases and seeding
//! contacts, campaigns, transactions, and pledges with sensible defaults.
//! Seeding inserts rows directly, bypassing the mutation service, so tests
//! can drive each recalculator explicitly.

use crate::{
    config,
    entities::{campaign, contact, pledge, transaction},
    errors::{Error, Result},
};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use sea_orm::{DatabaseConnection, Set, prelude::*};

/// Creates an in-memory SQLite database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    config::database::create_tables(&db).await?;
    Ok(db)
}

/// Sets up a test database with one contact.
/// Returns (db, contact) for common test scenarios.
pub async fn setup_with_contact() -> Result<(DatabaseConnection, contact::Model)> {
    let db = setup_test_db().await?;
    let contact = create_test_contact(&db, "Test", "Contact").await?;
    Ok((db, contact))
}

/// A timestamp the given number of days before now.
#[must_use]
pub fn timestamp_days_ago(days: i64) -> DateTime<Utc> {
    Utc::now() - Duration::days(days)
}

/// The calendar date the given number of days before today.
#[must_use]
pub fn date_days_ago(days: i64) -> NaiveDate {
    timestamp_days_ago(days).date_naive()
}

/// Creates a contact with empty analytics fields, as a new contact starts.
pub async fn create_test_contact(
    db: &DatabaseConnection,
    first_name: &str,
    last_name: &str,
) -> Result<contact::Model> {
    let model = contact::ActiveModel {
        first_name: Set(first_name.to_string()),
        last_name: Set(last_name.to_string()),
        email: Set(None),
        contact_type: Set("prospect".to_string()),
        total_lifetime_giving: Set(0.0),
        donation_count: Set(0),
        last_donation_date: Set(None),
        rfm_score: Set(String::new()),
        donor_segment: Set(String::new()),
        ..Default::default()
    };
    model.insert(db).await.map_err(Into::into)
}

/// Creates an active campaign that started 90 days ago with zeroed rollups.
pub async fn create_test_campaign(
    db: &DatabaseConnection,
    name: &str,
    goal_amount: f64,
) -> Result<campaign::Model> {
    let model = campaign::ActiveModel {
        name: Set(name.to_string()),
        description: Set(String::new()),
        start_date: Set(date_days_ago(90)),
        end_date: Set(None),
        goal_amount: Set(goal_amount),
        is_active: Set(true),
        total_raised: Set(0.0),
        donor_count: Set(0),
        ..Default::default()
    };
    model.insert(db).await.map_err(Into::into)
}

/// Inserts a transaction row directly with full control over its fields.
pub async fn insert_transaction(
    db: &DatabaseConnection,
    contact_id: i64,
    campaign_id: Option<i64>,
    kind: &str,
    amount: f64,
    days_ago: i64,
    status: &str,
) -> Result<transaction::Model> {
    let transaction_date = timestamp_days_ago(days_ago);
    let processed_date = (status == "completed").then_some(transaction_date);
    let model = transaction::ActiveModel {
        contact_id: Set(contact_id),
        campaign_id: Set(campaign_id),
        kind: Set(kind.to_string()),
        amount: Set(amount),
        status: Set(status.to_string()),
        payment_method: Set("credit_card".to_string()),
        description: Set("Test transaction".to_string()),
        transaction_date: Set(transaction_date),
        processed_date: Set(processed_date),
        ..Default::default()
    };
    model.insert(db).await.map_err(Into::into)
}

/// Inserts a completed donation (no campaign) dated `days_ago` days back.
pub async fn insert_donation(
    db: &DatabaseConnection,
    contact_id: i64,
    amount: f64,
    days_ago: i64,
) -> Result<transaction::Model> {
    insert_transaction(db, contact_id, None, "donation", amount, days_ago, "completed").await
}

/// Creates an active pledge made `pledge_days_ago` days back.
pub async fn create_test_pledge(
    db: &DatabaseConnection,
    contact_id: i64,
    campaign_id: Option<i64>,
    total_amount: f64,
    pledge_days_ago: i64,
    due_date: Option<NaiveDate>,
) -> Result<pledge::Model> {
    let model = pledge::ActiveModel {
        contact_id: Set(contact_id),
        campaign_id: Set(campaign_id),
        total_amount: Set(total_amount),
        amount_paid: Set(0.0),
        status: Set("active".to_string()),
        pledge_date: Set(date_days_ago(pledge_days_ago)),
        due_date: Set(due_date),
        fulfillment_date: Set(None),
        ..Default::default()
    };
    model.insert(db).await.map_err(Into::into)
}

/// Overwrites a transaction's status without notifying any trigger,
/// simulating drift the recalculators must absorb.
pub async fn set_status_directly(
    db: &DatabaseConnection,
    transaction_id: i64,
    status: &str,
) -> Result<transaction::Model> {
    let existing = crate::entities::Transaction::find_by_id(transaction_id)
        .one(db)
        .await?
        .ok_or(Error::TransactionNotFound { id: transaction_id })?;
    let mut model: transaction::ActiveModel = existing.into();
    model.status = Set(status.to_string());
    model.update(db).await.map_err(Into::into)
}

/// Overwrites a pledge's status without recomputing anything.
pub async fn set_pledge_status_directly(
    db: &DatabaseConnection,
    pledge_id: i64,
    status: &str,
) -> Result<pledge::Model> {
    let existing = crate::entities::Pledge::find_by_id(pledge_id)
        .one(db)
        .await?
        .ok_or(Error::PledgeNotFound { id: pledge_id })?;
    let mut model: pledge::ActiveModel = existing.into();
    model.status = Set(status.to_string());
    model.update(db).await.map_err(Into::into)
}

/// A campaign model for pure-function tests, no database involved.
#[must_use]
pub fn campaign_fixture(goal_amount: f64, total_raised: f64) -> campaign::Model {
    campaign::Model {
        id: 1,
        name: "Fixture Campaign".to_string(),
        description: String::new(),
        start_date: date_days_ago(90),
        end_date: None,
        goal_amount,
        is_active: true,
        total_raised,
        donor_count: 0,
    }
}

/// A pledge model for pure-function tests, no database involved.
#[must_use]
pub fn pledge_fixture(total_amount: f64, amount_paid: f64) -> pledge::Model {
    pledge::Model {
        id: 1,
        contact_id: 1,
        campaign_id: None,
        total_amount,
        amount_paid,
        status: "active".to_string(),
        pledge_date: date_days_ago(30),
        due_date: None,
        fulfillment_date: None,
    }
}
