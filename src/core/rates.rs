//! Rate calculations shared by rollups, reports, and dashboards.
//!
//! Every rate here returns 0.0 when its denominator is zero instead of
//! raising; dashboards render these values directly.

/// Rounds to one decimal place, the precision dashboards display.
#[must_use]
pub fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[allow(clippy::cast_precision_loss)]
fn percentage(numerator: u64, denominator: u64) -> f64 {
    if denominator == 0 {
        return 0.0;
    }
    round_to_tenth((numerator as f64 / denominator as f64) * 100.0)
}

/// Email open rate: opens over deliveries.
#[must_use]
pub fn open_rate(opened: u64, delivered: u64) -> f64 {
    percentage(opened, delivered)
}

/// Email click-through rate: clicks over deliveries.
#[must_use]
pub fn click_rate(clicked: u64, delivered: u64) -> f64 {
    percentage(clicked, delivered)
}

/// Email bounce rate: bounces over sends.
#[must_use]
pub fn bounce_rate(bounced: u64, sent: u64) -> f64 {
    percentage(bounced, sent)
}

/// Event attendance rate: check-ins over registrations.
#[must_use]
pub fn attendance_rate(attended: u64, registered: u64) -> f64 {
    percentage(attended, registered)
}

/// Event return on investment as a percentage of expenses.
#[must_use]
pub fn roi_percentage(revenue: f64, expenses: f64) -> f64 {
    if expenses == 0.0 {
        return 0.0;
    }
    round_to_tenth(((revenue - expenses) / expenses) * 100.0)
}

/// Campaign progress toward its goal, capped at 100.
#[must_use]
pub fn progress_percentage(total_raised: f64, goal_amount: f64) -> f64 {
    if goal_amount == 0.0 {
        return 0.0;
    }
    round_to_tenth((total_raised / goal_amount) * 100.0).min(100.0)
}

/// Mean gift size over a set of donations.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn average_gift_size(total: f64, donation_count: u64) -> f64 {
    if donation_count == 0 {
        return 0.0;
    }
    total / donation_count as f64
}
