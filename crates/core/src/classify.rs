//! Date-driven notice tiers.

use chrono::NaiveDate;

/// Billing reminder letter from days elapsed past the due date. Future
/// due dates land in tier 1 along with anything up to six days late.
pub fn billing_notice(due: NaiveDate, today: NaiveDate) -> u8 {
    let elapsed = (today - due).num_days();
    if elapsed <= 6 {
        1
    } else if elapsed <= 14 {
        2
    } else if elapsed <= 19 {
        3
    } else if elapsed <= 24 {
        4
    } else if elapsed <= 30 {
        5
    } else {
        6
    }
}

/// Certificate notice from days remaining until expiry: 3 on the day,
/// 2 inside the final five days, 1 before that, 4 once expired.
pub fn certificate_notice(due: NaiveDate, today: NaiveDate) -> u8 {
    let remaining = (due - today).num_days();
    if remaining == 0 {
        3
    } else if remaining > 0 && remaining <= 5 {
        2
    } else if remaining > 5 {
        1
    } else if remaining < 0 {
        4
    } else {
        0
    }
}
