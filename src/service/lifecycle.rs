// service/lifecycle.rs
//! Subscription lifecycle evaluation.
//!
//! Everything here is pure: callers pass `now` explicitly and persist whatever
//! they decide to act on. Two rules apply uniformly:
//!
//! * a subscription whose last day is today counts as expired, both for access
//!   gating and for notifications (there is no "0 days left" warning);
//! * a subscription without an end date is never expired and never notified.

use chrono::{DateTime, Utc};

use crate::{
    models::{
        notificationmodels::{NotificationIntent, NotificationKind},
        subscriptionmodels::{ExpiryMarker, Subscription, SubscriptionStatus},
    },
    utils::dates::{days_remaining, is_expired},
};

/// Day counts at which an "expiring soon" warning goes out.
pub const EXPIRY_WARNING_THRESHOLDS: [u32; 3] = [3, 2, 1];

/// Largest warning threshold, used to bound store queries.
pub const EXPIRY_WARNING_HORIZON_DAYS: u32 = 3;

/// Expiry position of a subscription at `now`, or `None` without an end date.
fn expiry_position(sub: &Subscription, now: DateTime<Utc>) -> Option<(u32, bool)> {
    let end = sub.end_date?;
    let days = days_remaining(end, now);
    Some((days, is_expired(end, now) || days == 0))
}

/// Access-control status computed from dates, ignoring a stale stored flag.
pub fn effective_status(sub: &Subscription, now: DateTime<Utc>) -> SubscriptionStatus {
    if let Some((_, true)) = expiry_position(sub, now) {
        return SubscriptionStatus::Expired;
    }

    if now < sub.start_date {
        return SubscriptionStatus::Pending;
    }

    sub.status
}

/// Decides whether `sub` has crossed a threshold it was not yet notified about.
///
/// Returns the same answer for the same `(sub, now)` until the caller stores
/// [`NotificationIntent::marker`] into `last_expiry_notification`.
pub fn should_notify(sub: &Subscription, now: DateTime<Utc>) -> Option<NotificationIntent> {
    if sub.status != SubscriptionStatus::Active {
        return None;
    }

    let (days, expired) = expiry_position(sub, now)?;

    let intent = |kind, days_remaining| NotificationIntent {
        subscription_id: sub.id,
        user_id: sub.user_id,
        kind,
        days_remaining,
    };

    if expired {
        return match sub.last_expiry_notification {
            Some(ExpiryMarker::Expired) => None,
            _ => Some(intent(NotificationKind::Expired, 0)),
        };
    }

    if EXPIRY_WARNING_THRESHOLDS.contains(&days)
        && sub.last_expiry_notification != Some(ExpiryMarker::DaysRemaining(days))
    {
        return Some(intent(NotificationKind::ExpiringSoon, days));
    }

    None
}

/// Runs [`should_notify`] over a batch; records are independent of each other.
pub fn evaluate_batch<'a, I>(subs: I, now: DateTime<Utc>) -> Vec<NotificationIntent>
where
    I: IntoIterator<Item = &'a Subscription>,
{
    subs.into_iter()
        .filter_map(|sub| should_notify(sub, now))
        .collect()
}
