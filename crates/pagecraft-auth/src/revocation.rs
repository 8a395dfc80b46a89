//! Per-user token revocation through the `last_token_issue` timestamp.
//!
//! JWT `iat` values have whole-second precision while the database stores
//! microseconds, so every instant here is truncated to the second:
//!
//! - a revocable token is issued at `trunc(max(now, last_token_issue))`, and
//!   login stores that instant as the new `last_token_issue`;
//! - revoking moves `last_token_issue` to one second past the newest instant
//!   any outstanding token could carry;
//! - a token is revoked when its `iat` is earlier than `last_token_issue`.
//!
//! Together these guarantee a token issued after a revocation verifies and a
//! token issued before it never does, even within the same wall-clock second.

use chrono::{DateTime, Duration, SubsecRound, Utc};

fn trunc_secs(instant: DateTime<Utc>) -> DateTime<Utc> {
    instant.trunc_subsecs(0)
}

/// Instant to stamp into a new refresh or reset token.
pub fn issue_instant(now: DateTime<Utc>, last_token_issue: DateTime<Utc>) -> DateTime<Utc> {
    trunc_secs(now.max(last_token_issue))
}

/// New `last_token_issue` value that revokes every token issued so far.
pub fn revocation_instant(now: DateTime<Utc>, last_token_issue: DateTime<Utc>) -> DateTime<Utc> {
    trunc_secs(now.max(last_token_issue)) + Duration::seconds(1)
}

pub fn is_revoked(issued_at: i64, last_token_issue: DateTime<Utc>) -> bool {
    issued_at < last_token_issue.timestamp()
}
