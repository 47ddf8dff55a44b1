use chrono::{DateTime, TimeDelta, Utc};
use std::fmt;

/// Bearer token pair returned by the tado OAuth endpoint, plus the bookkeeping
/// needed to tell when it stops being usable.
///
/// A credential is never updated in place: refreshing produces a new value
/// that replaces the old one.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    access_token: String,
    refresh_token: String,
    lifetime_seconds: i64,
    issued_at: DateTime<Utc>,
}

impl Credential {
    /// Creates a credential issued right now.
    pub fn new(
        access_token: impl Into<String>,
        refresh_token: impl Into<String>,
        lifetime_seconds: i64,
    ) -> Self {
        Self::issued_at(access_token, refresh_token, lifetime_seconds, Utc::now())
    }

    /// Creates a credential with an explicit issue time.
    pub fn issued_at(
        access_token: impl Into<String>,
        refresh_token: impl Into<String>,
        lifetime_seconds: i64,
        issued_at: DateTime<Utc>,
    ) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
            lifetime_seconds,
            issued_at,
        }
    }

    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    pub fn refresh_token(&self) -> &str {
        &self.refresh_token
    }

    pub fn lifetime_seconds(&self) -> i64 {
        self.lifetime_seconds
    }

    pub fn issue_time(&self) -> DateTime<Utc> {
        self.issued_at
    }

    /// `None` when the lifetime is too large to represent, i.e. it never expires.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        TimeDelta::try_seconds(self.lifetime_seconds)
            .and_then(|lifetime| self.issued_at.checked_add_signed(lifetime))
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at() {
            Some(expires_at) => expires_at < now,
            None => false,
        }
    }

    pub(crate) fn bearer_header(&self) -> String {
        format!("Bearer {}", self.access_token)
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("access_token", &"***")
            .field("refresh_token", &"***")
            .field("lifetime_seconds", &self.lifetime_seconds)
            .field("issued_at", &self.issued_at)
            .finish()
    }
}
