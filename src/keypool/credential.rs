//! Credential Types
//!
//! Provider credentials with a three-state lifecycle: active, cooldown
//! (transient, deadline-based), and invalid (permanent).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Upstream search providers served by the gateway
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    /// Tavily search API
    Tavily,
    /// Brave search API
    Brave,
}

impl Provider {
    /// Stable lowercase name used in records and logs
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Tavily => "tavily",
            Provider::Brave => "brave",
        }
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Provider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tavily" => Ok(Provider::Tavily),
            "brave" => Ok(Provider::Brave),
            other => Err(format!("unknown provider: {other}")),
        }
    }
}

/// Lifecycle status of a credential
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CredentialStatus {
    /// Usable
    Active,
    /// Temporarily excluded until `cooldown_until`; reactivates implicitly
    Cooldown,
    /// Permanently excluded (provider rejected authentication)
    Invalid,
}

/// A provider credential as persisted by the store.
///
/// The secret is held encrypted (AES-256-GCM blob); plaintext only exists
/// transiently after selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credential {
    /// Unique identifier
    pub id: String,

    /// Which provider this credential authenticates against
    pub provider: Provider,

    /// Encrypted secret: `[nonce:12][ciphertext + tag]`
    pub encrypted_secret: Vec<u8>,

    /// Lifecycle status
    pub status: CredentialStatus,

    /// Cooldown deadline; meaningful only while `status == Cooldown`
    pub cooldown_until: Option<DateTime<Utc>>,

    /// Last selection timestamp; `None` until first use
    pub last_used_at: Option<DateTime<Utc>>,
}

impl Credential {
    /// Create a fresh active credential with a generated id.
    ///
    /// `encrypted_secret` must already be an AES-256-GCM blob; this is the
    /// admin provisioning path, plaintext never enters the store.
    pub fn new(provider: Provider, encrypted_secret: Vec<u8>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            provider,
            encrypted_secret,
            status: CredentialStatus::Active,
            cooldown_until: None,
            last_used_at: None,
        }
    }

    /// Whether this credential may be selected at `now`.
    ///
    /// Active credentials are always eligible. Cooldown credentials become
    /// eligible again once the deadline elapses — checked here at read time,
    /// no background sweeper. Invalid credentials never are.
    pub fn is_eligible(&self, now: DateTime<Utc>) -> bool {
        match self.status {
            CredentialStatus::Active => true,
            CredentialStatus::Cooldown => match self.cooldown_until {
                Some(deadline) => now >= deadline,
                // Cooldown with no deadline cannot self-expire; treat as held
                None => false,
            },
            CredentialStatus::Invalid => false,
        }
    }
}

/// Partial update applied through the store contract.
///
/// `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct CredentialUpdate {
    /// New lifecycle status
    pub status: Option<CredentialStatus>,

    /// New cooldown deadline
    pub cooldown_until: Option<DateTime<Utc>>,

    /// New last-used timestamp
    pub last_used_at: Option<DateTime<Utc>>,
}
