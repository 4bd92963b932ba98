use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// The two independent gate policies. Each has its own record collection, so
/// a claim in one never blocks the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum GateKind {
    /// one free slot per key, ever
    OnceEver,
    /// one free slot per key per calendar month
    Monthly,
}

impl GateKind {
    pub fn collection(&self) -> &'static str {
        match self {
            GateKind::OnceEver => "free_once_gate",
            GateKind::Monthly => "free_monthly_gate",
        }
    }
}

impl std::fmt::Display for GateKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.collection())
    }
}

/// Calendar month tag used by the monthly gate, rendered `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BillingPeriod {
    pub year: i32,
    pub month: u32,
}

impl BillingPeriod {
    pub fn containing(at: DateTime<Utc>) -> Self {
        Self {
            year: at.year(),
            month: at.month(),
        }
    }
}

impl std::fmt::Display for BillingPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{:02}", self.year, self.month)
    }
}

/// Composite identity used as the gate key: `phone:<normalized>` or
/// `uid:<identity>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntitlementKey(String);

impl EntitlementKey {
    pub fn phone(normalized: &str) -> Self {
        Self(format!("phone:{normalized}"))
    }

    pub fn uid(identity: &str) -> Self {
        Self(format!("uid:{identity}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Store document key for a gate: the key alone for the once-ever gate,
    /// `<key>|YYYY-MM` for the monthly gate.
    pub fn document_key(&self, period: Option<BillingPeriod>) -> String {
        match period {
            Some(p) => format!("{}|{p}", self.0),
            None => self.0.clone(),
        }
    }
}

impl std::fmt::Display for EntitlementKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// "This key has claimed its free slot." Immutable once written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitlementRecord {
    pub gate: GateKind,
    pub document_key: String,
    pub uid: String,
    pub key: String,
    pub month: Option<String>,
    pub used_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct EligibilityQuery {
    #[serde(default)]
    pub phone: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct EligibilityResponse {
    pub gate: GateKind,
    pub period: Option<String>,
    pub eligible: bool,
}
