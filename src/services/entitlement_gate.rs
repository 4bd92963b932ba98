use crate::config::KeyPolicy;
use crate::error::AppResult;
use crate::identity::{IdentityResolver, IdentityToken};
use crate::models::{BillingPeriod, EntitlementKey, EntitlementRecord, GateKind};
use crate::store::DocumentStore;
use crate::utils::normalize_phone_key;
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// The one place that turns (identity, phone) into a gate key. Every gate
/// goes through here.
pub fn derive_entitlement_key(
    identity: &IdentityToken,
    phone: Option<&str>,
    policy: KeyPolicy,
) -> EntitlementKey {
    match policy {
        KeyPolicy::IdentityOnly => EntitlementKey::uid(identity.as_str()),
        KeyPolicy::PhonePreferred => match phone.and_then(normalize_phone_key) {
            Some(normalized) => EntitlementKey::phone(&normalized),
            None => EntitlementKey::uid(identity.as_str()),
        },
    }
}

struct Claim {
    identity: IdentityToken,
    key: EntitlementKey,
    period: Option<BillingPeriod>,
    document_key: String,
}

/// Check-and-record limit on free slots. `kind` picks the policy and the
/// record collection; two gates never see each other's records. The once-ever
/// gate is keyed by identity alone, whatever `policy` says; only the monthly
/// gate honors the phone key.
#[derive(Clone)]
pub struct EntitlementGate {
    store: Arc<dyn DocumentStore>,
    kind: GateKind,
    policy: KeyPolicy,
}

impl EntitlementGate {
    pub fn new(store: Arc<dyn DocumentStore>, kind: GateKind, policy: KeyPolicy) -> Self {
        Self {
            store,
            kind,
            policy,
        }
    }

    pub fn kind(&self) -> GateKind {
        self.kind
    }

    pub fn key_policy(&self) -> KeyPolicy {
        match self.kind {
            GateKind::OnceEver => KeyPolicy::IdentityOnly,
            GateKind::Monthly => self.policy,
        }
    }

    pub fn period_for(&self, now: DateTime<Utc>) -> Option<BillingPeriod> {
        match self.kind {
            GateKind::OnceEver => None,
            GateKind::Monthly => Some(BillingPeriod::containing(now)),
        }
    }

    async fn resolve(
        &self,
        identity: &dyn IdentityResolver,
        phone: Option<&str>,
        now: DateTime<Utc>,
    ) -> AppResult<Claim> {
        let identity = identity.ensure_identity().await.inspect_err(|e| {
            log::error!("Gate {} could not resolve identity: {}", self.kind, e);
        })?;
        let key = derive_entitlement_key(&identity, phone, self.key_policy());
        let period = self.period_for(now);
        let document_key = key.document_key(period);
        Ok(Claim {
            identity,
            key,
            period,
            document_key,
        })
    }

    fn record(&self, claim: &Claim, now: DateTime<Utc>) -> EntitlementRecord {
        EntitlementRecord {
            gate: self.kind,
            document_key: claim.document_key.clone(),
            uid: claim.identity.as_str().to_string(),
            key: claim.key.as_str().to_string(),
            month: claim.period.map(|p| p.to_string()),
            used_at: now,
        }
    }

    pub async fn can_claim(
        &self,
        identity: &dyn IdentityResolver,
        phone: Option<&str>,
    ) -> AppResult<bool> {
        self.can_claim_at(identity, phone, Utc::now()).await
    }

    /// True iff no record exists for the derived key. Any failure is an
    /// error, never a "yes".
    pub async fn can_claim_at(
        &self,
        identity: &dyn IdentityResolver,
        phone: Option<&str>,
        now: DateTime<Utc>,
    ) -> AppResult<bool> {
        let claim = self.resolve(identity, phone, now).await?;
        let used = self
            .store
            .entitlement_exists(self.kind, &claim.document_key)
            .await?;
        if used {
            log::info!("Gate {} denied {}", self.kind, claim.document_key);
        }
        Ok(!used)
    }

    pub async fn mark_claimed(
        &self,
        identity: &dyn IdentityResolver,
        phone: Option<&str>,
    ) -> AppResult<()> {
        self.mark_claimed_at(identity, phone, Utc::now()).await
    }

    /// Idempotent upsert on the derived key. Call only after the gated
    /// action succeeded.
    pub async fn mark_claimed_at(
        &self,
        identity: &dyn IdentityResolver,
        phone: Option<&str>,
        now: DateTime<Utc>,
    ) -> AppResult<()> {
        let claim = self.resolve(identity, phone, now).await?;
        self.store
            .upsert_entitlement(&self.record(&claim, now))
            .await
    }

    pub async fn claim_if_absent(
        &self,
        identity: &dyn IdentityResolver,
        phone: Option<&str>,
    ) -> AppResult<bool> {
        self.claim_if_absent_at(identity, phone, Utc::now()).await
    }

    /// Atomic create-if-absent on the derived key. Exactly one concurrent
    /// caller gets true.
    pub async fn claim_if_absent_at(
        &self,
        identity: &dyn IdentityResolver,
        phone: Option<&str>,
        now: DateTime<Utc>,
    ) -> AppResult<bool> {
        let claim = self.resolve(identity, phone, now).await?;
        let won = self
            .store
            .create_entitlement_if_absent(&self.record(&claim, now))
            .await?;
        if !won {
            log::info!("Gate {} lost claim race on {}", self.kind, claim.document_key);
        }
        Ok(won)
    }
}
