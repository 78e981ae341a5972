//! Plan tier hierarchy and capability-delta table
//!
//! Tiers are totally ordered and every tier inherits everything granted
//! below it. Each row of [`TIER_TABLE`] lists only what that tier *adds*;
//! the effective grant set is the union of rows up to the tier's rank.
//! Adding a tier means adding an enum variant and a row, nothing else.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::models::PlanRef;

/// Subscription tiers, lowest first
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum PlanTier {
    #[default]
    Free,
    Featured,
    Premium,
}

/// A single thing a plan may unlock on a page
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    ShowPhone,
    ShowEmail,
    ShowWebsite,
    FeaturedStyling,
    EnhancedStyling,
    VerifiedBadge,
}

/// What one tier adds on top of the tier below it
#[derive(Debug)]
pub struct TierDelta {
    pub tier: PlanTier,
    pub grants: &'static [Capability],
    /// (label, color); a higher tier's badge replaces a lower one's
    pub badge: Option<(&'static str, &'static str)>,
}

/// Indexed by tier rank
pub static TIER_TABLE: [TierDelta; 3] = [
    TierDelta {
        tier: PlanTier::Free,
        grants: &[],
        badge: None,
    },
    TierDelta {
        tier: PlanTier::Featured,
        grants: &[
            Capability::ShowPhone,
            Capability::ShowEmail,
            Capability::ShowWebsite,
            Capability::FeaturedStyling,
        ],
        badge: Some(("Featured", "#f59e0b")),
    },
    TierDelta {
        tier: PlanTier::Premium,
        grants: &[Capability::EnhancedStyling, Capability::VerifiedBadge],
        badge: Some(("Premium", "#7c3aed")),
    },
];

/// Plan statuses under which the stored tier is honoured
const ACTIVE_STATUSES: &[&str] = &["active", "trialing"];

impl PlanTier {
    pub const ORDERED: [PlanTier; 3] = [PlanTier::Free, PlanTier::Featured, PlanTier::Premium];

    pub fn rank(self) -> usize {
        self as usize
    }

    pub fn top() -> PlanTier {
        PlanTier::ORDERED[PlanTier::ORDERED.len() - 1]
    }

    pub fn is_top(self) -> bool {
        self == PlanTier::top()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PlanTier::Free => "free",
            PlanTier::Featured => "featured",
            PlanTier::Premium => "premium",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            PlanTier::Free => "Free",
            PlanTier::Featured => "Featured",
            PlanTier::Premium => "Premium",
        }
    }

    /// Parse a stored tier name. Case-insensitive, tolerates aliases.
    pub fn parse(raw: &str) -> Option<PlanTier> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "free" | "basic" => Some(PlanTier::Free),
            "featured" => Some(PlanTier::Featured),
            "premium" | "pro" => Some(PlanTier::Premium),
            _ => None,
        }
    }

    /// Effective tier for a stored plan reference.
    ///
    /// No plan, an inactive status, or an unrecognised tier all mean
    /// `Free`: showing fewer fields than paid for is recoverable, leaking
    /// a private one is not.
    pub fn from_plan(plan: Option<&PlanRef>) -> PlanTier {
        let Some(plan) = plan else {
            return PlanTier::Free;
        };

        if let Some(status) = plan.status.as_deref() {
            let status = status.trim().to_ascii_lowercase();
            if !ACTIVE_STATUSES.contains(&status.as_str()) {
                return PlanTier::Free;
            }
        }

        PlanTier::parse(&plan.tier).unwrap_or_else(|| {
            warn!(tier = %plan.tier, "Unrecognised plan tier, degrading to free");
            PlanTier::Free
        })
    }

    fn deltas(self) -> &'static [TierDelta] {
        &TIER_TABLE[..=self.rank()]
    }

    /// Everything this tier grants, inherited grants included
    pub fn grants(self) -> BTreeSet<Capability> {
        self.deltas()
            .iter()
            .flat_map(|delta| delta.grants.iter().copied())
            .collect()
    }

    pub fn grants_capability(self, capability: Capability) -> bool {
        self.deltas()
            .iter()
            .any(|delta| delta.grants.contains(&capability))
    }

    /// Badge of the highest tier at or below this one that defines one
    pub fn badge(self) -> Option<(&'static str, &'static str)> {
        self.deltas().iter().rev().find_map(|delta| delta.badge)
    }

    /// Capabilities `target` grants that `self` does not, in stable order
    pub fn gap_to(self, target: PlanTier) -> Vec<Capability> {
        let have = self.grants();
        target
            .grants()
            .into_iter()
            .filter(|c| !have.contains(c))
            .collect()
    }
}
