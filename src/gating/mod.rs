//! Plan-based feature gating
//!
//! A pure mapping from (plan tier, plan status, manual verification) to
//! what a place page may show. No I/O, no clock, no randomness: expiry is
//! the subscription system's job and is already reflected in the stored
//! plan by the time a page renders.

mod tiers;

use serde::Serialize;

use crate::models::{Locale, Place};

pub use tiers::{Capability, PlanTier, TierDelta, TIER_TABLE};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanBadge {
    pub label: String,
    pub color: String,
}

/// What a page may display for a place
///
/// Contact flags describe permission only. Whether the place actually has
/// a phone number is a separate question answered by the place itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanCapability {
    pub tier: PlanTier,
    pub can_show_phone: bool,
    pub can_show_email: bool,
    pub can_show_website: bool,
    pub has_verified_badge: bool,
    pub has_featured_styling: bool,
    pub has_enhanced_styling: bool,
    pub plan_badge: Option<PlanBadge>,
}

impl PlanCapability {
    /// Capabilities for a tier, optionally with manual verification
    pub fn for_tier(tier: PlanTier, manually_verified: bool) -> Self {
        Self {
            tier,
            can_show_phone: tier.grants_capability(Capability::ShowPhone),
            can_show_email: tier.grants_capability(Capability::ShowEmail),
            can_show_website: tier.grants_capability(Capability::ShowWebsite),
            // Two independent unlock paths
            has_verified_badge: tier.grants_capability(Capability::VerifiedBadge)
                || manually_verified,
            has_featured_styling: tier.grants_capability(Capability::FeaturedStyling),
            has_enhanced_styling: tier.grants_capability(Capability::EnhancedStyling),
            plan_badge: tier.badge().map(|(label, color)| PlanBadge {
                label: label.to_string(),
                color: color.to_string(),
            }),
        }
    }

    /// Flags as a set, for superset comparisons
    pub fn granted(&self) -> Vec<Capability> {
        [
            (Capability::ShowPhone, self.can_show_phone),
            (Capability::ShowEmail, self.can_show_email),
            (Capability::ShowWebsite, self.can_show_website),
            (Capability::FeaturedStyling, self.has_featured_styling),
            (Capability::EnhancedStyling, self.has_enhanced_styling),
            (Capability::VerifiedBadge, self.has_verified_badge),
        ]
        .into_iter()
        .filter_map(|(capability, on)| on.then_some(capability))
        .collect()
    }
}

/// Call to action shown to owners below the top tier
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpgradePrompt {
    pub message: String,
    pub link: String,
    pub target_tier: PlanTier,
}

/// Stateless gate; cheap to copy into any request task
#[derive(Debug, Clone, Copy, Default)]
pub struct FeatureGate;

impl FeatureGate {
    pub fn new() -> Self {
        Self
    }

    pub fn compute_capabilities(&self, place: &Place) -> PlanCapability {
        let tier = PlanTier::from_plan(place.plan.as_ref());
        PlanCapability::for_tier(tier, place.is_verified)
    }

    /// Upgrade prompt, or `None` when the place is already on the top tier.
    ///
    /// The message depends only on the tier gap, never on other place
    /// attributes; the link carries the place slug so checkout knows which
    /// listing to upgrade.
    pub fn compute_upgrade_prompt(&self, place: &Place, locale: Locale) -> Option<UpgradePrompt> {
        let current = PlanTier::from_plan(place.plan.as_ref());
        if current.is_top() {
            return None;
        }

        let target = PlanTier::top();
        let gap = current.gap_to(target);

        Some(UpgradePrompt {
            message: upgrade_message(&gap, target, locale),
            link: format!(
                "/{}/pricing?plan={}&place={}",
                locale,
                target.as_str(),
                place.slug
            ),
            target_tier: target,
        })
    }
}

fn upgrade_message(gap: &[Capability], target: PlanTier, locale: Locale) -> String {
    let benefits: Vec<&str> = gap.iter().map(|c| benefit_label(*c, locale)).collect();
    let (lead, and) = match locale {
        Locale::En => (format!("Upgrade to {} to unlock", target.display_name()), "and"),
        Locale::Nl => (format!("Upgrade naar {} voor", target.display_name()), "en"),
        Locale::De => (format!("Wechseln Sie zu {} für", target.display_name()), "und"),
        Locale::Fr => (format!("Passez à {} pour débloquer", target.display_name()), "et"),
    };
    format!("{} {}.", lead, join_benefits(&benefits, and))
}

fn join_benefits(items: &[&str], and: &str) -> String {
    match items {
        [] => String::new(),
        [only] => only.to_string(),
        [head @ .., last] => format!("{} {} {}", head.join(", "), and, last),
    }
}

fn benefit_label(capability: Capability, locale: Locale) -> &'static str {
    match (locale, capability) {
        (Locale::En, Capability::ShowPhone) => "your phone number",
        (Locale::En, Capability::ShowEmail) => "your email address",
        (Locale::En, Capability::ShowWebsite) => "your website link",
        (Locale::En, Capability::FeaturedStyling) => "featured placement",
        (Locale::En, Capability::EnhancedStyling) => "enhanced page styling",
        (Locale::En, Capability::VerifiedBadge) => "a verified badge",

        (Locale::Nl, Capability::ShowPhone) => "uw telefoonnummer",
        (Locale::Nl, Capability::ShowEmail) => "uw e-mailadres",
        (Locale::Nl, Capability::ShowWebsite) => "een link naar uw website",
        (Locale::Nl, Capability::FeaturedStyling) => "een uitgelichte plaatsing",
        (Locale::Nl, Capability::EnhancedStyling) => "een verbeterde paginastijl",
        (Locale::Nl, Capability::VerifiedBadge) => "een geverifieerd-badge",

        (Locale::De, Capability::ShowPhone) => "Ihre Telefonnummer",
        (Locale::De, Capability::ShowEmail) => "Ihre E-Mail-Adresse",
        (Locale::De, Capability::ShowWebsite) => "einen Link zu Ihrer Website",
        (Locale::De, Capability::FeaturedStyling) => "eine hervorgehobene Platzierung",
        (Locale::De, Capability::EnhancedStyling) => "ein erweitertes Seitendesign",
        (Locale::De, Capability::VerifiedBadge) => "ein Verifiziert-Abzeichen",

        (Locale::Fr, Capability::ShowPhone) => "votre numéro de téléphone",
        (Locale::Fr, Capability::ShowEmail) => "votre adresse e-mail",
        (Locale::Fr, Capability::ShowWebsite) => "un lien vers votre site web",
        (Locale::Fr, Capability::FeaturedStyling) => "une mise en avant",
        (Locale::Fr, Capability::EnhancedStyling) => "une présentation enrichie",
        (Locale::Fr, Capability::VerifiedBadge) => "un badge vérifié",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::place::fixtures::happy_paws;
    use crate::models::PlanRef;

    #[test]
    fn premium_shows_phone_and_verified_badge() {
        let place = happy_paws();
        let caps = FeatureGate.compute_capabilities(&place);
        assert!(caps.can_show_phone);
        assert!(caps.has_verified_badge);
        assert!(caps.has_enhanced_styling);
        assert_eq!(caps.plan_badge.unwrap().label, "Premium");
        assert!(FeatureGate
            .compute_upgrade_prompt(&place, Locale::En)
            .is_none());
    }

    #[test]
    fn free_hides_contact_even_when_phone_is_present() {
        let mut place = happy_paws();
        place.plan = Some(PlanRef::active("free"));
        let caps = FeatureGate.compute_capabilities(&place);
        assert!(place.phone.is_some());
        assert!(!caps.can_show_phone);
        assert!(!caps.can_show_email);
        assert!(!caps.has_verified_badge);
        assert_eq!(caps.plan_badge, None);
    }

    #[test]
    fn featured_allows_contact_even_when_fields_are_empty() {
        let mut place = happy_paws();
        place.plan = Some(PlanRef::active("featured"));
        place.phone = None;
        place.email = None;
        let caps = FeatureGate.compute_capabilities(&place);
        assert!(caps.can_show_phone);
        assert!(caps.can_show_email);
        assert!(!caps.has_verified_badge);
    }

    #[test]
    fn manual_verification_grants_badge_below_top_tier() {
        let mut place = happy_paws();
        place.plan = None;
        place.is_verified = true;
        let caps = FeatureGate.compute_capabilities(&place);
        assert!(caps.has_verified_badge);
        assert!(!caps.can_show_phone);
    }

    #[test]
    fn upgrade_prompt_depends_only_on_tier_gap() {
        let mut a = happy_paws();
        a.plan = Some(PlanRef::active("featured"));
        let mut b = a.clone();
        b.name = "Another Name".into();
        b.is_verified = true;
        b.phone = None;

        let pa = FeatureGate.compute_upgrade_prompt(&a, Locale::En).unwrap();
        let pb = FeatureGate.compute_upgrade_prompt(&b, Locale::En).unwrap();
        assert_eq!(pa.message, pb.message);
        assert_eq!(
            pa.message,
            "Upgrade to Premium to unlock enhanced page styling and a verified badge."
        );
        assert_eq!(pa.target_tier, PlanTier::Premium);
        assert_eq!(pa.link, "/en/pricing?plan=premium&place=happy-paws-vet");
    }

    #[test]
    fn upgrade_prompt_is_localized() {
        let mut place = happy_paws();
        place.plan = None;
        let prompt = FeatureGate
            .compute_upgrade_prompt(&place, Locale::Nl)
            .unwrap();
        assert!(prompt.message.starts_with("Upgrade naar Premium voor uw telefoonnummer"));
        assert!(prompt.message.ends_with(" en een geverifieerd-badge."));
        assert!(prompt.link.starts_with("/nl/pricing"));
    }

    #[test]
    fn join_benefits_handles_short_lists() {
        assert_eq!(join_benefits(&[], "and"), "");
        assert_eq!(join_benefits(&["a"], "and"), "a");
        assert_eq!(join_benefits(&["a", "b", "c"], "and"), "a, b and c");
    }
}
