//! Access gate for brand/IP-kit creation.
//!
//! The gate looks at exactly two facts: how many brands the principal is
//! associated with, and whether it holds the brand-admin role. The role is
//! an override on top of the association check: brand admins may have no
//! brands yet and still need to reach the creation flow.

use serde::Serialize;

use brandkit_core::BrandId;

use crate::Role;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessDecision {
    Allow,
    Deny,
}

impl AccessDecision {
    pub fn is_allowed(self) -> bool {
        matches!(self, AccessDecision::Allow)
    }
}

/// Decide access from the two gate inputs.
///
/// - No IO
/// - No panics
/// - Total over its inputs
pub fn decide(brand_association_count: usize, has_brand_admin_role: bool) -> AccessDecision {
    if brand_association_count == 0 && !has_brand_admin_role {
        AccessDecision::Deny
    } else {
        AccessDecision::Allow
    }
}

/// Derive the gate inputs from a brand list and resolved roles.
pub fn decide_for(brands: &[BrandId], roles: &[Role]) -> AccessDecision {
    decide(brands.len(), roles.contains(&Role::BrandAdmin))
}

/// Why the gate decided the way it did (for logs and debugging).
#[derive(Debug, Clone, Serialize)]
pub struct GateExplanation {
    pub decision: AccessDecision,
    pub brand_count: usize,
    pub has_brand_admin_role: bool,
    pub reason: &'static str,
}

pub fn explain(brands: &[BrandId], roles: &[Role]) -> GateExplanation {
    let brand_count = brands.len();
    let has_brand_admin_role = roles.contains(&Role::BrandAdmin);
    let decision = decide(brand_count, has_brand_admin_role);

    let reason = match (brand_count > 0, has_brand_admin_role) {
        (true, true) => "principal has brand associations and the brand_admin role",
        (true, false) => "principal has at least one brand association",
        (false, true) => "brand_admin role overrides missing brand associations",
        (false, false) => "principal has no brand associations and no brand_admin role",
    };

    GateExplanation {
        decision,
        brand_count,
        has_brand_admin_role,
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn decision_table() {
        assert_eq!(decide(0, false), AccessDecision::Deny);
        assert_eq!(decide(0, true), AccessDecision::Allow);
        assert_eq!(decide(1, false), AccessDecision::Allow);
        assert_eq!(decide(3, true), AccessDecision::Allow);
    }

    #[test]
    fn other_roles_do_not_open_the_gate() {
        let roles = vec![
            Role::PlatformAdmin,
            Role::Reviewer,
            Role::CampaignManager,
            Role::Other("brand_admin_pending".into()),
        ];
        assert_eq!(decide_for(&[], &roles), AccessDecision::Deny);
    }

    #[test]
    fn brand_admin_role_overrides_empty_brands() {
        assert_eq!(decide_for(&[], &[Role::BrandAdmin]), AccessDecision::Allow);
    }

    #[test]
    fn explanation_matches_decision() {
        let brand: BrandId = "b1".parse().unwrap();
        let denied = explain(&[], &[]);
        assert_eq!(denied.decision, AccessDecision::Deny);
        assert_eq!(denied.brand_count, 0);

        let allowed = explain(&[brand], &[]);
        assert!(allowed.decision.is_allowed());
        assert_eq!(allowed.brand_count, 1);
        assert!(!allowed.has_brand_admin_role);
    }

    proptest! {
        #[test]
        fn deny_iff_no_brands_and_not_admin(count in 0usize..64, admin in any::<bool>()) {
            let decision = decide(count, admin);
            prop_assert_eq!(decision == AccessDecision::Deny, count == 0 && !admin);
        }
    }
}
