//! API-side access gating for protected pages.
//!
//! The decision itself lives in `brandkit_auth::authorize`; this module
//! feeds it from the request context and records why it decided.

use brandkit_auth::{AccessDecision, PermissionGrants, explain};

use crate::context::PrincipalContext;

/// Gate for the IP-kit creation flow.
pub fn ip_kit_creation_gate(principal: &PrincipalContext, grants: &PermissionGrants) -> AccessDecision {
    let explanation = explain(&grants.brands, &grants.roles);

    tracing::debug!(
        principal_id = %principal.principal_id(),
        decision = ?explanation.decision,
        brand_count = explanation.brand_count,
        has_brand_admin_role = explanation.has_brand_admin_role,
        reason = explanation.reason,
        "ip-kit creation gate"
    );

    explanation.decision
}

#[cfg(test)]
mod tests {
    use super::*;
    use brandkit_auth::{Principal, Role};

    fn ctx() -> PrincipalContext {
        PrincipalContext::new(Principal::new("p".parse().unwrap(), "p@example.com"), "tok".into())
    }

    #[test]
    fn gate_uses_brands_and_brand_admin_only() {
        let none = PermissionGrants::new(vec![Role::PlatformAdmin, Role::Reviewer], vec![]);
        assert_eq!(ip_kit_creation_gate(&ctx(), &none), AccessDecision::Deny);

        let admin = PermissionGrants::new(vec![Role::BrandAdmin], vec![]);
        assert_eq!(ip_kit_creation_gate(&ctx(), &admin), AccessDecision::Allow);

        let member = PermissionGrants::new(vec![], vec!["b".parse().unwrap()]);
        assert_eq!(ip_kit_creation_gate(&ctx(), &member), AccessDecision::Allow);
    }
}
