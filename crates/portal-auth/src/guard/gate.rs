//! Authentication gates wrapped around whole route groups.

use portal_core::config::AccessConfig;
use portal_entity::{IdentitySlot, SlotName};

use super::route::GuardOutcome;

/// Signed-in pages: send signed-out visitors to the slot's login page.
pub fn private_gate(
    slot: SlotName,
    identity: &IdentitySlot,
    config: &AccessConfig,
) -> GuardOutcome {
    if identity.authenticated {
        GuardOutcome::Render
    } else {
        GuardOutcome::replace(slot.scoped(&config.login_route))
    }
}

/// Login and registration pages: send signed-in visitors to the slot's dashboard.
pub fn public_gate(slot: SlotName, identity: &IdentitySlot, config: &AccessConfig) -> GuardOutcome {
    if identity.authenticated {
        GuardOutcome::replace(slot.scoped(&config.dashboard_route))
    } else {
        GuardOutcome::Render
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use portal_entity::{Role, UserRecord};

    #[test]
    fn test_gates_are_slot_scoped() {
        let config = AccessConfig::default();
        let signed_out = IdentitySlot::empty();
        let signed_in = IdentitySlot::signed_in(UserRecord::new("c-1", "Cy", Role::Client), "tok");

        assert_eq!(
            private_gate(SlotName::Client, &signed_out, &config),
            GuardOutcome::replace("/client/login")
        );
        assert_eq!(private_gate(SlotName::Client, &signed_in, &config), GuardOutcome::Render);
        assert_eq!(
            public_gate(SlotName::Admin, &signed_in, &config),
            GuardOutcome::replace("/dashboard")
        );
        assert_eq!(public_gate(SlotName::Admin, &signed_out, &config), GuardOutcome::Render);
    }
}
