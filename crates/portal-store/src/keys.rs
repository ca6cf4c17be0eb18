//! Storage key builders for identity slot entries.
//!
//! Each slot persists exactly four keys, named after the slot:
//! `{slot}_user`, `{slot}_auth_token`, `{slot}_role`, `{slot}_is_auth`.

use portal_entity::SlotName;

/// Key holding the JSON-encoded user record.
pub fn user(slot: SlotName) -> String {
    format!("{}_user", slot.as_str())
}

/// Key holding the bearer credential.
pub fn auth_token(slot: SlotName) -> String {
    format!("{}_auth_token", slot.as_str())
}

/// Key holding the role string.
pub fn role(slot: SlotName) -> String {
    format!("{}_role", slot.as_str())
}

/// Key holding `"true"` while the slot is signed in.
pub fn is_auth(slot: SlotName) -> String {
    format!("{}_is_auth", slot.as_str())
}

/// All four keys of a slot, in the order above.
pub fn slot_keys(slot: SlotName) -> [String; 4] {
    [user(slot), auth_token(slot), role(slot), is_auth(slot)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_keys() {
        assert_eq!(
            slot_keys(SlotName::Client),
            [
                "client_user".to_string(),
                "client_auth_token".to_string(),
                "client_role".to_string(),
                "client_is_auth".to_string(),
            ]
        );
        assert_eq!(auth_token(SlotName::Admin), "admin_auth_token");
    }
}
