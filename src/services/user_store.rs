use crate::models::{SubscriptionTier, User};
use crate::utils::error::AppError;
use std::collections::HashMap;
use std::sync::RwLock;

// In-memory user map, keyed by user_id. Explicitly a placeholder for a
// real database: discarded on every process restart, and the only
// invariant enforced is email uniqueness at insert time.
lazy_static::lazy_static! {
    static ref USERS: RwLock<HashMap<String, User>> = RwLock::new(HashMap::new());
}

pub fn insert(user: User) -> Result<(), AppError> {
    let mut users = USERS
        .write()
        .map_err(|_| AppError::StoreError("user store lock poisoned".to_string()))?;

    let email_lower = user.email.to_lowercase();
    if users.values().any(|u| u.email.to_lowercase() == email_lower) {
        return Err(AppError::Conflict(format!(
            "User with email {} already exists",
            user.email
        )));
    }

    users.insert(user.user_id.clone(), user);
    Ok(())
}

pub fn find_by_email(email: &str) -> Option<User> {
    let users = USERS.read().ok()?;
    let email_lower = email.to_lowercase();
    users
        .values()
        .find(|u| u.email.to_lowercase() == email_lower)
        .cloned()
}

pub fn find_by_id(user_id: &str) -> Option<User> {
    USERS.read().ok()?.get(user_id).cloned()
}

pub fn delete(user_id: &str) -> Result<(), AppError> {
    let mut users = USERS
        .write()
        .map_err(|_| AppError::StoreError("user store lock poisoned".to_string()))?;

    users
        .remove(user_id)
        .map(|_| ())
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", user_id)))
}

pub fn set_last_login(user_id: &str) {
    if let Ok(mut users) = USERS.write() {
        if let Some(user) = users.get_mut(user_id) {
            user.last_login = Some(chrono::Utc::now());
        }
    }
}

pub fn set_tier(user_id: &str, tier: SubscriptionTier) -> Result<(), AppError> {
    let mut users = USERS
        .write()
        .map_err(|_| AppError::StoreError("user store lock poisoned".to_string()))?;

    let user = users
        .get_mut(user_id)
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", user_id)))?;

    user.tier = tier;
    Ok(())
}

/// Bump the description counter. A miss is silently ignored so that
/// anonymous requests never fail the calling handler.
pub fn record_description(user_id: &str) {
    if let Ok(mut users) = USERS.write() {
        if let Some(user) = users.get_mut(user_id) {
            user.usage.descriptions_generated += 1;
        }
    }
}

pub fn record_video(user_id: &str) {
    if let Ok(mut users) = USERS.write() {
        if let Some(user) = users.get_mut(user_id) {
            user.usage.videos_generated += 1;
        }
    }
}

pub fn count() -> usize {
    USERS.read().map(|u| u.len()).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UsageCounters;

    fn make_user(id: &str, email: &str) -> User {
        User {
            user_id: id.to_string(),
            email: email.to_string(),
            name: "Test".to_string(),
            password_hash: None,
            tier: SubscriptionTier::Free,
            usage: UsageCounters::default(),
            created_at: chrono::Utc::now(),
            last_login: None,
        }
    }

    #[test]
    fn test_insert_and_lookup() {
        insert(make_user("store-1", "store-1@example.com")).unwrap();

        let by_id = find_by_id("store-1").unwrap();
        assert_eq!(by_id.email, "store-1@example.com");

        // Email lookup is case-insensitive
        let by_email = find_by_email("STORE-1@EXAMPLE.COM").unwrap();
        assert_eq!(by_email.user_id, "store-1");
    }

    #[test]
    fn test_duplicate_email_rejected() {
        insert(make_user("store-2", "store-2@example.com")).unwrap();

        let err = insert(make_user("store-2b", "Store-2@Example.com")).unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[test]
    fn test_usage_counters() {
        insert(make_user("store-3", "store-3@example.com")).unwrap();

        record_description("store-3");
        record_description("store-3");
        record_video("store-3");
        // Unknown user is a no-op, not a panic
        record_description("store-missing");

        let user = find_by_id("store-3").unwrap();
        assert_eq!(user.usage.descriptions_generated, 2);
        assert_eq!(user.usage.videos_generated, 1);
    }

    #[test]
    fn test_tier_upgrade_and_delete() {
        insert(make_user("store-4", "store-4@example.com")).unwrap();

        set_tier("store-4", SubscriptionTier::Pro).unwrap();
        assert_eq!(find_by_id("store-4").unwrap().tier, SubscriptionTier::Pro);

        delete("store-4").unwrap();
        assert!(find_by_id("store-4").is_none());
        assert!(matches!(delete("store-4"), Err(AppError::NotFound(_))));
    }
}
