use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Subscription tiers sold through Stripe Checkout.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionTier {
    Free,
    Starter,
    Pro,
    Enterprise,
}

impl SubscriptionTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionTier::Free => "free",
            SubscriptionTier::Starter => "starter",
            SubscriptionTier::Pro => "pro",
            SubscriptionTier::Enterprise => "enterprise",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "free" => Some(SubscriptionTier::Free),
            "starter" => Some(SubscriptionTier::Starter),
            "pro" => Some(SubscriptionTier::Pro),
            "enterprise" => Some(SubscriptionTier::Enterprise),
            _ => None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, utoipa::ToSchema)]
pub struct UsageCounters {
    pub descriptions_generated: u64,
    pub videos_generated: u64,
}

// User record held in the in-memory store. Placeholder for a real
// database: everything here lives only as long as the process.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct User {
    pub user_id: String,
    pub email: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password_hash: Option<String>,
    pub tier: SubscriptionTier,
    pub usage: UsageCounters,
    pub created_at: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}
