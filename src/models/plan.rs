use serde::{Deserialize, Serialize};

/// A purchasable plan shown on the pricing page and mapped to a
/// Stripe price id at checkout time.
#[derive(Debug, Serialize, Deserialize, Clone, utoipa::ToSchema)]
pub struct Plan {
    pub id: String,
    pub name: String,
    pub description: String,
    pub amount_cents: u64,
    pub currency: String,
    /// "payment" (one-time) or "subscription"
    pub mode: String,
    pub features: Vec<String>,
    /// Whether a Stripe price id is configured for this plan
    pub configured: bool,
}
