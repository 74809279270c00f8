use crate::models::Plan;
use crate::services::stripe_service;

fn plan_configured(plan_id: &str) -> bool {
    stripe_service::plan_price_env(plan_id)
        .map(|env_key| std::env::var(env_key).map(|v| !v.is_empty()).unwrap_or(false))
        .unwrap_or(false)
}

/// Plan catalog shown on the pricing page. Amounts mirror the Stripe
/// dashboard but are display-only; billing always goes through the
/// configured price ids.
pub fn plan_catalog() -> Vec<Plan> {
    let plans = [
        (
            "starter",
            "Starter",
            "50 product descriptions per month",
            1900u64,
            "subscription",
            vec!["50 descriptions/month", "Image analysis", "Email support"],
        ),
        (
            "pro",
            "Pro",
            "Unlimited descriptions plus generated product images",
            4900,
            "subscription",
            vec![
                "Unlimited descriptions",
                "Image generation",
                "Voice samples",
                "Priority support",
            ],
        ),
        (
            "enterprise",
            "Enterprise",
            "Everything in Pro plus avatar videos and bulk tooling",
            14900,
            "subscription",
            vec![
                "Everything in Pro",
                "Avatar videos",
                "Bulk video credits",
                "Dedicated support",
            ],
        ),
        (
            "video",
            "Single Video",
            "One talking-avatar product video",
            900,
            "payment",
            vec!["1 avatar video", "HD rendering"],
        ),
        (
            "bulk-video",
            "Video Pack",
            "Avatar video credits, priced per unit",
            700,
            "payment",
            vec!["Per-video pricing", "Volume discount via quantity"],
        ),
    ];

    plans
        .iter()
        .map(|(id, name, description, amount_cents, mode, features)| Plan {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            amount_cents: *amount_cents,
            currency: "usd".to_string(),
            mode: mode.to_string(),
            features: features.iter().map(|f| f.to_string()).collect(),
            configured: plan_configured(id),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_matches_stripe_mapping() {
        let catalog = plan_catalog();
        assert_eq!(catalog.len(), 5);

        // Every displayed plan must have a Stripe price mapping
        for plan in &catalog {
            assert!(
                stripe_service::plan_price_env(&plan.id).is_some(),
                "plan {} has no price mapping",
                plan.id
            );
            assert!(plan.amount_cents > 0);
            assert!(matches!(plan.mode.as_str(), "payment" | "subscription"));
            assert!(!plan.features.is_empty());
        }
    }
}
