use crate::models::{SubscriptionTier, UsageCounters, User};
use crate::services::user_store;
use crate::utils::error::AppError;
use bcrypt::{hash, verify, DEFAULT_COST};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

// JWT Claims
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,           // user_id
    pub email: String,
    pub name: Option<String>,
    pub tier: String,
    pub iat: usize,            // issued at
    pub exp: usize,            // expiration
    pub jti: String,           // JWT ID
    pub aud: String,           // audience
    pub iss: String,           // issuer
}

// Request/Response structures
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: Option<String>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct AuthResponse {
    pub success: bool,
    pub token: String,
    pub user: UserInfo,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct UserInfo {
    pub id: String,
    pub email: String,
    pub name: String,
    pub tier: SubscriptionTier,
    pub usage: UsageCounters,
}

impl From<&User> for UserInfo {
    fn from(user: &User) -> Self {
        UserInfo {
            id: user.user_id.clone(),
            email: user.email.clone(),
            name: user.name.clone(),
            tier: user.tier,
            usage: user.usage.clone(),
        }
    }
}

fn get_jwt_secret() -> String {
    std::env::var("JWT_SECRET").unwrap_or_else(|_| "default-secret-change-me".to_string())
}

fn get_jwt_issuer() -> String {
    std::env::var("JWT_ISSUER").unwrap_or_else(|_| "description-service".to_string())
}

fn get_jwt_audience() -> String {
    std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "description-api".to_string())
}

// Generate JWT token (7-day expiry)
pub fn generate_jwt(user: &User) -> Result<String, String> {
    let iat = Utc::now().timestamp() as usize;
    let exp = (Utc::now() + Duration::days(7)).timestamp() as usize;
    let jti = Uuid::new_v4().to_string();

    let claims = Claims {
        sub: user.user_id.clone(),
        email: user.email.clone(),
        name: Some(user.name.clone()),
        tier: user.tier.as_str().to_string(),
        iat,
        exp,
        jti,
        aud: get_jwt_audience(),
        iss: get_jwt_issuer(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(get_jwt_secret().as_ref()),
    )
    .map_err(|e| format!("Failed to generate token: {}", e))
}

// Verify JWT token
pub fn verify_token(token: &str) -> Result<Claims, String> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_audience(&[get_jwt_audience()]);

    let mut issuers = HashSet::new();
    issuers.insert(get_jwt_issuer());
    validation.iss = Some(issuers);

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(get_jwt_secret().as_ref()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| format!("Invalid token: {}", e))
}

// User registration
pub fn register(request: &RegisterRequest) -> Result<AuthResponse, AppError> {
    let email = request.email.trim();
    if email.is_empty() || !email.contains('@') {
        return Err(AppError::InvalidRequest("A valid email is required".to_string()));
    }
    if request.password.len() < 6 {
        return Err(AppError::InvalidRequest(
            "Password must be at least 6 characters".to_string(),
        ));
    }

    let password_hash = hash(&request.password, DEFAULT_COST)
        .map_err(|e| AppError::StoreError(format!("Failed to hash password: {}", e)))?;

    let new_user = User {
        user_id: Uuid::new_v4().to_string(),
        email: email.to_string(),
        name: request
            .name
            .clone()
            .unwrap_or_else(|| email.split('@').next().unwrap_or("user").to_string()),
        password_hash: Some(password_hash),
        tier: SubscriptionTier::Free,
        usage: UsageCounters::default(),
        created_at: Utc::now(),
        last_login: Some(Utc::now()),
    };

    // Insert enforces email uniqueness
    user_store::insert(new_user.clone())?;

    let token = generate_jwt(&new_user).map_err(AppError::StoreError)?;

    log::info!("✅ User registered: {}", new_user.email);

    Ok(AuthResponse {
        success: true,
        token,
        user: UserInfo::from(&new_user),
    })
}

// User login
pub fn login(request: &LoginRequest) -> Result<AuthResponse, String> {
    let user = user_store::find_by_email(&request.email)
        .ok_or_else(|| "Invalid credentials".to_string())?;

    let stored_hash = user
        .password_hash
        .as_ref()
        .ok_or_else(|| "Invalid credentials".to_string())?;

    let valid = verify(&request.password, stored_hash)
        .map_err(|e| format!("Password verification error: {}", e))?;

    if !valid {
        return Err("Invalid credentials".to_string());
    }

    user_store::set_last_login(&user.user_id);

    let token = generate_jwt(&user)?;

    Ok(AuthResponse {
        success: true,
        token,
        user: UserInfo::from(&user),
    })
}

// Get current user
pub fn get_current_user(user_id: &str) -> Result<UserInfo, String> {
    user_store::find_by_id(user_id)
        .map(|u| UserInfo::from(&u))
        .ok_or_else(|| "User not found".to_string())
}

// Delete user account
pub fn delete_user_account(user_id: &str) -> Result<(), String> {
    log::info!("🗑️ Deleting account for user_id: {}", user_id);
    user_store::delete(user_id).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_then_login() {
        let response = register(&RegisterRequest {
            email: "auth-1@example.com".to_string(),
            password: "secret123".to_string(),
            name: Some("Auth One".to_string()),
        })
        .unwrap();
        assert!(response.success);
        assert_eq!(response.user.tier, SubscriptionTier::Free);

        let login_response = login(&LoginRequest {
            email: "auth-1@example.com".to_string(),
            password: "secret123".to_string(),
        })
        .unwrap();
        assert_eq!(login_response.user.email, "auth-1@example.com");
    }

    #[test]
    fn test_login_wrong_password() {
        register(&RegisterRequest {
            email: "auth-2@example.com".to_string(),
            password: "secret123".to_string(),
            name: None,
        })
        .unwrap();

        let err = login(&LoginRequest {
            email: "auth-2@example.com".to_string(),
            password: "wrong-password".to_string(),
        })
        .unwrap_err();
        assert_eq!(err, "Invalid credentials");
    }

    #[test]
    fn test_login_unknown_email() {
        let err = login(&LoginRequest {
            email: "auth-nobody@example.com".to_string(),
            password: "whatever1".to_string(),
        })
        .unwrap_err();
        // Same message as wrong password, so callers can't probe for accounts
        assert_eq!(err, "Invalid credentials");
    }

    #[test]
    fn test_register_duplicate_email() {
        register(&RegisterRequest {
            email: "auth-3@example.com".to_string(),
            password: "secret123".to_string(),
            name: None,
        })
        .unwrap();

        let err = register(&RegisterRequest {
            email: "auth-3@example.com".to_string(),
            password: "secret456".to_string(),
            name: None,
        })
        .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[test]
    fn test_register_validation() {
        let err = register(&RegisterRequest {
            email: "not-an-email".to_string(),
            password: "secret123".to_string(),
            name: None,
        })
        .unwrap_err();
        assert!(matches!(err, AppError::InvalidRequest(_)));

        let err = register(&RegisterRequest {
            email: "auth-4@example.com".to_string(),
            password: "short".to_string(),
            name: None,
        })
        .unwrap_err();
        assert!(matches!(err, AppError::InvalidRequest(_)));
    }

    #[test]
    fn test_jwt_round_trip() {
        let response = register(&RegisterRequest {
            email: "auth-5@example.com".to_string(),
            password: "secret123".to_string(),
            name: Some("Auth Five".to_string()),
        })
        .unwrap();

        let claims = verify_token(&response.token).unwrap();
        assert_eq!(claims.sub, response.user.id);
        assert_eq!(claims.email, "auth-5@example.com");
        assert_eq!(claims.tier, "free");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_verify_garbage_token() {
        assert!(verify_token("not.a.token").is_err());
    }
}
