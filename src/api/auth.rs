use crate::services::auth_service;
use crate::services::auth_service::{AuthResponse, LoginRequest, RegisterRequest, UserInfo};
use crate::utils::error::AppError;
use actix_web::{web, HttpRequest, HttpResponse};

#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    tag = "Auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Registration successful", body = AuthResponse),
        (status = 400, description = "Invalid email or password"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn register(request: web::Json<RegisterRequest>) -> HttpResponse {
    log::info!("📝 POST /auth/register - email: {}", request.email);

    match auth_service::register(&request) {
        Ok(response) => {
            log::info!("✅ Registration successful: {}", request.email);
            HttpResponse::Created().json(response)
        }
        Err(e) => {
            log::warn!("❌ Registration failed: {} - {}", request.email, e);
            let body = serde_json::json!({
                "success": false,
                "error": e.to_string()
            });
            match e {
                AppError::Conflict(_) => HttpResponse::Conflict().json(body),
                AppError::InvalidRequest(_) => HttpResponse::BadRequest().json(body),
                _ => HttpResponse::InternalServerError().json(body),
            }
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(request: web::Json<LoginRequest>) -> HttpResponse {
    log::info!("🔐 POST /auth/login - email: {}", request.email);

    match auth_service::login(&request) {
        Ok(response) => {
            log::info!("✅ Login successful: {}", request.email);
            HttpResponse::Ok().json(response)
        }
        Err(e) => {
            log::warn!("❌ Login failed: {} - {}", request.email, e);
            HttpResponse::Unauthorized().json(serde_json::json!({
                "success": false,
                "error": e
            }))
        }
    }
}

fn bearer_token(req: &HttpRequest) -> Option<&str> {
    req.headers()
        .get("Authorization")?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

#[utoipa::path(
    get,
    path = "/api/v1/auth/verify",
    tag = "Auth",
    responses(
        (status = 200, description = "Token is valid"),
        (status = 401, description = "Invalid or expired token")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn verify_token(req: HttpRequest) -> HttpResponse {
    log::info!("✓ GET /auth/verify");

    let token = match bearer_token(&req) {
        Some(token) => token,
        None => {
            return HttpResponse::Unauthorized().json(serde_json::json!({
                "success": false,
                "error": "No valid Authorization header"
            }));
        }
    };

    match auth_service::verify_token(token) {
        Ok(claims) => {
            log::info!("✅ Token valid for user: {}", claims.sub);
            HttpResponse::Ok().json(serde_json::json!({
                "success": true,
                "valid": true,
                "user_id": claims.sub,
                "email": claims.email,
                "tier": claims.tier,
                "exp": claims.exp
            }))
        }
        Err(e) => {
            log::warn!("❌ Invalid token: {}", e);
            HttpResponse::Unauthorized().json(serde_json::json!({
                "success": false,
                "valid": false,
                "error": e
            }))
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    tag = "Auth",
    responses(
        (status = 200, description = "User information retrieved", body = UserInfo),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_me(req: HttpRequest) -> HttpResponse {
    log::info!("👤 GET /auth/me");

    let token = match bearer_token(&req) {
        Some(token) => token,
        None => {
            return HttpResponse::Unauthorized().json(serde_json::json!({
                "success": false,
                "error": "No valid Authorization header"
            }));
        }
    };

    let claims = match auth_service::verify_token(token) {
        Ok(claims) => claims,
        Err(e) => {
            log::warn!("❌ Invalid token: {}", e);
            return HttpResponse::Unauthorized().json(serde_json::json!({
                "success": false,
                "error": e
            }));
        }
    };

    match auth_service::get_current_user(&claims.sub) {
        Ok(user) => {
            log::info!("✅ User info retrieved: {}", claims.sub);
            HttpResponse::Ok().json(serde_json::json!({
                "success": true,
                "user": user
            }))
        }
        Err(e) => {
            log::warn!("❌ Failed to get user: {}", e);
            HttpResponse::NotFound().json(serde_json::json!({
                "success": false,
                "error": e
            }))
        }
    }
}

/// Delete the authenticated user's account and its in-memory data.
pub async fn delete_account(req: HttpRequest) -> HttpResponse {
    log::info!("🗑️ DELETE /auth/delete-account");

    let token = match bearer_token(&req) {
        Some(token) => token,
        None => {
            log::warn!("❌ No valid Authorization header");
            return HttpResponse::Unauthorized().json(serde_json::json!({
                "success": false,
                "error": "No valid Authorization header"
            }));
        }
    };

    let claims = match auth_service::verify_token(token) {
        Ok(claims) => claims,
        Err(e) => {
            log::warn!("❌ Invalid token: {}", e);
            return HttpResponse::Unauthorized().json(serde_json::json!({
                "success": false,
                "error": "Invalid or expired token"
            }));
        }
    };

    match auth_service::delete_user_account(&claims.sub) {
        Ok(_) => {
            log::info!("✅ Account deleted successfully: {}", claims.sub);
            HttpResponse::Ok().json(serde_json::json!({
                "success": true,
                "message": "Account deleted successfully"
            }))
        }
        Err(e) => {
            log::error!("❌ Failed to delete account {}: {}", claims.sub, e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "success": false,
                "error": format!("Failed to delete account: {}", e)
            }))
        }
    }
}
