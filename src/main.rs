mod api;
mod middleware;
mod models;
mod services;
mod utils;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use std::env;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    // Get configuration from environment
    let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = env::var("PORT").unwrap_or_else(|_| "3002".to_string());

    log::info!("🚀 Starting Description Service...");
    log::info!("🌐 Server starting on {}:{}", host, port);
    log::info!("📚 Swagger UI available at: http://{}:{}/swagger-ui/", host, port);
    log::info!("📄 OpenAPI spec at: http://{}:{}/api-docs/openapi.json", host, port);

    // Start HTTP server
    HttpServer::new(move || {
        let cors = Cors::default()
            .allowed_origin("http://localhost:3000")
            .allowed_origin("http://localhost:5173")
            .allowed_origin("http://127.0.0.1:3000")
            .allowed_origin("http://127.0.0.1:5173")
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
            .allowed_headers(vec![
                actix_web::http::header::AUTHORIZATION,
                actix_web::http::header::CONTENT_TYPE,
                actix_web::http::header::ACCEPT,
            ])
            .supports_credentials()
            .max_age(3600);

        // Generate OpenAPI specification
        let openapi = api::swagger::ApiDoc::openapi();

        App::new()
            .wrap(cors)
            .wrap(middleware::SecurityHeaders)
            .wrap(Logger::default())
            // Swagger UI
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", openapi.clone()),
            )
            // Health check
            .route("/health", web::get().to(api::health::health_check))
            // Metrics
            .route("/metrics", web::get().to(api::metrics::get_metrics))
            // API index
            .route("/api/v1", web::get().to(api::docs::api_index))
            // Auth endpoints
            .service(
                web::scope("/api/v1/auth")
                    .route("/register", web::post().to(api::auth::register))
                    .route("/login", web::post().to(api::auth::login))
                    .route("/verify", web::get().to(api::auth::verify_token))
                    .route("/me", web::get().to(api::auth::get_me))
                    .route("/delete-account", web::delete().to(api::auth::delete_account)),
            )
            // Product image analysis
            .route(
                "/api/v1/analyze-image",
                web::post().to(api::analyze::analyze_image),
            )
            // Checkout: Stripe sessions, JWT required so completed sessions
            // can be tied back to a user by the webhook
            .service(
                web::scope("/api/v1/checkout")
                    .wrap(middleware::AuthMiddleware)
                    .route("/session", web::post().to(api::checkout::create_session))
                    .route(
                        "/subscription",
                        web::post().to(api::checkout::create_subscription),
                    )
                    .route("/video", web::post().to(api::checkout::create_video_session))
                    .route(
                        "/bulk-video",
                        web::post().to(api::checkout::create_bulk_video_session),
                    ),
            )
            // Stripe webhook sink (no auth: Stripe calls this)
            .route(
                "/api/v1/webhooks/stripe",
                web::post().to(api::checkout::stripe_webhook),
            )
            // Media generation
            .service(
                web::scope("/api/v1/generate")
                    .route("/image", web::post().to(api::generate::generate_image))
                    .route("/video", web::post().to(api::generate::generate_video))
                    .route(
                        "/voice-sample",
                        web::post().to(api::generate::generate_voice_sample),
                    ),
            )
            // Catalogs & configuration
            .route("/api/v1/avatars", web::get().to(api::catalog::get_avatars))
            .route("/api/v1/pricing", web::get().to(api::catalog::get_pricing))
            .route("/api/v1/config", web::get().to(api::catalog::get_config))
            .route("/api/v1/debug", web::get().to(api::catalog::get_debug))
            // Shopify OAuth stubs
            .service(
                web::scope("/shopify")
                    .route("/install", web::get().to(api::shopify::install))
                    .route("/callback", web::get().to(api::shopify::callback)),
            )
    })
    .bind(format!("{}:{}", host, port))?
    .run()
    .await
}
