pub mod auth_service;
pub mod cloudinary_service;
pub mod did_service;
pub mod gemini_service;
pub mod openai_service;
pub mod pricing_service;
pub mod speech_service;
pub mod stripe_service;
pub mod user_store;
pub mod vision_service;
