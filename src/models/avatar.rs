use serde::{Deserialize, Serialize};

/// A talking-avatar presenter available for video generation.
#[derive(Debug, Serialize, Deserialize, Clone, utoipa::ToSchema)]
pub struct Avatar {
    pub id: String,
    pub name: String,
    /// Image used as the D-ID talk source
    pub source_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    pub gender: String,
    /// Default Azure voice paired with this presenter
    pub voice_id: String,
}
