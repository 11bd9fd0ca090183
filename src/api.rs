//! Translation between the Hue wire formats and the light registry

use std::sync::Arc;

use thiserror::Error;

use crate::registry::{Light, Registry, RegistryError};

pub mod v1;
pub mod v2;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("body contains invalid JSON: {0}")]
    MalformedBody(#[from] serde_json::Error),
    #[error("invalid value: {0}")]
    Validation(#[from] validator::ValidationErrors),
    #[error("invalid value: `{0}` cannot be null")]
    NullValue(&'static str),
    #[error("resource, /lights/{0}, not available")]
    UnknownLight(String),
}

impl ApiError {
    /// Error type code used by the v1 API
    pub fn v1_type(&self) -> u32 {
        match self {
            Self::MalformedBody(_) => 2,
            Self::UnknownLight(_) => 3,
            Self::Validation(_) | Self::NullValue(_) => 7,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::UnknownLight(_))
    }
}

impl From<RegistryError> for ApiError {
    fn from(error: RegistryError) -> Self {
        match error {
            RegistryError::UnknownLight(key) => Self::UnknownLight(key),
        }
    }
}

/// Resolve a light from an identifier that is either a registry key or a public id
///
/// The v1 and v2 identifier schemes differ, so the exact key is tried first and the public
/// identifiers are scanned next.
pub async fn resolve_light(registry: &Registry, id: &str) -> Result<Arc<Light>, ApiError> {
    if let Some(light) = registry.get(id).await {
        return Ok(light);
    }

    registry
        .list_all()
        .await
        .into_iter()
        .find(|light| light.id().to_string() == id)
        .ok_or_else(|| ApiError::UnknownLight(id.to_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn resolve_by_key_and_public_id() {
        let registry = Registry::new(3);
        let third = registry.get("3").await.unwrap();

        assert_eq!(resolve_light(&registry, "3").await.unwrap().key(), "3");
        assert_eq!(
            resolve_light(&registry, &third.id().to_string())
                .await
                .unwrap()
                .key(),
            "3"
        );

        let error = resolve_light(&registry, "nope").await.unwrap_err();
        assert!(error.is_not_found());
        assert_eq!(error.v1_type(), 3);
    }
}
