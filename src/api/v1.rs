//! Hue v1 API: flat JSON light representation and sparse state updates

use std::collections::BTreeMap;

use tracing::instrument;
use validator::Validate;

use super::ApiError;
use crate::registry::{Registry, StateUpdate};

/// Schema definitions as Serde serializable structures and enums
pub mod message;
use message::{Light, Response, SetState};

/// Username handed out to clients that try to pair with the bridge
pub const PAIRED_USERNAME: &str = "fakehueuser";

/// Snapshot of all lights, keyed by registry key
pub async fn lights(registry: &Registry) -> BTreeMap<String, Light> {
    let mut result = BTreeMap::new();

    for light in registry.list_all().await {
        let state = light.state().await;
        result.insert(light.key().to_owned(), Light::new(&light, &state));
    }

    result
}

/// A single light by registry key
pub async fn light(registry: &Registry, key: &str) -> Result<Light, ApiError> {
    let light = registry
        .get(key)
        .await
        .ok_or_else(|| ApiError::UnknownLight(key.to_owned()))?;

    let state = light.state().await;
    Ok(Light::new(&light, &state))
}

/// Decode a state update body. Fields absent from the body stay `None`.
pub fn decode_state(body: &[u8]) -> Result<StateUpdate, ApiError> {
    let request: SetState = serde_json::from_slice(body)?;
    request.validate()?;
    Ok(request.into())
}

/// Acknowledge every field present in `update`, in a fixed order
pub fn acknowledge(key: &str, update: &StateUpdate) -> Vec<Response> {
    let address = |field: &str| format!("/lights/{}/state/{}", key, field);
    let mut responses = Vec::new();

    if let Some(on) = update.on {
        responses.push(Response::success(address("on"), on));
    }

    if let Some(brightness) = update.brightness {
        responses.push(Response::success(address("bri"), brightness));
    }

    if let Some(hue) = update.hue {
        responses.push(Response::success(address("hue"), hue));
    }

    if let Some(saturation) = update.saturation {
        responses.push(Response::success(address("sat"), saturation));
    }

    if let Some(color_temperature) = update.color_temperature {
        responses.push(Response::success(address("ct"), color_temperature));
    }

    responses
}

/// Handle a state update request for the light `key`
#[instrument(skip(registry, body))]
pub async fn set_state(
    registry: &Registry,
    key: &str,
    body: &[u8],
) -> Result<Vec<Response>, ApiError> {
    let update = decode_state(body)?;
    let state = registry.apply_update(key, &update).await?;

    debug!(
        on = ?update.on,
        bri = ?update.brightness,
        hue = ?update.hue,
        sat = ?update.saturation,
        ct = ?update.color_temperature,
        colormode = %state.color_mode,
        "light updated"
    );

    Ok(acknowledge(key, &update))
}

/// Answer to any other v1 request, including the pairing handshake
pub fn pairing() -> Vec<Response> {
    vec![Response::success("username", PAIRED_USERNAME)]
}
