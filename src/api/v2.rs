//! Hue CLIP v2 API: nested JSON light resources wrapped in an envelope

use tracing::instrument;
use validator::Validate;

use super::{resolve_light, ApiError};
use crate::{
    color,
    registry::{Registry, StateUpdate},
};

/// Schema definitions as Serde serializable structures and enums
pub mod message;
use message::{ColorTemperature, Envelope, Light, LightUpdate, Xy};

fn present<T>(value: Option<Option<T>>, name: &'static str) -> Result<Option<T>, ApiError> {
    match value {
        None => Ok(None),
        Some(None) => Err(ApiError::NullValue(name)),
        Some(Some(value)) => Ok(Some(value)),
    }
}

/// Leaf value of a present object, which must be neither absent nor `null`
fn required<T>(value: Option<Option<T>>, name: &'static str) -> Result<T, ApiError> {
    present(value, name)?
        .ok_or_else(|| ApiError::MalformedBody(serde::de::Error::missing_field(name)))
}

/// Translate a v2 partial update into a registry update
pub fn translate(request: LightUpdate) -> Result<StateUpdate, ApiError> {
    let mut update = StateUpdate::default();

    if let Some(on) = present(request.on, "on")? {
        update.on = Some(required(on.on, "on.on")?);
    }

    if let Some(dimming) = present(request.dimming, "dimming")? {
        let brightness = required(dimming.brightness, "dimming.brightness")?;
        update.brightness = Some(color::percent_to_brightness(brightness));
    }

    if let Some(request_color) = present(request.color, "color")? {
        if let Some(xy) = present(request_color.xy, "color.xy")? {
            let xy = Xy {
                x: required(xy.x, "color.xy.x")?,
                y: required(xy.y, "color.xy.y")?,
            };
            xy.validate()?;

            let (hue, saturation) = color::xy_to_hue_sat(xy.x, xy.y);
            update.hue = Some(hue);
            update.saturation = Some(saturation);
        }

        if let Some(temperature) =
            present(request_color.color_temperature, "color.color_temperature")?
        {
            let temperature = ColorTemperature {
                mirek: required(temperature.mirek, "color.color_temperature.mirek")?,
            };
            temperature.validate()?;

            // Applied after xy, so the color temperature mode wins when both are given
            update.color_temperature = Some(temperature.mirek);
        }
    }

    Ok(update)
}

/// Decode and translate a v2 update body
pub fn decode_update(body: &[u8]) -> Result<StateUpdate, ApiError> {
    translate(serde_json::from_slice(body)?)
}

/// Snapshot of all lights, in creation order
pub async fn lights(registry: &Registry) -> Envelope<Light> {
    let mut data = Vec::new();

    for light in registry.list_all().await {
        let state = light.state().await;
        data.push(Light::new(&light, &state));
    }

    Envelope::data(data)
}

/// A single light, resolved by registry key or public id
pub async fn light(registry: &Registry, id: &str) -> Result<Envelope<Light>, ApiError> {
    let light = resolve_light(registry, id).await?;
    let state = light.state().await;

    Ok(Envelope::data(vec![Light::new(&light, &state)]))
}

/// Handle an update request for the light `id`, returning the updated light
#[instrument(skip(registry, body))]
pub async fn update_light(
    registry: &Registry,
    id: &str,
    body: &[u8],
) -> Result<Envelope<Light>, ApiError> {
    let update = decode_update(body)?;
    let light = resolve_light(registry, id).await?;
    let state = registry.apply(&light, &update).await;

    debug!(light = %light.key(), colormode = %state.color_mode, "light updated via CLIP API");

    Ok(Envelope::data(vec![Light::new(&light, &state)]))
}

/// Envelope returned for resources the bridge does not model
pub fn empty() -> Envelope<Light> {
    Envelope::data(Vec::new())
}
