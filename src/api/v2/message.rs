use serde_derive::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::{
    api::ApiError,
    color,
    registry::{self, ColorMode, LightState},
};

/// Response envelope of the CLIP v2 API
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub errors: Vec<ErrorEntry>,
    pub data: Vec<T>,
}

impl<T> Envelope<T> {
    pub fn data(data: Vec<T>) -> Self {
        Self {
            errors: Vec::new(),
            data,
        }
    }

    pub fn error(error: &ApiError) -> Self {
        Self {
            errors: vec![ErrorEntry {
                description: error.to_string(),
            }],
            data: Vec::new(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorEntry {
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Validate)]
pub struct Xy {
    #[validate(range(min = 0.0, max = 1.0))]
    pub x: f64,
    #[validate(range(min = 0.0, max = 1.0))]
    pub y: f64,
}

#[derive(Debug, Serialize)]
pub struct Gamut {
    pub red: Xy,
    pub green: Xy,
    pub blue: Xy,
}

/// Gamut C triangle, as reported by LCT016 bulbs
pub const GAMUT_C: Gamut = Gamut {
    red: Xy { x: 0.675, y: 0.322 },
    green: Xy { x: 0.409, y: 0.518 },
    blue: Xy { x: 0.167, y: 0.04 },
};

#[derive(Debug, Serialize)]
pub struct Metadata {
    pub name: String,
    pub archetype: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct On {
    pub on: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Dimming {
    /// Percentage, 0-100
    pub brightness: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Validate)]
pub struct ColorTemperature {
    #[validate(range(min = 153, max = 500))]
    pub mirek: u16,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum Color {
    Xy {
        xy: Xy,
        gamut: Gamut,
        gamut_type: &'static str,
    },
    Temperature {
        color_temperature: ColorTemperature,
    },
}

#[derive(Debug, Serialize)]
pub struct Light {
    pub id: Uuid,
    pub id_v1: String,
    pub metadata: Metadata,
    pub on: On,
    pub dimming: Dimming,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    #[serde(rename = "type")]
    pub ty: &'static str,
}

impl Light {
    pub fn new(light: &registry::Light, state: &LightState) -> Self {
        let color = match state.color_mode {
            ColorMode::HueSaturation => {
                let (x, y) = color::hue_sat_to_xy(state.hue, state.saturation);

                Some(Color::Xy {
                    xy: Xy { x, y },
                    gamut: GAMUT_C,
                    gamut_type: "C",
                })
            }
            ColorMode::ColorTemperature => Some(Color::Temperature {
                color_temperature: ColorTemperature {
                    mirek: state.color_temperature,
                },
            }),
            ColorMode::Xy => None,
        };

        Self {
            id: light.id(),
            id_v1: format!("/lights/{}", light.key()),
            metadata: Metadata {
                name: light.name().to_owned(),
                archetype: "sultan_bulb",
            },
            on: On { on: state.on },
            dimming: Dimming {
                brightness: color::brightness_to_percent(state.brightness),
            },
            color,
            ty: "light",
        }
    }
}

/// Body of `PUT /clip/v2/resource/light/<id>`
///
/// Every key may be absent. An explicit `null` is kept apart from an absent key so that it can
/// be rejected, at any depth.
#[derive(Default, Debug, Deserialize)]
pub struct LightUpdate {
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub on: Option<Option<OnUpdate>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub dimming: Option<Option<DimmingUpdate>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub color: Option<Option<ColorUpdate>>,
}

#[derive(Default, Debug, Deserialize)]
pub struct OnUpdate {
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub on: Option<Option<bool>>,
}

#[derive(Default, Debug, Deserialize)]
pub struct DimmingUpdate {
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub brightness: Option<Option<f64>>,
}

#[derive(Default, Debug, Deserialize)]
pub struct ColorUpdate {
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub xy: Option<Option<XyUpdate>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub color_temperature: Option<Option<ColorTemperatureUpdate>>,
}

#[derive(Default, Debug, Deserialize)]
pub struct XyUpdate {
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub x: Option<Option<f64>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub y: Option<Option<f64>>,
}

#[derive(Default, Debug, Deserialize)]
pub struct ColorTemperatureUpdate {
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub mirek: Option<Option<u16>>,
}
