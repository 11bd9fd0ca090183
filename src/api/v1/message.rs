use serde_derive::{Deserialize, Serialize};
use serde_json::{Map, Value};
use validator::Validate;

use crate::{
    api::ApiError,
    color,
    registry::{self, ColorMode, LightState, StateUpdate},
};

/// Body of `PUT /api/<user>/lights/<id>/state`
///
/// Unknown fields such as `transitiontime` are accepted and ignored.
#[derive(Default, Debug, Deserialize, Validate)]
pub struct SetState {
    pub on: Option<bool>,
    #[validate(range(min = 1, max = 254))]
    pub bri: Option<u8>,
    pub hue: Option<u16>,
    #[validate(range(max = 254))]
    pub sat: Option<u8>,
    #[validate(range(min = 153, max = 500))]
    pub ct: Option<u16>,
}

impl From<SetState> for StateUpdate {
    fn from(request: SetState) -> Self {
        Self {
            on: request.on,
            brightness: request.bri,
            hue: request.hue,
            saturation: request.sat,
            color_temperature: request.ct,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct State {
    pub on: bool,
    pub bri: u8,
    pub hue: u16,
    pub sat: u8,
    pub ct: u16,
    pub xy: [f64; 2],
    pub colormode: ColorMode,
    pub alert: &'static str,
    pub effect: &'static str,
    pub reachable: bool,
}

impl From<&LightState> for State {
    fn from(state: &LightState) -> Self {
        let (x, y) = color::hue_sat_to_xy(state.hue, state.saturation);

        Self {
            on: state.on,
            bri: state.brightness,
            hue: state.hue,
            sat: state.saturation,
            ct: state.color_temperature,
            xy: [x, y],
            colormode: state.color_mode,
            alert: state.alert,
            effect: state.effect,
            reachable: state.reachable,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Light {
    pub state: State,
    #[serde(rename = "type")]
    pub ty: &'static str,
    pub name: String,
    pub modelid: &'static str,
    pub manufacturername: &'static str,
    pub swversion: &'static str,
    pub uniqueid: String,
}

impl Light {
    pub fn new(light: &registry::Light, state: &LightState) -> Self {
        Self {
            state: state.into(),
            ty: registry::Light::TYPE,
            name: light.name().to_owned(),
            modelid: registry::Light::MODEL_ID,
            manufacturername: registry::Light::MANUFACTURER,
            swversion: registry::Light::SOFTWARE_VERSION,
            uniqueid: light.unique_id().to_owned(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    #[serde(rename = "type")]
    pub ty: u32,
    pub address: String,
    pub description: String,
}

/// One entry of a v1 response array
#[derive(Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Response {
    Success(Map<String, Value>),
    Error(ErrorDetail),
}

impl Response {
    pub fn success(key: impl Into<String>, value: impl Into<Value>) -> Self {
        let mut map = Map::new();
        map.insert(key.into(), value.into());
        Self::Success(map)
    }

    pub fn error(error: &ApiError, address: impl Into<String>) -> Self {
        Self::Error(ErrorDetail {
            ty: error.v1_type(),
            address: address.into(),
            description: error.to_string(),
        })
    }
}
