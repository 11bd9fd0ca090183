use parse_display::Display;
use serde_derive::{Deserialize, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;

/// Namespace for the public identifiers of lights, derived from the bridge UUID
const LIGHT_NAMESPACE: Uuid = Uuid::from_u128(0x2f402f80_da50_11e1_9b23_001788102201);

#[derive(Display, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColorMode {
    #[display("hs")]
    #[serde(rename = "hs")]
    HueSaturation,
    #[display("ct")]
    #[serde(rename = "ct")]
    ColorTemperature,
    #[display("xy")]
    #[serde(rename = "xy")]
    Xy,
}

/// Mutable state of a virtual light
#[derive(Debug, Clone, PartialEq)]
pub struct LightState {
    pub on: bool,
    /// 1-254
    pub brightness: u8,
    /// 0-65535
    pub hue: u16,
    /// 0-254
    pub saturation: u8,
    /// Mireds, 153-500
    pub color_temperature: u16,
    pub color_mode: ColorMode,
    pub alert: &'static str,
    pub effect: &'static str,
    pub reachable: bool,
}

impl Default for LightState {
    fn default() -> Self {
        Self {
            on: false,
            brightness: 254,
            hue: 0,
            saturation: 0,
            color_temperature: 366,
            color_mode: ColorMode::ColorTemperature,
            alert: "none",
            effect: "none",
            reachable: true,
        }
    }
}

impl LightState {
    /// Apply the fields present in `update`, leaving the others untouched
    pub fn apply(&mut self, update: &StateUpdate) {
        if let Some(on) = update.on {
            self.on = on;
        }

        if let Some(brightness) = update.brightness {
            self.brightness = brightness;
        }

        if let Some(hue) = update.hue {
            self.hue = hue;
            self.color_mode = ColorMode::HueSaturation;
        }

        if let Some(saturation) = update.saturation {
            self.saturation = saturation;
            self.color_mode = ColorMode::HueSaturation;
        }

        if let Some(color_temperature) = update.color_temperature {
            self.color_temperature = color_temperature;
            self.color_mode = ColorMode::ColorTemperature;
        }
    }
}

/// Sparse update to a light state. Absent fields are left untouched.
#[derive(Default, Debug, Clone, Copy, PartialEq)]
pub struct StateUpdate {
    pub on: Option<bool>,
    pub brightness: Option<u8>,
    pub hue: Option<u16>,
    pub saturation: Option<u8>,
    pub color_temperature: Option<u16>,
}

impl StateUpdate {
    pub fn is_empty(&self) -> bool {
        self.on.is_none()
            && self.brightness.is_none()
            && self.hue.is_none()
            && self.saturation.is_none()
            && self.color_temperature.is_none()
    }
}

/// A virtual light
#[derive(Debug)]
pub struct Light {
    /// Registry key, also the v1 identifier
    key: String,
    /// Public identifier used by the v2 API
    id: Uuid,
    name: String,
    unique_id: String,
    state: RwLock<LightState>,
}

impl Light {
    pub const TYPE: &'static str = "Extended color light";
    pub const MODEL_ID: &'static str = "LCT016";
    pub const MANUFACTURER: &'static str = "Philips";
    pub const SOFTWARE_VERSION: &'static str = "1.65.11_r26581";

    /// Create the light with the given index, in its default state
    pub fn create(index: u32) -> Self {
        let key = index.to_string();

        Self {
            id: Uuid::new_v5(&LIGHT_NAMESPACE, format!("light/{}", key).as_bytes()),
            name: format!("Fake Hue Light {}", index),
            unique_id: format!("00:17:88:01:00:bd:ab:{:02x}-0b", index),
            state: RwLock::new(LightState::default()),
            key,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn unique_id(&self) -> &str {
        &self.unique_id
    }

    /// Read a copy of the current state
    pub async fn state(&self) -> LightState {
        self.state.read().await.clone()
    }

    /// Apply an update under the exclusive lock and return the resulting state
    pub(super) async fn update(&self, update: &StateUpdate) -> LightState {
        let mut state = self.state.write().await;
        state.apply(update);
        state.clone()
    }

    /// Flip the on/off state and return the resulting state
    pub(super) async fn toggle(&self) -> LightState {
        let mut state = self.state.write().await;
        state.on = !state.on;
        state.clone()
    }
}
