use super::LightState;

#[derive(Debug, Clone)]
pub enum Event {
    Light(LightEvent),
}

impl Event {
    pub fn light(key: &str, kind: LightEventKind, state: LightState) -> Self {
        Self::Light(LightEvent {
            key: key.to_owned(),
            kind,
            state,
        })
    }
}

#[derive(Debug, Clone)]
pub struct LightEvent {
    pub key: String,
    pub kind: LightEventKind,
    /// State right after the change
    pub state: LightState,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightEventKind {
    Update,
    Toggle,
}
