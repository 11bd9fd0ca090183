//! Presentation monitor: logs the display color of every light that changes

use tokio::sync::broadcast::{self, error::RecvError};

use crate::{
    color,
    models::Color,
    registry::{ColorMode, Event, LightState, Registry},
};

/// Compute the RGB color a light would show in its current state
pub fn render(state: &LightState) -> Color {
    if !state.on {
        return color::OFF;
    }

    match state.color_mode {
        ColorMode::HueSaturation => {
            color::hsv_to_rgb(state.hue, state.saturation, state.brightness)
        }
        ColorMode::ColorTemperature | ColorMode::Xy => color::warm_white(state.brightness),
    }
}

/// Registry observer that outputs light colors to the log
pub struct Monitor {
    receiver: broadcast::Receiver<Event>,
}

impl Monitor {
    /// Create a new monitor. Changes are observed from this point on.
    pub fn new(registry: &Registry) -> Self {
        Self {
            receiver: registry.subscribe(),
        }
    }

    /// Wait for the next change, returning `None` when the registry is gone
    pub async fn next(&mut self) -> Option<(String, Color)> {
        loop {
            match self.receiver.recv().await {
                Ok(Event::Light(event)) => {
                    return Some((event.key, render(&event.state)));
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped = skipped, "monitor lagging behind light changes");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }

    pub async fn run(mut self) {
        while let Some((key, color)) = self.next().await {
            info!(
                "light {}: [R: {}, G: {}, B: {}]",
                key, color.red, color.green, color.blue
            );
        }
    }
}
