//! Registry of the virtual lights exposed by the bridge

use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::{broadcast, RwLock};

mod event;
pub use event::*;

mod light;
pub use light::*;

/// Capacity of the change notification channel. Slow subscribers lag instead of blocking writers.
const EVENT_CAPACITY: usize = 64;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("unknown light: {0}")]
    UnknownLight(String),
}

/// Shared handle to the light registry
#[derive(Clone)]
pub struct Registry(Arc<RegistryData>);

struct RegistryData {
    lights: RwLock<Lights>,
    event_tx: broadcast::Sender<Event>,
}

#[derive(Default)]
struct Lights {
    by_key: HashMap<String, Arc<Light>>,
    /// Lights in creation order
    ordered: Vec<Arc<Light>>,
}

impl Registry {
    /// Create a registry populated with lights `1..=count`
    pub fn new(count: u32) -> Self {
        let mut lights = Lights::default();

        for index in 1..=count {
            let light = Arc::new(Light::create(index));
            debug!(light = %light.key(), id = %light.id(), "created light");

            lights.by_key.insert(light.key().to_owned(), light.clone());
            lights.ordered.push(light);
        }

        let (event_tx, _) = broadcast::channel(EVENT_CAPACITY);

        Self(Arc::new(RegistryData {
            lights: RwLock::new(lights),
            event_tx,
        }))
    }

    /// Find a light by its exact registry key
    pub async fn get(&self, key: &str) -> Option<Arc<Light>> {
        self.0.lights.read().await.by_key.get(key).cloned()
    }

    /// Snapshot of all lights, in creation order
    pub async fn list_all(&self) -> Vec<Arc<Light>> {
        self.0.lights.read().await.ordered.clone()
    }

    /// Apply an update to the light with the given key
    pub async fn apply_update(
        &self,
        key: &str,
        update: &StateUpdate,
    ) -> Result<LightState, RegistryError> {
        let light = self
            .get(key)
            .await
            .ok_or_else(|| RegistryError::UnknownLight(key.to_owned()))?;

        Ok(self.apply(&light, update).await)
    }

    /// Apply an update to an already resolved light
    ///
    /// An empty update only reads the state back and is not notified.
    pub async fn apply(&self, light: &Light, update: &StateUpdate) -> LightState {
        if update.is_empty() {
            return light.state().await;
        }

        let state = light.update(update).await;
        trace!(light = %light.key(), state = ?state, "light updated");

        self.notify(Event::light(
            light.key(),
            LightEventKind::Update,
            state.clone(),
        ));

        state
    }

    /// Flip the on/off state of the light with the given key
    pub async fn toggle(&self, key: &str) -> Result<LightState, RegistryError> {
        let light = self
            .get(key)
            .await
            .ok_or_else(|| RegistryError::UnknownLight(key.to_owned()))?;

        let state = light.toggle().await;
        info!(light = %key, on = state.on, "light toggled");

        self.notify(Event::light(key, LightEventKind::Toggle, state.clone()));

        Ok(state)
    }

    /// Subscribe to change notifications
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.0.event_tx.subscribe()
    }

    fn notify(&self, event: Event) {
        // ok: nobody may be listening
        self.0.event_tx.send(event).ok();
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn test_populate() {
        let registry = Registry::new(3);

        let keys: Vec<_> = registry
            .list_all()
            .await
            .iter()
            .map(|light| light.key().to_owned())
            .collect();
        assert_eq!(keys, vec!["1", "2", "3"]);

        assert!(registry.get("2").await.is_some());
        assert!(registry.get("4").await.is_none());
        assert!(registry.get("02").await.is_none());
    }

    #[tokio::test]
    async fn test_apply_update() {
        let registry = Registry::new(2);

        let state = registry
            .apply_update(
                "1",
                &StateUpdate {
                    on: Some(true),
                    brightness: Some(200),
                    ..Default::default()
                },
            )
            .await
            .expect("light 1 exists");

        assert!(state.on);
        assert_eq!(state.brightness, 200);
        assert_eq!(state.color_mode, ColorMode::ColorTemperature);

        let other = registry.get("2").await.unwrap().state().await;
        assert_eq!(other, LightState::default());
    }

    #[tokio::test]
    async fn test_unknown_light() {
        let registry = Registry::new(1);

        let result = registry
            .apply_update(
                "doesnotexist",
                &StateUpdate {
                    on: Some(true),
                    ..Default::default()
                },
            )
            .await;

        assert!(matches!(result, Err(RegistryError::UnknownLight(key)) if key == "doesnotexist"));
        assert_eq!(
            registry.get("1").await.unwrap().state().await,
            LightState::default()
        );
        assert!(registry.toggle("7").await.is_err());
    }

    #[tokio::test]
    async fn test_notifications() {
        let registry = Registry::new(1);
        let mut rx = registry.subscribe();

        registry
            .apply_update(
                "1",
                &StateUpdate {
                    hue: Some(5),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        registry.toggle("1").await.unwrap();

        let Event::Light(event) = rx.recv().await.unwrap();
        assert_eq!(event.key, "1");
        assert_eq!(event.kind, LightEventKind::Update);
        assert_eq!(event.state.hue, 5);

        let Event::Light(event) = rx.recv().await.unwrap();
        assert_eq!(event.kind, LightEventKind::Toggle);
        assert!(event.state.on);
    }

    #[tokio::test]
    async fn test_empty_update_is_not_notified() {
        let registry = Registry::new(1);
        let mut rx = registry.subscribe();

        let state = registry
            .apply_update("1", &StateUpdate::default())
            .await
            .unwrap();
        assert_eq!(state, LightState::default());

        registry.toggle("1").await.unwrap();

        // The first event received is the toggle
        let Event::Light(event) = rx.recv().await.unwrap();
        assert_eq!(event.kind, LightEventKind::Toggle);
    }

    #[tokio::test]
    async fn test_updates_without_subscribers() {
        let registry = Registry::new(1);

        for _ in 0..(EVENT_CAPACITY * 2) {
            registry.toggle("1").await.unwrap();
        }

        assert!(!registry.get("1").await.unwrap().state().await.on);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_updates_are_serialized() {
        let registry = Registry::new(2);
        let light = registry.get("1").await.unwrap();

        // Every write keeps hue == 2 * saturation, a reader must never see anything else
        let writers: Vec<_> = (0..200u16)
            .map(|n| {
                let registry = registry.clone();
                tokio::spawn(async move {
                    registry
                        .apply_update(
                            "1",
                            &StateUpdate {
                                hue: Some(n * 2),
                                saturation: Some((n % 128) as u8),
                                ..Default::default()
                            },
                        )
                        .await
                        .unwrap();
                })
            })
            .collect();

        let reader = tokio::spawn(async move {
            for _ in 0..500 {
                let state = light.state().await;
                assert_eq!(u32::from(state.hue) % 256, u32::from(state.saturation) * 2);
                tokio::task::yield_now().await;
            }
        });

        // The other light stays writable while light 1 is contended
        tokio::time::timeout(
            Duration::from_secs(5),
            registry.apply_update(
                "2",
                &StateUpdate {
                    on: Some(true),
                    ..Default::default()
                },
            ),
        )
        .await
        .expect("light 2 blocked")
        .unwrap();

        for writer in writers {
            writer.await.unwrap();
        }
        reader.await.unwrap();

        assert!(registry.get("2").await.unwrap().state().await.on);
    }
}
