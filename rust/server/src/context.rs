use std::sync::Arc;

use crate::events::EventBus;
use crate::rooms::RoomService;
use crate::settings::{AppSettings, SettingsError, SettingsStore};

/// Shared components handed to every connection handler.
#[derive(Debug, Clone)]
pub struct AppContext {
    event_bus: Arc<EventBus>,
    settings: Arc<SettingsStore>,
    rooms: Arc<RoomService>,
}

impl AppContext {
    pub fn new(settings: AppSettings) -> Result<Self, SettingsError> {
        let event_bus = Arc::new(EventBus::new());
        let settings = Arc::new(SettingsStore::with_settings(settings)?);
        let rooms = Arc::new(RoomService::new(
            Arc::clone(&event_bus),
            Arc::clone(&settings),
        ));
        Ok(Self::new_with_dependencies(event_bus, settings, rooms))
    }

    pub fn new_with_dependencies(
        event_bus: Arc<EventBus>,
        settings: Arc<SettingsStore>,
        rooms: Arc<RoomService>,
    ) -> Self {
        Self {
            event_bus,
            settings,
            rooms,
        }
    }

    pub fn new_for_tests() -> Self {
        let event_bus = Arc::new(EventBus::new());
        let settings = Arc::new(SettingsStore::new());
        let rooms = Arc::new(RoomService::new(
            Arc::clone(&event_bus),
            Arc::clone(&settings),
        ));
        Self::new_with_dependencies(event_bus, settings, rooms)
    }

    pub fn event_bus(&self) -> Arc<EventBus> {
        Arc::clone(&self.event_bus)
    }

    pub fn settings(&self) -> Arc<SettingsStore> {
        Arc::clone(&self.settings)
    }

    pub fn rooms(&self) -> Arc<RoomService> {
        Arc::clone(&self.rooms)
    }
}
