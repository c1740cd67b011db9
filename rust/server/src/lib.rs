//! Multi-room Svein service.
//!
//! [`RoomService`] hosts any number of rooms at once and publishes every state
//! change on an [`EventBus`]. Transports (websocket, HTTP, in-process bots)
//! subscribe to a room id for table news, to a player id for private hands and
//! turn prompts, and to [`events::LOBBY_CHANNEL`] for the room list.

pub mod context;
pub mod errors;
pub mod events;
pub mod logging;
pub mod rooms;
pub mod settings;

pub use context::AppContext;
pub use errors::{ErrorResponse, ErrorSeverity, IntoErrorResponse, ServiceError};
pub use events::{EventBus, EventSubscription, GameEvent, PlayerInfo, Standing, LOBBY_CHANNEL};
pub use logging::{LogCapture, LogEntry};
pub use rooms::{CreateRoomRequest, LeaveReport, PickReport, PlayReport, RoomService};
pub use settings::{AppSettings, SettingsError, SettingsStore};
