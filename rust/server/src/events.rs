use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use svein_engine::cards::Card;
use svein_engine::player::Player;
use svein_engine::room::{PlayerId, RoomId, RoomStatus, RoomSummary};
use tokio::sync::mpsc;

// Bounded so a stalled subscriber cannot grow memory without limit; events to
// a full subscriber are dropped and the subscriber is removed.
const EVENT_CHANNEL_BUFFER: usize = 1000;

/// Channel every connection listens to for room list changes.
pub const LOBBY_CHANNEL: &str = "lobby";

/// Events go to a channel: a room id for table-wide news, a player id for
/// private news (hands, turn prompts), or [`LOBBY_CHANNEL`].
pub type ChannelId = String;

pub type EventSender = mpsc::Sender<GameEvent>;
pub type EventReceiver = mpsc::Receiver<GameEvent>;

pub struct EventSubscription {
    bus: EventBus,
    channel: ChannelId,
    subscriber_id: usize,
    pub receiver: EventReceiver,
}

impl EventSubscription {
    pub fn receiver(&mut self) -> &mut EventReceiver {
        &mut self.receiver
    }

    /// Every event already queued, without waiting.
    pub fn drain(&mut self) -> Vec<GameEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.receiver.try_recv() {
            events.push(event);
        }
        events
    }
}

impl Drop for EventSubscription {
    fn drop(&mut self) {
        self.bus.unsubscribe(&self.channel, self.subscriber_id);
    }
}

#[derive(Debug, Clone, Default)]
pub struct EventBus {
    inner: Arc<EventBusInner>,
}

#[derive(Debug, Default)]
struct EventBusInner {
    subscribers: RwLock<HashMap<ChannelId, Vec<(usize, EventSender)>>>,
    next_id: AtomicUsize,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, channel: impl Into<ChannelId>) -> EventSubscription {
        let channel = channel.into();
        let (subscriber_id, receiver) = self.subscribe_raw(channel.clone());
        EventSubscription {
            bus: self.clone(),
            channel,
            subscriber_id,
            receiver,
        }
    }

    fn subscribe_raw(&self, channel: ChannelId) -> (usize, EventReceiver) {
        let (tx, rx) = mpsc::channel(EVENT_CHANNEL_BUFFER);
        let id = self.inner.next_id.fetch_add(1, Ordering::AcqRel);
        let mut guard = self
            .inner
            .subscribers
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        guard.entry(channel.clone()).or_default().push((id, tx));

        tracing::info!(
            channel = %channel,
            subscriber_id = id,
            "client subscribed to events"
        );

        (id, rx)
    }

    pub fn broadcast(&self, channel: &str, event: GameEvent) {
        tracing::debug!(
            channel = %channel,
            event_type = event.kind(),
            "broadcasting event"
        );

        let subscribers = {
            let guard = self
                .inner
                .subscribers
                .read()
                .unwrap_or_else(PoisonError::into_inner);
            guard.get(channel).cloned()
        };

        let Some(list) = subscribers else {
            tracing::trace!(channel = %channel, "no subscribers for channel");
            return;
        };

        let mut failed = Vec::new();
        for (id, sender) in list {
            // try_send never blocks; a full or closed channel drops the subscriber
            if let Err(e) = sender.try_send(event.clone()) {
                tracing::warn!(
                    channel = %channel,
                    subscriber_id = id,
                    error = ?e,
                    "failed to send event to subscriber"
                );
                failed.push(id);
            }
        }
        if !failed.is_empty() {
            self.remove_subscribers(channel, &failed);
        }
    }

    pub fn unsubscribe(&self, channel: &str, subscriber_id: usize) {
        self.remove_subscribers(channel, &[subscriber_id]);
    }

    /// Forgets every subscriber of a channel, e.g. when its room is deleted.
    pub fn drop_channel(&self, channel: &str) {
        let mut guard = self
            .inner
            .subscribers
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        guard.remove(channel);
    }

    pub fn subscriber_count(&self) -> usize {
        let guard = self
            .inner
            .subscribers
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        guard.values().map(|list| list.len()).sum()
    }

    fn remove_subscribers(&self, channel: &str, ids: &[usize]) {
        let mut guard = self
            .inner
            .subscribers
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(list) = guard.get_mut(channel) {
            list.retain(|(id, _)| !ids.contains(id));
            if list.is_empty() {
                guard.remove(channel);
            }
        }
    }
}

/// Public view of a seated player. Never carries the hand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerInfo {
    pub id: PlayerId,
    pub name: String,
    pub hand_size: usize,
    pub saved_cards: usize,
}

impl From<&Player> for PlayerInfo {
    fn from(player: &Player) -> Self {
        Self {
            id: player.id.clone(),
            name: player.name.clone(),
            hand_size: player.hand.len(),
            saved_cards: player.saved_cards.len(),
        }
    }
}

/// One line of the final standings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Standing {
    pub player_id: PlayerId,
    pub name: String,
    pub score: u32,
    pub position: usize,
    pub saved_cards: Vec<Card>,
}

impl From<&Player> for Standing {
    fn from(player: &Player) -> Self {
        Self {
            player_id: player.id.clone(),
            name: player.name.clone(),
            score: player.score.unwrap_or(0),
            position: player.position.unwrap_or(0),
            saved_cards: player.saved_cards.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    /// Lobby: the set of rooms changed
    RoomsUpdated {
        rooms: Vec<RoomSummary>,
    },
    RoomCreated {
        room: RoomSummary,
    },
    PlayerJoined {
        room_id: RoomId,
        player_id: PlayerId,
        player_name: String,
    },
    PlayerLeft {
        room_id: RoomId,
        player_id: PlayerId,
        /// The game ended because too few players remain
        terminated: bool,
    },
    GameStarted {
        room_id: RoomId,
        players: Vec<PlayerInfo>,
        first_player: String,
        round: u32,
        status: RoomStatus,
    },
    CardsPlayed {
        room_id: RoomId,
        player_name: String,
        card: Card,
        next_player: String,
    },
    TwoForOne {
        room_id: RoomId,
        player_name: String,
        discarded: Vec<Card>,
        next_player: String,
    },
    RoundStarted {
        room_id: RoomId,
        round: u32,
        first_player: String,
    },
    /// The picking phase opened; the first pick is shown to the table
    LastRoundStarted {
        room_id: RoomId,
        first_player: String,
        pick_pile: Vec<Card>,
    },
    LastRoundPicked {
        room_id: RoomId,
        player_name: String,
        pick_pile: Vec<Card>,
        next_player: String,
    },
    GameFinished {
        room_id: RoomId,
        standings: Vec<Standing>,
    },
    RoomClosed {
        room_id: RoomId,
    },
    /// Private: the player's cards for a new round
    NewHand {
        room_id: RoomId,
        round: u32,
        cards: Vec<Card>,
        saved_cards: Vec<Card>,
    },
    /// Private: the player's saved pile after banking
    SavedCards {
        room_id: RoomId,
        saved_cards: Vec<Card>,
    },
    /// Private: it is the player's turn
    YourTurn {
        room_id: RoomId,
    },
}

impl GameEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            GameEvent::RoomsUpdated { .. } => "rooms_updated",
            GameEvent::RoomCreated { .. } => "room_created",
            GameEvent::PlayerJoined { .. } => "player_joined",
            GameEvent::PlayerLeft { .. } => "player_left",
            GameEvent::GameStarted { .. } => "game_started",
            GameEvent::CardsPlayed { .. } => "cards_played",
            GameEvent::TwoForOne { .. } => "two_for_one",
            GameEvent::RoundStarted { .. } => "round_started",
            GameEvent::LastRoundStarted { .. } => "last_round_started",
            GameEvent::LastRoundPicked { .. } => "last_round_picked",
            GameEvent::GameFinished { .. } => "game_finished",
            GameEvent::RoomClosed { .. } => "room_closed",
            GameEvent::NewHand { .. } => "new_hand",
            GameEvent::SavedCards { .. } => "saved_cards",
            GameEvent::YourTurn { .. } => "your_turn",
        }
    }
}
