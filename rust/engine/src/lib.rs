//! # svein-engine: Svein Rule Engine
//!
//! The rule and state engine for Svein, a multi-round trick-card game for two
//! or more players in an ephemeral room. The engine owns every legality
//! decision: deck construction and dealing, turn order, single plays and
//! two-for-one swaps, round transitions including the last-round picking
//! phase, and end-of-game scoring.
//!
//! ## Core Modules
//!
//! - [`cards`] - Card representation (Suit, Rank, Card) and display helpers
//! - [`deck`] - Seedable deck generation, shuffling, and dealing
//! - [`room`] - Room state, membership, and the turn tracker
//! - [`rules`] - Move parsing and single-play legality
//! - [`play`] - Applying single plays and two-for-one swaps
//! - [`round`] - Round finish detection, restocking, and round transitions
//! - [`last_round`] - The banking phase of the final round
//! - [`scoring`] - Final scores and standings
//! - [`repository`] - Room registry keyed by id
//! - [`logger`] - Game records serialized as JSONL
//! - [`errors`] - Error types for game operations
//!
//! ## Quick Start
//!
//! ```rust
//! use svein_engine::repository::RoomRepository;
//! use svein_engine::room::{RoomConfig, RoomStatus};
//!
//! let mut rooms = RoomRepository::new();
//! rooms
//!     .create_with_config("g1", RoomConfig::new(4, 10).with_seed(42))
//!     .unwrap();
//! rooms.join("g1", "Ann", "p1").unwrap();
//! rooms.join("g1", "Bob", "p2").unwrap();
//!
//! let started = rooms.start("g1").unwrap();
//! assert_eq!(started.status, RoomStatus::Started);
//! assert!(started.players.iter().all(|p| p.hand.len() == 10));
//! ```
//!
//! ## Deterministic Gameplay
//!
//! Each room owns a ChaCha20 RNG. Seeding the room makes every shuffle, card
//! id, and starting player reproducible:
//!
//! ```rust
//! use svein_engine::room::{Room, RoomConfig};
//!
//! let mut a = Room::new("a", RoomConfig::new(2, 3).with_seed(7));
//! let mut b = Room::new("b", RoomConfig::new(2, 3).with_seed(7));
//! for room in [&mut a, &mut b] {
//!     room.join("Ann", "p1").unwrap();
//!     room.join("Bob", "p2").unwrap();
//!     room.start().unwrap();
//! }
//! assert_eq!(a.players()[0].hand, b.players()[0].hand);
//! ```

pub mod cards;
pub mod deck;
pub mod errors;
pub mod last_round;
pub mod logger;
pub mod play;
pub mod player;
pub mod repository;
pub mod room;
pub mod round;
pub mod rules;
pub mod scoring;
