//! Bot choosing uniformly among legal moves. Handy for fuzzing the rules.

use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::SveinBot;
use svein_engine::room::Room;
use svein_engine::rules::{PlayerMove, legal_single_plays};

#[derive(Debug)]
pub struct RandomBot {
    rng: Mutex<StdRng>,
}

impl RandomBot {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl SveinBot for RandomBot {
    fn choose_play(&self, room: &Room, player_id: &str) -> Option<PlayerMove> {
        let hand = &room.player(player_id)?.hand;
        let mut moves: Vec<PlayerMove> = legal_single_plays(hand, room.last_played_card())
            .into_iter()
            .map(|c| PlayerMove::Single(c.id))
            .collect();
        moves.extend(
            hand.windows(2)
                .filter(|w| w[0].rank == w[1].rank)
                .map(|w| PlayerMove::TwoForOne(w[0].id, w[1].id)),
        );
        if moves.is_empty() {
            return None;
        }
        let mut rng = self.rng.lock().ok()?;
        let pick = rng.random_range(0..moves.len());
        Some(moves[pick])
    }

    fn wants_new_card(&self, room: &Room, player_id: &str) -> bool {
        let Some(player) = room.player(player_id) else {
            return false;
        };
        if player.last_round_cards.is_empty() {
            return true;
        }
        match self.rng.lock() {
            Ok(mut rng) => rng.random_bool(0.5),
            Err(_) => false,
        }
    }

    fn name(&self) -> &str {
        "RandomBot"
    }
}
