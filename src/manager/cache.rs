extern crate alloc;

use alloc::collections::VecDeque;
use alloc::string::String;
use alloc::sync::Arc;

#[cfg(all(not(feature = "std"), feature = "alloc"))]
use hashbrown::HashMap;
#[cfg(feature = "std")]
use std::collections::HashMap;

use crate::game::Game;
use crate::sync::Shared;

/// A live game; `None` once the game has been deleted.
pub type Session = Shared<Option<Game>>;

/// Live games keyed by id, evicted least-recently-used first.
///
/// A game held by an in-flight action is never evicted, so two copies of the
/// same game can never be live at once.
#[derive(Debug)]
pub struct SessionCache {
    capacity: usize,
    entries: HashMap<String, Session>,
    recency: VecDeque<String>,
}

impl SessionCache {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            entries: HashMap::with_capacity(capacity),
            recency: VecDeque::with_capacity(capacity),
        }
    }

    pub fn get(&mut self, game_id: &str) -> Option<Session> {
        let game = self.entries.get(game_id).cloned()?;
        self.touch(game_id);
        Some(game)
    }

    /// Inserts a game and returns the id evicted to make room.
    pub fn insert(&mut self, game_id: String, game: Session) -> Option<String> {
        if self.entries.insert(game_id.clone(), game).is_some() {
            self.touch(&game_id);
            return None;
        }
        self.recency.push_back(game_id);

        if self.entries.len() > self.capacity {
            return self.evict();
        }
        None
    }

    pub fn remove(&mut self, game_id: &str) -> Option<Session> {
        let game = self.entries.remove(game_id)?;
        self.recency.retain(|id| id != game_id);
        Some(game)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    fn touch(&mut self, game_id: &str) {
        let Some(pos) = self.recency.iter().position(|id| id == game_id) else {
            return;
        };
        if let Some(id) = self.recency.remove(pos) {
            self.recency.push_back(id);
        }
    }

    /// Drops the least recently used idle game. Over capacity is tolerated
    /// while every game is busy.
    fn evict(&mut self) -> Option<String> {
        let pos = self.recency.iter().position(|id| {
            self.entries
                .get(id)
                .is_some_and(|game| Arc::strong_count(game) == 1)
        })?;
        let id = self.recency.remove(pos)?;
        self.entries.remove(&id);
        Some(id)
    }
}
