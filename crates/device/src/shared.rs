//! Shared game handle.
//!
//! One [`GameState`] lives behind one mutex for the lifetime of the loaded
//! module. Every consumer (the module itself, each open input file, the
//! diagnostic file) holds a clone of the same `Arc`, never a copy of the state.
//!
//! Calls must not nest: a closure passed to [`SharedGame::with_exclusive`] or
//! [`SharedGame::with_shared_read`] must not call back into the same handle.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tetris_chardev_core::GameState;

#[derive(Debug, Clone)]
pub struct SharedGame {
    inner: Arc<Mutex<GameState>>,
}

impl SharedGame {
    pub fn new(state: GameState) -> Self {
        Self {
            inner: Arc::new(Mutex::new(state)),
        }
    }

    // Commands cannot panic halfway through a mutation, so a poisoned lock
    // still guards a consistent state.
    fn lock(&self) -> MutexGuard<'_, GameState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run `f` with exclusive mutable access to the game
    pub fn with_exclusive<R>(&self, f: impl FnOnce(&mut GameState) -> R) -> R {
        let mut guard = self.lock();
        f(&mut guard)
    }

    /// Run `f` with read access to the game.
    ///
    /// Takes the same mutex as [`Self::with_exclusive`].
    pub fn with_shared_read<R>(&self, f: impl FnOnce(&GameState) -> R) -> R {
        let guard = self.lock();
        f(&guard)
    }

    /// Number of live holders of this handle
    pub fn handle_count(&self) -> usize {
        Arc::strong_count(&self.inner)
    }

    /// Whether two handles refer to the same game
    pub fn same_game(&self, other: &SharedGame) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tetris_chardev_types::Command;

    #[test]
    fn clones_share_one_state() {
        let a = SharedGame::new(GameState::new(1));
        let b = a.clone();
        assert!(a.same_game(&b));
        assert_eq!(a.handle_count(), 2);

        let x_before = a.with_shared_read(|g| g.active().unwrap().x);
        b.with_exclusive(|g| g.apply_command(Command::MoveRight));
        let x_after = a.with_shared_read(|g| g.active().unwrap().x);
        assert_eq!(x_after, x_before + 1);

        drop(b);
        assert_eq!(a.handle_count(), 1);
    }

    #[test]
    fn separate_handles_are_separate_games() {
        let a = SharedGame::new(GameState::new(1));
        let b = SharedGame::new(GameState::new(1));
        assert!(!a.same_game(&b));
    }

    #[test]
    fn poisoned_lock_is_recovered() {
        let game = SharedGame::new(GameState::new(1));
        let clone = game.clone();
        let _ = std::thread::spawn(move || {
            clone.with_exclusive(|_| panic!("poison"));
        })
        .join();

        assert_eq!(game.with_shared_read(|g| g.score()), 0);
    }
}
