//! Keystroke matching against the asteroid field.
//!
//! The typist is either idle (no target) or locked onto one asteroid by id.
//! A correct letter advances the lock, the last letter completes it, and any
//! wrong letter drops it. Completion only reports the id; removing the
//! asteroid and scoring belong to the session.

use super::asteroid::{Asteroid, AsteroidId};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Not a letter, or no asteroid starts with it.
    Ignored,
    Acquired(AsteroidId),
    Advanced(AsteroidId),
    /// Word finished; the asteroid is still in the field.
    Completed(AsteroidId),
    /// Wrong letter; the asteroid was released and the key discarded.
    Missed(AsteroidId),
}

#[derive(Clone, Debug, Default)]
pub struct Typist {
    typed: String,
    target: Option<AsteroidId>,
}

impl Typist {
    /// Letters typed towards the current target, empty when idle.
    pub fn current_word(&self) -> &str {
        &self.typed
    }

    pub fn target(&self) -> Option<AsteroidId> {
        self.target
    }

    pub fn reset(&mut self) {
        self.typed.clear();
        self.target = None;
    }

    /// Drop the lock if it points at `id` (e.g. the asteroid fell off screen).
    pub fn forget(&mut self, id: AsteroidId) {
        if self.target == Some(id) {
            self.reset();
        }
    }

    pub fn press(&mut self, key: char, field: &mut [Asteroid]) -> KeyOutcome {
        if !key.is_ascii_alphabetic() {
            return KeyOutcome::Ignored;
        }
        let key = key.to_ascii_lowercase();

        let Some(id) = self.target else {
            return self.acquire(key, field);
        };
        let Some(asteroid) = field.iter_mut().find(|a| a.id == id) else {
            // lock outlived its asteroid; start over with this key
            self.reset();
            return self.acquire(key, field);
        };

        let typed = self.typed.chars().count();
        match asteroid.letter_at(typed) {
            Some(expected) if expected.eq_ignore_ascii_case(&key) => {
                self.typed.push(key);
                asteroid.set_progress(typed + 1);
                if typed + 1 == asteroid.len() {
                    self.reset();
                    KeyOutcome::Completed(id)
                } else {
                    KeyOutcome::Advanced(id)
                }
            }
            _ => {
                asteroid.release();
                self.reset();
                KeyOutcome::Missed(id)
            }
        }
    }

    fn acquire(&mut self, key: char, field: &mut [Asteroid]) -> KeyOutcome {
        let Some(asteroid) = field.iter_mut().find(|a| !a.targeted && a.starts_with(key)) else {
            return KeyOutcome::Ignored;
        };
        asteroid.targeted = true;
        asteroid.set_progress(1);
        if asteroid.len() == 1 {
            return KeyOutcome::Completed(asteroid.id);
        }
        self.typed.clear();
        self.typed.push(key);
        self.target = Some(asteroid.id);
        KeyOutcome::Acquired(asteroid.id)
    }
}
