//! CharacterUnlocks: открытые персонажи игрока + выбор текущего
//!
//! Победа над врагом открывает его `character_model_id`. Порядок cycle =
//! порядок открытия (детерминированный), индекс оборачивается по модулю.

use bevy::prelude::*;

/// Направление переключения персонажа
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum CycleDirection {
    Forward,
    Reverse,
}

/// Открытые персонажи (resource)
#[derive(Resource, Debug, Clone, Default, PartialEq, Eq)]
pub struct CharacterUnlocks {
    unlocked: Vec<String>,
    current_index: usize,
}

impl CharacterUnlocks {
    /// Персонажи, открытые с самого начала (первый = текущий)
    pub fn with_defaults<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut unlocks = Self::default();
        for id in ids {
            unlocks.unlock(id);
        }
        unlocks
    }

    /// `false` если персонаж уже открыт (повтор игнорируется)
    pub fn unlock(&mut self, character_id: impl Into<String>) -> bool {
        let character_id = character_id.into();
        if self.is_unlocked(&character_id) {
            return false;
        }
        self.unlocked.push(character_id);
        true
    }

    pub fn is_unlocked(&self, character_id: &str) -> bool {
        self.unlocked.iter().any(|id| id == character_id)
    }

    pub fn unlocked(&self) -> &[String] {
        &self.unlocked
    }

    pub fn count(&self) -> usize {
        self.unlocked.len()
    }

    pub fn current(&self) -> Option<&str> {
        self.unlocked.get(self.current_index).map(String::as_str)
    }

    /// Выбрать открытого персонажа текущим. `false` если он не открыт.
    pub fn select(&mut self, character_id: &str) -> bool {
        match self.unlocked.iter().position(|id| id == character_id) {
            Some(index) => {
                self.current_index = index;
                true
            }
            None => false,
        }
    }

    /// Следующий персонаж по кругу. Меньше двух открытых → `None`.
    pub fn cycle(&mut self, direction: CycleDirection) -> Option<&str> {
        let count = self.unlocked.len();
        if count < 2 {
            return None;
        }

        self.current_index = match direction {
            CycleDirection::Forward => (self.current_index + 1) % count,
            CycleDirection::Reverse => (self.current_index + count - 1) % count,
        };
        self.current()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeat_unlock_is_noop() {
        let mut unlocks = CharacterUnlocks::with_defaults(["ronin"]);

        assert!(unlocks.unlock("knight"));
        assert!(!unlocks.unlock("knight"));
        assert!(!unlocks.unlock("ronin"));

        assert_eq!(unlocks.count(), 2);
        assert!(unlocks.is_unlocked("knight"));
        assert!(!unlocks.is_unlocked("samurai"));
    }

    #[test]
    fn test_cycle_needs_two_characters() {
        let mut empty = CharacterUnlocks::default();
        assert_eq!(empty.cycle(CycleDirection::Forward), None);
        assert_eq!(empty.current(), None);

        let mut single = CharacterUnlocks::with_defaults(["ronin"]);
        assert_eq!(single.cycle(CycleDirection::Forward), None);
        assert_eq!(single.cycle(CycleDirection::Reverse), None);
        assert_eq!(single.current(), Some("ronin"));
    }

    #[test]
    fn test_cycle_wraps_forward() {
        let mut unlocks = CharacterUnlocks::with_defaults(["ronin", "knight", "samurai"]);

        assert_eq!(unlocks.cycle(CycleDirection::Forward), Some("knight"));
        assert_eq!(unlocks.cycle(CycleDirection::Forward), Some("samurai"));
        assert_eq!(unlocks.cycle(CycleDirection::Forward), Some("ronin"));
    }

    #[test]
    fn test_cycle_wraps_reverse() {
        let mut unlocks = CharacterUnlocks::with_defaults(["ronin", "knight", "samurai"]);

        // С индекса 0 назад: на последнего
        assert_eq!(unlocks.cycle(CycleDirection::Reverse), Some("samurai"));
        assert_eq!(unlocks.cycle(CycleDirection::Reverse), Some("knight"));
        assert_eq!(unlocks.cycle(CycleDirection::Reverse), Some("ronin"));
    }

    #[test]
    fn test_select_only_unlocked() {
        let mut unlocks = CharacterUnlocks::with_defaults(["ronin", "knight"]);

        assert!(unlocks.select("knight"));
        assert_eq!(unlocks.current(), Some("knight"));
        assert!(!unlocks.select("samurai"));
        assert_eq!(unlocks.current(), Some("knight"));

        // Новый unlock не сдвигает текущего
        unlocks.unlock("samurai");
        assert_eq!(unlocks.current(), Some("knight"));
        assert_eq!(unlocks.cycle(CycleDirection::Forward), Some("samurai"));
    }
}
