//! TargetRegistry: живые боевые цели (враги, манекены)
//!
//! # Architecture
//! - O(1) register/unregister через HashSet на каждый вид цели
//! - Читатели (hit resolution, AI, lock-on) видят отсортированный snapshot,
//!   который пересобирается лениво по dirty флагу (`refresh`), поэтому
//!   структурные изменения внутри кадра не ломают итерацию
//! - Lifecycle: `Targetable` добавлен → register, удалён/despawn → unregister
//!
//! Устаревший handle в snapshot живёт не дольше одного tick; читатели
//! всё равно фильтруют его через `Query::get`.

use bevy::prelude::*;
use std::collections::HashSet;

use crate::logger;

/// Вид цели
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum TargetKind {
    Enemy,
    TrainingDummy,
}

/// Маркер: entity участвует в registry
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct Targetable {
    pub kind: TargetKind,
}

impl Targetable {
    pub fn enemy() -> Self {
        Self {
            kind: TargetKind::Enemy,
        }
    }

    pub fn training_dummy() -> Self {
        Self {
            kind: TargetKind::TrainingDummy,
        }
    }
}

/// Live-set одного вида + кэшированный snapshot
#[derive(Debug, Default)]
struct TargetSet {
    live: HashSet<Entity>,
    snapshot: Vec<Entity>,
    dirty: bool,
}

impl TargetSet {
    fn insert(&mut self, entity: Entity) -> bool {
        let changed = self.live.insert(entity);
        self.dirty |= changed;
        changed
    }

    fn remove(&mut self, entity: Entity) -> bool {
        let changed = self.live.remove(&entity);
        self.dirty |= changed;
        changed
    }

    fn refresh(&mut self) {
        if !self.dirty {
            return;
        }
        self.snapshot.clear();
        self.snapshot.extend(self.live.iter().copied());
        // Порядок HashSet случаен: сортируем для детерминизма
        self.snapshot.sort_by_key(|entity| entity.index());
        self.dirty = false;
    }
}

/// Registry боевых целей (resource)
#[derive(Resource, Debug, Default)]
pub struct TargetRegistry {
    enemies: TargetSet,
    dummies: TargetSet,
}

impl TargetRegistry {
    fn set_mut(&mut self, kind: TargetKind) -> &mut TargetSet {
        match kind {
            TargetKind::Enemy => &mut self.enemies,
            TargetKind::TrainingDummy => &mut self.dummies,
        }
    }

    /// `true` если entity не было в registry
    pub fn register(&mut self, entity: Entity, kind: TargetKind) -> bool {
        self.set_mut(kind).insert(entity)
    }

    /// Убрать из всех видов. `true` если entity был зарегистрирован.
    pub fn unregister(&mut self, entity: Entity) -> bool {
        let from_enemies = self.enemies.remove(entity);
        let from_dummies = self.dummies.remove(entity);
        from_enemies || from_dummies
    }

    pub fn contains(&self, entity: Entity) -> bool {
        self.enemies.live.contains(&entity) || self.dummies.live.contains(&entity)
    }

    pub fn kind_of(&self, entity: Entity) -> Option<TargetKind> {
        if self.enemies.live.contains(&entity) {
            Some(TargetKind::Enemy)
        } else if self.dummies.live.contains(&entity) {
            Some(TargetKind::TrainingDummy)
        } else {
            None
        }
    }

    pub fn enemy_count(&self) -> usize {
        self.enemies.live.len()
    }

    pub fn dummy_count(&self) -> usize {
        self.dummies.live.len()
    }

    /// Пересобрать snapshots (no-op если ничего не менялось)
    pub fn refresh(&mut self) {
        self.enemies.refresh();
        self.dummies.refresh();
    }

    pub fn is_dirty(&self) -> bool {
        self.enemies.dirty || self.dummies.dirty
    }

    /// Snapshot врагов на момент последнего `refresh`
    pub fn enemies(&self) -> &[Entity] {
        &self.enemies.snapshot
    }

    /// Snapshot манекенов на момент последнего `refresh`
    pub fn dummies(&self) -> &[Entity] {
        &self.dummies.snapshot
    }

    /// Все цели (враги, затем манекены) в радиусе `range` от `point`
    ///
    /// `position_of` возвращает `None` для устаревших handles: они пропускаются.
    pub fn targets_in_range(
        &self,
        point: Vec3,
        range: f32,
        position_of: impl Fn(Entity) -> Option<Vec3>,
        out: &mut Vec<Entity>,
    ) {
        let range_sq = range * range;
        for &entity in self.enemies().iter().chain(self.dummies()) {
            // Снят с регистрации после refresh (смерть в этом tick)
            if !self.contains(entity) {
                continue;
            }
            let Some(position) = position_of(entity) else {
                continue;
            };
            if position.distance_squared(point) <= range_sq {
                out.push(entity);
            }
        }
    }
}

/// Система: синхронизация registry с `Targetable` компонентами
///
/// Добавленные → register, удалённые (или despawn) → unregister, затем refresh.
pub fn sync_target_registry(
    added: Query<(Entity, &Targetable), Added<Targetable>>,
    mut removed: RemovedComponents<Targetable>,
    mut registry: ResMut<TargetRegistry>,
) {
    for entity in removed.read() {
        if registry.unregister(entity) {
            logger::log(&format!("🗑️ TargetRegistry: unregistered {:?}", entity));
        }
    }

    for (entity, targetable) in added.iter() {
        if registry.register(entity, targetable.kind) {
            logger::log(&format!(
                "📋 TargetRegistry: registered {:?} ({:?})",
                entity, targetable.kind
            ));
        }
    }

    registry.refresh();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_is_idempotent() {
        let mut registry = TargetRegistry::default();
        let enemy = Entity::from_raw(3);

        assert!(registry.register(enemy, TargetKind::Enemy));
        assert!(!registry.register(enemy, TargetKind::Enemy));
        assert_eq!(registry.enemy_count(), 1);
        assert_eq!(registry.kind_of(enemy), Some(TargetKind::Enemy));

        assert!(registry.unregister(enemy));
        assert!(!registry.unregister(enemy));
        assert!(!registry.contains(enemy));
    }

    #[test]
    fn test_snapshot_rebuilds_lazily_and_sorted() {
        let mut registry = TargetRegistry::default();
        registry.register(Entity::from_raw(9), TargetKind::Enemy);
        registry.register(Entity::from_raw(2), TargetKind::Enemy);
        registry.register(Entity::from_raw(5), TargetKind::TrainingDummy);

        // До refresh snapshot пуст
        assert!(registry.enemies().is_empty());
        assert!(registry.is_dirty());

        registry.refresh();
        assert!(!registry.is_dirty());
        assert_eq!(registry.enemies(), &[Entity::from_raw(2), Entity::from_raw(9)]);
        assert_eq!(registry.dummies(), &[Entity::from_raw(5)]);
    }

    #[test]
    fn test_range_query_skips_stale_and_far() {
        let mut registry = TargetRegistry::default();
        let near = Entity::from_raw(1);
        let far = Entity::from_raw(2);
        let stale = Entity::from_raw(3);
        let dead = Entity::from_raw(4);
        for entity in [near, far, stale, dead] {
            registry.register(entity, TargetKind::Enemy);
        }
        registry.refresh();
        // Умер в этом tick: snapshot ещё содержит, live-set уже нет
        registry.unregister(dead);

        let position_of = |entity: Entity| match entity.index() {
            1 | 4 => Some(Vec3::new(1.0, 0.0, 0.0)),
            2 => Some(Vec3::new(10.0, 0.0, 0.0)),
            _ => None,
        };

        let mut out = Vec::new();
        registry.targets_in_range(Vec3::ZERO, 2.5, position_of, &mut out);
        assert_eq!(out, vec![near]);
    }
}
