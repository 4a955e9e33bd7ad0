//! LOD throttling врагов по дистанции до игрока

use bevy::prelude::*;

use crate::ai::components::{Enemy, EnemyLod};
use crate::combat::Dead;
use crate::components::{CharacterMotion, Player};
use crate::logger;

/// Система: LOD tick + сброс displacement
///
/// Должна идти первой в AI цепочке: behavior/gravity смотрят на `is_due()`.
pub fn update_enemy_lod(
    time: Res<Time<Fixed>>,
    players: Query<&Transform, With<Player>>,
    mut enemies: Query<
        (Entity, &Transform, &mut EnemyLod, &mut CharacterMotion),
        (With<Enemy>, Without<Dead>),
    >,
) {
    let now = time.elapsed_secs_f64();
    let tick_dt = time.delta_secs();
    let player_position = players.iter().next().map(|transform| transform.translation);

    for (entity, transform, mut lod, mut motion) in enemies.iter_mut() {
        motion.begin_tick();

        let previous = lod.interval();
        let distance_sq = player_position.map(|player| transform.translation.distance_squared(player));
        lod.tick(distance_sq, now, tick_dt);

        if lod.interval() != previous {
            logger::log(&format!(
                "📡 Enemy {:?}: LOD interval {} → {}",
                entity,
                previous,
                lod.interval()
            ));
        }
    }
}
