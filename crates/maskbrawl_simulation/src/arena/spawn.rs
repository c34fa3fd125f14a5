//! Spawn матча: игрок + AI, взаимные Opponent, стартовые маски

use bevy::prelude::*;

use super::Match;
use crate::ai::AiBrain;
use crate::combat::CombatState;
use crate::components::{Combatant, MovementIntent, Opponent, Player, Territory};
use crate::config::MatchConfig;
use crate::masks::{deal_masks, MaskCatalog};
use crate::player::{ComboTracker, PlayerInput};
use crate::DeterministicRng;

/// Создать обоих бойцов и resource `Match`
///
/// Каталог и RNG берутся из мира (если их нет — создаются из конфига),
/// поэтому раздача масок детерминирована seed'ом.
pub fn spawn_match(world: &mut World, config: &MatchConfig) -> Match {
    if !world.contains_resource::<MaskCatalog>() {
        world.insert_resource(MaskCatalog::new(config.mask_catalog.clone()));
    }
    if !world.contains_resource::<DeterministicRng>() {
        world.insert_resource(DeterministicRng::new(config.seed));
    }

    let player = world.spawn_empty().id();
    let ai = world.spawn_empty().id();

    let count = config.masks.initial_mask_count;
    let (player_masks, ai_masks) = world.resource_scope(|world, mut catalog: Mut<MaskCatalog>| {
        let mut rng = world.resource_mut::<DeterministicRng>();
        let player_masks = deal_masks(player, count, &mut catalog, &mut rng.rng);
        let ai_masks = deal_masks(ai, count, &mut catalog, &mut rng.rng);
        (player_masks, ai_masks)
    });

    let bounds = config.arena.bounds();
    let player_position = bounds.clamp_position_in_bounds(Vec3::from_array(config.arena.player_spawn));
    let ai_position = bounds.clamp_position_in_bounds(Vec3::from_array(config.arena.ai_spawn));

    world.entity_mut(player).insert((
        Combatant::new(config.player_name.clone()),
        Player,
        PlayerInput::default(),
        ComboTracker::default(),
        CombatState::new(config.combat),
        player_masks,
        Transform::from_translation(player_position).looking_at(ai_position, Vec3::Y),
        MovementIntent::default(),
        Territory::default(),
        Opponent(ai),
    ));

    world.entity_mut(ai).insert((
        Combatant::new(config.ai_name.clone()),
        AiBrain::default(),
        config.ai.clone(),
        CombatState::new(config.combat),
        ai_masks,
        Transform::from_translation(ai_position).looking_at(player_position, Vec3::Y),
        MovementIntent::default(),
        Territory::default(),
        Opponent(player),
    ));

    let arena_match = Match::new(player, ai);
    world.insert_resource(bounds);
    world.insert_resource(arena_match.clone());

    crate::logger::log_info(&format!(
        "🎭 Match spawned: {} {:?} vs {} {:?}, {} masks each",
        config.player_name, player, config.ai_name, ai, count
    ));

    arena_match
}
