//! Hit resolution (ApplyHit)
//!
//! Чистая логика без ECS: защитник + его стек + стек атакующего.
//! Система `process_hitbox_overlaps` превращает результат в события.

use super::state::{CombatState, HitDirection, MaskRemoval};
use crate::masks::{MaskInstance, MaskStack};

/// Результат применённого удара
#[derive(Debug, Clone, PartialEq)]
pub struct HitOutcome {
    pub direction: HitDirection,
    /// Снятая маска (None если стек был пуст)
    pub removed: Option<MaskInstance>,
    pub removal: MaskRemoval,
    /// Фраза снятой маски (пусто если нет)
    pub phrase: String,
    /// Этот удар снял последнюю маску
    pub defeated: bool,
}

/// Применить удар к защитнику
///
/// None — защитник неуязвим (hurt или dash), ничего не изменилось.
/// Иначе: hurt reaction, pop (left/right) или steal (up) верхней маски.
pub fn resolve_hit(
    defender: &mut CombatState,
    defender_masks: &mut MaskStack,
    attacker_masks: &mut MaskStack,
    direction: HitDirection,
) -> Option<HitOutcome> {
    if !defender.begin_hurt() {
        return None;
    }

    let removal = direction.mask_removal();
    let removed = match removal {
        MaskRemoval::Pop => defender_masks.pop_top(),
        MaskRemoval::Steal => defender_masks.steal_top(attacker_masks),
    };

    let phrase = removed
        .as_ref()
        .map(|mask| mask.phrase().to_string())
        .unwrap_or_default();

    // Defeat только на переходе 1 → 0 и только один раз
    let defeated = removed.is_some() && defender_masks.is_empty() && defender.mark_defeated();

    Some(HitOutcome {
        direction,
        removed,
        removal,
        phrase,
        defeated,
    })
}
