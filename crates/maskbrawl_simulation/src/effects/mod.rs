//! Delayed cosmetic effects
//!
//! Всё, что в движке было бы coroutine/tween: фраза над бойцом,
//! combo cinematic. Каждый эффект — PendingTimer, повторный trigger
//! заменяет ожидающий.

use bevy::ecs::schedule::InternedScheduleLabel;
use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub mod timer;

pub use timer::PendingTimer;

use crate::combat::HitLanded;
use crate::player::ComboTriggered;
use crate::ArenaSet;

#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectSettings {
    /// Сколько секунд фраза маски висит над атакующим
    pub phrase_display_time: f32,
}

impl Default for EffectSettings {
    fn default() -> Self {
        Self {
            phrase_display_time: 1.5,
        }
    }
}

/// Показать фразу над бойцом
#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub struct PhraseShown {
    pub entity: Entity,
    pub phrase: String,
}

/// Спрятать фразу
#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub struct PhraseHidden {
    pub entity: Entity,
    pub phrase: String,
}

/// Combo cinematic закончился (камера возвращается)
#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub struct CinematicFinished {
    pub entity: Entity,
    pub cinematic: String,
}

/// Resource: фразы на экране (по одной на бойца)
#[derive(Resource, Debug, Default)]
pub struct PhrasePopups {
    pending: BTreeMap<Entity, PendingTimer<String>>,
}

impl PhrasePopups {
    pub fn visible(&self, entity: Entity) -> Option<&str> {
        self.pending
            .get(&entity)
            .and_then(|timer| timer.payload())
            .map(String::as_str)
    }
}

/// Resource: текущий cinematic (один на матч)
#[derive(Resource, Debug, Default)]
pub struct CinematicDirector {
    running: PendingTimer<(Entity, String)>,
}

impl CinematicDirector {
    pub fn is_playing(&self) -> bool {
        self.running.is_pending()
    }

    pub fn current(&self) -> Option<&str> {
        self.running.payload().map(|(_, cinematic)| cinematic.as_str())
    }
}

/// Система: HitLanded с фразой → PhraseShown, через phrase_display_time → PhraseHidden
pub fn show_hit_phrases(
    mut landed: EventReader<HitLanded>,
    mut shown: EventWriter<PhraseShown>,
    mut hidden: EventWriter<PhraseHidden>,
    mut popups: ResMut<PhrasePopups>,
    settings: Res<EffectSettings>,
    time: Res<Time>,
) {
    let delta = time.delta_secs();

    // Сначала тикаем старые, чтобы новая фраза прожила полный срок
    for (entity, timer) in popups.pending.iter_mut() {
        if let Some(phrase) = timer.tick(delta) {
            hidden.write(PhraseHidden {
                entity: *entity,
                phrase,
            });
        }
    }
    popups.pending.retain(|_, timer| timer.is_pending());

    for hit in landed.read() {
        if hit.phrase.is_empty() {
            continue;
        }

        popups
            .pending
            .entry(hit.attacker)
            .or_default()
            .schedule(hit.phrase.clone(), settings.phrase_display_time);
        shown.write(PhraseShown {
            entity: hit.attacker,
            phrase: hit.phrase.clone(),
        });
    }
}

/// Система: ComboTriggered → cinematic, по окончании CinematicFinished
pub fn run_combo_cinematics(
    mut combos: EventReader<ComboTriggered>,
    mut finished: EventWriter<CinematicFinished>,
    mut director: ResMut<CinematicDirector>,
    time: Res<Time>,
) {
    if let Some((entity, cinematic)) = director.running.tick(time.delta_secs()) {
        finished.write(CinematicFinished { entity, cinematic });
    }

    for combo in combos.read() {
        crate::logger::log(&format!("🎬 Cinematic {} for {:?}", combo.cinematic, combo.entity));
        if let Some((_, interrupted)) = director
            .running
            .schedule((combo.entity, combo.cinematic.clone()), combo.duration)
        {
            crate::logger::log(&format!("🎬 Cinematic {} interrupted", interrupted));
        }
    }
}

/// Effects Plugin
pub struct EffectsPlugin {
    pub schedule: InternedScheduleLabel,
}

impl Plugin for EffectsPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<PhraseShown>()
            .add_event::<PhraseHidden>()
            .add_event::<CinematicFinished>()
            .init_resource::<EffectSettings>()
            .init_resource::<PhrasePopups>()
            .init_resource::<CinematicDirector>()
            .add_systems(
                self.schedule,
                (show_hit_phrases, run_combo_cinematics).in_set(ArenaSet::Effects),
            );
    }
}
