//! Match configuration (JSON)
//!
//! Все секции `#[serde(default)]`: пустой `{}` = прототипные константы.
//! Единственное место, где симуляция возвращает ошибки.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::ai::AiConfig;
use crate::arena::ArenaSettings;
use crate::combat::CombatTuning;
use crate::effects::EffectSettings;
use crate::headless::HeadlessClipTimings;
use crate::masks::{builtin_definitions, MaskCatalog, MaskDefinition, MaskSettings};
use crate::player::PlayerSettings;
use crate::DeterministicRng;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Полная конфигурация матча
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    pub seed: u64,
    pub player_name: String,
    pub ai_name: String,
    /// Лимит тиков headless прогона (64 тика = 1 сек)
    pub max_ticks: u32,
    pub combat: CombatTuning,
    pub ai: AiConfig,
    pub player: PlayerSettings,
    pub arena: ArenaSettings,
    pub masks: MaskSettings,
    pub mask_catalog: Vec<MaskDefinition>,
    pub effects: EffectSettings,
    pub presentation: HeadlessClipTimings,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            player_name: "Player".to_string(),
            ai_name: "Rival".to_string(),
            max_ticks: 64 * 300,
            combat: CombatTuning::default(),
            ai: AiConfig::default(),
            player: PlayerSettings::default(),
            arena: ArenaSettings::default(),
            masks: MaskSettings::default(),
            mask_catalog: builtin_definitions(),
            effects: EffectSettings::default(),
            presentation: HeadlessClipTimings::default(),
        }
    }
}

impl MatchConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: MatchConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let combat = &self.combat;
        for (name, value) in [
            ("combat.attack_cooldown", combat.attack_cooldown),
            ("combat.uppercut_cooldown", combat.uppercut_cooldown),
            ("combat.dash_cooldown", combat.dash_cooldown),
            ("combat.move_speed", combat.move_speed),
            ("player.reset_time", self.player.reset_time),
            ("arena.change_side_time", self.arena.change_side_time),
            ("masks.fly_off_duration", self.masks.fly_off_duration),
            ("masks.glide_duration", self.masks.glide_duration),
            ("effects.phrase_display_time", self.effects.phrase_display_time),
        ] {
            if !(value >= 0.0) {
                return Err(ConfigError::Invalid(format!("{name} must be non-negative, got {value}")));
            }
        }

        if !(self.arena.radius > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "arena.radius must be positive, got {}",
                self.arena.radius
            )));
        }

        if self.masks.initial_mask_count > 0 && self.mask_catalog.is_empty() {
            return Err(ConfigError::Invalid(
                "mask_catalog is empty but combatants start with masks".to_string(),
            ));
        }

        let weights = self.ai.attack_weights;
        if weights.iter().any(|weight| !(*weight >= 0.0)) || weights.iter().all(|weight| *weight == 0.0) {
            return Err(ConfigError::Invalid(format!(
                "ai.attack_weights must be non-negative with at least one positive, got {weights:?}"
            )));
        }

        if let Some(combo) = self.player.combos.iter().find(|combo| combo.sequence.is_empty()) {
            return Err(ConfigError::Invalid(format!("combo {} has an empty sequence", combo.name)));
        }

        self.presentation.validate()?;

        Ok(())
    }

    /// Вставить настройки и seeded RNG в мир (до spawn_match)
    pub fn install(&self, world: &mut World) {
        world.insert_resource(DeterministicRng::new(self.seed));
        world.insert_resource(MaskCatalog::new(self.mask_catalog.clone()));
        world.insert_resource(self.masks.clone());
        world.insert_resource(self.player.clone());
        world.insert_resource(self.arena.clone());
        world.insert_resource(self.effects.clone());
        world.insert_resource(self.presentation.clone());
    }
}
