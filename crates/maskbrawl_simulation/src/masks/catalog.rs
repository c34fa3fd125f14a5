//! MaskCatalog — реестр определений масок
//!
//! Определения неизменяемые и шарятся через Arc между всеми экземплярами.

use bevy::prelude::*;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Статическое описание маски (из конфига)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaskDefinition {
    /// Визуальная ссылка (texture path для презентации)
    pub texture: String,
    pub name: String,
    pub category: String,
    /// Фраза, которая всплывает когда маску сбили или украли
    #[serde(default)]
    pub phrase: Option<String>,
}

impl MaskDefinition {
    pub fn new(name: impl Into<String>, category: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            texture: format!("masks/{}.png", name.to_lowercase()),
            name,
            category: category.into(),
            phrase: None,
        }
    }

    pub fn with_phrase(mut self, phrase: impl Into<String>) -> Self {
        self.phrase = Some(phrase.into());
        self
    }

    /// Фраза для popup (пустая строка если её нет)
    pub fn phrase_or_empty(&self) -> &str {
        self.phrase.as_deref().unwrap_or("")
    }
}

/// Уникальный id экземпляра маски (стабилен при переносе между стеками)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct MaskInstanceId(pub u64);

/// Экземпляр маски на голове бойца
#[derive(Debug, Clone, PartialEq)]
pub struct MaskInstance {
    pub id: MaskInstanceId,
    pub definition: Arc<MaskDefinition>,
    /// Текущий владелец (None — маска сбита и выброшена)
    pub owner: Option<Entity>,
}

impl MaskInstance {
    pub fn phrase(&self) -> &str {
        self.definition.phrase_or_empty()
    }
}

/// Resource: реестр масок + генератор id
#[derive(Resource, Debug, Clone, Default)]
pub struct MaskCatalog {
    definitions: Vec<Arc<MaskDefinition>>,
    next_instance_id: u64,
}

impl MaskCatalog {
    pub fn new(definitions: impl IntoIterator<Item = MaskDefinition>) -> Self {
        Self {
            definitions: definitions.into_iter().map(Arc::new).collect(),
            next_instance_id: 0,
        }
    }

    /// Встроенный набор масок (используется когда конфиг не задан)
    pub fn builtin() -> Self {
        Self::new(builtin_definitions())
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    pub fn definitions(&self) -> &[Arc<MaskDefinition>] {
        &self.definitions
    }

    pub fn register(&mut self, definition: MaskDefinition) -> Arc<MaskDefinition> {
        let definition = Arc::new(definition);
        self.definitions.push(definition.clone());
        definition
    }

    /// Равномерный выбор из каталога (None если каталог пуст)
    pub fn random_definition<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Arc<MaskDefinition>> {
        if self.definitions.is_empty() {
            return None;
        }
        let index = rng.gen_range(0..self.definitions.len());
        Some(self.definitions[index].clone())
    }

    /// Новый экземпляр, привязанный к определению (без владельца)
    pub fn create_instance(&mut self, definition: Arc<MaskDefinition>) -> MaskInstance {
        let id = MaskInstanceId(self.next_instance_id);
        self.next_instance_id += 1;

        MaskInstance {
            id,
            definition,
            owner: None,
        }
    }

    pub fn create_random<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<MaskInstance> {
        let definition = self.random_definition(rng)?;
        Some(self.create_instance(definition))
    }
}

pub fn builtin_definitions() -> Vec<MaskDefinition> {
    vec![
        MaskDefinition::new("Oni", "demon").with_phrase("Lost your horns!"),
        MaskDefinition::new("Kitsune", "spirit").with_phrase("Outfoxed!"),
        MaskDefinition::new("Luchador", "wrestler").with_phrase("Unmasked!"),
        MaskDefinition::new("Tragedy", "theatre").with_phrase("How tragic."),
        MaskDefinition::new("Comedy", "theatre"),
        MaskDefinition::new("Hannya", "demon").with_phrase("Jealous much?"),
    ]
}
