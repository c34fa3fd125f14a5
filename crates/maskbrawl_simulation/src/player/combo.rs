//! Combo tracking: цепочка последних успешных атак игрока

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::combat::AttackKind;

/// Запись таблицы комбо
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComboDefinition {
    pub name: String,
    /// Точная последовательность ударов (длина и порядок)
    pub sequence: Vec<AttackKind>,
    /// Cinematic trigger для презентации (камера, slow-mo)
    pub cinematic: String,
    /// Длительность cinematic (секунды)
    pub cinematic_duration: f32,
}

impl ComboDefinition {
    pub fn new(name: impl Into<String>, sequence: impl Into<Vec<AttackKind>>) -> Self {
        let name = name.into();
        Self {
            cinematic: format!("{}Cam", name),
            name,
            sequence: sequence.into(),
            cinematic_duration: 2.0,
        }
    }

    pub fn haymaker() -> Self {
        Self::new("Haymaker", [AttackKind::Left, AttackKind::Left, AttackKind::Right])
    }

    fn starts_with(&self, prefix: &[AttackKind]) -> bool {
        self.sequence.starts_with(prefix)
    }
}

/// Цепочка ударов игрока
#[derive(Component, Debug, Clone, Default, PartialEq)]
pub struct ComboTracker {
    sequence: Vec<AttackKind>,
    since_last_input: f32,
}

impl ComboTracker {
    pub fn sequence(&self) -> &[AttackKind] {
        &self.sequence
    }

    pub fn clear(&mut self) {
        self.sequence.clear();
    }

    pub fn tick(&mut self, delta: f32) {
        self.since_last_input += delta;
    }

    /// Успешная атака → дописать в цепочку и сравнить с таблицей.
    ///
    /// Пауза дольше `reset_time` обрывает цепочку. Точное совпадение
    /// очищает цепочку и возвращает комбо. Если цепочка больше не может
    /// стать ни одним комбо — старые удары отбрасываются.
    pub fn register<'a>(
        &mut self,
        kind: AttackKind,
        combos: &'a [ComboDefinition],
        reset_time: f32,
    ) -> Option<&'a ComboDefinition> {
        if self.since_last_input > reset_time {
            self.sequence.clear();
        }
        self.since_last_input = 0.0;
        self.sequence.push(kind);

        if let Some(combo) = combos.iter().find(|combo| combo.sequence == self.sequence) {
            self.sequence.clear();
            return Some(combo);
        }

        while !self.sequence.is_empty() && !combos.iter().any(|combo| combo.starts_with(&self.sequence)) {
            self.sequence.remove(0);
        }

        None
    }
}
