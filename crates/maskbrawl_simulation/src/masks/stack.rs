//! MaskStack — стек масок бойца (LIFO)
//!
//! Инвариант: сбить или украсть можно только верхнюю маску.
//! Пустой стек = боец побеждён.

use bevy::prelude::*;

use super::catalog::MaskInstance;

#[derive(Component, Debug, Clone, Default)]
pub struct MaskStack {
    owner: Option<Entity>,
    masks: Vec<MaskInstance>,
}

impl MaskStack {
    pub fn new(owner: Entity) -> Self {
        Self {
            owner: Some(owner),
            masks: Vec::new(),
        }
    }

    pub fn with_masks(owner: Entity, masks: impl IntoIterator<Item = MaskInstance>) -> Self {
        let mut stack = Self::new(owner);
        for mask in masks {
            stack.push(mask);
        }
        stack
    }

    pub fn owner(&self) -> Option<Entity> {
        self.owner
    }

    pub fn count(&self) -> usize {
        self.masks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.masks.is_empty()
    }

    pub fn top(&self) -> Option<&MaskInstance> {
        self.masks.last()
    }

    /// Маски снизу вверх
    pub fn iter(&self) -> impl Iterator<Item = &MaskInstance> {
        self.masks.iter()
    }

    /// Кладём маску наверх, она становится top
    pub fn push(&mut self, mut mask: MaskInstance) {
        mask.owner = self.owner;
        self.masks.push(mask);
    }

    /// Снимаем верхнюю маску (None на пустом стеке, не ошибка)
    pub fn pop_top(&mut self) -> Option<MaskInstance> {
        let mut mask = self.masks.pop()?;
        mask.owner = None;
        Some(mask)
    }

    /// Крадём верхнюю маску в `to`
    ///
    /// Логическое владение переходит сразу (count обоих стеков обновлён),
    /// косметический перелёт маски — задержанный effect у презентации.
    pub fn steal_top(&mut self, to: &mut MaskStack) -> Option<MaskInstance> {
        let mask = self.masks.pop()?;
        to.push(mask);
        to.top().cloned()
    }
}
