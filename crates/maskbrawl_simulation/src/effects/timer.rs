//! PendingTimer — отложенный payload с одним слотом
//!
//! Замена coroutine-задержкам: новый schedule вытесняет ожидающий payload
//! (повторный trigger отменяет предыдущий).

#[derive(Debug, Clone, PartialEq)]
pub struct PendingTimer<T> {
    slot: Option<Pending<T>>,
}

#[derive(Debug, Clone, PartialEq)]
struct Pending<T> {
    payload: T,
    remaining: f32,
}

impl<T> Default for PendingTimer<T> {
    fn default() -> Self {
        Self { slot: None }
    }
}

impl<T> PendingTimer<T> {
    /// Запланировать payload через `delay` секунд.
    /// Возвращает вытесненный payload, если он был.
    pub fn schedule(&mut self, payload: T, delay: f32) -> Option<T> {
        self.slot
            .replace(Pending {
                payload,
                remaining: delay.max(0.0),
            })
            .map(|pending| pending.payload)
    }

    pub fn cancel(&mut self) -> Option<T> {
        self.slot.take().map(|pending| pending.payload)
    }

    pub fn is_pending(&self) -> bool {
        self.slot.is_some()
    }

    pub fn remaining(&self) -> Option<f32> {
        self.slot.as_ref().map(|pending| pending.remaining)
    }

    pub fn payload(&self) -> Option<&T> {
        self.slot.as_ref().map(|pending| &pending.payload)
    }

    /// Продвинуть таймер; Some(payload) когда время вышло
    pub fn tick(&mut self, delta: f32) -> Option<T> {
        let pending = self.slot.as_mut()?;
        pending.remaining -= delta;

        if pending.remaining <= 0.0 {
            self.slot.take().map(|pending| pending.payload)
        } else {
            None
        }
    }
}
