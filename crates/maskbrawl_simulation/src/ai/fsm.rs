//! AI FSM: Idle → Offensive → Defensive → Idle
//!
//! - Idle: случайное блуждание, смена направления каждые move_interval
//! - Offensive: идём к оппоненту, в радиусе — атака, далеко — рывок
//! - Defensive: отходим от оппонента defensive_duration секунд
//!
//! Глобальный override: hurt во время Offensive → Defensive.

use bevy::prelude::*;
use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::combat::{AttackKind, CombatActor, CombatState};

/// AI FSM состояния
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect, Serialize)]
pub enum AiState {
    /// Блуждание в случайных направлениях
    #[default]
    Idle,
    /// Сближение и атака
    Offensive,
    /// Отступление после атаки или удара
    Defensive,
}

/// Параметры AI
#[derive(Component, Debug, Clone, PartialEq, Reflect, Serialize, Deserialize)]
#[reflect(Component)]
#[serde(default)]
pub struct AiConfig {
    /// Радиус атаки (метры)
    pub attack_range: f32,
    /// Сколько секунд AI блуждает перед переходом в Offensive
    pub idle_duration: f32,
    /// Интервал смены случайного направления в Idle (секунды)
    pub move_interval: f32,
    /// Время отступления (секунды)
    pub defensive_duration: f32,
    /// Дальше этой дистанции Offensive сближается рывком
    pub dash_distance: f32,
    /// Веса выбора атаки [Left, Right, Uppercut]
    pub attack_weights: [f32; 3],
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            attack_range: 1.2,
            idle_duration: 2.5,
            move_interval: 0.5,
            defensive_duration: 1.5,
            dash_distance: 4.0,
            attack_weights: [1.0, 1.0, 1.0], // Равномерно
        }
    }
}

/// Что AI видит в этом тике
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AiPerception {
    pub position: Vec3,
    pub opponent_position: Vec3,
    pub opponent_hurt: bool,
    /// Сглаженный blend движения: рывок идёт туда, куда боец уже бежит
    pub dash_direction: Vec3,
}

impl AiPerception {
    pub fn to_opponent(&self) -> Vec3 {
        self.opponent_position - self.position
    }

    pub fn distance(&self) -> f32 {
        self.position.distance(self.opponent_position)
    }
}

/// Итог тика FSM (для логов и тестов)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AiTickReport {
    pub previous: AiState,
    pub state: AiState,
    pub attack: Option<AttackKind>,
    pub dashed: bool,
}

impl AiTickReport {
    pub fn transitioned(&self) -> bool {
        self.previous != self.state
    }
}

/// AI "мозг": текущее состояние + per-state таймеры
///
/// Ровно одно активное состояние на бойца.
#[derive(Component, Debug, Clone, PartialEq, Reflect)]
#[reflect(Component)]
pub struct AiBrain {
    pub state: AiState,
    pub idle_timer: f32,
    pub move_timer: f32,
    pub defensive_timer: f32,
    /// Текущее направление движения (Move каждый тик)
    pub direction: Vec3,
}

impl Default for AiBrain {
    fn default() -> Self {
        Self {
            state: AiState::Idle,
            idle_timer: 0.0,
            // Больше move_interval: первое направление выбирается сразу
            move_timer: 1.0,
            defensive_timer: 0.0,
            direction: Vec3::ZERO,
        }
    }
}

impl AiBrain {
    pub fn tick<A, R>(
        &mut self,
        config: &AiConfig,
        perception: &AiPerception,
        actor: &mut A,
        rng: &mut R,
        delta: f32,
    ) -> AiTickReport
    where
        A: CombatActor,
        R: Rng + ?Sized,
    {
        let mut report = AiTickReport {
            previous: self.state,
            state: self.state,
            attack: None,
            dashed: false,
        };

        match self.state {
            AiState::Idle => self.handle_idle(config, perception, actor, rng, delta, &mut report),
            AiState::Offensive => self.handle_offensive(config, perception, actor, rng, &mut report),
            AiState::Defensive => self.handle_defensive(config, perception, actor, delta, &mut report),
        }

        // Override: получили удар во время атаки → отступаем
        if actor.combat().is_hurt && self.state == AiState::Offensive {
            self.enter_defensive();
        }

        report.state = self.state;
        report
    }

    fn handle_idle<A: CombatActor, R: Rng + ?Sized>(
        &mut self,
        config: &AiConfig,
        perception: &AiPerception,
        actor: &mut A,
        rng: &mut R,
        delta: f32,
        report: &mut AiTickReport,
    ) {
        self.move_timer += delta;
        if self.move_timer > config.move_interval {
            self.direction = random_planar_direction(rng);
            self.move_timer = 0.0;
        }

        self.idle_timer += delta;
        if self.idle_timer > config.idle_duration {
            self.state = AiState::Offensive;
            self.idle_timer = 0.0;
            // При возврате в Idle новое направление выберется сразу
            self.move_timer = config.move_interval;
        }

        if perception.distance() < config.attack_range {
            self.engage(config, perception, actor, rng, report);
        }
    }

    fn handle_offensive<A: CombatActor, R: Rng + ?Sized>(
        &mut self,
        config: &AiConfig,
        perception: &AiPerception,
        actor: &mut A,
        rng: &mut R,
        report: &mut AiTickReport,
    ) {
        self.direction = planar(perception.to_opponent());

        let distance = perception.distance();
        if distance < config.attack_range {
            self.engage(config, perception, actor, rng, report);
        } else if distance > config.dash_distance && !actor.combat().is_dashing {
            report.dashed = actor.try_dash(perception.dash_direction);
        }
    }

    fn handle_defensive<A: CombatActor>(
        &mut self,
        config: &AiConfig,
        perception: &AiPerception,
        actor: &mut A,
        delta: f32,
        report: &mut AiTickReport,
    ) {
        self.direction = -planar(perception.to_opponent());

        self.defensive_timer += delta;
        if self.defensive_timer > config.defensive_duration {
            self.defensive_timer = 0.0;
            self.state = AiState::Idle;
        }

        // Разрыв дистанции: dash guard сам отклонит попытку пока идёт hurt reaction
        let threatened = perception.distance() < config.attack_range || actor.combat().is_hurt;
        if threatened && actor.combat().can_dash() {
            report.dashed = actor.try_dash(perception.dash_direction);
        }
    }

    /// Атака в радиусе: выбрать готовый удар, ударить, уйти в Defensive
    fn engage<A: CombatActor, R: Rng + ?Sized>(
        &mut self,
        config: &AiConfig,
        perception: &AiPerception,
        actor: &mut A,
        rng: &mut R,
        report: &mut AiTickReport,
    ) {
        if perception.opponent_hurt {
            // Оппонент и так в hurt reaction (неуязвим) — отходим
            self.enter_defensive();
            return;
        }

        let Some(kind) = choose_attack(config, actor.combat(), rng) else {
            // Ни один удар не готов: движение продолжается, состояние прежнее
            return;
        };

        if actor.try_attack(kind) {
            report.attack = Some(kind);
            self.enter_defensive();
        }
    }

    fn enter_defensive(&mut self) {
        self.state = AiState::Defensive;
        self.defensive_timer = 0.0;
    }
}

/// Взвешенный выбор среди ударов, которые прямо сейчас проходят guard
pub fn choose_attack<R: Rng + ?Sized>(
    config: &AiConfig,
    state: &CombatState,
    rng: &mut R,
) -> Option<AttackKind> {
    let ready: Vec<(AttackKind, f32)> = AttackKind::ALL
        .iter()
        .copied()
        .zip(config.attack_weights)
        .filter(|(kind, weight)| *weight > 0.0 && state.can_attack(*kind))
        .collect();

    if ready.is_empty() {
        return None;
    }

    let distribution = WeightedIndex::new(ready.iter().map(|(_, weight)| *weight)).ok()?;
    Some(ready[distribution.sample(rng)].0)
}

/// Случайное направление в плоскости XZ
pub fn random_planar_direction<R: Rng + ?Sized>(rng: &mut R) -> Vec3 {
    let x = rng.gen_range(-1.0..1.0);
    let z = rng.gen_range(-1.0..1.0);
    Vec3::new(x, 0.0, z).normalize_or_zero()
}

fn planar(vector: Vec3) -> Vec3 {
    Vec3::new(vector.x, 0.0, vector.z).normalize_or_zero()
}
