//! Player controller: PlayerInput → CombatState вызовы + combo tracking
//!
//! Input collaborator пишет PlayerInput один раз за тик (оси + edge кнопки),
//! player_input система потребляет его и сбрасывает edges.

use bevy::ecs::schedule::InternedScheduleLabel;
use bevy::prelude::*;
use serde::{Deserialize, Serialize};

pub mod autopilot;
pub mod combo;

pub use autopilot::{drive_player_autopilot, PlayerAutopilot};
pub use combo::{ComboDefinition, ComboTracker};

use crate::combat::{AttackKind, CombatSignals, CombatState};
use crate::components::{Defeated, MovementIntent, Player, Territory};
use crate::ArenaSet;

/// Input одного тика
///
/// `move_axes`: x → мировой X, y → мировой Z (W = +Z, D = +X).
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct PlayerInput {
    pub move_axes: Vec2,
    pub left: bool,
    pub right: bool,
    pub uppercut: bool,
    pub dash: bool,
}

impl PlayerInput {
    pub fn move_direction(&self) -> Vec3 {
        Vec3::new(self.move_axes.x, 0.0, self.move_axes.y).normalize_or_zero()
    }

    /// Нажатые удары в порядке приоритета (первый успешный побеждает)
    pub fn pressed_attacks(&self) -> impl Iterator<Item = AttackKind> + '_ {
        AttackKind::ALL.into_iter().filter(move |kind| match kind {
            AttackKind::Left => self.left,
            AttackKind::Right => self.right,
            AttackKind::Uppercut => self.uppercut,
        })
    }

    /// Edge кнопки живут один тик
    pub fn consume_edges(&mut self) {
        self.left = false;
        self.right = false;
        self.uppercut = false;
        self.dash = false;
    }
}

/// Настройки игрока
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerSettings {
    /// Пауза между ударами, после которой combo цепочка обрывается
    pub reset_time: f32,
    /// На чужой половине левый/правый превращаются в апперкот
    pub uppercut_in_enemy_territory: bool,
    pub combos: Vec<ComboDefinition>,
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self {
            // Дольше attack_cooldown, иначе Left, Left не успевает
            reset_time: 1.5,
            uppercut_in_enemy_territory: true,
            combos: vec![ComboDefinition::haymaker()],
        }
    }
}

impl PlayerSettings {
    /// Territory rule: Left/Right → Uppercut на половине оппонента
    pub fn resolve_attack(&self, kind: AttackKind, at_enemy_area: bool) -> AttackKind {
        if self.uppercut_in_enemy_territory && at_enemy_area {
            AttackKind::Uppercut
        } else {
            kind
        }
    }
}

/// Комбо выполнено → cinematic презентации
#[derive(Event, Debug, Clone, PartialEq)]
pub struct ComboTriggered {
    pub entity: Entity,
    pub name: String,
    pub cinematic: String,
    pub duration: f32,
}

/// Система: PlayerInput → Move / TryAttack / TryDash
pub fn player_input(
    mut players: Query<
        (
            Entity,
            &mut PlayerInput,
            &mut CombatState,
            &mut ComboTracker,
            &mut MovementIntent,
            Option<&Territory>,
        ),
        (With<Player>, Without<Defeated>),
    >,
    mut signals: CombatSignals,
    mut combos: EventWriter<ComboTriggered>,
    settings: Res<PlayerSettings>,
    time: Res<Time>,
) {
    let delta = time.delta_secs();

    for (entity, mut input, mut state, mut tracker, mut intent, territory) in players.iter_mut() {
        tracker.tick(delta);
        intent.direction = input.move_direction();

        let at_enemy_area = territory.is_some_and(|territory| territory.at_enemy_area);

        for pressed in input.pressed_attacks() {
            let kind = settings.resolve_attack(pressed, at_enemy_area);
            if !signals.try_attack(entity, &mut *state, kind) {
                continue;
            }

            if let Some(combo) = tracker.register(kind, &settings.combos, settings.reset_time) {
                crate::logger::log_info(&format!("🥊 {:?} performed combo {}", entity, combo.name));
                combos.write(ComboTriggered {
                    entity,
                    name: combo.name.clone(),
                    cinematic: combo.cinematic.clone(),
                    duration: combo.cinematic_duration,
                });
            }
            // Два удара за тик: выигрывает первый
            break;
        }

        if input.dash {
            let direction = intent.dash_direction();
            signals.try_dash(entity, &mut *state, direction);
        }

        input.consume_edges();
    }
}

/// Player Plugin
pub struct PlayerPlugin {
    pub schedule: InternedScheduleLabel,
}

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<ComboTriggered>()
            .init_resource::<PlayerSettings>()
            .register_type::<PlayerInput>()
            .add_systems(
                self.schedule,
                (drive_player_autopilot, player_input)
                    .chain()
                    .in_set(ArenaSet::Decide),
            );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::ecs::schedule::ScheduleLabel;

    use crate::combat::{AttackStarted, CombatPlugin, DashStarted};
    use crate::test_support::{drain, step, test_app};

    fn player_app() -> (App, Entity) {
        let mut app = test_app();
        app.add_plugins((
            CombatPlugin {
                schedule: Update.intern(),
            },
            PlayerPlugin {
                schedule: Update.intern(),
            },
        ));
        let player = app
            .world_mut()
            .spawn((
                Player,
                PlayerInput::default(),
                CombatState::default(),
                ComboTracker::default(),
                MovementIntent::default(),
                Territory::default(),
            ))
            .id();
        // Cooldowns становятся готовыми
        step(&mut app, 0.1);
        (app, player)
    }

    fn press(app: &mut App, player: Entity, apply: impl FnOnce(&mut PlayerInput)) {
        let mut input = app.world_mut().get_mut::<PlayerInput>(player).unwrap();
        apply(&mut *input);
    }

    fn end_attack(app: &mut App, player: Entity) {
        app.world_mut().get_mut::<CombatState>(player).unwrap().end_attack();
    }

    #[test]
    fn test_attack_press_starts_attack_and_clears_edge() {
        let (mut app, player) = player_app();

        press(&mut app, player, |input| input.left = true);
        step(&mut app, 0.016);

        let started = drain::<AttackStarted>(&mut app);
        assert_eq!(started.len(), 1);
        assert_eq!(started[0].kind, AttackKind::Left);
        assert_eq!(started[0].trigger, "PunchL");
        assert!(!app.world().get::<PlayerInput>(player).unwrap().left);
    }

    #[test]
    fn test_two_attacks_in_one_tick_first_wins() {
        let (mut app, player) = player_app();

        press(&mut app, player, |input| {
            input.left = true;
            input.right = true;
        });
        step(&mut app, 0.016);

        let started = drain::<AttackStarted>(&mut app);
        assert_eq!(started.len(), 1);
        assert_eq!(started[0].kind, AttackKind::Left);
        // Right не сброшен
        let state = app.world().get::<CombatState>(player).unwrap();
        assert!(state.timers.right > state.tuning.attack_cooldown);
    }

    #[test]
    fn test_enemy_territory_turns_punch_into_uppercut() {
        let (mut app, player) = player_app();
        // Апперкот готов через 3s
        step(&mut app, 2.0);
        app.world_mut().get_mut::<Territory>(player).unwrap().at_enemy_area = true;

        press(&mut app, player, |input| input.right = true);
        step(&mut app, 0.016);

        let started = drain::<AttackStarted>(&mut app);
        assert_eq!(started.len(), 1);
        assert_eq!(started[0].kind, AttackKind::Uppercut);
    }

    #[test]
    fn test_haymaker_combo_triggers() {
        let (mut app, player) = player_app();

        for kind in [AttackKind::Left, AttackKind::Left, AttackKind::Right] {
            press(&mut app, player, |input| match kind {
                AttackKind::Left => input.left = true,
                _ => input.right = true,
            });
            step(&mut app, 0.016);
            end_attack(&mut app, player);
            // Left cooldown 1s: ждём перед следующим ударом (всё ещё < reset_time)
            if kind == AttackKind::Left {
                step(&mut app, 0.99);
            }
        }

        let combos = drain::<ComboTriggered>(&mut app);
        assert_eq!(combos.len(), 1);
        assert_eq!(combos[0].name, "Haymaker");
        assert_eq!(combos[0].entity, player);
        assert!(app.world().get::<ComboTracker>(player).unwrap().sequence().is_empty());
    }

    #[test]
    fn test_dash_uses_smoothed_direction() {
        let (mut app, player) = player_app();
        app.world_mut().get_mut::<MovementIntent>(player).unwrap().blend = Vec2::new(1.0, 0.0);

        press(&mut app, player, |input| input.dash = true);
        step(&mut app, 0.016);

        let dashes = drain::<DashStarted>(&mut app);
        assert_eq!(dashes.len(), 1);
        assert_eq!(dashes[0].impulse, Vec3::new(8.0, 0.0, 0.0));
        assert!(app.world().get::<CombatState>(player).unwrap().is_dashing);
    }

    #[test]
    fn test_move_axes_become_planar_direction() {
        let (mut app, player) = player_app();

        press(&mut app, player, |input| input.move_axes = Vec2::new(1.0, 1.0));
        step(&mut app, 0.016);

        let intent = app.world().get::<MovementIntent>(player).unwrap();
        let expected = Vec3::new(1.0, 0.0, 1.0).normalize();
        assert!((intent.direction - expected).length() < 1e-6);
    }

    #[test]
    fn test_defeated_player_is_ignored() {
        let (mut app, player) = player_app();
        app.world_mut().entity_mut(player).insert(Defeated);

        press(&mut app, player, |input| input.left = true);
        step(&mut app, 0.016);

        assert!(drain::<AttackStarted>(&mut app).is_empty());
    }
}
