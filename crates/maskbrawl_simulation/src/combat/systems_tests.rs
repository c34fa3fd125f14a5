//! System-level tests для combat (App на Update, время двигается вручную).

#[cfg(test)]
mod tests {
    use bevy::ecs::schedule::ScheduleLabel;
    use bevy::prelude::*;

    use crate::combat::*;
    use crate::components::{MovementIntent, Opponent};
    use crate::masks::{MaskAttached, MaskCatalog, MaskPlugin, MaskPopped, MaskStack, MaskStolen};
    use crate::test_support::{drain, step, test_app};

    fn combat_app() -> App {
        let mut app = test_app();
        app.add_plugins((
            CombatPlugin {
                schedule: Update.intern(),
            },
            MaskPlugin {
                schedule: Update.intern(),
            },
        ));
        app
    }

    /// Два бойца друг напротив друга (attacker на -Z, target на +Z), по `masks` масок
    fn spawn_duel(app: &mut App, masks: usize) -> (Entity, Entity) {
        let world = app.world_mut();
        let attacker = world.spawn_empty().id();
        let target = world.spawn_empty().id();

        let mut catalog = MaskCatalog::builtin();
        let oni = catalog.definitions()[0].clone();

        for (entity, opponent, z) in [(attacker, target, -1.0), (target, attacker, 1.0)] {
            let stack = MaskStack::with_masks(
                entity,
                (0..masks).map(|_| catalog.create_instance(oni.clone())).collect::<Vec<_>>(),
            );
            world.entity_mut(entity).insert((
                CombatState::default(),
                stack,
                Opponent(opponent),
                Transform::from_xyz(0.0, 0.0, z),
                MovementIntent::default(),
            ));
        }

        (attacker, target)
    }

    fn start_attack(app: &mut App, entity: Entity, kind: AttackKind) {
        let mut state = app.world_mut().get_mut::<CombatState>(entity).unwrap();
        assert!(state.try_attack(kind), "attack {:?} should pass the guard", kind);
    }

    fn mask_count(app: &App, entity: Entity) -> usize {
        app.world().get::<MaskStack>(entity).unwrap().count()
    }

    fn state(app: &App, entity: Entity) -> &CombatState {
        app.world().get::<CombatState>(entity).unwrap()
    }

    fn land(app: &mut App, attacker: Entity, target: Entity) {
        app.world_mut().send_event(AnimationEvent {
            entity: attacker,
            kind: AnimationEventKind::EnableHitbox,
        });
        app.world_mut().send_event(HitboxOverlap { attacker, target });
    }

    #[test]
    fn test_left_punch_pops_top_mask() {
        let mut app = combat_app();
        let (attacker, target) = spawn_duel(&mut app, 2);
        step(&mut app, 0.1);

        start_attack(&mut app, attacker, AttackKind::Left);
        land(&mut app, attacker, target);
        step(&mut app, 0.1);

        assert_eq!(mask_count(&app, target), 1);
        assert_eq!(mask_count(&app, attacker), 2);
        assert!(state(&app, target).is_hurt);

        let hits = drain::<HitReceived>(&mut app);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].entity, target);
        assert_eq!(hits[0].trigger, "HitLeft");
        // Target смотрит в -Z, back = +Z
        assert!((hits[0].knockback - Vec3::new(0.0, 0.0, 3.0)).length() < 1e-4);

        let popped = drain::<MaskPopped>(&mut app);
        assert_eq!(popped.len(), 1);
        assert_eq!(popped[0].remaining, 1);

        let landed = drain::<HitLanded>(&mut app);
        assert_eq!(landed.len(), 1);
        assert_eq!(landed[0].attacker, attacker);
        assert_eq!(landed[0].phrase, "Lost your horns!");

        let sounds = drain::<SoundCue>(&mut app);
        assert!(sounds.contains(&SoundCue {
            entity: target,
            sound: SoundKind::PunchHit,
        }));
        assert!(drain::<CombatantDefeated>(&mut app).is_empty());
    }

    #[test]
    fn test_uppercut_steals_and_attaches_after_delay() {
        let mut app = combat_app();
        let (attacker, target) = spawn_duel(&mut app, 2);
        // Uppercut cooldown 3s (таймер стартует с 1s)
        step(&mut app, 2.1);

        start_attack(&mut app, attacker, AttackKind::Uppercut);
        land(&mut app, attacker, target);
        step(&mut app, 0.1);

        // Владение меняется сразу
        assert_eq!(mask_count(&app, target), 1);
        assert_eq!(mask_count(&app, attacker), 3);

        let stolen = drain::<MaskStolen>(&mut app);
        assert_eq!(stolen.len(), 1);
        assert_eq!(stolen[0].to, attacker);
        let stolen_id = stolen[0].mask;

        let hits = drain::<HitReceived>(&mut app);
        assert_eq!(hits[0].direction, HitDirection::Up);
        assert!((hits[0].knockback.length() - 9.0).abs() < 1e-4);

        // Перелёт 1.5 + 3.0 сек, 0.1 уже прошло
        step(&mut app, 4.0);
        assert!(drain::<MaskAttached>(&mut app).is_empty());

        step(&mut app, 0.5);
        assert_eq!(
            drain::<MaskAttached>(&mut app),
            vec![MaskAttached {
                owner: attacker,
                mask: stolen_id,
            }]
        );
    }

    #[test]
    fn test_hurt_target_ignores_second_overlap() {
        let mut app = combat_app();
        let (attacker, target) = spawn_duel(&mut app, 3);
        step(&mut app, 0.1);

        start_attack(&mut app, attacker, AttackKind::Right);
        land(&mut app, attacker, target);
        app.world_mut().send_event(HitboxOverlap { attacker, target });
        step(&mut app, 0.1);

        assert_eq!(mask_count(&app, target), 2);
        assert_eq!(drain::<HitReceived>(&mut app).len(), 1);
    }

    #[test]
    fn test_defeat_fires_once() {
        let mut app = combat_app();
        let (attacker, target) = spawn_duel(&mut app, 1);
        step(&mut app, 0.1);

        start_attack(&mut app, attacker, AttackKind::Left);
        land(&mut app, attacker, target);
        step(&mut app, 0.1);

        assert_eq!(mask_count(&app, target), 0);
        assert!(state(&app, target).is_defeated());
        let defeated = drain::<CombatantDefeated>(&mut app);
        assert_eq!(
            defeated,
            vec![CombatantDefeated {
                entity: target,
                by: attacker,
            }]
        );
        drain::<HitReceived>(&mut app);

        // Hurt и атака закончились, бьём пустой стек ещё раз
        app.world_mut().send_event(AnimationEvent {
            entity: target,
            kind: AnimationEventKind::EndHurt,
        });
        app.world_mut().send_event(AnimationEvent {
            entity: attacker,
            kind: AnimationEventKind::EndAttack,
        });
        step(&mut app, 1.1);

        start_attack(&mut app, attacker, AttackKind::Right);
        land(&mut app, attacker, target);
        step(&mut app, 0.1);

        assert_eq!(drain::<HitReceived>(&mut app).len(), 1);
        assert!(drain::<CombatantDefeated>(&mut app).is_empty());
        assert_eq!(mask_count(&app, target), 0);
    }

    #[test]
    fn test_invalid_overlaps_are_ignored() {
        let mut app = combat_app();
        let (attacker, target) = spawn_duel(&mut app, 2);
        let stranger = app.world_mut().spawn_empty().id();
        step(&mut app, 0.1);

        // Нет pending attack
        app.world_mut().send_event(HitboxOverlap { attacker, target });
        step(&mut app, 0.1);
        assert_eq!(mask_count(&app, target), 2);

        start_attack(&mut app, attacker, AttackKind::Left);
        // Self-overlap и цель не оппонент
        app.world_mut().send_event(HitboxOverlap {
            attacker,
            target: attacker,
        });
        app.world_mut().send_event(HitboxOverlap {
            attacker,
            target: stranger,
        });
        app.world_mut().send_event(HitboxOverlap {
            attacker: stranger,
            target,
        });
        step(&mut app, 0.1);

        assert_eq!(mask_count(&app, attacker), 2);
        assert_eq!(mask_count(&app, target), 2);
        assert!(drain::<HitReceived>(&mut app).is_empty());
    }

    #[test]
    fn test_hit_interrupts_defender_attack() {
        let mut app = combat_app();
        let (attacker, target) = spawn_duel(&mut app, 2);
        step(&mut app, 0.1);

        start_attack(&mut app, target, AttackKind::Left);
        app.world_mut().send_event(AnimationEvent {
            entity: target,
            kind: AnimationEventKind::EnableHitbox,
        });
        step(&mut app, 0.05);
        assert!(state(&app, target).hitbox_active);
        drain::<HitboxToggled>(&mut app);

        start_attack(&mut app, attacker, AttackKind::Right);
        land(&mut app, attacker, target);
        step(&mut app, 0.05);

        let target_state = state(&app, target);
        assert!(target_state.is_hurt);
        assert!(!target_state.is_attacking);
        assert!(!target_state.hitbox_active);
        assert!(drain::<HitboxToggled>(&mut app).contains(&HitboxToggled {
            entity: target,
            active: false,
        }));
    }

    #[test]
    fn test_finished_attack_no_longer_lands() {
        let mut app = combat_app();
        let (attacker, target) = spawn_duel(&mut app, 3);
        step(&mut app, 0.1);

        start_attack(&mut app, attacker, AttackKind::Left);
        app.world_mut().send_event(AnimationEvent {
            entity: attacker,
            kind: AnimationEventKind::EndAttack,
        });
        step(&mut app, 0.1);
        assert_eq!(state(&app, attacker).pending_attack, None);

        // Атака закончилась, hitbox закрыт
        app.world_mut().send_event(HitboxOverlap { attacker, target });
        step(&mut app, 0.1);

        assert_eq!(mask_count(&app, target), 3);
        assert!(drain::<HitReceived>(&mut app).is_empty());
    }

    #[test]
    fn test_overlap_before_hitbox_opens_is_ignored() {
        let mut app = combat_app();
        let (attacker, target) = spawn_duel(&mut app, 2);
        step(&mut app, 0.1);

        start_attack(&mut app, attacker, AttackKind::Left);
        app.world_mut().send_event(HitboxOverlap { attacker, target });
        step(&mut app, 0.1);

        assert_eq!(mask_count(&app, target), 2);
        assert!(drain::<HitReceived>(&mut app).is_empty());
    }

    #[test]
    fn test_simultaneous_overlaps_do_not_trade() {
        let mut app = combat_app();
        let (first, second) = spawn_duel(&mut app, 3);
        step(&mut app, 0.1);

        start_attack(&mut app, first, AttackKind::Left);
        start_attack(&mut app, second, AttackKind::Right);
        for entity in [first, second] {
            app.world_mut().send_event(AnimationEvent {
                entity,
                kind: AnimationEventKind::EnableHitbox,
            });
        }
        step(&mut app, 0.05);
        assert!(state(&app, first).hitbox_active && state(&app, second).hitbox_active);

        // Первый удар прерывает атаку второго в том же тике
        app.world_mut().send_event(HitboxOverlap {
            attacker: first,
            target: second,
        });
        app.world_mut().send_event(HitboxOverlap {
            attacker: second,
            target: first,
        });
        step(&mut app, 0.05);

        let hits = drain::<HitReceived>(&mut app);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].entity, second);
        assert_eq!(mask_count(&app, first), 3);
        assert_eq!(mask_count(&app, second), 2);
        assert_eq!(state(&app, second).pending_attack, None);
    }

    #[test]
    fn test_late_enable_hitbox_is_ignored() {
        let mut app = combat_app();
        let (attacker, _) = spawn_duel(&mut app, 1);

        app.world_mut().send_event(AnimationEvent {
            entity: attacker,
            kind: AnimationEventKind::EnableHitbox,
        });
        step(&mut app, 0.1);

        assert!(!state(&app, attacker).hitbox_active);
        assert!(drain::<HitboxToggled>(&mut app).is_empty());
    }

    #[test]
    fn test_animation_callbacks_clear_flags() {
        let mut app = combat_app();
        let (attacker, _) = spawn_duel(&mut app, 1);
        step(&mut app, 0.1);

        start_attack(&mut app, attacker, AttackKind::Left);
        app.world_mut().send_event(AnimationEvent {
            entity: attacker,
            kind: AnimationEventKind::EndAttack,
        });
        app.world_mut().send_event(AnimationEvent {
            entity: attacker,
            kind: AnimationEventKind::Footstep,
        });
        step(&mut app, 0.1);

        assert!(!state(&app, attacker).is_attacking);
        assert!(drain::<SoundCue>(&mut app).contains(&SoundCue {
            entity: attacker,
            sound: SoundKind::FootStep,
        }));
    }

    #[test]
    fn test_face_opponent_turn_rate_is_bounded() {
        let mut app = combat_app();
        let (attacker, target) = spawn_duel(&mut app, 1);
        // Оппонент справа: нужен поворот на 90°
        app.world_mut().get_mut::<Transform>(target).unwrap().translation = Vec3::new(5.0, 0.0, -1.0);

        step(&mut app, 0.1);

        let rotation = app.world().get::<Transform>(attacker).unwrap().rotation;
        let turned = rotation.angle_between(Quat::IDENTITY).to_degrees();
        assert!((turned - 10.0).abs() < 0.5, "turned {turned}°");

        // Достаточно времени — смотрит точно на оппонента
        step(&mut app, 1.0);
        let forward = app.world().get::<Transform>(attacker).unwrap().forward();
        assert!((forward.as_vec3() - Vec3::X).length() < 1e-3);
    }

    #[test]
    fn test_hurt_combatant_does_not_turn() {
        let mut app = combat_app();
        let (attacker, target) = spawn_duel(&mut app, 1);
        app.world_mut().get_mut::<CombatState>(attacker).unwrap().is_hurt = true;
        app.world_mut().get_mut::<Transform>(target).unwrap().translation = Vec3::new(5.0, 0.0, -1.0);

        step(&mut app, 0.5);

        let rotation = app.world().get::<Transform>(attacker).unwrap().rotation;
        assert_eq!(rotation, Quat::IDENTITY);
    }

    #[test]
    fn test_combat_plugin_resolves_hits_without_mask_plugin() {
        let mut app = test_app();
        app.add_plugins(CombatPlugin {
            schedule: Update.intern(),
        });
        let (attacker, target) = spawn_duel(&mut app, 2);
        step(&mut app, 2.1);

        start_attack(&mut app, attacker, AttackKind::Uppercut);
        land(&mut app, attacker, target);
        step(&mut app, 0.1);

        assert_eq!(mask_count(&app, target), 1);
        assert_eq!(mask_count(&app, attacker), 3);
        assert_eq!(drain::<MaskStolen>(&mut app).len(), 1);
        assert!(drain::<MaskPopped>(&mut app).is_empty());
    }
}
