//! Data-driven effects carried by consumables and world objects.

use crate::ability;
use crate::combat;
use crate::env::{Dice, GameEnv};
use crate::monster;
use crate::state::{Ability, Cloak, GameState, Position};

/// Extra monsters a swarm may add or drop around its nominal count.
pub const SWARM_VARIANCE: u32 = 5;

/// Closed set of effects an item or object can carry.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Effect {
    /// Restores HP, capped at the maximum.
    Heal { amount: u32 },
    /// Like heal, but only takes when the player is hurt.
    Recuperate { amount: u32 },
    Poison { amount: u32 },
    /// Cloaks the player; `None` lasts until the run ends.
    Hide {
        #[cfg_attr(feature = "serde", serde(default))]
        turns: Option<u32>,
    },
    /// Moves the player to `destination`, or somewhere within `range`.
    Teleport {
        #[cfg_attr(feature = "serde", serde(default))]
        destination: Option<Position>,
        #[cfg_attr(feature = "serde", serde(default))]
        range: u32,
    },
    Spawn {
        template: String,
        count: u32,
        range: u32,
    },
    /// Spawn with a randomised count.
    Swarm {
        template: String,
        count: u32,
        range: u32,
    },
    /// Ends the run.
    Soulsuck {
        #[cfg_attr(feature = "serde", serde(default))]
        message: Option<String>,
    },
    /// Stuns every monster currently in an attack slot.
    Stun { turns: u32 },
    ShowMessage { message: String },
    UnlockAbility { ability: Ability },
}

/// Result of applying one or more effects.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct EffectOutcome {
    /// At least one effect changed something.
    pub applied: bool,
}

/// Applies `effect` on behalf of `source` (an item or object name).
pub fn apply(
    state: &mut GameState,
    env: &GameEnv<'_>,
    dice: &mut Dice<'_>,
    effect: &Effect,
    source: &str,
) -> EffectOutcome {
    if state.is_game_over() {
        return EffectOutcome::default();
    }
    let config = env.config();
    let applied = match effect {
        Effect::Heal { amount } => {
            state.player.heal(*amount);
            true
        }
        Effect::Recuperate { amount } => state.player.heal(*amount) > 0,
        Effect::Poison { amount } => {
            state.player.take_damage(*amount);
            if !state.player.is_alive() {
                let message = format!("You succumbed to the poison of {source}.");
                state.enter_game_over(source, message, config);
            }
            true
        }
        Effect::Hide { turns } => {
            state.player.cloak = match turns {
                None => Cloak::Indefinite,
                Some(turns) => Cloak::Turns((*turns).max(1)),
            };
            true
        }
        Effect::Teleport { destination, range } => {
            teleport(state, env, dice, *destination, *range);
            true
        }
        Effect::Spawn {
            template,
            count,
            range,
        } => spawn(state, env, dice, template, (*count).max(1), *range),
        Effect::Swarm {
            template,
            count,
            range,
        } => {
            let swing = dice.range(0, SWARM_VARIANCE * 2);
            let count = (count + swing).saturating_sub(SWARM_VARIANCE).max(1);
            spawn(state, env, dice, template, count, *range)
        }
        Effect::Soulsuck { message } => {
            let message = message
                .clone()
                .unwrap_or_else(|| format!("Your soul was devoured by {source}."));
            state.enter_game_over(source, message, config);
            true
        }
        Effect::Stun { turns } => {
            let mut stunned = false;
            for monster in state.monsters.iter_mut().filter(|m| m.in_slot()) {
                monster.stunned_turns = monster.stunned_turns.max(*turns);
                stunned = true;
            }
            stunned
        }
        Effect::ShowMessage { message } => {
            state.ui.message = Some(message.clone());
            true
        }
        Effect::UnlockAbility { ability } => ability::unlock_ability(state, *ability),
    };
    tracing::debug!(?effect, source, applied, "effect applied");
    EffectOutcome { applied }
}

/// Applies effects in order, stopping once the run is over.
pub fn apply_all(
    state: &mut GameState,
    env: &GameEnv<'_>,
    dice: &mut Dice<'_>,
    effects: &[Effect],
    source: &str,
) -> EffectOutcome {
    let mut outcome = EffectOutcome::default();
    for effect in effects {
        if state.is_game_over() {
            break;
        }
        outcome.applied |= apply(state, env, dice, effect, source).applied;
    }
    outcome
}

fn teleport(
    state: &mut GameState,
    env: &GameEnv<'_>,
    dice: &mut Dice<'_>,
    destination: Option<Position>,
    range: u32,
) {
    let target = destination.unwrap_or_else(|| {
        // Anything wider than the grid lands on an edge after clamping anyway.
        let bounds = state.world.grid;
        let range = range.min(bounds.rows.max(bounds.cols)).min(u32::MAX / 4);
        let reach = range as i32;
        let d_row = dice.range(0, range * 2) as i32 - reach;
        let d_col = dice.range(0, range * 2) as i32 - reach;
        state.player.position.offset(d_row, d_col)
    });
    let landing = state.world.grid.clamp(target);
    state.player.position = landing;
    state.ui.push_teleport_flash(landing);
    if state.combat.is_engaged() || state.monsters.iter().any(|m| !m.state.is_roaming()) {
        combat::disengage(state, env.config());
    }
}

fn spawn(
    state: &mut GameState,
    env: &GameEnv<'_>,
    dice: &mut Dice<'_>,
    template: &str,
    count: u32,
    range: u32,
) -> bool {
    match monster::spawn_near(state, env, dice, template, count, range) {
        Ok(ids) => !ids.is_empty(),
        Err(error) => {
            tracing::error!(%error, "spawn effect failed");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::env::{Env, FixedRng, PcgRng, RollStream, TemplateCatalog};
    use crate::monster::tests::abhuman;
    use crate::state::{Monster, MonsterState};

    fn run(state: &mut GameState, catalog: &TemplateCatalog, effect: Effect) -> EffectOutcome {
        let config = GameConfig::with_grid(100, 100);
        let rng = FixedRng(0);
        let env = Env::new(catalog, &rng, &config).into_game_env();
        let mut dice = env.dice(state, RollStream::Effect);
        apply(state, &env, &mut dice, &effect, "Cursed Chalice")
    }

    fn state() -> GameState {
        let mut state = GameState::new(&GameConfig::with_grid(100, 100), 5);
        state.player.position = Position::new(50, 50);
        state
    }

    #[test]
    fn recuperate_only_takes_when_hurt() {
        let catalog = TemplateCatalog::new();
        let mut state = state();
        assert!(!run(&mut state, &catalog, Effect::Recuperate { amount: 5 }).applied);
        assert!(run(&mut state, &catalog, Effect::Heal { amount: 5 }).applied);

        state.player.hp = 90;
        assert!(run(&mut state, &catalog, Effect::Recuperate { amount: 50 }).applied);
        assert_eq!(state.player.hp, state.player.max_hp);
    }

    #[test]
    fn lethal_poison_ends_the_run() {
        let catalog = TemplateCatalog::new();
        let mut state = state();
        state.player.hp = 3;
        run(&mut state, &catalog, Effect::Poison { amount: 10 });

        assert_eq!(state.player.hp, 0);
        let record = state.run.game_over.unwrap();
        assert_eq!(record.killer, "Cursed Chalice");
    }

    #[test]
    fn soulsuck_uses_the_authored_message() {
        let catalog = TemplateCatalog::new();
        let mut state = state();
        run(
            &mut state,
            &catalog,
            Effect::Soulsuck {
                message: Some("The mirror keeps you.".into()),
            },
        );
        assert_eq!(state.run.game_over.unwrap().message, "The mirror keeps you.");
    }

    #[test]
    fn teleport_clamps_and_flashes() {
        let catalog = TemplateCatalog::new();
        let mut state = state();
        run(
            &mut state,
            &catalog,
            Effect::Teleport {
                destination: Some(Position::new(-4, 250)),
                range: 0,
            },
        );
        assert_eq!(state.player.position, Position::new(0, 99));
        assert_eq!(state.ui.teleport_flashes.len(), 1);

        // FixedRng(0) rolls the lowest offset on both axes.
        run(
            &mut state,
            &catalog,
            Effect::Teleport {
                destination: None,
                range: 3,
            },
        );
        assert_eq!(state.player.position, Position::new(0, 96));

        run(
            &mut state,
            &catalog,
            Effect::Teleport {
                destination: None,
                range: u32::MAX,
            },
        );
        assert_eq!(state.player.position, Position::new(0, 0));
        assert_eq!(state.ui.teleport_flashes.len(), 3);
    }

    #[test]
    fn stun_hits_only_slot_occupants() {
        let catalog = TemplateCatalog::new();
        let mut state = state();
        let slotted = state.allocate_entity_id();
        let roaming = state.allocate_entity_id();
        state.monsters.insert(Monster {
            id: slotted,
            hp: 5,
            state: MonsterState::InSlot { slot: 0, ticket: 1 },
            ..Monster::default()
        });
        state.monsters.insert(Monster {
            id: roaming,
            hp: 5,
            ..Monster::default()
        });

        assert!(run(&mut state, &catalog, Effect::Stun { turns: 2 }).applied);
        assert_eq!(state.monsters.get(slotted).unwrap().stunned_turns, 2);
        assert_eq!(state.monsters.get(roaming).unwrap().stunned_turns, 0);
    }

    #[test]
    fn swarm_spawns_at_least_one() {
        let catalog = TemplateCatalog::new().with_monster(abhuman());
        let mut state = state();
        // FixedRng(0) swings the count fully down: 2 + 0 - 5 floors at 1.
        assert!(
            run(
                &mut state,
                &catalog,
                Effect::Swarm {
                    template: "abhuman".into(),
                    count: 2,
                    range: 4,
                },
            )
            .applied
        );
        assert_eq!(state.monsters.len(), 1);
    }

    #[test]
    fn unknown_spawn_template_is_not_applied() {
        let catalog = TemplateCatalog::new();
        let mut state = state();
        let outcome = run(
            &mut state,
            &catalog,
            Effect::Spawn {
                template: "wyrm".into(),
                count: 1,
                range: 3,
            },
        );
        assert!(!outcome.applied);
        assert!(state.monsters.is_empty());
    }

    #[test]
    fn spawn_with_real_rng_places_every_monster() {
        let config = GameConfig::with_grid(100, 100);
        let catalog = TemplateCatalog::new().with_monster(abhuman());
        let rng = PcgRng;
        let env = Env::new(&catalog, &rng, &config).into_game_env();
        let mut state = state();
        let mut dice = env.dice(&state, RollStream::Effect);
        let effect = Effect::Spawn {
            template: "abhuman".into(),
            count: 3,
            range: 5,
        };

        assert!(apply(&mut state, &env, &mut dice, &effect, "Summoning Circle").applied);
        assert_eq!(state.monsters.len(), 3);
        assert!(state.monsters.iter().all(|m| m.hp == m.max_hp));
    }
}
