//! Player skills. Every skill implements [`Skill`]; the shared guard in
//! [`Skill::activate`] checks the game is running, the cooldown has passed,
//! the skill is idle and enough energy remains, in that order. A failed guard
//! changes nothing and reports why through [`Activation`].

use log::debug;

use crate::surface::Surface;
use crate::world::World;

mod fire_axe;
mod ground_pound;
mod tarzan_swing;

pub use fire_axe::FireAxe;
pub use ground_pound::{GroundPound, PoundPhase};
pub use tarzan_swing::{SwingParams, SwingPhase, TarzanSwing};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SkillKind {
    FireAxe,
    TarzanSwing,
    GroundPound,
}

impl SkillKind {
    pub const ALL: [SkillKind; 3] = [
        SkillKind::FireAxe,
        SkillKind::TarzanSwing,
        SkillKind::GroundPound,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SkillKind::FireAxe => "fire-axe",
            SkillKind::TarzanSwing => "tarzan-swing",
            SkillKind::GroundPound => "ground-pound",
        }
    }

    pub fn from_name(name: &str) -> Option<SkillKind> {
        SkillKind::ALL.into_iter().find(|k| k.name() == name)
    }

    /// Energy cost and cooldown.
    pub fn tuning(self) -> SkillTuning {
        match self {
            SkillKind::FireAxe => SkillTuning {
                energy_cost: 20.0,
                cooldown_ms: 1_200.0,
            },
            SkillKind::TarzanSwing => SkillTuning {
                energy_cost: 30.0,
                cooldown_ms: 4_000.0,
            },
            SkillKind::GroundPound => SkillTuning {
                energy_cost: 30.0,
                cooldown_ms: 3_000.0,
            },
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SkillTuning {
    pub energy_cost: f64,
    pub cooldown_ms: f64,
}

/// Fields every skill carries regardless of kind.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SkillState {
    pub active: bool,
    pub started_at: f64,
    /// Monotonic ms before which the skill cannot fire again.
    pub cooldown_until: f64,
    pub activations: u32,
}

impl SkillState {
    pub fn cooldown_remaining(&self, now: f64) -> f64 {
        (self.cooldown_until - now).max(0.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Activation {
    Activated,
    NotRunning,
    OnCooldown { ready_in_ms: f64 },
    Busy,
    NotEnoughEnergy { need: f64, have: f64 },
    /// The book holds no skill of the requested kind.
    Unavailable,
}

impl Activation {
    pub fn is_activated(self) -> bool {
        self == Activation::Activated
    }
}

pub trait Skill {
    fn kind(&self) -> SkillKind;
    fn state(&self) -> &SkillState;
    fn state_mut(&mut self) -> &mut SkillState;

    /// Skill-specific start, called once the shared guard has passed and the
    /// energy is spent.
    fn begin(&mut self, world: &mut World, now: f64);

    fn update(&mut self, world: &mut World, now: f64, dt: f64);

    fn draw(&self, world: &World, s: &mut dyn Surface);

    /// Return to idle without side effects on the world other than letting go
    /// of the player. The cooldown is kept.
    fn cancel(&mut self, world: &mut World);

    fn tuning(&self) -> SkillTuning {
        self.kind().tuning()
    }

    fn activate(&mut self, world: &mut World, now: f64) -> Activation {
        let kind = self.kind();
        let tuning = self.tuning();
        let outcome = if !world.is_running() {
            Activation::NotRunning
        } else if now < self.state().cooldown_until {
            Activation::OnCooldown {
                ready_in_ms: self.state().cooldown_remaining(now),
            }
        } else if self.state().active {
            Activation::Busy
        } else if world.energy < tuning.energy_cost {
            Activation::NotEnoughEnergy {
                need: tuning.energy_cost,
                have: world.energy,
            }
        } else {
            Activation::Activated
        };
        if outcome != Activation::Activated {
            debug!("{} skipped: {outcome:?}", kind.name());
            return outcome;
        }

        world.energy -= tuning.energy_cost;
        let state = self.state_mut();
        state.active = true;
        state.started_at = now;
        state.cooldown_until = now + tuning.cooldown_ms;
        state.activations += 1;
        if let Some(level) = world.skill_uses.record_use(kind) {
            let (x, y) = world.player.bounds().center();
            world
                .effects
                .emit_popup(x, y - 40.0, format!("{} LV {level}", kind.name()), "#7cf29a");
        }
        debug!("{} activated at {now:.0}ms", kind.name());
        self.begin(world, now);
        Activation::Activated
    }
}

/// The full set of skills for one session, dispatched uniformly.
pub struct SkillBook {
    skills: Vec<Box<dyn Skill>>,
}

impl Default for SkillBook {
    fn default() -> Self {
        Self::new()
    }
}

impl SkillBook {
    pub fn new() -> Self {
        Self {
            skills: vec![
                Box::new(FireAxe::new()),
                Box::new(TarzanSwing::new(SwingParams::default())),
                Box::new(GroundPound::new()),
            ],
        }
    }

    pub fn get(&self, kind: SkillKind) -> Option<&dyn Skill> {
        self.skills.iter().find(|s| s.kind() == kind).map(|s| &**s)
    }

    pub fn state(&self, kind: SkillKind) -> Option<&SkillState> {
        self.get(kind).map(|s| s.state())
    }

    pub fn activate(&mut self, kind: SkillKind, world: &mut World, now: f64) -> Activation {
        match self.skills.iter_mut().find(|s| s.kind() == kind) {
            Some(skill) => skill.activate(world, now),
            None => Activation::Unavailable,
        }
    }

    pub fn update_all(&mut self, world: &mut World, now: f64, dt: f64) {
        if !world.is_running() {
            return;
        }
        for skill in &mut self.skills {
            if skill.state().active {
                skill.update(world, now, dt);
            }
        }
    }

    pub fn draw_all(&self, world: &World, s: &mut dyn Surface) {
        for skill in &self.skills {
            if skill.state().active {
                skill.draw(world, s);
            }
        }
    }

    pub fn cancel_all(&mut self, world: &mut World) {
        for skill in &mut self.skills {
            if skill.state().active {
                skill.cancel(world);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for k in SkillKind::ALL {
            assert_eq!(SkillKind::from_name(k.name()), Some(k));
        }
        assert_eq!(SkillKind::from_name("moonwalk"), None);
    }

    #[test]
    fn cooldown_remaining_never_negative() {
        let s = SkillState {
            cooldown_until: 100.0,
            ..Default::default()
        };
        assert_eq!(s.cooldown_remaining(40.0), 60.0);
        assert_eq!(s.cooldown_remaining(400.0), 0.0);
    }

    #[test]
    fn missing_skill_is_unavailable() {
        use crate::config::GameConfig;
        use crate::persona::PersonaId;
        use crate::theme::Theme;

        let mut w = World::new(GameConfig::default(), Theme::Inferno, PersonaId::Blaze, 1);
        let mut book = SkillBook { skills: Vec::new() };
        assert_eq!(book.activate(SkillKind::FireAxe, &mut w, 0.0), Activation::Unavailable);
        assert_eq!(w.energy, w.config.energy_max);
        assert!(book.state(SkillKind::FireAxe).is_none());
    }
}
