//! One game session: the world plus the skill book, advanced once per
//! animation frame. Everything the browser shell does goes through here.

use log::info;

use crate::config::GameConfig;
use crate::error::{FireHeistError, Result};
use crate::progression::SkillUses;
use crate::render;
use crate::settings::Settings;
use crate::skills::{Activation, SkillBook, SkillKind};
use crate::surface::Surface;
use crate::world::{FRAME_MS, GameStatus, World};

/// Longest frame step in ms; a backgrounded tab resumes without a jump.
pub const MAX_FRAME_DT: f64 = 100.0;

/// Result of a finished run, handed out once per run.
#[derive(Clone, Debug, PartialEq)]
pub struct RunSummary {
    pub distance: f64,
    pub destroyed: u32,
    pub skill_uses: SkillUses,
}

pub struct GameState {
    pub world: World,
    pub skills: SkillBook,
    pub settings: Settings,
    seed: u64,
    last_now: Option<f64>,
    run_reported: bool,
}

impl GameState {
    pub fn new(config: GameConfig, settings: Settings, skill_uses: SkillUses, seed: u64) -> Self {
        let mut world = World::new(config, settings.theme, settings.persona, seed);
        world.skill_uses = skill_uses;
        info!(
            "new run: theme {}, persona {:?}, seed {seed:#x}",
            settings.theme.name(),
            settings.persona
        );
        Self {
            world,
            skills: SkillBook::new(),
            settings,
            seed,
            last_now: None,
            run_reported: false,
        }
    }

    pub fn status(&self) -> GameStatus {
        self.world.status
    }

    /// Advance one frame to `now` (monotonic ms). Order: runner kinematics,
    /// skills, collisions, then effects. Effects keep settling after game over
    /// and freeze while paused.
    pub fn frame(&mut self, now: f64) {
        let dt = match self.last_now {
            Some(last) => (now - last).clamp(0.0, MAX_FRAME_DT),
            None => FRAME_MS,
        };
        self.last_now = Some(now);

        self.world.step(dt);
        self.skills.update_all(&mut self.world, now, dt);
        if self.world.resolve_collisions(now) {
            self.skills.cancel_all(&mut self.world);
        }
        if self.world.status != GameStatus::Paused {
            let ctx = self.world.frame_ctx(now, dt);
            self.world.effects.update(&ctx);
        }
    }

    pub fn render(&self, s: &mut dyn Surface, now: f64) {
        render::render(self, s, now);
    }

    pub fn activate(&mut self, kind: SkillKind, now: f64) -> Activation {
        self.skills.activate(kind, &mut self.world, now)
    }

    pub fn activate_by_name(&mut self, name: &str, now: f64) -> Result<Activation> {
        let kind =
            SkillKind::from_name(name).ok_or_else(|| FireHeistError::UnknownSkill(name.to_string()))?;
        Ok(self.activate(kind, now))
    }

    pub fn jump(&mut self) -> bool {
        self.world.jump()
    }

    pub fn toggle_pause(&mut self) {
        self.world.toggle_pause();
        // no catch-up frame after unpausing
        self.last_now = None;
    }

    /// Start a fresh run with the same config and settings. Skill levels carry
    /// over; cooldowns and effects do not.
    pub fn restart(&mut self) {
        self.world.effects.cancel_pending();
        self.seed = self
            .seed
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        let config = self.world.config.clone();
        let uses = self.world.skill_uses.clone();
        *self = GameState::new(config, self.settings.clone(), uses, self.seed);
    }

    /// The summary of a run that just ended; `None` while running or once taken.
    pub fn take_finished_run(&mut self) -> Option<RunSummary> {
        if self.world.status != GameStatus::Over || self.run_reported {
            return None;
        }
        self.run_reported = true;
        Some(RunSummary {
            distance: self.world.distance,
            destroyed: self.world.destroyed,
            skill_uses: self.world.skill_uses.clone(),
        })
    }
}
