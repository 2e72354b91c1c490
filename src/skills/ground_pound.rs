// Ground pound: the runner slams down, and on landing a level-scaled burst
// breaks every obstacle within reach.

use super::{Skill, SkillKind, SkillState};
use crate::effects::emitters::Burst;
use crate::surface::Surface;
use crate::world::World;

const SLAM_VELOCITY: f64 = 18.0;
const TIMEOUT_MS: f64 = 1_000.0;
const BASE_RADIUS: f64 = 110.0;

/// Horizontal reach of the impact in px at a skill level.
pub fn pound_radius(level: u8) -> f64 {
    BASE_RADIUS + 20.0 * (level.max(1) - 1) as f64
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PoundPhase {
    #[default]
    Idle,
    Slamming,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct GroundPound {
    pub state: SkillState,
    pub phase: PoundPhase,
    pub impact_at: Option<f64>,
    pub last_burst: Option<Burst>,
    pub last_smashed: u32,
}

impl GroundPound {
    pub fn new() -> Self {
        Self::default()
    }

    fn impact(&mut self, world: &mut World, now: f64) {
        let level = world.skill_uses.level(SkillKind::GroundPound);
        let x = world.player.x;
        let ground = world.ground_y();
        let flames = world.flames();
        let burst = world.effects.emit_ground_pound(x, ground, level, Some(flames));

        let reach = pound_radius(level);
        let in_reach: Vec<usize> = world
            .obstacles
            .iter()
            .enumerate()
            .filter(|(_, o)| o.alive && (o.rect.center().0 - x).abs() <= reach)
            .map(|(i, _)| i)
            .collect();
        let mut smashed = 0;
        for idx in in_reach {
            if world.destroy_obstacle(idx, now) {
                smashed += 1;
            }
        }

        world.shake_until = now + 250.0;
        self.impact_at = Some(now);
        self.last_burst = Some(burst);
        self.last_smashed = smashed;
        self.finish();
    }

    fn finish(&mut self) {
        self.phase = PoundPhase::Idle;
        self.state.active = false;
    }
}

impl Skill for GroundPound {
    fn kind(&self) -> SkillKind {
        SkillKind::GroundPound
    }

    fn state(&self) -> &SkillState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut SkillState {
        &mut self.state
    }

    fn begin(&mut self, world: &mut World, _now: f64) {
        self.phase = PoundPhase::Slamming;
        self.impact_at = None;
        self.last_burst = None;
        self.last_smashed = 0;
        if !world.player.on_ground {
            world.player.vy = world.player.vy.max(SLAM_VELOCITY);
        }
    }

    fn update(&mut self, world: &mut World, now: f64, _dt: f64) {
        if self.phase != PoundPhase::Slamming {
            return;
        }
        if world.player.on_ground {
            self.impact(world, now);
        } else if now - self.state.started_at >= TIMEOUT_MS {
            self.finish();
        } else if !world.player.hanging {
            world.player.vy = world.player.vy.max(SLAM_VELOCITY);
        }
    }

    fn draw(&self, world: &World, s: &mut dyn Surface) {
        if self.phase != PoundPhase::Slamming {
            return;
        }
        // speed lines above the falling runner
        let p = &world.player;
        s.set_alpha(0.5);
        s.set_stroke("#ffd27a", 2.0);
        for dx in [-8.0, 0.0, 8.0] {
            s.line(p.x + dx, p.y - 70.0, p.x + dx, p.y - 90.0);
        }
        s.set_alpha(1.0);
    }

    fn cancel(&mut self, _world: &mut World) {
        self.finish();
    }
}
