//! Tarzan swing: the runner leaps for a rope and rides a damped pendulum over
//! whatever is on the ground.
//!
//! `Idle -> Jumping` on activation. `Jumping -> Attached` once `attach_delay_ms`
//! has elapsed. `Attached -> Idle` (release) needs all three: the pendulum has
//! passed its forward apex at least once, it is swinging back past vertical, and
//! `min_swing_ms` has elapsed since attaching.
//!
//! The pendulum runs at a fixed 60 Hz step regardless of frame rate:
//! `av += -g * sin(angle); angle += av; av *= damping`.

use std::f64::consts::PI;

use log::debug;

use super::{Skill, SkillKind, SkillState};
use crate::surface::Surface;
use crate::world::{FRAME_MS, PLAYER_HEIGHT, World};

/// Most pendulum steps run in one update; a stalled tab does not fast-forward the swing.
const MAX_STEPS_PER_UPDATE: u32 = 8;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SwingParams {
    /// Per-step angular acceleration scale.
    pub gravity: f64,
    /// Radians; negative is behind the pivot.
    pub initial_angle: f64,
    pub damping: f64,
    pub rope_length: f64,
    pub attach_delay_ms: f64,
    pub min_swing_ms: f64,
}

impl Default for SwingParams {
    fn default() -> Self {
        Self {
            gravity: 0.005,
            initial_angle: -PI / 2.75,
            damping: 0.995,
            rope_length: 110.0,
            attach_delay_ms: 150.0,
            min_swing_ms: 1_500.0,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SwingPhase {
    #[default]
    Idle,
    Jumping,
    Attached,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TarzanSwing {
    pub state: SkillState,
    pub params: SwingParams,
    pub phase: SwingPhase,
    pub angle: f64,
    pub angular_velocity: f64,
    pub passed_apex: bool,
    pub attached_at: f64,
    pub released_at: Option<f64>,
    pub pivot: (f64, f64),
    accumulator: f64,
}

impl TarzanSwing {
    pub fn new(params: SwingParams) -> Self {
        Self {
            state: SkillState::default(),
            params,
            phase: SwingPhase::Idle,
            angle: params.initial_angle,
            angular_velocity: 0.0,
            passed_apex: false,
            attached_at: 0.0,
            released_at: None,
            pivot: (0.0, 0.0),
            accumulator: 0.0,
        }
    }

    /// Rope end in screen space for the current angle.
    pub fn hand(&self) -> (f64, f64) {
        let l = self.params.rope_length;
        (
            self.pivot.0 + l * self.angle.sin(),
            self.pivot.1 + l * self.angle.cos(),
        )
    }

    /// One fixed pendulum step. Returns true when the release conditions hold.
    fn step_pendulum(&mut self, now: f64) -> bool {
        let p = self.params;
        let prev_angle = self.angle;
        let prev_av = self.angular_velocity;
        self.angular_velocity += -p.gravity * self.angle.sin();
        self.angle += self.angular_velocity;
        self.angular_velocity *= p.damping;

        if !self.passed_apex && prev_av > 0.0 && self.angular_velocity <= 0.0 && self.angle > 0.0 {
            self.passed_apex = true;
        }
        let back_past_vertical = prev_angle > 0.0 && self.angle <= 0.0;
        self.passed_apex && back_past_vertical && now - self.attached_at >= p.min_swing_ms
    }

    fn attach(&mut self, world: &mut World, now: f64) {
        self.phase = SwingPhase::Attached;
        self.attached_at = now;
        self.angle = self.params.initial_angle;
        self.angular_velocity = 0.0;
        self.passed_apex = false;
        self.accumulator = 0.0;
        world.player.hanging = true;
        world.player.vy = 0.0;
        world.player.on_ground = false;
        self.hang_player(world);
    }

    fn hang_player(&self, world: &mut World) {
        let (hx, hy) = self.hand();
        world.player.x = hx;
        world.player.y = hy + PLAYER_HEIGHT;
    }

    fn release(&mut self, world: &mut World, now: f64) {
        debug!(
            "swing released after {:.0}ms (apex passed: {})",
            now - self.attached_at,
            self.passed_apex
        );
        self.phase = SwingPhase::Idle;
        self.state.active = false;
        self.released_at = Some(now);
        world.player.hanging = false;
        world.player.vy = -4.0;
        let (hx, hy) = self.hand();
        let flames = world.flames();
        let level = world.skill_uses.level(SkillKind::TarzanSwing);
        world.effects.emit_embers(hx, hy, level, Some(flames));
    }
}

impl Skill for TarzanSwing {
    fn kind(&self) -> SkillKind {
        SkillKind::TarzanSwing
    }

    fn state(&self) -> &SkillState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut SkillState {
        &mut self.state
    }

    fn begin(&mut self, world: &mut World, _now: f64) {
        let p = self.params;
        self.phase = SwingPhase::Jumping;
        self.angle = p.initial_angle;
        self.angular_velocity = 0.0;
        self.passed_apex = false;
        self.released_at = None;
        self.accumulator = 0.0;
        // Pivot sits so the rope end starts just above the runner's hands and
        // the low point of the arc clears the ground.
        let ground = world.ground_y();
        self.pivot = (
            world.player.x - p.rope_length * p.initial_angle.sin(),
            ground - PLAYER_HEIGHT - 30.0 - p.rope_length,
        );
        if world.player.on_ground {
            world.player.vy = world.config.jump_velocity * 0.8;
            world.player.on_ground = false;
        }
    }

    fn update(&mut self, world: &mut World, now: f64, dt: f64) {
        match self.phase {
            SwingPhase::Idle => {}
            SwingPhase::Jumping => {
                if now - self.state.started_at >= self.params.attach_delay_ms {
                    self.attach(world, now);
                }
            }
            SwingPhase::Attached => {
                self.accumulator = (self.accumulator + dt).min(FRAME_MS * MAX_STEPS_PER_UPDATE as f64);
                while self.accumulator >= FRAME_MS {
                    self.accumulator -= FRAME_MS;
                    if self.step_pendulum(now) {
                        self.release(world, now);
                        return;
                    }
                }
                self.hang_player(world);
            }
        }
    }

    fn draw(&self, world: &World, s: &mut dyn Surface) {
        let (px, py) = self.pivot;
        s.set_fill("#444");
        s.fill_circle(px, py, 4.0);
        match self.phase {
            SwingPhase::Jumping => {
                // rope hangs slack until the runner catches it
                s.set_alpha(0.7);
                s.set_stroke("#c49a6c", 2.0);
                s.line(px, py, px, py + self.params.rope_length);
                s.set_alpha(1.0);
            }
            SwingPhase::Attached => {
                let (hx, hy) = self.hand();
                s.set_stroke("#c49a6c", 3.0);
                s.line(px, py, hx, hy);
                if world.player.hanging {
                    s.set_fill("#ffd166");
                    s.fill_circle(hx, hy, 3.0);
                }
            }
            SwingPhase::Idle => {}
        }
    }

    fn cancel(&mut self, world: &mut World) {
        self.phase = SwingPhase::Idle;
        self.state.active = false;
        world.player.hanging = false;
    }
}
