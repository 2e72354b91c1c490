//! The runner world: player kinematics, scrolling obstacles, energy and the
//! effects pools. Skills receive `&mut World` and mutate it directly.

use fastrand::Rng;
use log::info;

use crate::config::GameConfig;
use crate::effects::emitters::random_range;
use crate::effects::{Effects, FrameCtx};
use crate::persona::PersonaId;
use crate::progression::SkillUses;
use crate::theme::Theme;

/// One 60 Hz frame in ms; per-frame constants are scaled by `dt / FRAME_MS`.
pub const FRAME_MS: f64 = 1000.0 / 60.0;

/// Screen x the runner returns to after being displaced (e.g. by a swing).
pub const PLAYER_HOME_X: f64 = 140.0;
/// Stick figure height, feet to crown.
pub const PLAYER_HEIGHT: f64 = 52.0;
pub const PLAYER_WIDTH: f64 = 20.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    pub fn right(&self) -> f64 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.h
    }

    pub fn center(&self) -> (f64, f64) {
        (self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    /// Axis-aligned overlap; touching edges do not count.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ObstacleKind {
    Crate,
    Barrier,
    VaultDoor,
}

impl ObstacleKind {
    pub fn size(self) -> (f64, f64) {
        match self {
            ObstacleKind::Crate => (40.0, 40.0),
            ObstacleKind::Barrier => (26.0, 64.0),
            ObstacleKind::VaultDoor => (56.0, 80.0),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Obstacle {
    pub kind: ObstacleKind,
    pub rect: Rect,
    pub alive: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Running,
    Paused,
    Over,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    pub x: f64,
    /// Feet position.
    pub y: f64,
    pub vy: f64,
    pub on_ground: bool,
    /// While true the swing controls the position and collisions are ignored.
    pub hanging: bool,
    /// Running-leg animation phase in radians.
    pub stride: f64,
}

impl Player {
    fn new(ground_y: f64) -> Self {
        Self {
            x: PLAYER_HOME_X,
            y: ground_y,
            vy: 0.0,
            on_ground: true,
            hanging: false,
            stride: 0.0,
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(
            self.x - PLAYER_WIDTH / 2.0,
            self.y - PLAYER_HEIGHT,
            PLAYER_WIDTH,
            PLAYER_HEIGHT,
        )
    }

    /// Where the hands are: the axe leaves from here.
    pub fn hand(&self) -> (f64, f64) {
        (self.x + 12.0, self.y - PLAYER_HEIGHT * 0.7)
    }
}

pub struct World {
    pub config: GameConfig,
    pub theme: Theme,
    pub persona: PersonaId,
    pub status: GameStatus,
    pub player: Player,
    pub obstacles: Vec<Obstacle>,
    pub effects: Effects,
    pub energy: f64,
    pub speed: f64,
    pub distance: f64,
    pub destroyed: u32,
    pub skill_uses: SkillUses,
    /// Screen shake ends at this timestamp.
    pub shake_until: f64,
    next_obstacle_in: f64,
    rng: Rng,
}

impl World {
    pub fn new(config: GameConfig, theme: Theme, persona: PersonaId, seed: u64) -> Self {
        let ground_y = config.ground_y;
        let energy = config.energy_max;
        let speed = config.base_speed;
        let first_gap = config.obstacle_gap.1;
        Self {
            config,
            theme,
            persona,
            status: GameStatus::Running,
            player: Player::new(ground_y),
            obstacles: Vec::new(),
            effects: Effects::new(seed),
            energy,
            speed,
            distance: 0.0,
            destroyed: 0,
            skill_uses: SkillUses::default(),
            shake_until: 0.0,
            next_obstacle_in: first_gap,
            rng: Rng::with_seed(seed ^ 0x9e37_79b9_7f4a_7c15),
        }
    }

    pub fn is_running(&self) -> bool {
        self.status == GameStatus::Running
    }

    pub fn width(&self) -> f64 {
        self.config.canvas_width as f64
    }

    pub fn height(&self) -> f64 {
        self.config.canvas_height as f64
    }

    pub fn ground_y(&self) -> f64 {
        self.config.ground_y
    }

    pub fn flames(&self) -> &'static [&'static str] {
        self.persona.persona().flames
    }

    pub fn frame_ctx(&self, now: f64, dt: f64) -> FrameCtx {
        FrameCtx {
            now,
            theme: self.theme,
            playing: self.is_running(),
            width: self.width(),
            height: self.height(),
            ground_y: self.ground_y(),
            weather: self.config.weather,
            step: dt / FRAME_MS,
        }
    }

    pub fn spawn_obstacle(&mut self, kind: ObstacleKind, x: f64) {
        let (w, h) = kind.size();
        self.obstacles.push(Obstacle {
            kind,
            rect: Rect::new(x, self.ground_y() - h, w, h),
            alive: true,
        });
    }

    /// Break an obstacle apart. Already-destroyed obstacles are left alone.
    pub fn destroy_obstacle(&mut self, idx: usize, now: f64) -> bool {
        let Some(o) = self.obstacles.get_mut(idx) else {
            return false;
        };
        if !o.alive {
            return false;
        }
        o.alive = false;
        let (cx, cy) = o.rect.center();
        let top = o.rect.y;
        let color = self.theme.palette().obstacle;
        self.destroyed += 1;
        self.effects.emit_shatter(cx, cy, color, now);
        self.effects.emit_debris(cx, cy, color, 6);
        self.effects.emit_popup(cx, top - 8.0, "SMASH", "#ffd166");
        true
    }

    pub fn jump(&mut self) -> bool {
        if !self.is_running() || !self.player.on_ground || self.player.hanging {
            return false;
        }
        self.player.vy = self.config.jump_velocity;
        self.player.on_ground = false;
        true
    }

    /// Kinematics for one frame of `dt` ms. Does nothing unless running.
    pub fn step(&mut self, dt: f64) {
        if !self.is_running() {
            return;
        }
        let f = dt / FRAME_MS;

        self.energy =
            (self.energy + self.config.energy_regen_per_sec * dt / 1000.0).min(self.config.energy_max);
        self.speed = (self.config.base_speed + self.distance / 1000.0 * self.config.speed_ramp)
            .min(self.config.max_speed);
        let advance = self.speed * f;
        self.distance += advance;

        for o in &mut self.obstacles {
            o.rect.x -= advance;
        }
        self.obstacles.retain(|o| o.alive && o.rect.right() > -20.0);

        self.next_obstacle_in -= advance;
        if self.next_obstacle_in <= 0.0 {
            let kind = match self.rng.u8(0..10) {
                0..=4 => ObstacleKind::Crate,
                5..=7 => ObstacleKind::Barrier,
                _ => ObstacleKind::VaultDoor,
            };
            let x = self.width() + 20.0;
            self.spawn_obstacle(kind, x);
            let (lo, hi) = self.config.obstacle_gap;
            self.next_obstacle_in = random_range(&mut self.rng, lo, hi);
        }

        let ground = self.ground_y();
        let p = &mut self.player;
        if !p.hanging {
            p.vy += self.config.gravity * f;
            p.y += p.vy * f;
            if p.y >= ground {
                p.y = ground;
                p.vy = 0.0;
                p.on_ground = true;
            }
            p.x += (PLAYER_HOME_X - p.x) * (0.05 * f).min(1.0);
        }
        if p.on_ground {
            p.stride += self.speed * 0.03 * f;
        }
    }

    /// Player against live obstacles. Returns true when the run just ended.
    pub fn resolve_collisions(&mut self, now: f64) -> bool {
        if !self.is_running() || self.player.hanging {
            return false;
        }
        let body = self.player.bounds();
        if self.obstacles.iter().any(|o| o.alive && o.rect.intersects(&body)) {
            self.game_over(now);
            return true;
        }
        false
    }

    pub fn game_over(&mut self, now: f64) {
        if self.status == GameStatus::Over {
            return;
        }
        self.status = GameStatus::Over;
        self.effects.cancel_pending();
        let (x, y) = self.player.bounds().center();
        let flames = self.flames();
        self.effects.emit_sparks(x, y, Some(30), Some(flames));
        self.effects.emit_smoke(x, y, 10);
        self.shake_until = now + 400.0;
        info!(
            "run over: {:.0}px travelled, {} obstacles smashed",
            self.distance, self.destroyed
        );
    }

    pub fn toggle_pause(&mut self) {
        self.status = match self.status {
            GameStatus::Running => GameStatus::Paused,
            GameStatus::Paused => GameStatus::Running,
            GameStatus::Over => GameStatus::Over,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world() -> World {
        World::new(GameConfig::default(), Theme::Inferno, PersonaId::Blaze, 42)
    }

    #[test]
    fn rect_overlap_excludes_touching() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(a.intersects(&Rect::new(9.0, 9.0, 5.0, 5.0)));
        assert!(!a.intersects(&Rect::new(10.0, 0.0, 5.0, 5.0)));
        assert!(!a.intersects(&Rect::new(0.0, 20.0, 5.0, 5.0)));
    }

    #[test]
    fn jump_lands_back_on_ground() {
        let mut w = world();
        assert!(w.jump());
        assert!(!w.jump(), "no double jump");
        let mut airborne = false;
        for _ in 0..120 {
            w.step(FRAME_MS);
            airborne |= w.player.y < w.ground_y();
        }
        assert!(airborne);
        assert!(w.player.on_ground);
        assert_eq!(w.player.y, w.ground_y());
    }

    #[test]
    fn obstacle_hit_ends_run_and_cancels_shatters() {
        let mut w = world();
        w.effects.emit_shatter(0.0, 0.0, "#fff", 0.0);
        let x = w.player.x - 5.0;
        w.spawn_obstacle(ObstacleKind::Crate, x);
        assert!(w.resolve_collisions(10.0));
        assert_eq!(w.status, GameStatus::Over);
        assert!(w.effects.shatters().iter().all(|s| s.track.is_finished()));
        assert!(!w.resolve_collisions(20.0));
    }

    #[test]
    fn hanging_player_ignores_obstacles() {
        let mut w = world();
        w.player.hanging = true;
        let x = w.player.x - 5.0;
        w.spawn_obstacle(ObstacleKind::Crate, x);
        assert!(!w.resolve_collisions(10.0));
        assert!(w.is_running());
    }

    #[test]
    fn obstacle_breaks_only_once() {
        let mut w = world();
        w.spawn_obstacle(ObstacleKind::Crate, 600.0);
        w.spawn_obstacle(ObstacleKind::Barrier, 300.0);
        assert!(w.destroy_obstacle(1, 0.0));
        assert!(!w.destroy_obstacle(1, 0.0));
        assert!(!w.destroy_obstacle(7, 0.0));
        assert!(w.obstacles[0].alive);
        assert_eq!(w.destroyed, 1);
    }

    #[test]
    fn paused_world_does_not_move() {
        let mut w = world();
        w.spawn_obstacle(ObstacleKind::Crate, 500.0);
        w.toggle_pause();
        w.step(FRAME_MS * 10.0);
        assert_eq!(w.distance, 0.0);
        assert_eq!(w.obstacles[0].rect.x, 500.0);
        w.toggle_pause();
        w.step(FRAME_MS);
        assert!(w.distance > 0.0);
    }

    #[test]
    fn obstacles_spawn_off_screen_right() {
        let mut w = world();
        for _ in 0..600 {
            w.step(FRAME_MS);
        }
        assert!(!w.obstacles.is_empty());
        assert!(w.obstacles.iter().all(|o| o.rect.x <= w.width() + 20.0));
    }
}
