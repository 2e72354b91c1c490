// Fire axe: a spinning projectile thrown from the runner's hand. It breaks the
// first obstacle it overlaps or burns out at its maximum range.

use super::{Skill, SkillKind, SkillState};
use crate::surface::Surface;
use crate::world::{FRAME_MS, Rect, World};

const AXE_HALF: f64 = 10.0;
const BASE_SPEED: f64 = 11.0;
const BASE_RANGE: f64 = 420.0;
const LIFT: f64 = 0.05;

/// Max travel distance in px at a skill level.
pub fn axe_range(level: u8) -> f64 {
    BASE_RANGE + 60.0 * (level.max(1) - 1) as f64
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct FireAxe {
    pub state: SkillState,
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub rotation: f64,
    pub travelled: f64,
    pub range: f64,
    /// Index of the obstacle broken by the last throw, if any.
    pub last_hit: Option<usize>,
}

impl FireAxe {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.x - AXE_HALF, self.y - AXE_HALF, AXE_HALF * 2.0, AXE_HALF * 2.0)
    }

    fn finish(&mut self) {
        self.state.active = false;
    }
}

impl Skill for FireAxe {
    fn kind(&self) -> SkillKind {
        SkillKind::FireAxe
    }

    fn state(&self) -> &SkillState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut SkillState {
        &mut self.state
    }

    fn begin(&mut self, world: &mut World, _now: f64) {
        let level = world.skill_uses.level(SkillKind::FireAxe);
        let (hx, hy) = world.player.hand();
        self.x = hx;
        self.y = hy;
        self.vx = BASE_SPEED + (level - 1) as f64;
        self.vy = -1.5;
        self.rotation = 0.0;
        self.travelled = 0.0;
        self.range = axe_range(level);
        self.last_hit = None;
        let flames = world.flames();
        world.effects.emit_sparks(hx, hy, Some(6), Some(flames));
    }

    fn update(&mut self, world: &mut World, now: f64, dt: f64) {
        if !self.state.active {
            return;
        }
        let f = dt / FRAME_MS;
        let dx = self.vx * f;
        self.x += dx;
        self.y += self.vy * f;
        self.vy += LIFT * f;
        self.rotation += 0.45 * f;
        self.travelled += dx;
        let flames = world.flames();
        world.effects.emit_axe_trail(self.x, self.y, Some(flames));

        let bounds = self.bounds();
        let hit = world
            .obstacles
            .iter()
            .enumerate()
            .filter(|(_, o)| o.alive && o.rect.intersects(&bounds))
            .min_by(|(_, a), (_, b)| a.rect.x.total_cmp(&b.rect.x))
            .map(|(i, _)| i);
        if let Some(idx) = hit {
            world.destroy_obstacle(idx, now);
            let level = world.skill_uses.level(SkillKind::FireAxe);
            world.effects.emit_sparks(self.x, self.y, None, Some(flames));
            world.effects.emit_embers(self.x, self.y, level, Some(flames));
            self.last_hit = Some(idx);
            self.finish();
            return;
        }

        if self.travelled >= self.range || self.x > world.width() + 40.0 {
            world.effects.emit_smoke(self.x, self.y, 4);
            self.finish();
        }
    }

    fn draw(&self, _world: &World, s: &mut dyn Surface) {
        s.save();
        s.transform(self.x, self.y, self.rotation);
        // handle
        s.set_stroke("#8b5a2b", 3.0);
        s.line(-AXE_HALF, AXE_HALF, AXE_HALF * 0.4, -AXE_HALF * 0.4);
        // blade
        s.set_fill("#d9d9d9");
        s.fill_polygon(&[
            (AXE_HALF * 0.2, -AXE_HALF * 0.9),
            (AXE_HALF * 1.1, -AXE_HALF * 0.2),
            (AXE_HALF * 0.5, AXE_HALF * 0.2),
        ]);
        s.restore();
        s.set_alpha(0.6);
        s.glow(self.x, self.y, AXE_HALF * 1.6, "#ffb347", "rgba(255,120,0,0)");
        s.set_alpha(1.0);
    }

    fn cancel(&mut self, _world: &mut World) {
        self.finish();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::persona::PersonaId;
    use crate::skills::Activation;
    use crate::theme::Theme;
    use crate::world::ObstacleKind;

    fn world() -> World {
        World::new(GameConfig::default(), Theme::Inferno, PersonaId::Blaze, 5)
    }

    #[test]
    fn range_grows_with_level() {
        assert_eq!(axe_range(1), 420.0);
        assert_eq!(axe_range(3), 540.0);
    }

    #[test]
    fn axe_breaks_the_obstacle_ahead() {
        let mut w = world();
        w.spawn_obstacle(ObstacleKind::Barrier, 300.0);
        let mut axe = FireAxe::new();
        assert_eq!(axe.activate(&mut w, 0.0), Activation::Activated);
        let mut t = 0.0;
        while axe.state.active && t < 2_000.0 {
            t += FRAME_MS;
            axe.update(&mut w, t, FRAME_MS);
        }
        assert!(!axe.state.active);
        assert_eq!(axe.last_hit, Some(0));
        assert!(!w.obstacles[0].alive);
        assert_eq!(w.destroyed, 1);
    }

    #[test]
    fn axe_clears_a_low_crate_and_breaks_the_door_behind_it() {
        let mut w = world();
        w.spawn_obstacle(ObstacleKind::Crate, 400.0);
        w.spawn_obstacle(ObstacleKind::VaultDoor, 470.0);
        let mut axe = FireAxe::new();
        axe.activate(&mut w, 0.0);
        let mut t = 0.0;
        while axe.state.active {
            t += FRAME_MS;
            axe.update(&mut w, t, FRAME_MS);
            assert!(t < 5_000.0, "axe never finished");
        }
        assert_eq!(axe.last_hit, Some(1));
        assert!(w.obstacles[0].alive, "the arc passes over the crate");
        assert!(!w.obstacles[1].alive);
        assert!(axe.travelled < axe_range(1));
    }

    #[test]
    fn axe_burns_out_at_max_range() {
        let mut w = world();
        let mut axe = FireAxe::new();
        axe.activate(&mut w, 0.0);
        let mut t = 0.0;
        while axe.state.active {
            t += FRAME_MS;
            axe.update(&mut w, t, FRAME_MS);
            assert!(t < 5_000.0, "axe never finished");
        }
        assert_eq!(axe.last_hit, None);
        assert!(axe.travelled >= axe_range(1));
        assert!(axe.travelled < axe_range(1) + BASE_SPEED + 1.0);
    }
}
