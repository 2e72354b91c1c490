//! Skill progression: every successful activation counts as a use, and every
//! ten uses raise that skill one level, up to level 5.

use serde::{Deserialize, Serialize};

use crate::skills::SkillKind;

pub const MAX_LEVEL: u8 = 5;
pub const USES_PER_LEVEL: u32 = 10;

pub fn level_for_uses(uses: u32) -> u8 {
    (1 + uses / USES_PER_LEVEL).min(MAX_LEVEL as u32) as u8
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkillUses {
    pub fire_axe: u32,
    pub tarzan_swing: u32,
    pub ground_pound: u32,
}

impl SkillUses {
    pub fn get(&self, kind: SkillKind) -> u32 {
        match kind {
            SkillKind::FireAxe => self.fire_axe,
            SkillKind::TarzanSwing => self.tarzan_swing,
            SkillKind::GroundPound => self.ground_pound,
        }
    }

    fn get_mut(&mut self, kind: SkillKind) -> &mut u32 {
        match kind {
            SkillKind::FireAxe => &mut self.fire_axe,
            SkillKind::TarzanSwing => &mut self.tarzan_swing,
            SkillKind::GroundPound => &mut self.ground_pound,
        }
    }

    pub fn level(&self, kind: SkillKind) -> u8 {
        level_for_uses(self.get(kind))
    }

    /// Count one use. Returns the new level when this use crossed a threshold.
    pub fn record_use(&mut self, kind: SkillKind) -> Option<u8> {
        let before = self.level(kind);
        let uses = self.get_mut(kind);
        *uses = uses.saturating_add(1);
        let after = self.level(kind);
        (after > before).then_some(after)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_step_every_ten_uses_and_cap() {
        assert_eq!(level_for_uses(0), 1);
        assert_eq!(level_for_uses(9), 1);
        assert_eq!(level_for_uses(10), 2);
        assert_eq!(level_for_uses(39), 4);
        assert_eq!(level_for_uses(40), 5);
        assert_eq!(level_for_uses(10_000), MAX_LEVEL);
    }

    #[test]
    fn record_use_reports_level_up_once() {
        let mut uses = SkillUses {
            ground_pound: 8,
            ..Default::default()
        };
        assert_eq!(uses.record_use(SkillKind::GroundPound), None);
        assert_eq!(uses.record_use(SkillKind::GroundPound), Some(2));
        assert_eq!(uses.record_use(SkillKind::GroundPound), None);
        assert_eq!(uses.level(SkillKind::FireAxe), 1);
    }
}
