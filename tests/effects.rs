// Particle pools, staged shatters, seeded weather and settings persistence.
// Native-friendly: no browser APIs.

use std::collections::{HashMap, HashSet};

use fire_heist::config::WeatherTuning;
use fire_heist::effects::updaters::{rule_for, update_pool};
use fire_heist::effects::{EffectKind, Effects, FrameCtx};
use fire_heist::persona::PersonaId;
use fire_heist::settings::{self, KeyValueStore, MemoryStore, SETTINGS_KEY, STATS_KEY, Settings, Stats};
use fire_heist::theme::{Theme, Weather};

fn ctx(theme: Theme, now: f64) -> FrameCtx {
    FrameCtx {
        now,
        theme,
        playing: true,
        width: 960.0,
        height: 420.0,
        ground_y: 340.0,
        weather: WeatherTuning::default(),
        step: 1.0,
    }
}

#[test]
fn spark_life_only_falls_and_each_spark_leaves_once() {
    let mut fx = Effects::new(21);
    fx.emit_sparks(400.0, 200.0, Some(40), None);
    for (i, p) in fx.pool_mut(EffectKind::Spark).iter_mut().enumerate() {
        p.label = Some(i.to_string());
    }

    let c = ctx(Theme::Inferno, 0.0);
    let rule = rule_for(EffectKind::Spark);
    let mut removed_ids = HashSet::new();
    let mut removed_total = 0;
    for _ in 0..200 {
        let pool = fx.pool_mut(EffectKind::Spark);
        if pool.is_empty() {
            break;
        }
        let before: HashMap<String, f64> = pool
            .iter()
            .map(|p| (p.label.clone().unwrap(), p.life))
            .collect();
        removed_total += update_pool(pool, rule, &c);

        let survivors: HashSet<String> = pool.iter().map(|p| p.label.clone().unwrap()).collect();
        for p in pool.iter() {
            let id = p.label.as_ref().unwrap();
            assert!(p.life > 0.0, "expired spark {id} kept");
            assert!(p.life <= before[id], "spark {id} gained life");
        }
        for id in before.keys().filter(|id| !survivors.contains(*id)) {
            assert!(removed_ids.insert(id.clone()), "spark {id} removed twice");
        }
    }
    assert_eq!(fx.len(EffectKind::Spark), 0);
    assert_eq!(removed_ids.len(), 40);
    assert_eq!(removed_total, 40);
}

#[test]
fn shatter_runs_all_three_stages() {
    let mut fx = Effects::new(5);
    fx.emit_shatter(300.0, 200.0, "#7a3b1e", 0.0);
    fx.update(&ctx(Theme::Inferno, 0.0));
    assert_eq!(fx.len(EffectKind::Shockwave), 1);
    assert_eq!(fx.len(EffectKind::Shard), 0);
    fx.update(&ctx(Theme::Inferno, 50.0));
    assert_eq!(fx.len(EffectKind::Shard), 12);
    assert_eq!(fx.len(EffectKind::Dust), 0);
    fx.update(&ctx(Theme::Inferno, 100.0));
    assert_eq!(fx.len(EffectKind::Dust), 6);
    assert!(fx.shatters().is_empty());
}

#[test]
fn cancelled_shatter_skips_later_stages() {
    let mut fx = Effects::new(5);
    fx.emit_shatter(300.0, 200.0, "#7a3b1e", 0.0);
    fx.update(&ctx(Theme::Inferno, 10.0));
    assert_eq!(fx.len(EffectKind::Shockwave), 1);

    fx.cancel_pending();
    for now in [49.0, 60.0, 120.0, 500.0] {
        fx.update(&ctx(Theme::Inferno, now));
    }
    assert_eq!(fx.len(EffectKind::Shard), 0);
    assert_eq!(fx.len(EffectKind::Dust), 0);
}

#[test]
fn weather_trigger_replays_with_seed_and_stays_in_theme() {
    let run = |seed: u64| {
        let mut fx = Effects::new(seed);
        let mut onsets = Vec::new();
        for f in 0..3_000 {
            let mut c = ctx(Theme::Rainforest, f as f64 * 16.0);
            c.weather.chance_per_frame = 0.01;
            let armed_before = fx.weather_deadline(Weather::Rain).is_some();
            fx.update(&c);
            if !armed_before && fx.weather_deadline(Weather::Rain).is_some() {
                onsets.push(f);
            }
            for foreign in [EffectKind::Snow, EffectKind::Rock, EffectKind::Headlight, EffectKind::Wind] {
                assert_eq!(fx.len(foreign), 0);
            }
        }
        onsets
    };
    let a = run(314);
    assert!(!a.is_empty());
    assert_eq!(a, run(314));
}

#[test]
fn settings_round_trip_through_store() {
    let mut store = MemoryStore::new();
    let saved = Settings {
        theme: Theme::Midnight,
        persona: PersonaId::Frost,
    };
    settings::save(&mut store, SETTINGS_KEY, &saved).unwrap();
    let loaded: Settings = settings::load_or_default(&store, SETTINGS_KEY);
    assert_eq!(loaded, saved);

    let mut stats = Stats::default();
    stats.record_run(2_500.0, &Default::default());
    settings::save(&mut store, STATS_KEY, &stats).unwrap();
    let loaded: Stats = settings::load_or_default(&store, STATS_KEY);
    assert_eq!(loaded, stats);
}

#[test]
fn garbage_settings_fall_back_to_defaults() {
    let mut store = MemoryStore::new();
    store.set(SETTINGS_KEY, "{not json").unwrap();
    store.set(STATS_KEY, "42").unwrap();
    let s: Settings = settings::load_or_default(&store, SETTINGS_KEY);
    let st: Stats = settings::load_or_default(&store, STATS_KEY);
    assert_eq!(s, Settings::default());
    assert_eq!(st, Stats::default());
}
