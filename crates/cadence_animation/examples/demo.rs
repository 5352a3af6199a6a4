//! Cadence Playback Demo
//!
//! This example demonstrates:
//! - Loading engine tuning from TOML
//! - A staggered entrance built from Sequence and Parallel
//! - Restarting an animation through the reuse registry
//! - A spring tracker following a moving target
//!
//! Run with: RUST_LOG=cadence_animation=debug cargo run -p cadence_animation --example demo

use anyhow::Result;
use cadence_animation::prelude::*;
use cadence_core::{Color, OwnerIdGenerator, Vec2};

const CONFIG: &str = r#"
default_time_mode = "Normal"

[clock]
time_scale = 1.0

[spring]
strength = 180.0
friction = 12.0
"#;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let config = EngineConfig::from_toml_str(CONFIG)?;
    let mut clock = ManualClock::with_config(1.0 / 60.0, config.clock);
    let mut scheduler = Scheduler::new();
    let mut owners = OwnerIdGenerator::new();
    let card = owners.next();

    // Three rows fade and slide in, each 0.1s after the previous one
    let rows: Vec<(SharedValue<f32>, SharedValue<Vec2>)> = (0..3)
        .map(|i| {
            (
                SharedValue::new(0.0),
                SharedValue::new(Vec2::new(0.0, i as f32 * 40.0)),
            )
        })
        .collect();
    let mut entrance = Parallel::new().named("entrance");
    for (i, (opacity, position)) in rows.iter().enumerate() {
        let row = Parallel::new()
            .with(AnimationPreset::fade_in(opacity, 0.3)?)
            .with(AnimationPreset::slide_in(position, Vec2::new(-60.0, 0.0), 0.3)?);
        entrance.push(
            Sequence::new()
                .with(Timer::new(i as f32 * 0.1)?)
                .with(row)
                .named(format!("row{i}"))
                .with_time_mode(config.default_time_mode)
                .boxed(),
        );
    }
    let entrance = scheduler.spawn(entrance);

    // Highlight color, restarted through the registry mid-flight
    let highlight = SharedValue::new(Color::BLACK);
    let tint = scheduler.try_get_or_create(card, "highlight", || {
        AnimationPreset::tint(&highlight, Color::from_hex(0x3B82F6), 0.4)
    })?;
    scheduler.play(tint);

    // Cursor follower
    let cursor = SharedValue::new(Vec2::ZERO);
    let follower = scheduler.add_tracker(
        Tracker::spring(cursor.getter(), cursor.setter(), config.spring)?.named("cursor"),
    );

    let mut frame = 0;
    loop {
        if frame == 12 {
            let tint = scheduler.try_get_or_create(card, "highlight", || {
                AnimationPreset::tint(&highlight, Color::WHITE, 0.2)
            })?;
            scheduler.play(tint);
        }
        if frame % 20 == 0 && frame <= 100 {
            let target = Vec2::new(frame as f32 * 2.0, 100.0 - frame as f32);
            if let Some(tracker) = scheduler.tracker_mut::<Tracker<Vec2>>(follower) {
                tracker.set_target(target);
            }
        }

        let active = scheduler.tick_from(&mut clock);
        frame += 1;
        if frame % 10 == 0 {
            let (opacity, position) = &rows[2];
            tracing::info!(
                "frame {:3}: row2 opacity {:.2} x {:6.2} | highlight {:?} | cursor ({:.1}, {:.1})",
                frame,
                opacity.get(),
                position.get().x,
                highlight.get().to_array(),
                cursor.get().x,
                cursor.get().y
            );
        }
        if !active || frame > 600 {
            break;
        }
    }

    tracing::info!(
        "settled after {} frames (entrance finished: {})",
        frame,
        !scheduler.contains(entrance)
    );
    scheduler.clear_owner(card);
    Ok(())
}
