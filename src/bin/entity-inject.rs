//! Entity injection tool.
//!
//! Builds a small demo scene in a running client by sending entity-control
//! datagrams, optionally animates it, then erases it. Simulates what an
//! entity server would send, useful for exercising a client's receive path
//! without a domain connection.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use tracing::info;

use entity_protocol::config::Config;
use entity_protocol::error::ProtocolError;
use entity_protocol::utils::logging;
use entity_protocol::utils::metrics::global_metrics;
use entity_protocol::{
    EntityAdd, EntityEdit, EntityErase, EntityInjector, EntityMessage, Quat, Vec3,
};

#[derive(Parser, Debug)]
#[command(
    name = "entity-inject",
    about = "Send test entity datagrams to a running client"
)]
struct Args {
    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Target host (overrides config)
    #[arg(long)]
    host: Option<String>,

    /// Target port (overrides config)
    #[arg(long)]
    port: Option<u16>,

    /// Skip the animation phase
    #[arg(long)]
    no_animate: bool,

    /// Keep entities after the demo instead of erasing them
    #[arg(long)]
    no_cleanup: bool,
}

const SCENE_IDS: [u64; 5] = [1001, 1002, 1003, 1004, 1005];

#[tokio::main]
async fn main() -> entity_protocol::Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::from_file(path)?,
        None => Config::from_env()?,
    };
    if let Some(host) = args.host {
        config.injector.target_host = host;
    }
    if let Some(port) = args.port {
        config.injector.target_port = port;
    }

    logging::init(&config.logging)?;
    config.validate_strict()?;

    let target = tokio::net::lookup_host(config.injector.target())
        .await?
        .next()
        .ok_or_else(|| {
            ProtocolError::Config(format!(
                "Target `{}` did not resolve to an address",
                config.injector.target()
            ))
        })?;

    let injector = EntityInjector::bind(target).await?;
    let pace = config.injector.send_interval;

    demo_scene(&injector, pace).await?;

    if !args.no_animate {
        animate_scene(&injector, pace).await?;
    }

    if args.no_cleanup {
        info!("Scene left active");
    } else {
        cleanup_scene(&injector, pace).await?;
    }

    global_metrics().log_metrics();
    Ok(())
}

/// Create five colored primitives in front of the viewer.
async fn demo_scene(injector: &EntityInjector, pace: Duration) -> entity_protocol::Result<()> {
    info!("Creating demo scene");

    let entities = [
        EntityAdd {
            id: 1001,
            name: "RedCube".into(),
            position: Vec3::new(0.0, 1.5, -2.0),
            rotation: Quat::IDENTITY,
            dimensions: Vec3::splat(0.3),
            model_url: String::new(),
            texture_url: String::new(),
            color: Vec3::new(1.0, 0.0, 0.0),
        },
        EntityAdd {
            id: 1002,
            name: "GreenSphere".into(),
            position: Vec3::new(-1.0, 1.5, -2.5),
            rotation: Quat::IDENTITY,
            dimensions: Vec3::splat(0.4),
            model_url: String::new(),
            texture_url: String::new(),
            color: Vec3::new(0.0, 1.0, 0.0),
        },
        EntityAdd {
            id: 1003,
            name: "BlueBox".into(),
            position: Vec3::new(1.0, 1.5, -2.5),
            rotation: Quat::IDENTITY,
            dimensions: Vec3::new(0.5, 0.2, 0.3),
            model_url: String::new(),
            texture_url: String::new(),
            color: Vec3::new(0.0, 0.0, 1.0),
        },
        EntityAdd {
            id: 1004,
            name: "YellowPillar".into(),
            position: Vec3::new(0.0, 1.5, -4.0),
            rotation: Quat::IDENTITY,
            dimensions: Vec3::new(0.2, 0.8, 0.2),
            model_url: String::new(),
            texture_url: String::new(),
            color: Vec3::new(1.0, 1.0, 0.0),
        },
        EntityAdd {
            id: 1005,
            name: "RotatedCube".into(),
            position: Vec3::new(0.0, 1.0, -1.5),
            rotation: Quat::from_y_angle(45f32.to_radians()),
            dimensions: Vec3::splat(0.25),
            model_url: String::new(),
            texture_url: String::new(),
            color: Vec3::new(0.0, 1.0, 1.0),
        },
    ];

    for entity in entities {
        info!(id = entity.id, name = %entity.name, "EntityAdd");
        injector.send(&EntityMessage::Add(entity)).await?;
        tokio::time::sleep(pace).await;
    }

    info!("Scene created");
    Ok(())
}

/// Sixty frames: the cube circles, the sphere spins, the box pulses.
async fn animate_scene(injector: &EntityInjector, pace: Duration) -> entity_protocol::Result<()> {
    info!("Animating scene");

    for frame in 0..60u32 {
        let t = frame as f32 / 10.0;

        let x = t.sin() * 0.5;
        let z = -2.0 + t.cos() * 0.5;
        injector
            .send(&EntityMessage::Edit(
                EntityEdit::new(1001).with_position(Vec3::new(x, 1.5, z)),
            ))
            .await?;

        injector
            .send(&EntityMessage::Edit(
                EntityEdit::new(1002).with_rotation(Quat::from_y_angle(t)),
            ))
            .await?;

        let scale = 0.3 + t.sin().abs() * 0.3;
        injector
            .send(&EntityMessage::Edit(
                EntityEdit::new(1003).with_dimensions(Vec3::new(scale, 0.2, scale)),
            ))
            .await?;

        tokio::time::sleep(pace).await;
    }

    info!("Animation complete");
    Ok(())
}

/// Erase everything the demo created.
async fn cleanup_scene(injector: &EntityInjector, pace: Duration) -> entity_protocol::Result<()> {
    info!("Cleaning up scene");

    for id in SCENE_IDS {
        injector.send(&EntityMessage::Erase(EntityErase { id })).await?;
        tokio::time::sleep(pace).await;
    }

    info!("All entities removed");
    Ok(())
}
