//! Headless preview: drives the avatar the way the interview page does and
//! writes numbered PNG frames to `preview_frames/`.
//!
//! Each phase of the script sets an emotion and toggles the talking flag
//! around a simulated spoken answer, feeding a noisy amplitude while the
//! "candidate" speaks. One frame is captured at the end of every phase.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::info;

use visage_engine::{AvatarEngine, EngineConfig, SurfaceRegistry};

const SURFACE_NAME: &str = "avatar-canvas";
const OUTPUT_DIR: &str = "preview_frames";

fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    let config = EngineConfig::load(Path::new("visage.json"));
    let registry = SurfaceRegistry::new();
    let surface = registry
        .register(SURFACE_NAME, config.width, config.height)
        .context("failed to create the preview surface")?;

    let engine = AvatarEngine::attach(&registry, SURFACE_NAME, &config);
    engine.start();

    std::fs::create_dir_all(OUTPUT_DIR).context("failed to create the output directory")?;

    // The interview flow in miniature: ponder the question, give a spoken
    // answer, settle after it.
    let script: [(&str, bool); 5] = [
        ("thinking", false),
        ("neutral", true),
        ("nervous", true),
        ("confident", false),
        ("happy", false),
    ];

    for (index, (emotion, talking)) in script.iter().enumerate() {
        info!(emotion, talking, "phase start");
        engine.set_emotion(emotion);
        engine.set_talking(*talking);
        engine.set_gaze(if index % 2 == 0 { 0.3 } else { -0.3 }, 0.1);

        // Hold each phase for ~0.6s of animation, updating the amplitude
        // the way a live audio level meter would while speaking.
        for _ in 0..12 {
            if *talking {
                engine.set_mouth_amplitude(rand::random::<f32>());
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }

        let path = PathBuf::from(OUTPUT_DIR).join(format!("frame_{index:02}_{emotion}.png"));
        surface
            .save_png(&path)
            .with_context(|| format!("failed to write {}", path.display()))?;
        info!(path = %path.display(), "captured frame");
    }

    engine.stop();

    if let Some(snapshot) = engine.state_snapshot() {
        info!(
            frames = snapshot.frame,
            emotion = %snapshot.emotion,
            "preview finished"
        );
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    }

    Ok(())
}
