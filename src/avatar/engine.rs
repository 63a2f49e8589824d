//! The animation loop: expressive state + blink timer + supervised tick task.
//!
//! `AvatarEngine` is an owned, cloneable handle to one avatar instance.
//! The tick task is the only writer of the drawing surface; setters take a
//! short-lived lock, so a mutation becomes visible on the next frame,
//! never mid-frame. `stop()` flips a flag the task checks once per tick;
//! dropping the last handle ends the task the same way.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::avatar::blink::BlinkTimer;
use crate::avatar::state::{ExpressiveState, StateSnapshot};
use crate::config::EngineConfig;
use crate::render::face;
use crate::render::surface::{SurfaceHandle, SurfaceRegistry};

struct EngineInner {
    state: ExpressiveState,
    blink: BlinkTimer,
    frame: u64,
    surface: SurfaceHandle,
}

/// Handle to one avatar instance. Cloning shares the instance; an engine
/// attached to a missing surface is inert and no-ops every operation.
#[derive(Clone)]
pub struct AvatarEngine {
    inner: Option<Arc<Mutex<EngineInner>>>,
    running: Arc<AtomicBool>,
    fps: u32,
}

impl AvatarEngine {
    /// Construct against a named surface. A name the registry does not know
    /// yields an inert engine rather than an error; callers that care should
    /// check [`AvatarEngine::is_live`].
    pub fn attach(registry: &SurfaceRegistry, surface_name: &str, config: &EngineConfig) -> Self {
        let inner = match registry.get(surface_name) {
            Some(surface) => Some(Arc::new(Mutex::new(EngineInner {
                state: ExpressiveState::default(),
                blink: BlinkTimer::new(
                    config.blink_delay_min,
                    config.blink_delay_max,
                    config.rng_seed,
                ),
                frame: 0,
                surface,
            }))),
            None => {
                warn!(surface = surface_name, "surface not registered, avatar disabled");
                None
            }
        };
        Self {
            inner,
            running: Arc::new(AtomicBool::new(false)),
            fps: config.frames_per_second.max(1),
        }
    }

    /// Whether this engine holds a surface.
    pub fn is_live(&self) -> bool {
        self.inner.is_some()
    }

    /// Whether the tick task is active.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }

    pub fn set_talking(&self, talking: bool) {
        self.with_state(|state| state.set_talking(talking));
    }

    pub fn set_mouth_amplitude(&self, v: f32) {
        self.with_state(|state| state.set_mouth_amplitude(v));
    }

    pub fn set_emotion(&self, tag: &str) {
        self.with_state(|state| state.set_emotion(tag));
    }

    pub fn set_gaze(&self, x: f32, y: f32) {
        self.with_state(|state| state.set_gaze(x, y));
    }

    /// Spawn the tick task at the configured frame rate. Requires a tokio
    /// runtime. Idempotent: a second `start()` while running is a no-op, as
    /// is starting an inert engine.
    pub fn start(&self) {
        let Some(inner) = &self.inner else {
            debug!("start() on inert avatar engine ignored");
            return;
        };
        if self.running.swap(true, Ordering::SeqCst) {
            debug!("animation loop already running");
            return;
        }

        let weak = Arc::downgrade(inner);
        let running = Arc::clone(&self.running);
        let frame_interval = Duration::from_micros(1_000_000 / u64::from(self.fps));

        tokio::spawn(async move {
            info!(interval_us = frame_interval.as_micros() as u64, "animation loop started");
            let mut ticker = tokio::time::interval(frame_interval);
            loop {
                ticker.tick().await;
                if !running.load(Ordering::Relaxed) {
                    break;
                }
                // All external handles gone: the instance is dead.
                let Some(inner) = weak.upgrade() else { break };
                tick_once(&inner);
            }
            running.store(false, Ordering::SeqCst);
            info!("animation loop stopped");
        });
    }

    /// Request the loop to end. The next tick is the last; the call itself
    /// does not wait for it.
    pub fn stop(&self) {
        if self.running.swap(false, Ordering::SeqCst) {
            debug!("animation loop stopping");
        }
    }

    /// Perform exactly one tick synchronously: advance the frame counter and
    /// blink timer, then redraw. Headless callers and tests drive the engine
    /// with this instead of `start()`.
    pub fn render_frame(&self) {
        if let Some(inner) = &self.inner {
            tick_once(inner);
        }
    }

    /// Serializable view of the current state, or `None` when inert.
    pub fn state_snapshot(&self) -> Option<StateSnapshot> {
        self.inner.as_ref().map(|inner| {
            let guard = inner.lock().unwrap();
            guard.state.snapshot(guard.frame)
        })
    }

    /// Whether the eyes render closed this frame. `false` when inert.
    pub fn is_blinking(&self) -> bool {
        self.inner
            .as_ref()
            .map(|inner| inner.lock().unwrap().blink.blinking())
            .unwrap_or(false)
    }

    /// The surface this engine draws to, for collaborators that read pixels.
    pub fn surface(&self) -> Option<SurfaceHandle> {
        self.inner
            .as_ref()
            .map(|inner| inner.lock().unwrap().surface.clone())
    }

    fn with_state(&self, f: impl FnOnce(&mut ExpressiveState)) {
        if let Some(inner) = &self.inner {
            f(&mut inner.lock().unwrap().state);
        }
    }
}

/// One tick: advance counters, advance the blink timer, redraw from the
/// current state snapshot.
fn tick_once(inner: &Mutex<EngineInner>) {
    let mut guard = inner.lock().unwrap();
    let inner = &mut *guard;
    inner.frame += 1;
    inner.blink.advance();
    let blinking = inner.blink.blinking();
    let frame = inner.frame;
    let state = &inner.state;
    inner
        .surface
        .with(|surface| face::draw_frame(surface.pixmap_mut(), state, blinking, frame));
}
