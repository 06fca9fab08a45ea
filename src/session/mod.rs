//! Session: one catalog, one surface, one execution engine, and the clock that drives them.

pub mod activate;
pub mod clock;
pub mod engine;
pub mod input;
pub mod scheduler;
pub mod storage;

use std::ops::ControlFlow;
use std::sync::Arc;

use rayon::prelude::*;

use crate::archive::reader::read_archive;
use crate::assets::resolve::AssetResolver;
use crate::audio::{AudioPlayer, AudioSink, SilentSink};
use crate::catalog::graph::{AssetCatalog, MergeSummary};
use crate::config::SessionConfig;
use crate::fetch::Fetcher;
use crate::foundation::core::{Point, Rgba8};
use crate::foundation::error::{SketchError, SketchResult};
use crate::render::renderer::Renderer;
use crate::render::state::AnchorMode;
use crate::render::text::TextEngine;

use self::activate::Activation;
use self::clock::{Clock, FrameTime, FrameTimer, SystemClock};
use self::engine::{Host, ScriptEngine};
use self::input::{PointerTracker, TouchEvent, map_pointer};
use self::scheduler::FrameScheduler;
use self::storage::LocalStore;

const LOADING_BACKGROUND: Rgba8 = Rgba8::new(0x28, 0x28, 0x31, 255);
const LOADING_FONT_SIZE: f32 = 64.0;

/// What [`Session::bootstrap`] loaded.
#[derive(Clone, Debug, Default, serde::Serialize)]
pub struct BootstrapReport {
    /// Archives merged into the catalog, in configuration order.
    pub loaded: Vec<String>,
    /// Archives that could not be fetched or parsed.
    pub failed: Vec<String>,
    pub activated: Option<String>,
}

pub struct Session {
    config: SessionConfig,
    catalog: AssetCatalog,
    renderer: Renderer,
    audio: AudioPlayer,
    storage: LocalStore,
    output: Vec<String>,
    engine: Box<dyn ScriptEngine>,
    clock: Arc<dyn Clock>,
    timer: FrameTimer,
    pointer: PointerTracker,
    active: Option<String>,
    frames: u64,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("active", &self.active)
            .field("frames", &self.frames)
            .field("renderer", &self.renderer)
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Session on the wall clock with audio discarded.
    pub fn new(config: SessionConfig, engine: Box<dyn ScriptEngine>) -> SketchResult<Self> {
        Self::with_parts(
            config,
            engine,
            Arc::new(SystemClock::default()),
            Box::new(SilentSink),
        )
    }

    pub fn with_parts(
        config: SessionConfig,
        engine: Box<dyn ScriptEngine>,
        clock: Arc<dyn Clock>,
        sink: Box<dyn AudioSink>,
    ) -> SketchResult<Self> {
        config.validate()?;
        let mut text = TextEngine::new();
        if let Some(font) = &config.font {
            text.register_font_path(font)?;
        }
        let renderer = Renderer::with_text_engine(config.surface_size()?, text);
        let storage = match &config.storage_path {
            Some(path) => LocalStore::open(path)?,
            None => LocalStore::in_memory(),
        };
        let mut audio = AudioPlayer::new(sink, 1.0);
        audio.set_volume(config.volume)?;
        let timer = FrameTimer::start(clock.now());
        Ok(Self {
            config,
            catalog: AssetCatalog::new(),
            renderer,
            audio,
            storage,
            output: Vec::new(),
            engine,
            clock,
            timer,
            pointer: PointerTracker::default(),
            active: None,
            frames: 0,
        })
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn catalog(&self) -> &AssetCatalog {
        &self.catalog
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut Renderer {
        &mut self.renderer
    }

    pub fn audio(&self) -> &AudioPlayer {
        &self.audio
    }

    pub fn set_volume(&mut self, volume: f32) -> SketchResult<()> {
        self.audio.set_volume(volume)
    }

    pub fn active_project(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// Lines printed by the script so far.
    pub fn output(&self) -> &[String] {
        &self.output
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn load_archive(&mut self, label: &str, bytes: &[u8]) -> SketchResult<MergeSummary> {
        self.catalog.load_archive_bytes(label, bytes)
    }

    /// Fetch and merge every configured archive, then activate the startup project if one is
    /// configured.
    ///
    /// Archives are fetched in order and parsed in parallel. One that cannot be fetched or parsed
    /// is logged and skipped; the rest still load.
    #[tracing::instrument(skip(self, fetcher), fields(archives = self.config.archives.len()))]
    pub fn bootstrap(&mut self, fetcher: &Fetcher) -> SketchResult<BootstrapReport> {
        self.draw_loading_screen();
        let mut report = BootstrapReport::default();

        let mut fetched = Vec::with_capacity(self.config.archives.len());
        for source in &self.config.archives {
            match fetcher.fetch(source) {
                Ok(bytes) => fetched.push((source.label().to_string(), bytes)),
                Err(e) => {
                    tracing::warn!(location = %source.location, "fetch failed: {e}");
                    report.failed.push(source.label().to_string());
                }
            }
        }

        let parsed: Vec<_> = fetched
            .par_iter()
            .map(|(label, bytes)| (label, read_archive(bytes)))
            .collect();
        for (label, contents) in parsed {
            tracing::info!("loading {label}...");
            match contents {
                Ok(contents) => {
                    self.catalog.merge(contents);
                    report.loaded.push(label.clone());
                }
                Err(e) => {
                    tracing::error!(error = %e, "error reading archive {label}");
                    report.failed.push(label.clone());
                }
            }
        }

        if let Some(name) = self.config.startup_project.clone() {
            self.activate(&name)?;
            report.activated = Some(name);
        }
        Ok(report)
    }

    fn draw_loading_screen(&mut self) {
        let saved = self.renderer.state().clone();
        let size = self.renderer.size();
        self.renderer.background(LOADING_BACKGROUND);
        self.renderer.fill(Rgba8::WHITE);
        self.renderer.text_mode(AnchorMode::Center);
        self.renderer.font_size(LOADING_FONT_SIZE);
        if let Err(e) = self.renderer.text(
            "Loading...",
            size.width_f64() / 2.0,
            size.height_f64() / 2.0,
        ) {
            tracing::debug!("loading text not drawn: {e}");
        }
        self.renderer.fill(saved.fill);
        self.renderer.text_mode(saved.text_mode);
        self.renderer.font_size(saved.font_size);
        self.renderer.present();
    }

    /// Resolve, decode, and start `name`: the engine loads the combined source, learns the
    /// window size, then runs setup. The surface is cleared to black and the frame clock starts
    /// only once setup has returned, so setup drawing never reaches the first frame.
    ///
    /// If the engine fails, the previously active project (if any) stays active.
    #[tracing::instrument(skip(self))]
    pub fn activate(&mut self, name: &str) -> SketchResult<Activation> {
        let activation = activate::prepare(&self.catalog, name)?;
        let previous = self.active.replace(activation.project.clone());

        if let Err(e) = self.start_engine(&activation.source) {
            tracing::error!(project = %activation.project, "activation failed: {e}");
            self.active = previous;
            return Err(e);
        }

        self.renderer.background(Rgba8::BLACK);
        self.renderer.present();
        self.timer = FrameTimer::start(self.clock.now());
        self.frames = 0;
        Ok(activation)
    }

    fn start_engine(&mut self, source: &str) -> SketchResult<()> {
        let size = self.renderer.size();
        let (engine, mut host) = self.split();
        engine.load(source, &mut host)?;
        engine.set_window_size(size.width, size.height)?;
        engine.setup(&mut host)
    }

    /// Run one frame: hand the engine the current time, let it draw, rasterize.
    pub fn tick(&mut self) -> SketchResult<FrameTime> {
        self.require_active()?;
        let time = self.timer.tick(self.clock.now());
        let (engine, mut host) = self.split();
        engine.set_time(time)?;
        engine.draw(&mut host)?;
        self.renderer.present();
        self.frames += 1;
        Ok(time)
    }

    /// Drive [`Session::tick`] at the configured frame rate.
    pub fn run(&mut self, max_frames: Option<u64>) -> SketchResult<u64> {
        let scheduler = FrameScheduler::new(self.config.frame_rate)?;
        let clock = Arc::clone(&self.clock);
        scheduler.run(clock.as_ref(), max_frames, |_| {
            self.tick()?;
            Ok(ControlFlow::Continue(()))
        })
    }

    /// Pointer pressed at a device position on a surface displayed at `display` size.
    pub fn pointer_down(&mut self, device: Point, display: (f64, f64)) -> SketchResult<()> {
        let Some(at) = self.map(device, display) else {
            return Ok(());
        };
        let event = self.pointer.press(at);
        self.deliver_touch(event)
    }

    pub fn pointer_move(&mut self, device: Point, display: (f64, f64)) -> SketchResult<()> {
        let Some(at) = self.map(device, display) else {
            return Ok(());
        };
        match self.pointer.motion(at) {
            Some(event) => self.deliver_touch(event),
            None => Ok(()),
        }
    }

    pub fn pointer_up(&mut self, device: Point, display: (f64, f64)) -> SketchResult<()> {
        let Some(at) = self.map(device, display) else {
            return Ok(());
        };
        let event = self.pointer.release(at);
        self.deliver_touch(event)
    }

    pub fn key_down(&mut self, key: &str) -> SketchResult<()> {
        if self.active.is_none() {
            return Ok(());
        }
        let (engine, mut host) = self.split();
        engine.key_down(key, &mut host)
    }

    pub fn key_up(&mut self, key: &str) -> SketchResult<()> {
        if self.active.is_none() {
            return Ok(());
        }
        let (engine, mut host) = self.split();
        engine.key_up(key, &mut host)
    }

    fn map(&self, device: Point, (w, h): (f64, f64)) -> Option<Point> {
        let at = map_pointer(device, w, h, self.renderer.size());
        if at.is_none() {
            tracing::debug!(width = w, height = h, "pointer event dropped: unusable display size");
        }
        at
    }

    fn deliver_touch(&mut self, event: TouchEvent) -> SketchResult<()> {
        if self.active.is_none() {
            return Ok(());
        }
        let (engine, mut host) = self.split();
        engine.touch(event, &mut host)
    }

    fn require_active(&self) -> SketchResult<()> {
        if self.active.is_none() {
            return Err(SketchError::validation("no project has been activated"));
        }
        Ok(())
    }

    fn split(&mut self) -> (&mut dyn ScriptEngine, Host<'_>) {
        let host = Host {
            renderer: &mut self.renderer,
            assets: AssetResolver::new(&self.catalog, self.active.as_deref()),
            audio: &mut self.audio,
            storage: &mut self.storage,
            output: &mut self.output,
        };
        (self.engine.as_mut(), host)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/mod.rs"]
mod tests;
