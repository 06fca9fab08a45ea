//! Boundary between the runtime and the script execution engine.
//!
//! The engine itself (interpreter, bindings) lives outside this crate. It receives the combined
//! project source and lifecycle calls through [`ScriptEngine`], and reaches back into the runtime
//! through the [`Host`] passed to each call.

use crate::assets::resolve::{AssetRef, AssetResolver};
use crate::audio::AudioPlayer;
use crate::foundation::error::SketchResult;
use crate::render::renderer::{ImageRegion, Renderer};
use crate::session::clock::FrameTime;
use crate::session::input::TouchEvent;
use crate::session::storage::LocalStore;

/// Script execution engine driven by a [`crate::session::Session`].
pub trait ScriptEngine {
    /// Load and run the combined source of the activated project.
    fn load(&mut self, source: &str, host: &mut Host<'_>) -> SketchResult<()>;

    fn set_window_size(&mut self, _width: u32, _height: u32) -> SketchResult<()> {
        Ok(())
    }

    fn setup(&mut self, host: &mut Host<'_>) -> SketchResult<()>;

    fn set_time(&mut self, _time: FrameTime) -> SketchResult<()> {
        Ok(())
    }

    /// Per-frame update.
    fn draw(&mut self, host: &mut Host<'_>) -> SketchResult<()>;

    fn touch(&mut self, event: TouchEvent, host: &mut Host<'_>) -> SketchResult<()>;

    fn key_down(&mut self, key: &str, host: &mut Host<'_>) -> SketchResult<()>;

    fn key_up(&mut self, _key: &str, _host: &mut Host<'_>) -> SketchResult<()> {
        Ok(())
    }
}

/// Runtime services available to the engine during a call.
pub struct Host<'a> {
    pub(crate) renderer: &'a mut Renderer,
    pub(crate) assets: AssetResolver<'a>,
    pub(crate) audio: &'a mut AudioPlayer,
    pub(crate) storage: &'a mut LocalStore,
    pub(crate) output: &'a mut Vec<String>,
}

impl<'a> Host<'a> {
    /// Drawing state machine. All shape, style, and transform calls go through it.
    pub fn renderer(&mut self) -> &mut Renderer {
        &mut *self.renderer
    }

    pub fn assets(&self) -> AssetResolver<'a> {
        self.assets
    }

    pub fn width(&self) -> u32 {
        self.renderer.size().width
    }

    pub fn height(&self) -> u32 {
        self.renderer.size().height
    }

    /// Draw an image of the active project by its script-side key. Unknown keys draw nothing.
    pub fn sprite(
        &mut self,
        asset: &str,
        x: f64,
        y: f64,
        w: Option<f64>,
        h: Option<f64>,
    ) -> SketchResult<()> {
        let Some(image) = AssetRef::parse(asset)
            .as_ref()
            .and_then(|r| self.assets.image(r))
        else {
            tracing::debug!(asset, "sprite asset not found");
            return Ok(());
        };
        self.renderer.sprite(image.materialize(), x, y, w, h)
    }

    /// Draw an image obtained from [`Host::read_image`] or [`ImageRegion::copy`].
    pub fn sprite_region(
        &mut self,
        region: &ImageRegion,
        x: f64,
        y: f64,
        w: Option<f64>,
        h: Option<f64>,
    ) -> SketchResult<()> {
        self.renderer.sprite(region.image(), x, y, w, h)
    }

    pub fn read_image(&mut self, asset: &str) -> Option<ImageRegion> {
        let image = AssetRef::parse(asset)
            .as_ref()
            .and_then(|r| self.assets.image(r))?;
        Some(self.renderer.read_image(image.materialize()))
    }

    pub fn play_music(&mut self, asset: &str) -> bool {
        match AssetRef::parse(asset) {
            Some(r) => self.audio.play_music(&self.assets, &r),
            None => false,
        }
    }

    pub fn play_sound(&mut self, asset: &str) -> bool {
        match AssetRef::parse(asset) {
            Some(r) => self.audio.play_sound(&self.assets, &r),
            None => false,
        }
    }

    pub fn is_music_paused(&self) -> bool {
        self.audio.is_music_paused()
    }

    pub fn set_music_paused(&mut self, paused: bool) {
        self.audio.set_music_paused(paused);
    }

    pub fn read_local_data(&self, key: &str, default: &str) -> String {
        self.storage.read(key, default)
    }

    pub fn save_local_data(&mut self, key: &str, value: &str) -> SketchResult<()> {
        self.storage.save(key, value)
    }

    /// Script `print` output.
    pub fn print(&mut self, message: &str) {
        tracing::info!(target: "sketchrun::script", "{message}");
        self.output.push(message.to_string());
    }
}
