//! Headless runtime for archive-packaged sketch projects.
//!
//! Archives (`<name>.codea/` projects and `<name>.assets/` packs inside a zip) are parsed into an
//! [`AssetCatalog`]. Activating a project concatenates its script modules with those of its
//! direct dependencies, decodes its images, and hands the source to a [`ScriptEngine`]. Scripts
//! draw through the immediate-mode [`Renderer`], which rasterizes on the CPU with `vello_cpu`.
#![forbid(unsafe_code)]

pub mod archive;
pub mod assets;
pub mod audio;
pub mod catalog;
pub mod config;
pub mod fetch;
pub mod foundation;
pub mod render;
pub mod session;


pub use archive::reader::{ArchiveContents, read_archive};
pub use assets::resolve::{AssetRef, AssetResolver};
pub use audio::{AudioPlayer, AudioSink, SilentSink};
pub use catalog::graph::{AssetCatalog, MergeSummary};
pub use catalog::image::{DecodedImage, ImageAsset};
pub use catalog::model::{AssetPack, AudioClip, Project};
pub use config::SessionConfig;
pub use fetch::{ArchiveSource, ByteStore, DirByteStore, Fetcher};
pub use foundation::core::{Point, Rect, Rgba8, SurfaceSize};
pub use foundation::error::{SketchError, SketchResult};
pub use render::command::{DrawCommand, parse_commands, replay};
pub use render::renderer::{ImageRegion, Renderer};
pub use render::state::{AnchorMode, DrawingState, TextAlign};
pub use render::text::TextEngine;
pub use session::activate::{Activation, ImageReport, combined_source, prepare};
pub use session::clock::{Clock, FrameTime, ManualClock, SystemClock};
pub use session::engine::{Host, ScriptEngine};
pub use session::input::{TouchEvent, TouchPhase};
pub use session::{BootstrapReport, Session};
