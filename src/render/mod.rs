pub mod command;
pub mod geometry;
pub mod renderer;
pub mod state;
pub mod surface;
pub mod text;
pub mod tint;
