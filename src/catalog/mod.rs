pub mod graph;
pub mod image;
pub mod model;
