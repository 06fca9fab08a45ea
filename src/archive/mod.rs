pub mod classify;
pub mod info;
pub mod reader;
