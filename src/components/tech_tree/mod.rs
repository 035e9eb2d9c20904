mod component;
mod drag;
mod render;
mod state;

pub use component::TechTreeCanvas;
