pub mod app;
pub mod config;
pub mod lifecycle;
pub mod model;
pub mod platform;
pub mod renderer;
pub mod vertex;

#[cfg(test)]
pub(crate) mod testing;
