//! Example applications for the vela renderer.
//!
//! Each example implements [`vela_engine::core::App`] and has a binary under
//! `src/bin`. Pass `--noop` to run without a GPU, or a backend flag such as
//! `--vk` / `--gl` to pick one.

pub mod common;
pub mod cubes;
pub mod helloworld;

pub use cubes::Cubes;
pub use helloworld::HelloWorld;
