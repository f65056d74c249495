//! Overlay shape renderers.

pub(crate) mod common;

pub mod rect;
pub mod text;
