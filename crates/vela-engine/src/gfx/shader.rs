//! Named WGSL shader stages.
//!
//! Programs are linked from a vertex and a fragment stage looked up by name.
//! Every vertex stage reads its model-view-projection matrix from a uniform
//! at `@group(0) @binding(0)` and takes vertex attributes at locations in
//! layout declaration order.

use std::borrow::Cow;
use std::collections::HashMap;

use super::GfxError;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    /// Entry point name expected in the WGSL source.
    pub fn entry_point(self) -> &'static str {
        match self {
            ShaderStage::Vertex => "vs_main",
            ShaderStage::Fragment => "fs_main",
        }
    }
}

/// One shader stage: WGSL source plus its entry point.
#[derive(Debug, Clone, PartialEq)]
pub struct ShaderSource {
    pub name: Cow<'static, str>,
    pub stage: ShaderStage,
    pub wgsl: Cow<'static, str>,
}

impl ShaderSource {
    pub fn new(
        name: impl Into<Cow<'static, str>>,
        stage: ShaderStage,
        wgsl: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self { name: name.into(), stage, wgsl: wgsl.into() }
    }

    #[inline]
    pub fn entry_point(&self) -> &'static str {
        self.stage.entry_point()
    }
}

/// Registry of shader stages by name.
#[derive(Debug, Clone, Default)]
pub struct ShaderLibrary {
    shaders: HashMap<Cow<'static, str>, ShaderSource>,
}

impl ShaderLibrary {
    /// Library preloaded with the built-in shaders (`vs_cubes`, `fs_cubes`).
    pub fn builtin() -> Self {
        let mut lib = Self::default();
        lib.register(ShaderSource::new(
            "vs_cubes",
            ShaderStage::Vertex,
            include_str!("shaders/vs_cubes.wgsl"),
        ));
        lib.register(ShaderSource::new(
            "fs_cubes",
            ShaderStage::Fragment,
            include_str!("shaders/fs_cubes.wgsl"),
        ));
        lib
    }

    /// Adds or replaces a shader.
    pub fn register(&mut self, shader: ShaderSource) {
        self.shaders.insert(shader.name.clone(), shader);
    }

    /// Looks up `name` and checks it is a `stage` shader.
    pub fn get(&self, name: &str, stage: ShaderStage) -> Result<&ShaderSource, GfxError> {
        let shader = self
            .shaders
            .get(name)
            .ok_or_else(|| GfxError::ShaderNotFound(name.to_string()))?;
        if shader.stage != stage {
            return Err(GfxError::WrongShaderStage(name.to_string()));
        }
        Ok(shader)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.shaders.contains_key(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_has_cube_shaders() {
        let lib = ShaderLibrary::builtin();
        let vs = lib.get("vs_cubes", ShaderStage::Vertex).unwrap();
        assert!(vs.wgsl.contains("fn vs_main"));
        assert!(vs.wgsl.contains("model_view_proj"));
        let fs = lib.get("fs_cubes", ShaderStage::Fragment).unwrap();
        assert!(fs.wgsl.contains("fn fs_main"));
    }

    #[test]
    fn missing_and_wrong_stage_are_errors() {
        let lib = ShaderLibrary::builtin();
        assert_eq!(
            lib.get("vs_nope", ShaderStage::Vertex),
            Err(GfxError::ShaderNotFound("vs_nope".to_string()))
        );
        assert_eq!(
            lib.get("fs_cubes", ShaderStage::Vertex),
            Err(GfxError::WrongShaderStage("fs_cubes".to_string()))
        );
    }

    #[test]
    fn register_replaces_by_name() {
        let mut lib = ShaderLibrary::default();
        lib.register(ShaderSource::new("s", ShaderStage::Vertex, "a"));
        lib.register(ShaderSource::new("s", ShaderStage::Fragment, "b"));
        assert_eq!(lib.get("s", ShaderStage::Fragment).unwrap().wgsl, "b");
    }
}
