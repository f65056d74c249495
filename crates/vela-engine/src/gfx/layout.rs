//! Vertex layout declaration.
//!
//! Attributes are bound to shader locations in declaration order: the first
//! `add` is `@location(0)`, the second `@location(1)`, and so on.

use std::hash::{DefaultHasher, Hash, Hasher};

use super::GfxError;

/// Semantic of a vertex attribute.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Attrib {
    Position,
    Normal,
    Tangent,
    Color0,
    Color1,
    TexCoord0,
    TexCoord1,
}

/// Component type of a vertex attribute.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum AttribType {
    Uint8,
    Int16,
    Float,
}

impl AttribType {
    fn size(self) -> u16 {
        match self {
            AttribType::Uint8 => 1,
            AttribType::Int16 => 2,
            AttribType::Float => 4,
        }
    }

    fn supports(self, num: u8) -> bool {
        match self {
            AttribType::Uint8 => num == 4,
            AttribType::Int16 => num == 2 || num == 4,
            AttribType::Float => (1..=4).contains(&num),
        }
    }
}

/// One attribute inside a [`VertexLayout`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct AttribDecl {
    pub attrib: Attrib,
    pub num: u8,
    pub ty: AttribType,
    /// Integer types are mapped to [0, 1] (or [-1, 1]) in the shader.
    pub normalized: bool,
    pub offset: u16,
}

/// Immutable description of one interleaved vertex stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VertexLayout {
    attribs: Vec<AttribDecl>,
    stride: u16,
    hash: u64,
}

impl VertexLayout {
    /// Starts declaring a layout.
    pub fn builder() -> VertexLayoutBuilder {
        VertexLayoutBuilder::default()
    }

    #[inline]
    pub fn attributes(&self) -> &[AttribDecl] {
        &self.attribs
    }

    /// Size of one vertex in bytes.
    #[inline]
    pub fn stride(&self) -> u16 {
        self.stride
    }

    /// Stable hash of the declaration, used as part of pipeline cache keys.
    #[inline]
    pub fn hash(&self) -> u64 {
        self.hash
    }

    pub fn has(&self, attrib: Attrib) -> bool {
        self.attribs.iter().any(|a| a.attrib == attrib)
    }
}

/// Builder returned by [`VertexLayout::builder`].
#[derive(Debug, Default)]
pub struct VertexLayoutBuilder {
    attribs: Vec<AttribDecl>,
    offset: u16,
    error: Option<GfxError>,
}

impl VertexLayoutBuilder {
    /// Appends an attribute. Invalid declarations are reported by [`end`](Self::end).
    pub fn add(mut self, attrib: Attrib, num: u8, ty: AttribType, normalized: bool) -> Self {
        if self.error.is_some() {
            return self;
        }
        if !ty.supports(num) {
            self.error = Some(GfxError::InvalidLayout(format!(
                "{attrib:?}: {num} x {ty:?} is not a supported vertex format"
            )));
            return self;
        }
        if self.attribs.iter().any(|a| a.attrib == attrib) {
            self.error = Some(GfxError::InvalidLayout(format!("{attrib:?} declared twice")));
            return self;
        }

        self.attribs.push(AttribDecl {
            attrib,
            num,
            ty,
            normalized,
            offset: self.offset,
        });
        self.offset += num as u16 * ty.size();
        self
    }

    /// Skips `bytes` of padding.
    pub fn skip(mut self, bytes: u16) -> Self {
        self.offset += bytes;
        self
    }

    pub fn end(self) -> Result<VertexLayout, GfxError> {
        if let Some(err) = self.error {
            return Err(err);
        }
        if self.attribs.is_empty() {
            return Err(GfxError::InvalidLayout("layout has no attributes".to_string()));
        }

        let mut hasher = DefaultHasher::new();
        self.attribs.hash(&mut hasher);
        self.offset.hash(&mut hasher);

        Ok(VertexLayout {
            attribs: self.attribs,
            stride: self.offset,
            hash: hasher.finish(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos_color() -> VertexLayout {
        VertexLayout::builder()
            .add(Attrib::Position, 3, AttribType::Float, false)
            .add(Attrib::Color0, 4, AttribType::Uint8, true)
            .end()
            .unwrap()
    }

    #[test]
    fn offsets_and_stride() {
        let layout = pos_color();
        assert_eq!(layout.stride(), 16);
        assert_eq!(layout.attributes()[0].offset, 0);
        assert_eq!(layout.attributes()[1].offset, 12);
        assert!(layout.has(Attrib::Color0));
        assert!(!layout.has(Attrib::Normal));
    }

    #[test]
    fn skip_adds_padding() {
        let layout = VertexLayout::builder()
            .add(Attrib::Position, 2, AttribType::Float, false)
            .skip(8)
            .add(Attrib::TexCoord0, 2, AttribType::Int16, true)
            .end()
            .unwrap();
        assert_eq!(layout.attributes()[1].offset, 16);
        assert_eq!(layout.stride(), 20);
    }

    #[test]
    fn hash_is_stable_and_discriminating() {
        assert_eq!(pos_color().hash(), pos_color().hash());
        let other = VertexLayout::builder()
            .add(Attrib::Position, 3, AttribType::Float, false)
            .end()
            .unwrap();
        assert_ne!(pos_color().hash(), other.hash());
    }

    #[test]
    fn unsupported_format_is_rejected() {
        let err = VertexLayout::builder()
            .add(Attrib::Color0, 3, AttribType::Uint8, true)
            .end();
        assert!(matches!(err, Err(GfxError::InvalidLayout(_))));
    }

    #[test]
    fn empty_and_duplicate_layouts_are_rejected() {
        assert!(VertexLayout::builder().end().is_err());
        let dup = VertexLayout::builder()
            .add(Attrib::Position, 3, AttribType::Float, false)
            .add(Attrib::Position, 3, AttribType::Float, false)
            .end();
        assert!(dup.is_err());
    }
}
