//! Render state, clear, debug and reset flag sets.
//!
//! Bit layouts follow the classic packed-u64 render state: several fields
//! (depth test, cull, primitive type) are multi-bit enums inside the mask, so
//! use the decoders below rather than `contains` to read them back.

/// Packed pipeline state for a draw call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct StateFlags(u64);

bitflags::bitflags! {
    impl StateFlags: u64 {
        const WRITE_R = 0x0000_0000_0000_0001;
        const WRITE_G = 0x0000_0000_0000_0002;
        const WRITE_B = 0x0000_0000_0000_0004;
        const WRITE_A = 0x0000_0000_0000_0008;
        const WRITE_Z = 0x0000_0040_0000_0000;
        const WRITE_RGB = Self::WRITE_R.bits() | Self::WRITE_G.bits() | Self::WRITE_B.bits();
        const WRITE_MASK = Self::WRITE_RGB.bits() | Self::WRITE_A.bits() | Self::WRITE_Z.bits();

        const DEPTH_TEST_LESS     = 0x0000_0000_0000_0010;
        const DEPTH_TEST_LEQUAL   = 0x0000_0000_0000_0020;
        const DEPTH_TEST_EQUAL    = 0x0000_0000_0000_0030;
        const DEPTH_TEST_GEQUAL   = 0x0000_0000_0000_0040;
        const DEPTH_TEST_GREATER  = 0x0000_0000_0000_0050;
        const DEPTH_TEST_NOTEQUAL = 0x0000_0000_0000_0060;
        const DEPTH_TEST_NEVER    = 0x0000_0000_0000_0070;
        const DEPTH_TEST_ALWAYS   = 0x0000_0000_0000_0080;
        const DEPTH_TEST_MASK     = 0x0000_0000_0000_00f0;

        const CULL_CW   = 0x0000_0010_0000_0000;
        const CULL_CCW  = 0x0000_0020_0000_0000;
        const CULL_MASK = 0x0000_0030_0000_0000;

        const PT_TRISTRIP  = 0x0001_0000_0000_0000;
        const PT_LINES     = 0x0002_0000_0000_0000;
        const PT_LINESTRIP = 0x0003_0000_0000_0000;
        const PT_POINTS    = 0x0004_0000_0000_0000;
        const PT_MASK      = 0x0007_0000_0000_0000;

        const MSAA = 0x0100_0000_0000_0000;

        const DEFAULT = Self::WRITE_RGB.bits()
            | Self::WRITE_A.bits()
            | Self::WRITE_Z.bits()
            | Self::DEPTH_TEST_LESS.bits()
            | Self::CULL_CW.bits()
            | Self::MSAA.bits();
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum DepthTest {
    Less,
    LessEqual,
    Equal,
    GreaterEqual,
    Greater,
    NotEqual,
    Never,
    Always,
}

/// Which screen-space winding gets culled.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum CullMode {
    Clockwise,
    CounterClockwise,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub enum Topology {
    #[default]
    TriList,
    TriStrip,
    Lines,
    LineStrip,
    Points,
}

impl Topology {
    pub fn is_strip(self) -> bool {
        matches!(self, Topology::TriStrip | Topology::LineStrip)
    }
}

impl StateFlags {
    /// Decodes the depth test field. `None` means depth testing is off.
    pub fn depth_test(self) -> Option<DepthTest> {
        match (self & Self::DEPTH_TEST_MASK).bits() {
            0x10 => Some(DepthTest::Less),
            0x20 => Some(DepthTest::LessEqual),
            0x30 => Some(DepthTest::Equal),
            0x40 => Some(DepthTest::GreaterEqual),
            0x50 => Some(DepthTest::Greater),
            0x60 => Some(DepthTest::NotEqual),
            0x70 => Some(DepthTest::Never),
            0x80 => Some(DepthTest::Always),
            _ => None,
        }
    }

    /// Decodes the cull field. `None` means both windings are drawn.
    pub fn cull(self) -> Option<CullMode> {
        let field = self & Self::CULL_MASK;
        if field == Self::CULL_CW {
            Some(CullMode::Clockwise)
        } else if field == Self::CULL_CCW {
            Some(CullMode::CounterClockwise)
        } else {
            None
        }
    }

    /// Decodes the primitive type field. Zero means triangle list.
    pub fn topology(self) -> Topology {
        let field = self & Self::PT_MASK;
        if field == Self::PT_TRISTRIP {
            Topology::TriStrip
        } else if field == Self::PT_LINES {
            Topology::Lines
        } else if field == Self::PT_LINESTRIP {
            Topology::LineStrip
        } else if field == Self::PT_POINTS {
            Topology::Points
        } else {
            Topology::TriList
        }
    }

    /// Returns only the color write bits.
    pub fn color_writes(self) -> StateFlags {
        self & (Self::WRITE_RGB | Self::WRITE_A)
    }

    pub fn writes_depth(self) -> bool {
        self.contains(Self::WRITE_Z)
    }
}

/// Which attachments a view clears at the start of the frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct ClearFlags(u16);

bitflags::bitflags! {
    impl ClearFlags: u16 {
        const COLOR   = 0x0001;
        const DEPTH   = 0x0002;
        const STENCIL = 0x0004;
    }
}

/// Renderer debug features.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct DebugFlags(u32);

bitflags::bitflags! {
    impl DebugFlags: u32 {
        /// Draw meshes as wireframe (when the device supports line polygon mode).
        const WIREFRAME = 0x0000_0001;
        /// Replace debug text with renderer statistics.
        const STATS     = 0x0000_0004;
        /// Show the debug text grid.
        const TEXT      = 0x0000_0008;
    }
}

/// Backbuffer configuration applied by `Gfx::reset`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct ResetFlags(u32);

bitflags::bitflags! {
    impl ResetFlags: u32 {
        const MSAA_X2   = 0x0000_0010;
        const MSAA_X4   = 0x0000_0020;
        const MSAA_X8   = 0x0000_0030;
        const MSAA_X16  = 0x0000_0040;
        const MSAA_MASK = 0x0000_0070;
        const VSYNC     = 0x0000_0080;
    }
}

impl ResetFlags {
    /// Requested backbuffer sample count (1 when MSAA is off).
    pub fn msaa_samples(self) -> u32 {
        match (self & Self::MSAA_MASK).bits() >> 4 {
            0 => 1,
            n => 1 << n.min(4),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── state decoding ────────────────────────────────────────────────────

    #[test]
    fn default_state_decodes() {
        let s = StateFlags::DEFAULT;
        assert_eq!(s.depth_test(), Some(DepthTest::Less));
        assert_eq!(s.cull(), Some(CullMode::Clockwise));
        assert_eq!(s.topology(), Topology::TriList);
        assert!(s.writes_depth());
        assert_eq!(s.color_writes(), StateFlags::WRITE_RGB | StateFlags::WRITE_A);
    }

    #[test]
    fn topology_field_is_exclusive() {
        assert_eq!(StateFlags::PT_TRISTRIP.topology(), Topology::TriStrip);
        assert_eq!(StateFlags::PT_LINES.topology(), Topology::Lines);
        assert_eq!(StateFlags::PT_LINESTRIP.topology(), Topology::LineStrip);
        assert_eq!(StateFlags::PT_POINTS.topology(), Topology::Points);
        assert_eq!(StateFlags::empty().topology(), Topology::TriList);
        assert!(Topology::LineStrip.is_strip());
        assert!(!Topology::Lines.is_strip());
    }

    #[test]
    fn depth_field_values() {
        assert_eq!(StateFlags::DEPTH_TEST_LEQUAL.depth_test(), Some(DepthTest::LessEqual));
        assert_eq!(StateFlags::DEPTH_TEST_ALWAYS.depth_test(), Some(DepthTest::Always));
        assert_eq!(StateFlags::WRITE_Z.depth_test(), None);
    }

    #[test]
    fn cull_field_values() {
        assert_eq!(StateFlags::CULL_CCW.cull(), Some(CullMode::CounterClockwise));
        assert_eq!(StateFlags::WRITE_RGB.cull(), None);
    }

    #[test]
    fn color_writes_ignore_depth_write() {
        let s = StateFlags::WRITE_Z | StateFlags::WRITE_G | StateFlags::PT_POINTS;
        assert_eq!(s.color_writes(), StateFlags::WRITE_G);
    }

    // ── reset ─────────────────────────────────────────────────────────────

    #[test]
    fn msaa_sample_counts() {
        assert_eq!(ResetFlags::VSYNC.msaa_samples(), 1);
        assert_eq!(ResetFlags::MSAA_X2.msaa_samples(), 2);
        assert_eq!((ResetFlags::MSAA_X4 | ResetFlags::VSYNC).msaa_samples(), 4);
        assert_eq!(ResetFlags::MSAA_X8.msaa_samples(), 8);
        assert_eq!(ResetFlags::MSAA_X16.msaa_samples(), 16);
    }
}
