/// Z-ordering key for overlay draw items.
///
/// Higher values appear on top of lower values.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Default)]
pub struct ZIndex(pub i32);

impl ZIndex {
    /// Layer used for debug text; above anything the UI records.
    pub const DEBUG_TEXT: ZIndex = ZIndex(1 << 24);

    #[inline]
    pub const fn new(v: i32) -> Self {
        Self(v)
    }

    #[inline]
    pub const fn offset(self, by: i32) -> Self {
        Self(self.0.saturating_add(by))
    }
}
