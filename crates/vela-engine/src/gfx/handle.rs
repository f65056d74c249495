//! Typed resource handles and the free-list allocator behind them.

/// Upper bound on live handles of one kind.
pub const MAX_HANDLES: u16 = 4096;

macro_rules! handle_type {
    ($(#[$meta:meta])* $name:ident, $variant:ident) => {
        $(#[$meta])*
        #[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
        pub struct $name(pub(crate) u16);

        impl $name {
            #[inline]
            pub fn idx(self) -> u16 {
                self.0
            }
        }

        impl From<$name> for Handle {
            fn from(h: $name) -> Self {
                Handle::$variant(h)
            }
        }
    };
}

handle_type!(
    /// Static vertex buffer created with `Gfx::create_vertex_buffer`.
    VertexBufferHandle,
    VertexBuffer
);
handle_type!(
    /// Static 16-bit index buffer created with `Gfx::create_index_buffer`.
    IndexBufferHandle,
    IndexBuffer
);
handle_type!(
    /// Linked vertex + fragment program created with `Gfx::load_program`.
    ProgramHandle,
    Program
);

/// Any destroyable resource, so `Gfx::destroy` accepts every handle kind.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Handle {
    VertexBuffer(VertexBufferHandle),
    IndexBuffer(IndexBufferHandle),
    Program(ProgramHandle),
}

/// Free-list allocator for handle indices.
///
/// Freed indices are reused most-recently-freed first. Every index is either
/// live or on the free list, never both.
#[derive(Debug)]
pub struct HandleAlloc {
    live: Vec<bool>,
    free: Vec<u16>,
    capacity: u16,
    count: usize,
}

impl HandleAlloc {
    pub fn new(capacity: u16) -> Self {
        Self {
            live: Vec::new(),
            free: Vec::new(),
            capacity,
            count: 0,
        }
    }

    /// Returns a fresh index, or `None` when `capacity` indices are live.
    pub fn alloc(&mut self) -> Option<u16> {
        let idx = match self.free.pop() {
            Some(idx) => idx,
            None => {
                if self.live.len() >= self.capacity as usize {
                    return None;
                }
                self.live.push(false);
                (self.live.len() - 1) as u16
            }
        };
        self.live[idx as usize] = true;
        self.count += 1;
        Some(idx)
    }

    /// Releases `idx`. Returns `false` if it was not live.
    pub fn free(&mut self, idx: u16) -> bool {
        match self.live.get_mut(idx as usize) {
            Some(slot) if *slot => {
                *slot = false;
                self.free.push(idx);
                self.count -= 1;
                true
            }
            _ => false,
        }
    }

    #[inline]
    pub fn is_valid(&self, idx: u16) -> bool {
        self.live.get(idx as usize).copied().unwrap_or(false)
    }

    /// Number of live handles.
    #[inline]
    pub fn len(&self) -> usize {
        self.count
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

impl Default for HandleAlloc {
    fn default() -> Self {
        Self::new(MAX_HANDLES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alloc_is_sequential_until_freed() {
        let mut a = HandleAlloc::new(8);
        assert_eq!(a.alloc(), Some(0));
        assert_eq!(a.alloc(), Some(1));
        assert_eq!(a.alloc(), Some(2));
        assert_eq!(a.len(), 3);
    }

    #[test]
    fn freed_index_is_reused() {
        let mut a = HandleAlloc::new(8);
        let _ = a.alloc();
        let b = a.alloc().unwrap();
        assert!(a.free(b));
        assert!(!a.is_valid(b));
        assert_eq!(a.alloc(), Some(b));
        assert!(a.is_valid(b));
    }

    #[test]
    fn double_free_is_rejected() {
        let mut a = HandleAlloc::new(8);
        let h = a.alloc().unwrap();
        assert!(a.free(h));
        assert!(!a.free(h));
        assert!(!a.free(42));
        assert!(a.is_empty());
    }

    #[test]
    fn capacity_is_enforced() {
        let mut a = HandleAlloc::new(2);
        assert!(a.alloc().is_some());
        assert!(a.alloc().is_some());
        assert_eq!(a.alloc(), None);
        assert!(a.free(0));
        assert_eq!(a.alloc(), Some(0));
    }

    #[test]
    fn handles_convert_into_handle_enum() {
        let h: Handle = IndexBufferHandle(3).into();
        assert_eq!(h, Handle::IndexBuffer(IndexBufferHandle(3)));
    }
}
