//! wgpu device and window surface used by the GPU backend.
//!
//! [`Gpu`] owns the instance, adapter, device, queue and surface, hands out
//! one [`GpuFrame`] per `frame()` and maps surface errors to a
//! [`SurfaceErrorAction`].

mod gpu;
mod init;
mod surface;

pub use gpu::{Gpu, GpuFrame};
pub use surface::SurfaceErrorAction;
pub use init::GpuInit;
pub(crate) use init::{pick_vendor_adapter, present_mode_for};
