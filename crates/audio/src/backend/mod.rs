//! Playback backends.
//!
//! [`simulated`] is always available and needs no audio device; the rodio
//! backend is compiled in with the `rodio_backend` feature.

mod file_loader;
pub mod simulated;

#[cfg(feature = "rodio_backend")]
pub mod rodio_backend;

pub use file_loader::{EncodedSound, FileLoader};
pub use simulated::{SimulatedClip, SimulatedEngine, SimulatedLoader};

use crate::SoundHandle;

/// Monotonic handle allocator shared by the bundled backends.
#[derive(Debug, Default)]
pub(crate) struct HandleAllocator {
    next: u64,
}

impl HandleAllocator {
    pub(crate) fn next(&mut self) -> SoundHandle {
        let handle = SoundHandle::new(self.next);
        self.next = self.next.wrapping_add(1);
        handle
    }
}
