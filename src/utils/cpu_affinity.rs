//! CPU affinity guard for stable measurements.
//!
//! Pins the calling thread to the core it is currently running on and
//! restores the previous affinity mask on drop. Implemented on Linux with
//! `libc`; on other platforms the guard is a no-op.

#[cfg(target_os = "linux")]
mod platform {
    /// Affinity mask saved before pinning
    pub struct Saved(libc::cpu_set_t);

    pub fn pin_to_current_core() -> Option<(usize, Saved)> {
        // SAFETY: plain libc calls on a zero-initialized, correctly sized cpu_set_t.
        unsafe {
            let cpu = libc::sched_getcpu();
            if cpu < 0 {
                return None;
            }

            let mut original: libc::cpu_set_t = std::mem::zeroed();
            if libc::sched_getaffinity(0, std::mem::size_of::<libc::cpu_set_t>(), &mut original) != 0 {
                return None;
            }

            let mut set: libc::cpu_set_t = std::mem::zeroed();
            libc::CPU_ZERO(&mut set);
            libc::CPU_SET(cpu as usize, &mut set);
            if libc::sched_setaffinity(0, std::mem::size_of::<libc::cpu_set_t>(), &set) != 0 {
                return None;
            }

            Some((cpu as usize, Saved(original)))
        }
    }

    pub fn restore(saved: &Saved) -> bool {
        // SAFETY: restores a mask previously returned by sched_getaffinity.
        unsafe { libc::sched_setaffinity(0, std::mem::size_of::<libc::cpu_set_t>(), &saved.0) == 0 }
    }
}

#[cfg(not(target_os = "linux"))]
mod platform {
    pub struct Saved;

    pub fn pin_to_current_core() -> Option<(usize, Saved)> {
        None
    }

    pub fn restore(_saved: &Saved) -> bool {
        true
    }
}

/// RAII guard: the thread stays on one core until the guard is dropped.
pub struct CpuPinGuard {
    core: Option<usize>,
    saved: Option<platform::Saved>,
}

impl CpuPinGuard {
    /// Pin the current thread. Failure to pin is logged and otherwise ignored.
    pub fn new() -> Self {
        match platform::pin_to_current_core() {
            Some((core, saved)) => {
                tracing::trace!(core, "pinned thread");
                Self {
                    core: Some(core),
                    saved: Some(saved),
                }
            }
            None => {
                #[cfg(target_os = "linux")]
                tracing::warn!("could not pin thread to current core, measurements may be noisier");
                Self {
                    core: None,
                    saved: None,
                }
            }
        }
    }

    /// Core the thread is pinned to, if pinning succeeded
    pub fn core(&self) -> Option<usize> {
        self.core
    }
}

impl Default for CpuPinGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for CpuPinGuard {
    fn drop(&mut self) {
        if let Some(saved) = self.saved.take() {
            if !platform::restore(&saved) {
                tracing::warn!("failed to restore CPU affinity");
            }
        }
    }
}
