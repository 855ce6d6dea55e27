//! Quadrature decoder driven from the primary-phase edge interrupt
//!
//! One instance per channel, usually a `static`, handed by reference to the
//! interrupt-side task at startup. The interrupt side is the only writer; the
//! control cycle only loads.
//!
//! Decoding is single-sample: on each primary edge the secondary level is
//! compared with the new primary level. There is no transition table and no
//! software debounce, the encoder inputs carry RC filters instead.
//!
//! The count is never clamped here, in or out of calibration. Range limits
//! are applied by the mapper only.

use core::sync::atomic::{AtomicBool, AtomicI32, Ordering};

/// Per-channel decoder state shared between interrupt and control cycle
pub struct QuadratureDecoder {
    /// Signed pulse count (wraps on overflow)
    position: AtomicI32,
    /// Last primary level seen by the edge handler
    last_primary: AtomicBool,
}

impl QuadratureDecoder {
    /// Create a decoder at position 0 with the primary line assumed high
    /// (inputs are pulled up)
    pub const fn new() -> Self {
        Self {
            position: AtomicI32::new(0),
            last_primary: AtomicBool::new(true),
        }
    }

    /// Record the current primary level before edges are enabled
    ///
    /// Must be called before the edge handler is armed.
    pub fn prime(&self, primary: bool) {
        self.last_primary.store(primary, Ordering::Relaxed);
        self.position.store(0, Ordering::Relaxed);
    }

    /// Edge handler body
    ///
    /// # Arguments
    /// * `primary` - primary phase level read after the edge
    /// * `secondary` - secondary phase level read after the edge
    ///
    /// A call whose primary level equals the last observed one is a spurious
    /// wake-up (bounce, or an edge already consumed) and is ignored.
    #[inline(always)]
    pub fn on_primary_edge(&self, primary: bool, secondary: bool) {
        if primary == self.last_primary.load(Ordering::Relaxed) {
            return;
        }

        if secondary != primary {
            self.position.fetch_add(1, Ordering::Relaxed);
        } else {
            self.position.fetch_sub(1, Ordering::Relaxed);
        }

        self.last_primary.store(primary, Ordering::Relaxed);
    }

    /// Current raw position
    #[inline(always)]
    pub fn position(&self) -> i32 {
        self.position.load(Ordering::Relaxed)
    }

    /// Last primary level seen by the edge handler
    pub fn last_primary(&self) -> bool {
        self.last_primary.load(Ordering::Relaxed)
    }
}

impl Default for QuadratureDecoder {
    fn default() -> Self {
        Self::new()
    }
}
