// SPDX-License-Identifier: LGPL-3.0-or-later

//! Biquad value types and the per-block floating-point guard.

/// Number of delay (memory) elements in a single biquad section.
pub const BIQUAD_D_ITEMS: usize = 2;

/// Normalised coefficients of one biquad section.
///
/// Implements the difference equation (transposed direct form II with
/// pre-negated feedback coefficients):
/// ```text
///   y[n] = b0*x[n] + d0
///   d0   = b1*x[n] + a1*y[n] + d1
///   d1   = b2*x[n] + a2*y[n]
/// ```
///
/// Relative to the Audio EQ Cookbook, `a1 = -a1_std / a0` and
/// `a2 = -a2_std / a0`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BiquadCoeffs {
    pub b0: f32,
    pub b1: f32,
    pub b2: f32,
    pub a1: f32,
    pub a2: f32,
}

impl BiquadCoeffs {
    /// Pass-through section: `y[n] = x[n]`.
    pub const IDENTITY: Self = Self {
        b0: 1.0,
        b1: 0.0,
        b2: 0.0,
        a1: 0.0,
        a2: 0.0,
    };

    /// Returns `true` if every coefficient is finite.
    pub fn is_finite(&self) -> bool {
        self.b0.is_finite()
            && self.b1.is_finite()
            && self.b2.is_finite()
            && self.a1.is_finite()
            && self.a2.is_finite()
    }
}

/// Delay-line memory of one biquad section.
///
/// Kept apart from [`BiquadCoeffs`] so that coefficients can be shared
/// between channels while each channel keeps its own filter history.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BiquadState {
    pub d: [f32; BIQUAD_D_ITEMS],
}

impl BiquadState {
    /// Zero both delay slots.
    pub fn reset(&mut self) {
        self.d = [0.0; BIQUAD_D_ITEMS];
    }
}

/// Saves and restores the floating-point control state around a block.
///
/// Enables flush-to-zero (FTZ) and denormals-are-zero (DAZ) while a
/// block is processed. Recursive filters decaying towards silence
/// otherwise produce long runs of denormals.
///
/// # Platform support
///
/// On x86 targets both MXCSR flags are raised. On aarch64 only FPCR.FZ
/// exists. Elsewhere the guard does nothing.
///
/// # Examples
/// ```
/// use eq_dsp_lib::types::DspContext;
///
/// let mut guard = DspContext::default();
/// guard.start();
/// assert!(guard.is_active());
/// guard.finish();
/// ```
#[derive(Debug, Default)]
pub struct DspContext {
    /// Control word captured by `start`, present while active.
    saved: Option<u64>,
}

impl DspContext {
    /// Save the floating-point control word and switch on flush-to-zero.
    /// Has no effect while already active.
    pub fn start(&mut self) {
        if self.saved.is_none() {
            let word = fp_control::read();
            fp_control::write(word | fp_control::FLUSH_BITS);
            self.saved = Some(word);
        }
    }

    /// Restore the control word saved by [`start`](Self::start).
    pub fn finish(&mut self) {
        if let Some(word) = self.saved.take() {
            fp_control::write(word);
        }
    }

    /// Whether a control word is saved and waiting to be restored.
    pub fn is_active(&self) -> bool {
        self.saved.is_some()
    }
}

impl Drop for DspContext {
    fn drop(&mut self) {
        self.finish();
    }
}

/// Per-architecture access to the floating-point control register.
#[allow(deprecated)]
mod fp_control {
    #[cfg(target_arch = "x86")]
    use core::arch::x86::{_mm_getcsr, _mm_setcsr};
    #[cfg(target_arch = "x86_64")]
    use core::arch::x86_64::{_mm_getcsr, _mm_setcsr};

    /// MXCSR flush-to-zero (bit 15) and denormals-are-zero (bit 6).
    #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
    pub const FLUSH_BITS: u64 = 0x8000 | 0x0040;

    #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
    pub fn read() -> u64 {
        unsafe { u64::from(_mm_getcsr()) }
    }

    #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
    pub fn write(word: u64) {
        unsafe { _mm_setcsr(word as u32) }
    }

    /// FPCR FZ (bit 24).
    #[cfg(target_arch = "aarch64")]
    pub const FLUSH_BITS: u64 = 1 << 24;

    #[cfg(target_arch = "aarch64")]
    pub fn read() -> u64 {
        let word: u64;
        unsafe { core::arch::asm!("mrs {}, fpcr", out(reg) word) };
        word
    }

    #[cfg(target_arch = "aarch64")]
    pub fn write(word: u64) {
        unsafe { core::arch::asm!("msr fpcr, {}", in(reg) word) };
    }

    #[cfg(not(any(target_arch = "x86", target_arch = "x86_64", target_arch = "aarch64")))]
    pub const FLUSH_BITS: u64 = 0;

    #[cfg(not(any(target_arch = "x86", target_arch = "x86_64", target_arch = "aarch64")))]
    pub fn read() -> u64 {
        0
    }

    #[cfg(not(any(target_arch = "x86", target_arch = "x86_64", target_arch = "aarch64")))]
    pub fn write(_word: u64) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_coefficients() {
        let c = BiquadCoeffs::IDENTITY;
        assert_eq!(c.b0, 1.0);
        assert_eq!(c.b1 + c.b2 + c.a1 + c.a2, 0.0);
        assert!(c.is_finite());
    }

    #[test]
    fn non_finite_coefficients_detected() {
        let c = BiquadCoeffs {
            a1: f32::NAN,
            ..BiquadCoeffs::IDENTITY
        };
        assert!(!c.is_finite());
    }

    #[test]
    fn state_reset() {
        let mut st = BiquadState { d: [0.25, -1.0] };
        st.reset();
        assert_eq!(st, BiquadState::default());
    }

    #[test]
    fn guard_nests_harmlessly() {
        let mut guard = DspContext::default();
        assert!(!guard.is_active());

        guard.start();
        guard.start();
        assert!(guard.is_active());

        guard.finish();
        guard.finish();
        assert!(!guard.is_active());
    }

    #[test]
    fn dsp_context_restores_on_drop() {
        {
            let mut guard = DspContext::default();
            guard.start();
        }

        let tiny = std::hint::black_box(f32::MIN_POSITIVE * 0.5);
        let kept = std::hint::black_box(tiny) * std::hint::black_box(1.0f32);
        assert!(kept.is_subnormal(), "subnormals should survive once the context is gone");
    }
}
