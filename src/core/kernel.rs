//! Radial SPH smoothing kernels.
//!
//! A kernel is split into a *shape* `W(u)` over the normalized distance
//! `u = r / h`, its derivative `dW/du`, and a closed-form normalization volume
//! `V`. The physical kernel is `W(r/h) / V / h^3`, which integrates to one over
//! the ball of radius `h`.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::core::vec3::{self, Vec3, ZERO};
use crate::error::{Error, Result};

/// Number of radial steps used by [`Kernel::integral`].
pub const INTEGRAL_STEPS: usize = 1000;

/// Closed set of supported kernel shapes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KernelKind {
    /// `W(u) = 1 - u`.
    Linear,
    /// `W(u) = (1 - u^2)^2`.
    #[default]
    Quartic,
}

impl KernelKind {
    /// Every supported kind, in declaration order.
    pub const ALL: [KernelKind; 2] = [KernelKind::Linear, KernelKind::Quartic];

    /// Unnormalized weight at `u = r / h`; zero for `u >= 1`.
    #[inline]
    pub fn shape(self, u: f64) -> f64 {
        if u >= 1.0 {
            return 0.0;
        }
        match self {
            KernelKind::Linear => 1.0 - u,
            KernelKind::Quartic => {
                let s = 1.0 - u * u;
                s * s
            }
        }
    }

    /// `dW/du` at `u = r / h`.
    #[inline]
    pub fn shape_derivative(self, u: f64) -> f64 {
        match self {
            KernelKind::Linear => -1.0,
            KernelKind::Quartic => -4.0 * u * (1.0 - u * u),
        }
    }

    /// Integral of `W(|x|)` over the unit ball.
    #[inline]
    pub fn volume(self) -> f64 {
        match self {
            KernelKind::Linear => PI / 3.0,
            KernelKind::Quartic => 32.0 * PI / 105.0,
        }
    }

    /// Display label, e.g. `"LinearKernel"`.
    pub fn name(self) -> &'static str {
        match self {
            KernelKind::Linear => "LinearKernel",
            KernelKind::Quartic => "QuarticKernel",
        }
    }
}

/// A normalized kernel with a fixed support radius `h`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Kernel {
    kind: KernelKind,
    h: f64,
    volume: f64,
}

impl Kernel {
    /// Create a kernel of the given shape and support radius.
    ///
    /// Errors:
    /// - `Error::InvalidArgument` if `h` is not finite and > 0.
    pub fn new(kind: KernelKind, h: f64) -> Result<Self> {
        if !h.is_finite() || h <= 0.0 {
            return Err(Error::InvalidArgument(format!(
                "smoothing radius must be finite and > 0, got {h}"
            )));
        }
        Ok(Self {
            kind,
            h,
            volume: kind.volume(),
        })
    }

    /// Linear kernel with support radius `h`.
    pub fn linear(h: f64) -> Result<Self> {
        Self::new(KernelKind::Linear, h)
    }

    /// Quartic kernel with support radius `h`.
    pub fn quartic(h: f64) -> Result<Self> {
        Self::new(KernelKind::Quartic, h)
    }

    /// Shape of this kernel.
    #[inline]
    pub fn kind(&self) -> KernelKind {
        self.kind
    }

    /// Smoothing (support) radius `h`.
    #[inline]
    pub fn support_radius(&self) -> f64 {
        self.h
    }

    /// Unnormalized shape `W(u)`.
    #[inline]
    pub fn shape(&self, u: f64) -> f64 {
        self.kind.shape(u)
    }

    /// Shape derivative `dW/du`.
    #[inline]
    pub fn shape_derivative(&self, u: f64) -> f64 {
        self.kind.shape_derivative(u)
    }

    /// Normalization volume `V`.
    #[inline]
    pub fn volume(&self) -> f64 {
        self.volume
    }

    /// Kernel value at distance `r`; zero for `r >= h`. Units of inverse volume.
    #[inline]
    pub fn value(&self, r: f64) -> f64 {
        if r >= self.h {
            return 0.0;
        }
        self.kind.shape(r / self.h) / self.volume / self.h.powi(3)
    }

    /// Kernel value at separation vector `r`.
    #[inline]
    pub fn value_at(&self, r: &Vec3) -> f64 {
        self.value(vec3::norm(r))
    }

    /// Gradient with respect to `r`.
    ///
    /// Zero outside the support and at the origin, where the radial direction
    /// is undefined.
    pub fn gradient(&self, r: &Vec3) -> Vec3 {
        let dist = vec3::norm(r);
        if dist >= self.h || dist == 0.0 {
            return ZERO;
        }
        let dwdr = self.kind.shape_derivative(dist / self.h) / self.volume / self.h.powi(4);
        vec3::scale(r, dwdr / dist)
    }

    /// Numerical integral of the kernel over its support ball.
    ///
    /// Midpoint rectangle rule in the radial coordinate with
    /// [`INTEGRAL_STEPS`] steps of `0.001 * h`. Diagnostic only: a correctly
    /// normalized kernel gives 1.
    pub fn integral(&self) -> f64 {
        let dr = self.h / INTEGRAL_STEPS as f64;
        (0..INTEGRAL_STEPS)
            .map(|k| {
                let r = (k as f64 + 0.5) * dr;
                self.value(r) * 4.0 * PI * r * r * dr
            })
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_bad_radius() {
        for h in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let err = Kernel::linear(h).unwrap_err();
            assert!(matches!(err, Error::InvalidArgument(_)));
        }
    }

    #[test]
    fn linear_closed_form() -> Result<()> {
        let k = Kernel::linear(10.0)?;
        assert_eq!(k.shape(0.0), 1.0);
        assert_eq!(k.shape(1.0), 0.0);
        assert!((k.volume() - 1.047198).abs() < 1e-6);
        let expected = 1.0 / (PI / 3.0) / 1000.0;
        assert!((k.value(0.0) - expected).abs() < 1e-15);
        assert!((k.value(0.0) - 0.0009549).abs() < 1e-7);
        Ok(())
    }

    #[test]
    fn shapes_vanish_beyond_unit_distance() -> Result<()> {
        assert_eq!(Kernel::linear(10.0)?.shape(1.5), 0.0);
        for kind in KernelKind::ALL {
            assert_eq!(kind.shape(1.0), 0.0);
            assert_eq!(kind.shape(3.0), 0.0);
            assert!(kind.shape(0.999) > 0.0);
        }
        Ok(())
    }

    #[test]
    fn quartic_closed_form() -> Result<()> {
        let k = Kernel::quartic(10.0)?;
        assert_eq!(k.shape(1.0), 0.0);
        assert_eq!(k.shape(1.5), 0.0);
        assert_eq!(k.shape_derivative(0.0), 0.0);
        assert_eq!(k.volume(), 32.0 * PI / 105.0);
        assert!((k.volume() - 0.957438).abs() < 1e-6);
        Ok(())
    }

    #[test]
    fn zero_outside_support() -> Result<()> {
        for kind in KernelKind::ALL {
            let k = Kernel::new(kind, 10.0)?;
            assert_eq!(k.value(10.0), 0.0);
            assert_eq!(k.value(25.0), 0.0);
            assert_eq!(k.gradient(&[10.0, 0.0, 0.0]), ZERO);
            assert_eq!(k.gradient(&[8.0, 8.0, 0.0]), ZERO);
        }
        Ok(())
    }

    #[test]
    fn gradient_at_origin_is_zero() -> Result<()> {
        let k = Kernel::linear(1.0)?;
        assert_eq!(k.gradient(&ZERO), ZERO);
        Ok(())
    }

    #[test]
    fn gradient_points_inward() -> Result<()> {
        // Both shapes decrease with r, so the gradient opposes r.
        for kind in KernelKind::ALL {
            let k = Kernel::new(kind, 2.0)?;
            let r = [0.3, -0.2, 0.5];
            let g = k.gradient(&r);
            assert!(vec3::dot(&g, &r) < 0.0);
        }
        Ok(())
    }

    #[test]
    fn value_at_matches_scalar() -> Result<()> {
        let k = Kernel::quartic(3.0)?;
        let r = [1.0, 2.0, 0.0];
        assert_eq!(k.value_at(&r), k.value(5.0_f64.sqrt()));
        Ok(())
    }

    #[test]
    fn integrals_are_normalized() -> Result<()> {
        for kind in KernelKind::ALL {
            for h in [0.5, 1.0, 10.0] {
                let i = Kernel::new(kind, h)?.integral();
                assert!((1.0 - i).abs() < 1e-6, "{} h={h}: integral {i}", kind.name());
            }
        }
        Ok(())
    }

    #[test]
    fn kind_round_trips_through_json() -> std::result::Result<(), serde_json::Error> {
        let s = serde_json::to_string(&KernelKind::Linear)?;
        assert_eq!(s, "\"Linear\"");
        let k: KernelKind = serde_json::from_str("\"Quartic\"")?;
        assert_eq!(k, KernelKind::Quartic);
        Ok(())
    }
}
