//! Self-validation of kernels: normalization and gradient consistency.
//!
//! Failures are reported in the returned [`KernelReport`], never raised.

use tracing::{info, warn};

use crate::core::kernel::Kernel;
use crate::core::vec3::{self, Vec3, ZERO};

/// Tolerance for both checks.
pub const TOLERANCE: f64 = 1e-6;

/// Sample point, as a fraction of `h`, for the gradient check.
pub const GRADIENT_SAMPLE: Vec3 = [0.25, 0.17, 0.10];

/// Finite-difference step, as a fraction of `h`.
pub const FD_STEP: f64 = 1e-6;

/// Outcome of validating one kernel.
#[derive(Clone, Debug, PartialEq)]
pub struct KernelReport {
    /// Name the kernel was validated under.
    pub label: String,
    /// Value of `Kernel::integral`.
    pub integral: f64,
    /// `|1 - integral| < TOLERANCE`.
    pub normalized: bool,
    /// Analytic gradient at the sample point.
    pub analytic_gradient: Vec3,
    /// Central finite-difference gradient at the same point.
    pub numeric_gradient: Vec3,
    /// Euclidean norm of their difference.
    pub gradient_error: f64,
    /// `gradient_error < TOLERANCE`.
    pub gradient_consistent: bool,
}

impl KernelReport {
    /// Both the normalization and gradient checks held.
    pub fn passed(&self) -> bool {
        self.normalized && self.gradient_consistent
    }
}

/// Central finite-difference gradient of `kernel.value_at` at `r` with step `d`.
pub fn finite_difference_gradient(kernel: &Kernel, r: &Vec3, d: f64) -> Vec3 {
    let mut grad = ZERO;
    for (k, g) in grad.iter_mut().enumerate() {
        let step = vec3::scale(&vec3::axis(k), d);
        let fwd = kernel.value_at(&vec3::add(r, &step));
        let bwd = kernel.value_at(&vec3::sub(r, &step));
        *g = (fwd - bwd) / (2.0 * d);
    }
    grad
}

/// Run the normalization and gradient checks on `kernel`.
pub fn validate(kernel: &Kernel, label: &str) -> KernelReport {
    let h = kernel.support_radius();

    let integral = kernel.integral();
    let normalized = (1.0 - integral).abs() < TOLERANCE;

    let r = vec3::scale(&GRADIENT_SAMPLE, h);
    let analytic_gradient = kernel.gradient(&r);
    let numeric_gradient = finite_difference_gradient(kernel, &r, FD_STEP * h);
    let gradient_error = vec3::norm(&vec3::sub(&analytic_gradient, &numeric_gradient));
    let gradient_consistent = gradient_error < TOLERANCE;

    info!(label, h, integral, gradient_error, "kernel validated");
    if !normalized {
        warn!(label, integral, "kernel integral differs from 1");
    }
    if !gradient_consistent {
        warn!(label, gradient_error, "analytic gradient disagrees with finite differences");
    }

    KernelReport {
        label: label.to_string(),
        integral,
        normalized,
        analytic_gradient,
        numeric_gradient,
        gradient_error,
        gradient_consistent,
    }
}

/// Validate several labelled kernels.
pub fn validate_all<'a, I>(kernels: I) -> Vec<KernelReport>
where
    I: IntoIterator<Item = (&'a str, &'a Kernel)>,
{
    kernels
        .into_iter()
        .map(|(label, kernel)| validate(kernel, label))
        .collect()
}
