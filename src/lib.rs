//! Smoothed-particle-hydrodynamics building blocks.
//!
//! This crate provides radial smoothing kernels with a built-in self-check,
//! plus the particle and particle-set data model a simulation loop would drive.
//! Everything here is synchronous and single-threaded; particle identifiers
//! come from an atomic [`core::IdAllocator`], so particles may still be built
//! from several threads.
//!
//! ```
//! use sphcore::core::{validate, Kernel, ParticleSet};
//!
//! # fn main() -> sphcore::error::Result<()> {
//! let kernel = Kernel::quartic(10.0)?;
//! assert!(validate(&kernel, "quartic").passed());
//!
//! let mut set = ParticleSet::random_sphere(100, Some(1));
//! set.com()?;
//! assert!(set.diameter()? <= 4.0);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod core;
pub mod error;
pub mod persist;

pub use crate::config::KernelConfig;
pub use crate::core::{Kernel, KernelKind, KernelReport, Particle, ParticleSet};
pub use crate::error::{Error, Result};
