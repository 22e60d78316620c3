#![allow(missing_docs)] // Doc comments live on the public items in each submodule.

//! Kernels, particles and particle sets.
//!
//! - [`kernel`]: radial smoothing kernels (`Linear`, `Quartic`).
//! - [`validate`]: normalization and gradient self-checks for kernels.
//! - [`particle`]: a single point mass with identity.
//! - [`particle_set`]: an owned, ordered collection of particles.

pub mod id;
pub mod kernel;
pub mod particle;
pub mod particle_set;
pub mod validate;
pub mod vec3;

pub use id::{IdAllocator, ParticleId};
pub use kernel::{Kernel, KernelKind};
pub use particle::Particle;
pub use particle_set::ParticleSet;
pub use validate::{validate, KernelReport};
pub use vec3::{Vec3, DIM};
