use std::fmt;
use std::hash::{Hash, Hasher};

use crate::core::id::{IdAllocator, ParticleId};
use crate::core::vec3::{Vec3, DIM, ZERO};
use crate::error::{Error, Result};

/// A point mass carrying its own simulation clock.
///
/// Fields:
/// - `position`: position vector [x, y, z]
/// - `velocity`: velocity vector [vx, vy, vz]
/// - `mass`: particle mass (expected > 0)
/// - `current_time`: local simulation time
///
/// Identity: every construction path draws a fresh id from an `IdAllocator`.
/// `Clone` keeps the id, and equality compares ids only, so a clone stays equal
/// to its source whatever happens to either afterwards.
#[derive(Debug, Clone)]
pub struct Particle {
    /// Position (x, y, z).
    pub position: Vec3,
    /// Velocity (vx, vy, vz).
    pub velocity: Vec3,
    /// Mass.
    pub mass: f64,
    /// Local simulation clock.
    pub current_time: f64,
    id: ParticleId,
}

impl Particle {
    /// Create a particle with an id from the process-wide allocator.
    pub fn new(position: Vec3, velocity: Vec3, mass: f64) -> Self {
        Self::new_in(IdAllocator::global(), position, velocity, mass)
    }

    /// Create a particle with an id from `ids`.
    pub fn new_in(ids: &IdAllocator, position: Vec3, velocity: Vec3, mass: f64) -> Self {
        Self {
            position,
            velocity,
            mass,
            current_time: 0.0,
            id: ids.allocate(),
        }
    }

    /// Particle at rest at `position` with unit mass.
    pub fn at(position: Vec3) -> Self {
        Self::new(position, ZERO, 1.0)
    }

    /// Build a particle from a flat list of 3, 6 or 7 scalars:
    /// position, position + velocity, or position + velocity + mass.
    ///
    /// Errors:
    /// - `Error::InvalidArgument` for any other length.
    pub fn from_slice(values: &[f64]) -> Result<Self> {
        Self::from_slice_in(IdAllocator::global(), values)
    }

    /// As [`Particle::from_slice`], drawing the id from `ids`.
    pub fn from_slice_in(ids: &IdAllocator, values: &[f64]) -> Result<Self> {
        let (position, velocity, mass) = match values.len() {
            3 => (vec3_at(values, 0), ZERO, 1.0),
            6 => (vec3_at(values, 0), vec3_at(values, DIM), 1.0),
            7 => (vec3_at(values, 0), vec3_at(values, DIM), values[6]),
            n => {
                return Err(Error::InvalidArgument(format!(
                    "particle literal must have 3, 6 or 7 values, got {n}"
                )))
            }
        };
        Ok(Self::new_in(ids, position, velocity, mass))
    }

    /// Stable identifier, shared with every clone of this particle.
    #[inline]
    pub fn id(&self) -> ParticleId {
        self.id
    }
}

fn vec3_at(values: &[f64], start: usize) -> Vec3 {
    [values[start], values[start + 1], values[start + 2]]
}

impl Default for Particle {
    /// Unit mass at rest at the origin, with a fresh id.
    fn default() -> Self {
        Self::at(ZERO)
    }
}

impl PartialEq for Particle {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Particle {}

impl Hash for Particle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Particle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [x, y, z] = self.position;
        let [vx, vy, vz] = self.velocity;
        writeln!(f, "Particle<{}>:", self.id)?;
        writeln!(f, "  - Position: {x:.6}, {y:.6}, {z:.6}")?;
        writeln!(f, "  - Velocity: {vx:.6}, {vy:.6}, {vz:.6}")?;
        writeln!(f, "  - Mass: {:.6}", self.mass)?;
        write!(f, "  - Time: {:.6}", self.current_time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_particle_ok() {
        let ids = IdAllocator::new();
        let p = Particle::new_in(&ids, [0.0, 1.0, 2.0], [2.0, -3.0, 0.5], 2.0);
        assert_eq!(p.id(), 0);
        assert_eq!(p.position, [0.0, 1.0, 2.0]);
        assert_eq!(p.velocity, [2.0, -3.0, 0.5]);
        assert_eq!(p.mass, 2.0);
        assert_eq!(p.current_time, 0.0);
    }

    #[test]
    fn literal_lengths() -> Result<()> {
        let ids = IdAllocator::new();
        let a = Particle::from_slice_in(&ids, &[1.0, 2.0, 3.0])?;
        assert_eq!(a.position, [1.0, 2.0, 3.0]);
        assert_eq!(a.velocity, ZERO);
        assert_eq!(a.mass, 1.0);

        let b = Particle::from_slice_in(&ids, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0])?;
        assert_eq!(b.velocity, [4.0, 5.0, 6.0]);
        assert_eq!(b.mass, 1.0);

        let c = Particle::from_slice_in(&ids, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 0.25])?;
        assert_eq!(c.mass, 0.25);

        assert_eq!([a.id(), b.id(), c.id()], [0, 1, 2]);
        Ok(())
    }

    #[test]
    fn invalid_literal_rejected_without_consuming_id() {
        let ids = IdAllocator::new();
        for n in [0usize, 1, 2, 4, 5, 8] {
            let err = Particle::from_slice_in(&ids, &vec![0.0; n]).unwrap_err();
            assert!(matches!(err, Error::InvalidArgument(_)));
            assert!(err.to_string().contains("3, 6 or 7"));
        }
        assert_eq!(ids.peek(), 0);
    }

    #[test]
    fn clone_keeps_identity_after_mutation() {
        let mut p = Particle::at([1.0, 1.0, 1.0]);
        let mut q = p.clone();
        assert_eq!(p, q);
        p.position[0] = 42.0;
        q.velocity = [9.0, 9.0, 9.0];
        assert_eq!(p, q);
        assert_eq!(p.id(), q.id());
    }

    #[test]
    fn same_values_different_identity() {
        let p = Particle::at([1.0, 2.0, 3.0]);
        let q = Particle::at([1.0, 2.0, 3.0]);
        assert_ne!(p, q);
    }

    #[test]
    fn default_draws_fresh_id() {
        let a = Particle::default();
        let b = Particle::default();
        assert!(b.id() > a.id());
    }

    #[test]
    fn display_lists_fields() {
        let p = Particle::new([1.0, 0.0, 0.0], [0.0, 2.0, 0.0], 3.0);
        let s = p.to_string();
        assert!(s.starts_with(&format!("Particle<{}>", p.id())));
        assert!(s.contains("Mass: 3.000000"));
        assert!(s.contains("Time: 0.000000"));
    }
}
