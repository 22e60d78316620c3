use std::fmt;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use rand::{rng, rngs::StdRng, Rng, SeedableRng};
use tracing::debug;

use crate::core::id::IdAllocator;
use crate::core::particle::Particle;
use crate::core::vec3::{self, Vec3, ZERO};
use crate::error::{Error, Result};
use crate::persist;

/// An owned, ordered collection of particles.
///
/// Particles are stored by value: adding a particle or another set copies it,
/// and cloning a set copies every particle. Two sets never alias. Order is
/// insertion order.
#[derive(Debug, Clone, Default)]
pub struct ParticleSet {
    particles: Vec<Particle>,
}

impl ParticleSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a copy of `particle`.
    pub fn add(&mut self, particle: &Particle) {
        self.particles.push(particle.clone());
    }

    /// Append copies of every particle in `other`, preserving their order.
    pub fn add_set(&mut self, other: &ParticleSet) {
        self.particles.extend(other.particles.iter().cloned());
    }

    /// Particle at index `i`.
    ///
    /// Errors:
    /// - `Error::OutOfRange` if `i >= len()`.
    pub fn get(&self, i: usize) -> Result<&Particle> {
        let len = self.len();
        self.particles
            .get(i)
            .ok_or(Error::OutOfRange { index: i, len })
    }

    /// Mutable access to the particle at index `i`.
    ///
    /// Errors:
    /// - `Error::OutOfRange` if `i >= len()`.
    pub fn get_mut(&mut self, i: usize) -> Result<&mut Particle> {
        let len = self.len();
        self.particles
            .get_mut(i)
            .ok_or(Error::OutOfRange { index: i, len })
    }

    /// Number of particles.
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    /// True if the set holds no particles.
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Particles in insertion order.
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Iterate over particles in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, Particle> {
        self.particles.iter()
    }

    /// Mutable iteration, for editing particles in place.
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Particle> {
        self.particles.iter_mut()
    }

    /// Advance every particle's clock by `dt`.
    pub fn update_current_time(&mut self, dt: f64) {
        for p in &mut self.particles {
            p.current_time += dt;
        }
    }

    /// Sum of masses.
    pub fn total_mass(&self) -> f64 {
        self.particles.iter().map(|p| p.mass).sum()
    }

    /// Mass-weighted mean position.
    ///
    /// Errors:
    /// - `Error::DegenerateInput` if the total mass is zero or not finite.
    pub fn center_of_mass(&self) -> Result<Vec3> {
        self.mass_weighted_mean(|p| p.position)
    }

    /// Mass-weighted mean velocity.
    ///
    /// Errors:
    /// - `Error::DegenerateInput` if the total mass is zero or not finite.
    pub fn center_of_mass_velocity(&self) -> Result<Vec3> {
        self.mass_weighted_mean(|p| p.velocity)
    }

    fn mass_weighted_mean<F>(&self, field: F) -> Result<Vec3>
    where
        F: Fn(&Particle) -> Vec3,
    {
        let total = checked_total_mass(self.total_mass())?;
        let sum = self
            .particles
            .iter()
            .fold(ZERO, |acc, p| vec3::add(&acc, &vec3::scale(&field(p), p.mass)));
        Ok(vec3::scale(&sum, 1.0 / total))
    }

    /// Twice the largest distance from any particle to the center of mass.
    ///
    /// Errors:
    /// - `Error::DegenerateInput` if the total mass is zero or not finite.
    pub fn diameter(&self) -> Result<f64> {
        let com = self.center_of_mass()?;
        let radius = self
            .particles
            .iter()
            .map(|p| vec3::norm(&vec3::sub(&p.position, &com)))
            .fold(0.0, f64::max);
        Ok(2.0 * radius)
    }

    /// Move the set into its center-of-mass frame: subtract the center-of-mass
    /// position and velocity from every particle.
    ///
    /// Errors:
    /// - `Error::DegenerateInput` if the total mass is zero or not finite; the
    ///   set is left untouched.
    pub fn com(&mut self) -> Result<()> {
        let com = self.center_of_mass()?;
        let com_velocity = self.center_of_mass_velocity()?;
        for p in &mut self.particles {
            p.position = vec3::sub(&p.position, &com);
            p.velocity = vec3::sub(&p.velocity, &com_velocity);
        }
        Ok(())
    }

    /// Group consecutive particles sharing the same `current_time`.
    ///
    /// The set must already be ordered by non-decreasing time. An empty set
    /// splits into no groups.
    ///
    /// Errors:
    /// - `Error::InvalidArgument` if some particle's time is lower than its
    ///   predecessor's.
    pub fn split(&self) -> Result<Vec<ParticleSet>> {
        let mut groups: Vec<ParticleSet> = Vec::new();
        let mut last_time: Option<f64> = None;
        for (i, p) in self.particles.iter().enumerate() {
            match last_time {
                Some(t) if p.current_time < t => {
                    return Err(Error::InvalidArgument(format!(
                        "particles must be sorted by time: index {i} has time {} after {t}",
                        p.current_time
                    )));
                }
                Some(t) if p.current_time == t => {
                    if let Some(group) = groups.last_mut() {
                        group.add(p);
                    }
                }
                _ => {
                    let mut group = ParticleSet::new();
                    group.add(p);
                    groups.push(group);
                }
            }
            last_time = Some(p.current_time);
        }
        Ok(groups)
    }

    /// Copy of the particles in `start..end`.
    ///
    /// When `start > end` the whole set is copied.
    ///
    /// Errors:
    /// - `Error::OutOfRange` if `end > len()` (and `start <= end`).
    pub fn slice_range(&self, start: usize, end: usize) -> Result<ParticleSet> {
        if start > end {
            return Ok(self.clone());
        }
        if end > self.len() {
            return Err(Error::OutOfRange {
                index: end,
                len: self.len(),
            });
        }
        Ok(self.particles[start..end].iter().cloned().collect())
    }

    /// Copy of the first `n` particles.
    ///
    /// Errors:
    /// - `Error::OutOfRange` if `n > len()`.
    pub fn slice(&self, n: usize) -> Result<ParticleSet> {
        self.slice_range(0, n)
    }

    /// Copy of the first `n` particles with masses scaled so that the subset
    /// keeps the total mass of the whole set.
    ///
    /// Errors:
    /// - `Error::OutOfRange` if `n > len()`.
    /// - `Error::DegenerateInput` if either total mass is zero or not finite
    ///   (in particular for `n == 0`).
    pub fn slice_m(&self, n: usize) -> Result<ParticleSet> {
        let mut subset = self.slice(n)?;
        let total = checked_total_mass(self.total_mass())?;
        let sub_total = checked_total_mass(subset.total_mass())?;
        let factor = total / sub_total;
        for p in &mut subset.particles {
            p.mass *= factor;
        }
        Ok(subset)
    }

    /// `n` unit-mass particles at rest, uniformly placed in the unit cube `[0, 1)^3`.
    ///
    /// `seed` makes the draw reproducible; `None` seeds from the thread RNG.
    pub fn random(n: usize, seed: Option<u64>) -> Self {
        let mut rng = seeded_rng(seed);
        (0..n)
            .map(|_| {
                let mut r = ZERO;
                r.iter_mut().for_each(|x| *x = rng.random::<f64>());
                Particle::at(r)
            })
            .collect()
    }

    /// `n` unit-mass particles at rest, uniformly placed in the unit ball.
    ///
    /// Uses rejection sampling from the enclosing cube `[-1, 1]^3`.
    pub fn random_sphere(n: usize, seed: Option<u64>) -> Self {
        let mut rng = seeded_rng(seed);
        (0..n)
            .map(|_| {
                let r = loop {
                    let mut r = ZERO;
                    r.iter_mut().for_each(|x| *x = rng.random_range(-1.0..=1.0));
                    if vec3::dot(&r, &r) <= 1.0 {
                        break r;
                    }
                };
                Particle::at(r)
            })
            .collect()
    }

    /// Write the set to `path` in the format described in [`crate::persist`].
    pub fn export<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path)?;
        persist::write_set(self, BufWriter::new(file))?;
        debug!(path = %path.display(), count = self.len(), "exported particle set");
        Ok(())
    }

    /// Read a set written by [`ParticleSet::export`]. Loaded particles get
    /// fresh ids from the process-wide allocator.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::load_in(path, IdAllocator::global())
    }

    /// As [`ParticleSet::load`], drawing ids from `ids`.
    pub fn load_in<P: AsRef<Path>>(path: P, ids: &IdAllocator) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let set = persist::read_set(BufReader::new(file), ids)?;
        debug!(path = %path.display(), count = set.len(), "loaded particle set");
        Ok(set)
    }
}

fn checked_total_mass(total: f64) -> Result<f64> {
    if total == 0.0 || !total.is_finite() {
        return Err(Error::DegenerateInput(format!(
            "total mass must be finite and non-zero, got {total}"
        )));
    }
    Ok(total)
}

fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => SeedableRng::seed_from_u64(s),
        None => SeedableRng::seed_from_u64(rng().random()),
    }
}

impl FromIterator<Particle> for ParticleSet {
    fn from_iter<I: IntoIterator<Item = Particle>>(iter: I) -> Self {
        Self {
            particles: iter.into_iter().collect(),
        }
    }
}

impl Extend<Particle> for ParticleSet {
    fn extend<I: IntoIterator<Item = Particle>>(&mut self, iter: I) {
        self.particles.extend(iter);
    }
}

impl IntoIterator for ParticleSet {
    type Item = Particle;
    type IntoIter = std::vec::IntoIter<Particle>;

    fn into_iter(self) -> Self::IntoIter {
        self.particles.into_iter()
    }
}

impl<'a> IntoIterator for &'a ParticleSet {
    type Item = &'a Particle;
    type IntoIter = std::slice::Iter<'a, Particle>;

    fn into_iter(self) -> Self::IntoIter {
        self.particles.iter()
    }
}

impl fmt::Display for ParticleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "ParticleSet <#{}>:", self.len())?;
        writeln!(f, "  - Total mass: {:.6}", self.total_mass())?;
        match (
            self.center_of_mass(),
            self.center_of_mass_velocity(),
            self.diameter(),
        ) {
            (Ok(com), Ok(com_v), Ok(d)) => {
                writeln!(
                    f,
                    "  - Center of mass: {:.6} (distance from origin)",
                    vec3::norm(&com)
                )?;
                writeln!(f, "  - Center of mass velocity: {:.6}", vec3::norm(&com_v))?;
                write!(f, "  - Diameter: {d:.6}")
            }
            _ => write!(f, "  - Center of mass: undefined (zero total mass)"),
        }
    }
}
