//! Small helpers over `[f64; DIM]` vectors.

/// Fixed spatial dimension (3D).
pub const DIM: usize = 3;

/// A 3-component real vector.
pub type Vec3 = [f64; DIM];

/// The zero vector.
pub const ZERO: Vec3 = [0.0; DIM];

/// Dot product.
#[inline]
pub fn dot(a: &Vec3, b: &Vec3) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

/// Euclidean norm.
#[inline]
pub fn norm(a: &Vec3) -> f64 {
    dot(a, a).sqrt()
}

/// Component-wise sum.
#[inline]
pub fn add(a: &Vec3, b: &Vec3) -> Vec3 {
    [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
}

/// Component-wise difference `a - b`.
#[inline]
pub fn sub(a: &Vec3, b: &Vec3) -> Vec3 {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

/// Multiply every component by `s`.
#[inline]
pub fn scale(a: &Vec3, s: f64) -> Vec3 {
    [a[0] * s, a[1] * s, a[2] * s]
}

/// Unit vector along axis `k` (0, 1 or 2).
#[inline]
pub fn axis(k: usize) -> Vec3 {
    let mut e = ZERO;
    e[k] = 1.0;
    e
}
