//! Property-based checks over random kernels, separations and particle sets.

use proptest::prelude::*;
use sphcore::core::vec3::{self, ZERO};
use sphcore::core::{Kernel, KernelKind, Particle, ParticleSet};

fn any_kind() -> impl Strategy<Value = KernelKind> {
    prop_oneof![Just(KernelKind::Linear), Just(KernelKind::Quartic)]
}

proptest! {
    /// Value and gradient vanish at and beyond the support radius.
    #[test]
    fn zero_outside_support(
        kind in any_kind(),
        h in 0.01f64..100.0,
        dir in prop::array::uniform3(-1.0f64..1.0),
        stretch in 1.0f64..10.0,
    ) {
        let len = vec3::norm(&dir);
        prop_assume!(len > 1e-3);
        let k = Kernel::new(kind, h).unwrap();
        let r = vec3::scale(&dir, stretch * h / len);
        prop_assume!(vec3::norm(&r) >= h);
        prop_assert_eq!(k.value_at(&r), 0.0);
        prop_assert_eq!(k.gradient(&r), ZERO);
    }

    /// Inside the support the kernel is non-negative and finite.
    #[test]
    fn non_negative_inside_support(kind in any_kind(), h in 0.01f64..100.0, u in 0.0f64..1.0) {
        let k = Kernel::new(kind, h).unwrap();
        let v = k.value(u * h);
        prop_assert!(v >= 0.0 && v.is_finite());
    }

    /// Normalization does not depend on the radius.
    #[test]
    fn normalized_for_any_radius(kind in any_kind(), h in 0.001f64..1000.0) {
        let k = Kernel::new(kind, h).unwrap();
        prop_assert!((1.0 - k.integral()).abs() < 1e-6);
    }

    /// Mass-preserving slices keep the total for every valid prefix length.
    #[test]
    fn slice_m_conserves_mass(masses in prop::collection::vec(0.1f64..10.0, 1..40), pick in 0usize..40) {
        let set: ParticleSet = masses.iter().map(|&m| Particle::new(ZERO, ZERO, m)).collect();
        let n = 1 + pick % set.len();
        let sub = set.slice_m(n).unwrap();
        prop_assert_eq!(sub.len(), n);
        prop_assert!((sub.total_mass() - set.total_mass()).abs() < 1e-9 * set.total_mass());
    }
}
