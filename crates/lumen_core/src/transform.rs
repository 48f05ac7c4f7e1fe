use glam::{Mat4, Quat, Vec3};
use serde::Serialize;

/// Translation/rotation/scale view of an affine matrix.
///
/// Scene nodes store full matrices; this is what we hand to humans (logs,
/// reports).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Transform {
    /// Splits an affine matrix into its parts. Shear is lost.
    pub fn from_matrix(matrix: &Mat4) -> Self {
        let (scale, rotation, translation) = matrix.to_scale_rotation_translation();
        Self {
            translation,
            rotation,
            scale,
        }
    }

    /// Creates the Model Matrix (Local -> World)
    pub fn compute_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }
}

/// Inverse of `matrix`, or `None` when it is singular.
///
/// Only an exactly zero determinant or a non-finite result counts as
/// singular, so tiny uniform scales (millimetre-unit models) still invert.
pub fn try_inverse(matrix: &Mat4) -> Option<Mat4> {
    if matrix.determinant() == 0.0 {
        return None;
    }
    let inverse = matrix.inverse();
    inverse.is_finite().then_some(inverse)
}

/// Folds a chain of local matrices, nearest first, by post-multiplying each
/// successive matrix onto the running product: `((m0 * m1) * m2) ...`.
///
/// An empty chain yields the identity.
pub fn compose_chain<'a, I>(chain: I) -> Mat4
where
    I: IntoIterator<Item = &'a Mat4>,
{
    let mut chain = chain.into_iter();
    let Some(first) = chain.next() else {
        return Mat4::IDENTITY;
    };
    chain.fold(*first, |acc, next| acc * *next)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matrix_round_trips_through_parts() {
        let transform = Transform {
            translation: Vec3::new(1.0, -2.0, 3.0),
            rotation: Quat::from_rotation_y(0.5),
            scale: Vec3::new(2.0, 2.0, 2.0),
        };
        let back = Transform::from_matrix(&transform.compute_matrix());

        assert!(back.translation.abs_diff_eq(transform.translation, 1e-5));
        assert!(back.scale.abs_diff_eq(transform.scale, 1e-5));
        assert!(back.rotation.abs_diff_eq(transform.rotation, 1e-5));
    }

    #[test]
    fn chain_is_post_multiplied_in_order() {
        let a = Mat4::from_scale(Vec3::splat(2.0));
        let b = Mat4::from_translation(Vec3::new(0.0, 5.0, 0.0));
        let c = Mat4::from_rotation_z(1.0);

        assert_eq!(compose_chain([&a, &b, &c]), (a * b) * c);
        assert_ne!(compose_chain([&a, &b]), b * a);
    }

    #[test]
    fn tiny_scales_still_invert() {
        let model = Mat4::from_scale(Vec3::splat(0.001));
        let inverse = try_inverse(&model).unwrap();
        assert!(inverse.abs_diff_eq(Mat4::from_scale(Vec3::splat(1000.0)), 1e-2));
    }

    #[test]
    fn singular_matrices_have_no_inverse() {
        assert_eq!(try_inverse(&Mat4::ZERO), None);
        assert_eq!(try_inverse(&Mat4::from_scale(Vec3::new(1.0, 0.0, 1.0))), None);
    }

    #[test]
    fn empty_chain_is_identity() {
        assert_eq!(compose_chain(std::iter::empty()), Mat4::IDENTITY);
    }
}
