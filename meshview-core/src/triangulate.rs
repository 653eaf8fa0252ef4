/// Polygon triangulation for face records
use nalgebra::Point3;

use crate::error::FormatError;

/// One vertex reference of a face, both indices already resolved to 0-based
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Corner {
    pub position: u32,
    pub normal: usize,
}

/// Splits a polygonal face into render triangles.
///
/// Implementations return triples of corner slots (indices into `corners`),
/// each triple in the winding order of the source face. `positions` is the
/// position list as declared so far, for triangulators that need geometry.
pub trait Triangulator {
    fn triangulate(
        &self,
        corners: &[Corner],
        positions: &[Point3<f32>],
    ) -> Result<Vec<[usize; 3]>, FormatError>;
}

/// Fan triangulation anchored at the first corner.
///
/// Exact for convex polygons. Non-convex faces may produce overlapping or
/// inverted triangles; an ear-clipping `Triangulator` fixes that without
/// changing the mesh layout.
#[derive(Debug, Clone, Copy, Default)]
pub struct FanTriangulator;

impl Triangulator for FanTriangulator {
    fn triangulate(
        &self,
        corners: &[Corner],
        _positions: &[Point3<f32>],
    ) -> Result<Vec<[usize; 3]>, FormatError> {
        let n = corners.len();
        if n < 3 {
            return Err(FormatError::TooFewCorners { found: n });
        }
        Ok((1..n - 1).map(|i| [0, i, i + 1]).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corners(n: usize) -> Vec<Corner> {
        (0..n)
            .map(|i| Corner {
                position: i as u32,
                normal: 0,
            })
            .collect()
    }

    #[test]
    fn test_triangle_is_single_fan() {
        let tris = FanTriangulator.triangulate(&corners(3), &[]).unwrap();
        assert_eq!(tris, vec![[0, 1, 2]]);
    }

    #[test]
    fn test_ngon_yields_n_minus_two() {
        for n in 3..10 {
            let tris = FanTriangulator.triangulate(&corners(n), &[]).unwrap();
            assert_eq!(tris.len(), n - 2);
            assert!(tris.iter().all(|t| t[0] == 0));
        }
    }

    #[test]
    fn test_quad_fan_order() {
        let tris = FanTriangulator.triangulate(&corners(4), &[]).unwrap();
        assert_eq!(tris, vec![[0, 1, 2], [0, 2, 3]]);
    }

    #[test]
    fn test_degenerate_face_rejected() {
        assert_eq!(
            FanTriangulator.triangulate(&corners(2), &[]),
            Err(FormatError::TooFewCorners { found: 2 })
        );
        assert!(FanTriangulator.triangulate(&[], &[]).is_err());
    }
}
