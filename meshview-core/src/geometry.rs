/// Mesh data model shared by the parser and the render stage
use nalgebra::{Point3, Vector3};

use crate::error::FormatError;

/// A triangulated surface ready for upload.
///
/// `normals` holds one entry per emitted triangle corner, not per unique
/// position: normal `k` belongs to draw slot `k`, the same slot `indices[k]`
/// occupies. Positions stay shared through the index list.
///
/// A `Mesh` is only produced through [`MeshBuilder`] and cannot be modified
/// afterwards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    positions: Vec<Point3<f32>>,
    normals: Vec<Vector3<f32>>,
    indices: Vec<u32>,
    edge_indices: Vec<u32>,
}

impl Mesh {
    pub fn positions(&self) -> &[Point3<f32>] {
        &self.positions
    }

    pub fn normals(&self) -> &[Vector3<f32>] {
        &self.normals
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Pairs of position indices for outline rendering; empty unless requested at load.
    pub fn edge_indices(&self) -> &[u32] {
        &self.edge_indices
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Iterate triangles as `(position indices, draw-normals)` in draw order
    pub fn triangles(&self) -> impl Iterator<Item = ([u32; 3], [Vector3<f32>; 3])> + '_ {
        self.indices
            .chunks_exact(3)
            .zip(self.normals.chunks_exact(3))
            .map(|(i, n)| ([i[0], i[1], i[2]], [n[0], n[1], n[2]]))
    }

    /// Positions flattened to `x, y, z` scalars in file order
    pub fn position_buffer(&self) -> Vec<f32> {
        self.positions
            .iter()
            .flat_map(|p| [p.x, p.y, p.z])
            .collect()
    }

    /// Draw-normals flattened to `x, y, z` scalars in draw order
    pub fn normal_buffer(&self) -> Vec<f32> {
        self.normals
            .iter()
            .flat_map(|n| [n.x, n.y, n.z])
            .collect()
    }

    /// Axis-aligned bounds of all positions, `None` for a mesh without positions
    pub fn bounds(&self) -> Option<(Point3<f32>, Point3<f32>)> {
        let first = self.positions.first()?;
        let (min, max) = self.positions.iter().fold((*first, *first), |(min, max), p| {
            (min.inf(p), max.sup(p))
        });
        Some((min, max))
    }
}

/// Accumulates mesh data in draw order and seals it into a [`Mesh`]
#[derive(Debug, Default)]
pub struct MeshBuilder {
    mesh: Mesh,
}

impl MeshBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn position_count(&self) -> usize {
        self.mesh.positions.len()
    }

    pub fn positions(&self) -> &[Point3<f32>] {
        &self.mesh.positions
    }

    pub fn push_position(&mut self, position: Point3<f32>) {
        self.mesh.positions.push(position);
    }

    /// Append one render triangle with its three draw-normals, corner for corner
    pub fn push_triangle(
        &mut self,
        indices: [u32; 3],
        normals: [Vector3<f32>; 3],
    ) -> Result<(), FormatError> {
        for index in indices {
            self.check_position(index)?;
        }
        self.mesh.indices.extend_from_slice(&indices);
        self.mesh.normals.extend_from_slice(&normals);
        Ok(())
    }

    pub fn push_edge(&mut self, a: u32, b: u32) -> Result<(), FormatError> {
        self.check_position(a)?;
        self.check_position(b)?;
        self.mesh.edge_indices.push(a);
        self.mesh.edge_indices.push(b);
        Ok(())
    }

    fn check_position(&self, index: u32) -> Result<(), FormatError> {
        let count = self.mesh.positions.len();
        if (index as usize) < count {
            Ok(())
        } else {
            Err(FormatError::PositionOutOfRange {
                index: i64::from(index) + 1,
                count,
            })
        }
    }

    pub fn build(self) -> Mesh {
        self.mesh
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single_triangle() -> Mesh {
        let mut builder = MeshBuilder::new();
        builder.push_position(Point3::new(0.0, 0.0, 0.0));
        builder.push_position(Point3::new(1.0, 0.0, 0.0));
        builder.push_position(Point3::new(0.0, 1.0, 0.0));
        let up = Vector3::new(0.0, 0.0, 1.0);
        builder.push_triangle([0, 1, 2], [up, up, up]).unwrap();
        builder.build()
    }

    #[test]
    fn test_builder_rejects_unknown_positions() {
        let mut builder = MeshBuilder::new();
        builder.push_position(Point3::origin());
        let up = Vector3::z();

        assert_eq!(
            builder.push_edge(0, 7),
            Err(FormatError::PositionOutOfRange { index: 8, count: 1 })
        );
        assert!(builder.push_triangle([0, 0, 1], [up, up, up]).is_err());
        assert!(builder.push_triangle([0, 0, 0], [up, up, up]).is_ok());

        let mesh = builder.build();
        assert!(mesh.edge_indices().is_empty());
        assert_eq!(mesh.indices(), &[0, 0, 0]);
        assert_eq!(mesh.normals().len(), 3);
    }

    #[test]
    fn test_builder_keeps_normals_per_corner() {
        let mesh = single_triangle();
        assert_eq!(mesh.triangle_count(), 1);
        assert_eq!(mesh.normals().len(), mesh.indices().len());
        assert!(mesh.edge_indices().is_empty());
    }

    #[test]
    fn test_flattened_buffers() {
        let mesh = single_triangle();
        assert_eq!(
            mesh.position_buffer(),
            vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0]
        );
        assert_eq!(mesh.normal_buffer().len(), 9);
        assert_eq!(&mesh.normal_buffer()[..3], &[0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_bounds() {
        let mesh = single_triangle();
        let (min, max) = mesh.bounds().unwrap();
        assert_eq!(min, Point3::new(0.0, 0.0, 0.0));
        assert_eq!(max, Point3::new(1.0, 1.0, 0.0));
        assert!(Mesh::default().bounds().is_none());
    }

    #[test]
    fn test_triangles_iterator() {
        let mesh = single_triangle();
        let triangles: Vec<_> = mesh.triangles().collect();
        assert_eq!(triangles.len(), 1);
        assert_eq!(triangles[0].0, [0, 1, 2]);
    }
}
