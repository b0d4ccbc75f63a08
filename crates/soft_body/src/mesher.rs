use std::f32::consts::{PI, TAU};

use glam::Vec2;

use crate::error::SoftBodyError;

/// Floats per vertex: position x, y, z and texture u, v.
pub const COMPONENT_COUNT: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveTopology {
    TriangleList,
    TriangleStrip,
    TriangleFan,
}

#[inline]
fn push_vertex(out: &mut Vec<f32>, position: Vec2, uv: Vec2) {
    out.extend_from_slice(&[position.x, position.y, 0., uv.x, uv.y]);
}

/// Meshes a grid lattice as one triangle strip, rows joined by degenerate
/// triangles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridMesher {
    width: usize,
    height: usize,
}

impl GridMesher {
    pub fn new(width: usize, height: usize) -> Result<Self, SoftBodyError> {
        if width < 2 || height < 2 {
            return Err(SoftBodyError::InvalidMeshSize { width, height });
        }
        Ok(GridMesher { width, height })
    }

    pub fn vertex_count(&self) -> usize {
        self.width * self.height
    }

    /// Strip length, two stitch indices per row transition.
    pub fn index_count(&self) -> usize {
        2 * self.width * (self.height - 1) + 2 * (self.height - 2)
    }

    /// `positions` is in lattice storage order, column by column. Vertices
    /// come out row by row, so vertex `j * width + i` is grid point `(i, j)`.
    pub fn recompute_vertices(&self, positions: &[Vec2], out: &mut Vec<f32>) {
        out.clear();
        for j in 0..self.height {
            for i in 0..self.width {
                let u = i as f32 / (self.width - 1) as f32;
                // Texture v runs top down, the world's y runs bottom up
                let v = 1. - j as f32 / (self.height - 1) as f32;
                push_vertex(out, positions[i * self.height + j], Vec2::new(u, v));
            }
        }
    }

    pub fn build_indices(&self) -> Vec<u32> {
        let width = self.width as u32;
        let mut indices = Vec::with_capacity(self.index_count());
        for y in 0..self.height as u32 - 1 {
            if y > 0 {
                indices.push(y * width);
            }
            for x in 0..width {
                indices.push(y * width + x);
                indices.push((y + 1) * width + x);
            }
            if y + 2 < self.height as u32 {
                indices.push((y + 1) * width + width - 1);
            }
        }
        indices
    }

    /// Two triangles per cell with the same winding as the strip.
    pub fn list_indices(&self) -> Vec<u32> {
        let width = self.width as u32;
        let mut indices = Vec::with_capacity(6 * (self.width - 1) * (self.height - 1));
        for y in 0..self.height as u32 - 1 {
            for x in 0..width - 1 {
                let bottom_left = y * width + x;
                let top_left = bottom_left + width;
                indices.extend_from_slice(&[
                    bottom_left,
                    top_left,
                    bottom_left + 1,
                    bottom_left + 1,
                    top_left,
                    top_left + 1,
                ]);
            }
        }
        indices
    }
}

/// Meshes a ring lattice as a fan around its hub.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FanMesher {
    segments: usize,
    point_radius: f32,
}

impl FanMesher {
    pub fn new(segments: usize, point_radius: f32) -> Result<Self, SoftBodyError> {
        if segments < 3 {
            return Err(SoftBodyError::TooFewSegments(segments));
        }
        Ok(FanMesher {
            segments,
            point_radius,
        })
    }

    /// Hub, every ring point, and the closing copy of the first ring vertex.
    pub fn vertex_count(&self) -> usize {
        self.segments + 2
    }

    /// `positions` holds the ring points followed by the hub.
    pub fn recompute_vertices(&self, positions: &[Vec2], out: &mut Vec<f32>) {
        out.clear();
        let hub = positions[self.segments];
        push_vertex(out, hub, Vec2::splat(0.5));

        for k in (0..self.segments).rev() {
            let position = positions[k];
            // Push the edge out by one point radius so the mesh covers the point circles
            let position = position + (position - hub).normalize_or_zero() * self.point_radius;
            let angle = PI + k as f32 * TAU / self.segments as f32;
            // u is negated, otherwise the texture shows mirrored
            let uv = Vec2::new(0.5 + angle.cos() * 0.5 * -1., 0.5 + angle.sin() * 0.5);
            push_vertex(out, position, uv);
        }

        out.extend_from_within(COMPONENT_COUNT..2 * COMPONENT_COUNT);
    }

    /// The fan expanded to a triangle list, for backends without fans.
    pub fn list_indices(&self) -> Vec<u32> {
        fan_to_list(self.vertex_count())
    }
}

/// Triangle list equivalent of drawing `vertex_count` vertices as a fan
/// pivoting on vertex 0.
pub fn fan_to_list(vertex_count: usize) -> Vec<u32> {
    (1..vertex_count.saturating_sub(1) as u32)
        .flat_map(|k| [0, k, k + 1])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Column major positions of a regular grid.
    fn grid_positions(width: usize, height: usize, spacing: f32) -> Vec<Vec2> {
        (0..width)
            .flat_map(|i| (0..height).map(move |j| Vec2::new(i as f32, j as f32) * spacing))
            .collect()
    }

    fn ring_positions(center: Vec2, radius: f32, segments: usize) -> Vec<Vec2> {
        (0..segments)
            .map(|k| center + Vec2::from_angle(k as f32 * TAU / segments as f32) * radius)
            .chain(std::iter::once(center))
            .collect()
    }

    fn vertex(buffer: &[f32], index: usize) -> &[f32] {
        &buffer[index * COMPONENT_COUNT..(index + 1) * COMPONENT_COUNT]
    }

    fn vertex_position(buffer: &[f32], index: u32) -> Vec2 {
        let vertex = vertex(buffer, index as usize);
        Vec2::new(vertex[0], vertex[1])
    }

    fn signed_area(a: Vec2, b: Vec2, c: Vec2) -> f32 {
        (b - a).perp_dot(c - a) / 2.
    }

    #[test]
    fn grid_rejects_sides_without_uv_span() {
        assert_eq!(
            GridMesher::new(1, 4),
            Err(SoftBodyError::InvalidMeshSize { width: 1, height: 4 })
        );
        assert!(GridMesher::new(4, 1).is_err());
        assert!(GridMesher::new(2, 2).is_ok());
    }

    #[test]
    fn grid_index_count_and_range() {
        for (width, height) in [(2, 2), (4, 3), (3, 7), (8, 8)] {
            let mesher = GridMesher::new(width, height).unwrap();
            let indices = mesher.build_indices();
            assert_eq!(indices.len(), 2 * width * (height - 1) + 2 * (height - 2));
            assert_eq!(indices.len(), mesher.index_count());
            assert!(indices.iter().all(|index| (*index as usize) < width * height));
        }
    }

    #[test]
    fn grid_strip_for_four_by_three() {
        let indices = GridMesher::new(4, 3).unwrap().build_indices();
        assert_eq!(
            indices,
            vec![0, 4, 1, 5, 2, 6, 3, 7, 7, 4, 4, 8, 5, 9, 6, 10, 7, 11]
        );
    }

    #[test]
    fn grid_uvs_span_texture_with_flipped_v() {
        let (width, height) = (4, 3);
        let mesher = GridMesher::new(width, height).unwrap();
        let mut vertices = Vec::new();
        mesher.recompute_vertices(&grid_positions(width, height, 0.5), &mut vertices);
        assert_eq!(vertices.len(), width * height * COMPONENT_COUNT);

        assert_eq!(vertex(&vertices, 0), &[0., 0., 0., 0., 1.]);
        assert_eq!(vertex(&vertices, 11), &[1.5, 1., 0., 1., 0.]);
        let us: Vec<f32> = (0..width).map(|i| vertex(&vertices, i)[3]).collect();
        assert_eq!(us, vec![0., 1. / 3., 2. / 3., 1.]);
        let vs: Vec<f32> = (0..height).map(|j| vertex(&vertices, j * width)[4]).collect();
        assert_eq!(vs, vec![1., 0.5, 0.]);
    }

    #[test]
    fn grid_vertices_are_row_major() {
        let mesher = GridMesher::new(3, 2).unwrap();
        let mut vertices = Vec::new();
        mesher.recompute_vertices(&grid_positions(3, 2, 1.), &mut vertices);
        // vertex j * width + i is grid point (i, j)
        assert_eq!(vertex_position(&vertices, 4), Vec2::new(1., 1.));
        assert_eq!(vertex_position(&vertices, 2), Vec2::new(2., 0.));
    }

    #[test]
    fn recompute_is_idempotent() {
        let positions = grid_positions(5, 4, 0.3);
        let mesher = GridMesher::new(5, 4).unwrap();
        let mut first = Vec::new();
        let mut second = vec![42.; 3];
        mesher.recompute_vertices(&positions, &mut first);
        mesher.recompute_vertices(&positions, &mut second);
        assert_eq!(first, second);

        let ring = ring_positions(Vec2::ZERO, 1., 9);
        let fan = FanMesher::new(9, 0.15).unwrap();
        fan.recompute_vertices(&ring, &mut first);
        fan.recompute_vertices(&ring, &mut second);
        assert_eq!(first, second);
    }

    #[test]
    fn strip_keeps_one_winding_through_stitches() {
        let (width, height) = (5, 4);
        let mesher = GridMesher::new(width, height).unwrap();
        let mut vertices = Vec::new();
        mesher.recompute_vertices(&grid_positions(width, height, 1.), &mut vertices);
        let indices = mesher.build_indices();

        let mut visible = 0;
        for (k, window) in indices.windows(3).enumerate() {
            let (a, b, c) = if k % 2 == 0 {
                (window[0], window[1], window[2])
            } else {
                (window[1], window[0], window[2])
            };
            let area = signed_area(
                vertex_position(&vertices, a),
                vertex_position(&vertices, b),
                vertex_position(&vertices, c),
            );
            if window[0] == window[1] || window[1] == window[2] || window[0] == window[2] {
                assert_eq!(area, 0.);
            } else {
                assert!(area < 0., "triangle {k} flips winding");
                visible += 1;
            }
        }
        assert_eq!(visible, 2 * (width - 1) * (height - 1));
    }

    #[test]
    fn list_indices_match_strip_winding() {
        let mesher = GridMesher::new(3, 3).unwrap();
        let mut vertices = Vec::new();
        mesher.recompute_vertices(&grid_positions(3, 3, 1.), &mut vertices);
        let indices = mesher.list_indices();
        assert_eq!(indices.len(), 24);
        for triangle in indices.chunks(3) {
            let area = signed_area(
                vertex_position(&vertices, triangle[0]),
                vertex_position(&vertices, triangle[1]),
                vertex_position(&vertices, triangle[2]),
            );
            assert!((area + 0.5).abs() < 1e-6);
        }
    }

    #[test]
    fn fan_layout() {
        let segments = 12;
        let mesher = FanMesher::new(segments, 0.15).unwrap();
        let mut vertices = Vec::new();
        mesher.recompute_vertices(&ring_positions(Vec2::new(5., 5.), 1., segments), &mut vertices);

        assert_eq!(mesher.vertex_count(), segments + 2);
        assert_eq!(vertices.len(), (segments + 2) * COMPONENT_COUNT);
        assert_eq!(vertex(&vertices, 0), &[5., 5., 0., 0.5, 0.5]);
        assert_eq!(vertex(&vertices, 1), vertex(&vertices, segments + 1));

        // Ring point 0 sits last in the ring, pushed out by one point radius
        let first = vertex(&vertices, segments);
        assert!((first[0] - 6.15).abs() < 1e-5);
        assert!((first[1] - 5.).abs() < 1e-5);
        assert!((first[3] - 1.).abs() < 1e-6);
        assert!((first[4] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn fan_uvs_stay_on_unit_circle() {
        let mesher = FanMesher::new(7, 0.1).unwrap();
        let mut vertices = Vec::new();
        mesher.recompute_vertices(&ring_positions(Vec2::ZERO, 2., 7), &mut vertices);
        for index in 1..=7 {
            let uv = Vec2::new(vertex(&vertices, index)[3], vertex(&vertices, index)[4]);
            assert!((uv.distance(Vec2::splat(0.5)) - 0.5).abs() < 1e-5);
        }
    }

    #[test]
    fn fan_to_list_needs_three_vertices() {
        assert!(fan_to_list(2).is_empty());
        assert_eq!(fan_to_list(3), vec![0, 1, 2]);
    }

    #[test]
    fn fan_rejects_fewer_than_three_segments() {
        assert_eq!(FanMesher::new(2, 0.1), Err(SoftBodyError::TooFewSegments(2)));
    }

    #[test]
    fn fan_list_shares_strip_winding() {
        let segments = 6;
        let mesher = FanMesher::new(segments, 0.1).unwrap();
        let mut vertices = Vec::new();
        mesher.recompute_vertices(&ring_positions(Vec2::ZERO, 1., segments), &mut vertices);
        let indices = mesher.list_indices();
        assert_eq!(indices.len(), 3 * segments);
        assert_eq!(&indices[..6], &[0, 1, 2, 0, 2, 3]);
        for triangle in indices.chunks(3) {
            let area = signed_area(
                vertex_position(&vertices, triangle[0]),
                vertex_position(&vertices, triangle[1]),
                vertex_position(&vertices, triangle[2]),
            );
            assert!(area < 0.);
        }
    }
}
