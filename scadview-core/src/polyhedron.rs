//! Indexed polyhedron data structures

use crate::color::Color;
use crate::error::{Error, Result};
use crate::triangulate::fan_triangulate;
use nalgebra::Point3;
use serde::{Deserialize, Serialize};

/// A polyhedron vertex with double precision coordinates
pub type Vertex = Point3<f64>;

/// A flat-shaded face: vertex indices plus an index into the palette
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Face {
    pub vertices: Vec<usize>,
    pub color_index: usize,
}

impl Face {
    /// Create a face from vertex indices and a palette index
    pub fn new(vertices: Vec<usize>, color_index: usize) -> Self {
        Self { vertices, color_index }
    }

    /// Create a triangular face
    pub fn triangle(indices: [usize; 3], color_index: usize) -> Self {
        Self::new(indices.to_vec(), color_index)
    }

    /// Check if the face has exactly three vertices
    pub fn is_triangle(&self) -> bool {
        self.vertices.len() == 3
    }

    /// Fan triangulation of the face, see [`fan_triangulate`]
    pub fn triangles(&self) -> impl Iterator<Item = [usize; 3]> + '_ {
        fan_triangulate(&self.vertices)
    }
}

/// A polyhedron with shared vertices, colored faces and a deduplicated palette
///
/// Built in one go by the OFF parser, after which every face index and every
/// palette index is in range. Hand-built values can be checked with
/// [`IndexedPolyhedron::validate`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndexedPolyhedron {
    pub vertices: Vec<Vertex>,
    pub faces: Vec<Face>,
    pub colors: Vec<Color>,
}

impl IndexedPolyhedron {
    /// Create a polyhedron from its parts
    pub fn new(vertices: Vec<Vertex>, faces: Vec<Face>, colors: Vec<Color>) -> Self {
        Self { vertices, faces, colors }
    }

    /// Get the number of vertices
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of faces
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Get the number of distinct colors
    pub fn color_count(&self) -> usize {
        self.colors.len()
    }

    /// Check if the polyhedron has no geometry
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() || self.faces.is_empty()
    }

    /// Check that the polyhedron can be exported.
    ///
    /// Requires at least one vertex and one face, at least three indices per
    /// face, and every vertex and palette index in range.
    pub fn validate(&self) -> Result<()> {
        if self.vertices.is_empty() {
            return Err(Error::invariant("polyhedron has no vertices"));
        }
        if self.faces.is_empty() {
            return Err(Error::invariant("polyhedron has no faces"));
        }

        // Positions are exported as f32
        if let Some(i) = self
            .vertices
            .iter()
            .position(|v| [v.x, v.y, v.z].iter().any(|c| !(c.abs() <= f32::MAX as f64)))
        {
            return Err(Error::invariant(format!(
                "vertex {} is outside the single precision range",
                i
            )));
        }

        for (i, face) in self.faces.iter().enumerate() {
            if face.vertices.len() < 3 {
                return Err(Error::invariant(format!(
                    "face {} has {} vertices, at least 3 required",
                    i,
                    face.vertices.len()
                )));
            }
            if face.color_index >= self.colors.len() {
                return Err(Error::invariant(format!(
                    "face {} references color {} but the palette has {} entries",
                    i,
                    face.color_index,
                    self.colors.len()
                )));
            }
            if let Some(&index) = face.vertices.iter().find(|&&v| v >= self.vertices.len()) {
                return Err(Error::invariant(format!(
                    "face {} references vertex {} but there are {} vertices",
                    i,
                    index,
                    self.vertices.len()
                )));
            }
        }

        Ok(())
    }

    /// Axis-aligned bounds of the vertices, `None` when there are none
    pub fn bounding_box(&self) -> Option<(Vertex, Vertex)> {
        let first = *self.vertices.first()?;
        let mut min = first;
        let mut max = first;

        for vertex in &self.vertices[1..] {
            min.x = min.x.min(vertex.x);
            min.y = min.y.min(vertex.y);
            min.z = min.z.min(vertex.z);

            max.x = max.x.max(vertex.x);
            max.y = max.y.max(vertex.y);
            max.z = max.z.max(vertex.z);
        }

        Some((min, max))
    }
}
