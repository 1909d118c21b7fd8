//! OFF format support
//!
//! Reads the Object File Format polyhedra that OpenSCAD exports with
//! `--export-format=off`:
//!
//! ```text
//! OFF
//! 4 1 0
//! 0 0 0
//! 1 0 0
//! 1 1 0
//! 0 1 0
//! 4 0 1 2 3 255 0 0 255
//! ```
//!
//! The counts may also sit on the header line (`OFF 4 1 0`). Face lines list
//! the vertex count, the vertex indices and optionally an RGBA color with 0-255
//! channels. Lines starting with `#` are comments. Faces with more than three
//! vertices are fan-triangulated while parsing.

use crate::error::OffError;
use crate::PolyhedronReader;
use scadview_core::{
    fan_triangulate, Color, Face, IndexedPolyhedron, Interner, Result, Vertex, DEFAULT_FACE_COLOR,
};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Options for OFF parsing
#[derive(Debug, Clone)]
pub struct OffParseOptions {
    /// Color assigned to faces that carry no color of their own
    pub default_color: Color,
}

impl Default for OffParseOptions {
    fn default() -> Self {
        Self {
            default_color: DEFAULT_FACE_COLOR,
        }
    }
}

impl OffParseOptions {
    /// Set the color used for uncolored faces
    pub fn with_default_color(mut self, color: Color) -> Self {
        self.default_color = color;
        self
    }
}

pub struct OffReader;

impl PolyhedronReader for OffReader {
    fn read_polyhedron<P: AsRef<Path>>(path: P) -> Result<IndexedPolyhedron> {
        let content = fs::read_to_string(path)?;
        Ok(parse_off(&content)?)
    }
}

/// Parse OFF text with the default options
pub fn parse_off(text: &str) -> std::result::Result<IndexedPolyhedron, OffError> {
    parse_off_with(text, &OffParseOptions::default())
}

/// Parse OFF text into an [`IndexedPolyhedron`]
pub fn parse_off_with(
    text: &str,
    options: &OffParseOptions,
) -> std::result::Result<IndexedPolyhedron, OffError> {
    let lines: Vec<(usize, &str)> = text
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
        .collect();

    let (&(header_line, header), rest) = lines.split_first().ok_or(OffError::Empty)?;
    let mut header_tokens = header.split_whitespace();
    if header_tokens.next() != Some("OFF") {
        return Err(OffError::MissingHeader);
    }

    let inline_counts: Vec<&str> = header_tokens.collect();
    let (counts, body) = if inline_counts.is_empty() {
        let (&(line, counts), body) = rest.split_first().ok_or(OffError::MissingHeader)?;
        (parse_counts(line, counts.split_whitespace().collect())?, body)
    } else {
        (parse_counts(header_line, inline_counts)?, rest)
    };
    let (vertex_count, face_count) = counts;

    let expected = vertex_count
        .checked_add(face_count)
        .ok_or(OffError::InvalidCounts { line: header_line })?;
    if body.len() < expected {
        return Err(OffError::NotEnoughLines {
            expected,
            found: body.len(),
        });
    }

    let (vertex_lines, face_lines) = body[..expected].split_at(vertex_count);

    let vertices = vertex_lines
        .iter()
        .map(|&(line, text)| parse_vertex(line, text))
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let mut palette = Interner::new();
    let mut faces = Vec::with_capacity(face_count);
    for &(line, text) in face_lines {
        let (indices, color) = parse_face(line, text, vertex_count)?;
        let color_index = palette.intern(color.unwrap_or(options.default_color));
        faces.extend(
            fan_triangulate(&indices).map(|triangle| Face::triangle(triangle, color_index)),
        );
    }

    let colors = palette.into_vec();
    debug!(
        vertices = vertices.len(),
        source_faces = face_count,
        triangles = faces.len(),
        colors = colors.len(),
        "parsed OFF polyhedron"
    );

    Ok(IndexedPolyhedron::new(vertices, faces, colors))
}

/// Vertex and face counts; a trailing edge count must be numeric but is unused
fn parse_counts(line: usize, tokens: Vec<&str>) -> std::result::Result<(usize, usize), OffError> {
    let invalid = || OffError::InvalidCounts { line };
    let numbers = tokens
        .iter()
        .take(3)
        .map(|token| token.parse::<usize>())
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|_| invalid())?;

    match numbers[..] {
        [vertices, faces, ..] => Ok((vertices, faces)),
        _ => Err(invalid()),
    }
}

fn parse_vertex(line: usize, text: &str) -> std::result::Result<Vertex, OffError> {
    let numbers = text
        .split_whitespace()
        .map(|token| {
            token
                .parse::<f64>()
                .ok()
                .filter(|value| value.abs() <= f32::MAX as f64)
        })
        .collect::<Option<Vec<_>>>()
        .ok_or(OffError::InvalidVertex { line })?;

    match numbers[..] {
        [x, y, z, ..] => Ok(Vertex::new(x, y, z)),
        _ => Err(OffError::InvalidVertex { line }),
    }
}

fn parse_face(
    line: usize,
    text: &str,
    vertex_count: usize,
) -> std::result::Result<(Vec<usize>, Option<Color>), OffError> {
    let invalid = |reason: String| OffError::InvalidFace { line, reason };
    let tokens: Vec<&str> = text.split_whitespace().collect();

    let count = tokens
        .first()
        .and_then(|token| token.parse::<usize>().ok())
        .ok_or_else(|| invalid("vertex count is not a non-negative integer".to_string()))?;
    if count < 3 {
        return Err(OffError::DegenerateFace { line, count });
    }

    let index_tokens = tokens
        .get(1..=count)
        .ok_or_else(|| invalid(format!("expected {} vertex indices", count)))?;
    let indices = index_tokens
        .iter()
        .map(|token| {
            let index = token
                .parse::<usize>()
                .map_err(|_| invalid(format!("vertex index '{}' is not a non-negative integer", token)))?;
            if index >= vertex_count {
                return Err(invalid(format!(
                    "vertex index {} out of range for {} vertices",
                    index, vertex_count
                )));
            }
            Ok(index)
        })
        .collect::<std::result::Result<Vec<_>, _>>()?;

    // A color is present once the line carries at least count + 4 tokens.
    let color = if tokens.len() >= count + 4 {
        let end = tokens.len().min(count + 5);
        let channels = tokens[count + 1..end]
            .iter()
            .map(|token| {
                token
                    .parse::<f32>()
                    .ok()
                    .filter(|value| (0.0..=255.0).contains(value))
                    .ok_or_else(|| invalid(format!("color channel '{}' is not in 0-255", token)))
            })
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Color::from_channels(&channels)
    } else {
        None
    };

    Ok((indices, color))
}
