//! Polygon triangulation

/// Fan-triangulate a polygon from its first vertex.
///
/// Yields `(v0, vj, vj+1)` for `j` in `1..n-1`, i.e. `n - 2` triangles for an
/// `n`-gon, and nothing for fewer than three indices. The result is only a
/// correct tessellation for convex polygons; concave faces come out with
/// overlapping or inverted triangles.
pub fn fan_triangulate(indices: &[usize]) -> impl Iterator<Item = [usize; 3]> + '_ {
    let first = indices.first().copied().unwrap_or_default();
    indices
        .get(1..)
        .unwrap_or_default()
        .windows(2)
        .map(move |pair| [first, pair[0], pair[1]])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_triangle_passes_through() {
        let triangles: Vec<_> = fan_triangulate(&[4, 5, 6]).collect();
        assert_eq!(triangles, vec![[4, 5, 6]]);
    }

    #[test]
    fn test_fan_pattern() {
        let polygon = [10, 11, 12, 13, 14, 15];
        let triangles: Vec<_> = fan_triangulate(&polygon).collect();
        assert_eq!(triangles.len(), polygon.len() - 2);
        for (j, triangle) in triangles.iter().enumerate() {
            assert_eq!(*triangle, [10, polygon[j + 1], polygon[j + 2]]);
        }
    }

    #[test]
    fn test_degenerate_input() {
        assert_eq!(fan_triangulate(&[]).count(), 0);
        assert_eq!(fan_triangulate(&[1]).count(), 0);
        assert_eq!(fan_triangulate(&[1, 2]).count(), 0);
    }
}
