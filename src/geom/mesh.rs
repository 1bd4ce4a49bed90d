use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct GeomMesh {
    pub positions: Vec<[f64; 3]>,
    pub indices: Vec<u32>,
}

impl GeomMesh {
    #[must_use]
    pub fn new(positions: Vec<[f64; 3]>, indices: Vec<u32>) -> Self {
        Self { positions, indices }
    }

    /// Build a mesh from indexed triangle rows.
    #[must_use]
    pub fn from_triangles(positions: Vec<[f64; 3]>, faces: &[[u32; 3]]) -> Self {
        Self {
            positions,
            indices: faces.as_flattened().to_vec(),
        }
    }

    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.indices.chunks_exact(3).map(|t| [t[0], t[1], t[2]])
    }

    /// Returns true if any vertex position contains NaN or Inf values.
    #[must_use]
    pub fn has_invalid_vertices(&self) -> bool {
        self.positions
            .iter()
            .any(|p| !p[0].is_finite() || !p[1].is_finite() || !p[2].is_finite())
    }

    /// Returns true if all vertex indices are within bounds.
    #[must_use]
    pub fn has_valid_indices(&self) -> bool {
        let n = self.positions.len() as u32;
        self.indices.iter().all(|&i| i < n)
    }

    #[must_use]
    pub fn has_triangle_indices(&self) -> bool {
        self.indices.len() % 3 == 0
    }

    pub fn validate(&self) -> Result<(), String> {
        if !self.has_triangle_indices() {
            return Err("mesh indices are not a triangle list (len % 3 != 0)".to_string());
        }
        if self.has_invalid_vertices() {
            return Err("mesh has invalid vertex coordinates (NaN/Inf)".to_string());
        }
        if !self.has_valid_indices() {
            return Err("mesh has out-of-bounds vertex indices".to_string());
        }
        Ok(())
    }

    /// Positions as `[x0, y0, z0, x1, ...]`, for wasm/JS adapters.
    #[must_use]
    pub fn positions_flat(&self) -> &[f64] {
        self.positions.as_flattened()
    }

    /// Number of undirected edges not shared by exactly two triangles.
    #[must_use]
    pub fn open_edge_count(&self) -> usize {
        edge_use_counts(self.triangles())
            .values()
            .filter(|&&count| count != 2)
            .count()
    }

    /// True when every edge is used by exactly two triangles with opposite
    /// directions.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        if self.is_empty() {
            return false;
        }
        let mut directed: HashMap<(u32, u32), usize> = HashMap::new();
        for [a, b, c] in self.triangles() {
            for edge in [(a, b), (b, c), (c, a)] {
                *directed.entry(edge).or_insert(0) += 1;
            }
        }
        directed
            .iter()
            .all(|(&(a, b), &count)| count == 1 && directed.get(&(b, a)) == Some(&1))
    }

    /// Signed volume enclosed by the triangles (positive for outward winding).
    #[must_use]
    pub fn signed_volume(&self) -> f64 {
        self.triangles()
            .map(|[a, b, c]| {
                let (Some(p), Some(q), Some(r)) = (
                    self.positions.get(a as usize),
                    self.positions.get(b as usize),
                    self.positions.get(c as usize),
                ) else {
                    return 0.0;
                };
                let cross = [
                    q[1] * r[2] - q[2] * r[1],
                    q[2] * r[0] - q[0] * r[2],
                    q[0] * r[1] - q[1] * r[0],
                ];
                (p[0] * cross[0] + p[1] * cross[1] + p[2] * cross[2]) / 6.0
            })
            .sum()
    }
}

pub(crate) fn edge_use_counts(
    triangles: impl Iterator<Item = [u32; 3]>,
) -> HashMap<(u32, u32), usize> {
    let mut counts = HashMap::new();
    for [a, b, c] in triangles {
        for (u, v) in [(a, b), (b, c), (c, a)] {
            let key = if u < v { (u, v) } else { (v, u) };
            *counts.entry(key).or_insert(0) += 1;
        }
    }
    counts
}
