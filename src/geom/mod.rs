mod core;
mod frame;
mod intersect;
mod mesh;
mod polygon;
mod polyline;
mod triangulation;

pub use core::{BBox, Point2, Point3, Tolerance, Transform, Vec3};
pub use frame::{Frame, rotate_vector};
pub use intersect::{Triangle3, segment_hits_triangle, triangles_intersect};
pub use mesh::GeomMesh;
pub use polygon::{
    centroid as polygon_centroid, has_local_self_intersection, is_simple_polygon, orient2d,
    segments_intersect, signed_area,
};
pub use polyline::{
    SmoothPolylineDiagnostics, SmoothPolylineOptions, length_between, point_at_index,
    polyline_tangents, samples_between, smooth_polyline, tangent_at_index,
};
pub use triangulation::{TriangulationError, triangulate_polygon};

#[cfg(test)]
mod tests;
