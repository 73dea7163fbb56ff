/// Point-set generators.
///
/// Seven lattice and galaxy primitives, the moving Voronoi field, and a
/// dispatcher that selects among them by configured shape.
pub mod primitives;
pub mod voronoi;
pub mod dispatcher;
