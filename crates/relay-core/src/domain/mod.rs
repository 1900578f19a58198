//! Domain module containing pure coordinate math.

pub mod geometry;

pub use geometry::ScreenGeometry;
