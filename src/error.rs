//! Error types for sector map generation

use thiserror::Error;

/// Errors that can occur while generating points, meshes or maps
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MapError {
    /// A point was inserted outside the bounds of a spatial index
    #[error("point ({x}, {y}) lies outside the spatial index bounds")]
    OutOfBounds {
        /// X coordinate of the rejected point
        x: f64,
        /// Y coordinate of the rejected point
        y: f64,
    },

    /// The retry budget ran out while placing a constrained point
    #[error("point slot {slot} stalled after {retries} rejected candidates")]
    GenerationStalled {
        /// Index of the slot that could not be filled
        slot: usize,
        /// Number of candidates drawn before giving up
        retries: usize,
    },

    /// Poisson sampling produced too few points to build a mesh
    #[error("sampling produced {found} points, at least {required} are required")]
    InsufficientSamples {
        /// Points actually produced
        found: usize,
        /// Minimum number of points needed
        required: usize,
    },

    /// The triangulation cannot support a dual mesh
    #[error("degenerate triangulation: {0}")]
    DegenerateTriangulation(String),

    /// The triangle/half-edge arrays are inconsistent
    #[error("malformed triangulation: {0}")]
    MalformedTriangulation(String),

    /// The input polygon is unusable (too few vertices, zero area, self-intersecting)
    #[error("invalid polygon: {0}")]
    InvalidPolygon(String),

    /// Configuration validation failed
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type alias for sector map operations
pub type Result<T> = std::result::Result<T, MapError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = MapError::OutOfBounds { x: 1.5, y: -2.0 };
        assert_eq!(
            err.to_string(),
            "point (1.5, -2) lies outside the spatial index bounds"
        );

        let err = MapError::InsufficientSamples { found: 4, required: 6 };
        assert_eq!(
            err.to_string(),
            "sampling produced 4 points, at least 6 are required"
        );

        let err = MapError::InvalidPolygon("needs 3 vertices".into());
        assert_eq!(err.to_string(), "invalid polygon: needs 3 vertices");
    }
}
