use crate::math::Real;

/// Indicates that a ray query was issued with malformed inputs.
///
/// A query that does not hit anything is *not* an error: it simply returns `None`.
#[derive(thiserror::Error, Copy, Clone, Debug, PartialEq)]
pub enum QueryError {
    /// The maximum distance of a query must be positive (or zero).
    #[error("the maximum query distance must be positive, got {0}.")]
    NegativeMaxDistance(Real),
    /// The ray has a non-finite origin, or a zero-length or non-finite direction.
    #[error("the ray must have a finite origin and a finite, non-zero direction.")]
    InvalidRay,
}

/// Checks that `max_distance` can bound a query.
pub(crate) fn validate_max_distance(max_distance: Real) -> Result<(), QueryError> {
    // NaN fails this comparison too.
    if max_distance >= 0.0 {
        Ok(())
    } else {
        Err(QueryError::NegativeMaxDistance(max_distance))
    }
}
