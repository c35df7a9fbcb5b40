use crate::error::{AppError, AppResult, ValidationError};
use crate::vitals::{Rating, VitalsSnapshot};

/// Fails when any recorded metric is rated `gate` or worse.
pub(crate) fn check_gate(snapshot: &VitalsSnapshot, gate: Rating) -> AppResult<()> {
    snapshot
        .metrics()
        .find(|record| record.rating >= gate)
        .map_or(Ok(()), |record| {
            Err(AppError::validation(ValidationError::RatingGate {
                kind: record.kind,
                rating: record.rating,
                gate,
            }))
        })
}
