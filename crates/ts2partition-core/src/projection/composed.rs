use super::ComposedProjection;
use crate::error::Result;
use crate::expr::{BoundPredicate, UnboundPredicate};
use crate::transform::TimestampTransform;

/// Default strategy for predicates written against a transform of the source
///
/// A predicate over the same transform only needs its field renamed; null
/// checks hold through any transform. The result is valid for inclusive and
/// strict projection alike, so both entry points share it. Predicates over a
/// different granularity or offset are declined; plug in another
/// `ComposedProjection` to rewrite across granularities.
#[derive(Debug, Clone, Copy, Default)]
pub struct SameTransformProjection;

impl ComposedProjection for SameTransformProjection {
    fn project(
        &self,
        transform: &TimestampTransform,
        field_name: &str,
        predicate: &BoundPredicate,
    ) -> Result<Option<UnboundPredicate>> {
        let Some(applied) = predicate.term().as_transform() else {
            return Ok(None);
        };
        let same_buckets = applied.granularity() == transform.granularity()
            && applied.offset() == transform.offset();

        let projected = match predicate {
            BoundPredicate::Unary { op, .. } => Some(UnboundPredicate::unary(*op, field_name)),
            _ if !same_buckets => None,
            BoundPredicate::Binary { op, literal, .. } => {
                Some(UnboundPredicate::binary(*op, field_name, *literal))
            }
            BoundPredicate::Set { op, literals, .. } => Some(UnboundPredicate::set(
                *op,
                field_name,
                literals.iter().copied(),
            )),
        };
        Ok(projected)
    }
}
