//! Predicate projection from a timestamp column onto its partition values
//!
//! Inclusive projection never drops a partition that may hold a matching
//! row; strict projection only keeps partitions whose rows all match. Both
//! rely on the transform being non-decreasing in its input. `Ok(None)` means
//! no safe projection exists and the caller must not prune with the
//! predicate.

mod composed;
mod truncate;

pub use composed::SameTransformProjection;

use tracing::trace;

use crate::error::{Result, TransformError};
use crate::expr::{BoundPredicate, PredicateOperator, UnboundPredicate};
use crate::transform::TimestampTransform;
use crate::types::Datum;

/// Projects predicates whose term is itself a transform of the source column
pub trait ComposedProjection {
    fn project(
        &self,
        transform: &TimestampTransform,
        field_name: &str,
        predicate: &BoundPredicate,
    ) -> Result<Option<UnboundPredicate>>;
}

impl<T: ComposedProjection + ?Sized> ComposedProjection for &T {
    fn project(
        &self,
        transform: &TimestampTransform,
        field_name: &str,
        predicate: &BoundPredicate,
    ) -> Result<Option<UnboundPredicate>> {
        (**self).project(transform, field_name, predicate)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Inclusive,
    Strict,
}

/// A transform paired with the strategy used for composed-transform predicates
#[derive(Debug, Clone)]
pub struct Projector<'a, C> {
    transform: &'a TimestampTransform,
    composed: C,
}

impl<'a, C: ComposedProjection> Projector<'a, C> {
    pub fn new(transform: &'a TimestampTransform, composed: C) -> Self {
        Self {
            transform,
            composed,
        }
    }

    pub fn transform(&self) -> &TimestampTransform {
        self.transform
    }

    pub fn project_inclusive(
        &self,
        field_name: &str,
        predicate: &BoundPredicate,
    ) -> Result<Option<UnboundPredicate>> {
        self.project(Mode::Inclusive, field_name, predicate)
    }

    pub fn project_strict(
        &self,
        field_name: &str,
        predicate: &BoundPredicate,
    ) -> Result<Option<UnboundPredicate>> {
        self.project(Mode::Strict, field_name, predicate)
    }

    fn project(
        &self,
        mode: Mode,
        field_name: &str,
        predicate: &BoundPredicate,
    ) -> Result<Option<UnboundPredicate>> {
        if predicate.term().as_transform().is_some() {
            return self.composed.project(self.transform, field_name, predicate);
        }

        let projected = match (mode, predicate) {
            (_, BoundPredicate::Unary { op, .. }) => Some(UnboundPredicate::unary(*op, field_name)),
            (Mode::Inclusive, BoundPredicate::Binary { op, literal, .. }) => {
                truncate::inclusive(self.transform, field_name, *op, literal)?
            }
            (Mode::Strict, BoundPredicate::Binary { op, literal, .. }) => {
                truncate::strict(self.transform, field_name, *op, literal)?
            }
            (Mode::Inclusive, BoundPredicate::Set { op, literals, .. })
                if *op == PredicateOperator::In =>
            {
                transform_set(self.transform, field_name, *op, literals)?
            }
            (Mode::Strict, BoundPredicate::Set { op, literals, .. })
                if *op == PredicateOperator::NotIn =>
            {
                transform_set(self.transform, field_name, *op, literals)?
            }
            (_, BoundPredicate::Set { .. }) => None,
        };

        if projected.is_none() {
            trace!(
                transform = %self.transform,
                mode = ?mode,
                predicate = %predicate,
                "no safe projection for predicate"
            );
        }
        Ok(projected)
    }
}

/// Map every literal through the transform, keeping the operator
fn transform_set<'d>(
    transform: &TimestampTransform,
    field_name: &str,
    op: PredicateOperator,
    literals: impl IntoIterator<Item = &'d Datum>,
) -> Result<Option<UnboundPredicate>> {
    let mut values = Vec::new();
    for literal in literals {
        let micros = timestamp_literal(literal)?;
        match transform.apply_value(micros) {
            Ok(value) => values.push(transform.to_datum(value)),
            Err(TransformError::OutOfRange { .. }) => return Ok(None),
            Err(e) => return Err(e),
        }
    }
    Ok(Some(UnboundPredicate::set(op, field_name, values)))
}

fn timestamp_literal(literal: &Datum) -> Result<i64> {
    literal.as_timestamp_micros().ok_or_else(|| {
        TransformError::invalid_predicate(format!(
            "expected a timestamp literal, got {} ({})",
            literal,
            literal.data_type()
        ))
    })
}
