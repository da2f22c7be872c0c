//! Literal comparison rules
//!
//! With `f` non-decreasing, `v < L` implies `f(v) <= f(L - 1)`, which gives the
//! widest inclusive bound; the strict rules use the contrapositive,
//! `f(v) < f(L)` implies `v < L`.

use super::timestamp_literal;
use crate::error::{Result, TransformError};
use crate::expr::{PredicateOperator, UnboundPredicate};
use crate::transform::TimestampTransform;
use crate::types::Datum;

pub(super) fn inclusive(
    transform: &TimestampTransform,
    field_name: &str,
    op: PredicateOperator,
    literal: &Datum,
) -> Result<Option<UnboundPredicate>> {
    let boundary = timestamp_literal(literal)?;
    let rewritten = match op {
        PredicateOperator::LessThan => boundary
            .checked_sub(1)
            .map(|b| (PredicateOperator::LessThanOrEq, b)),
        PredicateOperator::LessThanOrEq => Some((PredicateOperator::LessThanOrEq, boundary)),
        PredicateOperator::GreaterThan => boundary
            .checked_add(1)
            .map(|b| (PredicateOperator::GreaterThanOrEq, b)),
        PredicateOperator::GreaterThanOrEq => Some((PredicateOperator::GreaterThanOrEq, boundary)),
        PredicateOperator::Eq => Some((PredicateOperator::Eq, boundary)),
        // many timestamps share a partition, so != says nothing about it
        _ => None,
    };
    rewrite(transform, field_name, rewritten)
}

pub(super) fn strict(
    transform: &TimestampTransform,
    field_name: &str,
    op: PredicateOperator,
    literal: &Datum,
) -> Result<Option<UnboundPredicate>> {
    let boundary = timestamp_literal(literal)?;
    let rewritten = match op {
        PredicateOperator::LessThan => Some((PredicateOperator::LessThan, boundary)),
        PredicateOperator::LessThanOrEq => boundary
            .checked_add(1)
            .map(|b| (PredicateOperator::LessThan, b)),
        PredicateOperator::GreaterThan => Some((PredicateOperator::GreaterThan, boundary)),
        PredicateOperator::GreaterThanOrEq => boundary
            .checked_sub(1)
            .map(|b| (PredicateOperator::GreaterThan, b)),
        PredicateOperator::NotEq => Some((PredicateOperator::NotEq, boundary)),
        // a partition is never known to hold only the literal
        _ => None,
    };
    rewrite(transform, field_name, rewritten)
}

fn rewrite(
    transform: &TimestampTransform,
    field_name: &str,
    rewritten: Option<(PredicateOperator, i64)>,
) -> Result<Option<UnboundPredicate>> {
    let Some((op, boundary)) = rewritten else {
        return Ok(None);
    };
    match transform.apply_value(boundary) {
        Ok(value) => Ok(Some(UnboundPredicate::binary(
            op,
            field_name,
            transform.to_datum(value),
        ))),
        Err(TransformError::OutOfRange { .. }) => Ok(None),
        Err(e) => Err(e),
    }
}
