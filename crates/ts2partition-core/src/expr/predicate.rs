use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::error::{Result, TransformError};
use crate::transform::TimestampTransform;
use crate::types::{Datum, PrimitiveType};

/// Comparison operators a predicate can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PredicateOperator {
    IsNull,
    NotNull,
    LessThan,
    LessThanOrEq,
    GreaterThan,
    GreaterThanOrEq,
    Eq,
    NotEq,
    In,
    NotIn,
}

impl PredicateOperator {
    pub fn is_unary(self) -> bool {
        matches!(self, PredicateOperator::IsNull | PredicateOperator::NotNull)
    }

    pub fn is_binary(self) -> bool {
        matches!(
            self,
            PredicateOperator::LessThan
                | PredicateOperator::LessThanOrEq
                | PredicateOperator::GreaterThan
                | PredicateOperator::GreaterThanOrEq
                | PredicateOperator::Eq
                | PredicateOperator::NotEq
        )
    }

    pub fn is_set(self) -> bool {
        matches!(self, PredicateOperator::In | PredicateOperator::NotIn)
    }
}

impl fmt::Display for PredicateOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            PredicateOperator::IsNull => "IS NULL",
            PredicateOperator::NotNull => "NOT NULL",
            PredicateOperator::LessThan => "<",
            PredicateOperator::LessThanOrEq => "<=",
            PredicateOperator::GreaterThan => ">",
            PredicateOperator::GreaterThanOrEq => ">=",
            PredicateOperator::Eq => "=",
            PredicateOperator::NotEq => "!=",
            PredicateOperator::In => "IN",
            PredicateOperator::NotIn => "NOT IN",
        };
        f.write_str(symbol)
    }
}

impl FromStr for PredicateOperator {
    type Err = TransformError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "isnull" | "is_null" => Ok(PredicateOperator::IsNull),
            "notnull" | "not_null" => Ok(PredicateOperator::NotNull),
            "lt" | "<" => Ok(PredicateOperator::LessThan),
            "lte" | "<=" => Ok(PredicateOperator::LessThanOrEq),
            "gt" | ">" => Ok(PredicateOperator::GreaterThan),
            "gte" | ">=" => Ok(PredicateOperator::GreaterThanOrEq),
            "eq" | "=" => Ok(PredicateOperator::Eq),
            "neq" | "!=" => Ok(PredicateOperator::NotEq),
            "in" => Ok(PredicateOperator::In),
            "notin" | "not_in" => Ok(PredicateOperator::NotIn),
            _ => Err(TransformError::invalid_predicate(format!(
                "unknown operator: {}",
                s
            ))),
        }
    }
}

/// A column resolved against the table schema
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BoundReference {
    name: String,
    field_type: PrimitiveType,
}

impl BoundReference {
    pub fn new(name: impl Into<String>, field_type: PrimitiveType) -> Self {
        Self {
            name: name.into(),
            field_type,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn field_type(&self) -> PrimitiveType {
        self.field_type
    }
}

/// The left-hand side of a bound predicate
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BoundTerm {
    Reference(BoundReference),
    /// A transform applied to a source column
    Transform {
        transform: TimestampTransform,
        reference: BoundReference,
    },
}

impl BoundTerm {
    pub fn reference(name: impl Into<String>, field_type: PrimitiveType) -> Self {
        BoundTerm::Reference(BoundReference::new(name, field_type))
    }

    /// Bind `transform` over `reference`, rejecting source types it cannot handle
    pub fn transform(transform: TimestampTransform, reference: BoundReference) -> Result<Self> {
        if !transform.can_transform(reference.field_type()) {
            return Err(TransformError::unsupported_type(reference.field_type()));
        }
        Ok(BoundTerm::Transform {
            transform,
            reference,
        })
    }

    /// Type of the values this term produces
    pub fn result_type(&self) -> PrimitiveType {
        match self {
            BoundTerm::Reference(reference) => reference.field_type(),
            BoundTerm::Transform {
                transform,
                reference,
            } => transform.result_type(reference.field_type()),
        }
    }

    pub fn source(&self) -> &BoundReference {
        match self {
            BoundTerm::Reference(reference) => reference,
            BoundTerm::Transform { reference, .. } => reference,
        }
    }

    pub fn as_transform(&self) -> Option<&TimestampTransform> {
        match self {
            BoundTerm::Transform { transform, .. } => Some(transform),
            BoundTerm::Reference(_) => None,
        }
    }
}

impl fmt::Display for BoundTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundTerm::Reference(reference) => f.write_str(reference.name()),
            BoundTerm::Transform {
                transform,
                reference,
            } => write!(f, "{}({})", transform, reference.name()),
        }
    }
}

/// A predicate over a bound term
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoundPredicate {
    Unary {
        op: PredicateOperator,
        term: BoundTerm,
    },
    Binary {
        op: PredicateOperator,
        term: BoundTerm,
        literal: Datum,
    },
    Set {
        op: PredicateOperator,
        term: BoundTerm,
        literals: BTreeSet<Datum>,
    },
}

impl BoundPredicate {
    pub fn unary(op: PredicateOperator, term: BoundTerm) -> Result<Self> {
        if !op.is_unary() {
            return Err(TransformError::invalid_predicate(format!(
                "{} is not a unary operator",
                op
            )));
        }
        Ok(BoundPredicate::Unary { op, term })
    }

    pub fn binary(op: PredicateOperator, term: BoundTerm, literal: Datum) -> Result<Self> {
        if !op.is_binary() {
            return Err(TransformError::invalid_predicate(format!(
                "{} is not a comparison operator",
                op
            )));
        }
        check_literal_type(&term, &literal)?;
        Ok(BoundPredicate::Binary { op, term, literal })
    }

    pub fn set(
        op: PredicateOperator,
        term: BoundTerm,
        literals: impl IntoIterator<Item = Datum>,
    ) -> Result<Self> {
        if !op.is_set() {
            return Err(TransformError::invalid_predicate(format!(
                "{} is not a set operator",
                op
            )));
        }
        let literals: BTreeSet<Datum> = literals.into_iter().collect();
        if literals.is_empty() {
            return Err(TransformError::invalid_predicate(format!(
                "{} requires at least one literal",
                op
            )));
        }
        for literal in &literals {
            check_literal_type(&term, literal)?;
        }
        Ok(BoundPredicate::Set { op, term, literals })
    }

    pub fn op(&self) -> PredicateOperator {
        match self {
            BoundPredicate::Unary { op, .. }
            | BoundPredicate::Binary { op, .. }
            | BoundPredicate::Set { op, .. } => *op,
        }
    }

    pub fn term(&self) -> &BoundTerm {
        match self {
            BoundPredicate::Unary { term, .. }
            | BoundPredicate::Binary { term, .. }
            | BoundPredicate::Set { term, .. } => term,
        }
    }
}

fn check_literal_type(term: &BoundTerm, literal: &Datum) -> Result<()> {
    let expected = term.result_type();
    if literal.data_type() != expected {
        return Err(TransformError::invalid_predicate(format!(
            "literal {} has type {}, but {} produces {}",
            literal,
            literal.data_type(),
            term,
            expected
        )));
    }
    Ok(())
}

impl fmt::Display for BoundPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundPredicate::Unary { op, term } => write!(f, "{} {}", term, op),
            BoundPredicate::Binary { op, term, literal } => {
                write!(f, "{} {} {}", term, op, literal)
            }
            BoundPredicate::Set { op, term, literals } => {
                write!(f, "{} {} ({})", term, op, join(literals))
            }
        }
    }
}

/// A predicate expressed against a partition field name
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnboundPredicate {
    Unary {
        op: PredicateOperator,
        name: String,
    },
    Binary {
        op: PredicateOperator,
        name: String,
        literal: Datum,
    },
    Set {
        op: PredicateOperator,
        name: String,
        literals: BTreeSet<Datum>,
    },
}

impl UnboundPredicate {
    pub fn unary(op: PredicateOperator, name: impl Into<String>) -> Self {
        UnboundPredicate::Unary {
            op,
            name: name.into(),
        }
    }

    pub fn binary(op: PredicateOperator, name: impl Into<String>, literal: Datum) -> Self {
        UnboundPredicate::Binary {
            op,
            name: name.into(),
            literal,
        }
    }

    pub fn set(
        op: PredicateOperator,
        name: impl Into<String>,
        literals: impl IntoIterator<Item = Datum>,
    ) -> Self {
        UnboundPredicate::Set {
            op,
            name: name.into(),
            literals: literals.into_iter().collect(),
        }
    }

    pub fn op(&self) -> PredicateOperator {
        match self {
            UnboundPredicate::Unary { op, .. }
            | UnboundPredicate::Binary { op, .. }
            | UnboundPredicate::Set { op, .. } => *op,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            UnboundPredicate::Unary { name, .. }
            | UnboundPredicate::Binary { name, .. }
            | UnboundPredicate::Set { name, .. } => name,
        }
    }

    /// Evaluate against a single partition value; `None` stands for a null partition
    pub fn test(&self, value: Option<&Datum>) -> bool {
        match (self, value) {
            (UnboundPredicate::Unary { op, .. }, value) => match op {
                PredicateOperator::IsNull => value.is_none(),
                _ => value.is_some(),
            },
            (_, None) => false,
            (UnboundPredicate::Binary { op, literal, .. }, Some(value)) => match op {
                PredicateOperator::LessThan => value < literal,
                PredicateOperator::LessThanOrEq => value <= literal,
                PredicateOperator::GreaterThan => value > literal,
                PredicateOperator::GreaterThanOrEq => value >= literal,
                PredicateOperator::Eq => value == literal,
                _ => value != literal,
            },
            (UnboundPredicate::Set { op, literals, .. }, Some(value)) => match op {
                PredicateOperator::In => literals.contains(value),
                _ => !literals.contains(value),
            },
        }
    }
}

impl fmt::Display for UnboundPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnboundPredicate::Unary { op, name } => write!(f, "{} {}", name, op),
            UnboundPredicate::Binary { op, name, literal } => {
                write!(f, "{} {} {}", name, op, literal)
            }
            UnboundPredicate::Set { op, name, literals } => {
                write!(f, "{} {} ({})", name, op, join(literals))
            }
        }
    }
}

fn join(literals: &BTreeSet<Datum>) -> String {
    literals
        .iter()
        .map(|d| d.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts_term() -> BoundTerm {
        BoundTerm::reference("ts", PrimitiveType::Timestamp)
    }

    #[test]
    fn test_operator_shapes() {
        assert!(PredicateOperator::IsNull.is_unary());
        assert!(PredicateOperator::NotEq.is_binary());
        assert!(PredicateOperator::NotIn.is_set());
        assert!(!PredicateOperator::In.is_binary());
        assert_eq!("lte".parse::<PredicateOperator>().unwrap(), PredicateOperator::LessThanOrEq);
        assert_eq!("NotIn".parse::<PredicateOperator>().unwrap(), PredicateOperator::NotIn);
        assert!("between".parse::<PredicateOperator>().is_err());
    }

    #[test]
    fn test_bound_predicate_rejects_wrong_shape() {
        assert!(BoundPredicate::unary(PredicateOperator::Eq, ts_term()).is_err());
        assert!(BoundPredicate::binary(
            PredicateOperator::In,
            ts_term(),
            Datum::timestamp_micros(0)
        )
        .is_err());
        assert!(BoundPredicate::set(PredicateOperator::LessThan, ts_term(), vec![]).is_err());
    }

    #[test]
    fn test_bound_predicate_rejects_wrong_literal_type() {
        let err = BoundPredicate::binary(PredicateOperator::Eq, ts_term(), Datum::int(3))
            .unwrap_err();
        assert_eq!(err.code(), "E005");

        let err = BoundPredicate::set(
            PredicateOperator::In,
            ts_term(),
            vec![Datum::timestamp_micros(1), Datum::long(2)],
        )
        .unwrap_err();
        assert_eq!(err.code(), "E005");
    }

    #[test]
    fn test_empty_set_rejected() {
        let err = BoundPredicate::set(PredicateOperator::In, ts_term(), Vec::new()).unwrap_err();
        assert!(err.to_string().contains("at least one literal"));
    }

    #[test]
    fn test_set_literals_deduplicated() {
        let pred = BoundPredicate::set(
            PredicateOperator::In,
            ts_term(),
            vec![
                Datum::timestamp_micros(2),
                Datum::timestamp_micros(1),
                Datum::timestamp_micros(2),
            ],
        )
        .unwrap();
        match pred {
            BoundPredicate::Set { literals, .. } => assert_eq!(literals.len(), 2),
            other => panic!("expected set predicate, got {other:?}"),
        }
    }

    #[test]
    fn test_transform_term_requires_timestamp_source() {
        let day = TimestampTransform::get(PrimitiveType::Timestamp, "day", None).unwrap();
        let err = BoundTerm::transform(day.clone(), BoundReference::new("n", PrimitiveType::Long))
            .unwrap_err();
        assert_eq!(err.code(), "E001");

        let term =
            BoundTerm::transform(day, BoundReference::new("ts", PrimitiveType::Timestamp)).unwrap();
        assert_eq!(term.result_type(), PrimitiveType::Date);
        assert_eq!(term.to_string(), "day(ts)");
        assert_eq!(term.source().name(), "ts");
    }

    #[test]
    fn test_unbound_display() {
        assert_eq!(
            UnboundPredicate::unary(PredicateOperator::IsNull, "p").to_string(),
            "p IS NULL"
        );
        assert_eq!(
            UnboundPredicate::binary(PredicateOperator::LessThan, "p", Datum::date(17167))
                .to_string(),
            "p < 2017-01-01"
        );
        assert_eq!(
            UnboundPredicate::set(PredicateOperator::In, "p", vec![Datum::int(2), Datum::int(1)])
                .to_string(),
            "p IN (1, 2)"
        );
    }

    #[test]
    fn test_unbound_evaluation() {
        let pred = UnboundPredicate::binary(PredicateOperator::LessThanOrEq, "p", Datum::int(5));
        assert!(pred.test(Some(&Datum::int(5))));
        assert!(!pred.test(Some(&Datum::int(6))));
        assert!(!pred.test(None));

        let pred = UnboundPredicate::set(PredicateOperator::NotIn, "p", vec![Datum::int(1)]);
        assert!(pred.test(Some(&Datum::int(2))));
        assert!(!pred.test(Some(&Datum::int(1))));

        let pred = UnboundPredicate::unary(PredicateOperator::IsNull, "p");
        assert!(pred.test(None));
        assert!(!pred.test(Some(&Datum::int(1))));
    }
}
