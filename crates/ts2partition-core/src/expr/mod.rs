//! Predicate model consumed and produced by the projector
//!
//! Bound predicates reference a concrete column (optionally through a
//! transform); unbound predicates only carry a field name and are what
//! projection hands back to the planner.

mod predicate;

pub use predicate::{
    BoundPredicate, BoundReference, BoundTerm, PredicateOperator, UnboundPredicate,
};
