use snafu::Snafu;

use crate::Operator;

/// The error type returned when configuring a query engine.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum Error {
    #[snafu(display("invalid haystack macro pattern '{}': {}", pattern, source))]
    InvalidPattern {
        pattern: String,
        source: regex::Error,
    },
}

/// A fault raised while applying an operator to a record value.
///
/// Faults never reach the caller, they are resolved by the active [`FaultPolicy`](crate::FaultPolicy).
#[derive(Debug, PartialEq, Eq, Snafu)]
#[snafu(visibility(pub(crate)))]
pub(crate) enum Fault {
    #[snafu(display("cannot apply {} to {} value", operator, found))]
    Incompatible {
        operator: Operator,
        found: &'static str,
    },
}
