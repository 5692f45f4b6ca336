use crate::network::{EdgeId, StopId};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum NetworkError {
    #[error("{field} must not be blank")]
    BlankField { field: &'static str },

    #[error("invalid number {value:?} for {field}")]
    InvalidNumber { field: &'static str, value: String },

    #[error("{field} cannot be negative")]
    NegativeValue { field: &'static str },

    #[error("unknown transport mode {name:?}")]
    UnknownMode { name: String },

    #[error("unknown weighting criterion {name:?}")]
    UnknownCriterion { name: String },

    #[error("a stop with code {code:?} already exists")]
    DuplicateStop { code: String },

    #[error("a route must connect two distinct stops")]
    SameStop,

    #[error("no stop named {name:?}")]
    StopNotFound { name: String },

    #[error("no stop with code {code:?}")]
    StopCodeNotFound { code: String },

    #[error("stop handle {0:?} is no longer present")]
    InvalidStop(StopId),

    #[error("edge handle {0:?} is no longer present")]
    InvalidEdge(EdgeId),

    #[error("no route at index {index} on edge {edge:?}")]
    NoSuchRoute { edge: EdgeId, index: usize },

    #[error("no path from {origin:?} to {destination:?} with the selected transport modes")]
    NoPath { origin: String, destination: String },

    #[error("the network contains a negative-weight cycle under the {criterion} criterion")]
    NegativeCycle { criterion: &'static str },

    #[error("stop {to:?} is not adjacent to {from:?}")]
    NotAdjacent { from: String, to: String },

    #[error("there is nothing to restore")]
    NothingToRestore,

    #[error(transparent)]
    Csv(#[from] csv::Error),
}
