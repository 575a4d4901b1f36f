//! # qy-search
//!
//! Exhaustive search over bit-ordered `f32` coordinates.
//!
//! Every dimension of `[0, 1]` is walked through the integer image of its
//! IEEE-754 bit pattern, the outer dimension is split between rayon
//! workers, and each worker keeps its own bounded top-K set. The sets are
//! merged after the join with the same retention rule.

pub mod encoding;
pub mod engine;
pub mod odometer;
pub mod partition;
pub mod progress;
pub mod scoring;
pub mod sink;
pub mod topk;

pub use encoding::{advance, advance_in, decode, encode, EncodedDomain};
pub use engine::{SearchEngine, SearchPhase, SearchReport};
pub use odometer::Odometer;
pub use partition::{partition, Partition};
pub use progress::{NullProgress, ProgressSink, ProgressTick, PROGRESS_RESOLUTION};
pub use scoring::{
    fract, scorer_for, Coirrational, FnScore, Midpoint, ProductFraction, ScoreFunction,
    GOLDEN_RATIO_CONJUGATE,
};
pub use sink::{result_row, MemorySink, ResultSink};
pub use topk::TopKTracker;
