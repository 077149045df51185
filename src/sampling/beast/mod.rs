//! Guided sampling over a cell abstraction with sampling-effort costs

pub mod effort;
pub mod frontier;
pub mod graph;
pub mod sampler;

pub use effort::{EdgeStatus, EffortModel, PropagationStats};
pub use frontier::{IndexedPriorityQueue, Key};
pub use graph::{CellGraph, Edge, Vertex};
pub use sampler::{GuidedSampler, GuidedSamplerConfig};
