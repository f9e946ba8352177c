//! The decision pipeline: one cycle per completed activity period, driven by a
//! background loop and observed through a read-only inspector.

pub mod controller;
pub mod cycle;
pub mod loop_worker;
pub mod state;
pub mod transparency;

pub use controller::AgentController;
pub use cycle::{CycleOutcome, DecisionPipeline, PipelineParts};
pub use loop_worker::{agent_loop, NudgeFeedback};
pub use state::{AgentSnapshot, PipelineState, PipelineStatus};
pub use transparency::{DecisionRecord, PipelineInspector, TransparencyLog};
