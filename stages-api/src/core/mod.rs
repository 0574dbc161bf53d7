//! Core domain records: pipelines, events and stages.

mod event;
mod ids;
mod pipeline;
mod stage;

pub use event::{Event, EventType};
pub use ids::{EventId, IdParseError, JobId, PipelineId, StageId};
pub use pipeline::Pipeline;
pub use stage::{Stage, StageRecord};
