pub mod config;
pub mod event;
pub mod filter;
pub mod network;
pub mod pipeline;
pub mod threshold;
pub mod timestamp;
pub mod vocabulary;

pub use config::{ApiConfig, CanvasConfig, Config, FetchConfig, LoggingConfig};
pub use filter::{
    encode_component, query_key, FilterState, OrderedSelection, DEFAULT_LIMIT, MAX_LIMIT,
};
pub use event::{Actor, Event, EventPage, Source, ThresholdCrossing, PENDING_MARKER};
pub use network::{
    ConvergenceClass, ConvergenceMatrix, ConvergenceScore, LayerEventRef, NetworkDetail,
    NetworkSummary, ResistanceSpotlight,
};
pub use pipeline::{
    GeneratedReport, PipelineRun, PipelineStatus, Report, ReportRequest, TriggeredRun,
};
pub use threshold::{ThresholdDefinition, ThresholdMetric, ThresholdStatusEntry};
pub use vocabulary::{
    AlertLevel, AnalyticalLayer, CouplingPatternId, MetabolicNetwork, OntologyNode, SourceTier,
    ThresholdCategory, ThresholdStatus,
};
