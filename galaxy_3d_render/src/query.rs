/// Query descriptor

/// What a query measures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryType {
    /// Number of samples that passed the depth test
    SamplesPassed,
    /// Whether any sample passed the depth test
    AnySamplesPassed,
    /// GPU time elapsed between begin and end
    TimeElapsed,
    /// Primitives written to stream-output buffers
    StreamOutPrimitivesWritten,
    /// Pipeline statistics counters
    PipelineStatistics,
}

impl QueryType {
    /// Returns true for occlusion queries (usable as render conditions)
    pub fn is_occlusion(&self) -> bool {
        matches!(self, QueryType::SamplesPassed | QueryType::AnySamplesPassed)
    }
}

/// Descriptor for creating a query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryDesc {
    pub query_type: QueryType,
    /// Query will drive conditional rendering
    pub render_condition: bool,
}
