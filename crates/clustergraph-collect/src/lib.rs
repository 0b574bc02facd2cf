pub mod collector;
pub mod fixture;
pub mod mapping;
pub mod replay;
pub mod sink;
pub mod snapshot;

pub use collector::{
    CollectAborted, CollectOptions, CollectOutcome, CollectSummary, Collector, MemberFailure,
};
pub use fixture::FixtureSource;
pub use replay::{replay, ReplayInputs, ReplaySummary};
pub use sink::{MemberBatch, RecordSink};
pub use snapshot::{for_each_record, SnapshotPaths, SnapshotWriter};
