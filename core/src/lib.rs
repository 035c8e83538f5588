pub mod cancel;
pub mod dispatcher;
pub mod registry;
pub mod report;
pub mod workload;

pub use cancel::CancelSignal;
pub use dispatcher::Dispatcher;
pub use registry::{NO_PROGRESS, TaskRegistry};
pub use workload::{WorkerContext, Workload, WorkloadKind};
