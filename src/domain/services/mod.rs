pub mod flows;
pub mod invocation;
pub mod orchestrator;
pub mod report;
pub mod retry;
pub mod sessions;

pub use orchestrator::OrchestratorService;
pub use sessions::FileStorage;
#[cfg(test)]
pub use sessions::MemoryStorage;
pub use sessions::Sessions;
