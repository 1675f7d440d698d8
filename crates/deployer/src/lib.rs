// Publishing backends and the simulated collaborators behind the wizard.

pub mod publish;
pub mod simulated;
pub mod storage;

pub use publish::{KEY_PREFIX, PublishStore, storage_key};
pub use simulated::{
    CannedContentGenerator, Collaborators, LocalPublisher, SimulatedPathChecker,
    SimulatedScraper, SimulatedWordPressExporter,
};
pub use storage::{FileStore, KeyValueStore, MemoryStore};
