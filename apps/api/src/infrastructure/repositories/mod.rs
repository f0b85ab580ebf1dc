// Repository implementations (data access layer)
// Adapters that implement domain repository interfaces

pub mod in_memory_detection_repository;
pub mod in_memory_inbox_repository;
pub mod in_memory_operator_repository;
pub mod in_memory_preference_repository;
pub mod in_memory_session_repository;

pub use in_memory_detection_repository::InMemoryDetectionRepository;
pub use in_memory_inbox_repository::InMemoryInboxRepository;
pub use in_memory_operator_repository::InMemoryOperatorRepository;
pub use in_memory_preference_repository::InMemoryPreferenceRepository;
pub use in_memory_session_repository::InMemorySessionRepository;
