// Repository ports
// Domain-owned persistence contracts implemented by infrastructure adapters

pub mod detection_repository;
pub mod inbox_repository;
pub mod operator_repository;
pub mod preference_repository;
pub mod session_repository;

pub use detection_repository::DetectionRepository;
pub use inbox_repository::InboxRepository;
pub use operator_repository::OperatorRepository;
pub use preference_repository::PreferenceRepository;
pub use session_repository::SessionRepository;
