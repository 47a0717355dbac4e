pub mod class_catalog;
pub mod enrollment_ledger;
pub mod payment_workflow;
pub mod selection_queue;
pub mod token_service;
pub mod user_directory;

pub use class_catalog::ClassCatalog;
pub use enrollment_ledger::EnrollmentLedger;
pub use payment_workflow::{PaymentOutcome, PaymentWorkflow};
pub use selection_queue::SelectionQueue;
pub use token_service::{create_shared_token_service, Claims, SharedTokenService, TokenService};
pub use user_directory::UserDirectory;
