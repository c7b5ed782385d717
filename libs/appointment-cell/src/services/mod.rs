pub mod sessions;
pub mod slots;
pub mod submission;
pub mod validation;
pub mod wizard;

pub use sessions::BookingSessionStore;
pub use slots::{date_options, SlotGenerator};
pub use submission::{generate_reference, BookingSubmitter, SimulatedSubmitter};
pub use validation::validate_patient_form;
pub use wizard::BookingWizard;
