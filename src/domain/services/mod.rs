pub mod rotator;
pub mod schedule;
pub mod search;
pub mod shifter;
pub mod sky;

pub use rotator::{ScheduleRotator, TurnaroundAction, TurnaroundPolicy};
pub use schedule::ScheduleDocument;
pub use search::{SearchOutcome, TimeSearch};
pub use shifter::{ShiftScope, TimeShifter};
pub use sky::SourceRotator;
