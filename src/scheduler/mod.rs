pub mod clock;
pub mod mastery;
pub mod memorization;
pub mod review;

pub use clock::{Clock, FixedClock, SystemClock};
pub use mastery::{sync_buffer, MasteryIndex};
pub use memorization::{generate_memorization_week, MemorizationOutcome};
pub use review::generate_review_week;
