//! Client-side step progress: session counters, affordances, playback
//! adapters and synchronization with the progress store.

mod affordance;
mod playback;
mod session;
mod step_controller;
mod sync;

pub use affordance::{StepState, StepView};
pub use playback::{HostedPlayerState, MediaElementEvent, PlaybackEvent, PlaybackPlan};
pub use session::{CourseSession, TentativeCompletion};
pub use step_controller::StepProgressController;
pub use sync::{HttpProgressSync, LocalProgressSync, ProgressAck, ProgressSync};
