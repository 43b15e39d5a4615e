mod scheduler;
mod search;

pub use scheduler::{AnimationScheduler, FrameStats, PlaybackState};
pub use search::BackgroundSearch;
