pub mod scrollbar;
pub mod text;
pub mod timer;

pub use scrollbar::Scrollbar;
pub use text::truncate_with_ellipsis;
pub use timer::{TimerId, TimerKind, TimerSeq, TimerState, Timers};
