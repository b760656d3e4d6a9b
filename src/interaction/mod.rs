// Pointer and keyboard gesture handling
// Headless counterparts of the drag, resize and shortcut handlers a UI layer wires up

pub mod board;
pub mod drag;
pub mod drop;
pub mod resize;
pub mod shortcuts;

pub use board::SchedulerBoard;
