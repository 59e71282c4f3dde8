//! Testing utilities and harness for pointerwait

pub mod robot;
pub mod task;

pub use robot::PointerRobot;
pub use task::ManualTask;

pub mod prelude {
    pub use crate::robot::*;
    pub use crate::task::*;
    pub use pointerwait_core::*;
}
