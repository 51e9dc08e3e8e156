//! Classrooms shown on the dashboard.

#[allow(clippy::module_inception)]
mod classroom;
mod store;

pub use {
    classroom::{Classroom, ClassroomColor, SavedRecording},
    store::ClassroomStore,
};
