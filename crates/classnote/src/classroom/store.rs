//! In-memory classroom store.
//!
//! The store is the only mutation surface for classrooms. Every command
//! validates its input and returns an error rather than silently ignoring a
//! bad ID or a blank name.

use crate::{
    AppError, AppResult,
    classroom::{Classroom, ClassroomColor, SavedRecording},
};

use std::panic::Location;

use chrono::Utc;
use error_location::ErrorLocation;
use tracing::{info, instrument};
use uuid::Uuid;

/// Owns every classroom, trashed ones included.
#[derive(Debug, Default)]
pub struct ClassroomStore {
    classrooms: Vec<Classroom>,
}

impl ClassroomStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Classrooms shown on the dashboard, in creation order.
    pub fn list(&self) -> Vec<&Classroom> {
        self.classrooms.iter().filter(|c| !c.is_trashed).collect()
    }

    /// Visible classroom at one-based `position`.
    pub fn by_position(&self, position: usize) -> Option<&Classroom> {
        position
            .checked_sub(1)
            .and_then(|index| self.list().into_iter().nth(index))
    }

    /// Look up any classroom, trashed or not.
    pub fn get(&self, id: Uuid) -> Option<&Classroom> {
        self.classrooms.iter().find(|c| c.id == id)
    }

    /// Create a classroom. The name is trimmed.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn add(&mut self, name: &str) -> AppResult<Uuid> {
        let name = validated_name(name)?;
        let color = ClassroomColor::for_position(self.list().len());
        let classroom = Classroom::new(name, color, Utc::now());
        let id = classroom.id;

        info!(classroom_id = %id, name = %classroom.name, color = %color, "Classroom created");

        self.classrooms.push(classroom);
        Ok(id)
    }

    /// Rename a classroom. The name is trimmed.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn rename(&mut self, id: Uuid, name: &str) -> AppResult<()> {
        let name = validated_name(name)?;
        let classroom = self.get_mut(id)?;
        let now = Utc::now();
        classroom.name = name;
        classroom.updated_at = now;
        classroom.last_active = now;

        info!(classroom_id = %id, name = %classroom.name, "Classroom renamed");
        Ok(())
    }

    /// Star a classroom.
    #[track_caller]
    pub fn add_favourite(&mut self, id: Uuid) -> AppResult<()> {
        self.set_favourite(id, true)
    }

    /// Unstar a classroom.
    #[track_caller]
    pub fn remove_favourite(&mut self, id: Uuid) -> AppResult<()> {
        self.set_favourite(id, false)
    }

    /// Flip the favourite flag; returns the new value.
    #[track_caller]
    pub fn toggle_favourite(&mut self, id: Uuid) -> AppResult<bool> {
        if self.get_mut(id)?.is_favourite {
            self.remove_favourite(id)?;
            Ok(false)
        } else {
            self.add_favourite(id)?;
            Ok(true)
        }
    }

    /// Hide a classroom from the dashboard.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn move_to_trash(&mut self, id: Uuid) -> AppResult<()> {
        let classroom = self.get_mut(id)?;
        classroom.is_trashed = true;
        classroom.updated_at = Utc::now();
        self.recolor();

        info!(classroom_id = %id, "Classroom moved to trash");
        Ok(())
    }

    /// Attach a saved recording.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn add_recording(&mut self, id: Uuid, recording: SavedRecording) -> AppResult<()> {
        let classroom = self.get_mut(id)?;
        classroom.lecture_count = classroom.lecture_count.saturating_add(1);
        classroom.last_active = recording.saved_at;
        classroom.updated_at = recording.saved_at;
        classroom.recordings.push(recording);

        info!(
            classroom_id = %id,
            lecture_count = classroom.lecture_count,
            "Recording attached to classroom"
        );
        Ok(())
    }

    /// Cards take their colour from their position on the dashboard.
    fn recolor(&mut self) {
        for (position, classroom) in self
            .classrooms
            .iter_mut()
            .filter(|c| !c.is_trashed)
            .enumerate()
        {
            classroom.color = ClassroomColor::for_position(position);
        }
    }

    #[track_caller]
    fn set_favourite(&mut self, id: Uuid, value: bool) -> AppResult<()> {
        let classroom = self.get_mut(id)?;
        classroom.is_favourite = value;
        classroom.updated_at = Utc::now();

        info!(classroom_id = %id, is_favourite = value, "Favourite updated");
        Ok(())
    }

    #[track_caller]
    fn get_mut(&mut self, id: Uuid) -> AppResult<&mut Classroom> {
        self.classrooms
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| AppError::ClassroomNotFound {
                id,
                location: ErrorLocation::from(Location::caller()),
            })
    }
}

#[track_caller]
fn validated_name(name: &str) -> AppResult<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(AppError::InvalidName {
            name: name.to_string(),
            location: ErrorLocation::from(Location::caller()),
        });
    }
    Ok(trimmed.to_string())
}
