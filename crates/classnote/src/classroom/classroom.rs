use std::fmt;

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Card accent colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassroomColor {
    /// Blue.
    Blue,
    /// Purple.
    Purple,
    /// Green.
    Green,
    /// Pink.
    Pink,
}

impl ClassroomColor {
    const CYCLE: [ClassroomColor; 4] = [
        ClassroomColor::Blue,
        ClassroomColor::Purple,
        ClassroomColor::Green,
        ClassroomColor::Pink,
    ];

    /// Colour for the card at zero-based `position`.
    pub fn for_position(position: usize) -> Self {
        Self::CYCLE[position % Self::CYCLE.len()]
    }

    /// Lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            ClassroomColor::Blue => "blue",
            ClassroomColor::Purple => "purple",
            ClassroomColor::Green => "green",
            ClassroomColor::Pink => "pink",
        }
    }
}

impl fmt::Display for ClassroomColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// A lecture recording attached to a classroom after a successful save.
#[derive(Debug, Clone, PartialEq)]
pub struct SavedRecording {
    /// Filename as handed to the sink.
    pub filename: String,
    /// Elapsed recording time in seconds.
    pub duration_seconds: u64,
    /// When the save completed.
    pub saved_at: DateTime<Utc>,
}

/// A course the user records lectures for.
#[derive(Debug, Clone, PartialEq)]
pub struct Classroom {
    /// Stable identifier.
    pub id: Uuid,
    /// Display name, never blank.
    pub name: String,
    /// Number of recordings saved into this classroom.
    pub lecture_count: u32,
    /// Last creation, rename or recording.
    pub last_active: DateTime<Utc>,
    /// Accent colour, following the dashboard position.
    pub color: ClassroomColor,
    /// Starred by the user.
    pub is_favourite: bool,
    /// Moved to trash; hidden from the dashboard.
    pub is_trashed: bool,
    /// Saved recordings, oldest first.
    pub recordings: Vec<SavedRecording>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

impl Classroom {
    pub(crate) fn new(name: String, color: ClassroomColor, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            lecture_count: 0,
            last_active: now,
            color,
            is_favourite: false,
            is_trashed: false,
            recordings: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }
}
