use crate::classroom::ClassroomStore;

use std::fmt::Write;

use classnote_core::format_elapsed;

/// Render the classroom list, or the empty state.
pub fn render(store: &ClassroomStore) -> String {
    let classrooms = store.list();
    let mut out = String::from("Your Classrooms\n");

    if classrooms.is_empty() {
        out.push_str("  No Classrooms Yet\n");
        out.push_str("  Create your first classroom to get started (`create <name>`)\n");
        return out;
    }

    for (index, classroom) in classrooms.iter().enumerate() {
        let star = if classroom.is_favourite { "★" } else { " " };
        let lectures = match classroom.lecture_count {
            1 => "1 lecture".to_string(),
            n => format!("{} lectures", n),
        };
        let _ = writeln!(
            out,
            "  {:>2}. {} {:<24} {:<7} {:<12} last active {}",
            index + 1,
            star,
            classroom.name,
            classroom.color,
            lectures,
            classroom.last_active.format("%Y-%m-%d %H:%M")
        );
        if let Some(latest) = classroom.recordings.last() {
            let _ = writeln!(
                out,
                "        latest: {} ({})",
                latest.filename,
                format_elapsed(latest.duration_seconds)
            );
        }
    }

    out
}
