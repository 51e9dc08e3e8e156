use crate::{format_elapsed, normalize_filename};

/// WHAT: Bare, suffixed and upper-case names all end in one extension
/// WHY: The stored name is the only bit-exact contract with the sink
#[test]
fn given_name_with_or_without_extension_when_normalized_then_single_suffix() {
    // Given/When/Then: base case preserved, suffix never doubled
    assert_eq!(normalize_filename("lecture1").as_deref(), Some("lecture1.mp3"));
    assert_eq!(
        normalize_filename("lecture1.mp3").as_deref(),
        Some("lecture1.mp3")
    );
    assert_eq!(
        normalize_filename("LECTURE1.MP3").as_deref(),
        Some("LECTURE1.MP3")
    );
    assert_eq!(
        normalize_filename("Lecture1.Mp3").as_deref(),
        Some("Lecture1.Mp3")
    );
}

/// WHAT: Other extensions are kept and the recording suffix appended
/// WHY: Only the recording suffix counts as already present
#[test]
fn given_foreign_extension_when_normalized_then_suffix_appended() {
    assert_eq!(
        normalize_filename("notes.wav").as_deref(),
        Some("notes.wav.mp3")
    );
    assert_eq!(normalize_filename("mp3").as_deref(), Some("mp3.mp3"));
}

/// WHAT: Whitespace-only and extension-only drafts are rejected
/// WHY: The save button stays disabled when there is no real name
#[test]
fn given_blank_draft_when_normalized_then_none() {
    assert_eq!(normalize_filename(""), None);
    assert_eq!(normalize_filename("   \t"), None);
    assert_eq!(normalize_filename(".mp3"), None);
    assert_eq!(normalize_filename("  .MP3 "), None);
}

/// WHAT: Surrounding whitespace is trimmed, inner whitespace kept
/// WHY: Padding typed by accident should not end up on disk
#[test]
fn given_padded_draft_when_normalized_then_trimmed() {
    assert_eq!(
        normalize_filename("  Week 3 Notes  ").as_deref(),
        Some("Week 3 Notes.mp3")
    );
}

/// WHAT: Multi-byte names never split a character when checking the suffix
/// WHY: Suffix detection slices by bytes
#[test]
fn given_non_ascii_name_when_normalized_then_suffix_appended() {
    assert_eq!(normalize_filename("été").as_deref(), Some("été.mp3"));
    assert_eq!(normalize_filename("日本語").as_deref(), Some("日本語.mp3"));
}

/// WHAT: Elapsed seconds render as m:ss
/// WHY: Seconds are always two digits, minutes are not padded
#[test]
fn given_elapsed_seconds_when_formatted_then_minutes_and_padded_seconds() {
    assert_eq!(format_elapsed(0), "0:00");
    assert_eq!(format_elapsed(5), "0:05");
    assert_eq!(format_elapsed(65), "1:05");
    assert_eq!(format_elapsed(600), "10:00");
    assert_eq!(format_elapsed(3_725), "62:05");
}
