/// Suffix every saved recording carries.
pub const RECORDING_EXTENSION: &str = ".mp3";

/// Turn a user-typed draft into the stored filename.
///
/// Surrounding whitespace is trimmed and [`RECORDING_EXTENSION`] is appended
/// unless the name already ends with it (compared case-insensitively), so the
/// result carries exactly one suffix. The base name keeps its case.
///
/// Returns `None` when nothing but whitespace or a bare extension was typed.
pub fn normalize_filename(draft: &str) -> Option<String> {
    let name = draft.trim();

    if has_recording_extension(name) {
        let base_len = name.len() - RECORDING_EXTENSION.len();
        if name[..base_len].trim().is_empty() {
            return None;
        }
        return Some(name.to_string());
    }

    if name.is_empty() {
        return None;
    }

    Some(format!("{name}{RECORDING_EXTENSION}"))
}

fn has_recording_extension(name: &str) -> bool {
    name.len()
        .checked_sub(RECORDING_EXTENSION.len())
        .and_then(|start| name.get(start..))
        .is_some_and(|suffix| suffix.eq_ignore_ascii_case(RECORDING_EXTENSION))
}
