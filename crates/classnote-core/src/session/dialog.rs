//! Exit dialog overlay.
//!
//! The dialog never touches the microphone or the timer. Its transitions are
//! crate-private: the session applies them when handling a request, then
//! performs whatever resource work the confirmation implies.

use crate::session::normalize_filename;

/// Discriminant of [`ExitDialog`], for views that only need the kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogKind {
    /// No overlay.
    None,
    /// Filename prompt before saving.
    Save,
    /// "You have an unsaved recording" prompt shown on close.
    Close,
    /// Final confirmation before throwing the recording away.
    Discard,
}

/// Confirmation overlay attached to a recording session.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ExitDialog {
    /// No overlay.
    #[default]
    None,
    /// Filename prompt.
    Save {
        /// Text typed by the user, without normalization.
        filename_draft: String,
        /// A save is in flight; every control but the outcome is frozen.
        is_saving: bool,
    },
    /// Close requested while a recording exists.
    Close,
    /// Discard confirmation.
    Discard,
}

impl ExitDialog {
    /// Which overlay is showing.
    pub fn kind(&self) -> DialogKind {
        match self {
            ExitDialog::None => DialogKind::None,
            ExitDialog::Save { .. } => DialogKind::Save,
            ExitDialog::Close => DialogKind::Close,
            ExitDialog::Discard => DialogKind::Discard,
        }
    }

    /// True while a save is in flight.
    pub fn is_saving(&self) -> bool {
        matches!(self, ExitDialog::Save { is_saving: true, .. })
    }

    /// The filename being edited, if the save prompt is showing.
    pub fn filename_draft(&self) -> Option<&str> {
        match self {
            ExitDialog::Save { filename_draft, .. } => Some(filename_draft),
            _ => None,
        }
    }

    /// Whether the save button is enabled.
    pub fn can_confirm_save(&self) -> bool {
        match self {
            ExitDialog::Save {
                filename_draft,
                is_saving: false,
            } => normalize_filename(filename_draft).is_some(),
            _ => false,
        }
    }

    /// Whether the cancel button is enabled.
    pub fn can_cancel(&self) -> bool {
        !matches!(self, ExitDialog::None) && !self.is_saving()
    }

    /// Show the filename prompt. Keeps an existing draft.
    pub(crate) fn open_save(&mut self) -> bool {
        match self {
            ExitDialog::Save { .. } => false,
            _ => {
                *self = ExitDialog::Save {
                    filename_draft: String::new(),
                    is_saving: false,
                };
                true
            }
        }
    }

    /// Show the close prompt.
    pub(crate) fn open_close(&mut self) -> bool {
        if self.is_saving() || matches!(self, ExitDialog::Close) {
            return false;
        }
        *self = ExitDialog::Close;
        true
    }

    /// `close` → `discard`.
    pub(crate) fn escalate_to_discard(&mut self) -> bool {
        if !matches!(self, ExitDialog::Close) {
            return false;
        }
        *self = ExitDialog::Discard;
        true
    }

    /// `close` → `save`.
    pub(crate) fn escalate_to_save(&mut self) -> bool {
        if !matches!(self, ExitDialog::Close) {
            return false;
        }
        self.open_save()
    }

    /// Back to no overlay, unless a save is in flight.
    pub(crate) fn cancel(&mut self) -> bool {
        if !self.can_cancel() {
            return false;
        }
        *self = ExitDialog::None;
        true
    }

    /// Replace the filename draft.
    pub(crate) fn edit_draft(&mut self, text: &str) -> bool {
        match self {
            ExitDialog::Save {
                filename_draft,
                is_saving: false,
            } => {
                text.clone_into(filename_draft);
                true
            }
            _ => false,
        }
    }

    /// Freeze the prompt for an in-flight save and hand back the normalized
    /// filename. `None` when the save button is disabled.
    pub(crate) fn begin_saving(&mut self) -> Option<String> {
        match self {
            ExitDialog::Save {
                filename_draft,
                is_saving,
            } if !*is_saving => {
                let filename = normalize_filename(filename_draft)?;
                *is_saving = true;
                Some(filename)
            }
            _ => None,
        }
    }

    /// Unfreeze after a failed save. The draft is kept for a retry.
    pub(crate) fn save_failed(&mut self) {
        if let ExitDialog::Save { is_saving, .. } = self {
            *is_saving = false;
        }
    }

    /// Close the overlay unconditionally, dropping any draft.
    pub(crate) fn dismiss(&mut self) {
        *self = ExitDialog::None;
    }
}
