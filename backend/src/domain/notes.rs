//! Note text shaping for telemetry and resource payloads.
//!
//! Telemetry carries a short note (the first note, capped in characters)
//! while the `notes` resource collection carries every note, numbered.

/// Default character cap for the short telemetry note.
pub const DEFAULT_SHORT_NOTE_LIMIT: usize = 280;

/// Marker appended to a short note that was cut.
pub const ELLIPSIS_MARKER: &str = "...";

/// First index used when numbering notes in the long form.
pub const NOTE_INDEX_BASE: usize = 1;

/// Formatting knobs for derived note text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteFormat {
    /// Maximum number of characters kept from the first note.
    pub short_note_limit: usize,
}

impl Default for NoteFormat {
    fn default() -> Self {
        Self {
            short_note_limit: DEFAULT_SHORT_NOTE_LIMIT,
        }
    }
}

impl NoteFormat {
    /// Short note: the first entry cut to `short_note_limit` characters, with
    /// [`ELLIPSIS_MARKER`] appended when anything was dropped.
    ///
    /// ```
    /// use poi_sync::domain::NoteFormat;
    ///
    /// let format = NoteFormat { short_note_limit: 5 };
    /// assert_eq!(format.short_note(&["Fuel dock".to_owned()]), "Fuel ...");
    /// assert_eq!(format.short_note(&[]), "");
    /// ```
    pub fn short_note(&self, notes: &[String]) -> String {
        notes
            .first()
            .map(|first| truncate_chars(first, self.short_note_limit))
            .unwrap_or_default()
    }

    /// Long note: every entry prefixed with its 1-based index, one per line.
    ///
    /// ```
    /// use poi_sync::domain::NoteFormat;
    ///
    /// let notes = vec!["Good holding".to_owned(), "Busy in summer".to_owned()];
    /// assert_eq!(
    ///     NoteFormat::default().long_note(&notes),
    ///     "1. Good holding\n2. Busy in summer"
    /// );
    /// ```
    pub fn long_note(&self, notes: &[String]) -> String {
        notes
            .iter()
            .enumerate()
            .map(|(index, note)| format!("{}. {note}", index + NOTE_INDEX_BASE))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Cut `text` to at most `limit` characters, appending [`ELLIPSIS_MARKER`]
/// when it was longer. Counts Unicode scalar values, never splitting one.
pub fn truncate_chars(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((byte_index, _)) => {
            let mut cut = String::with_capacity(byte_index + ELLIPSIS_MARKER.len());
            cut.push_str(&text[..byte_index]);
            cut.push_str(ELLIPSIS_MARKER);
            cut
        }
        None => text.to_owned(),
    }
}
