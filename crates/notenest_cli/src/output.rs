//! Text rendering for notes.

use notenest_core::Note;

pub const EMPTY_LIST_MESSAGE: &str = "No notes found.";

/// Renders one note as an `ID/Title/Content` block.
pub fn format_note(note: &Note) -> String {
    format!(
        "ID: {}\nTitle: {}\nContent: {}",
        note.id,
        note.title,
        note.content_or_empty()
    )
}

/// Renders notes as blocks separated by blank lines.
pub fn format_note_list(notes: &[Note]) -> String {
    if notes.is_empty() {
        return EMPTY_LIST_MESSAGE.to_string();
    }

    notes
        .iter()
        .map(format_note)
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note(id: i64, title: &str, content: Option<&str>) -> Note {
        Note {
            id,
            title: title.to_string(),
            content: content.map(str::to_string),
        }
    }

    #[test]
    fn format_empty_list() {
        assert_eq!(format_note_list(&[]), "No notes found.");
    }

    #[test]
    fn format_list_separates_blocks() {
        let output = format_note_list(&[
            note(1, "Groceries", Some("Milk, eggs")),
            note(2, "Todo", None),
        ]);
        assert_eq!(
            output,
            "ID: 1\nTitle: Groceries\nContent: Milk, eggs\n\nID: 2\nTitle: Todo\nContent: "
        );
    }
}
