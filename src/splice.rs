//! Signature splicing over the editor's HTML string.
//!
//! Signatures are located by literal substring match, not by walking the
//! HTML. Each removal or append is a [`TextChange`] applied to a
//! [`DraftDocument`], which tracks where the caret should land afterwards.

use tracing::{debug, trace};

use crate::signatures::{self, Signature};

/// What the user picked in the signature panel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SignatureChoice {
    /// The "no signature" sentinel.
    #[default]
    None,
    Signature(u32),
}

impl SignatureChoice {
    pub const SENTINEL_KEY: &'static str = "no-signature";

    pub fn key(self) -> String {
        match self {
            Self::None => Self::SENTINEL_KEY.to_string(),
            Self::Signature(id) => id.to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextChange {
    pub start: usize,
    pub end: usize,
    pub insert: String,
}

impl TextChange {
    pub fn remove(start: usize, end: usize) -> Self {
        Self {
            start,
            end,
            insert: String::new(),
        }
    }

    pub fn append_at(len: usize, insert: impl Into<String>) -> Self {
        Self {
            start: len,
            end: len,
            insert: insert.into(),
        }
    }
}

/// Where the editor caret should be after the content is written back.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CursorPlacement {
    /// Leave it wherever the editor puts it after `setContent`.
    #[default]
    EditorDefault,
    DocumentEnd,
}

/// Working copy of the document while a splice is being planned.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DraftDocument {
    pub text: String,
    pub cursor: CursorPlacement,
    pub revision: u64,
}

impl DraftDocument {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            cursor: CursorPlacement::EditorDefault,
            revision: 0,
        }
    }

    /// Apply one change. Out-of-range or non-boundary edits are ignored and
    /// reported as `false`.
    pub fn apply(&mut self, change: TextChange) -> bool {
        let len = self.text.len();
        if change.start > change.end
            || change.end > len
            || !self.text.is_char_boundary(change.start)
            || !self.text.is_char_boundary(change.end)
        {
            return false;
        }
        if change.start == change.end && change.insert.is_empty() {
            return false;
        }
        self.text
            .replace_range(change.start..change.end, &change.insert);
        self.revision += 1;
        true
    }

    /// Remove the first occurrence of `fragment`. Empty fragments never match.
    pub fn remove_first(&mut self, fragment: &str) -> bool {
        if fragment.is_empty() {
            return false;
        }
        match self.text.find(fragment) {
            Some(start) => self.apply(TextChange::remove(start, start + fragment.len())),
            None => false,
        }
    }

    pub fn append(&mut self, fragment: &str) -> bool {
        let len = self.text.len();
        self.apply(TextChange::append_at(len, fragment))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpliceOutcome {
    pub content: String,
    pub cursor: CursorPlacement,
    /// Ids of signatures whose text was stripped.
    pub removed: Vec<u32>,
    pub appended: Option<u32>,
    /// Number of changes applied to the draft.
    pub edits: u64,
}

/// Strip every known signature from `content` and append the chosen one.
pub fn splice(content: &str, known: &[Signature], choice: SignatureChoice) -> SpliceOutcome {
    let mut draft = DraftDocument::new(content);
    let mut removed = Vec::new();

    for sig in known {
        if draft.remove_first(&sig.content) {
            trace!(id = sig.id, "stripped signature");
            removed.push(sig.id);
        }
    }

    let chosen = match choice {
        SignatureChoice::None => None,
        SignatureChoice::Signature(id) => signatures::find(known, id),
    };

    let mut appended = None;
    if let Some(sig) = chosen.filter(|sig| !sig.content.is_empty()) {
        if draft.append(&sig.content) {
            draft.cursor = CursorPlacement::DocumentEnd;
            appended = Some(sig.id);
        }
    }

    SpliceOutcome {
        content: draft.text,
        cursor: draft.cursor,
        removed,
        appended,
        edits: draft.revision,
    }
}

/// The slice of the embedded editor the splicer needs.
pub trait DocumentHandle {
    fn set_content(&self, html: &str);
    fn move_cursor_to_end(&self);
}

/// Apply a choice to the live editor. Returns the new content so the caller
/// can notify its host, or `None` when no editor is attached yet.
pub fn apply_choice<H: DocumentHandle>(
    handle: Option<&H>,
    current: &str,
    known: &[Signature],
    choice: SignatureChoice,
) -> Option<String> {
    let Some(handle) = handle else {
        debug!(choice = %choice.key(), "no editor attached; selection recorded only");
        return None;
    };

    let outcome = splice(current, known, choice);
    handle.set_content(&outcome.content);
    if outcome.cursor == CursorPlacement::DocumentEnd {
        handle.move_cursor_to_end();
    }
    debug!(
        choice = %choice.key(),
        removed = ?outcome.removed,
        appended = ?outcome.appended,
        edits = outcome.edits,
        "applied signature choice"
    );
    Some(outcome.content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    fn sig(id: u32, name: &str, content: &str) -> Signature {
        Signature {
            id,
            name: name.to_string(),
            content: content.to_string(),
        }
    }

    fn catalog() -> Vec<Signature> {
        vec![
            sig(1, "Work", "<br/>Regards,Alice"),
            sig(2, "Casual", "<p>cheers, A</p>"),
            sig(3, "Empty", ""),
        ]
    }

    #[derive(Default)]
    struct FakeEditor {
        content: RefCell<String>,
        cursor_moves: RefCell<u32>,
    }

    impl DocumentHandle for FakeEditor {
        fn set_content(&self, html: &str) {
            *self.content.borrow_mut() = html.to_string();
        }

        fn move_cursor_to_end(&self) {
            *self.cursor_moves.borrow_mut() += 1;
        }
    }

    #[test]
    fn appends_then_removes_signature() {
        let sigs = vec![sig(1, "Work", "<br/>Regards,Alice")];
        let applied = splice("Hello<br/>", &sigs, SignatureChoice::Signature(1));
        assert_eq!(applied.content, "Hello<br/><br/>Regards,Alice");
        assert_eq!(applied.cursor, CursorPlacement::DocumentEnd);

        let cleared = splice(&applied.content, &sigs, SignatureChoice::None);
        assert_eq!(cleared.content, "Hello<br/>");
        assert_eq!(cleared.cursor, CursorPlacement::EditorDefault);
        assert_eq!(cleared.removed, vec![1]);
    }

    #[test]
    fn switching_signatures_keeps_only_the_latest() {
        let sigs = catalog();
        let first = splice("Body", &sigs, SignatureChoice::Signature(1));
        let second = splice(&first.content, &sigs, SignatureChoice::Signature(2));
        assert_eq!(second.content, "Body<p>cheers, A</p>");
        assert!(!second.content.contains("Regards,Alice"));
        assert_eq!(second.removed, vec![1]);
        assert_eq!(second.appended, Some(2));
        assert_eq!(second.edits, 2);
    }

    #[test]
    fn reselecting_is_idempotent() {
        let sigs = catalog();
        let once = splice("Body", &sigs, SignatureChoice::Signature(2));
        let twice = splice(&once.content, &sigs, SignatureChoice::Signature(2));
        assert_eq!(once.content, twice.content);
    }

    #[test]
    fn sentinel_restores_baseline_after_any_sequence() {
        let sigs = catalog();
        let baseline = "<p>Hi team</p>";
        let mut content = baseline.to_string();
        for choice in [
            SignatureChoice::Signature(2),
            SignatureChoice::Signature(1),
            SignatureChoice::Signature(1),
            SignatureChoice::Signature(2),
        ] {
            content = splice(&content, &sigs, choice).content;
        }
        assert_eq!(splice(&content, &sigs, SignatureChoice::None).content, baseline);
    }

    #[test]
    fn empty_or_unknown_choice_only_strips() {
        let sigs = catalog();
        let signed = splice("Body", &sigs, SignatureChoice::Signature(1)).content;

        let empty = splice(&signed, &sigs, SignatureChoice::Signature(3));
        assert_eq!(empty.content, "Body");
        assert_eq!(empty.appended, None);
        assert_eq!(empty.cursor, CursorPlacement::EditorDefault);

        let unknown = splice(&signed, &sigs, SignatureChoice::Signature(42));
        assert_eq!(unknown.content, "Body");
    }

    #[test]
    fn removes_only_first_occurrence() {
        let sigs = vec![sig(1, "Short", "--")];
        let outcome = splice("a--b--", &sigs, SignatureChoice::None);
        assert_eq!(outcome.content, "ab--");
        assert_eq!(outcome.edits, 1);
    }

    #[test]
    fn draft_rejects_out_of_range_changes() {
        let mut draft = DraftDocument::new("héllo");
        assert!(!draft.apply(TextChange::remove(0, 99)));
        assert!(!draft.apply(TextChange::remove(2, 3)));
        assert!(!draft.apply(TextChange::append_at(0, "")));
        assert_eq!(draft.revision, 0);
        assert!(draft.apply(TextChange::remove(0, 1)));
        assert_eq!(draft.text, "éllo");
        assert_eq!(draft.revision, 1);
    }

    #[test]
    fn apply_choice_writes_content_and_moves_cursor() {
        let editor = FakeEditor::default();
        let sigs = catalog();
        let next = apply_choice(Some(&editor), "Hi", &sigs, SignatureChoice::Signature(1));
        assert_eq!(next.as_deref(), Some("Hi<br/>Regards,Alice"));
        assert_eq!(*editor.content.borrow(), "Hi<br/>Regards,Alice");
        assert_eq!(*editor.cursor_moves.borrow(), 1);

        let cleared = apply_choice(
            Some(&editor),
            "Hi<br/>Regards,Alice",
            &sigs,
            SignatureChoice::None,
        );
        assert_eq!(cleared.as_deref(), Some("Hi"));
        assert_eq!(*editor.cursor_moves.borrow(), 1);
    }

    #[test]
    fn apply_choice_without_editor_is_a_no_op() {
        let sigs = catalog();
        let next = apply_choice::<FakeEditor>(None, "Hi", &sigs, SignatureChoice::Signature(1));
        assert_eq!(next, None);
    }

    #[test]
    fn choice_keys() {
        assert_eq!(SignatureChoice::None.key(), "no-signature");
        assert_eq!(SignatureChoice::Signature(7).key(), "7");
    }
}
