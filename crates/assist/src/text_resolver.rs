//! Question text for a form control.
//!
//! Sources are tried in a fixed order and the first one yielding text wins:
//! 1. a `label` whose `for` matches the control's `id`,
//! 2. an enclosing `label`,
//! 3. the nearest of up to [`MAX_ANCESTOR_DEPTH`] ancestors whose rendered text contains `?`,
//! 4. a text node directly before the control.
//!
//! The winning block is reduced to one line by [`pick_question_line`].
use html::{Document, NodeId};

pub const MAX_ANCESTOR_DEPTH: usize = 4;

/// Shorter questions are treated as noise and never surfaced.
pub const MIN_QUESTION_CHARS: usize = 5;

pub fn resolve_question(doc: &Document, id: NodeId) -> Option<String> {
    let raw = raw_question_text(doc, id)?;
    pick_question_line(&raw)
}

/// The unprocessed text block chosen by the priority chain.
pub fn raw_question_text(doc: &Document, id: NodeId) -> Option<String> {
    label_text(doc, id)
        .or_else(|| ancestor_question_text(doc, id))
        .or_else(|| preceding_text(doc, id))
}

/// Text of the `label[for=id]` or the enclosing `label`, whichever comes first and is non-empty.
pub(crate) fn label_text(doc: &Document, id: NodeId) -> Option<String> {
    let explicit = doc
        .attr(id, "id")
        .and_then(|control_id| doc.label_for(control_id))
        .map(|label| doc.inner_text(label))
        .filter(|text| !text.is_empty());
    explicit.or_else(|| {
        doc.closest(id, "label")
            .map(|label| doc.inner_text(label))
            .filter(|text| !text.is_empty())
    })
}

fn ancestor_question_text(doc: &Document, id: NodeId) -> Option<String> {
    doc.ancestor_elements(id)
        .take(MAX_ANCESTOR_DEPTH)
        .map(|ancestor| doc.inner_text(ancestor))
        .find(|text| text.contains('?'))
}

fn preceding_text(doc: &Document, id: NodeId) -> Option<String> {
    doc.previous_sibling(id)
        .and_then(|prev| doc.node(prev))
        .and_then(|node| node.as_text())
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}

/// First trimmed line containing `?`, else the first non-empty line.
pub fn pick_question_line(raw: &str) -> Option<String> {
    let mut lines = raw.lines().map(str::trim).filter(|l| !l.is_empty()).peekable();
    let first = *lines.peek()?;
    let line = lines.find(|l| l.contains('?')).unwrap_or(first);
    Some(line.to_string())
}

pub fn is_long_enough(question: &str) -> bool {
    question.chars().count() >= MIN_QUESTION_CHARS
}

#[cfg(test)]
mod tests {
    use super::*;
    use html::parse_document;

    fn resolve(html: &str, control: &str) -> Option<String> {
        let doc = parse_document(html);
        let id = doc.element_by_id(control).expect("control present");
        resolve_question(&doc, id)
    }

    #[test]
    fn explicit_label_wins_over_everything() {
        let html = r#"<div>Is this the container question?
            <label for="q">What is your name?</label><input id="q" type="text"></div>"#;
        assert_eq!(resolve(html, "q").as_deref(), Some("What is your name?"));
    }

    #[test]
    fn enclosing_label_is_second() {
        let html = r#"<label>Your favourite city<input id="c"></label>"#;
        assert_eq!(resolve(html, "c").as_deref(), Some("Your favourite city"));
    }

    #[test]
    fn empty_explicit_label_falls_through() {
        let html = r#"<label for="c"> </label><label>Enclosing text<input id="c"></label>"#;
        assert_eq!(resolve(html, "c").as_deref(), Some("Enclosing text"));
    }

    #[test]
    fn ancestor_with_question_mark_prefers_the_question_line() {
        let html = r#"<div class="q"><h3>Section 2</h3><p>Which city is the capital of France?</p>
            <div><span><input id="a"></span></div></div>"#;
        assert_eq!(
            resolve(html, "a").as_deref(),
            Some("Which city is the capital of France?")
        );
    }

    #[test]
    fn ancestor_search_stops_after_four_levels() {
        let html = r#"<section>Too far away?<div><div><div><div><input id="a"></div></div></div></div></section>"#;
        assert_eq!(resolve(html, "a"), None);
        let html = r#"<section>Just close enough?<div><div><div><input id="a"></div></div></div></section>"#;
        assert_eq!(resolve(html, "a").as_deref(), Some("Just close enough?"));
    }

    #[test]
    fn preceding_text_node_is_the_last_resort() {
        let html = r#"<div>  Favourite colour  <input id="a"></div>"#;
        assert_eq!(resolve(html, "a").as_deref(), Some("Favourite colour"));
        let html = r#"<div><b>Bold</b><input id="a"></div>"#;
        assert_eq!(resolve(html, "a"), None);
    }

    #[test]
    fn line_picking() {
        assert_eq!(pick_question_line("  \n first \n second? \n third?"), Some("second?".into()));
        assert_eq!(pick_question_line("only\nlines"), Some("only".into()));
        assert_eq!(pick_question_line(" \n\t\n"), None);
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        assert!(!is_long_enough("Hi"));
        assert!(!is_long_enough("éééé"));
        assert!(is_long_enough("Name?"));
    }

    #[test]
    fn resolution_is_repeatable() {
        let doc = parse_document(r#"<p>Where do you live?<input id="a"></p>"#);
        let id = doc.element_by_id("a").unwrap();
        assert_eq!(resolve_question(&doc, id), resolve_question(&doc, id));
    }
}
