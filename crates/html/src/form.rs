use crate::dom::Document;
use crate::types::NodeId;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputControlType {
    Text,
    Textarea,
    Radio,
    Checkbox,
    Hidden,
    Other,
}

pub fn input_control_type(doc: &Document, id: NodeId) -> InputControlType {
    let Some(element) = doc.element(id) else {
        return InputControlType::Other;
    };

    if element.is("textarea") {
        return InputControlType::Textarea;
    }
    if !element.is("input") {
        return InputControlType::Other;
    }

    let ty = element
        .attr("type")
        .map(str::trim)
        .filter(|s| !s.is_empty());

    match ty {
        None => InputControlType::Text, // missing type defaults to text
        Some(t) if t.eq_ignore_ascii_case("text") => InputControlType::Text,
        Some(t) if t.eq_ignore_ascii_case("radio") => InputControlType::Radio,
        Some(t) if t.eq_ignore_ascii_case("checkbox") => InputControlType::Checkbox,
        Some(t) if t.eq_ignore_ascii_case("hidden") => InputControlType::Hidden,
        _ => InputControlType::Other,
    }
}

/// Radio groups are scoped to their form owner (roughly: the nearest `<form>`), else the
/// document.
pub(crate) fn form_owner_scope(doc: &Document, id: NodeId) -> NodeId {
    doc.ancestor_elements(id)
        .find(|a| doc.element(*a).is_some_and(|e| e.is("form")))
        .unwrap_or_else(|| doc.root())
}

/// Textarea default value: CRLF/CR normalised to LF, one leading newline dropped.
pub(crate) fn textarea_initial_value(raw: &str) -> String {
    let mut value = normalize_newlines(raw);
    if value.starts_with('\n') {
        value.remove(0);
    }
    value
}

fn normalize_newlines(s: &str) -> String {
    if !s.contains('\r') {
        return s.to_string();
    }

    let mut out = String::with_capacity(s.len());
    let mut it = s.chars().peekable();
    while let Some(ch) = it.next() {
        match ch {
            '\r' => {
                if it.peek() == Some(&'\n') {
                    let _ = it.next();
                }
                out.push('\n');
            }
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_document;

    fn id(doc: &Document, value: &str) -> NodeId {
        doc.element_by_id(value).expect("element present")
    }

    #[test]
    fn classifies_controls() {
        let doc = parse_document(
            r#"<input id=a><input id=b type=TEXT><input id=c type=radio><input id=d type=hidden>
               <input id=e type=email><textarea id=f></textarea><div id=g></div>"#,
        );
        assert_eq!(input_control_type(&doc, id(&doc, "a")), InputControlType::Text);
        assert_eq!(input_control_type(&doc, id(&doc, "b")), InputControlType::Text);
        assert_eq!(input_control_type(&doc, id(&doc, "c")), InputControlType::Radio);
        assert_eq!(input_control_type(&doc, id(&doc, "d")), InputControlType::Hidden);
        assert_eq!(input_control_type(&doc, id(&doc, "e")), InputControlType::Other);
        assert_eq!(input_control_type(&doc, id(&doc, "f")), InputControlType::Textarea);
        assert_eq!(input_control_type(&doc, id(&doc, "g")), InputControlType::Other);
    }

    #[test]
    fn checking_a_radio_unchecks_its_group_across_containers() {
        let mut doc = parse_document(
            r#"<div><input id=a type=radio name=g checked></div><div><input id=b type=radio name=g></div>"#,
        );
        let (a, b) = (id(&doc, "a"), id(&doc, "b"));
        assert!(doc.checked(a));
        assert!(doc.set_checked(b, true));
        assert!(!doc.checked(a));
        assert!(doc.checked(b));
    }

    #[test]
    fn radio_groups_are_scoped_per_form() {
        let mut doc = parse_document(
            r#"<form><input id=a type=radio name=g checked></form><form><input id=b type=radio name=g></form>"#,
        );
        let (a, b) = (id(&doc, "a"), id(&doc, "b"));
        assert!(doc.set_checked(b, true));
        assert!(doc.checked(a), "other form's radio must stay checked");
        assert!(doc.checked(b));
    }

    #[test]
    fn radio_group_name_matching_is_case_sensitive() {
        let mut doc = parse_document(
            r#"<input id=a type=radio name=group checked><input id=b type=radio name=Group>"#,
        );
        let (a, b) = (id(&doc, "a"), id(&doc, "b"));
        doc.set_checked(b, true);
        assert!(doc.checked(a));
        assert!(doc.checked(b));
    }

    #[test]
    fn nameless_radios_do_not_uncheck_each_other() {
        let mut doc = parse_document(r#"<input id=a type=radio checked><input id=b type=radio>"#);
        let (a, b) = (id(&doc, "a"), id(&doc, "b"));
        doc.set_checked(b, true);
        assert!(doc.checked(a));
        assert!(doc.checked(b));
    }

    #[test]
    fn rechecking_a_checked_radio_reports_no_change() {
        let mut doc = parse_document(r#"<input id=a type=radio name=g checked>"#);
        let a = id(&doc, "a");
        assert!(!doc.set_checked(a, true));
    }

    #[test]
    fn textarea_value_strips_one_leading_newline() {
        assert_eq!(textarea_initial_value("\nabc"), "abc");
        assert_eq!(textarea_initial_value("\n\nabc"), "\nabc");
        assert_eq!(textarea_initial_value("a\r\nb\rc"), "a\nb\nc");
    }
}
