use html::{DomEventKind, InputControlType, NodeKind, input_control_type, parse_document};

const SURVEY: &str = r#"<!DOCTYPE html>
<html>
<head><title>Customer survey</title><style>.q { display: block }</style></head>
<body>
  <form id="survey" action="/submit">
    <h2>About you</h2>
    <p><label for="name">What is your name?</label>
       <input type="text" id="name" name="name" value="">
    </p>
    <fieldset id="rating">
      <legend>How satisfied are you?</legend>
      <input type="radio" name="sat" id="s1" value="1"><label for="s1">Not at all</label>
      <input type="radio" name="sat" id="s2" value="2" checked><label for="s2">Somewhat</label>
      <input type="radio" name="sat" id="s3" value="3"><label for="s3">Very &amp; truly</label>
    </fieldset>
    <textarea id="notes" name="notes">
Anything else?</textarea>
    <input type="hidden" name="csrf" value="x1">
    <script>document.querySelector('#name').focus();</script>
  </form>
</body>
</html>"#;

#[test]
fn survey_controls_are_classified_in_document_order() {
    let doc = parse_document(SURVEY);
    let controls: Vec<_> = doc
        .elements()
        .filter(|id| matches!(doc.tag_name(*id), Some("input" | "textarea")))
        .map(|id| input_control_type(&doc, id))
        .collect();
    assert_eq!(
        controls,
        vec![
            InputControlType::Text,
            InputControlType::Radio,
            InputControlType::Radio,
            InputControlType::Radio,
            InputControlType::Textarea,
            InputControlType::Hidden,
        ]
    );
}

#[test]
fn labels_and_rendered_text() {
    let doc = parse_document(SURVEY);
    let s3_label = doc.label_for("s3").expect("label for s3");
    assert_eq!(doc.inner_text(s3_label), "Very & truly");

    let fieldset = doc.element_by_id("rating").unwrap();
    assert_eq!(
        doc.inner_text(fieldset),
        "How satisfied are you?\nNot at all Somewhat Very & truly"
    );

    let form = doc.element_by_id("survey").unwrap();
    let text = doc.inner_text(form);
    assert!(text.starts_with("About you\nWhat is your name?"));
    assert!(!text.contains("querySelector"));
    assert!(!text.contains("Anything else?"));
}

#[test]
fn live_form_state_follows_user_style_edits() {
    let mut doc = parse_document(SURVEY);
    let (s2, s3) = (
        doc.element_by_id("s2").unwrap(),
        doc.element_by_id("s3").unwrap(),
    );
    assert!(doc.checked(s2));
    assert!(doc.set_checked(s3, true));
    assert!(!doc.checked(s2));
    doc.dispatch_event(s3, DomEventKind::Change);

    let notes = doc.element_by_id("notes").unwrap();
    assert_eq!(doc.value(notes), Some("Anything else?"));
    doc.set_value(notes, "All good");
    assert_eq!(doc.value(notes), Some("All good"));
    assert_eq!(doc.text_content(notes), "\nAnything else?");
    assert_eq!(doc.take_events().len(), 1);
}

#[test]
fn script_and_style_bodies_stay_raw() {
    let doc = parse_document(SURVEY);
    let script = doc.elements_named("script").next().unwrap();
    let body = doc.children(script)[0];
    assert!(matches!(
        doc.node(body).map(|n| n.kind()),
        Some(NodeKind::Text(t)) if t == "document.querySelector('#name').focus();"
    ));
    assert_eq!(doc.doctype(), Some("DOCTYPE html"));
}
