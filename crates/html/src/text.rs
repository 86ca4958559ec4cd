//! Rendered-text approximation (`innerText`) without a layout engine.
use crate::dom::{Document, NodeKind};
use crate::types::NodeId;

fn is_block(name: &str) -> bool {
    matches!(
        name,
        "address"
            | "article"
            | "aside"
            | "blockquote"
            | "dd"
            | "details"
            | "dialog"
            | "div"
            | "dl"
            | "dt"
            | "fieldset"
            | "figcaption"
            | "figure"
            | "footer"
            | "form"
            | "h1"
            | "h2"
            | "h3"
            | "h4"
            | "h5"
            | "h6"
            | "header"
            | "hr"
            | "legend"
            | "li"
            | "main"
            | "nav"
            | "ol"
            | "p"
            | "pre"
            | "section"
            | "summary"
            | "table"
            | "tbody"
            | "thead"
            | "tfoot"
            | "tr"
            | "ul"
    )
}

fn is_non_rendering(name: &str) -> bool {
    matches!(
        name,
        "script" | "style" | "template" | "head" | "title" | "noscript" | "textarea" | "select"
    )
}

struct TextSink {
    out: String,
}

impl TextSink {
    fn line_break(&mut self) {
        if !self.out.is_empty() && !self.out.ends_with('\n') {
            self.out.push('\n');
        }
    }

    fn push_collapsed(&mut self, text: &str) {
        for (i, word) in text.split(is_collapsible).enumerate() {
            if i > 0 {
                self.space();
            }
            self.out.push_str(word);
        }
    }

    fn space(&mut self) {
        if !self.out.is_empty() && !self.out.ends_with([' ', '\n', '\t']) {
            self.out.push(' ');
        }
    }

    fn finish(self) -> String {
        let lines: Vec<&str> = self
            .out
            .split('\n')
            .map(|line| line.trim_matches(|c| c == ' ' || c == '\t'))
            .collect();
        let first = lines.iter().position(|l| !l.is_empty());
        let last = lines.iter().rposition(|l| !l.is_empty());
        match (first, last) {
            (Some(first), Some(last)) => lines[first..=last].join("\n"),
            _ => String::new(),
        }
    }
}

fn is_collapsible(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r' | '\u{000C}')
}

pub(crate) fn collect_inner_text(doc: &Document, id: NodeId) -> String {
    let mut sink = TextSink { out: String::new() };
    match doc.node(id).map(|n| n.kind()) {
        Some(NodeKind::Text(text)) => sink.push_collapsed(text),
        Some(NodeKind::Element(_) | NodeKind::Document { .. }) => {
            for child in doc.children(id) {
                walk(doc, *child, false, &mut sink);
            }
        }
        _ => {}
    }
    sink.finish()
}

fn walk(doc: &Document, id: NodeId, in_pre: bool, sink: &mut TextSink) {
    let Some(node) = doc.node(id) else {
        return;
    };
    match node.kind() {
        NodeKind::Text(text) if in_pre => sink.out.push_str(&text.replace("\r\n", "\n")),
        NodeKind::Text(text) => sink.push_collapsed(text),
        NodeKind::Element(element) => {
            let name = element.name();
            if is_non_rendering(name) || doc.is_style_hidden(id) {
                return;
            }
            if name == "br" {
                sink.out.push('\n');
                return;
            }
            let block = is_block(name);
            if block {
                sink.line_break();
            }
            let in_pre = in_pre || name == "pre";
            for child in node.children() {
                walk(doc, *child, in_pre, sink);
            }
            if block {
                sink.line_break();
            } else if name == "td" || name == "th" {
                sink.out.push('\t');
            }
        }
        NodeKind::Comment(_) | NodeKind::Document { .. } => {}
    }
}

#[cfg(test)]
mod tests {
    use crate::parse_document;

    fn inner(html: &str) -> String {
        let doc = parse_document(html);
        let first = doc.children(doc.root())[0];
        doc.inner_text(first)
    }

    #[test]
    fn collapses_whitespace_runs() {
        assert_eq!(
            inner("<label>\n    What is\n    your name?\n</label>"),
            "What is your name?"
        );
    }

    #[test]
    fn block_children_become_lines() {
        assert_eq!(
            inner("<div><h3>Section 2</h3><p>Which city is the capital of France?</p><span>Pick one</span></div>"),
            "Section 2\nWhich city is the capital of France?\nPick one"
        );
    }

    #[test]
    fn br_breaks_lines_and_inline_runs_join() {
        assert_eq!(
            inner("<div>First <b>bold</b> line<br>second line</div>"),
            "First bold line\nsecond line"
        );
    }

    #[test]
    fn skips_scripts_hidden_subtrees_and_textarea_content() {
        assert_eq!(
            inner(r#"<div>Shown<script>var x = 1;</script><span style="display:none">Hidden</span><textarea>typed</textarea></div>"#),
            "Shown"
        );
    }

    #[test]
    fn pre_keeps_its_whitespace() {
        assert_eq!(inner("<div><pre>a  b\nc</pre></div>"), "a  b\nc");
    }

    #[test]
    fn empty_elements_render_nothing() {
        assert_eq!(inner("<div>   <span> </span>\n</div>"), "");
    }
}
