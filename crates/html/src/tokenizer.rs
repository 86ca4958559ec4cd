//! Forgiving HTML tokenizer for form documents.
//!
//! Tag and attribute names are restricted to ASCII `[A-Za-z0-9:_-]` and lowercased. This is
//! not the HTML5 state machine: there is no parse-error recovery beyond skipping bytes that
//! cannot start a name, and raw-text close tags accept only ASCII whitespace before `>`.
use crate::entities::decode_entities;
use crate::types::{Attribute, Token, TokenStream};
use memchr::memchr;

const HTML_COMMENT_START: &str = "<!--";
const HTML_COMMENT_END: &str = "-->";

fn starts_with_ignore_ascii_case_at(haystack: &[u8], start: usize, needle: &[u8]) -> bool {
    haystack.len() >= start + needle.len()
        && haystack[start..start + needle.len()].eq_ignore_ascii_case(needle)
}

fn is_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'-' || b == b'_' || b == b':'
}

pub(crate) fn is_void_element(name: &str) -> bool {
    matches!(
        name,
        "area"
            | "base"
            | "br"
            | "col"
            | "embed"
            | "hr"
            | "img"
            | "input"
            | "link"
            | "meta"
            | "param"
            | "source"
            | "track"
            | "wbr"
    )
}

/// Elements whose content is consumed verbatim up to the matching close tag.
fn raw_text_kind(name: &str) -> Option<RawText> {
    match name {
        "script" | "style" => Some(RawText::Verbatim),
        "textarea" | "title" => Some(RawText::Escapable),
        _ => None,
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum RawText {
    Verbatim,
    Escapable,
}

/// Find `</name` followed by optional ASCII whitespace and `>`; returns (tag start, tag end).
fn find_raw_text_close_tag(haystack: &str, name: &str) -> Option<(usize, usize)> {
    let hay = haystack.as_bytes();
    let name = name.as_bytes();
    let len = hay.len();
    let mut i = 0;
    while i < len {
        // '<' never appears inside a UTF-8 continuation byte, so every hit is a boundary.
        let rel = memchr(b'<', &hay[i..])?;
        i += rel;
        if hay.get(i + 1) == Some(&b'/') && starts_with_ignore_ascii_case_at(hay, i + 2, name) {
            let mut k = i + 2 + name.len();
            while k < len && hay[k].is_ascii_whitespace() {
                k += 1;
            }
            if k < len && hay[k] == b'>' {
                return Some((i, k + 1));
            }
        }
        i += 1;
    }
    None
}

/// Tokenize `input` into a flat token stream.
pub fn tokenize(input: &str) -> TokenStream {
    let mut out = Vec::new();
    let bytes = input.as_bytes();
    let len = bytes.len();
    let mut i = 0;

    while i < len {
        if bytes[i] != b'<' {
            let start = i;
            i = memchr(b'<', &bytes[i..]).map_or(len, |rel| i + rel);
            push_text(&mut out, &input[start..i]);
            continue;
        }

        if input[i..].starts_with(HTML_COMMENT_START) {
            let body_start = i + HTML_COMMENT_START.len();
            match input[body_start..].find(HTML_COMMENT_END) {
                Some(end) => {
                    out.push(Token::Comment(input[body_start..body_start + end].to_string()));
                    i = body_start + end + HTML_COMMENT_END.len();
                    continue;
                }
                None => {
                    out.push(Token::Comment(input[body_start..].to_string()));
                    break;
                }
            }
        }

        if starts_with_ignore_ascii_case_at(bytes, i, b"<!doctype") {
            let rest = &input[i + 2..];
            let Some(end) = rest.find('>') else {
                break;
            };
            out.push(Token::Doctype(rest[..end].trim().to_string()));
            i += 2 + end + 1;
            continue;
        }

        if bytes.get(i + 1) == Some(&b'/') {
            let start = i + 2;
            let mut j = start;
            while j < len && is_name_byte(bytes[j]) {
                j += 1;
            }
            let name = input[start..j].to_ascii_lowercase();
            j = memchr(b'>', &bytes[j..]).map_or(len, |rel| j + rel + 1);
            if !name.is_empty() {
                out.push(Token::EndTag(name));
            }
            i = j;
            continue;
        }

        let start = i + 1;
        let mut j = start;
        while j < len && is_name_byte(bytes[j]) {
            j += 1;
        }
        if j == start {
            // A lone '<' (e.g. "a < b") is text.
            push_text(&mut out, "<");
            i += 1;
            continue;
        }

        let name = input[start..j].to_ascii_lowercase();
        let (attributes, explicit_self_closing, content_start) = scan_attributes(input, j);
        let self_closing = explicit_self_closing || is_void_element(&name);
        let raw = if self_closing {
            None
        } else {
            raw_text_kind(&name)
        };

        out.push(Token::StartTag {
            name: name.clone(),
            attributes,
            self_closing,
        });
        i = content_start;

        if let Some(kind) = raw {
            let body = &input[content_start..];
            let (body_end, resume) = match find_raw_text_close_tag(body, &name) {
                Some((tag_start, tag_end)) => (content_start + tag_start, content_start + tag_end),
                // A missing close tag swallows the rest of the input.
                None => (len, len),
            };
            let text = &input[content_start..body_end];
            if !text.is_empty() {
                let text = match kind {
                    RawText::Verbatim => text.to_string(),
                    RawText::Escapable => decode_entities(text),
                };
                out.push(Token::Text(text));
            }
            out.push(Token::EndTag(name));
            i = resume;
        }
    }

    log::trace!(target: "html.tokenizer", "tokenized {} bytes into {} tokens", len, out.len());
    TokenStream::new(out)
}

fn push_text(out: &mut Vec<Token>, raw: &str) {
    if raw.is_empty() {
        return;
    }
    let decoded = decode_entities(raw);
    // Adjacent text runs (e.g. around a stray '<') merge into one token.
    if let Some(Token::Text(prev)) = out.last_mut() {
        prev.push_str(&decoded);
    } else {
        out.push(Token::Text(decoded));
    }
}

/// Scan attributes starting right after the tag name. Returns the attributes, whether the tag
/// ended with `/>`, and the index just past the closing `>`.
fn scan_attributes(input: &str, mut k: usize) -> (Vec<Attribute>, bool, usize) {
    let bytes = input.as_bytes();
    let len = bytes.len();
    let mut attributes: Vec<Attribute> = Vec::new();
    let mut self_closing = false;

    let skip_whitespace = |k: &mut usize| {
        while *k < len && bytes[*k].is_ascii_whitespace() {
            *k += 1;
        }
    };

    loop {
        skip_whitespace(&mut k);
        if k >= len {
            break;
        }
        if bytes[k] == b'>' {
            k += 1;
            break;
        }
        if bytes[k] == b'/' {
            if bytes.get(k + 1) == Some(&b'>') {
                self_closing = true;
                k += 2;
                break;
            }
            k += 1;
            continue;
        }

        let name_start = k;
        while k < len && is_name_byte(bytes[k]) {
            k += 1;
        }
        if name_start == k {
            k += 1;
            continue;
        }
        let attribute_name = input[name_start..k].to_ascii_lowercase();

        skip_whitespace(&mut k);
        let value = if k < len && bytes[k] == b'=' {
            k += 1;
            skip_whitespace(&mut k);
            if k < len && (bytes[k] == b'"' || bytes[k] == b'\'') {
                let quote = bytes[k];
                k += 1;
                let value_start = k;
                k = memchr(quote, &bytes[k..]).map_or(len, |rel| k + rel);
                let value = decode_entities(&input[value_start..k]);
                if k < len {
                    k += 1;
                }
                Some(value)
            } else {
                let value_start = k;
                while k < len && !bytes[k].is_ascii_whitespace() && bytes[k] != b'>' {
                    if bytes[k] == b'/' && bytes.get(k + 1) == Some(&b'>') {
                        break;
                    }
                    k += 1;
                }
                Some(decode_entities(&input[value_start..k]))
            }
        } else {
            None
        };

        // First occurrence wins, as in the HTML5 tokenizer.
        if !attributes.iter().any(|(existing, _)| *existing == attribute_name) {
            attributes.push((attribute_name, value));
        }
    }

    (attributes, self_closing, k)
}
