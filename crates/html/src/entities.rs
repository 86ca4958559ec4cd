/// Named references decoded by [`decode_entities`]. Matching is case-sensitive and requires
/// the terminating semicolon.
const NAMED: &[(&[u8], char)] = &[
    (b"amp", '&'),
    (b"lt", '<'),
    (b"gt", '>'),
    (b"quot", '"'),
    (b"apos", '\''),
    (b"nbsp", '\u{00A0}'),
    (b"times", '\u{00D7}'),
    (b"hellip", '\u{2026}'),
    (b"mdash", '\u{2014}'),
    (b"ndash", '\u{2013}'),
    (b"copy", '\u{00A9}'),
    (b"reg", '\u{00AE}'),
    (b"laquo", '\u{00AB}'),
    (b"raquo", '\u{00BB}'),
    (b"lsquo", '\u{2018}'),
    (b"rsquo", '\u{2019}'),
    (b"ldquo", '\u{201C}'),
    (b"rdquo", '\u{201D}'),
];

const MAX_NAME_LEN: usize = 6;
const MAX_HEX_DIGITS: usize = 6; // 0x10FFFF
const MAX_DEC_DIGITS: usize = 7; // 1114111

/// Decode character references in text and attribute values.
///
/// Only semicolon-terminated references are decoded. Unknown names, malformed numerics and
/// code points that are not Unicode scalar values are copied through unchanged.
pub(crate) fn decode_entities(s: &str) -> String {
    let bytes = s.as_bytes();
    if memchr::memchr(b'&', bytes).is_none() {
        return s.to_string();
    }

    let mut out = String::with_capacity(s.len());
    let mut copy_start = 0;
    let mut i = 0;

    while let Some(rel) = memchr::memchr(b'&', &bytes[i..]) {
        let amp = i + rel;
        match decode_reference(bytes, amp + 1) {
            Some((ch, end)) => {
                out.push_str(&s[copy_start..amp]);
                out.push(ch);
                copy_start = end;
                i = end;
            }
            None => i = amp + 1,
        }
    }

    out.push_str(&s[copy_start..]);
    out
}

/// Decode the reference starting right after `&`; returns the char and the index past `;`.
fn decode_reference(bytes: &[u8], start: usize) -> Option<(char, usize)> {
    if bytes.get(start) == Some(&b'#') {
        let (digits_start, radix, max) = match bytes.get(start + 1) {
            Some(b'x' | b'X') => (start + 2, 16, MAX_HEX_DIGITS),
            _ => (start + 1, 10, MAX_DEC_DIGITS),
        };
        let end = scan_until_semicolon(bytes, digits_start, max, |b| {
            if radix == 16 {
                b.is_ascii_hexdigit()
            } else {
                b.is_ascii_digit()
            }
        })?;
        let digits = std::str::from_utf8(&bytes[digits_start..end]).ok()?;
        let ch = u32::from_str_radix(digits, radix)
            .ok()
            .and_then(char::from_u32)?;
        return Some((ch, end + 1));
    }

    let end = scan_until_semicolon(bytes, start, MAX_NAME_LEN, |b| b.is_ascii_alphanumeric())?;
    let name = &bytes[start..end];
    NAMED
        .iter()
        .find(|(candidate, _)| *candidate == name)
        .map(|(_, ch)| (*ch, end + 1))
}

fn scan_until_semicolon(
    bytes: &[u8],
    start: usize,
    max_len: usize,
    accept: impl Fn(u8) -> bool,
) -> Option<usize> {
    let mut j = start;
    while j < bytes.len() && j - start <= max_len {
        let b = bytes[j];
        if b == b';' {
            return (j > start).then_some(j);
        }
        if !accept(b) {
            return None;
        }
        j += 1;
    }
    None
}
