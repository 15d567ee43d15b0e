use std::borrow::Cow;

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Terminal columns occupied by `s`.
///
/// Wide characters (CJK, most emoji) count as two columns, combining marks
/// as zero.
///
/// ```
/// use scrollscholar::util::display_width;
///
/// assert_eq!(display_width("Hello"), 5);
/// assert_eq!(display_width("日本"), 4);
/// ```
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

const ELLIPSIS: &str = "...";
const ELLIPSIS_WIDTH: usize = 3;

/// Cut `s` down to at most `max_width` columns, ending in "..." when
/// anything was dropped.
///
/// Widths of three columns or fewer have no room for a character plus the
/// ellipsis, so those return a plain prefix instead. Text that already fits
/// is returned borrowed.
///
/// ```
/// use scrollscholar::util::truncate_to_width;
///
/// assert_eq!(truncate_to_width("Quantum Physics", 10), "Quantum...");
/// assert_eq!(truncate_to_width("Art", 10), "Art");
/// assert_eq!(truncate_to_width("Philosophy", 2), "Ph");
/// ```
pub fn truncate_to_width(s: &str, max_width: usize) -> Cow<'_, str> {
    if max_width == 0 {
        return Cow::Borrowed("");
    }

    if max_width <= ELLIPSIS_WIDTH {
        let end = prefix_end(s, max_width);
        return if end == s.len() {
            Cow::Borrowed(s)
        } else {
            Cow::Owned(s[..end].to_string())
        };
    }

    if display_width(s) <= max_width {
        return Cow::Borrowed(s);
    }

    let cut = prefix_end(s, max_width - ELLIPSIS_WIDTH);
    Cow::Owned(format!("{}{}", &s[..cut], ELLIPSIS))
}

/// Byte offset of the longest prefix of `s` that fits in `width` columns.
fn prefix_end(s: &str, width: usize) -> usize {
    let mut used = 0;
    for (idx, c) in s.char_indices() {
        let w = UnicodeWidthChar::width(c).unwrap_or(0);
        if used + w > width {
            return idx;
        }
        used += w;
    }
    s.len()
}

fn is_stripped_control(b: u8) -> bool {
    b == 0x7f || (b < 0x20 && b != b'\t' && b != b'\n' && b != b'\r')
}

/// Remove terminal control characters and ANSI escape sequences.
///
/// Article text comes from files the user points us at, so anything that
/// could move the cursor or retitle the terminal is dropped before it is
/// stored. CSI sequences end at their final byte; OSC sequences at BEL or
/// `ESC \`. Tab, newline and carriage return survive.
///
/// Clean input comes back borrowed.
pub fn strip_control_chars(s: &str) -> Cow<'_, str> {
    let bytes = s.as_bytes();
    if !bytes.iter().any(|&b| b == 0x1b || is_stripped_control(b)) {
        return Cow::Borrowed(s);
    }

    let len = bytes.len();
    let mut out = String::with_capacity(len);
    let mut i = 0;

    while i < len {
        match bytes[i] {
            0x1b => {
                i += 1;
                match bytes.get(i) {
                    Some(b'[') => {
                        i += 1;
                        while i < len {
                            let c = bytes[i];
                            i += 1;
                            if (0x40..=0x7e).contains(&c) {
                                break;
                            }
                        }
                    }
                    Some(b']') => {
                        i += 1;
                        while i < len {
                            if bytes[i] == 0x07 {
                                i += 1;
                                break;
                            }
                            if bytes[i] == 0x1b && bytes.get(i + 1) == Some(&b'\\') {
                                i += 2;
                                break;
                            }
                            i += 1;
                        }
                    }
                    _ => {}
                }
            }
            b if is_stripped_control(b) => i += 1,
            _ => {
                let start = i;
                while i < len && bytes[i] != 0x1b && !is_stripped_control(bytes[i]) {
                    i += 1;
                }
                // Only ASCII bytes stop the run, so both ends are char boundaries
                out.push_str(&s[start..i]);
            }
        }
    }

    Cow::Owned(out)
}

/// Format a count with comma thousands separators: `1234567` → `"1,234,567"`.
pub fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
