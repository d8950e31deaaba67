//! Repository-relative path splitting, joining and unquoting
//!
//! Paths in a listing are always `/` separated regardless of the host platform,
//! so these helpers work on strings rather than [`std::path::Path`].

/// Separator used by repository-relative paths
pub const SEPARATOR: char = '/';

/// Non-empty segments of a relative path
///
/// Leading, trailing and repeated separators produce no segments, so `""` and
/// `"/"` both yield nothing.
pub fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split(SEPARATOR).filter(|segment| !segment.is_empty())
}

/// Split a path into its parent directory (if any) and its basename
pub fn split_parent(path: &str) -> (Option<&str>, &str) {
    match path.rsplit_once(SEPARATOR) {
        Some((parent, name)) => (Some(parent), name),
        None => (None, path),
    }
}

/// Join segments with the separator
pub fn join<I, S>(segments: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut joined = String::new();
    for segment in segments {
        if !joined.is_empty() {
            joined.push(SEPARATOR);
        }
        joined.push_str(segment.as_ref());
    }
    joined
}

/// Undo git's C-style quoting of unusual paths
///
/// Paths containing control characters, quotes, backslashes or (with
/// `core.quotePath`) non-ASCII bytes are emitted wrapped in double quotes with
/// backslash escapes and octal byte escapes. Unquoted input is returned as is.
pub fn unquote(raw: &str) -> Result<String, String> {
    let inner = match raw
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
    {
        Some(inner) if raw.len() >= 2 => inner,
        _ => return Ok(raw.to_string()),
    };

    let bytes = inner.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        let byte = bytes[i];
        if byte != b'\\' {
            out.push(byte);
            i += 1;
            continue;
        }

        let escape = *bytes
            .get(i + 1)
            .ok_or_else(|| "dangling escape at end of quoted path".to_string())?;
        let decoded = match escape {
            b'\\' => b'\\',
            b'"' => b'"',
            b'a' => 0x07,
            b'b' => 0x08,
            b'f' => 0x0c,
            b'n' => b'\n',
            b'r' => b'\r',
            b't' => b'\t',
            b'v' => 0x0b,
            b'0'..=b'7' => {
                let digits = bytes
                    .get(i + 1..i + 4)
                    .filter(|d| d.iter().all(|b| (b'0'..=b'7').contains(b)))
                    .ok_or_else(|| "octal escape needs three digits".to_string())?;
                let value = digits
                    .iter()
                    .fold(0u32, |acc, d| acc * 8 + u32::from(d - b'0'));
                let value = u8::try_from(value)
                    .map_err(|_| format!("octal escape out of range: {}", value))?;
                out.push(value);
                i += 4;
                continue;
            }
            other => return Err(format!("unknown escape \\{}", other as char)),
        };
        out.push(decoded);
        i += 2;
    }

    String::from_utf8(out).map_err(|e| format!("quoted path is not UTF-8: {}", e))
}
