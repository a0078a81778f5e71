//! Helper functions for diff parsing.

/// Line counts from a hunk header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct HunkHeader {
    pub old_start: usize,
    pub old_len: usize,
    pub new_start: usize,
    pub new_len: usize,
}

/// New-side path of a `diff --git a/<old> b/<new>` header (text after `diff --git `).
///
/// Paths may contain spaces, so the split happens on the last ` b/`. Paths
/// git had to quote are decoded with [`unquote_path`].
pub(super) fn parse_diff_git_line(rest: &str) -> Option<String> {
    if rest.ends_with('"') {
        let start = rest.rfind(" \"b/")?;
        return unquote_path(&rest[start + 1..])
            .strip_prefix("b/")
            .map(str::to_string);
    }
    let (_, new_path) = rest.rsplit_once(" b/")?;
    Some(normalize_path(new_path))
}

/// Decode a path as git prints it.
///
/// Even with `core.quotepath=off`, names containing `"`, `\` or control
/// characters come out in double quotes with C escapes (`\t`, `\"`, `\\`,
/// octal `\303\251`). Unquoted paths only get [`normalize_path`]; a
/// backslash in a decoded name is part of the name.
pub fn unquote_path(path: &str) -> String {
    let Some(inner) = path.strip_prefix('"').and_then(|p| p.strip_suffix('"')) else {
        return normalize_path(path);
    };

    let raw = inner.as_bytes();
    let mut bytes = Vec::with_capacity(raw.len());
    let mut i = 0;
    while i < raw.len() {
        if raw[i] != b'\\' || i + 1 == raw.len() {
            bytes.push(raw[i]);
            i += 1;
            continue;
        }

        let escaped = match raw[i + 1] {
            b'n' => Some(b'\n'),
            b't' => Some(b'\t'),
            b'r' => Some(b'\r'),
            b'a' => Some(0x07),
            b'b' => Some(0x08),
            b'f' => Some(0x0c),
            b'v' => Some(0x0b),
            b'"' => Some(b'"'),
            b'\\' => Some(b'\\'),
            _ => None,
        };
        if let Some(byte) = escaped {
            bytes.push(byte);
            i += 2;
            continue;
        }

        match raw.get(i + 1..i + 4) {
            Some(digits) if digits.iter().all(|d| (b'0'..=b'7').contains(d)) => {
                let value = digits
                    .iter()
                    .fold(0u16, |acc, d| acc * 8 + u16::from(d - b'0'));
                bytes.push(value as u8);
                i += 4;
            }
            _ => {
                bytes.push(raw[i]);
                i += 1;
            }
        }
    }

    String::from_utf8_lossy(&bytes).into_owned()
}

/// Line counts of a `@@ -a[,b] +c[,d] @@` header; anything after the
/// closing `@@` is ignored. A missing length means one line.
pub(super) fn parse_hunk_header(line: &str) -> Option<HunkHeader> {
    let line = line.strip_prefix("@@ ")?;

    let (ranges, _) = line.split_once(" @@")?;
    let (old, new) = ranges.split_once(' ')?;

    let (old_start, old_len) = parse_range(old.strip_prefix('-')?)?;
    let (new_start, new_len) = parse_range(new.trim_start().strip_prefix('+')?)?;

    Some(HunkHeader {
        old_start,
        old_len,
        new_start,
        new_len,
    })
}

/// Parse "start" or "start,len".
fn parse_range(range: &str) -> Option<(usize, usize)> {
    match range.split_once(',') {
        Some((start, len)) => Some((start.parse().ok()?, len.parse().ok()?)),
        None => Some((range.parse().ok()?, 1)),
    }
}

/// Forward slashes only, so patterns match the same on every platform.
pub fn normalize_path(path: &str) -> String {
    path.replace('\\', "/")
}
