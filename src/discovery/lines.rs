//! Line number set helpers.

/// Line numbers present in both `a` and `b`.
///
/// Elements of `a` found in `b` come first, in `a`'s order, followed by
/// elements of `b` found in `a` that were not emitted yet. No line number is
/// emitted twice, even when the inputs contain duplicates.
///
/// ```
/// use rulediff::discovery::lines::intersect;
///
/// assert_eq!(intersect(&[5, 1, 3], &[3, 4, 5]), vec![5, 3]);
/// assert!(intersect(&[], &[1, 2]).is_empty());
/// ```
pub fn intersect(a: &[usize], b: &[usize]) -> Vec<usize> {
    let mut common: Vec<usize> = Vec::new();
    for line in a {
        if b.contains(line) && !common.contains(line) {
            common.push(*line);
        }
    }
    for line in b {
        if a.contains(line) && !common.contains(line) {
            common.push(*line);
        }
    }
    common
}

/// Every line number of `body`, starting at 1.
///
/// A trailing newline does not start a new line.
pub fn count_lines(body: &[u8]) -> Vec<usize> {
    let mut total = body.iter().filter(|&&b| b == b'\n').count();
    if body.last().is_some_and(|&b| b != b'\n') {
        total += 1;
    }
    (1..=total).collect()
}

/// Compact, sorted rendering of line numbers, e.g. `1-3,7`.
pub fn format_lines(lines: &[usize]) -> String {
    let mut sorted = lines.to_vec();
    sorted.sort_unstable();
    sorted.dedup();

    let mut ranges: Vec<String> = Vec::new();
    let mut iter = sorted.into_iter();
    let Some(mut start) = iter.next() else {
        return String::new();
    };
    let mut end = start;

    for line in iter {
        if line == end + 1 {
            end = line;
            continue;
        }
        ranges.push(render_range(start, end));
        start = line;
        end = line;
    }
    ranges.push(render_range(start, end));

    ranges.join(",")
}

fn render_range(start: usize, end: usize) -> String {
    if start == end {
        start.to_string()
    } else {
        format!("{}-{}", start, end)
    }
}
