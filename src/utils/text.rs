#[must_use]
pub fn truncate_with_ellipsis(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => {
            let truncated = &s[..idx];
            format!("{}...", truncated.trim_end())
        }
        None => s.to_string(),
    }
}

fn hard_split(text: &str, max_units: usize, unit_len: fn(char) -> usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for ch in text.chars() {
        let len = unit_len(ch);
        if current_len + len > max_units && !current.is_empty() {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }
        current.push(ch);
        current_len += len;
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
}

fn char_units(_: char) -> usize {
    1
}

/// Split an outbound reply into platform-sized pieces.
///
/// Prefers line boundaries; a single line longer than `max_chars` is split
/// hard on character boundaries.
#[must_use]
pub fn chunk_message(text: &str, max_chars: usize) -> Vec<String> {
    chunk_message_by(text, max_chars, char_units)
}

/// Like [`chunk_message`], for platforms that count UTF-16 code units.
#[must_use]
pub fn chunk_message_utf16(text: &str, max_units: usize) -> Vec<String> {
    chunk_message_by(text, max_units, char::len_utf16)
}

fn chunk_message_by(text: &str, max_units: usize, unit_len: fn(char) -> usize) -> Vec<String> {
    if max_units == 0 || text.is_empty() {
        return Vec::new();
    }
    let measure = |s: &str| s.chars().map(unit_len).sum::<usize>();
    if measure(text) <= max_units {
        return vec![text.to_string()];
    }

    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for line in text.split_inclusive('\n') {
        let line_len = measure(line);
        if line_len > max_units {
            if !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
                current_len = 0;
            }
            chunks.extend(hard_split(line, max_units, unit_len));
            continue;
        }
        if current_len + line_len > max_units {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }
        current.push_str(line);
        current_len += line_len;
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
}
