/// Packs `lines` into messages of at most `max_chars` characters.
///
/// The first message starts with `header`; whenever the next line would push
/// a message over the limit, that message is closed and a new one starts with
/// `continuation` followed by the line. A line is always placed into a
/// message that has no lines yet, so an oversized line cannot produce a
/// header-only message. Returns no messages when `lines` is empty.
pub fn chunk_lines(header: &str, continuation: &str, lines: &[String], max_chars: usize) -> Vec<String> {
    if lines.is_empty() {
        return Vec::new();
    }

    let mut messages = Vec::new();
    let mut current = header.to_string();
    let mut current_chars = header.chars().count();
    let mut has_lines = false;

    for line in lines {
        let line_chars = line.chars().count();
        if has_lines && current_chars + line_chars > max_chars {
            messages.push(std::mem::take(&mut current));
            current.push_str(continuation);
            current_chars = continuation.chars().count();
        }
        current.push_str(line);
        current_chars += line_chars;
        has_lines = true;
    }

    messages.push(current);
    messages
}
