//! Code fence tracking for source preprocessing.
//!
//! Splits a document into plain text and fenced code so that rewrites meant
//! for markup (comment escaping) never touch code, and code blocks can be
//! handled as a unit (highlighting).

/// Tracks code fence state during line-by-line processing.
///
/// Code fences in `CommonMark` can use backticks or tildes (three or more).
/// The closing fence must use the same character and be at least as long
/// as the opening fence.
#[derive(Debug, Default)]
struct FenceTracker {
    /// Character used for the current fence (backtick or tilde).
    fence_char: Option<char>,
    /// Length of the opening fence (minimum length for closing).
    fence_len: usize,
}

impl FenceTracker {
    fn in_fence(&self) -> bool {
        self.fence_char.is_some()
    }

    /// Update fence state based on a line.
    ///
    /// Returns `true` if the line is a fence marker (opening or closing).
    fn update(&mut self, line: &str) -> bool {
        let trimmed = line.trim_start();

        if let Some(fence_char) = self.fence_char {
            if is_closing_fence(trimmed, fence_char, self.fence_len) {
                self.fence_char = None;
                self.fence_len = 0;
                return true;
            }
            false
        } else if let Some((ch, len)) = detect_fence(trimmed) {
            self.fence_char = Some(ch);
            self.fence_len = len;
            true
        } else {
            false
        }
    }
}

/// Detect if a line starts a code fence.
///
/// Returns the fence character and length if found.
fn detect_fence(trimmed: &str) -> Option<(char, usize)> {
    let first = trimmed.chars().next()?;
    if first != '`' && first != '~' {
        return None;
    }

    let count = trimmed.chars().take_while(|&c| c == first).count();
    (count >= 3).then_some((first, count))
}

/// Check if a line is a valid closing fence.
fn is_closing_fence(trimmed: &str, expected_char: char, min_len: usize) -> bool {
    if !trimmed.starts_with(expected_char) {
        return false;
    }

    let count = trimmed.chars().take_while(|&c| c == expected_char).count();
    count >= min_len && trimmed[count..].chars().all(char::is_whitespace)
}

/// A fenced code block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Fence<'a> {
    /// Opening line through closing fence characters (no trailing newline).
    pub raw: &'a str,
    /// Leading whitespace of the opening line.
    pub indent: &'a str,
    /// Info string after the opening fence characters, trimmed.
    pub info: &'a str,
    /// Code between the fence lines, without the final line break.
    pub body: &'a str,
}

impl Fence<'_> {
    /// First word of the info string (`rust` for ```` ```rust title="x" ````).
    pub fn language(&self) -> &str {
        self.info.split_whitespace().next().unwrap_or("")
    }

    /// Body with up to the opening fence's indentation removed from each
    /// line, as `CommonMark` does for indented fences.
    pub fn code(&self) -> String {
        let width = self.indent.len();
        self.body
            .split_inclusive('\n')
            .map(|line| {
                let strip = line
                    .bytes()
                    .take(width)
                    .take_while(|b| matches!(b, b' ' | b'\t'))
                    .count();
                &line[strip..]
            })
            .collect()
    }
}

/// Piece of a document: markup text or a fenced code block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Segment<'a> {
    Text(&'a str),
    Fence(Fence<'a>),
}

/// Split `text` into alternating text and fence segments.
///
/// Concatenating the `Text` slices and `Fence::raw` slices in order yields
/// `text` again. An unclosed fence runs to the end of the document.
pub(crate) fn segments(text: &str) -> Vec<Segment<'_>> {
    let mut result = Vec::new();
    let mut tracker = FenceTracker::default();

    let mut text_start = 0;
    let mut fence_start = 0;
    let mut body_start = 0;
    let mut indent = "";
    let mut info = "";
    let mut offset = 0;

    for line in text.split_inclusive('\n') {
        let line_start = offset;
        offset += line.len();
        let content = line.trim_end_matches(['\n', '\r']);

        let was_in_fence = tracker.in_fence();
        if !tracker.update(content) {
            continue;
        }

        if was_in_fence {
            let body = text[body_start..line_start].trim_end_matches(['\n', '\r']);
            let fence_end = line_start + content.trim_end().len();
            result.push(Segment::Fence(Fence {
                raw: &text[fence_start..fence_end],
                indent,
                info,
                body,
            }));
            text_start = fence_end;
        } else {
            if text_start < line_start {
                result.push(Segment::Text(&text[text_start..line_start]));
            }
            let trimmed = content.trim_start();
            indent = &content[..content.len() - trimmed.len()];
            let marker = trimmed.chars().next().unwrap_or('`');
            info = trimmed.trim_start_matches(marker).trim();
            fence_start = line_start;
            body_start = offset;
        }
    }

    if tracker.in_fence() {
        let body = text.get(body_start..).unwrap_or("");
        result.push(Segment::Fence(Fence {
            raw: &text[fence_start..],
            indent,
            info,
            body: body.trim_end_matches(['\n', '\r']),
        }));
    } else if text_start < text.len() {
        result.push(Segment::Text(&text[text_start..]));
    }

    result
}
