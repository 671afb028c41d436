// Line Normalizer
// Strips comments and whitespace, lowercases, and drops blank lines

pub const COMMENT_MARKER: char = '#';

/// A cleaned source line: non-empty, comment-free, lowercase
#[derive(Debug, Clone, PartialEq)]
pub struct SourceLine {
    pub number: usize, // 1-based physical line in the original text
    pub text: String,
}

impl SourceLine {
    pub fn new(number: usize, text: &str) -> Self {
        SourceLine {
            number,
            text: text.to_string(),
        }
    }
}

/// Normalize raw program text into the ordered sequence of meaningful lines
pub fn normalize(source: &str) -> Vec<SourceLine> {
    source
        .lines()
        .enumerate()
        .filter_map(|(index, raw)| {
            let code = match raw.find(COMMENT_MARKER) {
                Some(pos) => &raw[..pos],
                None => raw,
            };
            let text = code.trim().to_lowercase();
            if text.is_empty() {
                None
            } else {
                Some(SourceLine {
                    number: index + 1,
                    text,
                })
            }
        })
        .collect()
}
