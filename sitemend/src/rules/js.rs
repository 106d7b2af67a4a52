//! JavaScript minification rule.
//!
//! Unlike the stylesheet pass, this one walks the source with a small
//! scanner instead of regexes: string and template literals are copied
//! verbatim, comments are dropped, and whitespace outside literals is
//! collapsed to the minimum that keeps adjacent tokens apart. The
//! `true`/`false` shortening is token-aware and never fires inside a
//! literal or a property position.
//!
//! Known constraint: regular-expression literals are passed through as
//! ordinary punctuation, so a literal whose body contains `//` reads as a
//! comment to the scanner.

use crate::engine::{Outcome, Rule};

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

/// Output writer that resolves pending whitespace when the next token
/// arrives. A space survives only between two identifier characters or
/// between two identical `+`/`-` operators.
struct MinifiedWriter {
    out: String,
    pending_space: bool,
}

impl MinifiedWriter {
    fn new(capacity: usize) -> Self {
        Self {
            out: String::with_capacity(capacity),
            pending_space: false,
        }
    }

    fn space(&mut self) {
        if !self.out.is_empty() {
            self.pending_space = true;
        }
    }

    fn resolve_space(&mut self, next: char) {
        if self.pending_space {
            let keep = match self.out.chars().last() {
                Some(prev) => {
                    (is_ident_char(prev) && is_ident_char(next))
                        || (prev == next && (next == '+' || next == '-'))
                }
                None => false,
            };
            if keep {
                self.out.push(' ');
            }
            self.pending_space = false;
        }
    }

    fn push_punct(&mut self, c: char) {
        self.resolve_space(c);
        if c == '}' && self.out.ends_with(';') {
            self.out.pop();
        }
        self.out.push(c);
    }

    fn push_verbatim(&mut self, text: &str) {
        if let Some(first) = text.chars().next() {
            self.resolve_space(first);
        }
        self.out.push_str(text);
    }

    fn last_char(&self) -> Option<char> {
        self.out.chars().last()
    }
}

/// Next non-whitespace character at or after `from`.
fn next_nonspace(source: &str, from: usize) -> Option<char> {
    source[from..].chars().find(|c| !c.is_whitespace())
}

/// Minify a script.
#[must_use]
pub fn minify_js(js: &str) -> String {
    let mut w = MinifiedWriter::new(js.len());
    let mut iter = js.char_indices().peekable();
    let mut word = String::new();
    let mut word_follows_dot = false;

    // Flush the identifier token buffered so far. `at` is the byte offset
    // of the character that ended the word, used to look ahead for the
    // object-key guard.
    let flush =
        |w: &mut MinifiedWriter, word: &mut String, follows_dot: bool, at: usize, src: &str| {
            if word.is_empty() {
                return;
            }
            let shortened = match word.as_str() {
                "true" => "!0",
                "false" => "!1",
                _ => word.as_str(),
            };
            let is_property = follows_dot || next_nonspace(src, at) == Some(':');
            if shortened.len() < word.len() && !is_property {
                w.push_verbatim(shortened);
            } else {
                w.push_verbatim(word.as_str());
            }
            word.clear();
        };

    while let Some((idx, c)) = iter.next() {
        match c {
            '/' => match iter.peek() {
                Some(&(_, '/')) => {
                    flush(&mut w, &mut word, word_follows_dot, idx, js);
                    for (_, n) in iter.by_ref() {
                        if n == '\n' {
                            break;
                        }
                    }
                    w.space();
                }
                Some(&(_, '*')) => {
                    flush(&mut w, &mut word, word_follows_dot, idx, js);
                    iter.next();
                    let mut prev = ' ';
                    for (_, n) in iter.by_ref() {
                        if prev == '*' && n == '/' {
                            break;
                        }
                        prev = n;
                    }
                    w.space();
                }
                _ => {
                    flush(&mut w, &mut word, word_follows_dot, idx, js);
                    w.push_punct('/');
                }
            },
            '"' | '\'' | '`' => {
                flush(&mut w, &mut word, word_follows_dot, idx, js);
                let mut literal = String::new();
                literal.push(c);
                let mut escaped = false;
                for (_, n) in iter.by_ref() {
                    literal.push(n);
                    if escaped {
                        escaped = false;
                    } else if n == '\\' {
                        escaped = true;
                    } else if n == c {
                        break;
                    }
                }
                w.push_verbatim(&literal);
            }
            _ if c.is_whitespace() => {
                flush(&mut w, &mut word, word_follows_dot, idx, js);
                w.space();
            }
            _ if is_ident_char(c) => {
                if word.is_empty() {
                    word_follows_dot = !w.pending_space && w.last_char() == Some('.');
                }
                word.push(c);
            }
            _ => {
                flush(&mut w, &mut word, word_follows_dot, idx, js);
                w.push_punct(c);
            }
        }
    }
    flush(&mut w, &mut word, word_follows_dot, js.len(), js);

    w.out.trim().to_owned()
}

/// Whitespace/token-collapse rule for scripts.
pub struct JsMinifyRule;

impl Rule for JsMinifyRule {
    fn name(&self) -> &'static str {
        "js-minify"
    }

    fn apply(&self, text: &str) -> Outcome {
        let minified = minify_js(text);
        if minified == text {
            return Outcome::Unchanged;
        }
        let description = format!(
            "minified script: {} -> {} bytes",
            text.len(),
            minified.len()
        );
        Outcome::changed(minified, description)
    }
}
