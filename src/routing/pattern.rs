//! Route template compilation.
//!
//! # Responsibilities
//! - Wrap a user template into a slash-delimited body (`about` → `/about/`)
//! - Fold the separator in front of an optional group into an optional slash
//! - Prepend the language prefix and anchor the result
//! - Reverse a template into a concrete path for URL generation
//!
//! # Design Decisions
//! - Templates are regular expressions; only grouping syntax is inspected
//! - Parenthesis matching skips escapes and character classes
//! - Invalid patterns fail here, at registration, never at match time

use regex::{Regex, RegexBuilder};

use crate::routing::error::{RouteError, RouteResult};

/// Steps 1 and 2 of compilation: trim slashes and wrap the template.
///
/// The empty template is the home route and becomes `/`.
pub fn wrap_template(template: &str) -> String {
    let trimmed = template.trim_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        format!("/{}/", trimmed)
    }
}

/// Expands a template into its unanchored pattern body.
///
/// `/([a-z]+)?/reviews/` expands to `/?([a-z]+)?/reviews/`, so that
/// `/reviews/` still matches when the optional segment is left out.
pub fn expand_template(template: &str) -> String {
    fold_optional_slashes(&wrap_template(template))
}

/// Compiles a template into an anchored pattern.
///
/// `prefix` is the literal language prefix (e.g. `/es`) when one applies.
pub fn compile_pattern(
    template: &str,
    prefix: Option<&str>,
    case_insensitive: bool,
) -> RouteResult<Regex> {
    let body = expand_template(template);
    let source = format!("^{}{}$", prefix.unwrap_or(""), body);

    RegexBuilder::new(&source)
        .case_insensitive(case_insensitive)
        .build()
        .map_err(|source| RouteError::InvalidRoutePattern {
            template: template.to_string(),
            source,
        })
}

/// Replaces every `/` directly in front of an optional group with `/?`.
///
/// Optional groups that do not follow a separator are left alone.
pub fn fold_optional_slashes(body: &str) -> String {
    let bytes = body.as_bytes();
    let scan = Scan::of(body);

    let mut out = String::with_capacity(body.len() + 4);
    let mut copied = 0;
    for &slash in &scan.slashes {
        let folds = scan
            .groups
            .iter()
            .any(|g| g.open == slash + 1 && g.is_optional(bytes));
        if folds {
            out.push_str(&body[copied..=slash]);
            out.push('?');
            copied = slash + 1;
        }
    }
    out.push_str(&body[copied..]);
    out
}

/// Substitutes positional parameters into a template.
///
/// Each capturing group consumes the next parameter; capturing groups
/// nested inside it are skipped so indices line up with match results.
/// Non-capturing groups are written out without their `?:` or flag
/// prefix, and quantifiers are dropped, so each group appears once.
/// An absent value for a group that may be empty drops the group along
/// with the separator folded in front of it. An optional non-capturing
/// group is kept only when one of the captures inside it has a value.
///
/// On failure, returns the index of the first required parameter that had
/// no value.
pub fn fill_template(template: &str, params: &[Option<&str>]) -> Result<String, usize> {
    let body = wrap_template(template);
    let scan = Scan::of(&body);

    let mut filler = Filler {
        body: &body,
        scan: &scan,
        params,
        index: 0,
        out: String::with_capacity(body.len()),
    };
    filler.fill(0, body.len(), 0)?;

    let mut out = filler.out;
    if !out.starts_with('/') {
        out.insert(0, '/');
    }
    Ok(out)
}

/// Walks a template body, writing the path for one set of parameters.
struct Filler<'a> {
    body: &'a str,
    scan: &'a Scan,
    params: &'a [Option<&'a str>],
    index: usize,
    out: String,
}

impl Filler<'_> {
    /// Fills `body[start..end]`, whose direct child groups sit at `depth`.
    fn fill(&mut self, start: usize, end: usize, depth: usize) -> Result<(), usize> {
        let body = self.body;
        let bytes = body.as_bytes();
        let children: Vec<Group> = self
            .scan
            .groups
            .iter()
            .filter(|g| g.depth == depth && g.open >= start && g.close < end)
            .copied()
            .collect();

        let mut cursor = start;
        for group in children {
            push_literal(&mut self.out, &body[cursor..group.open]);
            let nested = self.scan.capturing_within(&group);

            if group.capturing {
                let own = self.index;
                self.index += 1 + nested;
                match self.params.get(own).copied().flatten() {
                    Some(value) => self.out.push_str(value),
                    None if group.may_be_empty(bytes) => self.drop_separator(&group),
                    None => return Err(own),
                }
            } else if group.may_be_empty(bytes) && !self.has_values(self.index, nested) {
                self.index += nested;
                self.drop_separator(&group);
            } else {
                self.fill(group.body_start(bytes), group.close, depth + 1)?;
            }

            cursor = group.quantifier_end(bytes);
        }
        push_literal(&mut self.out, &body[cursor.min(end)..end]);
        Ok(())
    }

    fn has_values(&self, from: usize, count: usize) -> bool {
        self.params
            .iter()
            .skip(from)
            .take(count)
            .any(Option::is_some)
    }

    /// Removes the `/` that was folded into an omitted optional group.
    fn drop_separator(&mut self, group: &Group) {
        let bytes = self.body.as_bytes();
        let folded = group.is_optional(bytes) && group.open > 0 && bytes[group.open - 1] == b'/';
        if folded && self.out.ends_with('/') {
            self.out.pop();
        }
    }
}

/// Copies pattern text, dropping the backslash of escape sequences.
fn push_literal(out: &mut String, text: &str) {
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(escaped) = chars.next() {
                out.push(escaped);
            }
        } else {
            out.push(c);
        }
    }
}

/// A balanced parenthesized group, by byte offsets of its parentheses.
#[derive(Debug, Clone, Copy)]
struct Group {
    open: usize,
    close: usize,
    depth: usize,
    capturing: bool,
}

impl Group {
    /// Quantified by `?` (greedy or lazy); the groups that get a folded slash.
    fn is_optional(&self, bytes: &[u8]) -> bool {
        bytes.get(self.close + 1) == Some(&b'?')
    }

    /// Quantified so that zero repetitions match.
    fn may_be_empty(&self, bytes: &[u8]) -> bool {
        match bytes.get(self.close + 1).copied() {
            Some(b'?') | Some(b'*') => true,
            Some(b'{') => matches!(bytes.get(self.close + 2).copied(), Some(b'0') | Some(b',')),
            _ => false,
        }
    }

    /// Offset just past the group and its quantifier, lazy marker included.
    fn quantifier_end(&self, bytes: &[u8]) -> usize {
        let at = self.close + 1;
        let end = match bytes.get(at).copied() {
            Some(b'?') | Some(b'*') | Some(b'+') => at + 1,
            Some(b'{') => bytes[at..]
                .iter()
                .position(|&b| b == b'}')
                .map_or(at, |k| at + k + 1),
            _ => return at,
        };
        if bytes.get(end) == Some(&b'?') {
            end + 1
        } else {
            end
        }
    }

    /// Offset of the group's content, past `?:`, `?P<name>` or flags.
    ///
    /// A bare flag group such as `(?i)` has no content.
    fn body_start(&self, bytes: &[u8]) -> usize {
        if bytes.get(self.open + 1) != Some(&b'?') {
            return self.open + 1;
        }
        let mut j = self.open + 2;
        while j < self.close && (bytes[j].is_ascii_alphabetic() || bytes[j] == b'-') {
            j += 1;
        }
        match bytes.get(j).copied() {
            Some(b':') => j + 1,
            Some(b'<') => bytes[j..self.close]
                .iter()
                .position(|&b| b == b'>')
                .map_or(self.close, |k| j + k + 1),
            _ => self.close,
        }
    }
}

/// Structural positions in a pattern body, outside escapes and classes.
#[derive(Debug, Default)]
struct Scan {
    groups: Vec<Group>,
    slashes: Vec<usize>,
}

impl Scan {
    fn of(body: &str) -> Self {
        let bytes = body.as_bytes();
        let mut scan = Scan::default();
        let mut stack: Vec<(usize, bool)> = Vec::new();

        let mut i = 0;
        while i < bytes.len() {
            match bytes[i] {
                b'\\' => {
                    i += 2;
                    continue;
                }
                b'[' => {
                    i = skip_class(bytes, i);
                    continue;
                }
                b'(' => stack.push((i, is_capturing(&bytes[i + 1..]))),
                b')' => {
                    // Unbalanced closers are left for the regex compiler to report.
                    if let Some((open, capturing)) = stack.pop() {
                        scan.groups.push(Group {
                            open,
                            close: i,
                            depth: stack.len(),
                            capturing,
                        });
                    }
                }
                b'/' => scan.slashes.push(i),
                _ => {}
            }
            i += 1;
        }

        scan.groups.sort_by_key(|g| g.open);
        scan
    }

    /// Number of capturing groups strictly inside `outer`.
    fn capturing_within(&self, outer: &Group) -> usize {
        self.groups
            .iter()
            .filter(|g| g.open > outer.open && g.close < outer.close && g.capturing)
            .count()
    }
}

/// Returns the offset just past the class starting at `start`.
fn skip_class(bytes: &[u8], start: usize) -> usize {
    let mut i = start + 1;
    if bytes.get(i) == Some(&b'^') {
        i += 1;
    }
    // A leading `]` is a literal member.
    if bytes.get(i) == Some(&b']') {
        i += 1;
    }
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b']' => return i + 1,
            _ => i += 1,
        }
    }
    bytes.len()
}

fn is_capturing(rest: &[u8]) -> bool {
    match rest {
        [b'?', b'P', b'<', ..] => true,
        [b'?', b'<', ..] => true,
        [b'?', ..] => false,
        _ => true,
    }
}
