//! `{{ name }}` placeholder substitution.
//!
//! The scanner is a two-state machine (literal text / inside a placeholder)
//! that visits every byte once. Placeholder delimiters are ASCII, so every
//! split point is a char boundary.
//!
//! # Failure Modes
//!
//! | Input | Behavior |
//! |-------|----------|
//! | `{{ name }}` with no binding | Placeholder left as-is, `name` reported in `missing` |
//! | Unclosed `{{` | Emitted literally |
//! | `{{ {{ name }}` | Outer `{{ ` literal, inner placeholder substituted |
//! | `{{ not a name }}`, `{{}}` | Emitted literally, not reported |
//! | Unreferenced binding | Ignored |

use std::borrow::Cow;
use std::collections::HashMap;
use std::hash::BuildHasher;

/// Anything that can supply a textual value for a placeholder name.
pub trait VarSource {
    fn lookup(&self, name: &str) -> Option<Cow<'_, str>>;
}

impl<S: BuildHasher> VarSource for HashMap<String, String, S> {
    fn lookup(&self, name: &str) -> Option<Cow<'_, str>> {
        self.get(name).map(|v| Cow::Borrowed(v.as_str()))
    }
}

impl VarSource for [(&str, &str)] {
    fn lookup(&self, name: &str) -> Option<Cow<'_, str>> {
        self.iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| Cow::Borrowed(*value))
    }
}

impl<const N: usize> VarSource for [(&str, &str); N] {
    fn lookup(&self, name: &str) -> Option<Cow<'_, str>> {
        self.as_slice().lookup(name)
    }
}

/// Result of rendering one template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interpolated {
    /// Rendered text; unresolved placeholders appear verbatim.
    pub text: String,
    /// Names without a binding, unique, in order of first appearance.
    pub missing: Vec<String>,
}

impl Interpolated {
    /// True when every placeholder was bound.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}

/// Substitute every well-formed `{{ name }}` in `template` from `vars`.
pub fn interpolate<V: VarSource + ?Sized>(template: &str, vars: &V) -> Interpolated {
    let mut text = String::with_capacity(template.len());
    let mut missing: Vec<String> = Vec::new();

    scan(template, |segment| match segment {
        Segment::Literal(s) => text.push_str(s),
        Segment::Placeholder { raw, name } => match vars.lookup(name) {
            Some(value) => text.push_str(&value),
            None => {
                text.push_str(raw);
                if !missing.iter().any(|m| m == name) {
                    missing.push(name.to_string());
                }
            }
        },
    });

    Interpolated { text, missing }
}

/// Names of all well-formed placeholders in `template`, unique, in order.
#[must_use]
pub fn placeholder_names(template: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    scan(template, |segment| {
        if let Segment::Placeholder { name, .. } = segment {
            if !names.iter().any(|n| n == name) {
                names.push(name.to_string());
            }
        }
    });
    names
}

/// Whether `name` matches `[A-Za-z_][A-Za-z0-9_]*`.
#[must_use]
pub fn is_identifier(name: &str) -> bool {
    let mut bytes = name.bytes();
    match bytes.next() {
        Some(b) if b.is_ascii_alphabetic() || b == b'_' => {}
        _ => return false,
    }
    bytes.all(|b| b.is_ascii_alphanumeric() || b == b'_')
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Segment<'a> {
    Literal(&'a str),
    Placeholder { raw: &'a str, name: &'a str },
}

#[derive(Debug, Clone, Copy)]
enum State {
    Literal { start: usize },
    Placeholder { open: usize },
}

fn scan<'a>(template: &'a str, mut visit: impl FnMut(Segment<'a>)) {
    let bytes = template.as_bytes();
    let is_pair = |i: usize, b: u8| bytes[i] == b && bytes.get(i + 1) == Some(&b);

    let mut state = State::Literal { start: 0 };
    let mut i = 0;

    while i < bytes.len() {
        match state {
            State::Literal { start } => {
                if is_pair(i, b'{') {
                    // In a run like `{{{`, the placeholder opens at the last pair.
                    if bytes.get(i + 2) == Some(&b'{') {
                        i += 1;
                        continue;
                    }
                    if start < i {
                        visit(Segment::Literal(&template[start..i]));
                    }
                    state = State::Placeholder { open: i };
                    i += 2;
                    continue;
                }
            }
            State::Placeholder { open } => {
                if is_pair(i, b'{') {
                    visit(Segment::Literal(&template[open..i]));
                    state = State::Placeholder { open: i };
                    i += 2;
                    continue;
                }
                if is_pair(i, b'}') {
                    let raw = &template[open..i + 2];
                    let name = template[open + 2..i].trim();
                    if is_identifier(name) {
                        visit(Segment::Placeholder { raw, name });
                    } else {
                        visit(Segment::Literal(raw));
                    }
                    state = State::Literal { start: i + 2 };
                    i += 2;
                    continue;
                }
            }
        }
        i += 1;
    }

    let tail = match state {
        State::Literal { start } => &template[start..],
        State::Placeholder { open } => &template[open..],
    };
    if !tail.is_empty() {
        visit(Segment::Literal(tail));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(template: &str, vars: &[(&str, &str)]) -> Interpolated {
        interpolate(template, vars)
    }

    #[test]
    fn substitutes_with_and_without_spaces() {
        let vars = [("interval", "5"), ("version", "2.1")];
        assert_eq!(render("{{interval}} minutes ago", &vars).text, "5 minutes ago");
        assert_eq!(render("Updating to {{ version }}", &vars).text, "Updating to 2.1");
        assert_eq!(render("{{   version\t}}", &vars).text, "2.1");
    }

    #[test]
    fn missing_binding_is_left_and_reported() {
        let out = render("You are about to update to the version {{ version }}", &[]);
        assert_eq!(out.text, "You are about to update to the version {{ version }}");
        assert_eq!(out.missing, vec!["version"]);
        assert!(!out.is_complete());
    }

    #[test]
    fn missing_names_are_unique_and_ordered() {
        let out = render("{{ b }} {{a}} {{ b }}", &[]);
        assert_eq!(out.missing, vec!["b", "a"]);
        assert_eq!(out.text, "{{ b }} {{a}} {{ b }}");
    }

    #[test]
    fn repeated_placeholder() {
        assert_eq!(render("{{x}} and {{ x }}", &[("x", "A")]).text, "A and A");
    }

    #[test]
    fn extra_bindings_are_ignored() {
        let out = render("Quit", &[("version", "1"), ("unused", "2")]);
        assert_eq!(out.text, "Quit");
        assert!(out.is_complete());
    }

    #[test]
    fn malformed_syntax_is_literal() {
        // Unclosed
        assert_eq!(render("Hello {{ name", &[("name", "x")]).text, "Hello {{ name");
        // Empty
        assert_eq!(render("Hello {{}}", &[]).text, "Hello {{}}");
        assert_eq!(render("Hello {{  }}", &[]).missing, Vec::<String>::new());
        // Not an identifier
        assert_eq!(render("{{ 1abc }}", &[("1abc", "x")]).text, "{{ 1abc }}");
        assert_eq!(render("{{ a b }}", &[]).text, "{{ a b }}");
        // Single braces are plain text
        assert_eq!(render("{name} }}", &[("name", "x")]).text, "{name} }}");
        // Lone closers
        assert_eq!(render("}} {{ x }}", &[("x", "1")]).text, "}} 1");
    }

    #[test]
    fn nested_open_restarts_placeholder() {
        let out = render("{{ {{ name }}", &[("name", "Ann")]);
        assert_eq!(out.text, "{{ Ann");
    }

    #[test]
    fn triple_braces_keep_outer_braces() {
        let out = render("{{{ name }}}", &[("name", "Ann")]);
        assert_eq!(out.text, "{Ann}");
    }

    #[test]
    fn non_ascii_text_survives() {
        let out = render("Dernière synchronisation: {{ date }} — ok", &[("date", "hier")]);
        assert_eq!(out.text, "Dernière synchronisation: hier — ok");
    }

    #[test]
    fn hashmap_source() {
        let mut vars = HashMap::new();
        vars.insert("error_files".to_string(), "2".to_string());
        assert_eq!(interpolate("{{ error_files }} errors", &vars).text, "2 errors");
    }

    #[test]
    fn placeholder_name_listing() {
        assert_eq!(
            placeholder_names("{{ a }} {{b}} {{ a }} {{ 9 }} {{ c"),
            vec!["a", "b"]
        );
        assert!(placeholder_names("%d/%m/%Y %H:%M").is_empty());
    }

    #[test]
    fn identifier_rules() {
        assert!(is_identifier("conflicted_files"));
        assert!(is_identifier("_x1"));
        assert!(!is_identifier(""));
        assert!(!is_identifier("1x"));
        assert!(!is_identifier("a-b"));
        assert!(!is_identifier("é"));
    }
}
