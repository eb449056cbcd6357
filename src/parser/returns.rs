use std::sync::LazyLock;

use regex::{Captures, Regex};
use scraper::{ElementRef, Html};
use tracing::debug;

use super::blocks::collapse;
use super::types::TypeContext;
use crate::error::SchemaError;
use crate::schema::{TypeAlt, TypeRef};

const HREF: &str = r#"<a href="[^"]*?#(?P<anchor>[^"]*)">(?P<object>.*?)</a>"#;
const EM: &str = r"<em>(?P<simple>.*?)</em>";

/// Known phrasings of the return sentence, tried in order.
const PHRASES: &[&str] = &[
    r"An (?P<array>Array) of {href} objects is returned",
    r"Returns {em} on success",
    r"Returns the new invite link as {em} on success",
    r"Returns a {href}(?: object)?(?: on success)?\.",
    r"Returns the uploaded {href} on success",
    r"On success, the sent {href} is returned",
    r"On success, an (?P<array>array) of the sent {href} is returned",
    r"On success, if the edited message was sent by the bot, the edited {href} is returned, otherwise {em} is returned",
    r"On success, if the message was sent by the bot, the sent {href} is returned, otherwise {em} is returned",
    r"On success, a {href} object is returned",
    r"On success, returns an (?P<array>Array) of {href} objects",
    r"On success, {em} is returned",
    r"On success, if edited message is sent by the bot, the edited {href} is returned, otherwise {em} is returned",
    r"On success, the stopped {href} with the final results is returned",
    r"On success, (?P<simple>True) is returned",
    r"On success, if the message was sent by the bot, returns the edited {href}, otherwise returns {em}\. Returns an error",
    r"On success, returns an <em>(?P<array>Array)</em> of {href} objects",
];

static TEMPLATES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    PHRASES
        .iter()
        .map(|p| Regex::new(&p.replace("{href}", HREF).replace("{em}", EM)).unwrap())
        .collect()
});

/// One way of reading a return type out of a method description.
pub trait ReturnMatcher {
    fn name(&self) -> &str;

    /// Every alternative this matcher recognizes; empty when it does not apply.
    fn extract(&self, description: &str, ctx: &TypeContext) -> Vec<TypeAlt>;
}

/// Ordered matchers; the first one that yields anything decides.
pub struct ReturnExtractor {
    matchers: Vec<Box<dyn ReturnMatcher>>,
}

impl Default for ReturnExtractor {
    fn default() -> Self {
        let mut extractor = ReturnExtractor::empty();
        for (i, re) in TEMPLATES.iter().enumerate() {
            extractor = extractor.with(PhraseTemplate {
                name: format!("phrase_{}", i + 1),
                re,
            });
        }
        extractor.with(ScopedCandidates)
    }
}

impl ReturnExtractor {
    pub fn empty() -> Self {
        ReturnExtractor {
            matchers: Vec::new(),
        }
    }

    pub fn with(mut self, matcher: impl ReturnMatcher + 'static) -> Self {
        self.matchers.push(Box::new(matcher));
        self
    }

    pub fn extract(
        &self,
        method: &str,
        description: &str,
        ctx: &TypeContext,
    ) -> Result<TypeRef, SchemaError> {
        for matcher in &self.matchers {
            let alternatives = matcher.extract(description, ctx);
            if let Some(type_ref) = TypeRef::from_alternatives(alternatives) {
                debug!(
                    method,
                    matcher = matcher.name(),
                    alternatives = type_ref.alternatives().len(),
                    "Return type matched"
                );
                return Ok(type_ref);
            }
        }
        Err(SchemaError::NoReturnType {
            method: method.to_string(),
        })
    }
}

/// A fixed documentation phrasing matched against the raw description HTML.
pub struct PhraseTemplate {
    name: String,
    re: &'static Regex,
}

impl ReturnMatcher for PhraseTemplate {
    fn name(&self) -> &str {
        &self.name
    }

    fn extract(&self, description: &str, ctx: &TypeContext) -> Vec<TypeAlt> {
        let Some(caps) = self.re.captures(description) else {
            return Vec::new();
        };
        let collection = caps.name("array").is_some();

        let mut alternatives = Vec::new();
        if let Some(object) = caps.name("object") {
            alternatives.extend(link_alternatives(object.as_str(), anchor(&caps), ctx));
        }
        if let Some(simple) = caps.name("simple") {
            alternatives.extend(
                ctx.parse(&ucfirst(simple.as_str()))
                    .map(TypeRef::into_alternatives)
                    .unwrap_or_default(),
            );
        }
        alternatives
            .into_iter()
            .map(|alt| if collection { alt.into_collection() } else { alt })
            .collect()
    }
}

fn anchor<'h>(caps: &Captures<'h>) -> Option<&'h str> {
    caps.name("anchor").map(|m| m.as_str())
}

/// Catch-all: every link and emphasis after the first "Return" / "On success".
pub struct ScopedCandidates;

struct Candidate {
    start: usize,
    end: usize,
    text: String,
    /// `None` for `<em>`.
    anchor: Option<String>,
    is_link: bool,
}

impl ReturnMatcher for ScopedCandidates {
    fn name(&self) -> &str {
        "scoped_candidates"
    }

    fn extract(&self, description: &str, ctx: &TypeContext) -> Vec<TypeAlt> {
        let fragment = Html::parse_fragment(description);
        let mut text = String::new();
        let mut candidates = Vec::new();

        for node in fragment.root_element().descendants() {
            if let Some(t) = node.value().as_text() {
                text.push_str(t);
                continue;
            }
            let Some(el) = ElementRef::wrap(node) else {
                continue;
            };
            let attrs = el.value();
            // anchor targets (`<a name=..>`) are not references
            let is_link = match attrs.name() {
                "a" if attrs.attr("href").is_some() && attrs.attr("name").is_none() => true,
                "em" => false,
                _ => continue,
            };
            let raw: String = el.text().collect();
            candidates.push(Candidate {
                start: text.len(),
                end: text.len() + raw.len(),
                text: collapse(el.text()),
                anchor: attrs
                    .attr("href")
                    .and_then(|h| h.rsplit_once('#'))
                    .map(|(_, a)| a.to_string()),
                is_link,
            });
        }

        let Some(scope) = scope_start(&text) else {
            return Vec::new();
        };

        let mut alternatives = Vec::new();
        for c in candidates.iter().filter(|c| c.start >= scope) {
            let after = text[c.end..].trim_start().to_ascii_lowercase();
            if c.text.eq_ignore_ascii_case("array") && after.starts_with("of ") {
                continue;
            }
            let before = text[scope..c.start].trim_end().to_ascii_lowercase();
            let collection = before.ends_with("array of") || before.ends_with("arrays of");

            let found = if c.is_link {
                link_alternatives(&c.text, c.anchor.as_deref(), ctx)
            } else {
                ctx.parse(&ucfirst(&c.text))
                    .map(TypeRef::into_alternatives)
                    .unwrap_or_default()
            };
            alternatives.extend(
                found
                    .into_iter()
                    .map(|alt| if collection { alt.into_collection() } else { alt }),
            );
        }
        alternatives
    }
}

/// Byte offset of the earlier of the first "return" (any case) and "On success".
fn scope_start(text: &str) -> Option<usize> {
    let returns = text.to_ascii_lowercase().find("return");
    let on_success = text.find("On success");
    match (returns, on_success) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, b) => a.or(b),
    }
}

/// Link text names the type, unless it disagrees with the anchor
/// ("Messages" → `#message`), in which case the anchor does.
fn link_alternatives(text: &str, anchor: Option<&str>, ctx: &TypeContext) -> Vec<TypeAlt> {
    let by_anchor = anchor
        .filter(|a| !a.eq_ignore_ascii_case(text))
        .and_then(|a| ctx.object_for_anchor(a));
    let name = match by_anchor {
        Some(name) => name.to_string(),
        None => ucfirst(text),
    };
    ctx.parse(&name)
        .map(TypeRef::into_alternatives)
        .unwrap_or_default()
}

fn ucfirst(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Primitive;

    fn ctx() -> TypeContext {
        let mut ctx = TypeContext::default();
        for name in ["Message", "User", "Update", "Poll", "File", "ChatInviteLink"] {
            ctx.register_object(name);
        }
        ctx
    }

    fn extract(description: &str) -> Result<Vec<TypeAlt>, SchemaError> {
        ReturnExtractor::default()
            .extract("method", description, &ctx())
            .map(TypeRef::into_alternatives)
    }

    fn message() -> TypeAlt {
        TypeAlt::reference("Message")
    }

    #[test]
    fn sent_message() {
        let alts = extract(r##"On success, the sent <a href="#message">Message</a> is returned."##).unwrap();
        assert_eq!(alts, vec![message()]);
    }

    #[test]
    fn simple_emphasis() {
        let alts = extract("Use this method to kick. Returns <em>True</em> on success.").unwrap();
        assert_eq!(alts, vec![TypeAlt::primitive(Primitive::Bool)]);
        let alts = extract("On success, <em>Int</em> is returned.").unwrap();
        assert_eq!(alts, vec![TypeAlt::primitive(Primitive::Int)]);
    }

    #[test]
    fn array_templates_mark_collections() {
        let alts = extract(r##"An Array of <a href="#update">Update</a> objects is returned."##).unwrap();
        assert_eq!(alts, vec![TypeAlt::reference("Update").into_collection()]);
        let alts = extract(r##"On success, returns an <em>Array</em> of <a href="#user">User</a> objects."##).unwrap();
        assert_eq!(alts, vec![TypeAlt::reference("User").into_collection()]);
    }

    #[test]
    fn edited_message_or_true() {
        let alts = extract(
            r##"On success, if the edited message was sent by the bot, the edited <a href="#message">Message</a> is returned, otherwise <em>True</em> is returned."##,
        )
        .unwrap();
        assert_eq!(alts, vec![message(), TypeAlt::primitive(Primitive::Bool)]);
    }

    #[test]
    fn link_text_disagreeing_with_anchor_uses_anchor() {
        let alts = extract(r##"On success, an array of the sent <a href="#message">Messages</a> is returned."##).unwrap();
        assert_eq!(alts, vec![message().into_collection()]);
    }

    #[test]
    fn absolute_documentation_links_resolve() {
        let alts = extract(
            r#"Returns the uploaded <a href="https://core.telegram.org/bots/api#file">File</a> on success."#,
        )
        .unwrap();
        assert_eq!(alts, vec![TypeAlt::reference("File")]);
    }

    #[test]
    fn scoped_scan_catches_unknown_phrasing() {
        let description = r##"Use this method to get basic info. Returns basic information about the bot in form of a <a href="#user">User</a> object."##;
        let alts = ScopedCandidates.extract(description, &ctx());
        assert_eq!(alts, vec![TypeAlt::reference("User")]);
        assert_eq!(extract(description).unwrap(), alts);
    }

    #[test]
    fn scoped_scan_ignores_text_before_scope_and_bad_candidates() {
        let description = r##"Send a <a href="#poll">Poll</a> using <a href="#formatting-options">formatting options</a>.
            On success, the freshly created <a href="#message">Message</a> or <em>Nothing</em> comes back."##;
        let alts = ScopedCandidates.extract(description, &ctx());
        assert_eq!(alts, vec![message()]);
    }

    #[test]
    fn scoped_scan_detects_arrays() {
        let description = r##"Returns an <em>Array</em> of <a href="#chatinvitelink">ChatInviteLink</a> entries for the chat."##;
        let alts = ScopedCandidates.extract(description, &ctx());
        assert_eq!(alts, vec![TypeAlt::reference("ChatInviteLink").into_collection()]);
    }

    #[test]
    fn scoped_scan_skips_anchor_targets() {
        let description = r##"Returns <a name="ret"></a><em>True</em>."##;
        let alts = ScopedCandidates.extract(description, &ctx());
        assert_eq!(alts, vec![TypeAlt::primitive(Primitive::Bool)]);
    }

    #[test]
    fn nothing_recognized_fails() {
        let err = extract("Use this method to do something mysterious.").unwrap_err();
        assert!(matches!(err, SchemaError::NoReturnType { ref method } if method == "method"));
        let err = extract(r##"On success, the sent <a href="#widget">Widget</a> is returned."##).unwrap_err();
        assert!(matches!(err, SchemaError::NoReturnType { .. }));
    }

    #[test]
    fn custom_matchers_run_in_order() {
        struct AlwaysPoll;
        impl ReturnMatcher for AlwaysPoll {
            fn name(&self) -> &str {
                "always_poll"
            }
            fn extract(&self, _: &str, ctx: &TypeContext) -> Vec<TypeAlt> {
                ctx.reference("Poll").into_iter().collect()
            }
        }

        let extractor = ReturnExtractor::empty().with(AlwaysPoll).with(ScopedCandidates);
        let t = extractor
            .extract("stopPoll", r##"On success, the sent <a href="#message">Message</a> is returned."##, &ctx())
            .unwrap();
        assert_eq!(t.alternatives(), &[TypeAlt::reference("Poll")]);
    }

    #[test]
    fn scope_starts_at_earliest_marker() {
        assert_eq!(scope_start("On success, Returns"), Some(0));
        assert_eq!(scope_start("x RETURNS y. On success"), Some(2));
        assert_eq!(scope_start("nothing here"), None);
    }
}
