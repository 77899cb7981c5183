//! Ordered regex substitutions applied to every copied file.

use std::borrow::Cow;
use std::path::Path;
use std::sync::OnceLock;

use regex::{Captures, NoExpand, Regex, Replacer};
use serde_json::{Map, Value};

use crate::error::{PackagerError, PackagerResult};
use crate::transform::stamp::read_stamp_value;

/// Matches `# BEGIN-INTERNAL` / `// BEGIN-INTERNAL` through the last `END-INTERNAL`.
const INTERNAL_BLOCK_PATTERN: &str = r"(#|//)\s+BEGIN-INTERNAL[\w\W]+END-INTERNAL";

fn internal_block_regex() -> &'static Regex {
  static PATTERN: OnceLock<Regex> = OnceLock::new();
  PATTERN.get_or_init(|| Regex::new(INTERNAL_BLOCK_PATTERN).expect("invalid internal block regex"))
}

/// How the replacement text of a rule is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Substitution {
  /// `$1`..`$99`, `$&` and `$$` expand; any other `$` is kept as written.
  Expand,
  /// The replacement is inserted verbatim.
  Literal,
}

/// A single pattern and the text every match is replaced with.
#[derive(Debug, Clone)]
pub struct ReplacementRule {
  pattern: Regex,
  replacement: String,
  substitution: Substitution,
}

impl ReplacementRule {
  /// Compile a rule whose replacement may reference capture groups.
  pub fn new(pattern: &str, replacement: impl Into<String>) -> PackagerResult<Self> {
    let pattern = Regex::new(pattern).map_err(|source| PackagerError::InvalidPattern {
      pattern: pattern.to_string(),
      source,
    })?;
    Ok(Self::from_regex(pattern, replacement, Substitution::Expand))
  }

  /// Rule replacing every occurrence of `token` with `value`, both taken literally.
  pub fn literal(token: &str, value: impl Into<String>) -> PackagerResult<Self> {
    let rule = Self::new(&regex::escape(token), value)?;
    Ok(Self {
      substitution: Substitution::Literal,
      ..rule
    })
  }

  fn from_regex(pattern: Regex, replacement: impl Into<String>, substitution: Substitution) -> Self {
    Self {
      pattern,
      replacement: replacement.into(),
      substitution,
    }
  }

  /// Pattern source text.
  pub fn pattern(&self) -> &str {
    self.pattern.as_str()
  }

  /// Replacement text.
  pub fn replacement(&self) -> &str {
    &self.replacement
  }

  /// Replace every match in `content`.
  pub fn apply<'c>(&self, content: &'c str) -> Cow<'c, str> {
    match self.substitution {
      Substitution::Expand => self
        .pattern
        .replace_all(content, CaptureTemplate(&self.replacement)),
      Substitution::Literal => self
        .pattern
        .replace_all(content, NoExpand(self.replacement.as_str())),
    }
  }
}

/// Replacement text referencing the match through `$n`, `$&` and `$$`.
struct CaptureTemplate<'r>(&'r str);

impl Replacer for CaptureTemplate<'_> {
  fn replace_append(&mut self, caps: &Captures<'_>, dst: &mut String) {
    expand_template(self.0, caps, dst);
  }
}

/// Append `template` to `dst`, substituting group references.
///
/// A two-digit reference wins when that group exists, otherwise the first digit names the group.
/// References to groups the pattern does not have, `${..}` and any other `$` stay literal.
fn expand_template(template: &str, caps: &Captures<'_>, dst: &mut String) {
  let group_text = |group: usize| caps.get(group).map_or("", |m| m.as_str());
  let mut rest = template;

  while let Some(index) = rest.find('$') {
    dst.push_str(&rest[..index]);
    let after = &rest[index + 1..];
    let bytes = after.as_bytes();

    match bytes.first() {
      Some(b'$') => {
        dst.push('$');
        rest = &after[1..];
      }
      Some(b'&') => {
        dst.push_str(group_text(0));
        rest = &after[1..];
      }
      Some(digit) if digit.is_ascii_digit() => {
        let one = usize::from(digit - b'0');
        let two = bytes
          .get(1)
          .filter(|next| next.is_ascii_digit())
          .map(|next| one * 10 + usize::from(next - b'0'))
          .filter(|&group| group >= 1 && group < caps.len());

        if let Some(group) = two {
          dst.push_str(group_text(group));
          rest = &after[2..];
        } else if one >= 1 && one < caps.len() {
          dst.push_str(group_text(one));
          rest = &after[1..];
        } else {
          dst.push('$');
          rest = after;
        }
      }
      _ => {
        dst.push('$');
        rest = after;
      }
    }
  }

  dst.push_str(rest);
}

/// Immutable, ordered list of replacement rules.
#[derive(Debug, Clone)]
pub struct ReplacementPipeline {
  rules: Vec<ReplacementRule>,
}

impl ReplacementPipeline {
  /// Assemble the pipeline from its three sources, in order.
  ///
  /// The internal block stripper always runs first. When `stamp` names a stamp file containing
  /// `version_key`, the placeholder is replaced with that version next. Caller replacements from
  /// `raw_replacements` (a JSON object of pattern to replacement) follow in key order.
  pub fn build(
    stamp: Option<(&Path, &str)>,
    version_placeholder: &str,
    raw_replacements: &str,
  ) -> PackagerResult<Self> {
    let mut rules = vec![Self::internal_block_rule()];

    if let Some((stamp_file, version_key)) = stamp {
      match read_stamp_value(stamp_file, version_key)? {
        Some(version) => {
          tracing::debug!(stamp = %stamp_file.display(), %version, "stamping package version");
          rules.push(ReplacementRule::literal(version_placeholder, version)?);
        }
        None => tracing::warn!(
          stamp = %stamp_file.display(),
          key = version_key,
          "stamp file has no version, skipping stamping"
        ),
      }
    }

    rules.extend(parse_replacements(raw_replacements)?);
    Ok(Self { rules })
  }

  /// Pipeline from explicit rules, used by callers that do not read a parameter file.
  pub fn from_rules(rules: Vec<ReplacementRule>) -> Self {
    Self { rules }
  }

  /// Rule removing `BEGIN-INTERNAL` ... `END-INTERNAL` comment blocks.
  pub fn internal_block_rule() -> ReplacementRule {
    ReplacementRule::from_regex(internal_block_regex().clone(), "", Substitution::Literal)
  }

  /// Rules in application order.
  pub fn rules(&self) -> &[ReplacementRule] {
    &self.rules
  }

  /// Fold `content` through every rule; each rule sees the previous rule's output.
  pub fn apply(&self, content: &str) -> String {
    let mut current = content.to_string();
    for rule in &self.rules {
      let replaced = match rule.apply(&current) {
        Cow::Borrowed(_) => None,
        Cow::Owned(replaced) => Some(replaced),
      };
      if let Some(replaced) = replaced {
        current = replaced;
      }
    }
    current
  }
}

/// Decode the caller's JSON replacement object, keeping key order.
pub fn parse_replacements(raw: &str) -> PackagerResult<Vec<ReplacementRule>> {
  let raw = raw.trim();
  if raw.is_empty() {
    return Ok(Vec::new());
  }

  let map: Map<String, Value> = serde_json::from_str(raw)
    .map_err(|err| PackagerError::parameter("replacements", err.to_string()))?;

  map
    .into_iter()
    .map(|(pattern, value)| match value {
      Value::String(replacement) => ReplacementRule::new(&pattern, replacement),
      other => Err(PackagerError::parameter(
        "replacements",
        format!("value for `{}` must be a string, found {}", pattern, other),
      )),
    })
    .collect()
}
