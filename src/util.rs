//! Small utility helpers used across modules.

use rand::seq::SliceRandom;

/// Very small and safe string templating.
/// Replaces occurrences of `{key}` in the template with provided values.
pub fn fill_template(tpl: &str, pairs: &[(&str, &str)]) -> String {
  let mut out = tpl.to_string();
  for (k, v) in pairs {
    let needle = format!("{{{}}}", k);
    out = out.replace(&needle, v);
  }
  out
}

/// Random pick from a template list; empty lists yield an empty string.
pub fn pick<'a>(choices: &'a [String]) -> &'a str {
  choices.choose(&mut rand::thread_rng()).map(String::as_str).unwrap_or("")
}

/// Log-safe truncation for user-typed text.
pub fn trunc_for_log(s: &str, max: usize) -> String {
  if s.len() <= max {
    return s.to_string();
  }
  let mut cut = max;
  while !s.is_char_boundary(cut) {
    cut -= 1;
  }
  format!("{}… ({} bytes total)", &s[..cut], s.len())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn template_replaces_every_occurrence() {
    let out = fill_template("{topic} or {topic}? {count}", &[("topic", "Python"), ("count", "3")]);
    assert_eq!(out, "Python or Python? 3");
    assert_eq!(fill_template("no keys", &[("topic", "x")]), "no keys");
  }

  #[test]
  fn pick_handles_empty_lists() {
    assert_eq!(pick(&[]), "");
    let one = vec!["only".to_string()];
    assert_eq!(pick(&one), "only");
  }

  #[test]
  fn truncation_respects_char_boundaries() {
    assert_eq!(trunc_for_log("short", 10), "short");
    let out = trunc_for_log("héllo world", 2);
    assert!(out.starts_with("h…"));
    assert!(out.ends_with("(12 bytes total)"));
  }
}
