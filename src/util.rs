//! Small utility helpers used across modules.

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

/// Keep recipient addresses out of logs: `jane.doe@example.com` -> `j***@example.com`.
pub fn redact_email(address: &str) -> String {
  match address.split_once('@') {
    Some((local, domain)) => {
      let first = local.chars().next().map(String::from).unwrap_or_default();
      format!("{}***@{}", first, domain)
    }
    None => "***".to_string(),
  }
}

/// Log-safe truncation for large strings.
pub fn trunc_for_log(s: &str, max: usize) -> String {
  if s.len() <= max {
    return s.to_string();
  }
  let mut end = max;
  while !s.is_char_boundary(end) { end -= 1; }
  format!("{}… ({} bytes total)", &s[..end], s.len())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn fills_every_occurrence() {
    assert_eq!(fill_template("{state}/{state} {x}", &[("state", "Strong")]), "Strong/Strong {x}");
  }

  #[test]
  fn redacts_local_part() {
    assert_eq!(redact_email("jane.doe@example.com"), "j***@example.com");
    assert_eq!(redact_email("not-an-address"), "***");
  }

  #[test]
  fn truncation_respects_char_boundaries() {
    assert_eq!(trunc_for_log("short", 10), "short");
    let t = trunc_for_log("héllo world", 2);
    assert!(t.starts_with('h'));
    assert!(t.ends_with("(12 bytes total)"));
  }
}
