//! Email rendering of an assessment result (branded HTML + plain-text alternative).

use std::fmt::Write as _;

use crate::catalog::SCALE_MAX;
use crate::config::EmailSettings;
use crate::domain::AssessmentResult;
use crate::util::fill_template;

/// `4.26` -> `"4.3 / 5"`; non-finite values render as an em dash.
pub fn format_score(value: f64) -> String {
  if value.is_finite() {
    format!("{:.1} / {}", value, SCALE_MAX)
  } else {
    "—".to_string()
  }
}

/// Minimal escaper for labels and narrative text placed into the HTML body.
pub fn escape_html(s: &str) -> String {
  let mut out = String::with_capacity(s.len());
  for ch in s.chars() {
    match ch {
      '&' => out.push_str("&amp;"),
      '<' => out.push_str("&lt;"),
      '>' => out.push_str("&gt;"),
      '"' => out.push_str("&quot;"),
      '\'' => out.push_str("&#039;"),
      _ => out.push(ch),
    }
  }
  out
}

pub fn subject(result: &AssessmentResult, settings: &EmailSettings) -> String {
  fill_template(&settings.subject_template, &[("state", result.interpretation.state.as_str())])
}

pub fn render_html(result: &AssessmentResult, settings: &EmailSettings) -> String {
  let b = &settings.brand;

  let mut rows = String::new();
  for (name, value) in &result.category_scores {
    let _ = write!(
      rows,
      r#"
        <tr>
          <td style="padding:10px 0; font-size:15px; color:{brown};">{name}</td>
          <td style="padding:10px 0; text-align:right; font-weight:bold; color:{green};">{score}</td>
        </tr>"#,
      brown = escape_html(&b.brown),
      green = escape_html(&b.green),
      name = escape_html(name),
      score = format_score(*value),
    );
  }

  format!(
    r#"
  <div style="background-color:{cream}; font-family:{font}; color:{brown}; padding:40px 24px; border-radius:12px; max-width:600px; margin:auto; border:1px solid #e5e2dd;">
    <div style="text-align:center; margin-bottom:32px;">
      <h1 style="font-size:26px; color:{brown}; margin-bottom:8px; font-weight:900;">{heading}</h1>
      <p style="font-size:15px; color:#6b6259; margin:0;">{subheading}</p>
    </div>

    <div style="background-color:{state_color}; color:#fff; padding:12px 20px; border-radius:8px; text-align:center; margin-bottom:24px;">
      <h2 style="margin:0; font-size:20px;">Your Pillar State: {state}</h2>
      <p style="margin:4px 0 0; font-size:14px;">Average score {overall}</p>
    </div>

    <p style="font-size:15px; line-height:1.7; color:#2a2a2a; margin-bottom:24px;">{narrative}</p>

    <hr style="border:none; border-top:1px solid #e0ddd7; margin:32px 0;">

    <h3 style="font-size:18px; color:{brown}; margin-bottom:16px; text-align:center;">{breakdown_heading}</h3>
    <p style="font-size:14px; color:#6b6259; text-align:center; margin-bottom:20px;">{breakdown_intro}</p>

    <table style="width:100%; border-collapse:collapse; background:#fff;">
      <tbody>{rows}
      </tbody>
    </table>

    <hr style="border:none; border-top:1px solid #e0ddd7; margin:32px 0;">

    <div style="text-align:center; margin-top:24px;">
      <p style="font-size:15px; color:{brown}; margin-bottom:16px;">{closing}</p>
      <a href="{cta_url}" style="background-color:{gold}; color:#fff; padding:14px 28px; border-radius:8px; text-decoration:none; font-weight:600; font-size:16px; display:inline-block;">{cta_label}</a>
    </div>

    <div style="text-align:center; margin-top:40px; font-size:12px; color:#8c837b;">
      <p style="margin:4px 0;">{sign_off}</p>
      <p style="margin:4px 0; font-weight:600;">{team}</p>
      <p style="margin-top:8px; color:#b1a99f;">{footer}</p>
    </div>
  </div>"#,
    cream = escape_html(&b.cream),
    font = escape_html(&b.body_font),
    brown = escape_html(&b.brown),
    gold = escape_html(&b.gold),
    state_color = escape_html(&result.interpretation.color),
    heading = escape_html(&settings.heading),
    subheading = escape_html(&settings.subheading),
    state = escape_html(result.interpretation.state.as_str()),
    overall = format_score(result.score),
    narrative = escape_html(&result.interpretation.narrative),
    breakdown_heading = escape_html(&settings.breakdown_heading),
    breakdown_intro = escape_html(&settings.breakdown_intro),
    rows = rows,
    closing = escape_html(&settings.closing),
    cta_url = escape_html(&settings.cta_url),
    cta_label = escape_html(&settings.cta_label),
    sign_off = escape_html(&settings.sign_off),
    team = escape_html(&settings.team),
    footer = escape_html(&settings.footer),
  )
}

pub fn render_text(result: &AssessmentResult, settings: &EmailSettings) -> String {
  let mut out = String::new();
  let _ = writeln!(out, "{}", settings.heading);
  let _ = writeln!(out, "{}\n", settings.subheading);
  let _ = writeln!(out, "Your Pillar State: {}", result.interpretation.state);
  let _ = writeln!(out, "Average score: {}\n", format_score(result.score));
  let _ = writeln!(out, "{}\n", result.interpretation.narrative);
  let _ = writeln!(out, "{}", settings.breakdown_heading);
  for (name, value) in &result.category_scores {
    let _ = writeln!(out, "- {}: {}", name, format_score(*value));
  }
  let _ = writeln!(out, "\n{}", settings.closing);
  let _ = writeln!(out, "{}: {}\n", settings.cta_label, settings.cta_url);
  let _ = writeln!(out, "{}\n{}", settings.sign_off, settings.team);
  out
}
