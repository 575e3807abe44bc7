//! Tracing setup for the assessment service.
//!
//! Log targets emitted by this crate:
//! - `soul_structure_backend`: startup, config, WebSocket lifecycle
//! - `assessment`: completed scorings and catalog warnings
//! - `email`: provider attempts, retries and failures (recipients redacted)
//!
//! `LOG_LEVEL` takes any `EnvFilter` directive string and replaces `DEFAULT_FILTER`.
//! `LOG_FORMAT=json` switches to one JSON object per line; anything else is pretty text.

use tracing_subscriber::EnvFilter;

pub const DEFAULT_FILTER: &str = "info,assessment=debug,soul_structure_backend=debug,tower_http=info,axum=info";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl LogFormat {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some(v) if v.eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        }
    }
}

/// Filter from `LOG_LEVEL`, or `DEFAULT_FILTER` when unset or unparsable.
pub fn filter_from(level: Option<&str>) -> EnvFilter {
    level
        .and_then(|l| EnvFilter::try_new(l).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER))
}

pub fn init_tracing() {
    let level = std::env::var("LOG_LEVEL").ok();
    let format = LogFormat::parse(std::env::var("LOG_FORMAT").ok().as_deref());

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter_from(level.as_deref()))
        .with_target(true)
        .with_file(true)
        .with_line_number(true);

    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_format_is_opt_in() {
        assert_eq!(LogFormat::parse(Some("json")), LogFormat::Json);
        assert_eq!(LogFormat::parse(Some(" JSON ")), LogFormat::Json);
        assert_eq!(LogFormat::parse(Some("pretty")), LogFormat::Pretty);
        assert_eq!(LogFormat::parse(None), LogFormat::Pretty);
    }

    #[test]
    fn bad_level_falls_back_to_default_filter() {
        assert_eq!(filter_from(Some("assessment=loud")).to_string(), EnvFilter::new(DEFAULT_FILTER).to_string());
        assert_eq!(filter_from(None).to_string(), EnvFilter::new(DEFAULT_FILTER).to_string());
        assert_eq!(filter_from(Some("warn")).to_string(), "warn");
    }
}
