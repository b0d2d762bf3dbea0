use crate::config::AppConfigOverrides;
use anyhow::{anyhow, bail, Context, Result};
use std::env;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CliOverrides {
    width: Option<u32>,
    height: Option<u32>,
    vsync: Option<bool>,
    seed: Option<u64>,
    content: Option<String>,
}

impl CliOverrides {
    pub fn parse_from_env() -> Result<Self> {
        Self::parse(env::args())
    }

    pub fn parse<I, S>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut overrides = CliOverrides::default();
        let mut iter = args.into_iter();
        let _ = iter.next(); // skip program name if present
        while let Some(raw_flag) = iter.next() {
            let flag = raw_flag.as_ref();
            if !flag.starts_with("--") {
                bail!("Unexpected argument '{flag}'. Use --width/--height/--vsync/--seed/--content with values.");
            }
            let key = &flag[2..];
            let value =
                iter.next().ok_or_else(|| anyhow!("Expected a value after '{flag}'"))?.as_ref().to_string();
            match key {
                "width" => {
                    overrides.width =
                        Some(value.parse::<u32>().with_context(|| format!("Invalid width '{value}'"))?);
                }
                "height" => {
                    overrides.height =
                        Some(value.parse::<u32>().with_context(|| format!("Invalid height '{value}'"))?);
                }
                "vsync" => {
                    overrides.vsync = Some(parse_bool_flag("vsync", &value)?);
                }
                "seed" => {
                    overrides.seed =
                        Some(value.parse::<u64>().with_context(|| format!("Invalid seed '{value}'"))?);
                }
                "content" => {
                    overrides.content = Some(value);
                }
                _ => bail!("Unknown flag '{flag}'. Supported flags: --width, --height, --vsync, --seed, --content."),
            }
        }
        Ok(overrides)
    }

    pub fn into_config_overrides(self) -> AppConfigOverrides {
        AppConfigOverrides {
            width: self.width,
            height: self.height,
            vsync: self.vsync,
            motion_seed: self.seed,
            content_path: self.content,
        }
    }
}

fn parse_bool_flag(flag: &str, value: &str) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Ok(true),
        "0" | "false" | "off" | "no" => Ok(false),
        other => bail!("Invalid {flag} value '{other}'. Use on/off or true/false."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_window_and_seed_flags() {
        let args = ["app", "--width", "1600", "--height", "900", "--vsync", "off", "--seed", "42"];
        let overrides = CliOverrides::parse(args).expect("parse overrides");
        let cfg = overrides.into_config_overrides();
        assert_eq!(cfg.width, Some(1600));
        assert_eq!(cfg.height, Some(900));
        assert_eq!(cfg.vsync, Some(false));
        assert_eq!(cfg.motion_seed, Some(42));
    }

    #[test]
    fn latest_flag_wins() {
        let args = ["app", "--seed", "1", "--seed", "9"];
        let overrides = CliOverrides::parse(args).expect("parse overrides");
        assert_eq!(overrides.into_config_overrides().motion_seed, Some(9));
    }

    #[test]
    fn missing_value_errors() {
        let err = CliOverrides::parse(["app", "--content"]).unwrap_err();
        assert!(err.to_string().contains("Expected a value"), "error should mention missing value");
    }

    #[test]
    fn rejects_unknown_flags() {
        let err = CliOverrides::parse(["app", "--foo", "bar"]).unwrap_err();
        assert!(err.to_string().contains("Unknown flag"), "unknown flags should error");
    }
}
