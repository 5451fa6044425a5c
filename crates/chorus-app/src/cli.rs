use clap::Parser;

/// Chorus: several chat web apps side by side, one prompt for all of them.
#[derive(Parser, Debug)]
#[command(name = "chorus", version, about)]
pub struct Args {
    /// Config file path override.
    #[arg(long)]
    pub config: Option<String>,

    /// Log filter directive (e.g. `chorus=debug`).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Number of windows to open at startup.
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=8))]
    pub windows: Option<u32>,
}

pub fn parse() -> Args {
    Args::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_empty() {
        let args = Args::try_parse_from(["chorus"]).unwrap();
        assert!(args.config.is_none());
        assert!(args.log_level.is_none());
        assert!(args.windows.is_none());
    }

    #[test]
    fn parses_all_flags() {
        let args = Args::try_parse_from([
            "chorus",
            "--config",
            "/tmp/chorus.toml",
            "--log-level",
            "chorus=debug",
            "--windows",
            "2",
        ])
        .unwrap();
        assert_eq!(args.config.as_deref(), Some("/tmp/chorus.toml"));
        assert_eq!(args.log_level.as_deref(), Some("chorus=debug"));
        assert_eq!(args.windows, Some(2));
    }

    #[test]
    fn rejects_out_of_range_window_count() {
        assert!(Args::try_parse_from(["chorus", "--windows", "0"]).is_err());
        assert!(Args::try_parse_from(["chorus", "--windows", "9"]).is_err());
    }
}
