#![forbid(unsafe_code)]

//! Command-line argument parsing for the boot screen demo.
//!
//! Parses args manually to keep the binary lean. Supports environment
//! variable overrides via the `TERMBOOT_*` prefix; explicit flags win over
//! the environment.

use std::env;
use std::fmt;
use std::path::PathBuf;
use std::process;

use termboot_runtime::{ConfigError, SequenceConfig};

const VERSION: &str = env!("CARGO_PKG_VERSION");

const HELP_TEXT: &str = "\
termboot - animated terminal boot screen

USAGE:
    termboot [OPTIONS]

OPTIONS:
    --speed=F            Timeline speed multiplier, e.g. 2 for twice as fast (default: 1)
    --seed=N             Seed for the scan simulation and scanner dots (default: random)
    --no-beep            Do not ring the terminal bell on connection
    --exit-after-ms=N    Quit automatically after N milliseconds (0 = never)
    --help, -h           Show this help message
    --version, -V        Show version

KEYBINDINGS:
    q / Esc / Ctrl+C     Quit

ENVIRONMENT VARIABLES:
    TERMBOOT_SPEED           Override --speed
    TERMBOOT_SEED            Override --seed
    TERMBOOT_NO_BEEP         Set to 1 to disable the bell
    TERMBOOT_EXIT_AFTER_MS   Override --exit-after-ms
    TERMBOOT_LOG             Write diagnostics to this file (filter via RUST_LOG)";

/// Parsed command-line options.
#[derive(Debug, Clone, PartialEq)]
pub struct Opts {
    /// Timeline speed multiplier.
    pub speed: f64,
    /// Seed for all randomness; random when absent.
    pub seed: Option<u64>,
    /// Whether to ring the bell when the connection is established.
    pub beep: bool,
    /// Auto-exit after this many milliseconds (0 = disabled).
    pub exit_after_ms: u64,
    /// Diagnostics log file.
    pub log_file: Option<PathBuf>,
}

impl Default for Opts {
    fn default() -> Self {
        Self {
            speed: 1.0,
            seed: None,
            beep: true,
            exit_after_ms: 0,
            log_file: None,
        }
    }
}

/// What the command line asked for.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Run(Opts),
    Help,
    Version,
}

/// Command-line errors.
#[derive(Debug, Clone, PartialEq)]
pub enum CliError {
    Config(ConfigError),
    UnknownArgument(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(err) => write!(f, "{err}"),
            Self::UnknownArgument(arg) => write!(f, "unknown argument: {arg}"),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::UnknownArgument(_) => None,
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

fn parse_speed(val: &str) -> Result<f64, ConfigError> {
    match val.parse::<f64>() {
        Ok(speed) if speed.is_finite() && speed > 0.0 => Ok(speed),
        Ok(speed) => Err(ConfigError::InvalidSpeed(speed)),
        Err(_) => Err(ConfigError::InvalidValue {
            name: "--speed",
            value: val.to_owned(),
        }),
    }
}

fn parse_flag<T: std::str::FromStr>(name: &'static str, val: &str) -> Result<T, ConfigError> {
    val.parse().map_err(|_| ConfigError::InvalidValue {
        name,
        value: val.to_owned(),
    })
}

fn truthy(val: &str) -> bool {
    !matches!(val.trim(), "" | "0" | "false" | "no")
}

impl Opts {
    /// Parse the process arguments and environment, exiting on `--help`,
    /// `--version`, or invalid input.
    pub fn parse() -> Self {
        match Self::parse_from(env::args().skip(1), |key| env::var(key).ok()) {
            Ok(Command::Run(opts)) => opts,
            Ok(Command::Help) => {
                println!("{HELP_TEXT}");
                process::exit(0);
            }
            Ok(Command::Version) => {
                println!("termboot {VERSION}");
                process::exit(0);
            }
            Err(err) => {
                eprintln!("{err}");
                eprintln!("Run with --help for usage information.");
                process::exit(1);
            }
        }
    }

    /// Parse `args` with `lookup` as the environment.
    ///
    /// Invalid environment values are ignored; invalid flags are errors.
    pub fn parse_from<I, F>(args: I, lookup: F) -> Result<Command, CliError>
    where
        I: IntoIterator<Item = String>,
        F: Fn(&str) -> Option<String>,
    {
        let mut opts = Self::default();

        // Apply environment variable defaults first
        if let Some(val) = lookup("TERMBOOT_SPEED")
            && let Ok(speed) = parse_speed(&val)
        {
            opts.speed = speed;
        }
        if let Some(val) = lookup("TERMBOOT_SEED")
            && let Ok(seed) = val.parse()
        {
            opts.seed = Some(seed);
        }
        if let Some(val) = lookup("TERMBOOT_NO_BEEP")
            && truthy(&val)
        {
            opts.beep = false;
        }
        if let Some(val) = lookup("TERMBOOT_EXIT_AFTER_MS")
            && let Ok(ms) = val.parse()
        {
            opts.exit_after_ms = ms;
        }
        if let Some(val) = lookup("TERMBOOT_LOG")
            && !val.is_empty()
        {
            opts.log_file = Some(PathBuf::from(val));
        }

        // Parse command-line args (override env vars)
        for arg in args {
            match arg.as_str() {
                "--help" | "-h" => return Ok(Command::Help),
                "--version" | "-V" => return Ok(Command::Version),
                "--no-beep" => opts.beep = false,
                other => {
                    if let Some(val) = other.strip_prefix("--speed=") {
                        opts.speed = parse_speed(val)?;
                    } else if let Some(val) = other.strip_prefix("--seed=") {
                        opts.seed = Some(parse_flag("--seed", val)?);
                    } else if let Some(val) = other.strip_prefix("--exit-after-ms=") {
                        opts.exit_after_ms = parse_flag("--exit-after-ms", val)?;
                    } else {
                        return Err(CliError::UnknownArgument(other.to_owned()));
                    }
                }
            }
        }

        Ok(Command::Run(opts))
    }

    /// The boot timeline for these options, validated.
    pub fn sequence_config(&self) -> Result<SequenceConfig, ConfigError> {
        let config = SequenceConfig::default().with_speed(self.speed)?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::time::Duration;

    fn parse(args: &[&str], env: &[(&str, &str)]) -> Result<Command, CliError> {
        let env: HashMap<String, String> = env
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Opts::parse_from(args.iter().map(|s| s.to_string()), |key| env.get(key).cloned())
    }

    fn run_opts(args: &[&str], env: &[(&str, &str)]) -> Opts {
        match parse(args, env) {
            Ok(Command::Run(opts)) => opts,
            other => panic!("expected run options, got {other:?}"),
        }
    }

    #[test]
    fn default_opts() {
        let opts = run_opts(&[], &[]);
        assert_eq!(opts, Opts::default());
        assert_eq!(opts.speed, 1.0);
        assert!(opts.beep);
        assert_eq!(opts.exit_after_ms, 0);
        assert!(opts.seed.is_none());
    }

    #[test]
    fn flags_are_parsed() {
        let opts = run_opts(
            &["--speed=2.5", "--seed=42", "--no-beep", "--exit-after-ms=9000"],
            &[],
        );
        assert_eq!(opts.speed, 2.5);
        assert_eq!(opts.seed, Some(42));
        assert!(!opts.beep);
        assert_eq!(opts.exit_after_ms, 9_000);
    }

    #[test]
    fn env_applies_and_flags_override() {
        let env = [
            ("TERMBOOT_SPEED", "3"),
            ("TERMBOOT_SEED", "7"),
            ("TERMBOOT_NO_BEEP", "1"),
            ("TERMBOOT_EXIT_AFTER_MS", "500"),
            ("TERMBOOT_LOG", "/tmp/termboot.log"),
        ];
        let opts = run_opts(&[], &env);
        assert_eq!(opts.speed, 3.0);
        assert_eq!(opts.seed, Some(7));
        assert!(!opts.beep);
        assert_eq!(opts.exit_after_ms, 500);
        assert_eq!(opts.log_file, Some(PathBuf::from("/tmp/termboot.log")));

        let opts = run_opts(&["--speed=0.5", "--seed=9"], &env);
        assert_eq!(opts.speed, 0.5);
        assert_eq!(opts.seed, Some(9));
    }

    #[test]
    fn invalid_env_values_are_ignored() {
        let opts = run_opts(
            &[],
            &[
                ("TERMBOOT_SPEED", "-1"),
                ("TERMBOOT_SEED", "abc"),
                ("TERMBOOT_NO_BEEP", "0"),
            ],
        );
        assert_eq!(opts, Opts::default());
    }

    #[test]
    fn invalid_flags_are_errors() {
        assert_eq!(
            parse(&["--speed=0"], &[]),
            Err(CliError::Config(ConfigError::InvalidSpeed(0.0)))
        );
        assert!(matches!(
            parse(&["--seed=x"], &[]),
            Err(CliError::Config(ConfigError::InvalidValue { name: "--seed", .. }))
        ));
        assert_eq!(
            parse(&["--bogus"], &[]),
            Err(CliError::UnknownArgument("--bogus".into()))
        );
    }

    #[test]
    fn help_and_version_short_circuit() {
        assert_eq!(parse(&["--help", "--bogus"], &[]), Ok(Command::Help));
        assert_eq!(parse(&["-V"], &[]), Ok(Command::Version));
    }

    #[test]
    fn speed_scales_the_timeline() {
        let opts = run_opts(&["--speed=2"], &[]);
        let config = opts.sequence_config().unwrap_or_default();
        assert_eq!(config.header_at, Duration::from_millis(250));
        assert_eq!(config.scan_begin_at, Duration::from_millis(1_500));
    }

    #[test]
    fn extreme_speed_that_zeroes_the_tick_is_rejected() {
        let opts = Opts {
            speed: 1e12,
            ..Opts::default()
        };
        assert_eq!(opts.sequence_config(), Err(ConfigError::ZeroTickPeriod));
    }

    #[test]
    fn help_text_lists_every_variable() {
        for var in [
            "TERMBOOT_SPEED",
            "TERMBOOT_SEED",
            "TERMBOOT_NO_BEEP",
            "TERMBOOT_EXIT_AFTER_MS",
            "TERMBOOT_LOG",
        ] {
            assert!(HELP_TEXT.contains(var), "missing {var}");
        }
        assert!(!VERSION.is_empty());
    }
}
