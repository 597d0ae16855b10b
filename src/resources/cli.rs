use std::path::PathBuf;

use bevy::prelude::*;

/// Command-line arguments parsed at startup by the demo binary.
#[derive(Resource, Debug, Default, Clone, PartialEq)]
pub struct CliArgs {
    /// Settings file to use instead of the platform default.
    /// Usage: `cargo run -- --settings ./blur.json`
    pub settings_path: Option<PathBuf>,

    /// Start as the game master instead of a player.
    /// Usage: `cargo run -- --gm`
    pub game_master: bool,

    /// Arguments that were not understood, in order.
    pub ignored: Vec<String>,
}

impl CliArgs {
    /// Parse the process's command-line arguments.
    pub fn parse() -> Self {
        Self::parse_from(std::env::args().skip(1))
    }

    /// Parse an argument list (program name already stripped).
    /// Supports:
    /// - `--settings <path>`: Read and write settings at the given path
    /// - `--gm`: Act as the game master
    ///
    /// Parsing happens before logging is up, so problems are collected in
    /// `ignored` and reported by [`CliArgs::report`].
    pub fn parse_from(args: impl IntoIterator<Item = String>) -> Self {
        let args: Vec<String> = args.into_iter().collect();
        let mut cli = CliArgs::default();

        let mut i = 0;
        while i < args.len() {
            match args[i].as_str() {
                "--settings" => {
                    if i + 1 < args.len() {
                        cli.settings_path = Some(PathBuf::from(&args[i + 1]));
                        i += 2;
                    } else {
                        cli.ignored.push(args[i].clone());
                        i += 1;
                    }
                }
                "--gm" => {
                    cli.game_master = true;
                    i += 1;
                }
                arg => {
                    if arg.starts_with('-') {
                        cli.ignored.push(arg.to_string());
                    }
                    i += 1;
                }
            }
        }

        cli
    }

    /// Logs what was parsed. Run once logging is available.
    pub fn report(&self) {
        if let Some(path) = &self.settings_path {
            info!("CLI: Using settings file '{}'", path.display());
        }
        if self.game_master {
            info!("CLI: Acting as game master");
        }
        for arg in &self.ignored {
            if arg == "--settings" {
                warn!("CLI: --settings requires a path argument");
            } else {
                warn!("CLI: Unknown argument '{}'", arg);
            }
        }
    }
}

/// Startup system that reports the parsed command line.
pub fn report_cli_args(cli: Option<Res<CliArgs>>) {
    if let Some(cli) = cli {
        cli.report();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_empty_args() {
        assert_eq!(CliArgs::parse_from(args(&[])), CliArgs::default());
    }

    #[test]
    fn test_settings_and_gm() {
        let cli = CliArgs::parse_from(args(&["--gm", "--settings", "blur.json"]));
        assert!(cli.game_master);
        assert_eq!(cli.settings_path, Some(PathBuf::from("blur.json")));
    }

    #[test]
    fn test_dangling_settings_flag_is_ignored() {
        let cli = CliArgs::parse_from(args(&["--settings"]));
        assert_eq!(cli.settings_path, None);
        assert_eq!(cli.ignored, vec!["--settings".to_string()]);
    }

    #[test]
    fn test_unknown_flag_is_skipped() {
        let cli = CliArgs::parse_from(args(&["--verbose", "--gm", "stray"]));
        assert!(cli.game_master);
        assert_eq!(cli.ignored, vec!["--verbose".to_string()]);
    }

    #[test]
    fn test_report_runs_as_startup_system() {
        let mut app = App::new();
        app.insert_resource(CliArgs::parse_from(args(&["--gm", "--bogus"])))
            .add_systems(Startup, report_cli_args);
        app.update();
        assert!(app.world().resource::<CliArgs>().game_master);

        // Without parsed arguments the report is skipped
        let mut bare = App::new();
        bare.add_systems(Startup, report_cli_args);
        bare.update();
    }
}
