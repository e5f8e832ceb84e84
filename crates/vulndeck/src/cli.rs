use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "vulndeck")]
#[command(author, version, about)]
#[command(long_about = "A keyboard-driven slide deck on vulnerability detection.\n\n\
    Presents the built-in talk on SAST, DAST, SCA and IAST, or any deck\n\
    written in the same YAML format.\n\n\
    Examples:\n  \
    vulndeck                      Present the built-in deck (fullscreen)\n  \
    vulndeck --windowed           Present in a 1280x720 window\n  \
    vulndeck --fullscreen         Present fullscreen, overriding the config\n  \
    vulndeck --deck talk.yaml     Present a custom deck\n  \
    vulndeck outline              Print the deck's slides")]
#[command(propagate_version = true)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Deck file to present instead of the built-in deck
    #[arg(long, value_name = "FILE")]
    pub deck: Option<PathBuf>,

    /// Launch in a window instead of fullscreen
    #[arg(long, conflicts_with = "fullscreen")]
    pub windowed: bool,

    /// Launch fullscreen even when the config asks for a window
    #[arg(long)]
    pub fullscreen: bool,

    /// Start on a specific slide (1-indexed)
    #[arg(long, value_name = "N")]
    pub slide: Option<usize>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the deck's slides to the terminal
    Outline {
        /// Deck file to outline instead of the built-in deck
        #[arg(long, value_name = "FILE")]
        deck: Option<PathBuf>,
    },

    /// View and modify configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Target shell
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Show version information
    Version,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Display current configuration
    Show,

    /// Set a configuration value
    Set {
        /// Configuration key (e.g. defaults.windowed, defaults.transition)
        key: String,

        /// Value to set
        value: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    Powershell,
}

impl Cli {
    /// Window mode chosen on the command line, if any: `Some(true)` for a
    /// window, `Some(false)` for fullscreen.
    pub fn window_mode(&self) -> Option<bool> {
        if self.windowed {
            Some(true)
        } else if self.fullscreen {
            Some(false)
        } else {
            None
        }
    }

    pub fn run(self) -> anyhow::Result<()> {
        match self.command {
            Some(Commands::Outline { deck }) => crate::commands::outline::run(deck),
            Some(Commands::Config { command }) => crate::commands::config::run(command),
            Some(Commands::Completion { shell }) => {
                crate::commands::completion::run(shell);
                Ok(())
            }
            Some(Commands::Version) => {
                crate::commands::print_version();
                Ok(())
            }
            None => crate::app::run(crate::app::LaunchOptions {
                windowed: self.window_mode(),
                deck: self.deck,
                start_slide: self.slide,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_bare_invocation_presents() {
        let cli = Cli::try_parse_from(["vulndeck"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.deck.is_none());
        assert!(!cli.windowed);
        assert_eq!(cli.window_mode(), None);
        assert_eq!(cli.slide, None);
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn test_presentation_flags() {
        let cli = Cli::try_parse_from([
            "vulndeck",
            "--deck",
            "talk.yaml",
            "--windowed",
            "--slide",
            "4",
            "-vv",
        ])
        .unwrap();
        assert_eq!(cli.deck, Some(PathBuf::from("talk.yaml")));
        assert!(cli.windowed);
        assert_eq!(cli.slide, Some(4));
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_window_mode_flags() {
        let cli = Cli::try_parse_from(["vulndeck", "--windowed"]).unwrap();
        assert_eq!(cli.window_mode(), Some(true));
        let cli = Cli::try_parse_from(["vulndeck", "--fullscreen"]).unwrap();
        assert_eq!(cli.window_mode(), Some(false));
        assert!(Cli::try_parse_from(["vulndeck", "--windowed", "--fullscreen"]).is_err());
    }

    #[test]
    fn test_outline_subcommand() {
        let cli = Cli::try_parse_from(["vulndeck", "outline", "--deck", "x.yaml"]).unwrap();
        match cli.command {
            Some(Commands::Outline { deck }) => assert_eq!(deck, Some(PathBuf::from("x.yaml"))),
            _ => panic!("expected outline"),
        }
    }

    #[test]
    fn test_config_set_subcommand() {
        let cli =
            Cli::try_parse_from(["vulndeck", "config", "set", "defaults.windowed", "true"]).unwrap();
        match cli.command {
            Some(Commands::Config {
                command: ConfigCommands::Set { key, value },
            }) => {
                assert_eq!(key, "defaults.windowed");
                assert_eq!(value, "true");
            }
            _ => panic!("expected config set"),
        }
    }

    #[test]
    fn test_completion_shell() {
        let cli = Cli::try_parse_from(["vulndeck", "completion", "zsh"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Completion { shell: Shell::Zsh })
        ));
        assert!(Cli::try_parse_from(["vulndeck", "completion", "tcsh"]).is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["vulndeck", "outline", "-q", "--no-color"]).unwrap();
        assert!(cli.quiet);
        assert!(cli.no_color);
    }

    #[test]
    fn test_presentation_flags_conflict_with_subcommand() {
        assert!(Cli::try_parse_from(["vulndeck", "--windowed", "outline"]).is_err());
        assert!(Cli::try_parse_from(["vulndeck", "--fullscreen", "outline"]).is_err());
    }
}
