use clap::{error::ErrorKind, CommandFactory, Parser};
use numdrill::{
    app::{run_app, AppOptions, Flow},
    app_dirs::AppDirs,
    challenge::ChallengeMode,
    config::{ConfigStore, FileConfigStore},
    runtime::{CrosstermEventSource, FixedTicker, Runner},
    terminal::{ensure_interactive, TerminalGuard},
    ui::{title, TerminalPresenter},
};
use ratatui::backend::CrosstermBackend;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::{error::Error, fs, io, path::PathBuf};

/// number-typing and vim jump drills for your terminal
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Retype numbers, or type vim jump commands like 15j and 8k, as fast as you can. Ten challenges per round, scored for accuracy and time."
)]
pub struct Cli {
    /// drill to play (defaults to the one played last)
    #[clap(short = 'm', long, value_enum)]
    mode: Option<ChallengeMode>,

    /// jump drill: only use numbers containing this digit
    #[clap(short = 'd', long, value_parser = clap::value_parser!(u8).range(0..=9), conflicts_with = "all_numbers")]
    digit: Option<u8>,

    /// jump drill: use every number and skip the digit prompt
    #[clap(short = 'a', long)]
    all_numbers: bool,

    /// log file (default: ~/.local/state/numdrill/numdrill.log)
    #[clap(long)]
    log_file: Option<PathBuf>,

    /// log at debug level
    #[clap(long)]
    verbose: bool,
}

impl Cli {
    fn wants_digit_filter(&self) -> bool {
        self.digit.is_some() || self.all_numbers
    }

    /// The drill to play. `--digit` and `--all-numbers` pick the jump drill
    /// unless `--mode number` was asked for, which is a conflict (`None`).
    fn resolve_mode(&self, saved: ChallengeMode) -> Option<ChallengeMode> {
        match (self.mode, self.wants_digit_filter()) {
            (Some(ChallengeMode::NumberOnly), true) => None,
            (Some(mode), _) => Some(mode),
            (None, true) => Some(ChallengeMode::NumberWithDirection),
            (None, false) => Some(saved),
        }
    }
}

fn init_logging(cli: &Cli) {
    let Some(path) = cli.log_file.clone().or_else(AppDirs::log_path) else {
        return;
    };
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }

    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();

    if let Ok(log_file) = fs::OpenOptions::new().create(true).append(true).open(&path) {
        let _ = WriteLogger::init(level, log_config, log_file);
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_logging(&cli);

    if let Err(err) = ensure_interactive() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, err.to_string()).exit();
    }

    let store = FileConfigStore::new();
    let mut config = store.load();
    let Some(mode) = cli.resolve_mode(config.mode) else {
        let mut cmd = Cli::command();
        cmd.error(
            ErrorKind::ArgumentConflict,
            "--digit and --all-numbers only apply to the jump drill (--mode jump)",
        )
        .exit();
    };

    let options = AppOptions {
        mode,
        required_digit: cli.digit,
        all_numbers: cli.all_numbers,
    };
    log::info!("numdrill starting: {:?}", options);

    let flow = {
        let _guard = TerminalGuard::acquire()?;
        let mut presenter = TerminalPresenter::new(CrosstermBackend::new(io::stdout()))?;
        let runner = Runner::new(CrosstermEventSource::new(), FixedTicker::default());
        run_app(options, &config, &runner, &mut presenter)?
    };

    if flow == Flow::Interrupted {
        std::process::exit(130);
    }

    config.mode = mode;
    if let Err(err) = store.save(&config) {
        log::warn!("could not save config: {}", err);
    }

    println!("Thanks for playing {}! 👋", title(mode));
    Ok(())
}
