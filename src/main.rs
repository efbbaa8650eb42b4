//! `colwrap` - reflow comments and prose to a column width.

use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::{panic, time::Duration};

use anyhow::Context;
use clap::{Parser, Subcommand};
use crossterm::{
    event::{self, DisableBracketedPaste, EnableBracketedPaste},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use tracing_subscriber::EnvFilter;

use colwrap::app::App;
use colwrap::config::Settings;
use colwrap::constants::{ui as ui_consts, wrap};
use colwrap::error::Error;
use colwrap::services::batch::{self, BatchMode, BatchOptions, Scope};
use colwrap::ui;

#[derive(Parser, Debug)]
#[command(
    name = "colwrap",
    version,
    about = "Reflow comments and prose to a column width",
    args_conflicts_with_subcommands = true
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
    #[command(flatten)]
    batch: BatchArgs,
    #[command(flatten)]
    wrap: WrapArgs,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Open a file in the interactive editor.
    Edit {
        /// File to edit; created on save if missing.
        file: PathBuf,
        #[command(flatten)]
        wrap: WrapArgs,
    },
    /// Print the effective settings as JSON.
    Settings {
        /// Persist the settings, including any overrides given here.
        #[arg(long)]
        save: bool,
        #[command(flatten)]
        wrap: WrapArgs,
    },
}

/// Overrides for the stored settings.
#[derive(clap::Args, Debug, Default)]
struct WrapArgs {
    /// Column width.
    #[arg(long, short = 'w')]
    width: Option<usize>,
    /// Columns per tab character.
    #[arg(long)]
    tab_width: Option<usize>,
    /// Balance line lengths instead of filling greedily.
    #[arg(long)]
    minimum_raggedness: bool,
}

#[derive(clap::Args, Debug, Default)]
struct BatchArgs {
    /// Files or directories to wrap. Reads stdin when empty.
    #[arg(value_name = "PATHS")]
    paths: Vec<PathBuf>,
    /// Treat input as prose regardless of extension.
    #[arg(long)]
    plaintext: bool,
    /// Report files that would change and exit 1 if any do.
    #[arg(long, conflicts_with = "in_place")]
    check: bool,
    /// Rewrite files instead of printing them.
    #[arg(long, short = 'i')]
    in_place: bool,
    /// Extensions to pick up when walking directories.
    #[arg(long = "ext", value_delimiter = ',')]
    extensions: Vec<String>,
    /// Only wrap lines START:END (1-based, inclusive).
    #[arg(long, value_name = "START:END", conflicts_with = "paragraph_at")]
    lines: Option<String>,
    /// Only wrap the paragraph around this line (1-based).
    #[arg(long, value_name = "LINE")]
    paragraph_at: Option<usize>,
}

impl WrapArgs {
    /// Command-line values win over the settings file and environment.
    fn apply(&self, settings: &mut Settings) {
        if let Some(width) = self.width {
            settings.column_width_override = Some(width);
        }
        if let Some(tab_width) = self.tab_width {
            settings.tab_width = tab_width;
        }
        if self.minimum_raggedness {
            settings.use_minimum_raggedness = true;
        }
    }
}

impl BatchArgs {
    fn options(&self) -> colwrap::error::Result<BatchOptions> {
        let mode = if self.check {
            BatchMode::Check
        } else if self.in_place {
            BatchMode::Write
        } else {
            BatchMode::Stdout
        };
        let scope = match (&self.lines, self.paragraph_at) {
            (Some(range), _) => parse_line_range(range)?,
            (None, Some(line)) => Scope::ParagraphAt(
                line.checked_sub(1)
                    .ok_or_else(|| Error::parse("--paragraph-at is 1-based", None::<PathBuf>))?,
            ),
            (None, None) => Scope::All,
        };
        Ok(BatchOptions {
            mode,
            scope,
            extensions: self.extensions.clone(),
            fallback_width: wrap::DEFAULT_WIDTH,
            plaintext: self.plaintext,
        })
    }
}

fn parse_line_range(range: &str) -> colwrap::error::Result<Scope> {
    let invalid = || Error::parse(format!("expected START:END, got {range:?}"), None::<PathBuf>);
    let (start, end) = range.split_once(':').ok_or_else(invalid)?;
    let start: usize = start.trim().parse().map_err(|_| invalid())?;
    let end: usize = end.trim().parse().map_err(|_| invalid())?;
    if start == 0 || end < start {
        return Err(invalid());
    }
    Ok(Scope::Lines { start: start - 1, end: end - 1 })
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("COLWRAP_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Some(Command::Edit { file, wrap }) => run_editor(file, &wrap),
        Some(Command::Settings { save, wrap }) => {
            init_tracing();
            print_settings(save, &wrap)
        }
        None => {
            init_tracing();
            run_wrap(&cli.batch, &cli.wrap)
        }
    };

    match result {
        Ok(code) => code,
        Err(err) => {
            eprintln!("colwrap: {err:#}");
            ExitCode::from(2)
        }
    }
}

fn load_settings(args: &WrapArgs) -> anyhow::Result<Settings> {
    let mut settings = Settings::load().context("loading settings")?;
    args.apply(&mut settings);
    Ok(settings)
}

fn run_wrap(args: &BatchArgs, overrides: &WrapArgs) -> anyhow::Result<ExitCode> {
    let settings = load_settings(overrides)?;
    let options = args.options()?;

    if args.paths.is_empty() {
        let mut input = String::new();
        io::stdin().read_to_string(&mut input).context("reading stdin")?;
        let output = batch::wrap_text(&input, None, &settings, &options)?;
        if options.mode == BatchMode::Check {
            return Ok(if output == input { ExitCode::SUCCESS } else { ExitCode::FAILURE });
        }
        io::stdout().write_all(output.as_bytes()).context("writing stdout")?;
        return Ok(ExitCode::SUCCESS);
    }

    let files = batch::collect_files(&args.paths, &options.extensions)?;
    let report = batch::run(&files, &settings, &options);

    let mut stdout = io::stdout().lock();
    for file in &report.files {
        match options.mode {
            BatchMode::Stdout => stdout.write_all(file.output.as_bytes())?,
            BatchMode::Check if file.changed => writeln!(stdout, "would wrap {}", file.path.display())?,
            BatchMode::Write if file.changed => writeln!(stdout, "wrapped {}", file.path.display())?,
            BatchMode::Check | BatchMode::Write => {}
        }
    }
    for failure in &report.failures {
        eprintln!("colwrap: {}", failure_line(failure));
    }

    let needs_wrap = options.mode == BatchMode::Check && report.changed().next().is_some();
    Ok(if needs_wrap || !report.failures.is_empty() { ExitCode::FAILURE } else { ExitCode::SUCCESS })
}

/// One line per failed file, naming the file first.
fn failure_line(failure: &Error) -> String {
    match (failure, failure.path()) {
        (Error::Io { source, .. }, Some(path)) => format!("skipped {}: {source}", path.display()),
        (Error::Parse { message, .. }, Some(path)) => format!("skipped {}: {message}", path.display()),
        _ => failure.to_string(),
    }
}

fn print_settings(save: bool, args: &WrapArgs) -> anyhow::Result<ExitCode> {
    let settings = load_settings(args)?;
    println!("{}", serde_json::to_string_pretty(&settings)?);
    if save {
        let path = settings.save()?;
        eprintln!("Saved settings to {}", path.display());
    }
    Ok(ExitCode::SUCCESS)
}

// Helper function to ensure the terminal is cleaned up on exit
fn cleanup_terminal<B: Backend + Write>(terminal: &mut Terminal<B>) -> io::Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), DisableBracketedPaste, LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

fn run_editor(file: PathBuf, args: &WrapArgs) -> anyhow::Result<ExitCode> {
    let settings = load_settings(args)?;
    let app = App::open(file, settings)?;

    // Restore the terminal before the default panic message prints
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let mut stdout = io::stdout();
        let _ = execute!(stdout, DisableBracketedPaste, LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    let res = run_app(&mut terminal, app);

    if let Err(e) = cleanup_terminal(&mut terminal) {
        eprintln!("Error cleaning up terminal: {e:?}");
    }

    res?;
    Ok(ExitCode::SUCCESS)
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, mut app: App) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, &mut app))?;

        if event::poll(Duration::from_millis(ui_consts::POLL_INTERVAL_MS))? {
            match event::read()? {
                event::Event::Key(key) if key.kind == event::KeyEventKind::Press => app.handle_key(key),
                event::Event::Paste(text) => app.paste(&text),
                _ => {}
            }
        }

        if app.should_quit() {
            break;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::*;

    #[test]
    fn line_range_is_one_based_inclusive() {
        assert_eq!(parse_line_range("3:5").unwrap(), Scope::Lines { start: 2, end: 4 });
        assert_eq!(parse_line_range("1:1").unwrap(), Scope::Lines { start: 0, end: 0 });
    }

    #[test]
    fn bad_line_ranges_are_rejected() {
        for range in ["0:3", "5:2", "4", "a:b"] {
            assert!(parse_line_range(range).is_err(), "{range}");
        }
    }

    #[test]
    fn cli_flags_override_settings() {
        let cli = Cli::parse_from(["colwrap", "--width", "72", "--minimum-raggedness", "--tab-width", "2"]);
        let mut settings = Settings::default();
        cli.wrap.apply(&mut settings);
        assert_eq!(settings.column_width_override, Some(72));
        assert_eq!(settings.tab_width, 2);
        assert!(settings.use_minimum_raggedness);
    }

    #[test]
    fn check_mode_and_paragraph_scope() {
        let cli = Cli::parse_from(["colwrap", "--check", "--paragraph-at", "4", "src"]);
        let options = cli.batch.options().unwrap();
        assert_eq!(options.mode, BatchMode::Check);
        assert_eq!(options.scope, Scope::ParagraphAt(3));
        assert_eq!(cli.batch.paths, [PathBuf::from("src")]);
    }

    #[test]
    fn failures_name_the_skipped_file() {
        let missing = Error::io(io::Error::new(io::ErrorKind::NotFound, "gone"), PathBuf::from("src/a.rs"));
        assert_eq!(failure_line(&missing), "skipped src/a.rs: gone");

        let past_end = Error::parse("line 9 is past the end (3 lines)", PathBuf::from("b.py"));
        assert_eq!(failure_line(&past_end), "skipped b.py: line 9 is past the end (3 lines)");

        let unscoped = Error::parse("bad range", None::<PathBuf>);
        assert_eq!(failure_line(&unscoped), unscoped.to_string());
    }

    #[test]
    fn check_conflicts_with_in_place() {
        assert!(Cli::try_parse_from(["colwrap", "--check", "--in-place", "a.rs"]).is_err());
    }

    #[test]
    fn edit_subcommand_takes_a_file() {
        let cli = Cli::parse_from(["colwrap", "edit", "notes.md", "--width", "60"]);
        match cli.command {
            Some(Command::Edit { file, wrap }) => {
                assert_eq!(file, PathBuf::from("notes.md"));
                assert_eq!(wrap.width, Some(60));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
