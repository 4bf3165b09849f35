use crate::backend::Backend;
use crate::chart::{MissChart, PlotConfig};
use crate::errors::BenchlensError;
use crate::input::{Control, InputHandler};
use crate::samples::read_samples;
use crate::theme::Theme;
use crate::workload::{check_stream, generate_query_list, generate_write_list};

use anyhow::{Context, Result, bail};
#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use std::ffi::OsString;
use std::fs::File;
use std::io::{BufReader, ErrorKind, LineWriter};
use std::panic;
use std::path::PathBuf;
use std::thread::panicking;

#[cfg(feature = "cli")]
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[cfg(feature = "cli")]
#[derive(Subcommand, Debug)]
enum Command {
    /// Plot per-level cache miss counts read from a file or stdin
    Plot(PlotArgs),

    /// Generate write and query workload files for each backend
    Generate(GenerateArgs),
}

#[cfg(feature = "cli")]
#[derive(clap::Args, Debug)]
struct PlotArgs {
    /// Input filename (stdin if omitted); three miss counts per line
    filename: Option<String>,

    /// Comma separated x axis values, one per input line
    ///
    /// Example: "16,32,64,128" plots four input lines against cache sizes
    /// instead of line positions.
    #[arg(long, value_name = "values")]
    x_values: Option<String>,

    /// X axis title
    #[arg(long, value_name = "title", default_value = "Cache size")]
    x_title: String,

    /// Y axis title
    #[arg(long, value_name = "title", default_value = "Cache misses")]
    y_title: String,

    /// Chart title
    #[arg(long)]
    title: Option<String>,

    /// Render axis tick labels in superscript scientific notation
    #[clap(long)]
    math_labels: bool,
}

#[cfg(feature = "cli")]
#[derive(clap::Args, Debug)]
struct GenerateArgs {
    /// Inclusive timestamp range, e.g. 1:86400
    #[arg(long, value_name = "LO:HI")]
    range: String,

    /// Directory receiving the generated files
    #[arg(long, value_name = "dir", default_value = "workload")]
    out_dir: PathBuf,

    /// Comma separated backends to generate for (default: all three)
    #[arg(long, value_name = "names")]
    backends: Option<String>,

    /// Number of write records (default: the range length)
    #[arg(long, value_name = "n")]
    writes: Option<u64>,

    /// Seed making the generated values reproducible
    #[clap(long)]
    seed: Option<u64>,

    /// Re-read the generated files and verify their column counts
    #[clap(long)]
    check: bool,
}

#[cfg(feature = "cli")]
impl From<PlotArgs> for PlotOptions {
    fn from(args: PlotArgs) -> Self {
        Self {
            filename: args.filename,
            x_values: args.x_values,
            x_title: args.x_title,
            y_title: args.y_title,
            title: args.title,
            math_labels: args.math_labels,
        }
    }
}

#[cfg(feature = "cli")]
impl From<GenerateArgs> for GenerateOptions {
    fn from(args: GenerateArgs) -> Self {
        Self {
            range: args.range,
            out_dir: args.out_dir,
            backends: args.backends,
            writes: args.writes,
            seed: args.seed,
            check: args.check,
        }
    }
}

// Structs for library usage without clap directives
#[derive(Debug)]
pub struct PlotOptions {
    pub filename: Option<String>,
    pub x_values: Option<String>,
    pub x_title: String,
    pub y_title: String,
    pub title: Option<String>,
    pub math_labels: bool,
}

impl Default for PlotOptions {
    fn default() -> Self {
        Self {
            filename: None,
            x_values: None,
            x_title: "Cache size".to_string(),
            y_title: "Cache misses".to_string(),
            title: None,
            math_labels: false,
        }
    }
}

#[derive(Debug)]
pub struct GenerateOptions {
    pub range: String,
    pub out_dir: PathBuf,
    pub backends: Option<String>,
    pub writes: Option<u64>,
    pub seed: Option<u64>,
    pub check: bool,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            range: String::new(),
            out_dir: PathBuf::from("workload"),
            backends: None,
            writes: None,
            seed: None,
            check: false,
        }
    }
}

/// Parse an inclusive LO:HI range. An inverted range is rejected here so the
/// generator's documented precondition holds for every CLI invocation.
fn parse_range(arg: &str) -> Result<(u64, u64)> {
    let (lo, hi) = arg
        .split_once(':')
        .with_context(|| format!("Range should look like LO:HI, got '{arg}'"))?;
    let lo: u64 = lo
        .trim()
        .parse()
        .with_context(|| format!("Invalid range start '{}'", lo.trim()))?;
    let hi: u64 = hi
        .trim()
        .parse()
        .with_context(|| format!("Invalid range end '{}'", hi.trim()))?;
    if lo > hi {
        bail!("Range start {lo} exceeds range end {hi}");
    }
    Ok((lo, hi))
}

/// Record count of an inclusive range, `hi - lo + 1`, saturating so the full
/// `u64` range does not overflow the count.
fn range_len((lo, hi): (u64, u64)) -> u64 {
    (hi - lo).saturating_add(1)
}

fn parse_x_values(arg: &str) -> Result<Vec<u64>> {
    arg.split(',')
        .map(|token| {
            let token = token.trim();
            token
                .parse()
                .with_context(|| format!("Invalid x value '{token}'"))
        })
        .collect()
}

fn parse_backends(arg: &Option<String>) -> Result<Vec<Backend>> {
    match arg {
        Some(arg) => arg.split(',').map(Backend::from_arg).collect(),
        None => Ok(Backend::all().to_vec()),
    }
}

struct AppRunner {
    chart: MissChart,
    theme: Theme,
    input_handler: InputHandler,
}

impl AppRunner {
    fn new(chart: MissChart) -> AppRunner {
        let original_panic_hook = panic::take_hook();

        panic::set_hook(Box::new(move |info| {
            // Restore terminal states first so that the backtrace on panic can
            // be printed with proper line breaks
            disable_raw_mode().unwrap();
            execute!(std::io::stderr(), LeaveAlternateScreen).unwrap();
            original_panic_hook(info);
        }));

        AppRunner {
            chart,
            theme: Theme::default(),
            input_handler: InputHandler::new(),
        }
    }

    fn run(&mut self) -> Result<()> {
        enable_raw_mode()?;
        let mut output = std::io::stderr();
        execute!(output, EnterAlternateScreen)?;

        let backend = CrosstermBackend::new(LineWriter::new(output));
        let mut terminal = Terminal::new(backend)?;

        loop {
            terminal.draw(|f| self.chart.render(f, &self.theme))?;
            match self.input_handler.next()? {
                Control::Quit => return Ok(()),
                Control::ToggleLevel(level) => self.chart.toggle_level(level),
                Control::Redraw | Control::Nothing => {}
            }
        }
    }
}

impl Drop for AppRunner {
    fn drop(&mut self) {
        // If panicked, restoring of terminal states would have been done in the
        // panic hook. Avoid doing that twice since that would clear the printed
        // backtrace.
        if !panicking() {
            disable_raw_mode().unwrap();
            execute!(std::io::stderr(), LeaveAlternateScreen).unwrap();
        }
    }
}

/// Read miss counts, build the chart and keep it on screen until quit. The
/// chart draws on stderr and reads events from the tty, so stdin can stay a
/// data pipe.
pub fn run_plot(options: PlotOptions) -> Result<()> {
    let samples = match &options.filename {
        Some(filename) => {
            // Only a genuinely missing file becomes FileNotFound; permission
            // and other open failures keep their own error.
            let file = File::open(filename).map_err(|e| match e.kind() {
                ErrorKind::NotFound => BenchlensError::FileNotFound(filename.clone()),
                _ => BenchlensError::Io(e),
            })?;
            read_samples(BufReader::new(file))?
        }
        None => read_samples(std::io::stdin().lock())?,
    };
    if samples.is_empty() {
        bail!("No samples to plot");
    }

    let x_values = options.x_values.as_deref().map(parse_x_values).transpose()?;
    let config = PlotConfig {
        title: options.title,
        x_title: options.x_title,
        y_title: options.y_title,
        math_labels: options.math_labels,
        x_values,
    };
    let chart = MissChart::new(&samples, config)?;

    let mut app_runner = AppRunner::new(chart);
    app_runner.run()
}

/// Emit the `<name>_data` and `<name>_query` files for each selected backend.
///
/// All files in one run share one seed, drawn at random when the caller gave
/// none, so every backend sees the same values and the outputs stay
/// comparable across stores. The drawn seed is reported for reproduction.
pub fn run_generate(options: GenerateOptions) -> Result<()> {
    let range = parse_range(&options.range)?;
    let backends = parse_backends(&options.backends)?;
    let writes = options.writes.unwrap_or_else(|| range_len(range));

    let seed = options.seed.unwrap_or_else(rand::random);
    if options.seed.is_none() {
        eprintln!("No seed given; using {seed}");
    }

    std::fs::create_dir_all(&options.out_dir)
        .with_context(|| format!("Failed to create directory: {}", options.out_dir.display()))?;

    for backend in backends {
        let format = backend.format();
        let data_path = options.out_dir.join(format!("{}_data", format.name()));
        let query_path = options.out_dir.join(format!("{}_query", format.name()));

        let count = generate_write_list(format, range, &data_path, writes, Some(seed))?;
        eprintln!("{}: {count} write records", data_path.display());
        let count = generate_query_list(format, range, &query_path, Some(seed))?;
        eprintln!("{}: {count} query records", query_path.display());

        if options.check {
            for path in [&data_path, &query_path] {
                let summary = check_stream(path, format.delimiter())?;
                eprintln!(
                    "{}: {} records x {} columns ok",
                    path.display(),
                    summary.records,
                    summary.columns
                );
            }
        }
    }

    Ok(())
}

/// Run benchlens with a list of arguments. The accepted arguments are the
/// same as the command line arguments for the benchlens binary.
///
/// Example:
///
/// ```no_run
/// use benchlens::run_benchlens;
///
/// if let Err(e) = run_benchlens(&["generate", "--range", "1:1000", "--seed", "42"]) {
///     eprintln!("Error: {e:?}");
/// }
/// ```
#[cfg(feature = "cli")]
pub fn run_benchlens<I, T>(args: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let mut args_items = vec![OsString::from("benchlens")];
    for item in args {
        args_items.push(item.into());
    }
    let args = Args::parse_from(args_items);
    match args.command {
        Command::Plot(plot_args) => run_plot(plot_args.into()),
        Command::Generate(generate_args) => run_generate(generate_args.into()),
    }
}

#[cfg(not(feature = "cli"))]
pub fn run_benchlens<I, T>(_args: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    eprintln!("Error: CLI is not enabled. Compile with the 'cli' feature to use this binary.");
    std::process::exit(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_range() {
        assert_eq!(parse_range("1:86400").unwrap(), (1, 86400));
        assert_eq!(parse_range(" 5 : 5 ").unwrap(), (5, 5));
    }

    #[test]
    fn test_parse_range_rejects_garbage() {
        assert!(parse_range("86400").is_err());
        assert!(parse_range("a:b").is_err());
        assert!(parse_range("9:1").is_err());
    }

    #[test]
    fn test_parse_x_values() {
        assert_eq!(parse_x_values("16, 32,64").unwrap(), vec![16, 32, 64]);
        assert!(parse_x_values("16,x").is_err());
    }

    #[test]
    fn test_parse_backends_default_is_all() {
        let backends = parse_backends(&None).unwrap();
        assert_eq!(backends, Backend::all().to_vec());
    }

    #[test]
    fn test_parse_backends_subset() {
        let backends = parse_backends(&Some("leveldb,influx".to_string())).unwrap();
        assert_eq!(backends, vec![Backend::LevelDb, Backend::InfluxDb]);
    }

    #[test]
    fn test_range_len_inclusive() {
        assert_eq!(range_len((1, 3)), 3);
        assert_eq!(range_len((5, 5)), 1);
        assert_eq!(range_len((0, u64::MAX)), u64::MAX);
    }

    #[test]
    fn test_plot_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let filename = dir.path().join("no_such_input").display().to_string();
        let options = PlotOptions {
            filename: Some(filename.clone()),
            ..PlotOptions::default()
        };
        let err = run_plot(options).unwrap_err();
        match err.downcast::<BenchlensError>().unwrap() {
            BenchlensError::FileNotFound(name) => assert_eq!(name, filename),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_plot_open_failure_keeps_io_error() {
        // A path whose parent is a regular file fails to open, but not with
        // NotFound; that must not be reported as a missing file.
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("occupied");
        std::fs::write(&file, "1 2 3\n").unwrap();
        let options = PlotOptions {
            filename: Some(file.join("nested").display().to_string()),
            ..PlotOptions::default()
        };
        let err = run_plot(options).unwrap_err();
        assert!(matches!(
            err.downcast::<BenchlensError>().unwrap(),
            BenchlensError::Io(_)
        ));
    }

    #[test]
    fn test_generate_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let options = GenerateOptions {
            range: "1:10".to_string(),
            out_dir: dir.path().join("out"),
            seed: Some(11),
            check: true,
            ..GenerateOptions::default()
        };
        run_generate(options).unwrap();

        for name in ["leveldb", "mariadb", "influxdb"] {
            let data = dir.path().join("out").join(format!("{name}_data"));
            let query = dir.path().join("out").join(format!("{name}_query"));
            assert_eq!(std::fs::read_to_string(&data).unwrap().lines().count(), 11);
            assert_eq!(std::fs::read_to_string(&query).unwrap().lines().count(), 11);
        }
    }
}
