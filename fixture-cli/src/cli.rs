use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use fixture_verifier::output::{write_human, write_json};
use fixture_verifier::{
    Assertion, Expectations, FormatKind, FsSourceConfig, JsonDecoder, Resource, VerifyConfig,
    classify, scan_archive, verify_archive, verify_fs, verify_resource,
};

use crate::logging;

#[derive(Debug, Parser)]
#[command(name = "fixcheck")]
#[command(about = "Classify, decode and verify test fixtures", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Raise log verbosity (-v info, -vv debug, -vvv trace); `RUST_LOG` overrides
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the format kind of each resource name
    Classify {
        #[arg(required = true, value_name = "NAME")]
        names: Vec<String>,
    },
    /// List the entries of a ZIP archive
    Scan {
        #[arg(value_name = "ARCHIVE")]
        archive: PathBuf,
    },
    /// Verify a single file against ad-hoc or known assertions
    Verify(VerifyArgs),
    /// Verify every fixture found under the given paths
    Check(CheckArgs),
}

/// JSON backend selectable on the command line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum DecoderArg {
    #[default]
    SerdeJson,
    Saphyr,
}

impl From<DecoderArg> for JsonDecoder {
    fn from(arg: DecoderArg) -> Self {
        match arg {
            DecoderArg::SerdeJson => Self::SerdeJson,
            DecoderArg::Saphyr => Self::Saphyr,
        }
    }
}

/// A CSV row given as `A,B,...`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row(pub Vec<String>);

#[derive(Debug, Args)]
pub struct VerifyArgs {
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Expected page count (PDF)
    #[arg(long, value_name = "N")]
    pub pages: Option<usize>,

    /// Text the content must contain
    #[arg(long, value_name = "TEXT")]
    pub contains: Vec<String>,

    /// Cell containing text, as `SHEET:ROW:COL=TEXT` (zero-based)
    #[arg(long = "cell", value_name = "S:R:C=TEXT", value_parser = parse_cell)]
    pub cells: Vec<Assertion>,

    /// CSV row that must be present, as `A,B,...`
    #[arg(long = "row", value_name = "A,B", value_parser = parse_row)]
    pub rows: Vec<Row>,

    /// JSON field containing text, as `PATH=TEXT` (dotted path)
    #[arg(long = "field", value_name = "PATH=TEXT", value_parser = parse_field)]
    pub fields: Vec<Assertion>,

    /// Archive entry that must be present
    #[arg(long = "entry", value_name = "NAME")]
    pub entries: Vec<String>,

    /// Exact number of file entries in the archive
    #[arg(long, value_name = "N")]
    pub entry_count: Option<usize>,

    /// Expectations manifest (JSON or YAML) used when no assertions are given
    #[arg(long, value_name = "FILE")]
    pub manifest: Option<PathBuf>,

    /// JSON backend
    #[arg(long, value_enum, default_value_t = DecoderArg::SerdeJson)]
    pub json_decoder: DecoderArg,
}

impl VerifyArgs {
    /// Assertions given on the command line, in a fixed order:
    /// pages, contains, cells, rows, fields, entries, entry count.
    #[must_use]
    pub fn assertions(&self) -> Vec<Assertion> {
        let mut assertions = Vec::new();
        if let Some(pages) = self.pages {
            assertions.push(Assertion::PageCount(pages));
        }
        assertions.extend(self.contains.iter().cloned().map(Assertion::Contains));
        assertions.extend(self.cells.iter().cloned());
        if !self.rows.is_empty() {
            assertions.push(Assertion::ContainsRows(
                self.rows.iter().map(|row| row.0.clone()).collect(),
            ));
        }
        assertions.extend(self.fields.iter().cloned());
        assertions.extend(self.entries.iter().cloned().map(Assertion::HasEntry));
        if let Some(count) = self.entry_count {
            assertions.push(Assertion::EntryCount(count));
        }
        assertions
    }
}

#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Files or directories to scan
    #[arg(required = true, value_name = "PATH")]
    pub paths: Vec<PathBuf>,

    /// Expectations manifest (JSON or YAML), merged over the reference set
    #[arg(long, value_name = "FILE")]
    pub manifest: Option<PathBuf>,

    /// Exclude glob pattern (repeatable)
    #[arg(long, value_name = "GLOB")]
    pub exclude: Vec<String>,

    /// Also decode recognized files that have no expectations
    #[arg(long)]
    pub verify_unlisted: bool,

    /// Follow symbolic links while scanning
    #[arg(long)]
    pub follow_links: bool,

    /// Maximum directory depth
    #[arg(long, default_value_t = 64)]
    pub max_depth: usize,

    /// JSON backend
    #[arg(long, value_enum, default_value_t = DecoderArg::SerdeJson)]
    pub json_decoder: DecoderArg,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

fn parse_cell(value: &str) -> Result<Assertion, String> {
    let (position, text) = value
        .split_once('=')
        .ok_or_else(|| format!("expected SHEET:ROW:COL=TEXT, got '{value}'"))?;
    let parts: Vec<&str> = position.split(':').collect();
    let &[sheet, row, col] = parts.as_slice() else {
        return Err(format!("expected SHEET:ROW:COL before '=', got '{position}'"));
    };
    let index = |part: &str, what: &str| {
        part.trim()
            .parse::<usize>()
            .map_err(|e| format!("invalid {what} '{part}': {e}"))
    };
    Ok(Assertion::CellContains {
        sheet: index(sheet, "sheet")?,
        row: index(row, "row")?,
        col: index(col, "column")?,
        text: text.to_owned(),
    })
}

fn parse_row(value: &str) -> Result<Row, String> {
    if value.is_empty() {
        return Err("row must not be empty".to_owned());
    }
    Ok(Row(value.split(',').map(str::to_owned).collect()))
}

fn parse_field(value: &str) -> Result<Assertion, String> {
    match value.split_once('=') {
        Some((path, text)) if !path.is_empty() => Ok(Assertion::FieldContains {
            path: path.to_owned(),
            text: text.to_owned(),
        }),
        _ => Err(format!("expected PATH=TEXT, got '{value}'")),
    }
}

/// Parse arguments from the environment, set up logging and run the command.
///
/// Returns `Ok(false)` when something was checked and failed.
///
/// # Errors
///
/// Returns an error if the command could not run at all (bad paths,
/// unreadable manifest, unreadable archive).
pub fn run() -> anyhow::Result<bool> {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    logging::configure_colors();

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    execute(&cli, &mut out)
}

/// Run a parsed command, writing its output to `out`.
///
/// # Errors
///
/// See [`run`].
pub fn execute(cli: &Cli, out: &mut dyn Write) -> anyhow::Result<bool> {
    match &cli.command {
        Command::Classify { names } => classify_names(names, out),
        Command::Scan { archive } => scan(archive, out),
        Command::Verify(args) => verify_file(args, out),
        Command::Check(args) => check(args, out),
    }
}

fn classify_names(names: &[String], out: &mut dyn Write) -> anyhow::Result<bool> {
    let mut all_known = true;
    for name in names {
        match classify(name) {
            Ok(kind) => writeln!(out, "{name}\t{kind}")?,
            Err(err) => {
                all_known = false;
                writeln!(out, "{err}")?;
            }
        }
    }
    Ok(all_known)
}

fn scan(archive: &Path, out: &mut dyn Write) -> anyhow::Result<bool> {
    let resource = Resource::file(archive);
    let bytes = resource.read(VerifyConfig::default().max_resource_size)?;
    let index = scan_archive(&resource.name, &bytes)?;

    writeln!(out, "{}: {} entries", resource.location(), index.len())?;
    for entry in &index.entries {
        let range = entry.byte_range();
        let name = if entry.is_dir {
            format!("{} (dir)", entry.name)
        } else {
            entry.name.clone()
        };
        writeln!(
            out,
            "{:>4}  {:>10}  {:>10}..{:<10}  {name}",
            entry.index, entry.size, range.start, range.end
        )?;
    }
    Ok(true)
}

fn load_expectations(manifest: Option<&Path>) -> anyhow::Result<Expectations> {
    let mut expectations = Expectations::reference();
    if let Some(path) = manifest {
        expectations.merge(Expectations::from_manifest(path)?);
        tracing::info!(manifest = %path.display(), "loaded expectations manifest");
    }
    Ok(expectations)
}

fn verify_file(args: &VerifyArgs, out: &mut dyn Write) -> anyhow::Result<bool> {
    let expectations = load_expectations(args.manifest.as_deref())?;
    let mut config = VerifyConfig::default();
    config.json_decoder = args.json_decoder.into();

    let resource = Resource::file(&args.file);
    let mut assertions = args.assertions();
    if assertions.is_empty()
        && let Some(known) = expectations.get(&resource.name)
    {
        assertions = known.to_vec();
    }

    let result = verify_resource(&resource, &assertions, &config);
    writeln!(out, "{}", logging::format_result(&result))?;
    let mut ok = result.outcome.is_pass();

    if ok && result.kind == Some(FormatKind::Archive) {
        let bytes = resource.read(config.max_resource_size)?;
        let location = resource.location();
        for entry_result in verify_archive(&location, &bytes, &expectations, &config)
            .with_context(|| format!("Failed to scan {location}"))?
        {
            writeln!(out, "{}", logging::format_result(&entry_result))?;
            ok &= entry_result.outcome.is_pass();
        }
    }
    Ok(ok)
}

fn check(args: &CheckArgs, out: &mut dyn Write) -> anyhow::Result<bool> {
    let expectations = load_expectations(args.manifest.as_deref())?;

    let mut fs_config = FsSourceConfig::default();
    fs_config.paths.clone_from(&args.paths);
    fs_config.exclude.clone_from(&args.exclude);
    fs_config.verify_unlisted = args.verify_unlisted;
    fs_config.follow_links = args.follow_links;
    fs_config.max_depth = args.max_depth;

    let mut config = VerifyConfig::default();
    config.json_decoder = args.json_decoder.into();

    let report = verify_fs(&fs_config, &config, &expectations)?;
    if args.json {
        write_json(&report, out)?;
    } else {
        write_human(&report, out)?;
    }
    Ok(report.ok)
}
