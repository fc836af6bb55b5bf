//! `reel`: match a film file against the authority mirror.
//!
//! # Usage
//!
//! ```text
//! reel import authority-dump.json
//! reel match "Studio X - Boys in the Sand (2019).mp4" \
//!   --cast "Leo Rocha" --cast "James Dean" --director "Chi Chi LaRue"
//! ```
//!
//! Results are printed to stdout as JSON; logs go to stderr.

mod settings;
mod throttle;

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand, ValueEnum};
use reel_core::{
  authority::AuthorityClient,
  film::{CastComposition, FilmQueryBuilder},
};
use reel_store_sqlite::{AuthorityDump, SqliteMirror};
use settings::Settings;
use throttle::Throttled;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── CLI args ────────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "reel", author, version, about = "Film metadata matcher")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, global = true, default_value = "reel.toml")]
  config: PathBuf,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand)]
enum Command {
  /// Locate a film and resolve its credits.
  Match(MatchArgs),
  /// Load an authority JSON dump into the mirror.
  Import {
    /// JSON file with `films` and `people` arrays.
    dump: PathBuf,
  },
}

#[derive(Args)]
struct MatchArgs {
  /// Film file name, `Studio - Title (Year).ext`.
  filename: PathBuf,

  /// Scraped cast name; repeat for each performer.
  #[arg(long = "cast", value_name = "NAME")]
  cast: Vec<String>,

  /// Scraped director name; repeat for each director.
  #[arg(long = "director", value_name = "NAME")]
  directors: Vec<String>,

  #[arg(long, value_name = "N")]
  duration_minutes: Option<u32>,

  /// Exact release date from the source site, e.g. `2019-06-01`.
  #[arg(long, value_name = "DATE")]
  release_date: Option<String>,

  #[arg(long)]
  compilation: bool,

  #[arg(long, value_enum)]
  composition: Option<CompositionArg>,
}

#[derive(Clone, Copy, ValueEnum)]
enum CompositionArg {
  Male,
  Female,
  Mixed,
}

impl From<CompositionArg> for CastComposition {
  fn from(arg: CompositionArg) -> Self {
    match arg {
      CompositionArg::Male => Self::Male,
      CompositionArg::Female => Self::Female,
      CompositionArg::Mixed => Self::Mixed,
    }
  }
}

// ─── Entry point ─────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .with_writer(std::io::stderr)
    .init();

  let cli = Cli::parse();
  let settings = Settings::load(&cli.config)?;

  let store_path = settings.store_path();
  let mirror = SqliteMirror::open(&store_path)
    .with_context(|| format!("failed to open mirror at {store_path:?}"))?;

  match cli.command {
    Command::Import { dump } => import(&mirror, &dump),
    Command::Match(args) => {
      let client: Box<dyn AuthorityClient> = match settings.throttle {
        Some(throttle) => Box::new(Throttled::new(mirror, throttle)),
        None => Box::new(mirror),
      };
      run_match(client.as_ref(), &settings, args)
    }
  }
}

fn import(mirror: &SqliteMirror, path: &Path) -> anyhow::Result<()> {
  let dump = AuthorityDump::read(path)
    .with_context(|| format!("failed to read dump {path:?}"))?;
  let summary = mirror.import(&dump).context("import failed")?;
  println!("{}", serde_json::to_string_pretty(&summary)?);
  Ok(())
}

fn run_match(
  client: &dyn AuthorityClient,
  settings: &Settings,
  args: MatchArgs,
) -> anyhow::Result<()> {
  let stem = args
    .filename
    .file_stem()
    .and_then(|s| s.to_str())
    .with_context(|| format!("no file name in {:?}", args.filename))?;
  let parsed = reel_text::parse_filename(stem)
    .with_context(|| format!("cannot read studio and title from {stem:?}"))?;

  let mut builder = FilmQueryBuilder::from_filename(parsed).compilation(args.compilation);
  if let Some(minutes) = args.duration_minutes {
    builder = builder.duration_minutes(minutes);
  }
  if let Some(composition) = args.composition {
    builder = builder.composition(composition.into());
  }
  if let Some(text) = &args.release_date {
    match reel_text::parse_release_date(text) {
      Ok(date) => builder = builder.release_date(date),
      Err(err) => tracing::warn!("ignoring release date: {err}"),
    }
  }
  let mut query = builder.build(&settings.matching).context("invalid film query")?;

  let enrichment = reel_match::enrich(
    &mut query,
    args.cast.as_slice(),
    args.directors.as_slice(),
    client,
    &settings.matching,
  );
  for error in &enrichment.authority_errors {
    tracing::warn!("authority: {error}");
  }
  println!("{}", serde_json::to_string_pretty(&enrichment)?);
  Ok(())
}
