//! What we know about a film locally, before asking the authority database.
//!
//! A [`FilmQuery`] is built once per input file by [`FilmQueryBuilder`] and is
//! treated as immutable afterwards, except for `known_cast` and
//! `known_directors` which accumulate identities as they are confirmed.

use std::{
  collections::{BTreeMap, BTreeSet},
  sync::LazyLock,
};

use chrono::{Datelike, NaiveDate};
use regex::Regex;
use reel_text::{
  NormalizeOptions, ParsedFilename, ReleaseDate, normalize_with, search_terms,
  strip_leading_article, title_key,
};
use serde::{Deserialize, Serialize};

use crate::{
  Error, Result,
  authority::PersonTable,
  config::MatchConfig,
  person::PersonRecord,
};

// ─── Cast composition ────────────────────────────────────────────────────────

/// Which authority tables a film's performers come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CastComposition {
  Male,
  Female,
  Mixed,
  #[default]
  Unclassified,
}

impl CastComposition {
  /// Composition implied by the tables of a film's credited cast.
  pub fn infer(tables: impl IntoIterator<Item = PersonTable>) -> Self {
    let (mut male, mut female) = (false, false);
    for table in tables {
      match table {
        PersonTable::Male => male = true,
        PersonTable::Female => female = true,
        PersonTable::Unknown => {}
      }
    }
    match (male, female) {
      (true, true) => Self::Mixed,
      (true, false) => Self::Male,
      (false, true) => Self::Female,
      (false, false) => Self::Unclassified,
    }
  }

  /// Whether a cast search hit filed under `table` is plausible.
  pub fn admits(self, table: PersonTable) -> bool {
    match self {
      Self::Male => table == PersonTable::Male,
      Self::Female => table == PersonTable::Female,
      Self::Mixed | Self::Unclassified => true,
    }
  }
}

// ─── Query ───────────────────────────────────────────────────────────────────

/// The locally known facts about a film.
#[derive(Debug, Clone, Serialize)]
pub struct FilmQuery {
  pub studio:             String,
  /// The authority database's own name for the studio, if it differs.
  pub alt_studio:         Option<String>,
  pub compare_studio:     String,
  pub compare_alt_studio: Option<String>,

  pub title:              String,
  /// Title with leading series segments removed.
  pub short_title:        String,
  pub series_segments:    Vec<String>,
  pub episode_titles:     Vec<String>,
  /// Every normalised, order-canonicalised title variant that counts as a
  /// match. Never empty.
  pub compare_title_keys: BTreeSet<String>,

  pub year:               Option<i32>,
  /// Defaults to December 31st of `year`; `None` only when `year` is.
  pub compare_date:       Option<NaiveDate>,

  pub duration_minutes:   Option<u32>,
  /// Multi-part release; running time of one part says nothing about the
  /// whole film.
  pub is_stacked:         bool,
  /// Compilations reuse old scenes, so career ranges are not checked.
  pub is_compilation:     bool,
  pub cast_composition:   CastComposition,

  pub known_cast:         BTreeMap<String, PersonRecord>,
  pub known_directors:    BTreeMap<String, PersonRecord>,
}

impl FilmQuery {
  pub fn builder(studio: impl Into<String>, title: impl Into<String>) -> FilmQueryBuilder {
    FilmQueryBuilder::new(studio, title)
  }

  /// Words to type into the authority database's search box.
  pub fn search_text(&self) -> String {
    search_terms(strip_leading_article(&self.short_title), NormalizeOptions::AUTHORITY)
  }
}

// ─── Builder ─────────────────────────────────────────────────────────────────

/// Trailing series number (`12`, `XIV`) on a series segment.
static SERIES_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"\s+(?:#?\d+|[IVXLC]+)$").expect("series number regex")
});

/// Assembles a [`FilmQuery`] and derives every comparison field.
#[derive(Debug, Clone)]
pub struct FilmQueryBuilder {
  studio:           String,
  alt_studio:       Option<String>,
  title:            String,
  year:             Option<i32>,
  release_date:     Option<NaiveDate>,
  duration_minutes: Option<u32>,
  stacked:          bool,
  compilation:      bool,
  composition:      CastComposition,
}

impl FilmQueryBuilder {
  pub fn new(studio: impl Into<String>, title: impl Into<String>) -> Self {
    Self {
      studio:           studio.into(),
      alt_studio:       None,
      title:            title.into(),
      year:             None,
      release_date:     None,
      duration_minutes: None,
      stacked:          false,
      compilation:      false,
      composition:      CastComposition::Unclassified,
    }
  }

  pub fn from_filename(parsed: ParsedFilename) -> Self {
    Self {
      alt_studio: parsed.alt_studio,
      year: parsed.year,
      stacked: parsed.stacked,
      ..Self::new(parsed.studio, parsed.title)
    }
  }

  pub fn alt_studio(mut self, alt: impl Into<String>) -> Self {
    self.alt_studio = Some(alt.into());
    self
  }

  pub fn year(mut self, year: i32) -> Self {
    self.year = Some(year);
    self
  }

  /// An exact release date; overrides the December 31st default.
  pub fn release_date(mut self, date: ReleaseDate) -> Self {
    self.release_date = Some(date.date);
    self.year = Some(date.year_number());
    self
  }

  pub fn duration_minutes(mut self, minutes: u32) -> Self {
    self.duration_minutes = Some(minutes);
    self
  }

  pub fn stacked(mut self, stacked: bool) -> Self {
    self.stacked = stacked;
    self
  }

  pub fn compilation(mut self, compilation: bool) -> Self {
    self.compilation = compilation;
    self
  }

  pub fn composition(mut self, composition: CastComposition) -> Self {
    self.composition = composition;
    self
  }

  pub fn build(self, config: &MatchConfig) -> Result<FilmQuery> {
    let studio = self.studio.trim().to_string();
    if studio.is_empty() {
      return Err(Error::EmptyStudio);
    }
    let title = self.title.trim().to_string();
    if title.is_empty() {
      return Err(Error::EmptyTitle);
    }

    let alt_studio = self
      .alt_studio
      .or_else(|| config.studio_alias(&studio).map(str::to_string))
      .filter(|alt| !alt.trim().is_empty());

    let mut segments: Vec<String> = title
      .split(" - ")
      .map(str::trim)
      .filter(|s| !s.is_empty())
      .map(str::to_string)
      .collect();
    let short_title = segments.pop().unwrap_or_else(|| title.clone());
    let series_segments = segments;

    let episode_titles: Vec<String> = series_segments
      .iter()
      .map(|segment| format!("{segment} {short_title}"))
      .collect();

    let mut variants: Vec<String> = vec![
      title.clone(),
      short_title.clone(),
      strip_leading_article(&title).to_string(),
      strip_leading_article(&short_title).to_string(),
    ];
    variants.extend(episode_titles.iter().cloned());
    for segment in &series_segments {
      let series = SERIES_NUMBER.replace(segment, "");
      if !series.trim().is_empty() {
        variants.push(format!("{} {short_title}", series.trim()));
      }
    }

    let compare_title_keys: BTreeSet<String> = variants
      .iter()
      .map(|v| title_key(v))
      .filter(|k| !k.is_empty())
      .collect();
    if compare_title_keys.is_empty() {
      return Err(Error::NoComparableTitle(title));
    }

    if let Some(year) = self.year
      && !(1000..=9999).contains(&year)
    {
      return Err(Error::InvalidYear(year));
    }
    let compare_date = match (self.release_date, self.year) {
      (Some(date), _) => Some(date),
      (None, Some(year)) => ReleaseDate::year(year).map(|d| d.date),
      (None, None) => None,
    };

    Ok(FilmQuery {
      compare_studio: normalize_with(&studio, NormalizeOptions::STUDIO),
      compare_alt_studio: alt_studio
        .as_deref()
        .map(|alt| normalize_with(alt, NormalizeOptions::STUDIO)),
      studio,
      alt_studio,
      title,
      short_title,
      series_segments,
      episode_titles,
      compare_title_keys,
      year: self.year.or(compare_date.map(|d| d.year())),
      compare_date,
      duration_minutes: self.duration_minutes,
      is_stacked: self.stacked,
      is_compilation: self.compilation,
      cast_composition: self.composition,
      known_cast: BTreeMap::new(),
      known_directors: BTreeMap::new(),
    })
  }
}
