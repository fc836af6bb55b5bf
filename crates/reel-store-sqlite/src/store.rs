//! [`SqliteMirror`]: the SQLite implementation of [`AuthorityClient`].

use std::{
  path::Path,
  sync::{Mutex, MutexGuard},
};

use chrono::Datelike as _;
use rusqlite::{Connection, OptionalExtension as _, Transaction, types::Value};
use tracing::{debug, info};

use reel_core::{
  authority::{
    AuthorityClient, AuthorityError, AuthorityFilm, AuthorityPerson, FilmSearch,
    FilmSummary, PersonSearch,
  },
  person::PersonRole,
};
use reel_text::name_key;

use crate::{
  Error, Result,
  dump::{AuthorityDump, ImportSummary},
  encode::{
    RawFilm, RawPerson, decode_date, encode_date, encode_role, encode_table,
    encode_title_words, name_soundex, person_key,
  },
  schema::{MIGRATE_V1, SCHEMA, SCHEMA_VERSION},
};

/// Years either side of the searched year a film's earliest date may fall
/// in. Covers the two-year authority release-date tolerance.
const SEARCH_YEAR_WINDOW: i64 = 2;

// ─── Mirror ──────────────────────────────────────────────────────────────────

/// Authority records mirrored into a single SQLite file.
pub struct SqliteMirror {
  conn: Mutex<Connection>,
}

impl SqliteMirror {
  /// Open (or create) a mirror at `path` and run schema initialisation.
  pub fn open(path: impl AsRef<Path>) -> Result<Self> {
    Self::init(Connection::open(path)?)
  }

  /// Open a private in-memory mirror.
  pub fn open_in_memory() -> Result<Self> { Self::init(Connection::open_in_memory()?) }

  pub(crate) fn init(conn: Connection) -> Result<Self> {
    let version: i64 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;
    if version == 1 {
      conn.execute_batch(MIGRATE_V1)?;
    }
    conn.execute_batch(SCHEMA)?;
    if version != SCHEMA_VERSION {
      debug!(from = version, to = SCHEMA_VERSION, "mirror schema initialised");
    }
    Ok(Self { conn: Mutex::new(conn) })
  }

  fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
    self.conn.lock().map_err(|_| Error::Poisoned)
  }

  // ── Import ──

  /// Upsert every film and person in `dump` in one transaction.
  ///
  /// A sparse record never erases detail already stored: missing career
  /// years, an unknown table or an empty alias list leave the stored values
  /// alone.
  pub fn import(&self, dump: &AuthorityDump) -> Result<ImportSummary> {
    let mut conn = self.conn()?;
    let tx = conn.transaction()?;
    let mut summary = ImportSummary::default();

    for entry in &dump.people {
      upsert_person(&tx, &entry.person)?;
      for role in &entry.roles {
        grant_role(&tx, &person_key(&entry.person), *role)?;
      }
      summary.people += 1;
    }

    for film in &dump.films {
      upsert_film(&tx, film)?;
      for (role, people) in
        [(PersonRole::Cast, &film.cast), (PersonRole::Director, &film.directors)]
      {
        for (position, person) in people.iter().enumerate() {
          upsert_person(&tx, person)?;
          let key = person_key(person);
          grant_role(&tx, &key, role)?;
          tx.execute(
            "INSERT INTO credits (film_url, person_key, role, position)
             VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params![film.url, key, encode_role(role), position as i64],
          )?;
          summary.credits += 1;
        }
      }
      summary.films += 1;
    }

    tx.commit()?;
    info!(films = summary.films, people = summary.people, credits = summary.credits, "import complete");
    Ok(summary)
  }

  // ── Queries ──

  fn films_matching(&self, search: &FilmSearch) -> Result<Vec<FilmSummary>> {
    let words: Vec<&str> = search.text.split_whitespace().collect();
    if words.is_empty() {
      return Ok(Vec::new());
    }

    let mut sql = String::from("SELECT url, title, year FROM films WHERE 1 = 1");
    let mut params: Vec<Value> = Vec::with_capacity(words.len() + 2);
    for word in &words {
      params.push(Value::Text(format!("% {word} %")));
      sql.push_str(&format!(" AND title_words LIKE ?{}", params.len()));
    }
    if let Some(year) = search.year {
      params.push(Value::Integer(i64::from(year) - SEARCH_YEAR_WINDOW));
      params.push(Value::Integer(i64::from(year) + SEARCH_YEAR_WINDOW));
      let n = params.len();
      sql.push_str(&format!(
        " AND (earliest_year IS NULL OR earliest_year BETWEEN ?{} AND ?{n})",
        n - 1
      ));
    }
    // Exact title first, then shortest titles, the way a search page ranks.
    params.push(Value::Text(format!(" {} ", words.join(" "))));
    sql.push_str(&format!(
      " ORDER BY title_words = ?{} DESC, length(title_words), title",
      params.len()
    ));

    let conn = self.conn()?;
    let mut stmt = conn.prepare(&sql)?;
    let found = stmt
      .query_map(rusqlite::params_from_iter(params.iter()), |row| {
        Ok(FilmSummary { url: row.get(0)?, title: row.get(1)?, year: row.get(2)? })
      })?
      .collect::<rusqlite::Result<Vec<_>>>()?;
    debug!(text = %search.text, count = found.len(), "film search");
    Ok(found)
  }

  fn load_film(&self, url: &str) -> Result<AuthorityFilm> {
    let conn = self.conn()?;
    let raw = conn
      .query_row(
        "SELECT url, title, release_date, date_added, duration_minutes, compilation
         FROM films WHERE url = ?1",
        rusqlite::params![url],
        |row| {
          Ok(RawFilm {
            url:              row.get(0)?,
            title:            row.get(1)?,
            release_date:     row.get(2)?,
            date_added:       row.get(3)?,
            duration_minutes: row.get(4)?,
            compilation:      row.get(5)?,
          })
        },
      )
      .optional()?
      .ok_or_else(|| Error::FilmNotFound(url.to_string()))?;

    let studios = conn
      .prepare("SELECT name FROM film_studios WHERE film_url = ?1 ORDER BY position")?
      .query_map(rusqlite::params![url], |row| row.get(0))?
      .collect::<rusqlite::Result<Vec<String>>>()?;

    let cross_site_dates = conn
      .prepare("SELECT date FROM film_dates WHERE film_url = ?1 ORDER BY date")?
      .query_map(rusqlite::params![url], |row| row.get::<_, String>(0))?
      .collect::<rusqlite::Result<Vec<_>>>()?
      .iter()
      .map(|s| decode_date(s))
      .collect::<Result<Vec<_>>>()?;

    let cast = credited(&conn, url, PersonRole::Cast)?;
    let directors = credited(&conn, url, PersonRole::Director)?;
    let (release_date, date_added) = raw.decode_dates()?;

    Ok(AuthorityFilm {
      title: raw.title,
      url: raw.url,
      studios,
      release_date,
      date_added,
      cross_site_dates,
      duration_minutes: raw.duration_minutes,
      compilation: raw.compilation,
      cast,
      directors,
    })
  }

  /// People searchable in `role` whose name or alias contains the search
  /// name, or whose name sounds like it.
  fn people_matching(&self, search: &PersonSearch) -> Result<Vec<AuthorityPerson>> {
    let key = name_key(&search.name);
    if key.is_empty() {
      return Ok(Vec::new());
    }

    let conn = self.conn()?;
    let sql = format!(
      "SELECT {} FROM people p
       JOIN person_roles r ON r.person_key = p.person_key AND r.role = ?1
       WHERE p.name_key LIKE ?2
          OR p.name_soundex = ?3
          OR EXISTS (SELECT 1 FROM aliases a
                     WHERE a.person_key = p.person_key AND a.alias_key LIKE ?2)
       ORDER BY p.name_key = ?4 DESC, p.name",
      RawPerson::COLUMNS
    );
    let raws = conn
      .prepare(&sql)?
      .query_map(
        rusqlite::params![
          encode_role(search.role),
          format!("%{key}%"),
          name_soundex(&search.name),
          key
        ],
        RawPerson::from_row,
      )?
      .collect::<rusqlite::Result<Vec<_>>>()?;

    let found = raws
      .into_iter()
      .map(|raw| {
        let aliases = aliases_of(&conn, &raw.person_key)?;
        raw.into_person(aliases)
      })
      .collect::<Result<Vec<_>>>()?;
    debug!(name = %search.name, role = ?search.role, count = found.len(), "person search");
    Ok(found)
  }
}

// ─── Row helpers ─────────────────────────────────────────────────────────────

fn upsert_film(tx: &Transaction<'_>, film: &AuthorityFilm) -> Result<()> {
  tx.execute(
    "INSERT INTO films
       (url, title, title_words, year, earliest_year, release_date, date_added,
        duration_minutes, compilation)
     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
     ON CONFLICT(url) DO UPDATE SET
       title = excluded.title,
       title_words = excluded.title_words,
       year = excluded.year,
       earliest_year = excluded.earliest_year,
       release_date = excluded.release_date,
       date_added = excluded.date_added,
       duration_minutes = excluded.duration_minutes,
       compilation = excluded.compilation",
    rusqlite::params![
      film.url,
      film.title,
      encode_title_words(&film.title),
      film.summary().year,
      film.earliest_date().map(|d| d.year()),
      film.release_date.map(encode_date),
      film.date_added.map(encode_date),
      film.duration_minutes,
      film.compilation,
    ],
  )?;

  for table in ["film_studios", "film_dates", "credits"] {
    tx.execute(&format!("DELETE FROM {table} WHERE film_url = ?1"), rusqlite::params![film.url])?;
  }
  for (position, studio) in film.studios.iter().enumerate() {
    tx.execute(
      "INSERT INTO film_studios (film_url, position, name) VALUES (?1, ?2, ?3)",
      rusqlite::params![film.url, position as i64, studio],
    )?;
  }
  for date in &film.cross_site_dates {
    tx.execute(
      "INSERT OR IGNORE INTO film_dates (film_url, date) VALUES (?1, ?2)",
      rusqlite::params![film.url, encode_date(*date)],
    )?;
  }
  Ok(())
}

fn upsert_person(tx: &Transaction<'_>, person: &AuthorityPerson) -> Result<()> {
  let key = person_key(person);
  tx.execute(
    "INSERT INTO people
       (person_key, name, name_key, name_soundex, url, career_start, career_end, person_table)
     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
     ON CONFLICT(person_key) DO UPDATE SET
       name = excluded.name,
       name_key = excluded.name_key,
       name_soundex = excluded.name_soundex,
       career_start = COALESCE(excluded.career_start, people.career_start),
       career_end = COALESCE(excluded.career_end, people.career_end),
       person_table = CASE excluded.person_table
         WHEN 'unknown' THEN people.person_table
         ELSE excluded.person_table
       END",
    rusqlite::params![
      key,
      person.name,
      name_key(&person.name),
      name_soundex(&person.name),
      person.url,
      person.career_start,
      person.career_end,
      encode_table(person.table),
    ],
  )?;

  if !person.aliases.is_empty() {
    tx.execute("DELETE FROM aliases WHERE person_key = ?1", rusqlite::params![key])?;
    for (position, alias) in person.aliases.iter().enumerate() {
      tx.execute(
        "INSERT INTO aliases (person_key, position, alias, alias_key) VALUES (?1, ?2, ?3, ?4)",
        rusqlite::params![key, position as i64, alias, name_key(alias)],
      )?;
    }
  }
  Ok(())
}

fn grant_role(tx: &Transaction<'_>, key: &str, role: PersonRole) -> Result<()> {
  tx.execute(
    "INSERT OR IGNORE INTO person_roles (person_key, role) VALUES (?1, ?2)",
    rusqlite::params![key, encode_role(role)],
  )?;
  Ok(())
}

fn aliases_of(conn: &Connection, key: &str) -> Result<Vec<String>> {
  Ok(
    conn
      .prepare("SELECT alias FROM aliases WHERE person_key = ?1 ORDER BY position")?
      .query_map(rusqlite::params![key], |row| row.get(0))?
      .collect::<rusqlite::Result<Vec<String>>>()?,
  )
}

fn credited(conn: &Connection, url: &str, role: PersonRole) -> Result<Vec<AuthorityPerson>> {
  let sql = format!(
    "SELECT {} FROM credits c JOIN people p ON p.person_key = c.person_key
     WHERE c.film_url = ?1 AND c.role = ?2 ORDER BY c.position",
    RawPerson::COLUMNS
  );
  let raws = conn
    .prepare(&sql)?
    .query_map(rusqlite::params![url, encode_role(role)], RawPerson::from_row)?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  raws
    .into_iter()
    .map(|raw| {
      let aliases = aliases_of(conn, &raw.person_key)?;
      raw.into_person(aliases)
    })
    .collect()
}

// ─── AuthorityClient ─────────────────────────────────────────────────────────

impl AuthorityClient for SqliteMirror {
  fn search_films(&self, search: &FilmSearch) -> Result<Vec<FilmSummary>, AuthorityError> {
    self.films_matching(search).map_err(AuthorityError::backend)
  }

  fn film_details(&self, summary: &FilmSummary) -> Result<AuthorityFilm, AuthorityError> {
    self.load_film(&summary.url).map_err(|err| match err {
      Error::FilmNotFound(url) => AuthorityError::Unavailable(format!("no film page at {url}")),
      other => AuthorityError::backend(other),
    })
  }

  fn search_people(&self, search: &PersonSearch) -> Result<Vec<AuthorityPerson>, AuthorityError> {
    self.people_matching(search).map_err(AuthorityError::backend)
  }
}
