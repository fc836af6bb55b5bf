//! SQL schema for the authority mirror.
//!
//! Executed once at connection startup. `PRAGMA user_version` records the
//! layout so later migrations can be gated on it.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS films (
    url              TEXT PRIMARY KEY,
    title            TEXT NOT NULL,
    title_words      TEXT NOT NULL,   -- lower-case search words
    year             INTEGER,
    earliest_year    INTEGER,         -- year of the earliest date on the page
    release_date     TEXT,            -- YYYY-MM-DD
    date_added       TEXT,
    duration_minutes INTEGER,
    compilation      INTEGER NOT NULL DEFAULT 0
);

-- Studio first (position 0), then distributors.
CREATE TABLE IF NOT EXISTS film_studios (
    film_url TEXT NOT NULL REFERENCES films(url) ON DELETE CASCADE,
    position INTEGER NOT NULL,
    name     TEXT NOT NULL,
    PRIMARY KEY (film_url, position)
);

-- Release dates listed by cross-linked sites.
CREATE TABLE IF NOT EXISTS film_dates (
    film_url TEXT NOT NULL REFERENCES films(url) ON DELETE CASCADE,
    date     TEXT NOT NULL,
    PRIMARY KEY (film_url, date)
);

-- person_key is the page URL, or 'name:<name key>' for people without one.
CREATE TABLE IF NOT EXISTS people (
    person_key   TEXT PRIMARY KEY,
    name         TEXT NOT NULL,
    name_key     TEXT NOT NULL,
    name_soundex TEXT NOT NULL,
    url          TEXT,
    career_start INTEGER,
    career_end   INTEGER,
    person_table TEXT NOT NULL DEFAULT 'unknown'   -- 'male' | 'female' | 'unknown'
);

CREATE TABLE IF NOT EXISTS aliases (
    person_key TEXT NOT NULL REFERENCES people(person_key) ON DELETE CASCADE,
    position   INTEGER NOT NULL,
    alias      TEXT NOT NULL,
    alias_key  TEXT NOT NULL,
    PRIMARY KEY (person_key, position)
);

-- Which credit lists a person can be searched in.
CREATE TABLE IF NOT EXISTS person_roles (
    person_key TEXT NOT NULL REFERENCES people(person_key) ON DELETE CASCADE,
    role       TEXT NOT NULL,   -- 'cast' | 'director'
    PRIMARY KEY (person_key, role)
);

CREATE TABLE IF NOT EXISTS credits (
    film_url   TEXT NOT NULL REFERENCES films(url) ON DELETE CASCADE,
    person_key TEXT NOT NULL REFERENCES people(person_key),
    role       TEXT NOT NULL,
    position   INTEGER NOT NULL,
    PRIMARY KEY (film_url, role, position)
);

CREATE INDEX IF NOT EXISTS films_earliest_idx   ON films(earliest_year);
CREATE INDEX IF NOT EXISTS people_name_key_idx  ON people(name_key);
CREATE INDEX IF NOT EXISTS people_soundex_idx   ON people(name_soundex);
CREATE INDEX IF NOT EXISTS aliases_key_idx      ON aliases(alias_key);
CREATE INDEX IF NOT EXISTS credits_person_idx   ON credits(person_key);

PRAGMA user_version = 2;
";

/// Layout version written by [`SCHEMA`].
pub const SCHEMA_VERSION: i64 = 2;

/// Version 1 filtered film searches on the release year alone.
pub const MIGRATE_V1: &str = "
ALTER TABLE films ADD COLUMN earliest_year INTEGER;

UPDATE films SET earliest_year = CAST(substr(min(
    COALESCE(release_date, '9999'),
    COALESCE(date_added, '9999'),
    COALESCE((SELECT MIN(date) FROM film_dates WHERE film_dates.film_url = films.url), '9999')
), 1, 4) AS INTEGER);
UPDATE films SET earliest_year = NULL WHERE earliest_year = 9999;

DROP INDEX IF EXISTS films_year_idx;
";
