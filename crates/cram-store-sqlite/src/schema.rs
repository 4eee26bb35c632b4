//! SQL schema for the cram SQLite store.
//!
//! Every table carries `user_id` as the leading primary-key column —
//! ids are only unique within a partition, mirroring the per-user
//! collections of the hosted document store this backend replaces.
//! Executed once at connection startup via `PRAGMA user_version`.
//! Future migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS notes (
    user_id     TEXT NOT NULL,
    note_id     TEXT NOT NULL,
    title       TEXT NOT NULL,
    content     TEXT NOT NULL,
    topic       TEXT NOT NULL,
    tags        TEXT NOT NULL DEFAULT '[]',   -- JSON array of strings
    key_points  TEXT NOT NULL DEFAULT '[]',   -- JSON array of strings
    created_at  TEXT NOT NULL,                -- ISO 8601 UTC
    updated_at  TEXT NOT NULL,
    source      TEXT NOT NULL DEFAULT '{\"kind\":\"manual\"}',
    PRIMARY KEY (user_id, note_id)
);

CREATE TABLE IF NOT EXISTS flashcards (
    user_id       TEXT NOT NULL,
    card_id       TEXT NOT NULL,
    front         TEXT NOT NULL,
    back          TEXT NOT NULL,
    note_id       TEXT,             -- soft link; may dangle after note deletion
    topic         TEXT NOT NULL,
    difficulty    TEXT NOT NULL DEFAULT 'medium',
    last_reviewed TEXT,
    next_review   TEXT,
    repetitions   INTEGER NOT NULL DEFAULT 0,
    PRIMARY KEY (user_id, card_id)
);

-- Result tables are append-only; no UPDATE is ever issued against them.
CREATE TABLE IF NOT EXISTS quiz_results (
    user_id        TEXT NOT NULL,
    result_id      TEXT NOT NULL,
    topic          TEXT NOT NULL,
    score          INTEGER NOT NULL,   -- percent, 0-100
    taken_at       TEXT NOT NULL,
    question_count INTEGER NOT NULL,
    PRIMARY KEY (user_id, result_id)
);

CREATE TABLE IF NOT EXISTS essay_results (
    user_id      TEXT NOT NULL,
    result_id    TEXT NOT NULL,
    topic        TEXT NOT NULL,
    score        REAL NOT NULL,       -- grader scale, 1-10
    letter_grade TEXT,
    taken_at     TEXT NOT NULL,
    PRIMARY KEY (user_id, result_id)
);

CREATE TABLE IF NOT EXISTS classes (
    user_id  TEXT NOT NULL,
    class_id TEXT NOT NULL,
    name     TEXT NOT NULL,
    topics   TEXT NOT NULL DEFAULT '[]',     -- JSON array of strings
    PRIMARY KEY (user_id, class_id)
);

CREATE INDEX IF NOT EXISTS notes_topic_idx      ON notes(user_id, topic);
CREATE INDEX IF NOT EXISTS flashcards_topic_idx ON flashcards(user_id, topic);
CREATE INDEX IF NOT EXISTS quiz_taken_idx       ON quiz_results(user_id, taken_at);
CREATE INDEX IF NOT EXISTS essay_taken_idx      ON essay_results(user_id, taken_at);

PRAGMA user_version = 1;
";
