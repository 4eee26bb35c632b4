//! [`SqliteStore`] — the SQLite implementation of [`StudyStore`].

use std::path::Path;

use cram_core::{
  class::Class,
  flashcard::Flashcard,
  note::Note,
  result::{EssayResult, QuizResult},
  store::StudyStore,
  user::UserId,
};
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use crate::{
  Error, Result,
  encode::{
    RawClass, RawEssayResult, RawFlashcard, RawNote, RawQuizResult, encode_dt,
    encode_source, encode_strings, encode_uuid,
  },
  schema::SCHEMA,
};

// ─── Row tuples ──────────────────────────────────────────────────────────────

/// Owned column values for one `notes` row, built before entering the
/// connection closure.
struct NoteRow {
  note_id:    String,
  title:      String,
  content:    String,
  topic:      String,
  tags:       String,
  key_points: String,
  created_at: String,
  updated_at: String,
  source:     String,
}

impl NoteRow {
  fn encode(note: &Note) -> Result<Self> {
    Ok(Self {
      note_id:    encode_uuid(note.id),
      title:      note.title.clone(),
      content:    note.content.clone(),
      topic:      note.topic.clone(),
      tags:       encode_strings(&note.tags)?,
      key_points: encode_strings(&note.key_points)?,
      created_at: encode_dt(note.created_at),
      updated_at: encode_dt(note.updated_at),
      source:     encode_source(&note.source)?,
    })
  }

  fn insert(&self, conn: &rusqlite::Connection, user: &str) -> rusqlite::Result<()> {
    conn.execute(
      "INSERT OR REPLACE INTO notes (
         user_id, note_id, title, content, topic,
         tags, key_points, created_at, updated_at, source
       ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
      rusqlite::params![
        user,
        self.note_id,
        self.title,
        self.content,
        self.topic,
        self.tags,
        self.key_points,
        self.created_at,
        self.updated_at,
        self.source,
      ],
    )?;
    Ok(())
  }
}

/// Owned column values for one `flashcards` row.
struct CardRow {
  card_id:       String,
  front:         String,
  back:          String,
  note_id:       Option<String>,
  topic:         String,
  difficulty:    String,
  last_reviewed: Option<String>,
  next_review:   Option<String>,
  repetitions:   u32,
}

impl CardRow {
  fn encode(card: &Flashcard) -> Self {
    Self {
      card_id:       encode_uuid(card.id),
      front:         card.front.clone(),
      back:          card.back.clone(),
      note_id:       card.note_id.map(encode_uuid),
      topic:         card.topic.clone(),
      difficulty:    card.difficulty.as_str().to_owned(),
      last_reviewed: card.last_reviewed.map(encode_dt),
      next_review:   card.next_review.map(encode_dt),
      repetitions:   card.repetitions,
    }
  }

  fn insert(&self, conn: &rusqlite::Connection, user: &str) -> rusqlite::Result<()> {
    conn.execute(
      "INSERT OR REPLACE INTO flashcards (
         user_id, card_id, front, back, note_id,
         topic, difficulty, last_reviewed, next_review, repetitions
       ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
      rusqlite::params![
        user,
        self.card_id,
        self.front,
        self.back,
        self.note_id,
        self.topic,
        self.difficulty,
        self.last_reviewed,
        self.next_review,
        self.repetitions,
      ],
    )?;
    Ok(())
  }
}

fn read_note(r: &rusqlite::Row<'_>) -> rusqlite::Result<RawNote> {
  Ok(RawNote {
    note_id:    r.get(0)?,
    title:      r.get(1)?,
    content:    r.get(2)?,
    topic:      r.get(3)?,
    tags:       r.get(4)?,
    key_points: r.get(5)?,
    created_at: r.get(6)?,
    updated_at: r.get(7)?,
    source:     r.get(8)?,
  })
}

fn read_card(r: &rusqlite::Row<'_>) -> rusqlite::Result<RawFlashcard> {
  Ok(RawFlashcard {
    card_id:       r.get(0)?,
    front:         r.get(1)?,
    back:          r.get(2)?,
    note_id:       r.get(3)?,
    topic:         r.get(4)?,
    difficulty:    r.get(5)?,
    last_reviewed: r.get(6)?,
    next_review:   r.get(7)?,
    repetitions:   r.get(8)?,
  })
}

const NOTE_COLUMNS: &str = "note_id, title, content, topic, tags, key_points, \
   created_at, updated_at, source";
const CARD_COLUMNS: &str = "card_id, front, back, note_id, topic, difficulty, \
   last_reviewed, next_review, repetitions";

// ─── Store ───────────────────────────────────────────────────────────────────

/// A cram study store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── StudyStore impl ─────────────────────────────────────────────────────────

impl StudyStore for SqliteStore {
  type Error = Error;

  // ── Notes ─────────────────────────────────────────────────────────────

  async fn put_note(&self, user: &UserId, note: &Note) -> Result<()> {
    let user = user.as_str().to_owned();
    let row = NoteRow::encode(note)?;
    self
      .conn
      .call(move |conn| {
        row.insert(conn, &user)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn put_notes(&self, user: &UserId, notes: &[Note]) -> Result<()> {
    let user = user.as_str().to_owned();
    let rows = notes.iter().map(NoteRow::encode).collect::<Result<Vec<_>>>()?;
    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        for row in &rows {
          row.insert(&tx, &user)?;
        }
        tx.commit()?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn get_note(&self, user: &UserId, id: Uuid) -> Result<Option<Note>> {
    let user = user.as_str().to_owned();
    let id_str = encode_uuid(id);
    let raw: Option<RawNote> = self
      .conn
      .call(move |conn| {
        let raw = conn
          .query_row(
            &format!(
              "SELECT {NOTE_COLUMNS} FROM notes \
               WHERE user_id = ?1 AND note_id = ?2"
            ),
            rusqlite::params![user, id_str],
            |r| read_note(r),
          )
          .optional()?;
        Ok(raw)
      })
      .await?;
    raw.map(RawNote::into_note).transpose()
  }

  async fn list_notes(
    &self,
    user: &UserId,
    topic: Option<&str>,
  ) -> Result<Vec<Note>> {
    let user = user.as_str().to_owned();
    let topic = topic.map(str::to_owned);
    let raw: Vec<RawNote> = self
      .conn
      .call(move |conn| {
        let rows = match &topic {
          Some(topic) => {
            let mut stmt = conn.prepare(&format!(
              "SELECT {NOTE_COLUMNS} FROM notes \
               WHERE user_id = ?1 AND topic = ?2 \
               ORDER BY updated_at DESC"
            ))?;
            let rows = stmt
              .query_map(rusqlite::params![user, topic], |r| read_note(r))?
              .collect::<std::result::Result<Vec<_>, _>>()?;
            rows
          }
          None => {
            let mut stmt = conn.prepare(&format!(
              "SELECT {NOTE_COLUMNS} FROM notes \
               WHERE user_id = ?1 ORDER BY updated_at DESC"
            ))?;
            let rows = stmt
              .query_map(rusqlite::params![user], |r| read_note(r))?
              .collect::<std::result::Result<Vec<_>, _>>()?;
            rows
          }
        };
        Ok(rows)
      })
      .await?;
    raw.into_iter().map(RawNote::into_note).collect()
  }

  async fn delete_note(&self, user: &UserId, id: Uuid) -> Result<bool> {
    let user = user.as_str().to_owned();
    let id_str = encode_uuid(id);
    let removed = self
      .conn
      .call(move |conn| {
        let n = conn.execute(
          "DELETE FROM notes WHERE user_id = ?1 AND note_id = ?2",
          rusqlite::params![user, id_str],
        )?;
        Ok(n > 0)
      })
      .await?;
    Ok(removed)
  }

  // ── Flashcards ────────────────────────────────────────────────────────

  async fn put_flashcard(&self, user: &UserId, card: &Flashcard) -> Result<()> {
    let user = user.as_str().to_owned();
    let row = CardRow::encode(card);
    self
      .conn
      .call(move |conn| {
        row.insert(conn, &user)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn put_flashcards(
    &self,
    user: &UserId,
    cards: &[Flashcard],
  ) -> Result<()> {
    let user = user.as_str().to_owned();
    let rows: Vec<CardRow> = cards.iter().map(CardRow::encode).collect();
    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        for row in &rows {
          row.insert(&tx, &user)?;
        }
        tx.commit()?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn get_flashcard(
    &self,
    user: &UserId,
    id: Uuid,
  ) -> Result<Option<Flashcard>> {
    let user = user.as_str().to_owned();
    let id_str = encode_uuid(id);
    let raw: Option<RawFlashcard> = self
      .conn
      .call(move |conn| {
        let raw = conn
          .query_row(
            &format!(
              "SELECT {CARD_COLUMNS} FROM flashcards \
               WHERE user_id = ?1 AND card_id = ?2"
            ),
            rusqlite::params![user, id_str],
            |r| read_card(r),
          )
          .optional()?;
        Ok(raw)
      })
      .await?;
    raw.map(RawFlashcard::into_flashcard).transpose()
  }

  async fn list_flashcards(
    &self,
    user: &UserId,
    topic: Option<&str>,
  ) -> Result<Vec<Flashcard>> {
    let user = user.as_str().to_owned();
    let topic = topic.map(str::to_owned);
    let raw: Vec<RawFlashcard> = self
      .conn
      .call(move |conn| {
        let rows = match &topic {
          Some(topic) => {
            let mut stmt = conn.prepare(&format!(
              "SELECT {CARD_COLUMNS} FROM flashcards \
               WHERE user_id = ?1 AND topic = ?2 ORDER BY card_id"
            ))?;
            let rows = stmt
              .query_map(rusqlite::params![user, topic], |r| read_card(r))?
              .collect::<std::result::Result<Vec<_>, _>>()?;
            rows
          }
          None => {
            let mut stmt = conn.prepare(&format!(
              "SELECT {CARD_COLUMNS} FROM flashcards \
               WHERE user_id = ?1 ORDER BY card_id"
            ))?;
            let rows = stmt
              .query_map(rusqlite::params![user], |r| read_card(r))?
              .collect::<std::result::Result<Vec<_>, _>>()?;
            rows
          }
        };
        Ok(rows)
      })
      .await?;
    raw.into_iter().map(RawFlashcard::into_flashcard).collect()
  }

  async fn delete_flashcard(&self, user: &UserId, id: Uuid) -> Result<bool> {
    let user = user.as_str().to_owned();
    let id_str = encode_uuid(id);
    let removed = self
      .conn
      .call(move |conn| {
        let n = conn.execute(
          "DELETE FROM flashcards WHERE user_id = ?1 AND card_id = ?2",
          rusqlite::params![user, id_str],
        )?;
        Ok(n > 0)
      })
      .await?;
    Ok(removed)
  }

  // ── Results ───────────────────────────────────────────────────────────

  async fn add_quiz_result(
    &self,
    user: &UserId,
    result: &QuizResult,
  ) -> Result<()> {
    let user = user.as_str().to_owned();
    let id_str = encode_uuid(result.id);
    let topic = result.topic.clone();
    let score = result.score;
    let taken_at = encode_dt(result.taken_at);
    let question_count = result.question_count;
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO quiz_results (
             user_id, result_id, topic, score, taken_at, question_count
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![user, id_str, topic, score, taken_at, question_count],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn list_quiz_results(&self, user: &UserId) -> Result<Vec<QuizResult>> {
    let user = user.as_str().to_owned();
    let raw: Vec<RawQuizResult> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT result_id, topic, score, taken_at, question_count \
           FROM quiz_results WHERE user_id = ?1 ORDER BY taken_at DESC",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![user], |r| {
            Ok(RawQuizResult {
              result_id:      r.get(0)?,
              topic:          r.get(1)?,
              score:          r.get(2)?,
              taken_at:       r.get(3)?,
              question_count: r.get(4)?,
            })
          })?
          .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
      })
      .await?;
    raw.into_iter().map(RawQuizResult::into_result).collect()
  }

  async fn add_essay_result(
    &self,
    user: &UserId,
    result: &EssayResult,
  ) -> Result<()> {
    let user = user.as_str().to_owned();
    let id_str = encode_uuid(result.id);
    let topic = result.topic.clone();
    let score = result.score;
    let letter_grade = result.letter_grade.clone();
    let taken_at = encode_dt(result.taken_at);
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO essay_results (
             user_id, result_id, topic, score, letter_grade, taken_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![user, id_str, topic, score, letter_grade, taken_at],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn list_essay_results(
    &self,
    user: &UserId,
  ) -> Result<Vec<EssayResult>> {
    let user = user.as_str().to_owned();
    let raw: Vec<RawEssayResult> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT result_id, topic, score, letter_grade, taken_at \
           FROM essay_results WHERE user_id = ?1 ORDER BY taken_at DESC",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![user], |r| {
            Ok(RawEssayResult {
              result_id:    r.get(0)?,
              topic:        r.get(1)?,
              score:        r.get(2)?,
              letter_grade: r.get(3)?,
              taken_at:     r.get(4)?,
            })
          })?
          .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
      })
      .await?;
    raw.into_iter().map(RawEssayResult::into_result).collect()
  }

  // ── Classes ───────────────────────────────────────────────────────────

  async fn put_class(&self, user: &UserId, class: &Class) -> Result<()> {
    let user = user.as_str().to_owned();
    let id_str = encode_uuid(class.id);
    let name = class.name.clone();
    let topics = encode_strings(&class.topics)?;
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT OR REPLACE INTO classes (user_id, class_id, name, topics) \
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![user, id_str, name, topics],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn get_class(&self, user: &UserId, id: Uuid) -> Result<Option<Class>> {
    let user = user.as_str().to_owned();
    let id_str = encode_uuid(id);
    let raw: Option<RawClass> = self
      .conn
      .call(move |conn| {
        let raw = conn
          .query_row(
            "SELECT class_id, name, topics FROM classes \
             WHERE user_id = ?1 AND class_id = ?2",
            rusqlite::params![user, id_str],
            |r| {
              Ok(RawClass {
                class_id: r.get(0)?,
                name:     r.get(1)?,
                topics:   r.get(2)?,
              })
            },
          )
          .optional()?;
        Ok(raw)
      })
      .await?;
    raw.map(RawClass::into_class).transpose()
  }

  async fn list_classes(&self, user: &UserId) -> Result<Vec<Class>> {
    let user = user.as_str().to_owned();
    let raw: Vec<RawClass> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT class_id, name, topics FROM classes \
           WHERE user_id = ?1 ORDER BY name",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![user], |r| {
            Ok(RawClass {
              class_id: r.get(0)?,
              name:     r.get(1)?,
              topics:   r.get(2)?,
            })
          })?
          .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
      })
      .await?;
    raw.into_iter().map(RawClass::into_class).collect()
  }

  async fn delete_class(&self, user: &UserId, id: Uuid) -> Result<bool> {
    let user = user.as_str().to_owned();
    let id_str = encode_uuid(id);
    let removed = self
      .conn
      .call(move |conn| {
        let n = conn.execute(
          "DELETE FROM classes WHERE user_id = ?1 AND class_id = ?2",
          rusqlite::params![user, id_str],
        )?;
        Ok(n > 0)
      })
      .await?;
    Ok(removed)
  }
}
