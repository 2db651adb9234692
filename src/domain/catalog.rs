use serde::{Deserialize, Serialize};

/// First verse of the catalog; verse numbers are global and 1-based.
pub const FIRST_VERSE: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chapter {
  pub number: u32,
  pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verse {
  /// Global sequential number across the whole catalog
  pub number: u32,
  pub chapter_number: u32,
  /// Position inside the owning chapter, as numbered by the source text
  pub number_in_chapter: u32,
  pub text: String,
  pub transcription: String,
}

/// One chapter as it appears in the catalog import document.
#[derive(Debug, Clone, Deserialize)]
pub struct ChapterSeed {
  pub name: String,
  #[serde(default)]
  pub ayahs: Vec<VerseSeed>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VerseSeed {
  pub id: u32,
  pub text: String,
  #[serde(default)]
  pub transcription: String,
}
