//! Verse catalog storage

use rusqlite::{params, Connection, Result, Row};

use crate::domain::{Chapter, ChapterSeed, Verse};

pub fn insert_chapter(conn: &Connection, chapter: &Chapter) -> Result<()> {
    conn.execute(
        "INSERT INTO chapters (number, name) VALUES (?1, ?2)",
        params![chapter.number, chapter.name],
    )?;
    Ok(())
}

pub fn insert_verse(conn: &Connection, verse: &Verse) -> Result<()> {
    conn.execute(
        r#"
    INSERT INTO verses (number, chapter_number, number_in_chapter, text, transcription)
    VALUES (?1, ?2, ?3, ?4, ?5)
    "#,
        params![
            verse.number,
            verse.chapter_number,
            verse.number_in_chapter,
            verse.text,
            verse.transcription,
        ],
    )?;
    Ok(())
}

/// Seed the catalog from parsed chapters.
///
/// Chapters and verses are numbered in document order. A catalog that
/// already holds chapters or verses is left untouched and 0 is returned.
pub fn seed_catalog(conn: &Connection, chapters: &[ChapterSeed]) -> Result<usize> {
    if catalog_size(conn)? > 0 || get_chapter(conn, 1)?.is_some() {
        return Ok(0);
    }

    let tx = conn.unchecked_transaction()?;
    let mut verse_number = 0u32;
    for (index, seed) in chapters.iter().enumerate() {
        let chapter = Chapter {
            number: index as u32 + 1,
            name: seed.name.clone(),
        };
        insert_chapter(&tx, &chapter)?;

        for ayah in &seed.ayahs {
            verse_number += 1;
            insert_verse(
                &tx,
                &Verse {
                    number: verse_number,
                    chapter_number: chapter.number,
                    number_in_chapter: ayah.id,
                    text: ayah.text.clone(),
                    transcription: ayah.transcription.clone(),
                },
            )?;
        }
    }
    tx.commit()?;

    Ok(verse_number as usize)
}

/// Highest global verse number (0 for an empty catalog)
pub fn catalog_size(conn: &Connection) -> Result<u32> {
    conn.query_row("SELECT COALESCE(MAX(number), 0) FROM verses", [], |row| {
        row.get(0)
    })
}

pub fn get_verse(conn: &Connection, number: u32) -> Result<Option<Verse>> {
    let mut stmt = conn.prepare(
        r#"
    SELECT number, chapter_number, number_in_chapter, text, transcription
    FROM verses WHERE number = ?1
    "#,
    )?;

    let mut rows = stmt.query(params![number])?;
    if let Some(row) = rows.next()? {
        Ok(Some(row_to_verse(row)?))
    } else {
        Ok(None)
    }
}

pub fn get_chapter(conn: &Connection, number: u32) -> Result<Option<Chapter>> {
    let mut stmt = conn.prepare("SELECT number, name FROM chapters WHERE number = ?1")?;
    let mut rows = stmt.query(params![number])?;
    if let Some(row) = rows.next()? {
        Ok(Some(Chapter {
            number: row.get(0)?,
            name: row.get(1)?,
        }))
    } else {
        Ok(None)
    }
}

fn row_to_verse(row: &Row<'_>) -> Result<Verse> {
    Ok(Verse {
        number: row.get(0)?,
        chapter_number: row.get(1)?,
        number_in_chapter: row.get(2)?,
        text: row.get(3)?,
        transcription: row.get(4)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::VerseSeed;
    use crate::testing::TestEnv;

    fn seeds() -> Vec<ChapterSeed> {
        vec![
            ChapterSeed {
                name: "First".to_string(),
                ayahs: (1..=3)
                    .map(|id| VerseSeed {
                        id,
                        text: format!("first {}", id),
                        transcription: String::new(),
                    })
                    .collect(),
            },
            ChapterSeed {
                name: "Second".to_string(),
                ayahs: (1..=2)
                    .map(|id| VerseSeed {
                        id,
                        text: format!("second {}", id),
                        transcription: format!("t{}", id),
                    })
                    .collect(),
            },
        ]
    }

    #[test]
    fn test_seed_numbers_verses_globally() {
        let env = TestEnv::new().unwrap();
        assert_eq!(seed_catalog(&env.conn, &seeds()).unwrap(), 5);
        assert_eq!(catalog_size(&env.conn).unwrap(), 5);

        let verse = get_verse(&env.conn, 4).unwrap().unwrap();
        assert_eq!(verse.chapter_number, 2);
        assert_eq!(verse.number_in_chapter, 1);
        assert_eq!(verse.text, "second 1");
        assert_eq!(verse.transcription, "t1");

        let chapter = get_chapter(&env.conn, 2).unwrap().unwrap();
        assert_eq!(chapter.name, "Second");
    }

    #[test]
    fn test_seed_only_once() {
        let env = TestEnv::new().unwrap();
        seed_catalog(&env.conn, &seeds()).unwrap();
        assert_eq!(seed_catalog(&env.conn, &seeds()).unwrap(), 0);
        assert_eq!(catalog_size(&env.conn).unwrap(), 5);
    }

    #[test]
    fn test_chapters_without_verses_seed_once() {
        let env = TestEnv::new().unwrap();
        let empty = vec![ChapterSeed {
            name: "Al-Fatiha".to_string(),
            ayahs: Vec::new(),
        }];

        assert_eq!(seed_catalog(&env.conn, &empty).unwrap(), 0);
        assert_eq!(seed_catalog(&env.conn, &empty).unwrap(), 0);
        assert_eq!(seed_catalog(&env.conn, &seeds()).unwrap(), 0);

        assert_eq!(get_chapter(&env.conn, 1).unwrap().unwrap().name, "Al-Fatiha");
        assert!(get_chapter(&env.conn, 2).unwrap().is_none());
    }

    #[test]
    fn test_empty_catalog() {
        let env = TestEnv::new().unwrap();
        assert_eq!(catalog_size(&env.conn).unwrap(), 0);
        assert!(get_verse(&env.conn, 1).unwrap().is_none());
        assert!(get_chapter(&env.conn, 1).unwrap().is_none());
    }
}
