use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use log::info;
use readily_core::content::{ChapterSource, Language};

/// Plain-text book held in memory, one chapter per input file.
pub(super) struct BookSource {
    chapters: Vec<Chapter>,
    language: Language,
}

struct Chapter {
    path: PathBuf,
    text: String,
}

impl BookSource {
    pub(super) fn load(paths: &[PathBuf], language: Language) -> Result<Self> {
        let mut chapters = Vec::with_capacity(paths.len());
        for path in paths {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading chapter {}", path.display()))?;
            info!("book: chapter {} bytes={} path={}", chapters.len(), text.len(), path.display());
            chapters.push(Chapter {
                path: path.clone(),
                text,
            });
        }
        Ok(Self { chapters, language })
    }

    #[cfg(test)]
    pub(super) fn from_texts(texts: &[&str], language: Language) -> Self {
        Self {
            chapters: texts
                .iter()
                .enumerate()
                .map(|(index, text)| Chapter {
                    path: PathBuf::from(format!("chapter-{index}.txt")),
                    text: text.to_string(),
                })
                .collect(),
            language,
        }
    }

    pub(super) fn chapter_count(&self) -> usize {
        self.chapters.len()
    }

    pub(super) fn chapter_path(&self, index: usize) -> Option<&PathBuf> {
        self.chapters.get(index).map(|chapter| &chapter.path)
    }
}

impl ChapterSource for BookSource {
    type ChapterId = usize;

    fn chapter_text(&self, id: &usize) -> Option<&str> {
        self.chapters
            .get(*id)
            .map(|chapter| chapter.text.as_str())
            .filter(|text| !text.trim().is_empty())
    }

    fn language(&self) -> Language {
        self.language.clone()
    }
}
