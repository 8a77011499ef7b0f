use crate::models::ExternalFavorite;
use crate::store::FavoritesStore;
use std::fs;
use std::path::{Path, PathBuf};

const FALLBACK_NAME: &str = "Untitled";

/// Reads the host's native favorites document, a flat list of
/// `favourite` elements with a `name` attribute, an optional `thumb`
/// attribute, and the link as element text.
pub struct FavoritesImporter {
    source_path: PathBuf,
}

impl FavoritesImporter {
    pub fn new(source_path: &Path) -> Self {
        Self {
            source_path: source_path.to_path_buf(),
        }
    }

    /// Parses the native favorites list. Missing, unreadable or malformed
    /// input degrades to an empty list; entries without a link are
    /// skipped.
    pub fn list_favorites(&self) -> Vec<ExternalFavorite> {
        let content = match fs::read_to_string(&self.source_path) {
            Ok(content) => content,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(
                    path = %self.source_path.to_string_lossy(),
                    "no native favorites file found"
                );
                return Vec::new();
            }
            Err(error) => {
                tracing::warn!(
                    path = %self.source_path.to_string_lossy(),
                    error = %error,
                    "failed to read native favorites file"
                );
                return Vec::new();
            }
        };
        parse_favorites(&content)
    }
}

fn parse_favorites(content: &str) -> Vec<ExternalFavorite> {
    let document = match roxmltree::Document::parse(content) {
        Ok(document) => document,
        Err(error) => {
            tracing::warn!(error = %error, "malformed native favorites document");
            return Vec::new();
        }
    };

    let mut favorites = Vec::new();
    for node in document
        .root_element()
        .children()
        .filter(|node| node.has_tag_name("favourite"))
    {
        let Some(url) = node.text().map(str::trim).filter(|url| !url.is_empty()) else {
            continue;
        };
        favorites.push(ExternalFavorite {
            name: node.attribute("name").unwrap_or(FALLBACK_NAME).to_string(),
            url: url.to_string(),
            thumbnail: node.attribute("thumb").unwrap_or_default().to_string(),
        });
    }
    tracing::info!(count = favorites.len(), "parsed native favorites");
    favorites
}

/// Inserts the given entries into the target folder, one item per entry.
/// Best-effort: failures are logged and skipped, and the count of
/// successful insertions is returned.
pub fn import_into(
    store: &mut FavoritesStore,
    folder_id: &str,
    entries: &[ExternalFavorite],
) -> usize {
    let mut imported = 0;
    for entry in entries {
        match store.add_item(folder_id, &entry.name, &entry.url, &entry.thumbnail) {
            Ok(_) => imported += 1,
            Err(error) => {
                tracing::warn!(
                    name = %entry.name,
                    error = %error,
                    "skipping favorite that could not be imported"
                );
            }
        }
    }
    imported
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ROOT_ID;

    const SAMPLE: &str = r#"<favourites>
    <favourite name="Noticias" thumb="noticias.png">plugin://plugin.video.news/?id=42</favourite>
    <favourite name="Sin enlace"></favourite>
    <favourite>  plugin://plugin.video.catalog/  </favourite>
</favourites>"#;

    #[test]
    fn entries_without_a_link_are_skipped() {
        let favorites = parse_favorites(SAMPLE);
        assert_eq!(favorites.len(), 2);
        assert_eq!(favorites[0].name, "Noticias");
        assert_eq!(favorites[0].url, "plugin://plugin.video.news/?id=42");
        assert_eq!(favorites[0].thumbnail, "noticias.png");
        assert_eq!(favorites[1].name, FALLBACK_NAME);
        assert_eq!(favorites[1].url, "plugin://plugin.video.catalog/");
        assert!(favorites[1].thumbnail.is_empty());
    }

    #[test]
    fn malformed_documents_yield_no_favorites() {
        assert!(parse_favorites("<favourites><favourite").is_empty());
        assert!(parse_favorites("").is_empty());
    }

    #[test]
    fn missing_source_files_yield_no_favorites() {
        let dir = tempfile::tempdir().expect("temp dir");
        let importer = FavoritesImporter::new(&dir.path().join("favourites.xml"));
        assert!(importer.list_favorites().is_empty());
    }

    #[test]
    fn import_is_best_effort() {
        let dir = tempfile::tempdir().expect("temp data dir");
        let mut store = FavoritesStore::open(dir.path());
        let favorites = parse_favorites(SAMPLE);

        assert_eq!(import_into(&mut store, ROOT_ID, &favorites), 2);
        assert_eq!(store.list_children(ROOT_ID).len(), 2);
        assert_eq!(import_into(&mut store, "missing-folder", &favorites), 0);
    }
}
