use serde::{Deserialize, Serialize};
use url::Url;

/// A fixed top-level remote path of the site (Movies, Series, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    /// Root path relative to the site base, e.g. `/Series/`.
    pub url: String,
    #[serde(default)]
    pub icon: String,
}

impl Category {
    pub fn new(id: &str, name: &str, url: &str, icon: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            url: url.to_string(),
            icon: icon.to_string(),
        }
    }

    /// Absolute URL of the category root.
    pub fn resolve(&self, base: &Url) -> Result<Url, url::ParseError> {
        base.join(&self.url)
    }

    /// Whether `path` lies inside this category's root.
    pub fn contains_path(&self, path: &str) -> bool {
        let root = self.url.trim_end_matches('/');
        if root.is_empty() {
            return false;
        }
        match path.strip_prefix(root) {
            Some(rest) => rest.is_empty() || rest.starts_with('/'),
            None => false,
        }
    }

    /// The categories of the visuales.uclv.cu index.
    pub fn defaults() -> Vec<Self> {
        vec![
            Self::new("peliculas", "Películas", "/Peliculas/", "🎬"),
            Self::new("series", "Series", "/Series/", "📺"),
            Self::new("documentales", "Documentales", "/Documentales/", "🎥"),
            Self::new("recientes", "Recientes", "/Recientes/", "🆕"),
            Self::new("cursos", "Cursos", "/Cursos/", "📚"),
            Self::new("conferencias", "Conferencias", "/Conferencias/", "🎤"),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_against_base() {
        let base = Url::parse("https://visuales.uclv.cu").unwrap();
        let cat = Category::new("series", "Series", "/Series/", "📺");
        assert_eq!(
            cat.resolve(&base).unwrap().as_str(),
            "https://visuales.uclv.cu/Series/"
        );
    }

    #[test]
    fn test_contains_path() {
        let cat = Category::new("series", "Series", "/Series/", "📺");
        assert!(cat.contains_path("/Series/"));
        assert!(cat.contains_path("/Series"));
        assert!(cat.contains_path("/Series/Temporada%201/"));
        assert!(!cat.contains_path("/SeriesViejas/"));
        assert!(!cat.contains_path("/Peliculas/"));
    }

    #[test]
    fn test_defaults_have_unique_ids() {
        let cats = Category::defaults();
        assert_eq!(cats.len(), 6);
        let mut ids: Vec<_> = cats.iter().map(|c| c.id.as_str()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 6);
    }
}
