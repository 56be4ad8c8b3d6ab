use percent_encoding::percent_decode_str;

pub const ROOT_LABEL: &str = "Inicio";
/// Path marker of the synthetic first crumb; following it means "go home".
pub const ROOT_PATH: &str = "root";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Crumb {
    pub label: String,
    pub path: String,
}

impl Crumb {
    fn new(label: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            path: path.into(),
        }
    }

    pub fn is_root(&self) -> bool {
        self.path == ROOT_PATH
    }
}

/// Breadcrumb trail for a path: the root crumb, then one crumb per
/// non-empty segment with its percent-decoded name and cumulative path.
pub fn breadcrumb_for(path: &str) -> Vec<Crumb> {
    let mut crumbs = vec![Crumb::new(ROOT_LABEL, ROOT_PATH)];
    let mut prefix = String::new();

    for segment in path.split('/').filter(|s| !s.is_empty()) {
        let label = percent_decode_str(segment).decode_utf8_lossy().into_owned();
        prefix.push('/');
        prefix.push_str(&label);
        crumbs.push(Crumb::new(label, prefix.clone()));
    }

    crumbs
}
