use std::collections::HashSet;

/// Hands out unique, sanitized element ids for plots and tables
#[derive(Debug, Default)]
pub struct IdRegistry {
    used: HashSet<String>,
    anonymous: usize,
}

impl IdRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an id, returning the sanitized and de-duplicated form.
    ///
    /// A missing id becomes `mqc_hcplot_<n>`.
    pub fn register(&mut self, id: Option<&str>) -> String {
        let base = match id {
            Some(id) if !id.trim().is_empty() => sanitize_id(id),
            _ => {
                self.anonymous += 1;
                format!("mqc_hcplot_{}", self.anonymous)
            }
        };

        let mut candidate = base.clone();
        let mut suffix = 1;
        while self.used.contains(&candidate) {
            candidate = format!("{base}-{suffix}");
            suffix += 1;
        }
        self.used.insert(candidate.clone());
        candidate
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.used.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.used.is_empty()
    }
}

/// Replace characters outside `[A-Za-z0-9_-]` with `_` and make sure the id
/// starts with a letter
#[must_use]
pub fn sanitize_id(id: &str) -> String {
    let cleaned: String = id
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect();

    if cleaned.starts_with(|c: char| c.is_ascii_alphabetic()) {
        cleaned
    } else {
        format!("mqc_{cleaned}")
    }
}
