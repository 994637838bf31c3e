use url::Url;

/// Convenience wrapper for URL generation functions.
#[derive(Clone)]
pub struct Urls {
    /// Top-level URL, including trailing slash.
    base: Url,

    /// Path for all recommendations-related actions.
    pub(crate) recommendations_path: String,

    /// Prefix for all recommendations-related actions.
    recommendations_prefix: String,
}

impl Urls {
    /// Create a new instance. `recommendations_prefix` should *not* include a trailing slash.
    pub fn new(base: impl AsRef<str>, recommendations_prefix: impl Into<String>) -> Self {
        let base =
            Url::parse(base.as_ref()).unwrap_or_else(|_| panic!("parse {} as URL", base.as_ref()));
        let recommendations_path = recommendations_prefix.into();
        let recommendations_prefix = format!("{}/", recommendations_path);

        Urls {
            base,
            recommendations_path,
            recommendations_prefix,
        }
    }

    pub fn recommendations(&self) -> Url {
        self.base
            .join(&self.recommendations_prefix)
            .expect("get recommendations URL")
    }

    pub fn recommendation(&self, id: i32) -> Url {
        let path = format!("id/{}", id);
        self.recommendations()
            .join(&path)
            .unwrap_or_else(|_| panic!("get URL for recommendation {}", id))
    }
}
