//! Widget view model rendering

use url::Url;

use crate::models::{WidgetDocument, WidgetTheme, WidgetViewModel};

const FILE_SCHEME_PREFIX: &str = "file://";

/// Builds the view model every surface instance receives.
#[derive(Debug, Clone, Copy, Default)]
pub struct ViewModelRenderer {
    theme: WidgetTheme,
}

/// Where this pass's widget content comes from.
#[derive(Debug, Clone, Copy)]
pub enum RenderSource<'a> {
    /// The widget fetch succeeded; its document is authoritative
    Fetched(&'a WidgetDocument),
    /// The widget fetch failed; fall back to the last rendered model
    Fallback(Option<&'a WidgetViewModel>),
}

impl ViewModelRenderer {
    pub const fn new(theme: WidgetTheme) -> Self {
        Self { theme }
    }

    /// Render from fetched content or, when the fetch failed, from the
    /// fallback cache. With neither available the built-in placeholder is used.
    pub fn render(&self, source: RenderSource<'_>) -> WidgetViewModel {
        match source {
            RenderSource::Fetched(document) => self.render_document(document),
            RenderSource::Fallback(Some(cached)) => cached.clone(),
            RenderSource::Fallback(None) => WidgetViewModel::placeholder().with_theme(self.theme),
        }
    }

    fn render_document(&self, document: &WidgetDocument) -> WidgetViewModel {
        WidgetViewModel {
            text: document.display_text.clone(),
            image_uri: normalize_image_path(&document.image_path),
            background_color: None,
            text_color: None,
        }
        .with_theme(self.theme)
    }
}

/// Turn a stored image path into a `file://` URI.
///
/// Empty paths mean "no image". Paths that do not form a valid file URI hide
/// the image instead of failing the render.
pub fn normalize_image_path(path: &str) -> Option<String> {
    let path = path.trim();
    if path.is_empty() {
        return None;
    }

    let candidate = if path.starts_with(FILE_SCHEME_PREFIX) {
        path.to_string()
    } else {
        format!("{FILE_SCHEME_PREFIX}{path}")
    };

    match Url::parse(&candidate) {
        Ok(url) if url.scheme() == "file" && url.path().len() > 1 => Some(url.to_string()),
        Ok(_) | Err(_) => {
            tracing::warn!(path, "Hiding widget image with malformed path");
            None
        }
    }
}
