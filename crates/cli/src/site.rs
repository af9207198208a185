//! Static website generation from the catalog.

use std::fmt::Write as _;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

use reelshelf_core::{config::WebsiteConfig, Movie, Snapshot};

/// Placeholder replaced by the page title.
pub const TITLE_PLACEHOLDER: &str = "__TEMPLATE_TITLE__";

/// Placeholder replaced by the movie grid items.
pub const GRID_PLACEHOLDER: &str = "__TEMPLATE_MOVIE_GRID__";

/// Template used when no template file exists.
pub const DEFAULT_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>__TEMPLATE_TITLE__</title>
  <style>
    body { font-family: sans-serif; background: #f5f5f5; margin: 0; }
    h1 { background: #222; color: #fff; margin: 0; padding: 1rem 2rem; }
    .movie-grid { list-style: none; display: flex; flex-wrap: wrap; gap: 1.5rem; padding: 2rem; }
    .movie { width: 128px; }
    .movie-poster { width: 128px; height: 193px; object-fit: cover; background: #ccc; }
    .movie-title { font-weight: bold; margin-top: 0.5rem; }
    .movie-year { color: #777; }
  </style>
</head>
<body>
  <h1>__TEMPLATE_TITLE__</h1>
  <ol class="movie-grid">
__TEMPLATE_MOVIE_GRID__
  </ol>
</body>
</html>
"#;

#[derive(Debug, Error)]
pub enum SiteError {
    #[error("Failed to read template {path}: {source}")]
    ReadTemplate {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write website to {path}: {source}")]
    WriteOutput {
        path: String,
        #[source]
        source: io::Error,
    },
}

/// Escape text for use in HTML content and quoted attribute values.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn imdb_url(movie: &Movie) -> String {
    match &movie.external_id {
        Some(id) => format!("https://www.imdb.com/title/{}/", id),
        None => "#".to_string(),
    }
}

/// Render one `<li>` grid item per movie, in snapshot order.
pub fn render_grid(snapshot: &Snapshot) -> String {
    let mut grid = String::new();
    for movie in snapshot {
        // Writing into a String cannot fail.
        let _ = write!(
            grid,
            concat!(
                "<li>\n",
                "    <div class=\"movie\">\n",
                "      <a href=\"{url}\" target=\"_blank\">\n",
                "          <img class=\"movie-poster\" src=\"{poster}\">\n",
                "      </a>\n",
                "      <div class=\"movie-title\">{title}</div>\n",
                "      <div class=\"movie-year\">{year}</div>\n",
                "    </div>\n",
                "</li>\n",
            ),
            url = escape_html(&imdb_url(movie)),
            poster = escape_html(movie.poster.as_deref().unwrap_or_default()),
            title = escape_html(&movie.title),
            year = movie.year,
        );
    }
    grid
}

/// Fill the template placeholders.
pub fn render_page(template: &str, title: &str, snapshot: &Snapshot) -> String {
    template
        .replace(TITLE_PLACEHOLDER, &escape_html(title))
        .replace(GRID_PLACEHOLDER, &render_grid(snapshot))
}

fn read_template(path: &Path) -> Result<String, SiteError> {
    match fs::read_to_string(path) {
        Ok(template) => Ok(template),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!(
                "No template at {}, using built-in template",
                path.display()
            );
            Ok(DEFAULT_TEMPLATE.to_string())
        }
        Err(source) => Err(SiteError::ReadTemplate {
            path: path.display().to_string(),
            source,
        }),
    }
}

/// Render the snapshot into the configured output file and return its path.
pub fn generate(snapshot: &Snapshot, config: &WebsiteConfig) -> Result<PathBuf, SiteError> {
    let template = read_template(&config.template_path)?;
    let html = render_page(&template, &config.title, snapshot);

    let output = &config.output_path;
    let write_error = |source| SiteError::WriteOutput {
        path: output.display().to_string(),
        source,
    };

    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(write_error)?;
        }
    }
    fs::write(output, html).map_err(write_error)?;

    info!(
        "Generated website with {} movies at {}",
        snapshot.len(),
        output.display()
    );
    Ok(output.clone())
}
