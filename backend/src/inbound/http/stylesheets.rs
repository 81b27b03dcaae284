//! Stylesheets served from the static root's `css/` directory.
//!
//! Files are read through a capability-scoped [`Dir`] handle, so request
//! paths can never reach outside it; names are further restricted to plain
//! `*.css` file names.

use std::io;
use std::path::Path;
use std::sync::{Arc, OnceLock};

use actix_web::{HttpResponse, web};
use cap_std::{ambient_authority, fs::Dir};
use regex::Regex;
use tracing::{debug, info, warn};

use crate::domain::Error;
use crate::inbound::http::pages::{PageError, PageResult};

/// Content type for every stylesheet response.
pub const CSS_CONTENT_TYPE: &str = "text/css; charset=utf-8";

static NAME_RE: OnceLock<Regex> = OnceLock::new();

fn name_regex() -> &'static Regex {
    NAME_RE.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9_-]+\.css$")
            .unwrap_or_else(|error| panic!("stylesheet name regex failed to compile: {error}"))
    })
}

/// Whether `name` is a plain stylesheet file name.
pub fn is_stylesheet_name(name: &str) -> bool {
    name_regex().is_match(name)
}

/// Handle on the stylesheet directory.
#[derive(Clone, Default)]
pub struct StaticAssets {
    css: Option<Arc<Dir>>,
}

impl StaticAssets {
    /// Open `<root>/css`.
    pub fn open(root: &Path) -> io::Result<Self> {
        let path = root.join("css");
        let css = Dir::open_ambient_dir(&path, ambient_authority())?;
        info!(path = %path.display(), "serving stylesheets");
        Ok(Self {
            css: Some(Arc::new(css)),
        })
    }

    /// Open `<root>/css`, serving nothing if it cannot be opened.
    pub fn open_or_empty(root: &Path) -> Self {
        Self::open(root).unwrap_or_else(|error| {
            warn!(root = %root.display(), %error, "stylesheet directory unavailable");
            Self::default()
        })
    }

    /// Read `name`; `Ok(None)` when it is not a servable stylesheet.
    pub async fn read(&self, name: &str) -> Result<Option<Vec<u8>>, Error> {
        let Some(dir) = self.css.clone() else {
            return Ok(None);
        };
        if !is_stylesheet_name(name) {
            debug!(name, "rejected stylesheet name");
            return Ok(None);
        }
        let owned = name.to_owned();
        let read = web::block(move || dir.read(&owned))
            .await
            .map_err(|error| Error::internal(format!("stylesheet read cancelled: {error}")))?;
        match read {
            Ok(bytes) => Ok(Some(bytes)),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(error) => Err(Error::internal(format!(
                "failed to read stylesheet {name}: {error}"
            ))),
        }
    }
}

/// `GET /static/css/{name}`: the file's bytes, unchanged.
pub async fn stylesheet(assets: web::Data<StaticAssets>, name: web::Path<String>) -> PageResult {
    match assets.read(&name).await? {
        Some(bytes) => Ok(HttpResponse::Ok()
            .content_type(CSS_CONTENT_TYPE)
            .body(bytes)),
        None => Err(PageError::from(Error::not_found("Stylesheet not found"))),
    }
}
