use crate::filter::content_types::content_type;
use crate::{ConfigError, ConfigResult};
use std::collections::BTreeSet;

const IMAGES: &[&str] = &["bmp", "gif", "ico", "jpeg", "png", "svg", "tiff", "webp", "ttf"];
const VIDEO: &[&str] = &["avi", "mpeg", "ogv", "ts", "webm", "3g2", "3gp"];
const AUDIO: &[&str] = &["midi", "mp3", "oga", "wav", "weba", "3g2", "3gp"];
const ARCHIVES: &[&str] = &["arc", "bz", "bz2", "jar", "rar", "tar", "zip", "7z"];
const MARKUPS: &[&str] = &["html", "xhtml", "xml"];
const BINARIES: &[&str] = &[
    "abw", "azw", "bin", "doc", "docx", "eot", "epub", "odp", "ods", "odt", "pdf", "ppt", "pptx",
    "swf", "vsd", "woff2", "xls", "xlsx",
];

/// A named set of file extensions that can be excluded from a crawl
///
/// Links whose text ends with any extension of an excluded group are not
/// queued. The preset groups are built from the content-type table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeGroup {
    name: String,
    extensions: BTreeSet<String>,
}

impl TypeGroup {
    /// Creates a group from arbitrary extensions
    ///
    /// Extensions without a leading dot get one, so `"png"` and `".png"` are
    /// the same extension.
    pub fn custom<I, S>(name: &str, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let extensions = extensions
            .into_iter()
            .map(|ext| {
                let ext = ext.as_ref().trim();
                if ext.starts_with('.') {
                    ext.to_string()
                } else {
                    format!(".{}", ext)
                }
            })
            .collect();

        Self {
            name: name.to_string(),
            extensions,
        }
    }

    fn from_table(name: &str, types: &[&str]) -> Self {
        let extensions = types
            .iter()
            .filter_map(|t| content_type(t))
            .flat_map(|t| t.extensions.iter().copied());
        Self::custom(name, extensions)
    }

    pub fn images() -> Self {
        Self::from_table("images", IMAGES)
    }

    pub fn video() -> Self {
        Self::from_table("video", VIDEO)
    }

    pub fn audio() -> Self {
        Self::from_table("audio", AUDIO)
    }

    pub fn archives() -> Self {
        Self::from_table("archives", ARCHIVES)
    }

    pub fn markups() -> Self {
        Self::from_table("markups", MARKUPS)
    }

    pub fn binaries() -> Self {
        Self::from_table("binaries", BINARIES)
    }

    /// Resolves a group by name
    ///
    /// Accepts the preset group names (`images`, `video`, `audio`, `archives`,
    /// `markups`, `binaries`) as well as any single content type from the table
    /// (e.g. `pdf`), which yields a group holding just that type's extensions.
    pub fn from_name(name: &str) -> ConfigResult<Self> {
        let name = name.trim().to_lowercase();
        match name.as_str() {
            "images" => Ok(Self::images()),
            "video" => Ok(Self::video()),
            "audio" => Ok(Self::audio()),
            "archives" => Ok(Self::archives()),
            "markups" => Ok(Self::markups()),
            "binaries" => Ok(Self::binaries()),
            other => content_type(other)
                .map(|t| Self::custom(t.name, t.extensions.iter()))
                .ok_or_else(|| ConfigError::UnknownTypeGroup(other.to_string())),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn extensions(&self) -> impl Iterator<Item = &str> {
        self.extensions.iter().map(String::as_str)
    }
}
