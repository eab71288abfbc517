//! Archive format selection for downloaded templates.

use std::path::Path;

use crate::error::{GpcError, GpcResult};

const ZIP_HINT: &str = " (zip does not support --strip-components, you should use a tarball)";

/// Archive formats a download can arrive in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveKind {
    TarGz,
    TarXz,
    TarBz2,
    Zip,
}

impl ArchiveKind {
    /// Map a `Content-Type` header value to an archive kind.
    pub fn from_content_type(content_type: &str) -> Option<Self> {
        let mime = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        match mime.as_str() {
            "application/x-gzip" | "application/gzip" => Some(Self::TarGz),
            "application/x-xz" => Some(Self::TarXz),
            "application/x-bzip2" => Some(Self::TarBz2),
            "application/zip" => Some(Self::Zip),
            _ => None,
        }
    }

    /// Guess the archive kind from a URL's file extension.
    pub fn from_url(url: &str) -> Option<Self> {
        let path = url
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();

        if path.ends_with(".tar.gz") || path.ends_with(".tgz") {
            Some(Self::TarGz)
        } else if path.ends_with(".tar.xz") || path.ends_with(".txz") {
            Some(Self::TarXz)
        } else if path.ends_with(".tar.bz2") || path.ends_with(".tbz2") {
            Some(Self::TarBz2)
        } else if path.ends_with(".zip") {
            Some(Self::Zip)
        } else {
            None
        }
    }

    /// Pick the kind for a download, trusting the declared content type
    /// unless it is missing or generic.
    pub fn detect(content_type: Option<&str>, url: &str) -> GpcResult<Self> {
        let declared = content_type.map(str::trim).filter(|ct| !ct.is_empty());

        let kind = match declared {
            Some(ct) if !is_generic(ct) => Self::from_content_type(ct),
            _ => Self::from_url(url),
        };

        match kind {
            Some(Self::Zip) => Err(GpcError::UnsupportedFileType {
                content_type: declared.unwrap_or("zip").to_string(),
                hint: ZIP_HINT.to_string(),
            }),
            Some(kind) => Ok(kind),
            None => Err(GpcError::UnsupportedFileType {
                content_type: declared.unwrap_or("<none>").to_string(),
                hint: String::new(),
            }),
        }
    }

    /// File extension used for the staged download.
    pub fn extension(self) -> &'static str {
        match self {
            Self::TarGz => "tar.gz",
            Self::TarXz => "tar.xz",
            Self::TarBz2 => "tar.bz2",
            Self::Zip => "zip",
        }
    }

    /// `tar` arguments extracting `archive` into `dest`, dropping the
    /// archive's top-level directory.
    pub fn extract_args(self, archive: &Path, dest: &Path) -> GpcResult<Vec<String>> {
        let flags = match self {
            Self::TarGz => "-xzf",
            Self::TarXz => "-xJf",
            Self::TarBz2 => "-xjf",
            Self::Zip => {
                return Err(GpcError::UnsupportedFileType {
                    content_type: "application/zip".to_string(),
                    hint: ZIP_HINT.to_string(),
                })
            }
        };

        Ok(vec![
            flags.to_string(),
            archive.display().to_string(),
            "-C".to_string(),
            dest.display().to_string(),
            "--strip-components=1".to_string(),
        ])
    }
}

fn is_generic(content_type: &str) -> bool {
    let mime = content_type.split(';').next().unwrap_or_default().trim();
    mime.eq_ignore_ascii_case("application/octet-stream")
        || mime.eq_ignore_ascii_case("binary/octet-stream")
}
