//! Template acquisition.
//!
//! A template comes from exactly one of: a git repository, a local
//! directory, or a downloadable tarball.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info};
use walkdir::WalkDir;

use crate::archive::ArchiveKind;
use crate::error::{GpcError, GpcResult};
use crate::renderer::VCS_DIR;
use crate::runner::CommandRunner;
use crate::transport::Transport;

/// A git repository and optional ref to check out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GitReference {
    pub url: String,
    pub branch: Option<String>,
    pub tag: Option<String>,
    pub commit: Option<String>,
}

impl GitReference {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    pub fn branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = Some(branch.into());
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn commit(mut self, commit: impl Into<String>) -> Self {
        self.commit = Some(commit.into());
        self
    }

    /// The ref to check out: branch, else tag, else commit.
    pub fn checkout_ref(&self) -> Option<&str> {
        [&self.branch, &self.tag, &self.commit]
            .into_iter()
            .flatten()
            .map(String::as_str)
            .find(|r| !r.is_empty())
    }

    /// Arguments for `git` cloning into `dest`.
    pub fn clone_args(&self, dest: &Path) -> Vec<String> {
        let mut args = vec!["clone".to_string()];
        if let Some(reference) = self.checkout_ref() {
            args.push("--branch".to_string());
            args.push(reference.to_string());
        }
        args.push(self.url.clone());
        args.push(dest.display().to_string());
        args
    }
}

/// Where the template comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateSource {
    Git(GitReference),
    Directory(PathBuf),
    Download(String),
}

/// Loosely specified source, as collected from command-line flags.
#[derive(Debug, Clone, Default)]
pub struct TemplateSourceSpec {
    pub git: Option<GitReference>,
    pub directory: Option<PathBuf>,
    pub download_url: Option<String>,
}

impl TemplateSourceSpec {
    /// Number of source kinds set.
    pub fn count(&self) -> usize {
        usize::from(self.git.is_some())
            + usize::from(self.directory.is_some())
            + usize::from(self.download_url.is_some())
    }
}

impl TryFrom<TemplateSourceSpec> for TemplateSource {
    type Error = GpcError;

    fn try_from(spec: TemplateSourceSpec) -> GpcResult<Self> {
        if spec.count() > 1 {
            let mut kinds = Vec::new();
            if spec.git.is_some() {
                kinds.push("repository");
            }
            if spec.directory.is_some() {
                kinds.push("existing directory");
            }
            if spec.download_url.is_some() {
                kinds.push("download URL");
            }
            return Err(GpcError::MultipleTemplateSources(kinds.join(", ")));
        }

        match (spec.git, spec.directory, spec.download_url) {
            (Some(git), None, None) => Ok(Self::Git(git)),
            (None, Some(dir), None) => Ok(Self::Directory(dir)),
            (None, None, Some(url)) => Ok(Self::Download(url)),
            _ => Err(GpcError::NoTemplateSource),
        }
    }
}

impl TemplateSource {
    /// Directory name a project created from this source defaults to:
    /// the repository, directory or archive name without its extension.
    pub fn project_name(&self) -> Option<String> {
        let last_segment = |s: &str| {
            s.split(['?', '#'])
                .next()
                .unwrap_or_default()
                .trim_end_matches('/')
                .rsplit(['/', ':'])
                .next()
                .map(str::to_string)
        };

        let name = match self {
            Self::Git(git) => last_segment(&git.url)
                .map(|n| n.strip_suffix(".git").map(str::to_string).unwrap_or(n)),
            Self::Directory(dir) => dir
                .canonicalize()
                .unwrap_or_else(|_| dir.clone())
                .file_name()
                .map(|n| n.to_string_lossy().into_owned()),
            Self::Download(url) => last_segment(url).map(|n| {
                const SUFFIXES: [&str; 7] =
                    [".tar.gz", ".tgz", ".tar.xz", ".txz", ".tar.bz2", ".tbz2", ".zip"];
                SUFFIXES
                    .iter()
                    .find_map(|suffix| n.strip_suffix(suffix))
                    .map(str::to_string)
                    .unwrap_or(n)
            }),
        };

        name.filter(|n| !n.is_empty() && n != "." && n != "..")
    }
}

impl std::fmt::Display for TemplateSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Git(git) => match git.checkout_ref() {
                Some(reference) => write!(f, "git {}@{}", git.url, reference),
                None => write!(f, "git {}", git.url),
            },
            Self::Directory(dir) => write!(f, "directory {}", dir.display()),
            Self::Download(url) => write!(f, "download {}", url),
        }
    }
}

/// Materializes a [`TemplateSource`] into a destination directory.
pub struct SourceResolver<'a> {
    runner: &'a dyn CommandRunner,
    transport: &'a dyn Transport,
}

impl<'a> SourceResolver<'a> {
    pub fn new(runner: &'a dyn CommandRunner, transport: &'a dyn Transport) -> Self {
        Self { runner, transport }
    }

    pub fn fetch(&self, source: &TemplateSource, dest: &Path) -> GpcResult<()> {
        info!("Fetching template from {} into {:?}", source, dest);
        match source {
            TemplateSource::Git(git) => self.clone_repository(git, dest),
            TemplateSource::Directory(dir) => copy_directory(dir, dest),
            TemplateSource::Download(url) => self.download_and_extract(url, dest),
        }
    }

    fn clone_repository(&self, git: &GitReference, dest: &Path) -> GpcResult<()> {
        self.runner.run("git", &git.clone_args(dest), None)
    }

    fn download_and_extract(&self, url: &str, dest: &Path) -> GpcResult<()> {
        // Dropped on every return path, removing the staged archive.
        let staging = tempfile::Builder::new().prefix("gpc-template").tempdir()?;

        let mut download = self.transport.get(url)?;
        let kind = ArchiveKind::detect(download.content_type.as_deref(), url)?;

        let archive = staging.path().join(format!("template.{}", kind.extension()));
        let mut file = File::create(&archive)?;
        let bytes = io::copy(&mut download.body, &mut file)
            .map_err(|e| GpcError::Transfer(format!("reading {}: {}", url, e)))?;
        drop(file);
        debug!("Downloaded {} bytes to {:?}", bytes, archive);

        fs::create_dir_all(dest)?;
        self.runner.run("tar", &kind.extract_args(&archive, dest)?, None)
    }
}

/// Recursively copy `src` into `dest`, skipping version-control directories.
pub fn copy_directory(src: &Path, dest: &Path) -> GpcResult<()> {
    if !src.is_dir() {
        return Err(GpcError::SourceNotFound(src.to_path_buf()));
    }

    fs::create_dir_all(dest)?;
    let mut copied = 0usize;

    for entry in WalkDir::new(src)
        .min_depth(1)
        .into_iter()
        .filter_entry(|e| !(e.file_type().is_dir() && e.file_name() == VCS_DIR))
    {
        let entry = entry?;
        let relative = entry
            .path()
            .strip_prefix(src)
            .map_err(|e| GpcError::Io(io::Error::other(e)))?;
        let target = dest.join(relative);

        if entry.file_type().is_symlink() {
            copy_symlink(entry.path(), &target)?;
            copied += 1;
        } else if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(entry.path(), &target)?;
            copied += 1;
        }
    }

    info!("Copied {} files from {:?}", copied, src);
    Ok(())
}

/// Recreate the link at `target`, pointing where `link` points.
#[cfg(unix)]
fn copy_symlink(link: &Path, target: &Path) -> GpcResult<()> {
    let points_to = fs::read_link(link)?;
    if target.symlink_metadata().is_ok() {
        fs::remove_file(target)?;
    }
    std::os::unix::fs::symlink(&points_to, target)?;
    debug!("Linked {:?} -> {:?}", target, points_to);
    Ok(())
}

/// Without portable symlinks, copy what the link resolves to.
#[cfg(not(unix))]
fn copy_symlink(link: &Path, target: &Path) -> GpcResult<()> {
    if link.is_dir() {
        copy_directory(link, target)
    } else {
        fs::copy(link, target)?;
        Ok(())
    }
}
