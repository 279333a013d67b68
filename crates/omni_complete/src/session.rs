//
// session.rs
//
// Copyright (C) 2024 Posit Software, PBC. All rights reserved.
//
//

use std::fs;
use std::path::Path;
use std::path::PathBuf;

use anyhow::Context;

/// The R session that writes the listings we complete from.
///
/// Requests are fire-and-forget: the session writes the file in its own
/// time and we read whatever is on disk when we need it.
pub trait Session {
    fn is_running(&self) -> bool;

    fn start(&mut self) -> anyhow::Result<()>;

    /// Asks the session to write the lines of `expression` to `destination`
    fn request_serialize(&mut self, expression: &str, destination: &Path) -> anyhow::Result<()>;

    /// Asks the session to write the omni listing of the global environment
    /// to `destination`
    fn request_object_listing(&mut self, destination: &Path) -> anyhow::Result<()>;

    /// Marks a temporary file for removal when the session goes away
    fn register_for_deletion(&mut self, _path: &Path) {}

    fn read_records(&self, path: &Path) -> anyhow::Result<Vec<String>> {
        read_records(path)
    }
}

/// Reads a listing, one trimmed record per line
pub fn read_records(path: &Path) -> anyhow::Result<Vec<String>> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Can't read listing '{}'", path.display()))?;

    Ok(contents
        .lines()
        .map(|line| line.trim().to_string())
        .collect())
}

/// R code writing the lines of `expression` to `destination`
pub fn write_lines_command(expression: &str, destination: &Path) -> String {
    format!(
        "writeLines(text = paste({expression}, collapse=\"\\n\"), con = \"{}\")",
        destination.display()
    )
}

/// Channel to the editor plugin that owns the R session
pub trait Transport {
    fn start(&mut self) -> anyhow::Result<()>;

    fn is_running(&self) -> bool;

    /// Sends raw code to nvimcom, the R side of nvim-R
    fn send(&mut self, command: &str) -> anyhow::Result<()>;

    /// Asks the plugin to rebuild the global environment listing
    fn build_object_listing(&mut self) -> anyhow::Result<()>;
}

/// Session driven through nvimcom.
///
/// Temporary files registered for deletion are removed on drop.
pub struct NvimcomSession<T: Transport> {
    id: String,
    transport: T,
    object_listing: PathBuf,
    to_delete: Vec<PathBuf>,
}

impl<T: Transport> NvimcomSession<T> {
    /// `object_listing` is the file the plugin writes the global environment
    /// listing to, which it doesn't let us choose
    pub fn new(id: impl Into<String>, transport: T, object_listing: PathBuf) -> Self {
        Self {
            id: id.into(),
            transport,
            object_listing,
            to_delete: Vec::new(),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }
}

impl<T: Transport> Session for NvimcomSession<T> {
    fn is_running(&self) -> bool {
        self.transport.is_running()
    }

    fn start(&mut self) -> anyhow::Result<()> {
        self.transport.start()
    }

    fn request_serialize(&mut self, expression: &str, destination: &Path) -> anyhow::Result<()> {
        // nvimcom expects commands prefixed with ^H and the session id
        let command = format!(
            "\x08{}{}",
            self.id,
            write_lines_command(expression, destination)
        );
        self.transport.send(&command)
    }

    fn request_object_listing(&mut self, destination: &Path) -> anyhow::Result<()> {
        if destination != self.object_listing {
            log::warn!(
                "Object listing is written to '{}', not '{}'",
                self.object_listing.display(),
                destination.display()
            );
        }
        self.transport.build_object_listing()
    }

    fn register_for_deletion(&mut self, path: &Path) {
        if !self.to_delete.iter().any(|existing| existing == path) {
            self.to_delete.push(path.to_path_buf());
        }
    }
}

impl<T: Transport> Drop for NvimcomSession<T> {
    fn drop(&mut self) {
        for path in self.to_delete.drain(..) {
            if let Err(err) = fs::remove_file(&path) {
                if err.kind() != std::io::ErrorKind::NotFound {
                    log::warn!("Can't remove '{}': {err}", path.display());
                }
            }
        }
    }
}

/// Session whose listings are kept up to date by someone else, e.g. the
/// editor plugin. Requests are no-ops.
#[derive(Debug, Default)]
pub struct OfflineSession;

impl Session for OfflineSession {
    fn is_running(&self) -> bool {
        true
    }

    fn start(&mut self) -> anyhow::Result<()> {
        Ok(())
    }

    fn request_serialize(&mut self, expression: &str, destination: &Path) -> anyhow::Result<()> {
        log::trace!(
            "Offline session: not serializing `{expression}` to '{}'",
            destination.display()
        );
        Ok(())
    }

    fn request_object_listing(&mut self, destination: &Path) -> anyhow::Result<()> {
        log::trace!(
            "Offline session: not listing objects to '{}'",
            destination.display()
        );
        Ok(())
    }
}
