//! Application context: one opened file, its model and the view over it.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use skope::model::{BlockModel, ItemModel};
use skope::view::TreeView;
use skope_core::logging::{span_names, targets};
use skope_core::{PerfSpan, TreeFormatOptions};

use crate::error::{CliError, CliResult};
use crate::formats::{self, FileFormat};

pub struct App {
    path: PathBuf,
    format: FileFormat,
    model: Arc<BlockModel>,
    view: TreeView,
}

impl App {
    /// Reads `path`, sniffs its format and installs the header blocks in a
    /// fresh model.
    pub fn load(path: &Path) -> CliResult<Self> {
        let _span = PerfSpan::new(span_names::LOAD);

        let data = std::fs::read(path).map_err(|source| CliError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let format = formats::detect(&data).ok_or_else(|| CliError::UnsupportedFormat {
            path: path.to_path_buf(),
        })?;
        let blocks = format.read_blocks(&data).map_err(|source| CliError::Malformed {
            path: path.to_path_buf(),
            format: format.name(),
            source,
        })?;

        tracing::debug!(
            target: targets::CLI,
            path = %path.display(),
            %format,
            blocks = blocks.len(),
            bytes = data.len(),
            "loaded file"
        );

        let model = Arc::new(BlockModel::new(blocks));
        let shared: Arc<dyn ItemModel> = model.clone();
        let view = TreeView::new().with_model(shared);

        Ok(Self {
            path: path.to_path_buf(),
            format,
            model,
            view,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> FileFormat {
        self.format
    }

    pub fn model(&self) -> &BlockModel {
        &self.model
    }

    /// Expands the view. `None` opens everything, `Some(0)` leaves only the
    /// blocks visible and `Some(n)` shows `n` levels below them.
    pub fn expand(&mut self, depth: Option<usize>) {
        match depth {
            None => self.view.expand_all(),
            Some(0) => self.view.collapse_all(),
            Some(levels) => {
                self.view.collapse_all();
                self.view.expand_to_depth(levels - 1);
            }
        }
    }

    pub fn render(&mut self, options: TreeFormatOptions) -> String {
        self.view.set_options(options);
        self.view.render()
    }
}
