use std::path::{Path, PathBuf};

use clap::Args;
use miette::{miette, Context, IntoDiagnostic, Result};
use nfs_fsh::{extract_all, Archive, ExtractOptions};
use tracing::{info, warn};
use walkdir::WalkDir;

#[derive(Args)]
pub struct ExtractArgs {
    /// An input FSH file, or a directory searched for .fsh and .qfs files
    #[arg(short, long, value_name = "FILE")]
    file: PathBuf,

    /// A target directory
    #[arg(short, long, value_name = "DIR")]
    directory: PathBuf,

    /// Keep alpha in 32-bit images instead of writing separate alpha images
    #[arg(long, default_value_t = false)]
    combine_alpha: bool,

    /// Name images by index only
    #[arg(long, default_value_t = false)]
    index_names: bool,

    /// Allow overwriting the target
    #[arg(long, default_value_t = false)]
    overwrite: bool,
}

fn is_archive(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("fsh") || e.eq_ignore_ascii_case("qfs"))
}

impl ExtractArgs {
    fn extract(&self, path: &Path, directory: &Path, options: &ExtractOptions) -> Result<()> {
        info!("reading {}", path.display());

        let data = std::fs::read(path)
            .into_diagnostic()
            .context(format!("path: {}", path.display()))?;
        let archive = Archive::parse(&data)?;

        let written = extract_all(&archive, directory, options)
            .context(format!("extracting into {}", directory.display()))?;
        info!("wrote {} files to {}", written.len(), directory.display());

        Ok(())
    }

    pub fn handle(&self) -> Result<()> {
        let options = ExtractOptions::builder()
            .preserve_names(!self.index_names)
            .combine_alpha(self.combine_alpha)
            .overwrite(self.overwrite)
            .build();

        if !self.file.is_dir() {
            return self.extract(&self.file, &self.directory, &options);
        }

        let archives = WalkDir::new(&self.file)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file() && is_archive(e.path()))
            .collect::<Vec<_>>();

        if archives.is_empty() {
            return Err(miette!("no .fsh or .qfs files in {}", self.file.display()));
        }

        for entry in archives {
            let relative = entry
                .path()
                .strip_prefix(&self.file)
                .into_diagnostic()?
                .with_extension("");
            let target = self.directory.join(relative);

            // one bad archive does not stop the rest
            if let Err(err) = self.extract(entry.path(), &target, &options) {
                warn!("{}: {err:?}", entry.path().display());
            }
        }

        Ok(())
    }
}
