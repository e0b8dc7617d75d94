use std::{io::Write, path::PathBuf};

use clap::Args;
use miette::{Context, IntoDiagnostic, Result};
use nfs_qfs::CompressionLevel;
use tracing::info;

#[derive(Args)]
pub struct CompressArgs {
    /// An input file
    #[arg(short, long, value_name = "FILE")]
    file: PathBuf,

    /// A target QFS file
    #[arg(short, long, value_name = "FILE")]
    output: PathBuf,

    /// Match candidates tried per position, higher is smaller and slower
    #[arg(short, long, default_value_t = CompressionLevel::DEFAULT.0)]
    level: u16,

    /// Allow overwriting the target
    #[arg(long, default_value_t = false)]
    overwrite: bool,
}

impl CompressArgs {
    pub fn handle(&self) -> Result<()> {
        let data = std::fs::read(&self.file)
            .into_diagnostic()
            .context(format!("path: {}", &self.file.display()))?;

        let packed = nfs_qfs::compress(&data, CompressionLevel::from(self.level))?;
        info!(
            "compressed {} bytes into {} bytes",
            data.len(),
            packed.len()
        );

        let mut out = super::create_output(&self.output, self.overwrite)?;
        out.write_all(&packed).into_diagnostic()?;
        Ok(())
    }
}
