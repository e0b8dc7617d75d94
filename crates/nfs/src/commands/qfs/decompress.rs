use std::{io::Write, path::PathBuf};

use clap::Args;
use miette::{miette, Context, IntoDiagnostic, Result};
use tracing::info;

#[derive(Args)]
pub struct DecompressArgs {
    /// An input QFS file
    #[arg(short, long, value_name = "FILE")]
    file: PathBuf,

    /// A target file
    #[arg(short, long, value_name = "FILE")]
    output: PathBuf,

    /// Allow overwriting the target
    #[arg(long, default_value_t = false)]
    overwrite: bool,
}

impl DecompressArgs {
    pub fn handle(&self) -> Result<()> {
        let data = std::fs::read(&self.file)
            .into_diagnostic()
            .context(format!("path: {}", &self.file.display()))?;

        if !nfs_qfs::is_compressed(&data) {
            return Err(miette!("{} is not QFS compressed", self.file.display()));
        }

        let unpacked = nfs_qfs::decompress(&data)?;
        info!(
            "decompressed {} bytes into {} bytes",
            data.len(),
            unpacked.len()
        );

        let mut out = super::create_output(&self.output, self.overwrite)?;
        out.write_all(&unpacked).into_diagnostic()?;
        Ok(())
    }
}
