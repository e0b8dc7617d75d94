pub mod compress;
pub mod decompress;

#[derive(clap::Subcommand)]
pub enum QfsCommands {
    /// Compress a file with QFS
    Compress(compress::CompressArgs),
    /// Decompress a QFS file
    Decompress(decompress::DecompressArgs),
}

impl QfsCommands {
    pub fn handle(&self) -> miette::Result<()> {
        match self {
            QfsCommands::Compress(compress) => compress.handle(),
            QfsCommands::Decompress(decompress) => decompress.handle(),
        }
    }
}

/// Opens the output file, refusing to replace an existing one unless asked to
pub(crate) fn create_output(
    path: &std::path::Path,
    overwrite: bool,
) -> miette::Result<std::fs::File> {
    use miette::{Context, IntoDiagnostic};

    let file = if !overwrite {
        std::fs::File::create_new(path)
    } else {
        std::fs::File::create(path)
    };
    file.into_diagnostic()
        .context(format!("creating {}", path.display()))
}
