pub mod extract;
pub mod list;

#[derive(clap::Subcommand)]
pub enum FshCommands {
    /// List the textures of an FSH file
    List(list::ListArgs),
    /// Extract the textures of FSH files into a directory
    Extract(extract::ExtractArgs),
}

impl FshCommands {
    pub fn handle(&self) -> miette::Result<()> {
        match self {
            FshCommands::List(list) => list.handle(),
            FshCommands::Extract(extract) => extract.handle(),
        }
    }
}
