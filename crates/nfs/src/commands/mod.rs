pub mod fsh;
pub mod qfs;

#[derive(clap::Subcommand)]
pub enum Commands {
    /// Handle FSH texture archives
    Fsh {
        #[command(subcommand)]
        command: fsh::FshCommands,
    },
    /// Handle QFS compressed files
    Qfs {
        #[command(subcommand)]
        command: qfs::QfsCommands,
    },
}

impl Commands {
    pub fn handle(&self) -> miette::Result<()> {
        match self {
            Commands::Fsh { command } => command.handle(),
            Commands::Qfs { command } => command.handle(),
        }
    }
}
