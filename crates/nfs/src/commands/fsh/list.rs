use std::path::PathBuf;

use clap::Args;
use itertools::Itertools;
use miette::{Context, IntoDiagnostic, Result};
use nfs_fsh::{types::Magic, Archive, Texture};
use owo_colors::OwoColorize;

#[derive(Args)]
pub struct ListArgs {
    /// An input FSH file
    #[arg(short, long, value_name = "FILE")]
    file: PathBuf,
}

fn flags(texture: &Texture) -> String {
    [
        (texture.has_palette(), "palette"),
        (texture.has_alpha(), "alpha"),
        (texture.was_compressed(), "compressed"),
    ]
    .into_iter()
    .filter_map(|(set, flag)| set.then_some(flag))
    .join(", ")
}

impl ListArgs {
    pub fn handle(&self) -> Result<()> {
        let data = std::fs::read(&self.file)
            .into_diagnostic()
            .context(format!("path: {}", &self.file.display()))?;
        let archive = Archive::parse(&data)?;

        let platform = match archive.header().magic {
            Magic::Pc => "PC",
            Magic::PlayStation => "PlayStation",
        };
        println!(
            "{} ({} archive{}, {} textures)",
            self.file.display().bold(),
            platform,
            if archive.was_compressed() {
                ", QFS compressed"
            } else {
                ""
            },
            archive.len()
        );

        for (index, texture) in archive.textures().iter().enumerate() {
            println!(
                "{:>4}  {:<4}  {:>5}x{:<5}  {:<10}  {}",
                index,
                texture.name().green(),
                texture.width(),
                texture.height(),
                format!("{:?}", texture.format()),
                flags(texture).dimmed()
            );
        }

        if let Some(palette) = archive.palette() {
            println!(
                "global palette: {} colours ({:?})",
                palette.len(),
                palette.format()
            );
        }

        if !archive.warnings().is_empty() {
            println!(
                "{}",
                format!("{} entries could not be read", archive.warnings().len()).yellow()
            );
        }

        Ok(())
    }
}
