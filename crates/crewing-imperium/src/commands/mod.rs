pub mod allocate;
pub mod catalog;

use allocate::AllocateArgs;
use anyhow::Result;
use catalog::CatalogArgs;
use clap::Subcommand;

use crate::Cli;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Optimize crew assignments for a date window and print the report
    Allocate(AllocateArgs),
    /// Show the effective requirement catalog
    Catalog(CatalogArgs),
}

pub fn handle_command(cli: &Cli) -> Result<String> {
    match &cli.command {
        Commands::Allocate(allocate_args) => allocate::allocate(allocate_args),
        Commands::Catalog(catalog_args) => catalog::catalog(catalog_args),
    }
}
