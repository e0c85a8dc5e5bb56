pub mod commands;
pub mod logging;
pub mod sources;

use std::process::ExitCode;

use clap::Command;
use clap::CommandFactory;
use clap::Parser;
use clap_complete::Generator;
use clap_complete::Shell;
use clap_complete::generate;
use commands::Commands;

#[derive(Parser, Debug)]
#[command(name = "crewing", author, version, about, long_about = None)]
pub struct Cli {
    #[arg(long = "generate", value_enum)]
    generator: Option<Shell>,
    #[command(subcommand)]
    command: Commands,
}

fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    if let Some(generator) = cli.generator {
        let mut cmd = Cli::command();
        eprintln!("Generating completion file for {generator:?}...");
        print_completions(generator, &mut cmd);
    }

    let _guard = match logging::setup_logging() {
        Ok(guard) => guard,
        Err(error) => {
            eprintln!("{error:?}");
            return ExitCode::FAILURE;
        }
    };

    match commands::handle_command(&cli) {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(error) => {
            eprintln!("{error:?}");
            ExitCode::FAILURE
        }
    }
}

fn print_completions<G: Generator>(generator: G, cmd: &mut Command) {
    generate(generator, cmd, cmd.get_name().to_string(), &mut std::io::stdout());
}
