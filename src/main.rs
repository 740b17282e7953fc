use clap::Parser;
use lockbox::cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

fn main() {
    // Diagnostics go to stderr; `LOCKBOX_LOG=debug` for vault internals.
    let filter = EnvFilter::try_from_env("LOCKBOX_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init { ref cipher } => lockbox::cli::commands::init::execute(&cli, cipher.as_deref()),
        Commands::Add {
            ref title,
            ref username,
            ref password,
        } => lockbox::cli::commands::add::execute(&cli, title, username, password.as_deref()),
        Commands::List => lockbox::cli::commands::list::execute(&cli),
        Commands::Show { id } => lockbox::cli::commands::show::execute(&cli, id),
        Commands::Edit {
            id,
            ref title,
            ref username,
            ref password,
            password_prompt,
        } => lockbox::cli::commands::edit::execute(
            &cli,
            id,
            title.as_deref(),
            username.as_deref(),
            password.as_deref(),
            password_prompt,
        ),
        Commands::Delete { id, force } => lockbox::cli::commands::delete::execute(&cli, id, force),
    };

    if let Err(e) = result {
        lockbox::cli::output::error(&e.to_string());
        std::process::exit(1);
    }
}
