use clap::Parser;
use glazier::cli::{Cli, Commands};
use glazier::core::telemetry::{init_tracing, level_for};
use miette::Result;

fn main() -> Result<()> {
    // Reset SIGPIPE to default behavior (terminate silently) for proper Unix piping.
    // Without this, piping to `head`, `grep -q`, etc. causes a panic on broken pipe.
    #[cfg(unix)]
    {
        unsafe {
            libc::signal(libc::SIGPIPE, libc::SIG_DFL);
        }
    }
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }))?;

    let cli = Cli::parse();
    let global = cli.global;
    init_tracing(level_for(global.verbose, global.quiet));

    match cli.command {
        Commands::Init(args) => glazier::cli::commands::init::run(args),
        Commands::Ticket(cmd) => glazier::cli::commands::ticket::run(cmd, &global),
        Commands::Check(args) => glazier::cli::commands::check::run(args, &global),
        Commands::Measure(args) => glazier::cli::commands::measure::run(args, &global),
        Commands::Tech(args) => glazier::cli::commands::tech::run(args, &global),
        Commands::Customer(cmd) => glazier::cli::commands::customer::run(cmd, &global),
        Commands::Validate(args) => glazier::cli::commands::validate::run(args, &global),
        Commands::Config(cmd) => glazier::cli::commands::config::run(cmd, &global),
        Commands::Completions(args) => glazier::cli::commands::completions::run(args),
    }
}
