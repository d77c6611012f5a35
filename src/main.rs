use callmap::cli::{Cli, Command};
use callmap::{cmd_chat, cmd_graph, cmd_init, cmd_parse, cmd_serve};
use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("callmap=info,tower_http=info")),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let exit_code = match cli.command {
        Command::Parse(args) => cmd_parse(args),
        Command::Serve(args) => cmd_serve(args),
        Command::Graph(args) => cmd_graph(args),
        Command::Chat(args) => cmd_chat(args),
        Command::Init(args) => cmd_init(args),
    };

    std::process::exit(exit_code);
}
