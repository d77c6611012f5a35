use crate::api::load_modules_file;
use crate::cli::ServeArgs;
use crate::fs::default_fs;
use crate::parser::{ParserRegistry, discover_modules};
use crate::server::{AppState, Answerer, FunctionIndex, OllamaAnswerer};
use crate::style;

use super::{CommandContext, runtime};

pub fn cmd_serve(args: ServeArgs) -> i32 {
    let ctx = match CommandContext::new(&args.path) {
        Ok(ctx) => ctx,
        Err(code) => return code,
    };

    let modules = match &args.data {
        Some(data) => match load_modules_file(data, default_fs()) {
            Ok(modules) => modules,
            Err(e) => {
                style::error(&format!("Could not load {}: {}", style::path(data), e));
                return 1;
            }
        },
        None => discover_modules(&ctx.path, &ParserRegistry::new(), default_fs()),
    };

    let host = args.host.unwrap_or(ctx.config.server.host);
    let port = args.port.unwrap_or(ctx.config.server.port);

    let chat = ctx.config.chat;
    let index = FunctionIndex::new(&modules, chat.top_k);
    let functions = index.len();
    let answerer: Box<dyn Answerer> = match args.model.or(chat.model) {
        Some(model) => {
            let answerer = OllamaAnswerer::new(index, &chat.endpoint, &model);
            tracing::info!(model = %answerer.model(), endpoint = %chat.endpoint, "answering chat with model");
            Box::new(answerer)
        }
        None => Box::new(index),
    };
    let state = AppState { modules, answerer };

    let rt = match runtime() {
        Ok(rt) => rt,
        Err(code) => return code,
    };

    style::header("Starting callmap server...");
    println!("{}", style::metric("functions indexed", functions));
    println!(
        "Diagram data: {}",
        style::url(&format!("http://{}:{}/diagram-data", host, port))
    );
    println!("Press Ctrl+C to stop");

    if let Err(e) = rt.block_on(crate::server::serve(state, &host, port)) {
        style::error(&format!("Server failed: {}", e));
        return 1;
    }

    0
}
