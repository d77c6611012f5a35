use crate::cli::ChatArgs;
use crate::client::{ChatClient, HttpClient};
use crate::graph::VisDataset;
use crate::interaction::{Controller, ControllerOptions};
use crate::style;
use std::io::{self, BufRead, Write};
use std::path::Path;
use tokio::runtime::Runtime;

use super::{CommandContext, runtime};

pub fn cmd_chat(args: ChatArgs) -> i32 {
    let ctx = match CommandContext::new(Path::new(".")) {
        Ok(ctx) => ctx,
        Err(code) => return code,
    };
    let base_url = args.url.unwrap_or(ctx.config.client.base_url);
    let client = HttpClient::new(&base_url);

    let rt = match runtime() {
        Ok(rt) => rt,
        Err(code) => return code,
    };

    // chat needs no diagram; the dataset engine stays empty
    let mut controller = Controller::new(VisDataset::default(), ControllerOptions::default());

    if !args.question.is_empty() {
        let mut input = args.question.join(" ");
        return match ask_and_print(&rt, &mut controller, &client, &mut input) {
            Ok(()) => 0,
            Err(e) => {
                style::error(&format!("Failed to write output: {}", e));
                1
            }
        };
    }

    style::header(&format!("Ask questions about the codebase at {}", style::url(&base_url)));
    style::hint("Type 'exit' or 'quit' to leave.");

    let stdin = io::stdin();
    loop {
        print!("❓ ");
        if io::stdout().flush().is_err() {
            return 1;
        }

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) => {
                style::error(&format!("Failed to read input: {}", e));
                return 1;
            }
        }

        if matches!(line.trim().to_lowercase().as_str(), "exit" | "quit") {
            break;
        }

        if let Err(e) = ask_and_print(&rt, &mut controller, &client, &mut line) {
            style::error(&format!("Failed to write output: {}", e));
            return 1;
        }
    }

    0
}

/// Submit one question, showing the pending turn while the request is in flight.
fn ask_and_print<C: ChatClient>(
    rt: &Runtime,
    controller: &mut Controller<VisDataset>,
    client: &C,
    input: &mut String,
) -> io::Result<()> {
    let mut out = io::stdout();

    let Some(request) = controller.submit_chat(input) else {
        return Ok(());
    };
    let shown = controller.chat().transcript().len();
    for turn in &controller.chat().transcript()[shown - 2..] {
        style::turn(turn, &mut out)?;
    }
    out.flush()?;

    let outcome = rt.block_on(client.ask(&request.question));
    controller.settle_chat(request.id, outcome);

    if let Some(turn) = controller.chat().transcript().last() {
        style::turn(turn, &mut out)?;
    }
    Ok(())
}
