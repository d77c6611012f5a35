use crate::api::write_modules_file;
use crate::cli::ParseArgs;
use crate::fs::{FileSystem, default_fs};
use crate::model::Module;
use crate::parser::{ParserRegistry, discover_modules};
use crate::style;

use super::CommandContext;

pub fn cmd_parse(args: ParseArgs) -> i32 {
    cmd_parse_with_fs(args, default_fs())
}

pub fn cmd_parse_with_fs(args: ParseArgs, fs: &dyn FileSystem) -> i32 {
    let ctx = match CommandContext::new(&args.path) {
        Ok(ctx) => ctx,
        Err(code) => return code,
    };

    let modules = discover_modules(&ctx.path, &ParserRegistry::new(), fs);
    if modules.is_empty() {
        style::warning(&format!("No Python files found in {}", style::path(&ctx.path)));
    }

    if let Err(e) = write_modules_file(&args.output, &modules, fs) {
        style::error(&format!("Failed to write {}: {}", style::path(&args.output), e));
        return 1;
    }

    style::success(&format!("Wrote {}", style::path(&args.output)));
    print_summary(&modules);
    0
}

fn print_summary(modules: &[Module]) {
    let functions: usize = modules.iter().map(|m| m.functions.len()).sum();
    let calls: usize = modules
        .iter()
        .flat_map(|m| m.functions.iter())
        .map(|f| f.calls.len())
        .sum();

    println!("{}", style::metric("modules", modules.len()));
    println!("{}", style::metric("functions", functions));
    println!("{}", style::metric("call references", calls));
}
