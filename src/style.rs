//! Terminal output: status lines for commands, and chat transcripts.

use crate::interaction::{ChatTurn, Role};
use colored::{ColoredString, Colorize};
use crossterm::style::Color;
use std::fmt::Display;
use std::io::{self, IsTerminal, Write};
use std::path::Path;
use termimad::{MadSkin, StyledChar};

fn tagged(tag: ColoredString, msg: &str) {
    eprintln!("{} {}", tag, msg);
}

pub fn error(msg: &str) {
    tagged("error:".red().bold(), msg);
}

pub fn warning(msg: &str) {
    tagged("warning:".yellow().bold(), msg);
}

/// Dimmed follow-up advice, printed to stderr after an error.
pub fn hint(msg: &str) {
    tagged("hint:".dimmed(), &msg.dimmed().to_string());
}

pub fn success(msg: &str) {
    println!("{} {}", "✓".green().bold(), msg);
}

pub fn header(msg: &str) {
    println!("{}", msg.cyan().bold());
}

pub fn section(title: &str) {
    println!("\n{}", title.bold());
}

pub fn path(p: &Path) -> String {
    p.display().to_string().bright_white().to_string()
}

pub fn url(u: &str) -> String {
    u.bright_blue().underline().to_string()
}

/// Indented `label: value` line used by the graph and parse summaries.
pub fn metric(label: &str, value: impl Display) -> String {
    format!("  {}: {}", label.dimmed(), value.to_string().cyan())
}

/// Write one transcript turn. Bot answers are markdown; a pending turn is dimmed.
pub fn turn(turn: &ChatTurn, output: &mut dyn Write) -> io::Result<()> {
    match turn.role {
        Role::User => writeln!(output, "{} {}", ">".green().bold(), turn.text),
        Role::Bot if turn.is_pending() => writeln!(output, "{}", turn.text.dimmed()),
        Role::Bot => {
            render_markdown(&turn.text, output)?;
            writeln!(output)
        }
    }
}

/// Render markdown with the chat skin on a TTY, or pass it through untouched.
pub fn render_markdown(markdown: &str, output: &mut dyn Write) -> io::Result<()> {
    if !io::stdout().is_terminal() {
        return write!(output, "{}", markdown);
    }
    write!(output, "{}", answer_skin().term_text(markdown))
}

fn answer_skin() -> MadSkin {
    let mut skin = MadSkin::default();
    skin.set_headers_fg(Color::Cyan);
    skin.bold.set_fg(Color::White);
    skin.italic.set_fg(Color::Magenta);
    skin.bullet = StyledChar::from_fg_char(Color::Blue, '•');
    // qualified names are inline code in answers
    skin.inline_code.set_fg(Color::Yellow);
    skin.code_block.set_fg(Color::Yellow);
    skin
}
