//! Small CLI for exercising a theme file from the command line: loads a theme, matches a scope
//! (optionally against an ancestor scope stack), and prints the winning candidates.

use clap::Parser;
use themetrie::{RawTheme, create_theme};

#[derive(Parser)]
#[command(name = "themetrie-inspect", about = "Inspect how a theme resolves a scope")]
struct Args {
    /// Path to a theme JSON file.
    theme: String,

    /// The scope to match, e.g. `keyword.control.rust`.
    scope: String,

    /// Comma-separated ancestor scopes, oldest first, e.g. `source.rust,meta.function.rust`.
    #[arg(long)]
    stack: Option<String>,
}

fn main() -> Result<(), themetrie::Error> {
    let args = Args::parse();

    let raw = RawTheme::load_from_file(&args.theme)?;
    let theme = create_theme(&raw);

    println!("defaults: {:?}", theme.defaults());
    println!();

    println!("match('{}'):", args.scope);
    for candidate in theme.match_scope(&args.scope) {
        print_candidate(&theme, &candidate);
    }

    if let Some(stack) = args.stack {
        let scope_stack: Vec<String> = stack.split(',').map(str::trim).map(str::to_owned).collect();
        println!();
        println!("match_with_stack('{}', {:?}):", args.scope, scope_stack);
        match theme.match_with_stack(&args.scope, &scope_stack) {
            Some(winner) => print_candidate(&theme, &winner),
            None => println!("  (no candidate survived the parent-scope filter)"),
        }
    }

    Ok(())
}

fn print_candidate(theme: &themetrie::Theme, candidate: &themetrie::TrieNodeRule) {
    let foreground = candidate.foreground.and_then(|id| theme.color(id)).unwrap_or("(inherit)");
    let background = candidate.background.and_then(|id| theme.color(id)).unwrap_or("(inherit)");
    println!(
        "  depth={} parents={:?} font_style={:?} fg={} bg={}",
        candidate.scope_depth, candidate.parent_scopes, candidate.font_style, foreground, background
    );
}
