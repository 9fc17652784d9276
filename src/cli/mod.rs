// src/cli/mod.rs

use clap::Parser;

pub mod command;
pub mod dispatcher;
pub mod handlers;

/// Replaces the semantic tags used in help texts (`<title>`, `<cmd>`, ...)
/// with ANSI styles, or strips them when colours are disabled.
pub fn render_markup(template: &str) -> String {
    let use_colors = colored::control::SHOULD_COLORIZE.should_colorize();

    let title = if use_colors { "\x1b[1;33m" } else { "" }; // Bold Yellow
    let hl = if use_colors { "\x1b[1;36m" } else { "" }; // Bold Cyan
    let cmd = if use_colors { "\x1b[36m" } else { "" }; // Cyan
    let group = if use_colors { "\x1b[1;32m" } else { "" }; // Bold Green
    let dim = if use_colors { "\x1b[2m" } else { "" };
    let reset = if use_colors { "\x1b[0m" } else { "" };

    template
        .replace("<title>", title)
        .replace("</title>", reset)
        .replace("<hl>", hl)
        .replace("</hl>", reset)
        .replace("<cmd>", cmd)
        .replace("</cmd>", reset)
        .replace("<group>", group)
        .replace("</group>", reset)
        .replace("<dim>", dim)
        .replace("</dim>", reset)
}

fn build_help_string() -> &'static str {
    Box::leak(render_markup(t!("cli.help.template")).into_boxed_str())
}

/// socialbook: a keyboard-driven case book for social workers.
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about,
    help_template = { build_help_string() },
    styles = clap::builder::Styles::styled()
        .header(clap::builder::styling::AnsiColor::Yellow.on_default().bold())
        .usage(clap::builder::styling::AnsiColor::Yellow.on_default().bold())
        .literal(clap::builder::styling::AnsiColor::Cyan.on_default().bold())
        .placeholder(clap::builder::styling::AnsiColor::Green.on_default()),
)]
#[command(disable_help_subcommand = true)]
#[command(trailing_var_arg = true)]
pub struct Cli {
    /// Directory holding socialbook.json, appointments.json and preferences.toml.
    #[arg(long, value_name = "PATH")]
    pub data_dir: Option<String>,

    /// A single command to run instead of starting the interactive prompt,
    /// e.g. `socialbook list all/`.
    #[arg(allow_hyphen_values = true)]
    pub command: Vec<String>,
}
