// Copyright (c) 2026 rezky_nightky

use std::io::IsTerminal;

use clap::Parser;

pub const DEFAULT_PARAMS_USAGE: &str = "DEFAULT PARAMS USAGE:\n  bitrain --interval 50 --columns 50 --p0 0.3 --p1 0.3 --text-color green --background-color black";

pub fn color_enabled_stdout() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    if matches!(std::env::var("CLICOLOR").ok().as_deref(), Some("0")) {
        return false;
    }
    std::io::stdout().is_terminal()
}

fn colorize_help_detail(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 64);
    for chunk in text.split_inclusive('\n') {
        let (line, nl) = chunk
            .strip_suffix('\n')
            .map(|l| (l, "\n"))
            .unwrap_or((chunk, ""));

        let is_heading =
            !line.starts_with(' ') && line.ends_with(':') && line == line.to_ascii_uppercase();

        if is_heading {
            out.push_str("\x1b[1;36m");
            out.push_str(line);
            out.push_str("\x1b[0m");
            out.push_str(nl);
            continue;
        }

        if let Some(rest) = line.strip_prefix("      Example:") {
            out.push_str("      \x1b[32mExample:\x1b[0m");
            out.push_str(rest);
            out.push_str(nl);
            continue;
        }

        if let Some(rest) = line.strip_prefix("  bitrain") {
            out.push_str("  \x1b[1;34mbitrain\x1b[0m");
            out.push_str(rest);
            out.push_str(nl);
            continue;
        }

        if let Some(rest) = line.strip_prefix("  -") {
            out.push_str("  \x1b[33m-");
            out.push_str(rest);
            out.push_str("\x1b[0m");
            out.push_str(nl);
            continue;
        }

        out.push_str(line);
        out.push_str(nl);
    }
    out
}

pub fn default_params_usage_for_help() -> String {
    if color_enabled_stdout() {
        colorize_help_detail(DEFAULT_PARAMS_USAGE)
    } else {
        DEFAULT_PARAMS_USAGE.to_string()
    }
}

#[derive(Parser, Debug, Clone)]
#[command(name = "bitrain", version, disable_version_flag = true)]
pub struct Args {
    #[arg(
        long = "interval",
        default_value_t = 50,
        help_heading = "SCENE",
        help = "Emission interval in ms (min 1 max 60000)"
    )]
    pub interval: u64,

    #[arg(
        short = 'n',
        long = "columns",
        default_value_t = 50,
        help_heading = "SCENE",
        help = "Column count (min 0 max 100)"
    )]
    pub columns: u16,

    #[arg(
        long = "p0",
        default_value_t = 0.3,
        help_heading = "SCENE",
        help = "Probability of a \"0\" symbol (min 0 max 1; p0 + p1 must not exceed 1)"
    )]
    pub p0: f64,

    #[arg(
        long = "p1",
        default_value_t = 0.3,
        help_heading = "SCENE",
        help = "Probability of a \"1\" symbol (min 0 max 1; p0 + p1 must not exceed 1)"
    )]
    pub p1: f64,

    #[arg(
        short = 't',
        long = "text-color",
        default_value = "green",
        help_heading = "APPEARANCE",
        help = "Text color, name or #RRGGBB (see --list-colors)"
    )]
    pub text_color: String,

    #[arg(
        short = 'B',
        long = "background-color",
        default_value = "black",
        help_heading = "APPEARANCE",
        help = "Background color, name or #RRGGBB (see --list-colors)"
    )]
    pub background_color: String,

    #[arg(
        long = "colormode",
        help_heading = "APPEARANCE",
        help = "Force color mode (allowed: 0,16,8/256,24). Default: 24-bit if supported (COLORTERM), else 8-bit (TERM=...256color)"
    )]
    pub colormode: Option<u16>,

    #[arg(
        long = "duration",
        help_heading = "GENERAL",
        help = "Stop after N seconds (min 0.1 max 86400; <=0 disables)"
    )]
    pub duration: Option<f64>,

    #[arg(
        short = 's',
        long = "screensaver",
        help_heading = "GENERAL",
        help = "Screensaver mode (exit on keypress)"
    )]
    pub screensaver: bool,

    #[arg(
        long = "check-bitcolor",
        help_heading = "HELP",
        help = "Print detected terminal color capability and exit"
    )]
    pub check_bitcolor: bool,

    #[arg(
        long = "help-detail",
        help_heading = "HELP",
        help = "Show detailed help for all parameters and exit"
    )]
    pub help_detail: bool,

    #[arg(
        long = "list-colors",
        help_heading = "HELP",
        help = "List available color names and exit"
    )]
    pub list_colors: bool,

    #[arg(
        long = "info",
        short = 'i',
        help_heading = "HELP",
        help = "Print version info and exit"
    )]
    pub info: bool,

    #[arg(
        long = "version",
        short = 'v',
        help_heading = "HELP",
        help = "Print version and exit"
    )]
    pub version: bool,
}

pub fn print_list_colors() {
    if color_enabled_stdout() {
        println!("\x1b[1;36mAVAILABLE COLOR NAMES:\x1b[0m");
        println!("\x1b[2mNOTE: Any #RRGGBB value works too.\x1b[0m");
    } else {
        println!("AVAILABLE COLOR NAMES:");
        println!("NOTE: Any #RRGGBB value works too.");
    }
    println!();
    for (name, rgb) in crate::palette::NAMED_COLORS {
        println!("{:<12} #{:02x}{:02x}{:02x}", name, rgb.r, rgb.g, rgb.b);
    }
}

pub fn print_help_detail() {
    let block = format!(
        "{}\n\nUSAGE:\n  bitrain [OPTIONS]\n\nSCENE:\n  --interval <ms>\n      Emission interval in milliseconds (min 1 max 60000).\n      Example: bitrain --interval 30\n\n  -n, --columns <count>\n      Column count (min 0 max 100).\n      Example: bitrain -n 80\n\n  --p0 <probability>\n      Probability of a \"0\" symbol (min 0 max 1).\n      Example: bitrain --p0 0.5\n\n  --p1 <probability>\n      Probability of a \"1\" symbol (min 0 max 1). The remainder\n      1 - p0 - p1 is the blank probability.\n      Example: bitrain --p1 0.2\n\nAPPEARANCE:\n  -t, --text-color <color>\n      Text color, a name or #RRGGBB.\n      Example: bitrain -t '#00ff41'\n\n  -B, --background-color <color>\n      Background color, a name or #RRGGBB.\n      Example: bitrain -B black\n\n  --colormode <0|16|8|24>\n      Force color mode; otherwise auto-detected from COLORTERM/TERM.\n      Example: bitrain --colormode 24\n\nGENERAL:\n  -s, --screensaver\n      Screensaver mode (exit on keypress).\n      Example: bitrain -s\n\n  --duration <seconds>\n      Stop after N seconds (min 0.1 max 86400).\n      Example: bitrain --duration 10\n\nKEYS:\n  Up/Down       faster / slower emission\n  Left/Right    fewer / more columns\n  [ ]           lower / raise p0\n  {{ }}           lower / raise p1\n  1-8           text color presets\n  b             cycle background color\n  q, Esc        quit\n\nHELP:\n  --check-bitcolor\n      Print detected terminal color capability and exit.\n\n  --help\n      Show short help.\n\n  --help-detail\n      Show this detailed help.\n\n  --list-colors\n      List available color names and exit.\n\n  -v, --version\n      Print version and exit.\n\n  -i, --info\n      Print version info and exit.\n",
        DEFAULT_PARAMS_USAGE
    );

    if color_enabled_stdout() {
        print!("{}", colorize_help_detail(&block));
    } else {
        print!("{}", block);
    }

    println!("LIMITS / VALID RANGES:");
    println!("  --interval <ms>          min 1 max 60000");
    println!("  --columns <count>        min 0 max 100");
    println!("  --p0 <probability>       min 0 max 1");
    println!("  --p1 <probability>       min 0 max 1 (p0 + p1 <= 1)");
    println!("  --duration <seconds>     min 0.1 max 86400 (<=0 disables)");
    println!("  --colormode <0|16|8|24>  allowed values only (8==256)");
    println!();
    print_list_colors();
}
