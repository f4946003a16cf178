//! Bracket manager CLI
//!
//! Build a bracket from a list of names, pick winners, share and export it.

use bracket::{BracketConfig, ExportFormat, FileStore, Session, StatusLevel, CONFIG_FILE};
use bracket_core::{first_round_pairings, BracketSize, MatchId, Side, SlotRef};
use std::env;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

fn print_usage() {
    println!("Drift Bracket Manager");
    println!();
    println!("Usage:");
    println!("  bracket [--config FILE] <command>");
    println!();
    println!("Commands:");
    println!("  new <file|-> [--name NAME]   - Create a bracket from one name per line");
    println!("  pick <match> <name>          - Record the winner of a match");
    println!("  click <match> <top|bottom>   - Pick whoever is in that slot");
    println!("  show [--html]                - Print the current bracket");
    println!("  reset                        - Clear every picked winner");
    println!("  clear                        - Forget the saved bracket");
    println!("  share                        - Print a link that reopens this bracket");
    println!("  open <link|code>             - Load a bracket from a share link");
    println!("  export [path] [--html]       - Write the bracket to a file");
    println!("  seeds <16|32>                - Show the first-round seeding");
    println!();
    println!("Matches are named r<round>_m<number> (e.g. r1_m3) or 'championship'.");
    println!();
    println!("Examples:");
    println!("  bracket new drivers.txt --name \"Spring Cup\"");
    println!("  bracket pick r1_m1 \"Alice\"");
    println!("  bracket export cup.html --html");
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&str>) -> BracketConfig {
    match path {
        Some(path) => match BracketConfig::load(Path::new(path)) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Warning: {}", e);
                eprintln!("Using default settings");
                BracketConfig::default()
            }
        },
        None => BracketConfig::load_or_default(Path::new(CONFIG_FILE)),
    }
}

/// Removes `--config FILE` from the arguments, returning the file
fn take_config_flag(args: &mut Vec<String>) -> Option<String> {
    let index = args.iter().position(|a| a == "--config" || a == "-c")?;
    if index + 1 >= args.len() {
        args.remove(index);
        return None;
    }
    let value = args.remove(index + 1);
    args.remove(index);
    Some(value)
}

fn read_entrant_text(source: &str) -> Result<String, String> {
    if source == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .map_err(|e| format!("Failed to read stdin: {}", e))?;
        Ok(text)
    } else {
        std::fs::read_to_string(source).map_err(|e| format!("Failed to read {}: {}", source, e))
    }
}

fn run_new(session: &mut Session, args: &[String]) {
    if args.is_empty() {
        eprintln!("Error: new requires a file of entrant names (or - for stdin)");
        print_usage();
        return;
    }

    let mut name: Option<String> = None;
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--name" | "-n" => {
                if i + 1 < args.len() {
                    name = Some(args[i + 1].clone());
                    i += 1;
                }
            }
            other => eprintln!("Ignoring unknown option: {}", other),
        }
        i += 1;
    }

    let text = match read_entrant_text(&args[0]) {
        Ok(text) => text,
        Err(e) => {
            session.status_mut().error(e);
            return;
        }
    };
    if session.submit_entrants(name.as_deref(), &text) {
        print!("{}", session.view().render_text());
    }
}

fn run_pick(session: &mut Session, args: &[String]) {
    if args.len() < 2 {
        eprintln!("Error: pick requires a match and a winner");
        print_usage();
        return;
    }
    let winner = args[1..].join(" ");
    session.record_winner(&args[0], &winner);
}

fn run_click(session: &mut Session, args: &[String]) {
    if args.len() < 2 {
        eprintln!("Error: click requires a match and a side");
        print_usage();
        return;
    }
    let match_id: MatchId = match args[0].parse() {
        Ok(id) => id,
        Err(e) => {
            session.status_mut().error(e.to_string());
            return;
        }
    };
    let side: Side = match args[1].parse() {
        Ok(side) => side,
        Err(e) => {
            session.status_mut().error(e);
            return;
        }
    };
    session.click(SlotRef::new(match_id, side));
}

fn has_flag(args: &[String], flag: &str) -> bool {
    args.iter().any(|a| a == flag)
}

fn run_show(session: &Session, args: &[String]) {
    if session.state().is_none() {
        println!("No bracket loaded. Create one with: bracket new <file>");
        return;
    }
    if has_flag(args, "--html") {
        print!("{}", session.view().render_html());
    } else {
        print!("{}", session.view().render_text());
    }
}

fn run_export(session: &mut Session, args: &[String]) {
    let format = if has_flag(args, "--html") {
        ExportFormat::Html
    } else {
        ExportFormat::Text
    };
    let path = args.iter().find(|a| !a.starts_with("--")).map(PathBuf::from);
    session.export(path.as_deref(), format);
}

fn show_seeds(args: &[String]) {
    let size = match args.first().map(String::as_str) {
        Some("16") => BracketSize::Top16,
        Some("32") | None => BracketSize::Top32,
        Some(other) => {
            eprintln!("Unknown bracket size: {} (expected 16 or 32)", other);
            return;
        }
    };

    println!("=== Top {} seeding ===", size);
    for (number, (top, bottom)) in first_round_pairings(size).into_iter().enumerate() {
        println!(
            "r1_m{:<3} seed {:>2} vs seed {:>2}",
            number + 1,
            top,
            bottom
        );
    }
}

fn print_status(session: &mut Session) -> bool {
    let mut failed = false;
    for message in session.status_mut().drain() {
        match message.level {
            StatusLevel::Error => {
                failed = true;
                eprintln!("Error: {}", message.text);
            }
            _ => println!("{}", message.text),
        }
    }
    failed
}

fn main() {
    init_tracing();

    let mut args: Vec<String> = env::args().collect();
    let config_path = take_config_flag(&mut args);

    if args.len() < 2 {
        print_usage();
        return;
    }

    let command = args[1].clone();
    let rest = &args[2..];

    match command.as_str() {
        "help" | "--help" | "-h" => {
            print_usage();
            return;
        }
        "seeds" => {
            show_seeds(rest);
            return;
        }
        _ => {}
    }

    let config = load_config(config_path.as_deref());
    let store = FileStore::new(config.store_path.clone());
    let mut session = Session::new(config, Box::new(store));

    match command.as_str() {
        "new" => run_new(&mut session, rest),
        "clear" => session.clear(),
        "open" => {
            if rest.is_empty() {
                eprintln!("Error: open requires a share link or code");
                print_usage();
                return;
            }
            if session.load_startup(Some(rest[0].as_str())) {
                print!("{}", session.view().render_text());
            }
        }
        _ => {
            session.load_startup(None);
            match command.as_str() {
                "pick" => run_pick(&mut session, rest),
                "click" => run_click(&mut session, rest),
                "show" => run_show(&session, rest),
                "reset" => {
                    session.reset();
                }
                "share" => {
                    if let Some(url) = session.share_url() {
                        println!("{}", url);
                    }
                }
                "export" => run_export(&mut session, rest),
                _ => {
                    eprintln!("Unknown command: {}", command);
                    print_usage();
                }
            }
        }
    }

    if print_status(&mut session) {
        std::process::exit(1);
    }
}
