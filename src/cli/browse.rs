//! Line-oriented browsing shell on top of the [`Navigator`].

use std::io::Write;

use tokio::io::{AsyncBufReadExt, BufReader};
use url::Url;

use crate::app::{AppContext, Result};
use crate::cli::commands;
use crate::domain::{format_bytes, parse_size, ListingEntry};
use crate::listing::{describe, is_playable_video};
use crate::navigator::{Navigator, View};
use crate::store::Store;

const HELP: &str = "\
Commands:
  ls                 show the current view
  cat [id]           list categories, or open one
  cd <n|name|path>   open a folder (.. goes up)
  back / forward     move through history
  up                 parent folder
  home               welcome screen
  search <text>      search every category
  info <n|name>      details of an entry
  get <n|name>       download a file or a whole folder
  fav <n|name>       add to favorites
  open <n|name>      play a video with the system player
  help               this text
  quit               leave";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Empty,
    List,
    Categories,
    Category(String),
    Cd(String),
    Back,
    Forward,
    Up,
    Home,
    Search(String),
    Info(String),
    Get(String),
    Fav(String),
    Open(String),
    Help,
    Quit,
    Unknown(String),
}

pub fn parse_command(line: &str) -> ShellCommand {
    let line = line.trim();
    let (word, arg) = match line.split_once(char::is_whitespace) {
        Some((word, arg)) => (word, arg.trim().to_string()),
        None => (line, String::new()),
    };

    match (word, arg.is_empty()) {
        ("", _) => ShellCommand::Empty,
        ("ls", _) => ShellCommand::List,
        ("cat", true) => ShellCommand::Categories,
        ("cat", false) => ShellCommand::Category(arg),
        ("cd", false) if arg == ".." => ShellCommand::Up,
        ("cd", false) => ShellCommand::Cd(arg),
        ("back" | "b", _) => ShellCommand::Back,
        ("forward" | "f", _) => ShellCommand::Forward,
        ("up", _) => ShellCommand::Up,
        ("home", _) => ShellCommand::Home,
        ("search" | "/", false) => ShellCommand::Search(arg),
        ("info", false) => ShellCommand::Info(arg),
        ("get", false) => ShellCommand::Get(arg),
        ("fav", false) => ShellCommand::Fav(arg),
        ("open", false) => ShellCommand::Open(arg),
        ("help" | "?", _) => ShellCommand::Help,
        ("quit" | "exit" | "q", _) => ShellCommand::Quit,
        _ => ShellCommand::Unknown(line.to_string()),
    }
}

/// Entries the user can refer to in the current view.
pub fn visible_entries(view: &View) -> Vec<&ListingEntry> {
    match view {
        View::Home => Vec::new(),
        View::Listing(listing) => listing.content.iter().flatten().collect(),
        View::Search(search) => search.outcome.results.iter().map(|r| &r.entry).collect(),
    }
}

/// Look an entry up by 1-based index, exact name, or case-insensitive
/// name without the trailing slash.
pub fn find_entry<'a>(entries: &[&'a ListingEntry], arg: &str) -> Option<&'a ListingEntry> {
    if let Ok(n) = arg.parse::<usize>() {
        return n.checked_sub(1).and_then(|i| entries.get(i)).copied();
    }
    let wanted = arg.trim_end_matches('/').to_lowercase();
    entries
        .iter()
        .find(|e| e.name == arg)
        .or_else(|| entries.iter().find(|e| e.display_name().to_lowercase() == wanted))
        .copied()
}

fn render(nav: &Navigator) {
    let trail: Vec<_> = nav.breadcrumb().into_iter().map(|c| c.label).collect();
    println!("\n{}", trail.join(" / "));

    match nav.view() {
        View::Home => {
            println!("Categories:");
            for category in nav.categories() {
                println!("  {} {:<14} {}", category.icon, category.id, category.name);
            }
        }
        View::Listing(listing) => match &listing.content {
            Ok(items) => commands::print_entries(items),
            Err(e) => println!("Could not load this folder: {}", e),
        },
        View::Search(search) => {
            let outcome = &search.outcome;
            for failure in outcome.failures() {
                println!("  (could not search {})", failure.category_name);
            }
            if outcome.all_failed() {
                println!("Could not reach any category");
            } else if outcome.results.is_empty() {
                println!("No results for \"{}\"", search.query);
            }
            for (i, result) in outcome.results.iter().enumerate() {
                println!(
                    "{:>4}  {:<14} {:<8} {:>10}  {}",
                    i + 1,
                    result.category,
                    result.entry.file_type,
                    result.entry.display_size(),
                    result.entry.name
                );
            }
        }
    }

    let mut nav_state = Vec::new();
    if nav.can_go_back() {
        nav_state.push("back");
    }
    if nav.can_go_forward() {
        nav_state.push("forward");
    }
    if !nav_state.is_empty() {
        println!("[{}]", nav_state.join(" | "));
    }
}

fn entry_details(entry: &ListingEntry, favorite: bool) -> Vec<String> {
    let mut lines = vec![entry.name.clone()];
    lines.push(format!("  type: {} ({})", entry.file_type, describe(&entry.name)));
    if let Some(size) = &entry.size {
        match parse_size(size) {
            Some(bytes) => lines.push(format!("  size: {} ({})", size, format_bytes(bytes))),
            None => lines.push(format!("  size: {}", size)),
        }
    }
    if !entry.date.is_empty() {
        lines.push(format!("  modified: {}", entry.date));
    }
    if favorite {
        lines.push("  in favorites".to_string());
    }
    lines.push(format!("  url: {}", entry.url));
    lines
}

fn print_info(ctx: &AppContext, entry: &ListingEntry) {
    let favorite = ctx.store.is_favorite(&entry.url).unwrap_or_else(|e| {
        tracing::warn!("Could not check favorites for {}: {}", entry.url, e);
        false
    });
    for line in entry_details(entry, favorite) {
        println!("{}", line);
    }
}

fn record_listing_visit(ctx: &AppContext, nav: &Navigator) {
    if let View::Listing(listing) = nav.view() {
        if let (Some(url), Ok(_)) = (&listing.url, &listing.content) {
            commands::record_visit(ctx, url);
        }
    }
}

/// Run one command. Returns `false` when the shell should exit.
async fn execute(ctx: &AppContext, nav: &mut Navigator, command: ShellCommand) -> Result<bool> {
    match command {
        ShellCommand::Empty => return Ok(true),
        ShellCommand::Quit => return Ok(false),
        ShellCommand::Help => {
            println!("{}", HELP);
            return Ok(true);
        }
        ShellCommand::Unknown(line) => {
            println!("Unknown command: {} (try `help`)", line);
            return Ok(true);
        }
        ShellCommand::List => {}
        ShellCommand::Categories => nav.go_home(),
        ShellCommand::Category(id) => {
            let Some(category) = ctx.config.category(&id) else {
                println!("No category {:?}", id);
                return Ok(true);
            };
            nav.navigate_to(&category.url, Some(category.id.as_str())).await;
            record_listing_visit(ctx, nav);
        }
        ShellCommand::Cd(arg) => {
            let target = {
                let entries = visible_entries(nav.view());
                find_entry(&entries, &arg).map(|e| (e.url.clone(), e.is_directory))
            };
            match target {
                Some((_, false)) => {
                    println!("{} is a file; use `get` or `open`", arg);
                    return Ok(true);
                }
                Some((url, true)) => {
                    nav.navigate_to(&url, None).await;
                }
                None => {
                    nav.navigate_to(&arg, None).await;
                }
            }
            record_listing_visit(ctx, nav);
        }
        ShellCommand::Back => {
            if !nav.go_back().await {
                println!("Nothing to go back to");
                return Ok(true);
            }
        }
        ShellCommand::Forward => {
            if !nav.go_forward().await {
                println!("Nothing to go forward to");
                return Ok(true);
            }
        }
        ShellCommand::Up => {
            nav.go_up().await;
            record_listing_visit(ctx, nav);
        }
        ShellCommand::Home => nav.go_home(),
        ShellCommand::Search(query) => {
            nav.search(&query).await;
        }
        ShellCommand::Info(arg) => {
            let Some(entry) = lookup(nav, &arg) else {
                return Ok(not_found(&arg));
            };
            print_info(ctx, &entry);
            return Ok(true);
        }
        ShellCommand::Get(arg) => {
            let Some(entry) = lookup(nav, &arg) else {
                return Ok(not_found(&arg));
            };
            if entry.is_directory {
                commands::download_directory(ctx, &entry.url, None).await?;
            } else {
                commands::download(ctx, &entry.url, None).await?;
            }
            return Ok(true);
        }
        ShellCommand::Fav(arg) => {
            let Some(entry) = lookup(nav, &arg) else {
                return Ok(not_found(&arg));
            };
            commands::add_favorite(ctx, &entry.url)?;
            return Ok(true);
        }
        ShellCommand::Open(arg) => {
            let Some(entry) = lookup(nav, &arg) else {
                return Ok(not_found(&arg));
            };
            if is_playable_video(&entry.name) {
                let url = Url::parse(&entry.url)?;
                open::that(url.as_str())?;
            } else {
                println!("{} is not a playable video", entry.name);
            }
            return Ok(true);
        }
    }

    render(nav);
    Ok(true)
}

fn not_found(arg: &str) -> bool {
    println!("No entry {:?} here", arg);
    true
}

fn lookup(nav: &Navigator, arg: &str) -> Option<ListingEntry> {
    let entries = visible_entries(nav.view());
    find_entry(&entries, arg).cloned()
}

pub async fn run(ctx: &AppContext) -> Result<()> {
    let mut nav = ctx.navigator();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("Visuales UCLV. Type `help` for commands.");
    render(&nav);

    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        match execute(ctx, &mut nav, parse_command(&line)).await {
            Ok(true) => {}
            Ok(false) => break,
            Err(e) => println!("Error: {}", e),
        }
    }

    Ok(())
}
