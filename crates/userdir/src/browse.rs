use anyhow::{anyhow, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use userdir_output::*;
use userdir_types::{is_known_nationality, Gender};
use userdir_view::{DirectoryView, ViewPhase};

pub const BROWSE_HELP: &str = "Commands:
  search [TEXT]          Filter by name (empty clears)
  age [RANGE]            0-20, 21-40, 41-60, 61+ or MIN-MAX (empty clears)
  nat [CODE]             Nationality code, e.g. US (empty clears)
  gender [male|female]   Select one gender (empty clears)
  clear [FIELD]          Clear one filter or all of them
  show                   Print the current list
  help                   Show this help
  quit                   Exit";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Search,
    Age,
    Nationality,
    Gender,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowseCommand {
    Search(String),
    Age(String),
    Nationality(Option<String>),
    Gender(Option<Gender>),
    Clear(Option<Field>),
    Show,
    Help,
    Quit,
}

pub fn parse_command(line: &str) -> Result<BrowseCommand, String> {
    let line = line.trim();
    let (word, arg) = match line.split_once(char::is_whitespace) {
        Some((word, arg)) => (word, arg.trim()),
        None => (line, ""),
    };
    let optional = |arg: &str| (!arg.is_empty()).then(|| arg.to_string());

    match word {
        "" | "show" | "ls" => Ok(BrowseCommand::Show),
        "search" | "s" => Ok(BrowseCommand::Search(arg.to_string())),
        "age" | "a" => Ok(BrowseCommand::Age(arg.to_string())),
        "nat" | "n" => Ok(BrowseCommand::Nationality(optional(arg))),
        "gender" | "g" if arg.is_empty() => Ok(BrowseCommand::Gender(None)),
        "gender" | "g" => arg.parse().map(|g| BrowseCommand::Gender(Some(g))),
        "clear" | "c" => match arg {
            "" | "all" => Ok(BrowseCommand::Clear(None)),
            "search" => Ok(BrowseCommand::Clear(Some(Field::Search))),
            "age" => Ok(BrowseCommand::Clear(Some(Field::Age))),
            "nat" => Ok(BrowseCommand::Clear(Some(Field::Nationality))),
            "gender" => Ok(BrowseCommand::Clear(Some(Field::Gender))),
            other => Err(format!("unknown filter '{}'", other)),
        },
        "help" | "?" => Ok(BrowseCommand::Help),
        "quit" | "q" | "exit" => Ok(BrowseCommand::Quit),
        other => Err(format!("unknown command '{}', try 'help'", other)),
    }
}

/// Applies one command. Returns false when the session should end.
pub fn apply_command(view: &DirectoryView, command: BrowseCommand) -> bool {
    match command {
        BrowseCommand::Search(query) => view.set_search_query(query),
        BrowseCommand::Age(range) => {
            if !view.set_age_range_str(&range) && !range.is_empty() {
                eprintln!(
                    "Warning: '{}' is not an age range, age filter cleared. Use one of: {}",
                    range,
                    format_age_brackets()
                );
            }
        }
        BrowseCommand::Nationality(code) => {
            if let Some(code) = code.as_deref().filter(|c| !is_known_nationality(c)) {
                eprintln!("Warning: '{}' is not in the nationality list", code);
            }
            view.set_nationality(code);
        }
        BrowseCommand::Gender(gender) => view.set_gender(gender),
        BrowseCommand::Clear(None) => view.clear_criteria(),
        BrowseCommand::Clear(Some(Field::Search)) => view.set_search_query(""),
        BrowseCommand::Clear(Some(Field::Age)) => view.set_age_range(None),
        BrowseCommand::Clear(Some(Field::Nationality)) => view.set_nationality(None),
        BrowseCommand::Clear(Some(Field::Gender)) => view.set_gender(None),
        BrowseCommand::Show => {}
        BrowseCommand::Help => println!("{}", BROWSE_HELP),
        BrowseCommand::Quit => return false,
    }
    true
}

fn render(view: &DirectoryView, json_output: bool) -> Result<()> {
    if json_output {
        println!("{}", serde_json::to_string(&view_to_json(view))?);
    } else {
        println!("{}\n", format_view(view));
    }
    Ok(())
}

pub async fn run_browse(view: DirectoryView, json_output: bool) -> Result<()> {
    if !json_output {
        println!("{}", LOADING_MESSAGE);
    }
    view.wait_settled().await;

    if let ViewPhase::Errored(err) = view.phase() {
        if json_output {
            render(&view, true)?;
        }
        return Err(anyhow!("{}: {}", ERROR_MESSAGE, err));
    }

    render(&view, json_output)?;
    if !json_output {
        println!("Type 'help' for commands.");
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(e) => {
                eprintln!("{}", e);
                continue;
            }
        };

        let edits = !matches!(command, BrowseCommand::Help | BrowseCommand::Quit);
        if !apply_command(&view, command) {
            break;
        }
        if edits {
            render(&view, json_output)?;
        }
    }

    Ok(())
}
