#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Search(String),
    Users,
    User(String),
    Repos(String),
    Profile(String),
    Clear,
    State,
    Help,
    Quit,
}

pub const HELP: &str = "\
commands:
  search <query>   search users (replaces the list)
  users            list users
  user <login>     show a profile
  repos <login>    show the latest repositories
  profile <login>  profile followed by repositories
  clear            clear the user list
  state            show the current store state
  quit";

/// Parses one input line. Blank lines yield `Ok(None)`.
pub fn parse(line: &str) -> Result<Option<ReplCommand>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (word, rest) = line
        .split_once(char::is_whitespace)
        .map(|(word, rest)| (word, rest.trim()))
        .unwrap_or((line, ""));

    let login = |usage: &str| {
        if rest.is_empty() || rest.contains(char::is_whitespace) {
            Err(format!("usage: {usage} <login>"))
        } else {
            Ok(rest.to_string())
        }
    };

    let command = match word.to_ascii_lowercase().as_str() {
        "search" | "s" => ReplCommand::Search(rest.to_string()),
        "users" => ReplCommand::Users,
        "user" | "u" => ReplCommand::User(login("user")?),
        "repos" | "r" => ReplCommand::Repos(login("repos")?),
        "profile" | "p" => ReplCommand::Profile(login("profile")?),
        "clear" => ReplCommand::Clear,
        "state" => ReplCommand::State,
        "help" | "?" => ReplCommand::Help,
        "quit" | "exit" | "q" => ReplCommand::Quit,
        other => return Err(format!("unknown command '{other}', try 'help'")),
    };
    Ok(Some(command))
}
