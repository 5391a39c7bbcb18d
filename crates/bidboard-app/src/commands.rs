// Command-line input parsing.
//
// Translates one line typed at the prompt into a `Command` for the app to
// run. Names with spaces can be typed bare (`draft Josh Allen to Seth for 40`)
// or quoted when they contain a keyword (`draft "Tony Toledo" to Seth for 3`).

use bidboard_core::{DraftError, PlayerFilter, Position};

/// Everything the shell can be asked to do.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Round, pick, remaining budget, owner on the clock.
    Status,
    /// Undrafted players matching a filter.
    Players(PlayerFilter),
    /// The position, tier and tag values present in the pool.
    Filters,
    /// Nominate a player; `by` defaults to the owner on the clock.
    Nominate { player: String, by: Option<String> },
    /// Sell a nominated player.
    Draft {
        player: String,
        owner: String,
        price: u32,
    },
    Undo,
    /// Add a player missing from the pool.
    Add { player: String, position: Position },
    Owners,
    Mine,
    /// Completed picks in order.
    Board,
    /// Full state as JSON.
    Snapshot,
    Help,
    Quit,
}

pub const HELP: &str = "\
commands:
  status                                   round, pick, budget left, who nominates
  players [pos=RB] [tier=1] [tag=Target]   undrafted players, alphabetical
  filters                                  positions, tiers and tags in the pool
  nominate <player> [by <owner>]           put a player up for auction
  draft <player> to <owner> for <price>    sell the nominated player
  undo                                     take back the last pick
  add <player> <position>                  add a player missing from the pool
  owners | mine | board | snapshot         views
  help | quit";

#[derive(Debug, Clone, PartialEq)]
struct Token {
    text: String,
    /// Whether any part of the token was inside double quotes. Quoted tokens
    /// are never treated as keywords.
    quoted: bool,
}

impl Token {
    fn is_keyword(&self, kw: &str) -> bool {
        !self.quoted && self.text.eq_ignore_ascii_case(kw)
    }
}

fn invalid(message: impl Into<String>) -> DraftError {
    DraftError::InvalidInput(message.into())
}

fn tokenize(line: &str) -> Result<Vec<Token>, DraftError> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut quoted = false;
    let mut in_quotes = false;
    let mut started = false;

    for c in line.chars() {
        match c {
            '"' => {
                in_quotes = !in_quotes;
                quoted = true;
                started = true;
            }
            c if c.is_whitespace() && !in_quotes => {
                if started {
                    tokens.push(Token {
                        text: std::mem::take(&mut current),
                        quoted,
                    });
                    quoted = false;
                    started = false;
                }
            }
            c => {
                current.push(c);
                started = true;
            }
        }
    }
    if in_quotes {
        return Err(invalid("unterminated quote"));
    }
    if started {
        tokens.push(Token {
            text: current,
            quoted,
        });
    }
    Ok(tokens)
}

/// Join tokens back into a name, rejecting an empty result.
fn join_name(tokens: &[Token], what: &str) -> Result<String, DraftError> {
    let name = tokens
        .iter()
        .map(|t| t.text.as_str())
        .collect::<Vec<_>>()
        .join(" ");
    let name = name.trim();
    if name.is_empty() {
        return Err(invalid(format!("{what} name is blank")));
    }
    Ok(name.to_string())
}

fn keyword_index(tokens: &[Token], kw: &str) -> Option<usize> {
    tokens.iter().position(|t| t.is_keyword(kw))
}

/// Parse a price as typed at the prompt. Prices are whole dollars, at least 1.
pub fn parse_price(text: &str) -> Result<u32, DraftError> {
    let trimmed = text.trim().trim_start_matches('$');
    let price: u32 = trimmed
        .parse()
        .map_err(|_| invalid(format!("price must be a whole number, got '{text}'")))?;
    if price == 0 {
        return Err(invalid("price must be at least $1"));
    }
    Ok(price)
}

fn parse_position(text: &str) -> Result<Position, DraftError> {
    Position::from_str_pos(text).ok_or_else(|| invalid("position is blank"))
}

fn parse_filter(args: &[Token]) -> Result<PlayerFilter, DraftError> {
    let mut filter = PlayerFilter::default();
    for arg in args {
        let Some((key, value)) = arg.text.split_once('=') else {
            return Err(invalid(format!(
                "expected key=value (pos, tier, tag), got '{}'",
                arg.text
            )));
        };
        match key.to_ascii_lowercase().as_str() {
            "pos" | "position" => filter.position = Some(parse_position(value)?),
            "tier" => {
                let tier = value
                    .trim()
                    .parse()
                    .map_err(|_| invalid(format!("tier must be a whole number, got '{value}'")))?;
                filter.tier = Some(tier);
            }
            "tag" | "tad" => filter.tag = Some(value.to_string()),
            other => return Err(invalid(format!("unknown filter '{other}'"))),
        }
    }
    Ok(filter)
}

/// Parse one input line. Returns `Ok(None)` for a blank line.
pub fn parse_command(line: &str) -> Result<Option<Command>, DraftError> {
    let tokens = tokenize(line)?;
    let Some((head, args)) = tokens.split_first() else {
        return Ok(None);
    };

    let cmd = match head.text.to_ascii_lowercase().as_str() {
        "status" | "s" => Command::Status,
        "players" | "p" => Command::Players(parse_filter(args)?),
        "filters" => Command::Filters,
        "nominate" | "n" => match keyword_index(args, "by") {
            Some(i) => Command::Nominate {
                player: join_name(&args[..i], "player")?,
                by: Some(join_name(&args[i + 1..], "owner")?),
            },
            None => Command::Nominate {
                player: join_name(args, "player")?,
                by: None,
            },
        },
        "draft" | "d" => {
            let usage = || invalid("usage: draft <player> to <owner> for <price>");
            let to = keyword_index(args, "to").ok_or_else(usage)?;
            let for_rel = keyword_index(&args[to + 1..], "for").ok_or_else(usage)?;
            let for_idx = to + 1 + for_rel;
            let price_tokens = &args[for_idx + 1..];
            if price_tokens.len() != 1 {
                return Err(usage());
            }
            Command::Draft {
                player: join_name(&args[..to], "player")?,
                owner: join_name(&args[to + 1..for_idx], "owner")?,
                price: parse_price(&price_tokens[0].text)?,
            }
        }
        "undo" | "back" => Command::Undo,
        "add" => {
            let Some((position, name)) = args.split_last() else {
                return Err(invalid("usage: add <player> <position>"));
            };
            Command::Add {
                player: join_name(name, "player")?,
                position: parse_position(&position.text)?,
            }
        }
        "owners" => Command::Owners,
        "mine" | "me" => Command::Mine,
        "board" | "log" => Command::Board,
        "snapshot" | "json" => Command::Snapshot,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => return Err(invalid(format!("unknown command '{other}' (try 'help')"))),
    };
    Ok(Some(cmd))
}
