//! Command parsing for text front ends
//!
//! One parser turns a raw input line into a tagged command; front ends
//! dispatch on the variants with an exhaustive `match` instead of
//! re-interpreting strings.

use crate::error::LadderError;
use crate::types::PlayerStats;

/// A parsed input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// A match line, handed to the resolver as-is
    Match { raw: String },
    /// `pp [tier]`: ordered player listing, optionally filtered
    ListPlayers { tier: Option<String> },
    /// `best`: leaders per dimension
    Best,
    /// `name`: export all display names
    Names,
    /// `add <name>[, offense, defense, played, win_rate]`
    Add {
        name: String,
        stats: Option<PlayerStats>,
    },
    /// `combine <a>, <b>`: merge B into A
    Combine { a: String, b: String },
    /// `expect <a>, <b>`: expected win rate preview
    Expect { a: String, b: String },
    /// `save`: force a store write
    Save,
    /// `help`
    Help,
    /// `quit` / `exit`
    Quit,
}

/// Parse one input line. Anything that is not a recognized command keyword
/// is treated as a match line; the resolver decides whether it is valid.
pub fn parse_command(line: &str) -> crate::error::Result<Command> {
    let line = line.trim();
    if line.is_empty() {
        return Err(LadderError::MalformedCommand {
            reason: "empty input".to_string(),
        }
        .into());
    }

    let (keyword, rest) = match line.split_once(char::is_whitespace) {
        Some((head, tail)) => (head, tail.trim()),
        None => (line, ""),
    };

    match keyword.to_lowercase().as_str() {
        "pp" => Ok(Command::ListPlayers {
            tier: (!rest.is_empty()).then(|| rest.to_lowercase()),
        }),
        "best" => Ok(Command::Best),
        "name" | "names" => Ok(Command::Names),
        "add" => parse_add(rest),
        "combine" => {
            let (a, b) = parse_name_pair(rest, "combine")?;
            Ok(Command::Combine { a, b })
        }
        "expect" => {
            let (a, b) = parse_name_pair(rest, "expect")?;
            Ok(Command::Expect { a, b })
        }
        "save" => Ok(Command::Save),
        "help" => Ok(Command::Help),
        "quit" | "exit" => Ok(Command::Quit),
        _ => Ok(Command::Match {
            raw: line.to_string(),
        }),
    }
}

/// `<name>` or `<name>, offense, defense, played, win_rate`
fn parse_add(rest: &str) -> crate::error::Result<Command> {
    let parts: Vec<&str> = rest.split(',').map(str::trim).collect();
    match parts.as_slice() {
        [""] => Err(LadderError::MalformedCommand {
            reason: "add requires a player name".to_string(),
        }
        .into()),
        [name] => Ok(Command::Add {
            name: name.to_string(),
            stats: None,
        }),
        [name, offense, defense, played, win_rate] if !name.is_empty() => {
            fn parse_int<T: std::str::FromStr>(field: &str, label: &str) -> Result<T, LadderError> {
                field.parse().map_err(|_| LadderError::MalformedCommand {
                    reason: format!("add: {label} must be a number, got `{field}`"),
                })
            }
            Ok(Command::Add {
                name: name.to_string(),
                stats: Some(PlayerStats {
                    offense: parse_int(offense, "offense")?,
                    defense: parse_int(defense, "defense")?,
                    played: parse_int(played, "played")?,
                    win_rate: parse_int(win_rate, "win_rate")?,
                }),
            })
        }
        _ => Err(LadderError::MalformedCommand {
            reason: "add expects `name` or `name, offense, defense, played, win_rate`"
                .to_string(),
        }
        .into()),
    }
}

/// Exactly two comma-separated names
fn parse_name_pair(rest: &str, keyword: &str) -> crate::error::Result<(String, String)> {
    let parts: Vec<&str> = rest.split(',').map(str::trim).collect();
    match parts.as_slice() {
        [a, b] if !a.is_empty() && !b.is_empty() => Ok((a.to_string(), b.to_string())),
        _ => Err(LadderError::MalformedCommand {
            reason: format!("{keyword} expects two names: `{keyword} a, b`"),
        }
        .into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listing_commands() {
        assert_eq!(
            parse_command("pp").unwrap(),
            Command::ListPlayers { tier: None }
        );
        assert_eq!(
            parse_command("pp Diamond").unwrap(),
            Command::ListPlayers {
                tier: Some("diamond".to_string())
            }
        );
        assert_eq!(parse_command("best").unwrap(), Command::Best);
        assert_eq!(parse_command("name").unwrap(), Command::Names);
        assert_eq!(parse_command("save").unwrap(), Command::Save);
        assert_eq!(parse_command("QUIT").unwrap(), Command::Quit);
    }

    #[test]
    fn test_add_bare_and_with_stats() {
        assert_eq!(
            parse_command("add Alice").unwrap(),
            Command::Add {
                name: "Alice".to_string(),
                stats: None
            }
        );
        assert_eq!(
            parse_command("add Alice, 450, 250, 4, 50").unwrap(),
            Command::Add {
                name: "Alice".to_string(),
                stats: Some(PlayerStats {
                    offense: 450,
                    defense: 250,
                    played: 4,
                    win_rate: 50
                })
            }
        );
    }

    #[test]
    fn test_add_wrong_field_count_rejected() {
        assert!(parse_command("add").is_err());
        assert!(parse_command("add Alice, 450").is_err());
        assert!(parse_command("add Alice, 450, 250, 4, 50, 7").is_err());
        assert!(parse_command("add Alice, 450, x, 4, 50").is_err());
    }

    #[test]
    fn test_combine_and_expect_pairs() {
        assert_eq!(
            parse_command("combine Alice, Bob").unwrap(),
            Command::Combine {
                a: "Alice".to_string(),
                b: "Bob".to_string()
            }
        );
        assert_eq!(
            parse_command("expect Alice, Bob").unwrap(),
            Command::Expect {
                a: "Alice".to_string(),
                b: "Bob".to_string()
            }
        );
        assert!(parse_command("combine Alice").is_err());
        assert!(parse_command("combine , Bob").is_err());
    }

    #[test]
    fn test_everything_else_is_a_match_line() {
        assert_eq!(
            parse_command("Alice, Bob win Cara ; Dan").unwrap(),
            Command::Match {
                raw: "Alice, Bob win Cara ; Dan".to_string()
            }
        );
        assert!(parse_command("   ").is_err());
    }
}
