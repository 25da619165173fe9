use crate::api::SearchScope;

use super::DebugLevel;

#[derive(Clone, Copy, Debug)]
pub(super) struct CommandDef {
    pub(super) name: &'static str,
    pub(super) aliases: &'static [&'static str],
    pub(super) usage: &'static str,
    pub(super) help: &'static str,
}

pub(super) fn command_defs() -> Vec<CommandDef> {
    vec![
        CommandDef {
            name: "help",
            aliases: &["h", "?"],
            usage: "help",
            help: "Show commands",
        },
        CommandDef {
            name: "start",
            aliases: &[],
            usage: "start [machine_id]",
            help: "Spawn the selected machine (or an explicit id)",
        },
        CommandDef {
            name: "stop",
            aliases: &[],
            usage: "stop",
            help: "Stop the active machine",
        },
        CommandDef {
            name: "reset",
            aliases: &[],
            usage: "reset",
            help: "Reset the active machine",
        },
        CommandDef {
            name: "submit",
            aliases: &["own"],
            usage: "submit <flag>",
            help: "Submit a flag for the active machine",
        },
        CommandDef {
            name: "find",
            aliases: &[],
            usage: "find <machines|users> <name>",
            help: "Search the catalog",
        },
        CommandDef {
            name: "refresh",
            aliases: &["r"],
            usage: "refresh",
            help: "Refetch everything now",
        },
        CommandDef {
            name: "debug",
            aliases: &[],
            usage: "debug [none|low|medium|high]",
            help: "Show or set console debug verbosity",
        },
        CommandDef {
            name: "clear",
            aliases: &[],
            usage: "clear",
            help: "Clear the console",
        },
        CommandDef {
            name: "quit",
            aliases: &["exit", "q"],
            usage: "quit",
            help: "Exit",
        },
    ]
}

#[derive(Clone, Debug, PartialEq)]
pub(super) enum ParsedCommand {
    Empty,
    Help,
    Clear,
    Refresh,
    Quit,
    Debug(Option<DebugLevel>),
    Start(Option<u64>),
    Stop,
    Reset,
    Submit(String),
    Find { scope: SearchScope, term: String },
    Usage(&'static str),
    Unknown(String),
}

pub(super) fn parse_command(line: &str) -> ParsedCommand {
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return ParsedCommand::Empty;
    };
    let rest: Vec<&str> = words.collect();

    match head {
        "help" | "h" | "?" => ParsedCommand::Help,
        "clear" => ParsedCommand::Clear,
        "refresh" | "r" => ParsedCommand::Refresh,
        "quit" | "exit" | "q" => ParsedCommand::Quit,

        "debug" => match rest.as_slice() {
            [] => ParsedCommand::Debug(None),
            [level] => match level.parse::<DebugLevel>() {
                Ok(level) => ParsedCommand::Debug(Some(level)),
                Err(_) => ParsedCommand::Usage("debug [none|low|medium|high]"),
            },
            _ => ParsedCommand::Usage("debug [none|low|medium|high]"),
        },

        "start" => match rest.as_slice() {
            [] => ParsedCommand::Start(None),
            [id] => match id.parse::<u64>() {
                Ok(id) => ParsedCommand::Start(Some(id)),
                Err(_) => ParsedCommand::Usage("start [machine_id]"),
            },
            _ => ParsedCommand::Usage("start [machine_id]"),
        },

        "stop" => {
            if rest.is_empty() {
                ParsedCommand::Stop
            } else {
                ParsedCommand::Usage("stop")
            }
        }

        "reset" => {
            if rest.is_empty() {
                ParsedCommand::Reset
            } else {
                ParsedCommand::Usage("reset")
            }
        }

        "submit" | "own" => match rest.as_slice() {
            [flag] => ParsedCommand::Submit((*flag).to_string()),
            _ => ParsedCommand::Usage("submit <flag>"),
        },

        "find" => match rest.as_slice() {
            [scope, term] => {
                let scope = match *scope {
                    "machines" => SearchScope::Machines,
                    "users" => SearchScope::Users,
                    _ => return ParsedCommand::Usage("find <machines|users> <name>"),
                };
                ParsedCommand::Find {
                    scope,
                    term: (*term).to_string(),
                }
            }
            _ => ParsedCommand::Usage("find <machines|users> <name>"),
        },

        other => ParsedCommand::Unknown(other.to_string()),
    }
}

#[cfg(test)]
#[path = "../tests/tui_shell/commands_tests.rs"]
mod tests;
