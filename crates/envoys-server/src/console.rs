use std::io::BufRead;
use tokio::sync::mpsc;
use tracing::{info, warn};

/// A parsed console command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    /// Run a spawn cycle now.
    Start,
    Spawn { world: String, x: i32, y: i32, z: i32 },
    Join { name: String, world: String },
    Leave { name: String },
    /// Player interacts with the block at the given coordinates in their world.
    Use { name: String, x: i32, y: i32, z: i32 },
    List,
    Save,
    Help,
    Stop,
}

pub const HELP: [&str; 10] = [
    "=== Envoys Console Commands ===",
    "start - Trigger an envoy spawn cycle",
    "spawn <world> <x> <y> <z> - Spawn an envoy at a position",
    "join <name> <world> - Connect a player",
    "leave <name> - Disconnect a player",
    "use <name> <x> <y> <z> - Player interacts with a block",
    "list - Show active envoys",
    "save - Save envoy data",
    "help - Show this help",
    "stop - Save and shut down",
];

fn parse_coords(args: &[&str]) -> Result<(i32, i32, i32), String> {
    match args {
        [x, y, z] => {
            let parse = |s: &str| {
                s.parse::<i32>()
                    .map_err(|_| format!("Invalid coordinate: {}", s))
            };
            Ok((parse(*x)?, parse(*y)?, parse(*z)?))
        }
        _ => Err("Expected <x> <y> <z>".into()),
    }
}

impl ConsoleCommand {
    pub fn parse(line: &str) -> Result<Self, String> {
        let parts: Vec<&str> = line.split_whitespace().collect();
        let Some((cmd, args)) = parts.split_first() else {
            return Err("Empty command".into());
        };

        match cmd.to_lowercase().as_str() {
            "start" => Ok(ConsoleCommand::Start),
            "spawn" => match args {
                [world, rest @ ..] => {
                    let (x, y, z) = parse_coords(rest)?;
                    Ok(ConsoleCommand::Spawn {
                        world: world.to_string(),
                        x,
                        y,
                        z,
                    })
                }
                [] => Err("Usage: spawn <world> <x> <y> <z>".into()),
            },
            "join" => match args {
                [name, world] => Ok(ConsoleCommand::Join {
                    name: name.to_string(),
                    world: world.to_string(),
                }),
                _ => Err("Usage: join <name> <world>".into()),
            },
            "leave" => match args {
                [name] => Ok(ConsoleCommand::Leave {
                    name: name.to_string(),
                }),
                _ => Err("Usage: leave <name>".into()),
            },
            "use" => match args {
                [name, rest @ ..] => {
                    let (x, y, z) = parse_coords(rest)?;
                    Ok(ConsoleCommand::Use {
                        name: name.to_string(),
                        x,
                        y,
                        z,
                    })
                }
                [] => Err("Usage: use <name> <x> <y> <z>".into()),
            },
            "list" => Ok(ConsoleCommand::List),
            "save" => Ok(ConsoleCommand::Save),
            "help" => Ok(ConsoleCommand::Help),
            "stop" => Ok(ConsoleCommand::Stop),
            other => Err(format!("Unknown command: {}. Type 'help' for commands.", other)),
        }
    }
}

/// Read commands line by line until EOF and forward them to the tick loop.
/// Blocks the calling thread, so run it on its own thread for stdin.
pub fn read_console(input: impl BufRead, tx: mpsc::UnboundedSender<ConsoleCommand>) {
    for line in input.lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                warn!("Failed to read console input: {}", e);
                return;
            }
        };
        if line.trim().is_empty() {
            continue;
        }
        match ConsoleCommand::parse(&line) {
            Ok(cmd) => {
                if tx.send(cmd).is_err() {
                    return;
                }
            }
            Err(e) => warn!("{}", e),
        }
    }
    info!("Console closed");
}
