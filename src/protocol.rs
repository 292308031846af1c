//! Line-oriented text protocol for driving the engine.
//!
//! The protocol follows the conventions of GTP version 2: one command per
//! line with an optional numeric id, answered by `=[id] response` on success
//! or `?[id] message` on failure, each followed by a blank line. Lines that
//! are empty or start with `#` are ignored.
//!
//! ## Supported Commands
//!
//! - `name`, `version`, `protocol_version` - Engine identification
//! - `list_commands`, `known_command <cmd>` - Command discovery
//! - `quit` - Exit the loop
//! - `boardsize <size>` - Accepts only 8
//! - `clear_board` - Reset to the starting position
//! - `setboard <cells>` - Load 64 cells (`b`, `w`, `.`), row by row
//! - `play <color> <vertex|pass>` - Apply a move for the given color
//! - `genmove <color>` - Search, play and return a move for the given color
//! - `legal_moves <color>` - List legal moves in generation order
//! - `score <color>` - Evaluation from the color's perspective, by term
//! - `final_score` - Disk difference, e.g. `B+12`
//! - `depth <n>` - Set the search depth
//! - `showboard` - Print the board
//!
//! ## Example
//!
//! ```
//! use othello_rust::protocol::ProtocolEngine;
//!
//! let mut engine = ProtocolEngine::new();
//! let mut out = Vec::new();
//! engine.run("1 play black d3\n2 final_score\n".as_bytes(), &mut out).unwrap();
//! let text = String::from_utf8(out).unwrap();
//! assert!(text.contains("=2 B+3"));
//! ```

use std::io::{self, BufRead, Write};

use log::info;

use crate::constants::N;
use crate::eval::breakdown;
use crate::movegen::legal_moves;
use crate::position::{Move, Position, Side};
use crate::search::{SearchParams, Searcher};

/// The list of known protocol commands.
const KNOWN_COMMANDS: &[&str] = &[
    "boardsize",
    "clear_board",
    "depth",
    "final_score",
    "genmove",
    "known_command",
    "legal_moves",
    "list_commands",
    "name",
    "play",
    "protocol_version",
    "quit",
    "score",
    "setboard",
    "showboard",
    "version",
];

/// Protocol engine state.
pub struct ProtocolEngine {
    /// Current game position
    pos: Position,
    searcher: Searcher,
}

impl Default for ProtocolEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ProtocolEngine {
    /// Create a new engine with default search settings.
    pub fn new() -> Self {
        Self::with_params(SearchParams::default())
    }

    pub fn with_params(params: SearchParams) -> Self {
        Self {
            pos: Position::new(),
            searcher: Searcher::new(params),
        }
    }

    pub fn position(&self) -> &Position {
        &self.pos
    }

    /// Run the command loop until `quit` or end of input.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> io::Result<()> {
        for line in input.lines() {
            let line = line?;

            // Skip empty lines and comments
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (id, command_line) = Self::parse_id(line);
            let parts: Vec<&str> = command_line.split_whitespace().collect();
            if parts.is_empty() {
                continue;
            }

            let command = parts[0].to_lowercase();
            let (success, message) = self.execute(&command, &parts[1..]);

            let prefix = if success { '=' } else { '?' };
            let id_str = id.map(|i| i.to_string()).unwrap_or_default();
            write!(output, "{prefix}{id_str} {message}\n\n")?;
            output.flush()?;

            if command == "quit" {
                break;
            }
        }
        Ok(())
    }

    /// Run the command loop on stdin and stdout.
    pub fn run_stdio(&mut self) -> io::Result<()> {
        let stdin = io::stdin();
        let stdout = io::stdout();
        self.run(stdin.lock(), stdout.lock())
    }

    /// Parse an optional numeric command ID from the beginning of the line.
    fn parse_id(line: &str) -> (Option<u32>, &str) {
        let trimmed = line.trim();
        let end = trimmed
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(trimmed.len());
        match trimmed[..end].parse::<u32>() {
            Ok(id) => (Some(id), trimmed[end..].trim()),
            Err(_) => (None, trimmed),
        }
    }

    fn parse_side(args: &[&str]) -> Result<Side, String> {
        let arg = args.first().ok_or("missing argument")?;
        arg.parse::<Side>().map_err(|e| e.to_string())
    }

    /// Execute a command and return (success, response).
    fn execute(&mut self, command: &str, args: &[&str]) -> (bool, String) {
        match self.dispatch(command, args) {
            Ok(response) => (true, response),
            Err(message) => (false, message),
        }
    }

    fn dispatch(&mut self, command: &str, args: &[&str]) -> Result<String, String> {
        match command {
            "name" => Ok(env!("CARGO_PKG_NAME").to_string()),

            "version" => Ok(env!("CARGO_PKG_VERSION").to_string()),

            "protocol_version" => Ok("2".to_string()),

            "list_commands" => Ok(KNOWN_COMMANDS.join("\n")),

            "known_command" => {
                let cmd = args.first().ok_or("missing argument")?;
                let known = KNOWN_COMMANDS.contains(&cmd.to_lowercase().as_str());
                Ok(known.to_string())
            }

            "quit" => Ok(String::new()),

            "boardsize" => {
                let arg = args.first().ok_or("missing argument")?;
                match arg.parse::<usize>() {
                    Ok(size) if size == N => Ok(String::new()),
                    Ok(size) => Err(format!("unacceptable size, only {N} is supported (got {size})")),
                    Err(_) => Err("invalid size".to_string()),
                }
            }

            "clear_board" => {
                self.pos = Position::new();
                Ok(String::new())
            }

            "setboard" => {
                self.pos = args.concat().parse::<Position>().map_err(|e| format!("{e}"))?;
                Ok(String::new())
            }

            "play" => {
                let side = Self::parse_side(args)?;
                let vertex = args.get(1).ok_or("missing arguments")?;
                if vertex.eq_ignore_ascii_case("pass") {
                    return Ok(String::new());
                }
                let mv = vertex.parse::<Move>().map_err(|e| format!("{e}"))?;
                self.pos
                    .apply_checked(mv, side)
                    .map_err(|e| e.to_string())?;
                info!("{side} played {mv}");
                Ok(String::new())
            }

            "genmove" => {
                let side = Self::parse_side(args)?;
                let result = self.searcher.search(&mut self.pos, side);
                match result.best {
                    Some(mv) => {
                        self.pos.apply_unchecked(mv, side);
                        info!("{side} generated {mv} (score {})", result.score);
                        Ok(mv.to_string())
                    }
                    None => Ok("pass".to_string()),
                }
            }

            "legal_moves" => {
                let side = Self::parse_side(args)?;
                let moves: Vec<String> = legal_moves(&self.pos, side)
                    .iter()
                    .map(|mv| mv.to_string())
                    .collect();
                Ok(moves.join(" "))
            }

            "score" => {
                let side = Self::parse_side(args)?;
                let parts = breakdown(&self.pos, side, &self.searcher.params().eval);
                Ok(format!(
                    "{} parity={} mobility={} corners={} stability={}",
                    parts.total(),
                    parts.parity,
                    parts.mobility,
                    parts.corners,
                    parts.stability
                ))
            }

            "final_score" => {
                let diff = self.pos.count_black() as i32 - self.pos.count_white() as i32;
                Ok(match diff {
                    0 => "0".to_string(),
                    d if d > 0 => format!("B+{d}"),
                    d => format!("W+{}", -d),
                })
            }

            "depth" => {
                let arg = args.first().ok_or("missing argument")?;
                match arg.parse::<u32>() {
                    Ok(depth) if depth > 0 => {
                        self.searcher.set_depth(depth);
                        Ok(String::new())
                    }
                    _ => Err("invalid depth".to_string()),
                }
            }

            "showboard" => Ok(format!("\n{}", self.pos)),

            _ => Err(format!("unknown command: {command}")),
        }
    }
}
