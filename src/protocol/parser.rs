//! Request parser for the file-transfer text protocol.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;

/// Parsed request command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Write a slice of file content at a byte offset
    UploadChunk {
        filename: String,
        data: Vec<u8>,
        offset: u64,
    },

    /// Retrieve a whole file
    Get { filename: String },

    /// List stored files
    List,
}

/// Request parsing errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Empty request frame
    Empty,
    /// Known verb with wrong arguments
    InvalidCommand(String),
    /// Chunk payload is not valid base64
    InvalidPayload(String),
    /// Offset is not a non-negative integer
    InvalidOffset(String),
    /// Unrecognized verb
    UnknownCommand(String),
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::Empty => write!(f, "Empty request"),
            ParseError::InvalidCommand(msg) => write!(f, "Invalid command: {}", msg),
            ParseError::InvalidPayload(msg) => write!(f, "Invalid payload: {}", msg),
            ParseError::InvalidOffset(msg) => write!(f, "Invalid offset: {}", msg),
            ParseError::UnknownCommand(verb) => write!(f, "Unknown command: {}", verb),
        }
    }
}

impl std::error::Error for ParseError {}

/// Parse one request frame into a command.
///
/// The verb is case-insensitive; arguments are whitespace-separated
/// positionals (the frame codec has already trimmed the frame).
pub fn parse(request: &str) -> Result<Command, ParseError> {
    let parts: Vec<&str> = request.split_whitespace().collect();
    let verb = match parts.first() {
        Some(&verb) => verb.to_uppercase(),
        None => return Err(ParseError::Empty),
    };

    match verb.as_str() {
        "UPLOAD_CHUNK" => {
            if parts.len() != 4 {
                return Err(ParseError::InvalidCommand(
                    "UPLOAD_CHUNK requires filename, payload, and offset".to_string(),
                ));
            }
            let data = BASE64
                .decode(parts[2])
                .map_err(|e| ParseError::InvalidPayload(e.to_string()))?;
            let offset = parts[3]
                .parse::<u64>()
                .map_err(|_| ParseError::InvalidOffset(parts[3].to_string()))?;

            Ok(Command::UploadChunk {
                filename: parts[1].to_string(),
                data,
                offset,
            })
        }

        "GET" => {
            if parts.len() != 2 {
                return Err(ParseError::InvalidCommand(
                    "GET requires a filename".to_string(),
                ));
            }
            Ok(Command::Get {
                filename: parts[1].to_string(),
            })
        }

        "LIST" => {
            if parts.len() != 1 {
                return Err(ParseError::InvalidCommand(
                    "LIST takes no arguments".to_string(),
                ));
            }
            Ok(Command::List)
        }

        _ => Err(ParseError::UnknownCommand(verb)),
    }
}
