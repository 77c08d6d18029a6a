use std::error::Error as StdError;
use std::fmt;
use std::num::ParseFloatError;
use std::string::FromUtf8Error;

// type alias for Result for use across the library
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
    Io(std::io::Error),
    /// The input document could not be read or parsed as XML
    Load(String),
    /// A path `d` attribute token which is neither a command letter
    /// nor a valid coordinate pair; carries the token and its index
    PathSyntax { token: String, pos: usize },
    /// A result file could not be written
    Output(String),
    Parse(String),
    Cli(String),
    Other(Box<dyn StdError>),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(source) => write!(f, "IO error: {}", source),
            Error::Load(reason) => write!(f, "Document load error: {}", reason),
            Error::PathSyntax { token, pos } => {
                write!(f, "Path syntax error: bad token '{}' at index {}", token, pos)
            }
            Error::Output(reason) => write!(f, "Output write error: {}", reason),
            Error::Parse(reason) => write!(f, "Parse error: {}", reason),
            Error::Cli(reason) => write!(f, "Invalid command line: {}", reason),
            Error::Other(source) => write!(f, "{}", source),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Error::Io(source) => Some(source),
            Error::Other(source) => Some(&**source),
            _ => None,
        }
    }
}

impl Error {
    pub fn from_err<T>(err: T) -> Error
    where
        T: StdError + 'static,
    {
        Error::Other(Box::new(err))
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Error {
        Error::Io(err)
    }
}

impl From<ParseFloatError> for Error {
    fn from(err: ParseFloatError) -> Error {
        Error::Parse(format!("float: {}", err))
    }
}

impl From<FromUtf8Error> for Error {
    fn from(err: FromUtf8Error) -> Error {
        Error::Parse(format!("utf8: {}", err))
    }
}

impl From<&str> for Error {
    fn from(err: &str) -> Error {
        Error::Parse(err.to_string())
    }
}
