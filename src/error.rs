use crate::locations::MealKind;
use crate::parse;
use std::fmt::{self, Display, Formatter};

#[derive(Debug)]
pub enum Error {
    UnknownLocation(String),
    UnsupportedMeal { location: String, meal: MealKind },
    Parse(parse::Error),
    Request(reqwest::Error),
    Config(String),
}

impl Error {
    /// Configuration errors are the caller's fault and always propagate;
    /// everything else comes from the source site.
    pub const fn is_configuration(&self) -> bool {
        matches!(self, Self::UnknownLocation(_) | Self::UnsupportedMeal { .. })
    }
}

impl From<parse::Error> for Error {
    fn from(e: parse::Error) -> Self {
        Error::Parse(e)
    }
}

impl From<url::ParseError> for Error {
    fn from(e: url::ParseError) -> Self {
        Error::Parse(e.into())
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Request(e)
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Error::UnknownLocation(id) => write!(f, "Unknown location: {id}"),
            Error::UnsupportedMeal { location, meal } => {
                write!(f, "{location} does not serve {meal}")
            }
            Error::Parse(e) => write!(f, "Parse error: {e}"),
            Error::Request(e) => write!(f, "Request error: {e}"),
            Error::Config(msg) => write!(f, "Config error: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

pub type Result<T> = std::result::Result<T, Error>;
