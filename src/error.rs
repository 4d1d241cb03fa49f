use std::fmt::Display;

#[derive(Debug)]
pub enum Error {
    InvalidInput,
    DegenerateAlphabet(String),
    UnknownSymbol(String),
    PrecisionExhausted { digits: u32, position: usize },
    UnsupportedPrecision(u32),
    InvalidDecimal(String),
    InvalidBitString(String),
    TruncatedBitString(usize),
    UnableToOpenInputFileForReading(String, std::io::Error),
    InputFileNotUtf8(String),
    SessionAborted(&'static str),
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidInput => {
                write!(f, "Input sequence must contain at least one symbol")
            }
            Self::DegenerateAlphabet(symbol) => {
                write!(
                    f,
                    "Alphabet consists of the single symbol '{}', the optimality bound does not apply",
                    symbol
                )
            }
            Self::UnknownSymbol(symbol) => {
                write!(f, "Symbol '{}' not present in coding table", symbol)
            }
            Self::PrecisionExhausted { digits, position } => {
                write!(
                    f,
                    "Precision of {} significant digits exhausted at symbol {}",
                    digits, position
                )
            }
            Self::UnsupportedPrecision(digits) => {
                write!(
                    f,
                    "Precision of {} significant digits is not supported. Expected 1 to {}.",
                    digits,
                    crate::precision::MAX_DIGITS
                )
            }
            Self::InvalidDecimal(text) => {
                write!(f, "'{}' is not a valid decimal number", text)
            }
            Self::InvalidBitString(text) => {
                write!(f, "'{}' is not a valid bit string", text)
            }
            Self::TruncatedBitString(decoded) => {
                write!(
                    f,
                    "Bit string ended after {} decoded symbols",
                    decoded
                )
            }
            Self::UnableToOpenInputFileForReading(path, error) => {
                write!(
                    f,
                    "Unable to open input file '{}' for reading: {}",
                    path, error
                )
            }
            Self::InputFileNotUtf8(path) => {
                write!(f, "Input file '{}' does not contain UTF-8 text", path)
            }
            Self::SessionAborted(session) => {
                write!(f, "The {} coding session terminated unexpectedly", session)
            }
        }
    }
}

impl std::error::Error for Error {}
