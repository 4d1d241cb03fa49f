use std::{
    fs::File,
    io::{BufReader, Read},
    path::{Path, PathBuf},
    sync::Arc,
};

pub use cli::CLIParser;
pub use error::Error;
use model::FrequencyModel;
use precision::{Decimal, Precision};
pub use report::Report;
use session::SessionOptions;

pub mod arithmetic;
mod cli;
pub mod diagnostics;
mod error;
pub mod huffman;
mod logger;
pub mod model;
pub mod precision;
mod report;
pub mod session;

pub type Result<T> = std::result::Result<T, error::Error>;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InputSource {
    Text(String),
    File(PathBuf),
}

pub struct Arguments {
    input: InputSource,
    precision_digits: u32,
    epsilon: Decimal,
    number_of_threads: usize,
    show_tree: bool,
}

fn open_input_file(file_path: &Path) -> Result<File> {
    File::open(file_path).map_err(|e| {
        Error::UnableToOpenInputFileForReading(file_path.display().to_string(), e)
    })
}

pub fn read_symbols(source: &InputSource) -> Result<Vec<char>> {
    match source {
        InputSource::Text(text) => Ok(text.chars().collect()),
        InputSource::File(file_path) => {
            let mut bytes = Vec::new();
            BufReader::new(open_input_file(file_path)?)
                .read_to_end(&mut bytes)
                .map_err(|e| {
                    Error::UnableToOpenInputFileForReading(file_path.display().to_string(), e)
                })?;
            let text = String::from_utf8(bytes)
                .map_err(|_| Error::InputFileNotUtf8(file_path.display().to_string()))?;
            Ok(text.chars().collect())
        }
    }
}

pub fn encode_text(arguments: &Arguments) -> Result<Report<char>> {
    let precision = Precision::new(arguments.precision_digits)?;
    let symbols = read_symbols(&arguments.input)?;
    let model = FrequencyModel::new(precision).with_epsilon(arguments.epsilon);
    let frequencies = Arc::new(model.build(&symbols)?);
    let intervals = Arc::new(model.intervals(&frequencies)?);
    let input = Arc::new(symbols);
    let options = SessionOptions {
        number_of_threads: arguments.number_of_threads,
        show_tree: arguments.show_tree,
    };
    let (huffman, arithmetic) = session::run_sessions(
        Arc::clone(&input),
        Arc::clone(&frequencies),
        Arc::clone(&intervals),
        precision,
        &options,
    )?;
    Ok(Report {
        input: input.to_vec(),
        frequencies: frequencies.as_ref().clone(),
        intervals: intervals.as_ref().clone(),
        huffman,
        arithmetic,
    })
}
