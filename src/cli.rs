use crate::precision::{Decimal, MAX_DIGITS};
use crate::{Arguments, InputSource};
use clap::{
    arg, crate_authors, crate_description, crate_name, crate_version, value_parser, Arg,
    ArgAction, ArgMatches, Command,
};
use std::ffi::OsString;
use std::path::PathBuf;
use std::{io, thread};

pub struct CLIParser {
    command: Command,
}

impl CLIParser {
    pub fn new() -> Self {
        let command = Self::create_base_command();
        let command = Self::register_arguments(command);
        CLIParser { command }
    }

    pub fn parse<I, T>(&mut self, itr: I) -> Arguments
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = self
            .command
            .try_get_matches_from_mut(itr)
            .unwrap_or_else(|e| e.exit());
        Self::extract_arguments(&matches)
    }

    fn register_arguments(command: Command) -> Command {
        let command = Self::register_input_arguments(command);
        let command = Self::register_precision_argument(command);
        let command = Self::register_epsilon_argument(command);
        let command = Self::register_threads_argument(command);
        Self::register_show_tree_argument(command)
    }

    fn register_input_arguments(command: Command) -> Command {
        command
            .arg(Self::create_text_argument())
            .arg(Self::create_input_file_argument())
    }

    fn register_precision_argument(command: Command) -> Command {
        command.arg(Self::create_precision_argument())
    }

    fn register_epsilon_argument(command: Command) -> Command {
        command.arg(Self::create_epsilon_argument())
    }

    fn register_threads_argument(command: Command) -> Command {
        command.arg(Self::create_threads_argument())
    }

    fn register_show_tree_argument(command: Command) -> Command {
        command.arg(Self::create_show_tree_argument())
    }

    fn create_base_command() -> Command {
        Command::new(crate_name!())
            .version(crate_version!())
            .author(crate_authors!())
            .about(crate_description!())
    }

    fn create_text_argument() -> Arg {
        Arg::new("text")
            .help("Text to encode")
            .required_unless_present("input_file")
            .conflicts_with("input_file")
    }

    fn create_input_file_argument() -> Arg {
        arg!(input_file: -f --file <FILE> "Path to UTF-8 input file, read instead of TEXT")
            .required(false)
            .value_parser(value_parser!(PathBuf))
    }

    fn create_precision_argument() -> Arg {
        arg!(precision: -p --precision <DIGITS> "Significant decimal digits for arithmetic coding")
            .default_value("10")
            .value_parser(value_parser!(u32).range(1..=i64::from(MAX_DIGITS)))
    }

    fn create_epsilon_argument() -> Arg {
        arg!(epsilon: -e --epsilon <EPSILON> "Tolerated deviation of an interval width from its probability")
            .default_value("1e-10")
            .value_parser(value_parser!(Decimal))
    }

    fn create_threads_argument() -> Arg {
        arg!(-t --threads <THREADS> "Number of Threads")
            .default_value(get_number_of_threads().unwrap_or(1).to_string())
            .required(false)
            .value_parser(value_parser!(usize))
    }

    fn create_show_tree_argument() -> Arg {
        arg!(show_tree: -s --show_tree "Print the Huffman tree")
            .action(ArgAction::SetTrue)
    }

    fn extract_arguments(matches: &ArgMatches) -> Arguments {
        Arguments {
            input: Self::extract_input_argument(matches),
            precision_digits: Self::extract_precision_argument(matches),
            epsilon: Self::extract_epsilon_argument(matches),
            number_of_threads: Self::extract_threads_argument(matches),
            show_tree: Self::extract_show_tree_argument(matches),
        }
    }

    fn extract_input_argument(matches: &ArgMatches) -> InputSource {
        match matches.get_one::<PathBuf>("input_file") {
            Some(file_path) => InputSource::File(file_path.clone()),
            None => InputSource::Text(
                matches
                    .get_one::<String>("text")
                    .expect("Either text or input file must be provided")
                    .clone(),
            ),
        }
    }

    fn extract_precision_argument(matches: &ArgMatches) -> u32 {
        matches
            .get_one::<u32>("precision")
            .expect("Precision must be provided, but was unset.")
            .to_owned()
    }

    fn extract_epsilon_argument(matches: &ArgMatches) -> Decimal {
        matches
            .get_one::<Decimal>("epsilon")
            .expect("Epsilon must be provided, but was unset.")
            .to_owned()
    }

    fn extract_threads_argument(matches: &ArgMatches) -> usize {
        matches
            .get_one::<usize>("threads")
            .expect("Required argument threads not provided")
            .to_owned()
    }

    fn extract_show_tree_argument(matches: &ArgMatches) -> bool {
        matches.get_flag("show_tree")
    }
}

impl Default for CLIParser {
    fn default() -> Self {
        Self::new()
    }
}

fn get_number_of_threads() -> io::Result<usize> {
    Ok(thread::available_parallelism()?.get())
}

#[cfg(test)]
mod tests {
    use clap::{error::ErrorKind, Command};

    use super::CLIParser;
    use crate::precision::Decimal;
    use crate::InputSource;

    const PROGRAM_NAME_ARGUMENT: &str = "test_program_name";

    #[test]
    fn parse_text_argument() {
        let command = Command::new("test");
        let command = CLIParser::register_input_arguments(command);
        let matches = command.get_matches_from(vec![PROGRAM_NAME_ARGUMENT, "barbara"]);
        let input = CLIParser::extract_input_argument(&matches);
        assert_eq!(input, InputSource::Text("barbara".to_string()));
    }

    #[test]
    fn parse_input_file_argument() {
        let input_file_name = "input.txt";
        let input_file_path = format!("/input_directory/{}", input_file_name);
        let command = Command::new("test");
        let command = CLIParser::register_input_arguments(command);
        let matches =
            command.get_matches_from(vec![PROGRAM_NAME_ARGUMENT, "--file", &input_file_path]);
        match CLIParser::extract_input_argument(&matches) {
            InputSource::File(file_path) => {
                assert_eq!(file_path.file_name().unwrap(), input_file_name)
            }
            other => panic!("Expected input file, got {:?}", other),
        }
    }

    #[test]
    fn parse_text_and_input_file_conflict() {
        let command = Command::new("test");
        let command = CLIParser::register_input_arguments(command);
        let result =
            command.try_get_matches_from(vec![PROGRAM_NAME_ARGUMENT, "barbara", "-f", "in.txt"]);
        if let Err(error) = result {
            assert_eq!(error.kind(), ErrorKind::ArgumentConflict);
        } else {
            panic!("Conflicting text and input file not detected");
        }
    }

    #[test]
    fn parse_missing_input() {
        let command = Command::new("test");
        let command = CLIParser::register_input_arguments(command);
        let result = command.try_get_matches_from(vec![PROGRAM_NAME_ARGUMENT]);
        if let Err(error) = result {
            assert_eq!(error.kind(), ErrorKind::MissingRequiredArgument);
        } else {
            panic!("Missing input not detected");
        }
    }

    #[test]
    fn parse_precision_argument() {
        let command = Command::new("test");
        let command = CLIParser::register_precision_argument(command);
        let matches = command.get_matches_from(vec![PROGRAM_NAME_ARGUMENT, "--precision", "18"]);
        assert_eq!(CLIParser::extract_precision_argument(&matches), 18);
    }

    #[test]
    fn parse_precision_illegal_argument() {
        for digits in ["0", "19"] {
            let command = Command::new("test");
            let command = CLIParser::register_precision_argument(command);
            let result =
                command.try_get_matches_from(vec![PROGRAM_NAME_ARGUMENT, "--precision", digits]);
            if let Err(error) = result {
                assert_eq!(error.kind(), ErrorKind::ValueValidation);
            } else {
                panic!("Illegal value {} for precision not detected", digits);
            }
        }
    }

    #[test]
    fn parse_epsilon_argument() {
        let command = Command::new("test");
        let command = CLIParser::register_epsilon_argument(command);
        let matches = command.get_matches_from(vec![PROGRAM_NAME_ARGUMENT, "-e", "2.5e-6"]);
        assert_eq!(
            CLIParser::extract_epsilon_argument(&matches),
            Decimal::new(25, -7)
        );
    }

    #[test]
    fn parse_epsilon_illegal_argument() {
        let command = Command::new("test");
        let command = CLIParser::register_epsilon_argument(command);
        let result = command.try_get_matches_from(vec![PROGRAM_NAME_ARGUMENT, "-e", "tiny"]);
        if let Err(error) = result {
            assert_eq!(error.kind(), ErrorKind::ValueValidation);
        } else {
            panic!("Illegal value for epsilon not detected");
        }
    }

    #[test]
    fn parse_number_of_threads_argument() {
        let command = Command::new("test");
        let command = CLIParser::register_threads_argument(command);
        let matches = command.get_matches_from(vec![PROGRAM_NAME_ARGUMENT, "--threads", "5"]);
        let actual = CLIParser::extract_threads_argument(&matches);
        let expected = 5;
        assert_eq!(actual, expected);
    }

    #[test]
    fn parse_show_tree_argument() {
        let command = Command::new("test");
        let command = CLIParser::register_show_tree_argument(command);
        let matches = command.get_matches_from(vec![PROGRAM_NAME_ARGUMENT, "-s"]);
        assert!(CLIParser::extract_show_tree_argument(&matches));
    }

    #[test]
    fn parse_required_arguments_only() {
        let mut cli_parser = CLIParser::default();
        let arguments = cli_parser.parse(vec![PROGRAM_NAME_ARGUMENT, "barbara", "-t", "8"]);
        assert_eq!(
            arguments.input,
            InputSource::Text("barbara".to_string()),
            "input does not match"
        );
        assert_eq!(arguments.precision_digits, 10, "precision does not match");
        assert_eq!(
            arguments.epsilon,
            Decimal::new(1, -10),
            "epsilon does not match"
        );
        assert_eq!(
            arguments.number_of_threads, 8,
            "number_of_threads does not match"
        );
        assert!(!arguments.show_tree, "show_tree does not match");
    }
}
