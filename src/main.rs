use std::env::args_os;

use entropy_coders::{encode_text, CLIParser};

fn main() {
    let mut cli_parser = CLIParser::default();
    let arguments = cli_parser.parse(args_os());
    match encode_text(&arguments) {
        Ok(report) => print!("{}", report),
        Err(e) => eprintln!("Encoding failed because of: {}", e),
    }
}
