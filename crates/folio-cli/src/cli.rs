//! Command line definition

use clap::{value_parser, Arg, ArgAction, Command};

pub(crate) fn command() -> Command {
    Command::new("folio")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Browse uploaded documents and translate selected paragraphs")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_name("FILE")
                .help("Configuration file (default: ./folio.toml when present)"),
        )
        .arg(
            Arg::new("api-url")
                .long("api-url")
                .global(true)
                .value_name("URL")
                .help("Backend address, overrides FOLIO_API_URL and the config file"),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Debug logging"),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Log as JSON lines"),
        )
        .subcommand(Command::new("languages").about("List supported languages"))
        .subcommand(Command::new("list").about("List uploaded documents"))
        .subcommand(
            Command::new("show")
                .about("Show a document chapter")
                .arg(document_id())
                .arg(chapter().default_value("0")),
        )
        .subcommand(
            Command::new("translate")
                .about("Translate selected paragraphs of one chapter")
                .arg(document_id())
                .arg(chapter().required(true))
                .arg(
                    Arg::new("paragraphs")
                        .long("paragraphs")
                        .short('p')
                        .required(true)
                        .value_delimiter(',')
                        .num_args(1..)
                        .value_parser(value_parser!(usize))
                        .help("Paragraph indices, e.g. 0,2,5"),
                )
                .arg(
                    Arg::new("from")
                        .long("from")
                        .value_name("LANG")
                        .help("Source language (default from config, else en)"),
                )
                .arg(
                    Arg::new("to")
                        .long("to")
                        .value_name("LANG")
                        .help("Target language (default from config, else pt)"),
                )
                .arg(
                    Arg::new("formality")
                        .long("formality")
                        .value_parser(["formal", "informal", "neutral"])
                        .help("Formality level"),
                )
                .arg(
                    Arg::new("style")
                        .long("style")
                        .help("Style hint, e.g. academic or literary"),
                ),
        )
        .subcommand(
            Command::new("upload")
                .about("Upload a PDF, DOCX or TXT document")
                .arg(
                    Arg::new("path")
                        .required(true)
                        .value_parser(value_parser!(std::path::PathBuf))
                        .help("File to upload"),
                ),
        )
        .subcommand(
            Command::new("delete")
                .about("Delete a document")
                .arg(document_id()),
        )
        .subcommand(Command::new("history").about("List stored translations"))
        .subcommand(
            Command::new("rate")
                .about("Rate a stored translation")
                .arg(
                    Arg::new("translation")
                        .required(true)
                        .value_parser(value_parser!(u64))
                        .help("Translation id"),
                )
                .arg(
                    Arg::new("rating")
                        .required(true)
                        .value_parser(value_parser!(u8).range(1..=5))
                        .help("Quality from 1 to 5"),
                ),
        )
}

fn document_id() -> Arg {
    Arg::new("id")
        .required(true)
        .value_parser(value_parser!(u64).range(1..))
        .help("Document id")
}

fn chapter() -> Arg {
    Arg::new("chapter")
        .long("chapter")
        .short('c')
        .value_parser(value_parser!(usize))
        .help("Chapter index, starting at 0")
}
