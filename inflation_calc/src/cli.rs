/// Structure representing command-line arguments.
#[derive(Debug)]
pub struct Args {
    pub amount: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
    pub config: Option<std::path::PathBuf>,
    pub table: Option<std::path::PathBuf>,
    pub json: bool,
    pub range: bool,
}

/// Command-line arguments parser using Clap.
///
/// Amount and years are kept as raw text so the calculator reports bad input
/// the same way it would for any other front end.
impl Args {
    /// Parses command-line arguments using `clap`.
    ///
    /// # Returns
    /// * `Args` - Struct containing parsed arguments.
    pub fn parse() -> Self {
        Self::from_matches(&command().get_matches())
    }

    fn from_matches(matches: &clap::ArgMatches) -> Self {
        Args {
            amount: matches.get_one::<String>("amount").cloned(),
            start: matches.get_one::<String>("start").cloned(),
            end: matches.get_one::<String>("end").cloned(),
            config: matches.get_one::<String>("config").map(std::path::PathBuf::from),
            table: matches.get_one::<String>("table").map(std::path::PathBuf::from),
            json: matches.get_flag("json"),
            range: matches.get_flag("range"),
        }
    }
}

fn command() -> clap::Command {
    clap::Command::new("inflation_calc")
        .version("0.1.0")
        .about("Calculate purchasing power across years from a CPI table")
        .arg(
            clap::Arg::new("amount")
                .short('a')
                .long("amount")
                .help("Initial amount in dollars (default: 100 or the settings value)")
                .allow_hyphen_values(true)
                .num_args(1),
        )
        .arg(
            clap::Arg::new("start")
                .short('s')
                .long("start")
                .help("Start year (default: 1995 or the settings value)")
                .allow_hyphen_values(true)
                .num_args(1),
        )
        .arg(
            clap::Arg::new("end")
                .short('e')
                .long("end")
                .help("End year (default: current year or the settings value)")
                .allow_hyphen_values(true)
                .num_args(1),
        )
        .arg(
            clap::Arg::new("config")
                .short('c')
                .long("config")
                .help("Path to a settings.json file")
                .num_args(1),
        )
        .arg(
            clap::Arg::new("table")
                .short('t')
                .long("table")
                .help("Path to a JSON index table, overrides the settings file")
                .num_args(1),
        )
        .arg(
            clap::Arg::new("json")
                .long("json")
                .help("Print the result or failure as JSON")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            clap::Arg::new("range")
                .long("range")
                .help("Print the years covered by the index table and exit")
                .action(clap::ArgAction::SetTrue),
        )
}
