use clap::Subcommand;

#[derive(Subcommand)]
pub enum Commands {
    /// Compile a grid request into SQL against a class schema
    Compile {
        #[arg(long, help = "Class schema JSON file path")]
        schema: String,

        #[arg(long, help = "Grid request JSON file path, or '-' to read stdin")]
        request: String,

        #[arg(long, help = "Compiler settings JSON file path")]
        config: Option<String>,

        #[arg(long, help = "Load GRIDSQL_* overrides from this .env file")]
        env_file: Option<String>,

        #[arg(long, help = "SQL dialect: \"mysql\" or \"postgres\"")]
        dialect: Option<String>,

        #[arg(long, help = "Language used when the request names none")]
        language: Option<String>,

        #[arg(long, help = "IANA time zone for date filters, e.g. Europe/Vienna")]
        timezone: Option<String>,

        #[arg(
            long,
            help = "If specified, writes the compiled parts to this file instead of stdout"
        )]
        output: Option<String>,

        #[arg(
            long,
            help = "If set, prints all compiled parts as JSON instead of the SELECT statement"
        )]
        json: bool,
    },
    /// Show how a grid column key is understood
    ParseKey {
        /// Column key as sent by the grid, e.g. "~classificationstore~attributes~1-2"
        key: String,
    },
}
