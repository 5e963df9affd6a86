use clap::Parser;

use crate::dominant::GroupField;

#[derive(Parser, Debug)]
#[command(
    name = "coopstats",
    about = "Aggregate multi-state cooperative society registrations into dashboard-ready views",
    version,
    long_about = None
)]
pub struct Args {
    /// Google Sheets workbook holding the registration tables
    #[arg(long, default_value = "16l0tKPD7PCbZZXd01XYAL-95C9lnSJK-")]
    pub sheet_id: String,

    /// Worksheet names to union into the canonical dataset
    #[arg(
        long,
        value_delimiter = ',',
        default_values_t = ["Table 1".to_string(), "Table 2".to_string(), "Table 3".to_string(), "Table 4".to_string()]
    )]
    pub tables: Vec<String>,

    /// Group the dominant-sector view by state or district
    #[arg(short, long, value_enum, default_value = "state")]
    pub group_by: GroupField,

    /// Number of top districts to display
    #[arg(short, long, default_value_t = 10)]
    pub top: usize,

    /// Fetch timeout per source, in seconds
    #[arg(long, default_value_t = 30)]
    pub timeout: u64,

    /// Number of worker threads for source fetching
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}
