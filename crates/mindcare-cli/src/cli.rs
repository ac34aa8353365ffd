use std::path::PathBuf;

use clap::{Parser, Subcommand};
use mindcare_core::models::subscale::Subscale;
use mindcare_core::models::user::ReportTo;

#[derive(Parser, Debug)]
#[command(name = "mindcare")]
#[command(about = "Workplace mental health self-assessment and counseling client", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Counseling service base URL, including the /api prefix
    #[arg(long, global = true, env = "MINDCARE_API_URL")]
    pub api_url: Option<String>,

    /// Session file (defaults to the user data directory)
    #[arg(long, global = true, env = "MINDCARE_SESSION_FILE")]
    pub session_file: Option<PathBuf>,

    /// Print machine-readable JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    pub log_json: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the 21 questionnaire items and the answer scale
    Questions,

    /// Score an answer set locally without touching the session
    Score {
        /// 21 comma-separated answers, each 0-3
        #[arg(long, value_delimiter = ',', allow_hyphen_values = true, required = true)]
        answers: Vec<i32>,
    },

    /// Begin a session with the user's details
    Start {
        #[arg(long)]
        first_name: String,

        #[arg(long)]
        last_name: String,

        #[arg(long)]
        email: String,

        #[arg(long, default_value = "")]
        phone: String,

        #[arg(long)]
        age: u32,

        #[arg(long, default_value = "")]
        gender: String,

        #[arg(long, default_value = "")]
        department: String,

        /// Who receives the session report (hr or manager)
        #[arg(long, default_value = "hr")]
        report_to: ReportTo,
    },

    /// Answer one question
    Answer {
        /// Question number, 1-21
        question: usize,

        /// Answer value, 0-3
        #[arg(allow_hyphen_values = true)]
        value: i32,
    },

    /// Submit the assessment for scoring
    Assess {
        /// Replace all answers before submitting
        #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
        answers: Option<Vec<i32>>,
    },

    /// Send a message to the counselor
    Chat {
        /// Message text
        #[arg(required = true, num_args = 1..)]
        message: Vec<String>,
    },

    /// End the session and send the report
    End,

    /// Write the session summary as JSON
    Export {
        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show the current session
    Status,

    /// Show recommendations for the session or one subscale
    Recommendations {
        /// Ask the service for one subscale's recommendations
        #[arg(long)]
        subscale: Option<Subscale>,
    },

    /// Show crisis contacts
    Resources,

    /// Send the contact form
    Contact {
        #[arg(long)]
        name: String,

        #[arg(long)]
        email: String,

        #[arg(long)]
        message: String,
    },

    /// Discard the saved session
    Reset,
}
