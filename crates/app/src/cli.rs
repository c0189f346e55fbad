//! Command-line surface of the Paragon client.

use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use paragon_application::{
    AuthPipeline, ChartsService, InMemoryTokenStorage, PersonsService, ProfileService,
    ReceiptsService, SearchService, Session, TokenStorage, TokenStore,
};
use paragon_domain::{Category, ChartQuery, Receipt, ReceiptQuery, RegisterPayload};
use paragon_infrastructure::{FileTokenStorage, ReqwestHttpClient};
use tracing::warn;

/// Personal finance tracker: receipts, persons, and monthly summaries.
#[derive(Debug, Parser)]
#[command(name = "paragon", version, about)]
pub struct Cli {
    /// Base URL of the Paragon API.
    #[arg(long, env = "PARAGON_API_URL", default_value = "http://localhost:8000")]
    api_url: String,

    /// Session file location (defaults to the per-user config dir).
    #[arg(long, env = "PARAGON_SESSION_FILE")]
    session_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Log in and persist the session.
    Login {
        /// Account username.
        username: String,
        /// Account password.
        #[arg(long)]
        password: String,
    },
    /// Create an account, then log in with the same credentials.
    Register {
        /// Account email address.
        email: String,
        /// Desired username.
        username: String,
        /// Desired password.
        #[arg(long)]
        password: String,
        /// Password confirmation.
        #[arg(long)]
        re_password: String,
    },
    /// Clear the persisted session.
    Logout,
    /// Show the current session's profile.
    Whoami,
    /// Receipt operations.
    #[command(subcommand)]
    Receipts(ReceiptsCommand),
    /// List known persons.
    Persons,
    /// Suggest recently used shop names.
    Shops {
        /// Search prefix (at least 3 characters to hit the server).
        query: String,
    },
    /// Suggest item descriptions for a shop.
    Predict {
        /// Shop name.
        shop: String,
        /// Search prefix (at least 3 characters to hit the server).
        query: String,
    },
    /// Monthly aggregation endpoints.
    #[command(subcommand)]
    Summary(SummaryCommand),
    /// Account profile operations.
    #[command(subcommand)]
    Profile(ProfileCommand),
}

#[derive(Debug, Subcommand)]
enum ProfileCommand {
    /// Update the account email or avatar.
    Update {
        /// New email address.
        #[arg(long)]
        email: Option<String>,
        /// New avatar URL.
        #[arg(long)]
        avatar: Option<String>,
    },
    /// Delete the account (requires the current password).
    Delete {
        /// Current account password.
        #[arg(long)]
        password: String,
    },
}

#[derive(Debug, Subcommand)]
enum ReceiptsCommand {
    /// List receipts matching the filters.
    List {
        #[command(flatten)]
        filters: ReceiptFilters,
    },
    /// Show one receipt.
    Show {
        /// Receipt id.
        id: i64,
    },
    /// Create receipts from a JSON file (array of receipts).
    Add {
        /// Path to the JSON file.
        file: PathBuf,
    },
    /// Delete one receipt.
    Delete {
        /// Receipt id.
        id: i64,
    },
}

#[derive(Debug, Args)]
struct ReceiptFilters {
    /// Restrict to a payment month (1-12).
    #[arg(long)]
    month: Option<u32>,
    /// Restrict to a payment year.
    #[arg(long)]
    year: Option<i32>,
    /// Restrict to items owned by these person ids.
    #[arg(long = "owner")]
    owners: Vec<i64>,
    /// Restrict to these category codes.
    #[arg(long = "category")]
    category: Vec<String>,
    /// Restrict to "expense" or "income".
    #[arg(long = "type")]
    transaction_type: Option<String>,
}

impl ReceiptFilters {
    fn into_query(self) -> Result<ReceiptQuery, Box<dyn Error>> {
        Ok(ReceiptQuery {
            owners: self.owners,
            month: self.month,
            year: self.year,
            category: parse_categories(&self.category)?,
            transaction_type: self
                .transaction_type
                .as_deref()
                .map(str::parse)
                .transpose()?,
        })
    }
}

#[derive(Debug, Subcommand)]
enum SummaryCommand {
    /// Cumulative daily expense/income sums.
    Line {
        #[command(flatten)]
        period: Period,
    },
    /// Per-shop expense totals, largest first.
    Bar {
        #[command(flatten)]
        period: Period,
        /// Restrict to these category codes.
        #[arg(long = "category")]
        category: Vec<String>,
    },
    /// Per-category expense slices.
    Pie {
        #[command(flatten)]
        period: Period,
    },
}

#[derive(Debug, Args)]
struct Period {
    /// Person id to aggregate for.
    #[arg(long)]
    owner: i64,
    /// Selected year.
    #[arg(long)]
    year: i32,
    /// Selected month (1-12).
    #[arg(long)]
    month: u32,
}

impl Period {
    fn into_query(self) -> ChartQuery {
        ChartQuery::new(self.owner, self.year, self.month)
    }
}

impl Cli {
    /// Wires the client together and runs the selected command.
    ///
    /// # Errors
    ///
    /// Any API, validation, or I/O error, already formatted for display.
    pub async fn run(self) -> Result<(), Box<dyn Error>> {
        let storage: Arc<dyn TokenStorage> = match &self.session_file {
            Some(path) => Arc::new(FileTokenStorage::at_path(path.clone())),
            None => FileTokenStorage::default_location().map_or_else(
                || {
                    warn!("no config directory on this platform; session will not persist");
                    Arc::new(InMemoryTokenStorage::new()) as Arc<dyn TokenStorage>
                },
                |s| Arc::new(s) as Arc<dyn TokenStorage>,
            ),
        };

        let transport = Arc::new(ReqwestHttpClient::new(&self.api_url)?);
        let pipeline = AuthPipeline::new(transport, TokenStore::new(storage));
        let session = Session::new(pipeline.clone());

        match self.command {
            Command::Login { username, password } => {
                session.login(&username, &password).await?;
                println!("logged in as {username}");
            }
            Command::Register {
                email,
                username,
                password,
                re_password,
            } => {
                session
                    .register(&RegisterPayload {
                        email,
                        username: username.clone(),
                        password,
                        re_password,
                    })
                    .await?;
                println!("registered and logged in as {username}");
            }
            Command::Logout => {
                session.logout();
                println!("logged out");
            }
            Command::Whoami => match session.restore().await? {
                Some(user) => println!("{} <{}>", user.username, user.email),
                None => println!("not logged in"),
            },
            Command::Receipts(command) => run_receipts(command, pipeline).await?,
            Command::Persons => {
                let persons = PersonsService::new(pipeline).list().await?;
                for person in persons {
                    let roles = match (person.payer, person.owner) {
                        (true, true) => "payer, owner",
                        (true, false) => "payer",
                        (false, true) => "owner",
                        (false, false) => "-",
                    };
                    println!("{:>4}  {:<20} {roles}", person.id, person.name);
                }
            }
            Command::Shops { query } => {
                for shop in SearchService::new(pipeline).recent_shops(&query).await? {
                    println!("{shop}");
                }
            }
            Command::Predict { shop, query } => {
                let predictions = SearchService::new(pipeline)
                    .item_predictions(&shop, &query)
                    .await?;
                for prediction in predictions {
                    println!("{prediction}");
                }
            }
            Command::Summary(command) => run_summary(command, pipeline).await?,
            Command::Profile(command) => run_profile(command, pipeline, &session).await?,
        }

        Ok(())
    }
}

async fn run_profile(
    command: ProfileCommand,
    pipeline: AuthPipeline,
    session: &Session,
) -> Result<(), Box<dyn Error>> {
    let profile = ProfileService::new(pipeline);
    match command {
        ProfileCommand::Update { email, avatar } => {
            let update = paragon_domain::ProfileUpdate { email, avatar };
            if update.is_empty() {
                println!("nothing to update");
                return Ok(());
            }
            let user = profile.update(&update).await?;
            println!("updated profile for {}", user.username);
        }
        ProfileCommand::Delete { password } => {
            profile.delete_account(&password).await?;
            session.logout();
            println!("account deleted");
        }
    }
    Ok(())
}

async fn run_receipts(command: ReceiptsCommand, pipeline: AuthPipeline) -> Result<(), Box<dyn Error>> {
    let receipts = ReceiptsService::new(pipeline);
    match command {
        ReceiptsCommand::List { filters } => {
            let listed = receipts.list(&filters.into_query()?).await?;
            println!("{}", serde_json::to_string_pretty(&listed)?);
        }
        ReceiptsCommand::Show { id } => {
            let receipt = receipts.get(id).await?;
            println!("{}", serde_json::to_string_pretty(&receipt)?);
        }
        ReceiptsCommand::Add { file } => {
            let content = std::fs::read_to_string(&file)?;
            let parsed: Vec<Receipt> = serde_json::from_str(&content)?;
            let created = receipts.create(&parsed).await?;
            println!("created {} receipt(s)", created.len());
        }
        ReceiptsCommand::Delete { id } => {
            receipts.delete(id).await?;
            println!("deleted receipt {id}");
        }
    }
    Ok(())
}

async fn run_summary(command: SummaryCommand, pipeline: AuthPipeline) -> Result<(), Box<dyn Error>> {
    let charts = ChartsService::new(pipeline);
    match command {
        SummaryCommand::Line { period } => {
            let rows = charts.line_sums(&period.into_query()).await?;
            for row in rows {
                println!("{}  expense {:>10.2}  income {:>10.2}", row.day, row.expense, row.income);
            }
        }
        SummaryCommand::Bar { period, category } => {
            let mut query = period.into_query();
            query.category = parse_categories(&category)?;
            let rows = charts.bar_shops(&query).await?;
            for row in rows {
                println!("{:<24} {:>10.2}", row.shop, row.expense_sum);
            }
        }
        SummaryCommand::Pie { period } => {
            let rows = charts.pie_categories(&period.into_query()).await?;
            for row in rows {
                println!("{:<24} {:>10.2}", row.category, row.expense_sum);
            }
        }
    }
    Ok(())
}

fn parse_categories(codes: &[String]) -> Result<Vec<Category>, Box<dyn Error>> {
    codes
        .iter()
        .map(|code| code.parse::<Category>().map_err(Into::into))
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn cli_parses_receipt_filters() {
        let cli = Cli::parse_from([
            "paragon",
            "receipts",
            "list",
            "--month",
            "3",
            "--year",
            "2024",
            "--owner",
            "1",
            "--owner",
            "2",
            "--category",
            "fuel",
            "--type",
            "expense",
        ]);

        let Command::Receipts(ReceiptsCommand::List { filters }) = cli.command else {
            panic!("parsed the wrong command");
        };
        let query = filters.into_query().unwrap();
        assert_eq!(query.owners, vec![1, 2]);
        assert_eq!(query.month, Some(3));
        assert_eq!(query.category, vec![Category::Fuel]);
    }

    #[test]
    fn unknown_category_is_rejected() {
        assert!(parse_categories(&["groceries".to_string()]).is_err());
    }

    #[test]
    fn cli_verifies() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
