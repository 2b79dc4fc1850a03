//! Insurdesk CLI - customer and policy records for a small insurance agency

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use insurdesk::config::{self, AppConfig};
use insurdesk::customer::{Customer, DrivingType};
use insurdesk::import::CustomerImportService;
use insurdesk::policy::{BillingCycle, PaymentMethod, Policy};
use insurdesk::storage::CrmStore;
use insurdesk::{backup, export, import, seed, ui, validate};

#[derive(Parser)]
#[command(name = "insurdesk")]
#[command(version = "0.1.0")]
#[command(about = "Insurance agency customer and policy records with payment tracking")]
#[command(long_about = r#"
Insurdesk keeps an agency's customer book in a local SQLite file:
  • Customers and their insurance policies
  • Recurring payment dates (monthly/yearly, month-end aware)
  • Automatic overdue detection for card-paid policies
  • Bulk customer import with per-row error reporting

Example usage:
  insurdesk seed --count 20
  insurdesk upcoming --days 7
  insurdesk sweep
  insurdesk pay --policy 3
"#)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to the database file (overrides the config file)
    #[arg(short, long, global = true)]
    database: Option<PathBuf>,

    /// Path to the config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a starter config file
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },

    /// List customers, optionally filtered by name or phone
    Customers {
        /// Keyword matched against name and phone
        #[arg(short, long)]
        search: Option<String>,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Add a customer
    AddCustomer {
        #[arg(long)]
        name: String,

        #[arg(long)]
        phone: String,

        #[arg(long)]
        resident_id: Option<String>,

        #[arg(long)]
        address: Option<String>,

        #[arg(long)]
        occupation: Option<String>,

        /// none, personal or commercial
        #[arg(long)]
        driving: Option<String>,
    },

    /// Show one customer and their policies
    Show {
        /// Customer id
        #[arg(short, long)]
        id: i64,
    },

    /// Delete a customer and all their policies
    DeleteCustomer {
        /// Customer id
        #[arg(short, long)]
        id: i64,
    },

    /// Add a policy for a customer
    AddPolicy {
        /// Owning customer id
        #[arg(long)]
        customer: i64,

        #[arg(long)]
        insurer: String,

        #[arg(long)]
        product: String,

        /// Premium in won
        #[arg(long)]
        premium: i64,

        /// card or transfer
        #[arg(long, default_value = "transfer")]
        method: String,

        /// monthly or yearly
        #[arg(long, default_value = "monthly")]
        cycle: String,

        /// Target day of month (1-31)
        #[arg(long)]
        day: u32,

        /// Contract start date, YYYY-MM-DD
        #[arg(long)]
        start: String,

        #[arg(long)]
        card_issuer: Option<String>,

        #[arg(long)]
        card_number: Option<String>,

        /// MM/YY
        #[arg(long)]
        card_expiry: Option<String>,
    },

    /// List a customer's policies
    Policies {
        /// Owning customer id
        #[arg(long)]
        customer: i64,
    },

    /// Card payments due within the next N days
    Upcoming {
        #[arg(short = 'n', long, default_value = "7")]
        days: i64,
    },

    /// Card policies currently overdue
    Overdue,

    /// Flip card policies with a missed payment date to overdue
    Sweep,

    /// Record a completed payment and advance the due date
    Pay {
        /// Policy id
        #[arg(short, long)]
        policy: i64,

        /// Payment date, YYYY-MM-DD (defaults to today)
        #[arg(long)]
        date: Option<String>,
    },

    /// Import customers from a CSV file
    Import {
        /// Input file
        #[arg(short, long)]
        file: PathBuf,

        /// Actually insert; without this the run is a dry preview
        #[arg(long)]
        commit: bool,

        /// Write the per-row error report to this file
        #[arg(long)]
        report: Option<PathBuf>,

        /// Print the full summary as JSON instead of the text digest
        #[arg(long)]
        json: bool,
    },

    /// Write an empty import template with the expected headers
    Template {
        /// Output file
        #[arg(short, long, default_value = "customer_template.csv")]
        file: PathBuf,
    },

    /// Export all customers to a CSV file
    Export {
        /// Output file
        #[arg(short, long, default_value = "customers.csv")]
        file: PathBuf,
    },

    /// Copy the database into the backup directory
    Backup {
        /// Backup directory (overrides the config file)
        #[arg(long)]
        dir: Option<PathBuf>,
    },

    /// Overwrite the database from a backup file
    Restore {
        /// Backup file to restore
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Fill the database with demo customers and policies
    Seed {
        #[arg(short = 'n', long, default_value = "20")]
        count: usize,
    },

    /// Show record counts
    Stats,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    let app_config = config::load_config(cli.config.as_deref())?.unwrap_or_default();
    let db_path = cli
        .database
        .clone()
        .unwrap_or_else(|| app_config.database_path());

    match cli.command {
        Commands::Init { force } => {
            let path = cli.config.unwrap_or_else(config::default_config_path);
            let starter = AppConfig {
                database: Some(config::default_database_path().display().to_string()),
                backup_dir: Some("backups".to_string()),
            };
            config::write_config(&path, &starter, force)?;
            ui::success(&format!("config written to {}", path.display()));
        }

        Commands::Customers { search, format } => {
            let store = open_store(&db_path)?;
            let customers = match search {
                Some(keyword) => store.search_customers(&keyword)?,
                None => store.get_all_customers()?,
            };

            if format == "json" {
                println!("{}", serde_json::to_string_pretty(&customers)?);
            } else if customers.is_empty() {
                println!("{}", ui::dim("no customers"));
            } else {
                println!("{}", ui::customers_table(&customers));
                ui::summary_row("customers", &customers.len().to_string());
            }
        }

        Commands::AddCustomer {
            name,
            phone,
            resident_id,
            address,
            occupation,
            driving,
        } => {
            validate::validate_name(&name)?;
            validate::validate_phone(&phone)?;
            if let Some(ref rid) = resident_id {
                validate::validate_resident_id(rid)?;
            }

            let mut customer = Customer::new(name, phone);
            customer.resident_id = resident_id.unwrap_or_default();
            customer.address = address;
            customer.occupation = occupation;
            if let Some(d) = driving {
                customer.driving_type = d.parse::<DrivingType>()?;
            }

            let store = open_store(&db_path)?;
            let id = store.add_customer(&customer)?;
            ui::success(&format!("customer #{} added", id));
        }

        Commands::Show { id } => {
            let store = open_store(&db_path)?;
            let Some(customer) = store.get_customer(id)? else {
                ui::error(&format!("customer #{} not found", id));
                std::process::exit(1);
            };

            ui::header(&customer.name);
            ui::summary_row("전화번호", &customer.phone);
            if let Some(ref address) = customer.address {
                ui::summary_row("주소", address);
            }
            if let Some(ref occupation) = customer.occupation {
                ui::summary_row("직업", occupation);
            }
            ui::summary_row("운전여부", customer.driving_type.label());
            if let Some(ref memo) = customer.memo {
                ui::summary_row("메모", memo);
            }

            let policies = store.get_policies_by_customer(id)?;
            if policies.is_empty() {
                println!("{}", ui::dim("no policies"));
            } else {
                ui::section("보험");
                println!("{}", ui::policies_table(&policies));
            }
        }

        Commands::DeleteCustomer { id } => {
            let store = open_store(&db_path)?;
            let policies = store.get_policies_by_customer(id)?.len();
            if store.delete_customer(id)? {
                ui::success(&format!(
                    "customer #{} deleted ({} policies removed with them)",
                    id, policies
                ));
            } else {
                ui::error(&format!("customer #{} not found", id));
                std::process::exit(1);
            }
        }

        Commands::AddPolicy {
            customer,
            insurer,
            product,
            premium,
            method,
            cycle,
            day,
            start,
            card_issuer,
            card_number,
            card_expiry,
        } => {
            let payment_method = method.parse::<PaymentMethod>()?;
            let billing_cycle = cycle.parse::<BillingCycle>()?;
            let start_date = validate::parse_date(&start)?;

            let mut policy = Policy::new(
                customer,
                insurer,
                product,
                premium,
                payment_method,
                billing_cycle,
                day,
                start_date,
            );
            policy.card_issuer = card_issuer;
            policy.card_number = card_number;
            policy.card_expiry = card_expiry;
            validate::validate_policy(&policy)?;

            let store = open_store(&db_path)?;
            if store.get_customer(customer)?.is_none() {
                ui::error(&format!("customer #{} not found", customer));
                std::process::exit(1);
            }

            let id = store.add_policy(&policy)?;
            let saved = store.get_policy(id)?;
            ui::success(&format!("policy #{} added", id));
            if let Some(date) = saved.and_then(|p| p.next_payment_date) {
                ui::info("다음납입일", &date.format("%Y-%m-%d").to_string());
            }
        }

        Commands::Policies { customer } => {
            let store = open_store(&db_path)?;
            let policies = store.get_policies_by_customer(customer)?;
            if policies.is_empty() {
                println!("{}", ui::dim("no policies"));
            } else {
                println!("{}", ui::policies_table(&policies));
            }
        }

        Commands::Upcoming { days } => {
            let store = open_store(&db_path)?;
            let payments = store.get_upcoming_payments(days)?;
            if payments.is_empty() {
                println!("{}", ui::dim(&format!("no card payments due within {} days", days)));
            } else {
                println!("{}", ui::upcoming_table(&payments));
                ui::summary_row("upcoming", &payments.len().to_string());
            }
        }

        Commands::Overdue => {
            let store = open_store(&db_path)?;
            let overdue = store.get_overdue_policies()?;
            if overdue.is_empty() {
                ui::success("no overdue policies");
            } else {
                println!("{}", ui::overdue_table(&overdue));
                println!("{}", ui::overdue(&format!("{} overdue policies", overdue.len())));
            }
        }

        Commands::Sweep => {
            let store = open_store(&db_path)?;
            let flipped = store.auto_update_payment_status()?;
            if flipped == 0 {
                ui::success("nothing newly overdue");
            } else {
                ui::warn(&format!("{} policies marked overdue", flipped));
            }
        }

        Commands::Pay { policy, date } => {
            let payment_date = match date {
                Some(d) => validate::parse_date(&d)?,
                None => chrono::Local::now().date_naive(),
            };

            let store = open_store(&db_path)?;
            if !store.mark_payment_completed(policy, payment_date)? {
                ui::error(&format!("policy #{} not found", policy));
                std::process::exit(1);
            }

            ui::success(&format!("payment recorded for policy #{}", policy));
            if let Some(next) = store.get_policy(policy)?.and_then(|p| p.next_payment_date) {
                ui::info("다음납입일", &next.format("%Y-%m-%d").to_string());
            }
        }

        Commands::Import { file, commit, report, json } => {
            let store = open_store(&db_path)?;
            let service = CustomerImportService::new(&store);
            let summary = if commit {
                service.commit(&file)?
            } else {
                if !json {
                    ui::info("mode", "preview (use --commit to insert)");
                }
                service.preview(&file)?
            };

            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
                if let Some(report_path) = report {
                    import::export_error_report(&summary.errors, &summary.skips, &report_path)?;
                }
                return Ok(());
            }

            ui::section("import");
            ui::summary_row("rows", &summary.total_rows.to_string());
            ui::summary_row("inserted", &summary.success_count.to_string());
            ui::summary_row("skipped", &summary.skip_count.to_string());
            ui::summary_row("failed", &summary.fail_count.to_string());

            for detail in summary.errors.iter().take(10) {
                ui::warn(&format!(
                    "row {} [{}] {}: {}",
                    detail.row, detail.error_code, detail.message, detail.action_hint
                ));
            }
            if summary.errors.len() > 10 {
                println!("{}", ui::dim(&format!("... {} more errors", summary.errors.len() - 10)));
            }

            if let Some(report_path) = report {
                import::export_error_report(&summary.errors, &summary.skips, &report_path)?;
                ui::info("report", &report_path.display().to_string());
            }
        }

        Commands::Template { file } => {
            import::write_customer_template(&file)?;
            ui::success(&format!("template written to {}", file.display()));
        }

        Commands::Export { file } => {
            let store = open_store(&db_path)?;
            let customers = store.get_all_customers()?;
            export::export_to_csv(&customers, &file)?;
            ui::success(&format!(
                "{} customers exported to {}",
                customers.len(),
                file.display()
            ));
        }

        Commands::Backup { dir } => {
            let backup_dir = dir.unwrap_or_else(|| app_config.backup_dir());
            let path = backup::backup_database(&db_path, &backup_dir)?;
            if let Some(info) = backup::backup_info(&path)? {
                ui::success(&format!("backup written to {} ({} bytes)", path.display(), info.size));
            }
        }

        Commands::Restore { file } => {
            backup::restore_database(&file, &db_path)?;
            ui::success(&format!("database restored from {}", file.display()));
        }

        Commands::Seed { count } => {
            let store = open_store(&db_path)?;
            let mut rng = rand::thread_rng();
            let today = chrono::Local::now().date_naive();
            let report = seed::seed_store(&store, count, &mut rng, today)?;
            ui::success(&format!(
                "seeded {} customers and {} policies",
                report.customers, report.policies
            ));
        }

        Commands::Stats => {
            let store = open_store(&db_path)?;
            let stats = store.stats()?;
            ui::header(&format!("Insurdesk ({})", db_path.display()));
            println!("{}", stats);
        }
    }

    Ok(())
}

fn open_store(db_path: &std::path::Path) -> anyhow::Result<CrmStore> {
    config::ensure_db_dir(db_path)?;
    Ok(CrmStore::open(db_path)?)
}
