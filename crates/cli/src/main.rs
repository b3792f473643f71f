use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use anyhow::Result;
use chrono::NaiveDate;
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing::info;

use fleetdeck_api::{ListBackend, WriteOutcome};
use fleetdeck_core::{ScreenSpec, TableRow};
use fleetdeck_domain::booking::{self, DateWindow};
use fleetdeck_domain::driver::DriverStatus;
use fleetdeck_domain::{customer, driver, Booking, Customer, Driver};
use fleetdeck_store::ScreenStore;
use fleetdeck_table::{Notice, Severity, TableController, TransitionDecision};

mod backend;

use backend::FixtureBackend;

#[derive(Parser, Debug)]
#[command(name = "fleetctl", version, about = "Fleetdeck back-office CLI")]
struct Cli {
    /// Output format
    #[arg(short = 'o', long = "output", value_enum, global = true, default_value_t = Output::Human)]
    output: Output,

    /// JSON fixture standing in for the backend service
    #[arg(long = "data", global = true, default_value = "fleet.json")]
    data: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum Output {
    Human,
    Json,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Driver management
    Drivers {
        #[command(subcommand)]
        cmd: DriverCmd,
    },
    /// Customer management
    Customers {
        #[command(subcommand)]
        cmd: CustomerCmd,
    },
    /// Booking queries
    Bookings {
        #[command(subcommand)]
        cmd: BookingCmd,
    },
}

#[derive(Args, Debug)]
struct ListArgs {
    /// Partition to list (defaults to the screen's default partition)
    #[arg(long)]
    partition: Option<String>,
    /// Case-insensitive substring search
    #[arg(long, default_value = "")]
    search: String,
    /// Column key to sort by
    #[arg(long)]
    sort: Option<String>,
    #[arg(long, action = ArgAction::SetTrue)]
    desc: bool,
    #[arg(long, default_value_t = 0)]
    page: usize,
    #[arg(long = "page-size", default_value_t = 5)]
    page_size: usize,
}

#[derive(Subcommand, Debug)]
enum DriverCmd {
    /// List drivers of a partition
    Ls(ListArgs),
    /// Per-partition driver counts
    Counts,
    /// Register a new driver
    Add {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        contact: Option<String>,
        #[arg(long, default_value = "available")]
        status: String,
    },
    /// Change a driver's status (available | deactive | blacklist)
    SetStatus {
        id: String,
        status: String,
        /// Partition whose view the action is taken from
        #[arg(long)]
        partition: Option<String>,
        /// Confirm the write
        #[arg(long, action = ArgAction::SetTrue)]
        yes: bool,
    },
    /// Delete a driver
    Rm {
        id: String,
        #[arg(long, action = ArgAction::SetTrue)]
        yes: bool,
    },
}

#[derive(Subcommand, Debug)]
enum CustomerCmd {
    /// List customers of a partition
    Ls(ListArgs),
    /// Per-partition customer counts
    Counts,
    /// Move a customer back to the active list
    Activate {
        id: String,
        #[arg(long)]
        partition: Option<String>,
        #[arg(long, action = ArgAction::SetTrue)]
        yes: bool,
    },
    /// Blacklist a customer
    Blacklist {
        id: String,
        #[arg(long)]
        partition: Option<String>,
        #[arg(long, action = ArgAction::SetTrue)]
        yes: bool,
    },
    /// Delete a customer
    Rm {
        id: String,
        #[arg(long, action = ArgAction::SetTrue)]
        yes: bool,
    },
}

#[derive(Subcommand, Debug)]
enum BookingCmd {
    /// List incoming bookings for a date window
    Ls {
        #[command(flatten)]
        list: ListArgs,
        #[arg(long)]
        from: Option<NaiveDate>,
        #[arg(long)]
        to: Option<NaiveDate>,
    },
    /// Plain-text booking report for a date window
    Report {
        #[arg(long)]
        from: Option<NaiveDate>,
        #[arg(long)]
        to: Option<NaiveDate>,
    },
}

fn init_tracing() {
    let env = std::env::var("FLEETDECK_LOG").unwrap_or_else(|_| "info".to_string());
    let filter = tracing_subscriber::EnvFilter::from_str(&env)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(true).init();
}

fn controller<R: TableRow>(
    spec: ScreenSpec,
    backend: Arc<dyn ListBackend<R>>,
) -> TableController<R> {
    TableController::new(spec, backend, Arc::new(ScreenStore::new()))
}

fn emit_notices(notices: Vec<Notice>) {
    for n in notices {
        let tag = match n.severity {
            Severity::Success => "ok",
            Severity::Info => "info",
            Severity::Error => "error",
        };
        eprintln!("[{}] {}", tag, n.message);
    }
}

/// Drive one list view through the controller handlers and print it.
async fn run_list<R>(ctl: &mut TableController<R>, args: &ListArgs, output: Output) -> Result<()>
where
    R: TableRow + Serialize,
{
    ctl.mount().await;
    if let Some(p) = &args.partition {
        ctl.select_partition(p).await;
    }
    ctl.on_page_size_change(args.page_size);
    if !args.search.is_empty() {
        ctl.on_search_change(&args.search);
    }
    if let Some(key) = &args.sort {
        ctl.on_sort_click(key);
        if args.desc {
            // second click on the active column flips the direction
            ctl.on_sort_click(key);
        }
    }
    ctl.on_page_change(args.page);

    let view = ctl.view();
    match output {
        Output::Json => {
            let doc = serde_json::json!({
                "partition": view.partition,
                "page": view.page,
                "pageSize": view.page_size,
                "totalFiltered": view.total_filtered,
                "emptyRows": view.empty_rows,
                "sortKey": view.sort_key,
                "ascending": view.sort_direction.is_asc(),
                "rows": view.rows,
            });
            println!("{}", serde_json::to_string_pretty(&doc)?);
        }
        Output::Human => {
            let spec = *ctl.spec();
            println!(
                "{} • {} • page {} • showing {} of {}",
                spec.title,
                view.partition,
                view.page,
                view.rows.len(),
                view.total_filtered
            );
            if view.rows.is_empty() {
                println!("{}", ctl.empty_state_message());
            } else {
                print_table(&spec, &view.rows, view.page * view.page_size);
            }
        }
    }
    emit_notices(ctl.take_notices());
    Ok(())
}

fn print_table<R: TableRow>(spec: &ScreenSpec, rows: &[R], serial_base: usize) {
    let data_cols: Vec<_> = spec
        .columns
        .iter()
        .filter(|c| !matches!(c.key, "action" | "actions"))
        .collect();
    let header: Vec<&str> = data_cols.iter().map(|c| c.label).collect();
    println!("{}", header.join(" | "));
    for (i, row) in rows.iter().enumerate() {
        let cells: Vec<String> = data_cols
            .iter()
            .map(|c| match c.key {
                "sno" | "index" => (serial_base + i + 1).to_string(),
                key => row.field(key).render(),
            })
            .collect();
        println!("{}", cells.join(" | "));
    }
}

async fn run_counts<R: TableRow>(ctl: &mut TableController<R>, output: Output) -> Result<()> {
    if let Err(e) = ctl.refresh_counts().await {
        eprintln!("[error] count refresh failed: {}", e);
    }
    let spec = *ctl.spec();
    match output {
        Output::Json => {
            let doc: serde_json::Map<String, serde_json::Value> = spec
                .partitions
                .iter()
                .map(|p| (p.name.to_string(), ctl.count(p.name).into()))
                .collect();
            println!("{}", serde_json::to_string_pretty(&doc)?);
        }
        Output::Human => {
            for p in spec.partitions {
                println!("{:<12} {}", p.name, ctl.count(p.name));
            }
        }
    }
    Ok(())
}

/// Gate, confirm and perform one status change, then persist the fixture.
async fn run_status_change<R>(
    ctl: &mut TableController<R>,
    fixture: &FixtureBackend,
    partition: Option<&str>,
    id: &str,
    status: &str,
    yes: bool,
) -> Result<()>
where
    R: TableRow,
{
    ctl.mount().await;
    if let Some(p) = partition {
        ctl.select_partition(p).await;
    }
    match ctl.request_status_change(id, status) {
        None => {
            eprintln!("[error] no such record in the {} view: {}", ctl.state().partition, id);
        }
        Some(TransitionDecision::NeedsConfirmation) if !yes => {
            println!(
                "Change status of {} to {}? re-run with --yes to proceed",
                id,
                ctl.spec().status_label(status)
            );
        }
        Some(TransitionDecision::NeedsConfirmation) => {
            ctl.confirm_status_change(id, status).await;
            fixture.save().await?;
        }
        Some(_) => {
            // NoOp and PartitionBlocked surface their own notices; nothing
            // reached the backend, so there is nothing to persist
            ctl.confirm_status_change(id, status).await;
        }
    }
    emit_notices(ctl.take_notices());
    Ok(())
}

async fn run_delete<R: TableRow>(
    ctl: &mut TableController<R>,
    fixture: &FixtureBackend,
    id: &str,
    yes: bool,
) -> Result<()> {
    if !yes {
        println!(
            "Delete {}? This action cannot be undone. re-run with --yes to proceed",
            id
        );
        return Ok(());
    }
    ctl.mount().await;
    ctl.delete_record(id).await;
    fixture.save().await?;
    emit_notices(ctl.take_notices());
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;

    const ONE_DRIVER: &str =
        r#"{"drivers":[{"driverId":"D1","name":"Ada","status":"available"}]}"#;

    fn temp_fixture(name: &str) -> PathBuf {
        let path = std::env::temp_dir().join(name);
        std::fs::write(&path, ONE_DRIVER).unwrap();
        path
    }

    fn driver_ctl(path: &Path) -> (TableController<Driver>, Arc<FixtureBackend>) {
        let fixture = FixtureBackend::load(path).unwrap();
        let be: Arc<dyn ListBackend<Driver>> = fixture.clone();
        (controller(driver::SCREEN, be), fixture)
    }

    #[tokio::test]
    async fn gated_status_change_does_not_rewrite_the_fixture() {
        let path = temp_fixture("fleetctl-gated-noop.json");
        let (mut ctl, fixture) = driver_ctl(&path);

        // no-op request: a save would pretty-print the compact file
        run_status_change(&mut ctl, &fixture, None, "D1", "available", true)
            .await
            .unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), ONE_DRIVER);
        std::fs::remove_file(&path).ok();
    }

    #[tokio::test]
    async fn confirmed_status_change_persists_the_fixture() {
        let path = temp_fixture("fleetctl-confirmed-write.json");
        let (mut ctl, fixture) = driver_ctl(&path);

        run_status_change(&mut ctl, &fixture, None, "D1", "deactive", true)
            .await
            .unwrap();
        let saved = std::fs::read_to_string(&path).unwrap();
        assert!(saved.contains("deactive"));
        std::fs::remove_file(&path).ok();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Drivers { cmd } => {
            let fixture = FixtureBackend::load(&cli.data)?;
            let be: Arc<dyn ListBackend<Driver>> = fixture.clone();
            let mut ctl = controller(driver::SCREEN, be);
            match cmd {
                DriverCmd::Ls(args) => run_list(&mut ctl, &args, cli.output).await?,
                DriverCmd::Counts => run_counts(&mut ctl, cli.output).await?,
                DriverCmd::Add { id, name, contact, status } => {
                    let Some(status) = DriverStatus::parse(&status) else {
                        eprintln!("[error] unknown driver status: {}", status);
                        return Ok(());
                    };
                    let record = Driver {
                        driver_id: id.clone(),
                        name,
                        first_name: None,
                        last_name: None,
                        contact_number: contact,
                        status,
                    };
                    let outcome = ListBackend::<Driver>::create_record(&*fixture, record)
                        .await
                        .map_err(|e| anyhow::anyhow!("driver create: {}", e))?;
                    match outcome {
                        WriteOutcome::Fulfilled => {
                            fixture.save().await?;
                            println!("driver {} registered", id);
                        }
                        WriteOutcome::Rejected => {
                            eprintln!("[error] driver {} already exists", id);
                        }
                    }
                }
                DriverCmd::SetStatus { id, status, partition, yes } => {
                    run_status_change(&mut ctl, &fixture, partition.as_deref(), &id, &status, yes)
                        .await?
                }
                DriverCmd::Rm { id, yes } => run_delete(&mut ctl, &fixture, &id, yes).await?,
            }
        }
        Commands::Customers { cmd } => {
            let fixture = FixtureBackend::load(&cli.data)?;
            let be: Arc<dyn ListBackend<Customer>> = fixture.clone();
            let mut ctl = controller(customer::SCREEN, be);
            match cmd {
                CustomerCmd::Ls(args) => run_list(&mut ctl, &args, cli.output).await?,
                CustomerCmd::Counts => run_counts(&mut ctl, cli.output).await?,
                CustomerCmd::Activate { id, partition, yes } => {
                    run_status_change(&mut ctl, &fixture, partition.as_deref(), &id, "active", yes)
                        .await?
                }
                CustomerCmd::Blacklist { id, partition, yes } => {
                    run_status_change(
                        &mut ctl,
                        &fixture,
                        partition.as_deref(),
                        &id,
                        "blacklist",
                        yes,
                    )
                    .await?
                }
                CustomerCmd::Rm { id, yes } => run_delete(&mut ctl, &fixture, &id, yes).await?,
            }
        }
        Commands::Bookings { cmd } => match cmd {
            BookingCmd::Ls { list, from, to } => {
                let window = match DateWindow::new(from, to) {
                    Ok(w) => w,
                    Err(e) => {
                        eprintln!("[error] {}", e);
                        return Ok(());
                    }
                };
                let fixture = FixtureBackend::load_windowed(&cli.data, window)?;
                let be: Arc<dyn ListBackend<Booking>> = fixture.clone();
                let mut ctl = controller(booking::SCREEN, be);
                run_list(&mut ctl, &list, cli.output).await?;
            }
            BookingCmd::Report { from, to } => {
                let window = match DateWindow::new(from, to) {
                    Ok(w) => w,
                    Err(e) => {
                        eprintln!("[error] {}", e);
                        return Ok(());
                    }
                };
                let fixture = FixtureBackend::load_windowed(&cli.data, window)?;
                let be: Arc<dyn ListBackend<Booking>> = fixture.clone();
                let rows = be
                    .fetch_list(booking::SCREEN.default_partition)
                    .await
                    .map_err(|e| anyhow::anyhow!("booking fetch: {}", e))?;
                info!(rows = rows.len(), "report window fetched");
                print!("{}", booking::render_report(&window, &rows));
            }
        },
    }
    Ok(())
}
