//! RentWise CLI
//!
//! Terminal front end for the RentWise API:
//! - Log in and out
//! - Browse the dashboard and individual leases
//! - Add, edit and delete properties, leases and payments

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use rentwise::config::generate_default_config;
use rentwise::forms::{
    lease, login, payment, property, register, FormAction, LeaseForm, LoginForm, PaymentForm,
    PropertyForm, RegisterForm, SubmitError,
};
use rentwise::model::{Lease, Payment, Property};
use rentwise::output::{render, OutputFormat, Tabular};
use rentwise::views::{
    Confirm, DashboardView, LeaseDetailView, LeaseOptionsView, ListView, Mutation,
    PaymentOptionsView, Phase, ViewState,
};
use rentwise::{
    Access, ApiClient, AppContext, Config, FileSessionStore, LoggingConfig, Route, RouteGuard,
    SessionStore, TokenStatus,
};

const NOT_LOGGED_IN: &str = "Not logged in. Run `rentwise login` first.";

#[derive(Parser)]
#[command(name = "rentwise")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Manage rental properties, leases and payments")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file (default: search the standard locations)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// API server URL
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table, global = true)]
    format: OutputFormat,

    /// Skip delete confirmations
    #[arg(short = 'y', long, global = true)]
    yes: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and store the session tokens
    Login {
        #[arg(short, long)]
        username: String,
        /// Password (default: read from stdin)
        #[arg(short, long)]
        password: Option<String>,
    },

    /// Forget the stored session
    Logout,

    /// Create an account
    Register(RegisterArgs),

    /// Show session status
    Status,

    /// Show all properties, leases and payments
    Dashboard,

    /// Manage properties
    Property {
        #[command(subcommand)]
        command: PropertyCommand,
    },

    /// Manage leases
    Lease {
        #[command(subcommand)]
        command: LeaseCommand,
    },

    /// Manage payments
    Payment {
        #[command(subcommand)]
        command: PaymentCommand,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Args)]
struct RegisterArgs {
    #[arg(long)]
    username: String,
    #[arg(long)]
    email: String,
    #[arg(long, default_value = "")]
    first_name: String,
    #[arg(long, default_value = "")]
    last_name: String,
    #[arg(long, default_value = "")]
    phone_number: String,
    #[arg(long)]
    password: String,
    /// Password confirmation
    #[arg(long)]
    re_password: String,
}

#[derive(Subcommand)]
enum PropertyCommand {
    /// List properties
    List,
    /// Add a property
    Add(PropertyArgs),
    /// Edit a property; only the given fields change
    Edit {
        id: i64,
        #[command(flatten)]
        fields: PropertyArgs,
    },
    /// Delete a property
    Delete { id: i64 },
}

#[derive(Args)]
struct PropertyArgs {
    #[arg(long)]
    address: Option<String>,
    #[arg(long)]
    description: Option<String>,
    /// apartment, room, office, industrial, town_house or bungalow
    #[arg(long = "type")]
    property_type: Option<String>,
    /// available, rented or under_renovation
    #[arg(long)]
    status: Option<String>,
    /// Floor area in m²
    #[arg(long, allow_negative_numbers = true)]
    area: Option<String>,
    #[arg(long, allow_negative_numbers = true)]
    rooms: Option<String>,
}

#[derive(Subcommand)]
enum LeaseCommand {
    /// List leases
    List,
    /// Show a lease with its payments
    Show { id: i64 },
    /// List properties available for a new lease and possible tenants
    Options,
    /// Add a lease
    Add(LeaseArgs),
    /// Edit a lease; only the given fields change
    Edit {
        id: i64,
        #[command(flatten)]
        fields: LeaseArgs,
    },
    /// Delete a lease
    Delete { id: i64 },
    /// Download the lease contract PDF
    Contract {
        id: i64,
        /// Output file (default: lease-<id>-contract.pdf)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Args)]
struct LeaseArgs {
    /// Property ID
    #[arg(long)]
    property: Option<String>,
    /// Tenant user ID
    #[arg(long)]
    tenant: Option<String>,
    /// Start date (YYYY-MM-DD)
    #[arg(long)]
    start: Option<String>,
    /// End date (YYYY-MM-DD)
    #[arg(long)]
    end: Option<String>,
    /// Rent amount
    #[arg(long, allow_negative_numbers = true)]
    rate: Option<String>,
    #[arg(long)]
    active: Option<bool>,
}

#[derive(Subcommand)]
enum PaymentCommand {
    /// List payments
    List,
    /// List leases a payment can be booked against
    Options,
    /// Add a payment
    Add(PaymentArgs),
    /// Edit a payment; only the given fields change
    Edit {
        id: i64,
        #[command(flatten)]
        fields: PaymentArgs,
    },
    /// Delete a payment
    Delete { id: i64 },
}

#[derive(Args)]
struct PaymentArgs {
    /// Lease ID
    #[arg(long)]
    lease: Option<String>,
    #[arg(long, allow_negative_numbers = true)]
    amount: Option<String>,
    /// Payment date (YYYY-MM-DD)
    #[arg(long)]
    date: Option<String>,
    #[arg(long)]
    paid: Option<bool>,
}

/// Form actions for the fields given on the command line
fn text_actions(fields: &[(&str, &Option<String>)]) -> Vec<FormAction> {
    fields
        .iter()
        .filter_map(|(field, value)| value.as_ref().map(|v| FormAction::text(*field, v.clone())))
        .collect()
}

impl PropertyArgs {
    fn actions(&self) -> Vec<FormAction> {
        text_actions(&[
            (property::ADDRESS, &self.address),
            (property::DESCRIPTION, &self.description),
            (property::PROPERTY_TYPE, &self.property_type),
            (property::STATUS, &self.status),
            (property::AREA, &self.area),
            (property::NUM_OF_ROOMS, &self.rooms),
        ])
    }
}

impl LeaseArgs {
    fn actions(&self) -> Vec<FormAction> {
        let mut actions = text_actions(&[
            (lease::PROPERTY, &self.property),
            (lease::TENANT, &self.tenant),
            (lease::START_DATE, &self.start),
            (lease::END_DATE, &self.end),
            (lease::RATE_AMOUNT, &self.rate),
        ]);
        if let Some(active) = self.active {
            actions.push(FormAction::flag(lease::ACTIVE_LEASE, active));
        }
        actions
    }
}

impl PaymentArgs {
    fn actions(&self) -> Vec<FormAction> {
        let mut actions = text_actions(&[
            (payment::AMOUNT, &self.amount),
            (payment::PAYMENT_DATE, &self.date),
        ]);
        if let Some(paid) = self.paid {
            actions.push(FormAction::flag(payment::IS_PAID, paid));
        }
        actions
    }

    fn lease_id(&self) -> anyhow::Result<Option<i64>> {
        self.lease
            .as_deref()
            .map(|id| id.trim().parse().context("Lease ID must be a number"))
            .transpose()
    }
}

/// Everything a command needs
struct App {
    client: ApiClient,
    guard: RouteGuard,
    format: OutputFormat,
    yes: bool,
}

impl App {
    /// Session for a protected route, or an error asking the user to log in
    async fn context(&self, route: Route) -> anyhow::Result<AppContext> {
        match self.guard.check(&route).await? {
            Access::Granted(session) => Ok(AppContext::new(self.client.clone(), session)),
            Access::Public | Access::Redirect(_) => bail!(NOT_LOGGED_IN),
        }
    }

    /// Data of a loaded view, or the view's error
    async fn ready<'a, T: Default>(&self, state: &'a ViewState<T>) -> anyhow::Result<&'a T> {
        match state.phase() {
            Phase::Ready => Ok(state.data()),
            Phase::Redirect(_) => {
                self.guard.logout().await?;
                bail!(NOT_LOGGED_IN)
            }
            _ => bail!(state.error().unwrap_or("Request failed").to_string()),
        }
    }

    /// Unwrap a form result, printing field errors
    async fn submitted<T>(&self, result: Result<T, SubmitError>) -> anyhow::Result<T> {
        match result {
            Ok(value) => Ok(value),
            Err(SubmitError::Invalid(errors)) => {
                for (field, message) in errors.iter() {
                    eprintln!("  {field}: {message}");
                }
                bail!("Invalid input")
            }
            Err(e) if e.redirect().is_some() => {
                self.guard.logout().await?;
                bail!(NOT_LOGGED_IN)
            }
            Err(e) => Err(e.into()),
        }
    }

    fn confirm(&self) -> Box<dyn Confirm> {
        if self.yes {
            Box::new(|_: &str| true)
        } else {
            Box::new(confirm_on_stdin)
        }
    }

    async fn mutated(&self, outcome: Mutation, error: Option<&str>) -> anyhow::Result<()> {
        match outcome {
            Mutation::Applied => {
                println!("Deleted.");
                Ok(())
            }
            Mutation::Cancelled => {
                println!("Cancelled.");
                Ok(())
            }
            Mutation::Failed => match error {
                Some(message) => bail!(message.to_string()),
                None => {
                    self.guard.logout().await?;
                    bail!(NOT_LOGGED_IN)
                }
            },
            Mutation::NotReady => bail!("Nothing to delete"),
        }
    }

    fn print<T: Tabular>(&self, items: &[T]) -> anyhow::Result<()> {
        render(items, self.format, &mut io::stdout().lock())?;
        Ok(())
    }

    /// Print a titled block; JSON output is left to the caller
    fn print_section<T: Tabular>(&self, title: &str, items: &[T]) -> anyhow::Result<()> {
        println!("{title}");
        self.print(items)?;
        println!();
        Ok(())
    }

    fn print_json<T: serde::Serialize>(&self, value: &T) -> anyhow::Result<()> {
        println!("{}", serde_json::to_string_pretty(value)?);
        Ok(())
    }
}

fn confirm_on_stdin(prompt: &str) -> bool {
    eprint!("{prompt} [y/N] ");
    let _ = io::stderr().flush();
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer).is_ok()
        && matches!(answer.trim(), "y" | "Y" | "yes" | "Yes")
}

fn read_password() -> anyhow::Result<String> {
    eprint!("Password: ");
    io::stderr().flush()?;
    let mut password = String::new();
    io::stdin().lock().read_line(&mut password)?;
    Ok(password.trim_end_matches(&['\r', '\n'][..]).to_string())
}

fn init_tracing(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("rentwise={}", config.level)));
    let registry = tracing_subscriber::registry().with(filter);

    if config.format == "json" {
        registry
            .with(fmt::layer().json().with_writer(io::stderr))
            .init();
    } else {
        registry.with(fmt::layer().with_writer(io::stderr)).init();
    }
}

impl App {
    fn new(
        config: &Config,
        store: Arc<dyn SessionStore>,
        format: OutputFormat,
        yes: bool,
    ) -> anyhow::Result<Self> {
        Ok(Self {
            client: ApiClient::new(&config.api.base_url)?,
            guard: RouteGuard::new(store, config.session.token_policy),
            format,
            yes,
        })
    }

    async fn run(&self, command: Commands, config: &Config) -> anyhow::Result<()> {
        match command {
            Commands::Login { username, password } => {
                let password = match password {
                    Some(password) => password,
                    None => read_password()?,
                };
                let mut form = LoginForm::new(self.client.clone(), self.guard.store().clone());
                form.dispatch(FormAction::text(login::USERNAME, username.clone()));
                form.dispatch(FormAction::text(login::PASSWORD, password));
                self.submitted(form.submit().await).await?;
                println!("Logged in as {username}");
            }

            Commands::Logout => {
                self.guard.logout().await?;
                println!("Logged out");
            }

            Commands::Register(args) => {
                let mut form = RegisterForm::new(self.client.clone());
                for (field, value) in [
                    (register::USERNAME, args.username),
                    (register::EMAIL, args.email),
                    (register::FIRST_NAME, args.first_name),
                    (register::LAST_NAME, args.last_name),
                    (register::PHONE_NUMBER, args.phone_number),
                    (register::PASSWORD, args.password),
                    (register::RE_PASSWORD, args.re_password),
                ] {
                    form.dispatch(FormAction::text(field, value));
                }
                self.submitted(form.submit().await).await?;
                println!("Registration successful! Please login.");
            }

            Commands::Status => {
                println!("RentWise v{}", env!("CARGO_PKG_VERSION"));
                println!();
                println!("API:          {}", config.api.base_url);
                println!("Session file: {}", config.session.file);
                println!("Token policy: {}", config.session.token_policy);
                println!();
                match self.guard.status().await? {
                    TokenStatus::Valid { expires_at } => {
                        let user = self.guard.store().load().await?.username;
                        println!("Logged in as {}", user.as_deref().unwrap_or("(unknown user)"));
                        if let Some(at) = expires_at {
                            println!("Token expires {}", at.format("%Y-%m-%d %H:%M UTC"));
                        }
                    }
                    other => println!("Not logged in ({other})"),
                }
            }

            Commands::Dashboard => {
                let mut view = DashboardView::new(self.context(Route::Dashboard).await?);
                let dashboard = self.ready(view.load().await).await?;
                if self.format == OutputFormat::Json {
                    self.print_json(dashboard)?;
                } else {
                    self.print_section("Properties", &dashboard.properties)?;
                    self.print_section("Leases", &dashboard.leases)?;
                    self.print_section("Payments", &dashboard.payments)?;
                }
            }

            Commands::Property { command } => match command {
                PropertyCommand::List => {
                    let mut view = ListView::<Property>::new(self.context(Route::Dashboard).await?);
                    self.print(self.ready(view.load().await).await?)?;
                }
                PropertyCommand::Add(fields) => {
                    let mut form = PropertyForm::create(self.context(Route::PropertyAdd).await?);
                    fields.actions().into_iter().for_each(|a| form.dispatch(a));
                    let saved = self.submitted(form.submit().await).await?;
                    self.print(&[saved.record])?;
                }
                PropertyCommand::Edit { id, fields } => {
                    let ctx = self.context(Route::PropertyEdit(id)).await?;
                    let mut form = self.submitted(PropertyForm::edit(ctx, id).await).await?;
                    fields.actions().into_iter().for_each(|a| form.dispatch(a));
                    let saved = self.submitted(form.submit().await).await?;
                    self.print(&[saved.record])?;
                }
                PropertyCommand::Delete { id } => {
                    let mut view = ListView::<Property>::new(self.context(Route::Dashboard).await?);
                    self.ready(view.load().await).await?;
                    let outcome = view.delete(id, self.confirm().as_ref()).await;
                    self.mutated(outcome, view.state().error()).await?;
                }
            },

            Commands::Lease { command } => match command {
                LeaseCommand::List => {
                    let mut view = ListView::<Lease>::new(self.context(Route::Dashboard).await?);
                    self.print(self.ready(view.load().await).await?)?;
                }
                LeaseCommand::Show { id } => {
                    let ctx = self.context(Route::LeaseDetail(id)).await?;
                    let mut view = LeaseDetailView::new(ctx, id);
                    let detail = self
                        .ready(view.load().await)
                        .await?
                        .as_ref()
                        .context("Lease not found")?;
                    if self.format == OutputFormat::Json {
                        self.print_json(detail)?;
                    } else {
                        self.print_section("Lease", std::slice::from_ref(&detail.lease))?;
                        self.print_section("Payments", &detail.payments)?;
                    }
                }
                LeaseCommand::Options => {
                    let mut view = LeaseOptionsView::new(self.context(Route::LeaseAdd).await?);
                    let options = self.ready(view.load().await).await?;
                    if self.format == OutputFormat::Json {
                        self.print_json(options)?;
                    } else {
                        self.print_section("Available properties", &options.properties)?;
                        self.print_section("Tenants", &options.tenants)?;
                    }
                }
                LeaseCommand::Add(fields) => {
                    let mut form = LeaseForm::create(self.context(Route::LeaseAdd).await?);
                    fields.actions().into_iter().for_each(|a| form.dispatch(a));
                    let saved = self.submitted(form.submit().await).await?;
                    self.print(&[saved.record])?;
                }
                LeaseCommand::Edit { id, fields } => {
                    let ctx = self.context(Route::LeaseEdit(id)).await?;
                    let mut form = self.submitted(LeaseForm::edit(ctx, id).await).await?;
                    fields.actions().into_iter().for_each(|a| form.dispatch(a));
                    let saved = self.submitted(form.submit().await).await?;
                    self.print(&[saved.record])?;
                }
                LeaseCommand::Delete { id } => {
                    let mut view = ListView::<Lease>::new(self.context(Route::Dashboard).await?);
                    self.ready(view.load().await).await?;
                    let outcome = view.delete(id, self.confirm().as_ref()).await;
                    self.mutated(outcome, view.state().error()).await?;
                }
                LeaseCommand::Contract { id, output } => {
                    let ctx = self.context(Route::LeaseDetail(id)).await?;
                    let mut view = LeaseDetailView::new(ctx, id);
                    let result = view.contract_pdf().await;
                    let pdf = match result {
                        Ok(pdf) => pdf,
                        Err(e) if e.is_auth() => {
                            self.guard.logout().await?;
                            bail!(NOT_LOGGED_IN)
                        }
                        Err(_) => bail!(view
                            .state()
                            .error()
                            .unwrap_or("Failed to load contract PDF preview.")
                            .to_string()),
                    };
                    let path = output.unwrap_or_else(|| PathBuf::from(format!("lease-{id}-contract.pdf")));
                    tokio::fs::write(&path, &pdf)
                        .await
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    println!("Saved contract to {}", path.display());
                }
            },

            Commands::Payment { command } => match command {
                PaymentCommand::List => {
                    let mut view = ListView::<Payment>::new(self.context(Route::Dashboard).await?);
                    self.print(self.ready(view.load().await).await?)?;
                }
                PaymentCommand::Options => {
                    let mut view =
                        PaymentOptionsView::new(self.context(Route::PaymentAdd { lease: None }).await?);
                    self.print(&self.ready(view.load().await).await?.leases)?;
                }
                PaymentCommand::Add(fields) => {
                    let lease = fields.lease_id()?;
                    let ctx = self.context(Route::PaymentAdd { lease }).await?;
                    let mut form = PaymentForm::for_lease(ctx, lease);
                    fields.actions().into_iter().for_each(|a| form.dispatch(a));
                    let saved = self.submitted(form.submit().await).await?;
                    self.print(&[saved.record])?;
                }
                PaymentCommand::Edit { id, fields } => {
                    let ctx = self.context(Route::PaymentEdit(id)).await?;
                    let mut form = self.submitted(PaymentForm::edit(ctx, id).await).await?;
                    if let Some(lease) = &fields.lease {
                        form.dispatch(FormAction::text(payment::LEASE, lease.clone()));
                    }
                    fields.actions().into_iter().for_each(|a| form.dispatch(a));
                    let saved = self.submitted(form.submit().await).await?;
                    self.print(&[saved.record])?;
                }
                PaymentCommand::Delete { id } => {
                    let mut view = ListView::<Payment>::new(self.context(Route::Dashboard).await?);
                    self.ready(view.load().await).await?;
                    let outcome = view.delete(id, self.confirm().as_ref()).await;
                    self.mutated(outcome, view.state().error()).await?;
                }
            },

            Commands::Config { output } => {
                let content = generate_default_config();
                if let Some(path) = output {
                    std::fs::write(&path, content)?;
                    println!("Config written to {}", path.display());
                } else {
                    println!("{content}");
                }
            }
        }

        Ok(())
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };
    if let Some(url) = &cli.api_url {
        config.api.base_url = url.clone();
    }

    init_tracing(&config.logging);
    for warning in &config.warnings {
        tracing::warn!("{warning}");
    }
    if let Some(path) = &config.source {
        tracing::debug!(path = %path.display(), "Loaded config");
    }
    tracing::debug!(api = %config.api.base_url, session = %config.session.file, "Starting");

    let store = Arc::new(FileSessionStore::new(&config.session.file));
    let app = App::new(&config, store, cli.format, cli.yes)?;
    app.run(cli.command, &config).await
}
