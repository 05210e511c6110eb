// src/main.rs
//! `kis` - консольный клиент КИС поверх хранилищ.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::rc::Rc;
use uuid::Uuid;

use kis_client::config::{load_config, load_config_from, load_env_file, Config};
use kis_client::http::ApiClient;
use kis_client::logging::setup_logging;
use kis_client::models::{BoxDraft, CounterpartyDraft, OrderQuery, PersonDraft};
use kis_client::pagination::PageRequest;
use kis_client::storage::FileStorage;
use kis_client::stores::{ClassList, Counterparties, People, Resource, Stores};
use kis_client::transport::AwcTransport;

#[derive(Debug, Parser)]
#[command(name = "kis", version)]
#[command(about = "Command-line client for the KIS order tracking API")]
struct Cli {
    /// Path to a TOML config file (overrides CONFIG_FILE)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log in before running the command
    #[arg(long, global = true, env = "KIS_USERNAME")]
    username: Option<String>,

    #[arg(long, global = true, env = "KIS_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Employees
    #[command(subcommand)]
    People(PeopleCommand),
    /// Customers and suppliers
    #[command(subcommand)]
    Counterparties(CounterpartyCommand),
    /// Box accounting
    #[command(subcommand)]
    Boxes(BoxCommand),
    #[command(subcommand)]
    Orders(OrderCommand),
    /// Show the current user
    Whoami,
    #[command(subcommand)]
    Theme(ThemeCommand),
}

// ==================== PEOPLE ====================

#[derive(Debug, Args)]
struct PersonArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    surname: String,
    #[arg(long)]
    patronymic: String,
}

impl From<PersonArgs> for PersonDraft {
    fn from(args: PersonArgs) -> Self {
        PersonDraft::new(args.name, args.surname, args.patronymic)
    }
}

#[derive(Debug, Subcommand)]
enum PeopleCommand {
    List {
        #[arg(long)]
        search: Option<String>,
    },
    Add(PersonArgs),
    Update {
        uuid: Uuid,
        #[command(flatten)]
        person: PersonArgs,
    },
    Delete { uuid: Uuid },
}

// ==================== COUNTERPARTIES ====================

#[derive(Debug, Args)]
struct CounterpartyArgs {
    #[arg(long)]
    name: String,
    /// Legal form id (ООО, ИП, ...)
    #[arg(long)]
    form_id: i64,
}

#[derive(Debug, Subcommand)]
enum CounterpartyCommand {
    List {
        #[arg(long)]
        search: Option<String>,
        /// Only counterparties with this legal form id
        #[arg(long)]
        form: Option<i64>,
    },
    Add(CounterpartyArgs),
    Update {
        id: i64,
        #[command(flatten)]
        counterparty: CounterpartyArgs,
    },
    Delete { id: i64 },
}

// ==================== BOXES ====================

#[derive(Debug, Args)]
struct BoxArgs {
    #[arg(long)]
    name: String,
    /// Order serial, e.g. 012-03-2024
    #[arg(long)]
    order: String,
    #[arg(long)]
    scheme_developer: Uuid,
    #[arg(long)]
    assembler: Uuid,
    #[arg(long)]
    programmer: Option<Uuid>,
    #[arg(long)]
    tester: Uuid,
}

impl From<BoxArgs> for BoxDraft {
    fn from(args: BoxArgs) -> Self {
        BoxDraft {
            name: args.name,
            order_id: args.order,
            scheme_developer_id: args.scheme_developer,
            assembler_id: args.assembler,
            programmer_id: args.programmer,
            tester_id: args.tester,
        }
    }
}

#[derive(Debug, Subcommand)]
enum BoxCommand {
    List {
        #[arg(long, default_value_t = 1)]
        page: i64,
        #[arg(long, default_value_t = 20)]
        size: i64,
    },
    Add(BoxArgs),
    Update {
        serial_num: i64,
        #[command(flatten)]
        item: BoxArgs,
    },
}

// ==================== ORDERS ====================

#[derive(Debug, Subcommand)]
enum OrderCommand {
    List {
        #[arg(long)]
        status: Option<i64>,
        #[arg(long)]
        serial: Option<String>,
        #[arg(long)]
        customer: Option<String>,
        #[arg(long)]
        priority: Option<i64>,
        /// Page number, starting from 0
        #[arg(long, default_value_t = 0)]
        page: i64,
        #[arg(long, default_value_t = 10)]
        limit: i64,
    },
    Serials {
        #[arg(long)]
        status: Option<i64>,
    },
    Show { serial: String },
}

#[derive(Debug, Subcommand)]
enum ThemeCommand {
    Show,
    Toggle,
}

// ==================== MAIN ====================

#[actix_rt::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => {
            load_env_file()?;
            load_config_from(Some(path.as_path()))?
        }
        None => load_config()?,
    };

    setup_logging(&config.logging)?;
    config.print_startup_info();

    let stores = build_stores(&config)?;
    stores.theme.init();

    if let (Some(username), Some(password)) = (&cli.username, &cli.password) {
        stores.auth.login(username, password).await.context("Login failed")?;
    }

    run(cli.command, &stores).await
}

fn build_stores(config: &Config) -> Result<Stores> {
    let transport = Rc::new(AwcTransport::new(&config.api));
    let client = ApiClient::new(transport, config.api.base_url.clone());
    let storage = Rc::new(
        FileStorage::open(&config.storage.path)
            .with_context(|| format!("Failed to open storage: {}", config.storage.path))?,
    );
    Ok(Stores::new(client, storage, Rc::new(ClassList::new()), config.theme.default))
}

async fn run(command: Commands, stores: &Stores) -> Result<()> {
    match command {
        Commands::People(cmd) => people(cmd, stores).await,
        Commands::Counterparties(cmd) => counterparties(cmd, stores).await,
        Commands::Boxes(cmd) => boxes(cmd, stores).await,
        Commands::Orders(cmd) => orders(cmd, stores).await,
        Commands::Whoami => whoami(stores).await,
        Commands::Theme(cmd) => {
            let theme = match cmd {
                ThemeCommand::Show => stores.theme.theme(),
                ThemeCommand::Toggle => stores.theme.toggle(),
            };
            println!("{}", theme);
            Ok(())
        }
    }
}

async fn people(cmd: PeopleCommand, stores: &Stores) -> Result<()> {
    let store = &stores.people;
    match cmd {
        PeopleCommand::List { search } => {
            store.fetch().await?;
            let mut found = store.search(search.as_deref().unwrap_or(""));
            found.sort_by(People::compare);
            for person in found {
                println!("{}  {}", person.uuid, person.formatted_name());
            }
        }
        PeopleCommand::Add(args) => {
            match store.create(args.into()).await? {
                Some(person) => println!("created {}", person.uuid),
                None => println!("created"),
            }
        }
        PeopleCommand::Update { uuid, person } => {
            store.update(&uuid, person.into()).await?;
            println!("updated {}", uuid);
        }
        PeopleCommand::Delete { uuid } => {
            store.delete(&uuid).await?;
            println!("deleted {}", uuid);
        }
    }
    Ok(())
}

async fn counterparties(cmd: CounterpartyCommand, stores: &Stores) -> Result<()> {
    let store = &stores.counterparties;
    match cmd {
        CounterpartyCommand::List { search, form } => {
            store.fetch().await?;
            let mut listed = match form {
                Some(form_id) => store.filter_by_form(form_id),
                None => store.items(),
            };
            listed.sort_by(Counterparties::compare);
            let needle = search.unwrap_or_default().to_lowercase();
            for item in listed.iter().filter(|c| c.name.to_lowercase().contains(&needle)) {
                println!("{:>6}  {}", item.id, item.full_name());
            }
        }
        CounterpartyCommand::Add(args) => {
            store.create(CounterpartyDraft::new(args.name, args.form_id)).await?;
            println!("created");
        }
        CounterpartyCommand::Update { id, counterparty } => {
            let draft = CounterpartyDraft::new(counterparty.name, counterparty.form_id);
            store.update(&id, draft).await?;
            println!("updated {}", id);
        }
        CounterpartyCommand::Delete { id } => {
            store.delete(&id).await?;
            println!("deleted {}", id);
        }
    }
    Ok(())
}

async fn boxes(cmd: BoxCommand, stores: &Stores) -> Result<()> {
    let store = &stores.boxes;
    match cmd {
        BoxCommand::List { page, size } => {
            let items = store.fetch_page(PageRequest::new(page, size)).await?;
            for item in items {
                let programmer = item
                    .programmer
                    .as_ref()
                    .map(|p| p.formatted_name())
                    .unwrap_or_else(|| "-".to_string());
                println!(
                    "{:>6}  {}  [{}]  схема: {}, сборка: {}, программа: {}, тест: {}",
                    item.serial_num,
                    item.name,
                    item.order_id,
                    item.scheme_developer.formatted_name(),
                    item.assembler.formatted_name(),
                    programmer,
                    item.tester.formatted_name(),
                );
            }
            if let Some(meta) = store.pagination() {
                println!("page {} of {} ({} total)", meta.page, meta.pages, meta.total);
            }
        }
        BoxCommand::Add(args) => {
            store.create(args.into()).await?;
            println!("created");
        }
        BoxCommand::Update { serial_num, item } => {
            store.update(&serial_num, item.into()).await?;
            println!("updated {}", serial_num);
        }
    }
    Ok(())
}

async fn orders(cmd: OrderCommand, stores: &Stores) -> Result<()> {
    match cmd {
        OrderCommand::List {
            status,
            serial,
            customer,
            priority,
            page,
            limit,
        } => {
            let query = OrderQuery {
                status_id: status,
                search_serial: serial,
                search_customer: customer,
                search_priority: priority,
                ..OrderQuery::page(page, limit)
            };
            let store = &stores.orders;
            for order in store.fetch_orders(query).await? {
                println!(
                    "{}  {}  {}  [{}]",
                    order.serial,
                    order.name,
                    order.customer,
                    order.status_label()
                );
            }
            println!(
                "page {} of {} ({} total)",
                store.current_page() + 1,
                store.total_pages(),
                store.total_orders()
            );
        }
        OrderCommand::Serials { status } => {
            for serial in stores.orders.fetch_order_serials(status).await? {
                println!("{}", serial.serial);
            }
        }
        OrderCommand::Show { serial } => {
            let detail = stores.order_detail.fetch_detail(&serial).await?;
            let order = &detail.order;
            println!("{}  {}", order.serial, order.name);
            println!("customer: {}", order.customer);
            println!("status:   {}", order.status_label());
            if let Some(deadline) = order.deadline_moment {
                println!("deadline: {}", deadline.format("%d.%m.%Y"));
            }
            println!(
                "works: {}, tasks: {}, comments: {}, timings: {}",
                detail.works.len(),
                detail.tasks.len(),
                detail.comments.len(),
                detail.timings.len()
            );
        }
    }
    Ok(())
}

async fn whoami(stores: &Stores) -> Result<()> {
    if !stores.auth.is_authenticated() && !stores.auth.check_auth().await {
        println!("not authenticated");
        return Ok(());
    }
    let user = stores.auth.user();
    println!("{}", stores.auth.username());
    if let Some(email) = user.and_then(|u| u.email) {
        println!("{}", email);
    }
    Ok(())
}
