//! `snapsolve` — command-line driver for the SnapSolve equation service.
//!
//! Reads `config.toml` (or the path specified with `--config`), opens the
//! SQLite account store, and exposes the account and solve flows as
//! subcommands. The solve flow runs the full pipeline with the reference
//! engines: the "image" is a UTF-8 text file standing in for a photographed
//! equation.

use std::{
  io::{self, BufRead as _, Write as _},
  path::PathBuf,
};

use anyhow::{Context as _, bail};
use chrono::Utc;
use clap::{Parser, Subcommand};
use serde::Deserialize;
use snapsolve_core::{
  account::{Account, CheckoutEvent, EmailAddress, SubscriptionPlan},
  credential,
  engine::ImagePayload,
  entitlement,
  store::{AccountStore, FreeUseOutcome},
};
use snapsolve_engines::{ElementarySolver, PlainTextRecognizer};
use snapsolve_pipeline::{
  EventSink, PipelineEvent, SolvePipeline, UsageIntent, cancel_pair,
};
use snapsolve_store_sqlite::SqliteStore;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "snapsolve", about = "Photograph-to-solution equation solver")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand)]
enum Command {
  /// Register a new account; the secret is read from stdin.
  Register { email: EmailAddress, name: String },

  /// Subscribe an account through the (simulated) checkout.
  Subscribe {
    email: EmailAddress,
    /// `monthly` or `annual`.
    plan:  SubscriptionPlan,
    /// Simulate the user abandoning the checkout.
    #[arg(long)]
    abort: bool,
  },

  /// Show an account's plan and remaining free uses.
  Status { email: EmailAddress },

  /// Recognize and solve the equation in an image file.
  Solve { email: EmailAddress, image: PathBuf },
}

// ─── Configuration ───────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct AppConfig {
  store_path: PathBuf,
}

fn load_config(path: PathBuf) -> anyhow::Result<AppConfig> {
  let settings = config::Config::builder()
    .set_default("store_path", "snapsolve.db")
    .context("setting config defaults")?
    .add_source(config::File::from(path).required(false))
    .add_source(config::Environment::with_prefix("SNAPSOLVE"))
    .build()
    .context("failed to read config file")?;

  settings
    .try_deserialize()
    .context("failed to deserialise AppConfig")
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .with_writer(io::stderr)
    .init();

  let cli = Cli::parse();
  let config = load_config(cli.config)?;

  let store = SqliteStore::open(&config.store_path)
    .await
    .with_context(|| {
      format!("failed to open store at {:?}", config.store_path)
    })?;

  match cli.command {
    Command::Register { email, name } => register(&store, email, name).await,
    Command::Subscribe { email, plan, abort } => {
      subscribe(&store, email, plan, abort).await
    }
    Command::Status { email } => status(&store, email).await,
    Command::Solve { email, image } => solve(&store, email, image).await,
  }
}

// ─── Subcommands ─────────────────────────────────────────────────────────────

async fn register(
  store: &SqliteStore,
  email: EmailAddress,
  name: String,
) -> anyhow::Result<()> {
  if store.find_by_email(&email).await?.is_some() {
    bail!("an account already exists for {email}");
  }

  let secret = read_secret()?;
  let account =
    Account::new(email.clone(), name, credential::digest_secret(&secret))?;
  store.upsert(&account).await?;

  println!("registered {email}");
  Ok(())
}

async fn subscribe(
  store: &SqliteStore,
  email: EmailAddress,
  plan: SubscriptionPlan,
  abort: bool,
) -> anyhow::Result<()> {
  let Some(mut account) = store.find_by_email(&email).await? else {
    bail!("no account registered for {email}");
  };

  // Stand-in for the external checkout widget: it reports exactly one
  // terminal event.
  let event = if abort {
    CheckoutEvent::Cancelled
  } else {
    CheckoutEvent::Completed {
      reference: format!("chk_{}", Uuid::new_v4().simple()),
    }
  };

  match event {
    CheckoutEvent::Completed { reference } => {
      account.activate_subscription(plan, reference, Utc::now())?;
      store.upsert(&account).await?;
      println!("{email} is now on the {plan:?} plan");
    }
    CheckoutEvent::Cancelled => {
      println!("checkout cancelled; subscription unchanged");
    }
  }
  Ok(())
}

async fn status(store: &SqliteStore, email: EmailAddress) -> anyhow::Result<()> {
  let Some(account) = store.find_by_email(&email).await? else {
    bail!("no account registered for {email}");
  };
  let now = Utc::now();

  println!("account:        {}", account.email);
  println!("name:           {}", account.name);
  println!("plan:           {:?}", account.plan);
  match entitlement::subscription_expiry(&account) {
    Some(expiry) if entitlement::is_subscribed(&account, now) => {
      println!("subscribed until {expiry}");
    }
    Some(expiry) => println!("subscription expired at {expiry}"),
    None => {
      println!(
        "free uses left: {} of {}",
        entitlement::free_uses_remaining(&account),
        entitlement::FREE_TRIAL_LIMIT,
      );
    }
  }
  println!(
    "can solve now:  {}",
    if entitlement::can_solve(&account, now) { "yes" } else { "no" },
  );
  Ok(())
}

async fn solve(
  store: &SqliteStore,
  email: EmailAddress,
  image_path: PathBuf,
) -> anyhow::Result<()> {
  let Some(account) = store.find_by_email(&email).await? else {
    bail!("no account registered for {email}");
  };
  let now = Utc::now();

  // Entitlement gate — a denial is not an error, it is a redirect to the
  // subscription flow.
  if !entitlement::can_solve(&account, now) {
    eprintln!(
      "Free trial exhausted. Run `snapsolve subscribe {email} monthly` to keep solving.",
    );
    std::process::exit(2);
  }

  let bytes = std::fs::read(&image_path)
    .with_context(|| format!("failed to read image {image_path:?}"))?;
  let image = ImagePayload::from(bytes);

  let (events, mut rx) = EventSink::channel();
  let (cancel_handle, mut cancel) = cancel_pair();

  // Ctrl-C cancels the run cooperatively; the engine is still released.
  tokio::spawn(async move {
    if tokio::signal::ctrl_c().await.is_ok() {
      cancel_handle.cancel();
    }
  });

  let printer = tokio::spawn(async move {
    while let Some(event) = rx.recv().await {
      match event {
        PipelineEvent::Phase(phase) => eprintln!("{phase}…"),
        PipelineEvent::Recognizing(fraction) => {
          eprintln!("  {:.0}%", f64::from(fraction) * 100.0);
        }
      }
    }
  });

  let pipeline = SolvePipeline::new(PlainTextRecognizer, ElementarySolver);
  let result = pipeline.run(&image, &account, now, &events, &mut cancel).await;

  // Close the event stream so the printer drains and stops.
  drop(events);
  printer.await.ok();

  let report = match result {
    Ok(report) => report,
    Err(error) if error.is_cancelled() => {
      eprintln!("cancelled");
      std::process::exit(130);
    }
    Err(error) => {
      eprintln!("solve failed: {error}");
      std::process::exit(1);
    }
  };

  println!("equation: {}", report.outcome.recognized_line);
  println!("solution: {}", report.outcome.solution_text);

  match report.usage {
    UsageIntent::NoCharge => {}
    UsageIntent::ConsumeFreeUse => {
      match store.consume_free_use(&email, now).await? {
        FreeUseOutcome::Consumed { remaining } => {
          eprintln!("{remaining} free solve(s) remaining");
        }
        // The account was subscribed by the time the counter settled.
        FreeUseOutcome::Subscribed => {}
        FreeUseOutcome::Exhausted => {
          eprintln!(
            "free trial exhausted — subscribe with `snapsolve subscribe {email} monthly`",
          );
        }
      }
    }
  }
  Ok(())
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

/// Read the account secret from stdin.
fn read_secret() -> anyhow::Result<String> {
  let stdin = io::stdin();
  print!("Secret: ");
  io::stdout().flush().ok();
  let mut line = String::new();
  stdin.lock().read_line(&mut line)?;
  let secret = line.trim_end_matches(['\n', '\r']).to_string();
  if secret.is_empty() {
    bail!("secret must not be empty");
  }
  Ok(secret)
}
