//! ARGPS CLI
//!
//! Command-line front end for the ARGPS wellness app:
//! - Show the welcome card and today's home content
//! - Browse the booking calendar and request a consultation
//! - View and edit the admin profile

use anyhow::Context;
use argps::app::{BUSINESS_NAME, CONSULTANT_NAME, CONSULTANT_TITLE};
use argps::booking::{BookingForm, CalendarPicker, DayCell, TimeSlot};
use argps::config::{generate_default_config, Config, LoggingConfig};
use argps::profile::{EngageOutcome, Gesture, ProfileRecord};
use argps::{Notifier, Session};
use chrono::{Local, NaiveDateTime};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "argps")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "ARGPS Nutritious Lifestyle wellness app")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: search standard locations)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the welcome card
    Welcome,

    /// Show today's wellness tip, health bite and spotlight
    Home {
        /// Local time to select for (YYYY-MM-DDTHH:MM[:SS], default: now)
        #[arg(long)]
        at: Option<String>,
    },

    /// Show the booking calendar
    Calendar {
        /// Month to show (YYYY-MM, default: current month)
        #[arg(short, long)]
        month: Option<String>,
        /// Day to select
        #[arg(short, long)]
        select: Option<u32>,
    },

    /// List the available time slots
    Slots,

    /// Request a consultation
    Book {
        /// Full name
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        /// 10-digit phone number (non-digits are dropped)
        #[arg(long)]
        phone: String,
        /// Preferred date as "DD / MM / YYYY"
        #[arg(long, conflicts_with = "day")]
        date: Option<String>,
        /// Day of the calendar month instead of --date
        #[arg(long)]
        day: Option<u32>,
        /// Month for --day (YYYY-MM, default: current month)
        #[arg(long, requires = "day")]
        month: Option<String>,
        /// Time slot: 1-4 or its label
        #[arg(long)]
        slot: TimeSlot,
        /// Validate and print the request without sending it
        #[arg(long)]
        dry_run: bool,
    },

    /// View or edit the admin profile
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum ProfileAction {
    /// Show the current profile
    Show,

    /// Unlock the editor and apply changes
    Edit {
        /// Admin access password
        #[arg(long)]
        password: String,
        /// Hold the avatar for this many seconds instead of tapping it
        #[arg(long)]
        hold_secs: Option<u64>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        /// Image file for the new profile photo
        #[arg(long)]
        avatar: Option<PathBuf>,
        #[arg(long)]
        new_password: Option<String>,
        /// Discard the edits instead of saving
        #[arg(long)]
        cancel: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default()?,
    };
    init_logging(&config.logging);

    match cli.command {
        Commands::Welcome => {
            println!("{}", BUSINESS_NAME);
            println!();
            println!("  {}", CONSULTANT_NAME);
            println!("  {}", CONSULTANT_TITLE);
            println!();
            println!("Run `argps home` to get started.");
        }

        Commands::Home { at } => {
            let now = match at.as_deref() {
                None => Local::now().naive_local(),
                Some(s) => match parse_local_time(s) {
                    Some(t) => t,
                    None => {
                        eprintln!("Invalid time: {} (expected YYYY-MM-DDTHH:MM[:SS])", s);
                        std::process::exit(1);
                    }
                },
            };

            let options = config.session_options(None);
            let content = options.selector.select(&options.catalog, now);

            println!("Welcome to {}", BUSINESS_NAME);
            println!("{}", content.day.format("%A, %d %B %Y"));
            println!();
            println!("Daily Wellness Tip");
            println!("  {}", content.tip.text);
            println!();
            println!("Health Bite");
            println!("  {}", content.fact.fact);
            println!();
            println!("Nutrition Spotlight: {}", content.spotlight.name);
            for benefit in content.spotlight.benefits {
                println!("  - {}", benefit);
            }
        }

        Commands::Calendar { month, select } => {
            let mut calendar = picker_for(month.as_deref())?;
            print_calendar(&calendar);

            if let Some(day) = select {
                match calendar.select_day(day) {
                    Ok(date) => {
                        println!();
                        println!("Selected: {}", date);
                    }
                    Err(e) => {
                        eprintln!("{}", e);
                        std::process::exit(1);
                    }
                }
            }
        }

        Commands::Slots => {
            for (i, slot) in TimeSlot::ALL.iter().enumerate() {
                println!("  {}. {}", i + 1, slot);
            }
        }

        Commands::Book {
            name,
            email,
            phone,
            date,
            day,
            month,
            slot,
            dry_run,
        } => {
            let mut form = BookingForm::with_calendar(picker_for(month.as_deref())?);
            form.set_full_name(name);
            form.set_email(email);
            form.update_phone(&phone);
            form.select_time_slot(slot);
            if let Some(date) = date {
                form.set_date(date);
            }
            if let Some(day) = day {
                if let Err(e) = form.select_date(day) {
                    eprintln!("{}", e);
                    std::process::exit(1);
                }
            }

            if dry_run {
                match form.begin_submit() {
                    Ok(request) => {
                        println!("{}", request.message());
                        println!();
                        println!("(Dry run - nothing was sent)");
                    }
                    Err(e) => {
                        eprintln!("{}", e.user_message());
                        std::process::exit(1);
                    }
                }
                return Ok(());
            }

            let notifier = config.notifier().context("EmailJS is not configured")?;
            tracing::info!(notifier = notifier.name(), "Sending booking request");

            match form.submit(&notifier).await {
                Ok(()) => {
                    println!("Booking Request Sent!");
                    println!("{} will contact you soon to confirm.", CONSULTANT_NAME);
                }
                Err(e) => {
                    eprintln!("{}", e.user_message());
                    std::process::exit(1);
                }
            }
        }

        Commands::Profile { action } => {
            let store = config.profile_store()?;
            let mut session =
                Session::start_without_notifier(store, config.session_options(None)).await;

            match action {
                ProfileAction::Show => {
                    print_profile(session.displayed_profile());
                    println!();
                    println!("{}", session.editor().policy().hint());
                }

                ProfileAction::Edit {
                    password,
                    hold_secs,
                    email,
                    phone,
                    avatar,
                    new_password,
                    cancel,
                } => {
                    let gesture = match hold_secs {
                        Some(secs) => Gesture::Press(Duration::from_secs(secs)),
                        None => Gesture::Tap,
                    };
                    if session.engage_avatar(gesture) != EngageOutcome::PromptOpened {
                        eprintln!("{}", session.editor().policy().hint());
                        std::process::exit(1);
                    }

                    if let Err(e) = session.unlock_profile(&password) {
                        eprintln!("{}", e);
                        std::process::exit(1);
                    }

                    let editor = session.editor_mut();
                    if let Some(email) = email {
                        editor.set_email(email)?;
                    }
                    if let Some(phone) = phone {
                        editor.set_phone(phone)?;
                    }
                    if let Some(password) = new_password {
                        editor.set_password(password)?;
                    }
                    if let Some(path) = avatar {
                        session
                            .replace_avatar(&path)
                            .await
                            .with_context(|| format!("Could not use image {:?}", path))?;
                    }

                    if cancel {
                        session.cancel_edit()?;
                        println!("Changes discarded");
                        print_profile(session.displayed_profile());
                        return Ok(());
                    }

                    match session.save_profile().await {
                        Ok(()) => {
                            println!("Profile updated");
                            print_profile(session.displayed_profile());
                        }
                        Err(e) => {
                            eprintln!("{}", e);
                            std::process::exit(1);
                        }
                    }
                }
            }
        }

        Commands::Config { output } => {
            let config = generate_default_config();

            match output {
                Some(path) => {
                    if let Some(parent) = path.parent() {
                        std::fs::create_dir_all(parent)?;
                    }
                    std::fs::write(&path, &config)?;
                    println!("Config written to {:?}", path);
                }
                None => {
                    print!("{}", config);
                }
            }
        }
    }

    Ok(())
}

fn init_logging(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("argps={}", logging.level)));

    let registry = tracing_subscriber::registry().with(filter);
    if logging.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn parse_local_time(s: &str) -> Option<NaiveDateTime> {
    ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
}

fn picker_for(month: Option<&str>) -> anyhow::Result<CalendarPicker> {
    match month {
        Some(m) => CalendarPicker::parse_month(m).with_context(|| format!("Invalid month: {}", m)),
        None => Ok(CalendarPicker::today()),
    }
}

fn print_calendar(calendar: &CalendarPicker) {
    println!("{:^20}", calendar.title());
    println!("Su Mo Tu We Th Fr Sa");

    let cells: Vec<String> = calendar
        .days_grid()
        .map(|cell| match cell {
            DayCell::Blank => "  ".to_string(),
            DayCell::Day(day) => format!("{:>2}", day),
        })
        .collect();
    for week in cells.chunks(7) {
        println!("{}", week.join(" "));
    }
}

fn print_profile(profile: &ProfileRecord) {
    println!("{}", CONSULTANT_NAME);
    println!("{}", CONSULTANT_TITLE);
    println!();
    println!("  Email:    {}", profile.email);
    println!(
        "  Phone:    {}",
        if profile.phone.is_empty() { "-" } else { profile.phone.as_str() }
    );
    if profile.has_inline_avatar() {
        println!("  Photo:    (uploaded image)");
    } else {
        println!("  Photo:    {}", profile.avatar_image);
    }
    println!("  Password: {}", "*".repeat(8));
}
