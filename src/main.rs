//! Terminal front-end for the reserve guide.
//!
//! Reads commands line by line, applies them to an `App`, and redraws. Guide
//! questions run on a worker thread; their replies come back through the same
//! channel as stdin lines so the loop never blocks on the network.

use std::io::{self, BufRead};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::sync::mpsc::{self, Sender};
use std::thread;

use chrono::NaiveDate;
use clap::Parser;

use reserve_guide::app::{App, PendingAsk};
use reserve_guide::booking::BookingActivity;
use reserve_guide::catalog::Catalog;
use reserve_guide::config::{AppConfig, DEFAULT_CONFIG_PATH};
use reserve_guide::detail::DetailTab;
use reserve_guide::dev_mode::DevGuide;
use reserve_guide::filter::{RegionSelector, TypeSelector};
use reserve_guide::guide::gemini::GeminiClient;
use reserve_guide::guide::{GuideBackend, GuideReply};
use reserve_guide::logging::{self, Component};
use reserve_guide::model::ReserveType;
use reserve_guide::render;
use reserve_guide::verify;

#[derive(Parser, Debug)]
#[command(name = "reserve_guide", version, about = "Saudi reserves showcase with an AI guide")]
struct Args {
    /// Configuration file; missing is fine
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Answer guide questions from a local script instead of Gemini
    #[arg(long)]
    dev: bool,

    /// Check the catalog and exit
    #[arg(long)]
    verify: bool,

    /// With --verify: also send one question to the guide endpoint
    #[arg(long, requires = "verify")]
    probe: bool,

    /// With --verify: print the report as JSON
    #[arg(long, requires = "verify")]
    json: bool,
}

enum Event {
    Line(String),
    Reply { generation: u64, reply: GuideReply },
    Eof,
}

enum Outcome {
    Redraw,
    Message(String),
    Ask(PendingAsk),
    Quit,
}

const HELP: &str = "\
commands:
  start                      leave the hero screen
  type all|natural|royal     filter by reserve type
  region all|<name>          filter by region
  open <id>                  open a reserve shown on the map
  back                       return to the map
  tab info|eco|activities|gallery
  tour | tour close          open or close the virtual tour (gallery tab)
  drag <from_x> <to_x>       pan the tour
  chat                       open or close the guide panel
  ask <question>             ask the guide
  book | cancel              open or close the booking form
  name <full name>           booking: full name
  date <YYYY-MM-DD>          booking: visit date
  activity 1|2|3             booking: activity
  submit                     booking: send
  help | quit";

fn main() -> ExitCode {
    dotenv::dotenv().ok();
    let args = Args::parse();

    let config = match AppConfig::load(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    // Already validated by AppConfig::load
    let min_level = config.logging.min_level().unwrap_or(logging::LogLevel::Info);
    logging::init_logger(min_level, config.logging.file.as_deref(), config.logging.console_timestamps);

    let catalog = match Catalog::load_or_builtin(config.catalog_path.as_deref()) {
        Ok(catalog) => catalog,
        Err(e) => {
            logging::error(Component::Catalog, None, &format!("Failed to load catalog: {}", e));
            eprintln!("❌ Failed to load catalog: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let backend: Arc<dyn GuideBackend> = if args.dev {
        logging::info(Component::System, None, "Development mode: guide replies are scripted");
        Arc::new(DevGuide::new())
    } else {
        if config.guide.api_key.is_none() {
            logging::warn(Component::System, None, "No GEMINI_API_KEY set; guide questions will fail");
        }
        match GeminiClient::new(config.guide.clone()) {
            Ok(client) => Arc::new(client),
            Err(e) => {
                eprintln!("❌ Failed to build HTTP client: {}", e);
                return ExitCode::FAILURE;
            }
        }
    };

    if args.verify {
        return run_verify(&catalog, backend.as_ref(), args.probe, args.json);
    }

    run_interactive(App::new(catalog), backend);
    ExitCode::SUCCESS
}

fn run_verify(catalog: &Catalog, backend: &dyn GuideBackend, probe: bool, json: bool) -> ExitCode {
    let report = verify::run_verification(catalog, probe.then_some(backend));

    if json {
        match serde_json::to_string_pretty(&report) {
            Ok(text) => println!("{}", text),
            Err(e) => {
                eprintln!("❌ Failed to serialize report: {}", e);
                return ExitCode::FAILURE;
            }
        }
    } else {
        verify::print_summary(&report);
    }

    if report.has_failures() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

// ---------------------------------------------------------------------------
// Interactive loop
// ---------------------------------------------------------------------------

fn run_interactive(mut app: App, backend: Arc<dyn GuideBackend>) {
    let (tx, rx) = mpsc::channel();
    spawn_stdin_reader(tx.clone());

    println!("{}\n", render::render(&app));
    println!("(help for commands)");

    while let Ok(event) = rx.recv() {
        match event {
            Event::Line(line) => match handle_command(&mut app, line.trim()) {
                Outcome::Redraw => println!("\n{}", render::render(&app)),
                Outcome::Message(text) => println!("{}", text),
                Outcome::Ask(pending) => {
                    spawn_ask(Arc::clone(&backend), pending, tx.clone());
                    println!("\n{}", render::render(&app));
                }
                Outcome::Quit => break,
            },
            Event::Reply { generation, reply } => {
                if app.deliver_reply(generation, reply) {
                    println!("\n{}", render::render(&app));
                }
            }
            Event::Eof => break,
        }
    }

    logging::info(Component::System, None, "Session ended");
}

fn spawn_stdin_reader(tx: Sender<Event>) {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(Event::Line(line)).is_err() {
                return;
            }
        }
        let _ = tx.send(Event::Eof);
    });
}

fn spawn_ask(backend: Arc<dyn GuideBackend>, pending: PendingAsk, tx: Sender<Event>) {
    thread::spawn(move || {
        let reply = GuideReply::from(backend.generate(&pending.request));
        // The loop may have exited already.
        let _ = tx.send(Event::Reply {
            generation: pending.generation,
            reply,
        });
    });
}

fn rejected(what: &str) -> Outcome {
    Outcome::Message(format!("⚠ {}", what))
}

fn handle_command(app: &mut App, line: &str) -> Outcome {
    let (command, rest) = line.split_once(' ').unwrap_or((line, ""));
    let rest = rest.trim();

    match command {
        "" => Outcome::Message(String::new()),
        "help" => Outcome::Message(HELP.to_string()),
        "quit" | "exit" => Outcome::Quit,

        "start" if app.start() => Outcome::Redraw,
        "start" => rejected("already started"),

        "type" => {
            let selector = match rest {
                "all" => TypeSelector::All,
                "natural" => TypeSelector::Only(ReserveType::Natural),
                "royal" => TypeSelector::Only(ReserveType::Royal),
                _ => return rejected("type must be all, natural or royal"),
            };
            app.set_type_filter(selector);
            Outcome::Redraw
        }
        "region" => {
            let selector = match rest {
                "" | "all" => RegionSelector::All,
                name => RegionSelector::Named(name.to_string()),
            };
            app.set_region_filter(selector);
            Outcome::Redraw
        }
        "open" if app.select_reserve(rest) => Outcome::Redraw,
        "open" => rejected("no such reserve on the map"),
        "back" if app.back_to_map() => Outcome::Redraw,
        "back" => rejected("not on a reserve page"),

        "tab" => match DetailTab::from_key(rest) {
            Some(tab) => {
                app.detail_mut().set_tab(tab);
                Outcome::Redraw
            }
            None => rejected("unknown tab"),
        },
        "tour" if rest == "close" => {
            app.detail_mut().close_tour();
            Outcome::Redraw
        }
        "tour" if app.detail_mut().open_tour() => Outcome::Redraw,
        "tour" => rejected("the tour is on the gallery tab"),
        "drag" => {
            let points: Vec<i32> = rest.split_whitespace().filter_map(|p| p.parse().ok()).collect();
            let &[from, to] = points.as_slice() else {
                return rejected("usage: drag <from_x> <to_x>");
            };
            let tour = app.detail_mut().tour_mut();
            tour.begin_drag(from);
            tour.continue_drag(to);
            tour.end_drag();
            Outcome::Redraw
        }

        "chat" => {
            app.toggle_chat();
            Outcome::Redraw
        }
        "ask" => match app.send_chat(rest) {
            Some(pending) => Outcome::Ask(pending),
            None => rejected("nothing sent (panel closed, empty question, or a reply is pending)"),
        },

        "book" if app.open_booking() => Outcome::Redraw,
        "book" => rejected("open a reserve first"),
        "cancel" => {
            app.booking_mut().close();
            Outcome::Redraw
        }
        "name" => {
            app.booking_mut().form_mut().full_name = rest.to_string();
            Outcome::Redraw
        }
        "date" => match NaiveDate::parse_from_str(rest, "%Y-%m-%d") {
            Ok(date) => {
                app.booking_mut().form_mut().visit_date = Some(date);
                Outcome::Redraw
            }
            Err(_) => rejected("date must be YYYY-MM-DD"),
        },
        "activity" => {
            let picked = rest
                .parse::<usize>()
                .ok()
                .and_then(|n| n.checked_sub(1))
                .and_then(|i| BookingActivity::ALL.get(i).copied());
            match picked {
                Some(activity) => {
                    app.booking_mut().form_mut().activity = activity;
                    Outcome::Redraw
                }
                None => rejected("activity must be 1, 2 or 3"),
            }
        }
        "submit" => match app.submit_booking() {
            Ok(confirmation) => Outcome::Message(format!("✓ {}", confirmation.message)),
            Err(e) => rejected(&e.to_string()),
        },

        other => rejected(&format!("unknown command '{}' (try help)", other)),
    }
}
