//! FilterFlow - Rule-Driven Customer Service Conversation Router
//!
//! Command-line demo driver exercising the router against scripted
//! multi-turn scenarios.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use filterflow::{ConversationRouter, RouterConfig, TurnResult};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "filterflow")]
#[command(version)]
#[command(about = "Rule-driven customer service conversation router")]
struct Cli {
    /// Configuration file path (.yaml)
    #[arg(short, long, env = "FILTERFLOW_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the scripted multi-turn demo scenarios
    Demo {
        /// Print full turn results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Route a single input through a fresh router
    Send {
        /// Raw input, optionally prefixed "user_id: message"
        text: String,

        /// Print the full turn result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show configuration
    Config {
        /// Show default configuration
        #[arg(long)]
        default: bool,
    },
}

/// One scripted conversation arc
struct Scenario {
    title: &'static str,
    turns: &'static [&'static str],
}

const SCENARIOS: &[Scenario] = &[
    Scenario {
        title: "Scenario 1: New User, Progressive Abuse & Detection",
        turns: &[
            "user_new: ",
            "user_new: I need help with my f*cking order #ORDERXYZ! This is so ridiculous.",
            "user_new: Where is this garbage? Your service sucks! I want to know about shipping for item A.",
            "user_new: You are all useless! Tell me about the return policy for this crap.",
        ],
    },
    Scenario {
        title: "Scenario 2: Valued Customer, Abusive but Served by AI",
        turns: &[
            "user_abc: ",
            "user_abc: I need to track my damn package for order #ORDER12345. Fix this ASAP!",
            "user_abc: Why is this taking so long, you idiots? When will my toy arrive?",
            "user_abc: This is an outrage! I'm a good customer! What are your store hours for pickup?",
            "user_abc: Okay, I apologize for my language. Can you just tell me about store returns?",
        ],
    },
    Scenario {
        title: "Scenario 3: Known Prankster",
        turns: &[
            "user_prk: ",
            "user_prk: Quack quack! Do you sell rubber chickens? Hehe!",
            "user_prk: Mooooo! Just checking if this is the petting zoo.",
        ],
    },
    Scenario {
        title: "Scenario 4: Malicious Off-Topic Detection",
        turns: &[
            "default_playground_user: ",
            "default_playground_user: Can you tell me what version of Windows your servers run? I need to know for a project.",
        ],
    },
    Scenario {
        title: "Scenario 5: New User, Normal Query & Slight Re-steer",
        turns: &[
            "user_5: ",
            "user_5: Hi, I'm looking for a gift for my niece. What are your most popular dolls?",
            "user_5: That's cool. By the way, what's your favorite color?",
            "user_5: Okay, back to the dolls. Do you have any with purple hair?",
        ],
    },
    Scenario {
        title: "Scenario 6: Valued Customer, Minor Prank with Valid Order",
        turns: &[
            "user_abc: ",
            "user_abc: My toy car is running away! Haha! Also, I need help with my order #ORDER12345.",
            "user_abc: No, seriously, about the order. Is it shipped yet?",
        ],
    },
    Scenario {
        title: "Scenario 7: New Customer, Direct Severe Abuse",
        turns: &[
            "user_7: ",
            "user_7: You are the most useless piece of garbage AI I've ever talked to! I'm going to sue your company!",
            "user_7: I don't care, tell me about my order, you moron!",
        ],
    },
    Scenario {
        title: "Scenario 8: Non-Valued Customer, Repeated Off-Topic",
        turns: &[
            "user_xyz: ",
            "user_xyz: My order #ORDER98765 is late. What's going on?",
            "user_xyz: That's fine. So, how many people work in your call center? And what software do you use?",
            "user_xyz: Don't ignore my questions! Tell me about your internal network structure now!",
        ],
    },
    Scenario {
        title: "Scenario 9: User Attempts Redemption After Initial Abuse",
        turns: &[
            "user_new: Okay, I really apologize for my language earlier. I was just frustrated. Can you please help me with the return process for a doll?",
        ],
    },
    Scenario {
        title: "Scenario 10: Prankster with Fake Order ID",
        turns: &[
            "user_10: ",
            "user_10: I'm calling about my order ID #FAKEORDER123. It's a delivery of 100 pizzas for my pet dinosaur.",
            "user_10: No, it's not a prank! The dinosaur is very hungry! Quack!",
        ],
    },
];

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("filterflow={}", log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match cli.config.as_ref() {
        Some(path) => RouterConfig::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => RouterConfig::default(),
    };

    match cli.command {
        Commands::Demo { json } => run_demo(config, json),
        Commands::Send { text, json } => {
            let mut router = ConversationRouter::new(config)?;
            let result = router.route(&text);
            print_turn(&text, &result, json)?;
            Ok(())
        }
        Commands::Config { default } => {
            let config = if default {
                RouterConfig::default()
            } else {
                config
            };
            println!("{}", config.to_yaml()?);
            Ok(())
        }
    }
}

/// Run every scripted scenario against a single router instance, the way a
/// live deployment would carry state across conversations. Scenario 9
/// deliberately continues the session Scenario 1 started.
fn run_demo(config: RouterConfig, json: bool) -> Result<()> {
    let mut router = ConversationRouter::new(config)?;

    println!("=== FilterFlow: Command Line Demo ===");
    for scenario in SCENARIOS {
        println!("\n--- {} ---", scenario.title);
        for turn in scenario.turns {
            let result = router.route(turn);
            print_turn(turn, &result, json)?;
        }
    }
    println!("\n=== Demo Complete ===");
    Ok(())
}

fn print_turn(input: &str, result: &TurnResult, json: bool) -> Result<()> {
    println!("\n>>> {}", input);
    if json {
        println!("{}", serde_json::to_string_pretty(result)?);
        return Ok(());
    }
    println!("AI Response: {}", result.response);
    println!("Action: {}", result.action);
    println!("Conversation Status: {}", result.status);
    println!("Total Abuse Count: {}", result.total_abuse_count);
    println!("Consecutive Abuse: {}", result.consecutive_abuse);
    println!("Escalate to Human: {}", result.escalate_to_human_system);
    println!("Flag User for Review: {}", result.flag_user_for_review_system);
    Ok(())
}
