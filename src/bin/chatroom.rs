//! Interactive terminal client for the AI Room chat server.
//!
//! # Usage
//!
//! ```bash
//! # Talk to a server on localhost:5000
//! chatroom
//!
//! # Another server, starting with Gemini
//! chatroom --base-url http://room.example.com --provider gemini
//!
//! # Disable colors (useful for piping output)
//! chatroom --no-color
//! ```
//!
//! # Commands
//!
//! While chatting, you can use slash commands:
//! - `/help` - Show available commands
//! - `/clear` - Clear the conversation
//! - `/upload <path>` - Upload a file
//! - `/provider <name>` - Switch provider
//! - `/quit` - Exit the application

use std::path::Path;
use std::sync::Arc;

use arrrg::CommandLine;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing_subscriber::EnvFilter;

use chatroom::chat::{
    ChatArgs, ChatCommand, ChatConfig, ChatController, TerminalView, help_text, parse_command,
};
use chatroom::{Notification, Provider};

/// Main entry point for the chatroom application.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let (args, _) = ChatArgs::from_command_line_relaxed("chatroom [OPTIONS]");
    let config = ChatConfig::from(args);
    let view = Arc::new(TerminalView::with_color(config.use_color));
    let controller = ChatController::from_config(&config, view)?;
    let mut rl = DefaultEditor::new()?;

    println!(
        "AI Room ({}, provider: {})",
        controller.client().base_url(),
        controller.provider().label()
    );
    println!("Type /help for commands, /quit to exit\n");
    controller.show_welcome();
    controller.check_provider_availability().await;

    loop {
        let readline = rl.readline("You: ");

        match readline {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                let _ = rl.add_history_entry(line);

                if let Some(cmd) = parse_command(line) {
                    match cmd {
                        ChatCommand::Quit => {
                            println!("Goodbye!");
                            break;
                        }
                        ChatCommand::Clear => {
                            controller.clear_conversation().await;
                        }
                        ChatCommand::Upload(path) => {
                            controller.handle_file_upload(Some(Path::new(&path))).await;
                        }
                        ChatCommand::Provider(name) => match name.parse::<Provider>() {
                            Ok(provider) => {
                                controller.select_provider(provider);
                            }
                            Err(err) => controller.notify(Notification::error(err.to_string())),
                        },
                        ChatCommand::Providers => {
                            print_providers(&controller);
                        }
                        ChatCommand::Status => {
                            if !controller.check_provider_availability().await {
                                controller.notify(Notification::error(
                                    "Could not reach the server for a status check",
                                ));
                            }
                        }
                        ChatCommand::Health => {
                            controller.report_health().await;
                        }
                        ChatCommand::Copy(which) => {
                            let index = match which {
                                Some(n) => Some(n - 1),
                                None => controller.last_reply_index(),
                            };
                            match index {
                                Some(index) => {
                                    controller.copy_message(index);
                                }
                                None => controller.notify(Notification::error("Nothing to copy")),
                            }
                        }
                        ChatCommand::Help => {
                            for line in help_text().lines() {
                                println!("    {}", line);
                            }
                        }
                        ChatCommand::Invalid(message) => {
                            controller.notify(Notification::error(message));
                        }
                    }
                    continue;
                }

                controller.send_message(line).await;
            }
            Err(ReadlineError::Interrupted) => {
                // Ctrl+C at prompt discards the line
                println!();
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!("\nGoodbye!");
                break;
            }
            Err(err) => {
                eprintln!("Input error: {}", err);
                break;
            }
        }
    }

    Ok(())
}

fn print_providers(controller: &ChatController<TerminalView>) {
    let current = controller.provider();
    println!("    Providers:");
    for option in controller.provider_options() {
        let marker = if option.provider == current { "*" } else { " " };
        println!("     {marker} {:<10} {}", option.provider.id(), option.label());
    }
}
