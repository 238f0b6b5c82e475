use std::path::PathBuf;

use clap::{Arg, ArgAction, ArgMatches, Command};
use log::info;
use rpassword::read_password;

use smtp_mailer::admin::{summarize, AdminActions, Notice};
use smtp_mailer::email::{default_sender, ComposeRequest, LettreDelivery, Mailer};
use smtp_mailer::settings::{SettingsForm, SettingsStore, SmtpSettings};
use smtp_mailer::utils::io::{prompt_with_confirmation, sanitize_text_field};
use smtp_mailer::utils::logging::{format_sensitive, initialize_logging};
use smtp_mailer::{AppConfig, JsonFileStore, LogEntry, LogStore};

fn cli() -> Command {
    Command::new("smtp-mailer")
        .about("Configure an SMTP relay, send HTML email and inspect the send log")
        .arg(
            Arg::new("options-file")
                .long("options-file")
                .help("JSON file holding settings and logs")
                .value_name("PATH")
                .global(true)
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .subcommand_required(true)
        .subcommand(
            Command::new("settings")
                .about("Show or change the SMTP settings")
                .subcommand_required(true)
                .subcommand(Command::new("show").about("Print the current settings"))
                .subcommand(
                    Command::new("save")
                        .about("Save new settings; omitted values keep their current value")
                        .arg(Arg::new("host").long("host").help("SMTP server host"))
                        .arg(Arg::new("port").long("port").help("SMTP server port"))
                        .arg(
                            Arg::new("encryption")
                                .long("encryption")
                                .help("none, ssl or tls"),
                        )
                        .arg(Arg::new("username").long("username").help("SMTP username"))
                        .arg(Arg::new("password").long("password").help("SMTP password"))
                        .arg(
                            Arg::new("prompt-password")
                                .long("prompt-password")
                                .help("Read the SMTP password from the terminal")
                                .action(ArgAction::SetTrue)
                                .conflicts_with("password"),
                        )
                        .arg(Arg::new("from-email").long("from-email").help("Sender address"))
                        .arg(Arg::new("from-name").long("from-name").help("Sender name"))
                        .arg(
                            Arg::new("enable")
                                .long("enable")
                                .help("Route outgoing mail through the relay")
                                .action(ArgAction::SetTrue),
                        )
                        .arg(
                            Arg::new("disable")
                                .long("disable")
                                .help("Leave outgoing mail on the default transport")
                                .action(ArgAction::SetTrue)
                                .conflicts_with("enable"),
                        ),
                ),
        )
        .subcommand(
            Command::new("send")
                .about("Send an HTML email")
                .arg(Arg::new("to").long("to").required(true).help("Recipient"))
                .arg(Arg::new("subject").long("subject").required(true).help("Subject line"))
                .arg(Arg::new("body").long("body").required(true).help("Message body"))
                .arg(Arg::new("cc").long("cc").help("Comma-separated CC addresses"))
                .arg(Arg::new("bcc").long("bcc").help("Comma-separated BCC addresses")),
        )
        .subcommand(
            Command::new("logs")
                .about("Inspect or clear the send log")
                .subcommand_required(true)
                .subcommand(
                    Command::new("list").about("Show recent entries").arg(
                        Arg::new("limit")
                            .long("limit")
                            .help("Number of entries to show")
                            .value_parser(clap::value_parser!(usize)),
                    ),
                )
                .subcommand(
                    Command::new("clear").about("Delete all entries").arg(
                        Arg::new("yes")
                            .long("yes")
                            .help("Do not ask for confirmation")
                            .action(ArgAction::SetTrue),
                    ),
                ),
        )
        .subcommand(Command::new("status").about("Relay status and latest log entries"))
}

fn main() {
    let config = AppConfig::from_env();
    if let Err(e) = initialize_logging(config.log_file.as_deref()) {
        eprintln!("Failed to initialize logging: {}", e);
    }

    if let Err(e) = run(config, cli().get_matches()) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(mut config: AppConfig, matches: ArgMatches) -> Result<(), String> {
    if let Some(path) = matches.get_one::<PathBuf>("options-file") {
        config.options_file = path.clone();
    }
    info!("Using options file {}", config.options_file.display());

    let options = JsonFileStore::new(&config.options_file);
    let settings = SettingsStore::new(&options, &config.site_name);
    let logs = LogStore::new(&options);
    let sender = default_sender(&config.default_from, &config.site_name)
        .map_err(|e| format!("Invalid SMTP_MAILER_DEFAULT_FROM: {}", e))?;
    let mailer = Mailer::new(&settings, &logs, LettreDelivery::default(), sender);
    let admin = AdminActions::new(&settings, &logs, &mailer);

    match matches.subcommand() {
        Some(("settings", sub)) => match sub.subcommand() {
            Some(("show", _)) => {
                print_settings(&settings.get());
                Ok(())
            }
            Some(("save", args)) => {
                let form = settings_form(&settings.get(), args)?;
                report(admin.save_settings(&form))
            }
            _ => Ok(()),
        },
        Some(("send", args)) => {
            let text = |name: &str| args.get_one::<String>(name).cloned().unwrap_or_default();
            let request = ComposeRequest {
                to: text("to"),
                subject: text("subject"),
                body: text("body"),
                cc: text("cc"),
                bcc: text("bcc"),
            };
            report(admin.send_email(&request))
        }
        Some(("logs", sub)) => match sub.subcommand() {
            Some(("list", args)) => {
                let entries = match args.get_one::<usize>("limit") {
                    Some(limit) => logs.list(Some(*limit)),
                    None => admin.recent_logs(),
                };
                print_logs(&entries);
                Ok(())
            }
            Some(("clear", args)) => {
                if !args.get_flag("yes") {
                    let confirmed =
                        prompt_with_confirmation("This deletes every log entry.", "Continue?")
                            .map_err(|e| format!("Failed to read input: {}", e))?;
                    if !confirmed {
                        println!("Nothing cleared.");
                        return Ok(());
                    }
                }
                report(admin.clear_logs())
            }
            _ => Ok(()),
        },
        Some(("status", _)) => {
            println!("{}", summarize(&settings.get(), &logs));
            Ok(())
        }
        _ => Ok(()),
    }
}

/// Start from the current record, like a pre-filled form, and apply the flags
fn settings_form(current: &SmtpSettings, args: &ArgMatches) -> Result<SettingsForm, String> {
    let mut form = SettingsForm::from(current);
    let value = |name: &str| args.get_one::<String>(name).map(|v| sanitize_text_field(v));

    if let Some(host) = value("host") {
        form.host = host;
    }
    if let Some(port) = value("port") {
        form.port = port;
    }
    if let Some(encryption) = value("encryption") {
        form.encryption = encryption;
    }
    if let Some(username) = value("username") {
        form.username = username;
    }
    if let Some(from_email) = args.get_one::<String>("from-email") {
        form.from_email = from_email.clone();
    }
    if let Some(from_name) = value("from-name") {
        form.from_name = from_name;
    }

    if let Some(password) = args.get_one::<String>("password") {
        form.password = password.trim().to_string();
    } else if args.get_flag("prompt-password") {
        println!("Enter SMTP password:");
        let password = read_password().map_err(|e| format!("Failed to read password: {}", e))?;
        form.password = password.trim().to_string();
    }

    if args.get_flag("enable") {
        form.enabled = Some("1".to_string());
    } else if args.get_flag("disable") {
        form.enabled = None;
    }

    Ok(form)
}

fn report(notice: Notice) -> Result<(), String> {
    match notice {
        Notice::Success(msg) => {
            println!("{}", msg);
            Ok(())
        }
        Notice::Error(msg) => Err(msg),
    }
}

fn print_settings(settings: &SmtpSettings) {
    println!("Enabled:     {}", settings.enabled);
    println!("Host:        {}", settings.host);
    println!("Port:        {}", settings.port);
    println!("Encryption:  {}", settings.encryption);
    println!("Username:    {}", format_sensitive(&settings.username));
    println!(
        "Password:    {}",
        if settings.password.is_empty() { "[empty]" } else { "[set]" }
    );
    println!("From email:  {}", settings.from_email);
    println!("From name:   {}", settings.from_name);
}

fn print_logs(entries: &[LogEntry]) {
    if entries.is_empty() {
        println!("No logs yet.");
        return;
    }

    for entry in entries {
        println!("{}  {:<7}  {}", entry.time, entry.level.label(), entry.message);
        let context = entry.context_summary();
        if !context.is_empty() {
            println!("{:29}{}", "", context);
        }
    }
}
