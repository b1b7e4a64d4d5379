use std::{env, env::VarError};

/// There's no real CLI for the server, so just do quick 'n dirty
pub fn handle_command_line_args() -> bool {
    let has_cli_args = env::args().count() > 1;
    if has_cli_args {
        // Any argument at all gets the help text
        display_readme();
        display_envs();
    }
    has_cli_args
}

fn display_readme() {
    const README: &str = include_str!("./cli-help.txt");
    println!("\n{README}\n");
}

fn display_envs() {
    // TOPUP_TELEGRAM_BOT_TOKEN is deliberately absent
    const DISPLAY_ENVS: [&str; 9] = [
        "RUST_LOG",
        "TOPUP_HOST",
        "TOPUP_PORT",
        "TOPUP_DATA_DIR",
        "TOPUP_ADMIN_ID",
        "TOPUP_PUBLIC_BASE_URL",
        "TOPUP_RESET_CORRUPT_TABLES",
        "TOPUP_PAYMENT_QR_URL",
        "TOPUP_BOT_POLL_TIMEOUT",
    ];

    println!("Current environment values (EXCLUDING variables that contain secrets):");
    DISPLAY_ENVS.iter().for_each(|&name| {
        let val = match env::var(name) {
            Ok(s) => s,
            Err(VarError::NotPresent) => "Not set".into(),
            Err(VarError::NotUnicode(s)) => format!("Invalid value: {}", s.to_string_lossy()),
        };
        println!("  {name:<35} {val:<15}");
    });
    let token = if env::var("TOPUP_TELEGRAM_BOT_TOKEN").is_ok() { "Set" } else { "Not set" };
    println!("  {:<35} {token:<15}", "TOPUP_TELEGRAM_BOT_TOKEN");
}
