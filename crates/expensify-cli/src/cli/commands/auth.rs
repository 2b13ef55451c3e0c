//! Auth command handlers.

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use expensify_core::session::mask_token;
use expensify_core::validation::{SignupForm, validate_otp};

use super::report;
use crate::cli::Manager;

fn read_password(prompt: &str) -> Result<String> {
    print!("{prompt}");
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin()
        .lock()
        .read_line(&mut input)
        .context("read password from stdin")?;
    Ok(input.trim_end_matches(['\r', '\n']).to_string())
}

pub async fn login(manager: &Manager, email: &str, password: Option<String>) -> Result<()> {
    let password = match password {
        Some(password) => password,
        None => read_password("Password: ")?,
    };

    let session = manager.login(email, &password).await.map_err(report)?;

    println!(
        "✓ Logged in as {} <{}>",
        session.user.name, session.user.email
    );
    println!("  Session saved to: {}", manager.store().path().display());
    Ok(())
}

pub struct SignupArgs<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password: Option<String>,
    pub confirm: Option<String>,
    pub legacy: bool,
}

pub async fn signup(manager: &Manager, args: SignupArgs<'_>) -> Result<()> {
    let password = match args.password {
        Some(password) => password,
        None => read_password("Password: ")?,
    };
    let confirm = args.confirm.unwrap_or_else(|| password.clone());
    let form = SignupForm::validate(args.name, args.email, &password, &confirm).map_err(report)?;

    if args.legacy {
        let message = manager.api().sign_up(&form).await.map_err(report)?;
        println!("✓ {message}");
        println!("Run `expensify login --email {}` to continue.", form.email);
        return Ok(());
    }

    let message = manager.api().send_otp(&form).await.map_err(report)?;
    println!("✓ {message}");
    println!(
        "Run `expensify verify-otp --name {:?} --email {} --otp <CODE>` to finish signing up.",
        form.name, form.email
    );
    Ok(())
}

pub async fn verify_otp(
    manager: &Manager,
    name: &str,
    email: &str,
    password: &str,
    otp: &str,
) -> Result<()> {
    let form = SignupForm::validate(name, email, password, password).map_err(report)?;
    let otp = validate_otp(otp).map_err(report)?;

    match manager
        .verify_otp_and_signup(&form, &otp)
        .await
        .map_err(report)?
    {
        Some(session) => {
            println!("✓ Account created");
            println!(
                "✓ Logged in as {} <{}>",
                session.user.name, session.user.email
            );
        }
        None => {
            println!("✓ Account created");
            println!("Run `expensify login --email {}` to continue.", form.email);
        }
    }
    Ok(())
}

pub async fn resend_otp(manager: &Manager, email: &str) -> Result<()> {
    let message = manager.api().resend_otp(email).await.map_err(report)?;
    println!("✓ {message}");
    Ok(())
}

pub fn logout(manager: &Manager) -> Result<()> {
    if manager.logout()? {
        println!("✓ Logged out");
        println!(
            "  Session removed from: {}",
            manager.store().path().display()
        );
    } else {
        println!("Not logged in (no session found).");
    }
    Ok(())
}

pub fn whoami(manager: &Manager) {
    match manager.load_session() {
        Some(session) => {
            println!("{} <{}>", session.user.name, session.user.email);
            if let Some(id) = &session.user.id {
                println!("  id: {id}");
            }
            println!("  token: {}", mask_token(&session.token));
        }
        None => println!("Not logged in."),
    }
}
