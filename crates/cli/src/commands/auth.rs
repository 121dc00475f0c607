//! Account and session commands.

use std::io::{self, BufRead, Write};

use secrecy::SecretString;

use cornershop_storefront::routes::auth::{SessionView, UserView};
use cornershop_storefront::services::Registration;

use crate::context::Context;
use crate::output;

/// Arguments of `cs-cli register`.
pub struct RegisterArgs {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: Option<String>,
    pub confirm_password: Option<String>,
}

/// Register a new account.
///
/// # Errors
///
/// Returns the validation or store error from the auth service.
pub fn register(ctx: &Context, args: RegisterArgs) -> Result<(), Box<dyn std::error::Error>> {
    let password = secret_or_prompt(args.password, "Password")?;
    let confirm_password = secret_or_prompt(args.confirm_password, "Confirm password")?;

    let identity = ctx.state().auth().register(&Registration {
        first_name: args.first_name,
        last_name: args.last_name,
        email: args.email,
        password,
        confirm_password,
    })?;

    let user = UserView::from(&identity);
    ctx.output().emit(&user, || {
        format!(
            "Registered {}. Log in with `cs-cli login --email {}`.",
            identity.email, identity.email
        )
    })?;
    Ok(())
}

/// Log in.
///
/// # Errors
///
/// Returns `AuthError::InvalidCredentials` for an unknown email or wrong
/// password.
pub fn login(
    ctx: &Context,
    email: &str,
    password: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let password = secret_or_prompt(password, "Password")?;
    let identity = ctx.state().auth().login(email, &password)?;

    let view = SessionView::from_current(Some(&identity));
    ctx.output()
        .emit(&view, || format!("Welcome back, {}!", identity.display_name()))?;
    Ok(())
}

/// Log out and empty the cart.
///
/// # Errors
///
/// Returns a store error if the store cannot be written.
pub fn logout(ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    ctx.state().auth().logout()?;
    ctx.output().message("Logged out.")?;
    Ok(())
}

/// Show the logged-in account.
///
/// # Errors
///
/// Returns a store error if the stored user is corrupt.
pub fn whoami(ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    let state = ctx.state().auth().session()?;
    let view = SessionView::from(&state);
    ctx.output().emit(&view, || output::session(&view))?;
    Ok(())
}

fn secret_or_prompt(value: Option<String>, label: &str) -> io::Result<SecretString> {
    match value {
        Some(value) => Ok(SecretString::from(value)),
        None => prompt(label).map(SecretString::from),
    }
}

/// Read one line from stdin after printing `label` to stderr.
#[allow(clippy::print_stderr)]
fn prompt(label: &str) -> io::Result<String> {
    eprint!("{label}: ");
    io::stderr().flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
