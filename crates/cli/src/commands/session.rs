//! Login, logout and whoami
//!
//! These share the identity slot with the web console, so a login here is
//! picked up by the next `qaboard serve`.

use anyhow::Result;
use serde::Serialize;

use qaboard_common::session::SESSION_KEY;

use super::Context;
use crate::output::{print_info, print_item, print_success, TableDisplay};

/// Identity display wrapper for serialization
#[derive(Debug, Serialize)]
pub struct IdentityDisplay {
    pub username: String,
    pub key: &'static str,
    pub store: String,
}

impl TableDisplay for IdentityDisplay {
    fn headers() -> Vec<&'static str> {
        vec!["Username", "Key", "Store"]
    }

    fn row(&self) -> Vec<String> {
        vec![self.username.clone(), self.key.to_string(), self.store.clone()]
    }
}

pub fn login(username: &str, ctx: &Context) -> Result<()> {
    let mut session = ctx.session()?;
    let identity = session.login(username)?;
    print_success(&format!("Logged in as {}", identity.username));
    Ok(())
}

pub fn logout(ctx: &Context) -> Result<()> {
    let mut session = ctx.session()?;
    let was_logged_in = session.is_authenticated();
    session.logout()?;
    if was_logged_in {
        print_success("Logged out");
    } else {
        print_info("Not logged in");
    }
    Ok(())
}

pub fn whoami(ctx: &Context) -> Result<()> {
    let session = ctx.session()?;
    match session.identity() {
        Some(identity) => {
            let display = IdentityDisplay {
                username: identity.username.clone(),
                key: SESSION_KEY,
                store: ctx.config.identity_store().path().display().to_string(),
            };
            print_item(&display, ctx.format);
        }
        None => print_info("Not logged in"),
    }
    Ok(())
}
