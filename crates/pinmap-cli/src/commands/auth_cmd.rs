use std::path::Path;

use pinmap_core::models::{Credentials, NewUser};

use crate::cli::AuthCommands;
use crate::commands::common::CliContext;
use crate::error::CliError;

pub async fn run_auth(command: AuthCommands, config_path: &Path) -> Result<(), CliError> {
    let CliContext {
        gateway,
        session,
        mut state,
        ..
    } = CliContext::open(config_path).await?;

    match command {
        AuthCommands::Login { username, password } => {
            let credentials = Credentials::new(username, password);
            let user = session.login(&mut state, &gateway, &credentials).await?;
            println!("Signed in as {} (user {})", user.username, user.id);
        }
        AuthCommands::Register {
            username,
            password,
            phone,
        } => {
            let mut new_user = NewUser::new(username, password);
            if let Some(phone) = phone {
                new_user.phone_number = phone.trim().to_string();
            }
            let user = session.register(&mut state, &gateway, &new_user).await?;
            println!("Registered and signed in as {} (user {})", user.username, user.id);
        }
        AuthCommands::Status => match (state.current_user_id(), state.session().profile()) {
            (Some(_), Some(profile)) => {
                println!("Signed in as {} (user {})", profile.username, profile.id);
            }
            (Some(user_id), None) => {
                println!("Signed in as user {user_id} (profile unavailable)");
            }
            (None, _) => println!("Not signed in."),
        },
        AuthCommands::Logout => {
            session.logout(&mut state, &gateway).await?;
            println!("Signed out");
        }
    }
    Ok(())
}
