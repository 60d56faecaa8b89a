use std::path::Path;

use pinmap_core::api::ApiGateway;
use pinmap_core::models::{Folder, FolderId, FolderPayload, PinId};

use crate::cli::FolderCommands;
use crate::commands::common::{parse_id, CliContext};
use crate::error::CliError;

pub async fn run_folders(command: FolderCommands, config_path: &Path) -> Result<(), CliError> {
    let context = CliContext::open(config_path).await?;
    let user_id = context.require_user()?;

    match command {
        FolderCommands::List { json } => {
            let folders = context.gateway.list_folders_for_user(user_id).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&folders)?);
            } else {
                for line in format_folder_lines(&folders) {
                    println!("{line}");
                }
            }
        }
        FolderCommands::Add { name } => {
            let payload = FolderPayload::new(user_id, normalize_folder_name(&name)?);
            let id = context.gateway.create_folder(&payload).await?;
            println!("{id}");
        }
        FolderCommands::Rename { id, name } => {
            let mut folder = context.find_folder(parse_id(id, FolderId::new)?).await?;
            folder.name = normalize_folder_name(&name)?;
            context.gateway.update_folder(&folder).await?;
            println!("Renamed folder {id}");
        }
        FolderCommands::File { id, pin_id } => {
            let pin = parse_id(pin_id, PinId::new)?;
            if context.file_pin(parse_id(id, FolderId::new)?, pin).await? {
                println!("Filed pin {pin_id} under folder {id}");
            } else {
                println!("Pin {pin_id} is already in folder {id}");
            }
        }
        FolderCommands::Unfile { id, pin_id } => {
            let mut folder = context.find_folder(parse_id(id, FolderId::new)?).await?;
            if folder.unfile_pin(parse_id(pin_id, PinId::new)?) {
                context.gateway.update_folder(&folder).await?;
                println!("Removed pin {pin_id} from folder {id}");
            } else {
                println!("Pin {pin_id} is not in folder {id}");
            }
        }
        FolderCommands::Delete { id } => {
            context
                .gateway
                .delete_folder(parse_id(id, FolderId::new)?)
                .await?;
            println!("Deleted folder {id}");
        }
    }
    Ok(())
}

pub fn normalize_folder_name(name: &str) -> Result<String, CliError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(CliError::EmptyFolderName);
    }
    Ok(name.to_string())
}

pub fn format_folder_lines(folders: &[Folder]) -> Vec<String> {
    folders
        .iter()
        .map(|folder| {
            let count = folder.pin_ids.len();
            let noun = if count == 1 { "pin" } else { "pins" };
            format!("{:>6}  {}  ({count} {noun})", folder.id, folder.name)
        })
        .collect()
}
