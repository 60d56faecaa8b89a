use std::path::Path;

use pinmap_core::api::ApiGateway;
use pinmap_core::models::{
    FolderId, NearbyQuery, PageRequest, Pin, PinId, PinScope, SortDirection, UserId,
};
use pinmap_core::state::submit::{delete_selected_pin, submit_draft};
use pinmap_core::state::{DetailOrigin, Intent, ListSlot};
use pinmap_core::ErrorKind;

use crate::cli::{PinCommands, PinFields, PinListScope};
use crate::commands::common::{
    draft_edits, format_pin_detail, format_pin_lines, parse_id, pin_to_list_item, print_notice,
    resolve_location, CliContext, PinListItem,
};
use crate::error::CliError;

pub async fn run_pins(command: PinCommands, config_path: &Path) -> Result<(), CliError> {
    let mut context = CliContext::open(config_path).await?;
    match command {
        PinCommands::List {
            scope,
            folder,
            user,
            page,
            limit,
            oldest,
            json,
        } => {
            if let Some(folder) = folder {
                return run_folder_list(&context, parse_id(folder, FolderId::new)?, json).await;
            }
            let scope = resolve_scope(&context, scope, user)?;
            let mut request = PageRequest::new(page, limit);
            if oldest {
                request.direction = SortDirection::Asc;
            }
            run_list(&context, scope, request, json).await
        }
        PinCommands::Near {
            lat,
            lng,
            distance,
            json,
        } => {
            let query = NearbyQuery {
                latitude: lat,
                longitude: lng,
                distance_km: distance,
            };
            let pins = context.gateway.nearby_pins(query).await?;
            print_pins(&pins, json)
        }
        PinCommands::Show { id, json } => {
            let pin = context.gateway.get_pin(parse_id(id, PinId::new)?).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&pin_to_list_item(&pin))?);
            } else {
                println!("{}", format_pin_detail(&pin));
            }
            Ok(())
        }
        PinCommands::Add { fields } => run_add(&mut context, &fields).await,
        PinCommands::Edit { id, fields } => {
            run_edit(&mut context, parse_id(id, PinId::new)?, &fields).await
        }
        PinCommands::Delete { id } => run_delete(&mut context, parse_id(id, PinId::new)?).await,
    }
}

pub fn resolve_scope(
    context: &CliContext,
    scope: PinListScope,
    user: Option<i64>,
) -> Result<PinScope, CliError> {
    if let Some(user) = user {
        return Ok(PinScope::User(parse_id(user, UserId::new)?));
    }
    match scope {
        PinListScope::Mine => Ok(PinScope::Mine(context.require_user()?)),
        PinListScope::All => Ok(PinScope::All),
    }
}

async fn run_list(
    context: &CliContext,
    scope: PinScope,
    request: PageRequest,
    as_json: bool,
) -> Result<(), CliError> {
    let mut slot = ListSlot::<Pin>::default();
    let ticket = slot.begin_load(context.state.refresh_token());

    let page = match context.state.current_user_id() {
        Some(user_id) => {
            let (profile, page) = tokio::join!(
                context.gateway.get_user(user_id),
                context.gateway.list_pins(scope, request)
            );
            match profile {
                Ok(profile) => tracing::debug!("listing pins for {}", profile.username),
                Err(error) => tracing::warn!("Failed to load profile: {}", error),
            }
            page?
        }
        None => context.gateway.list_pins(scope, request).await?,
    };
    let has_next = page.has_next();
    slot.apply(&ticket, page.items);

    print_pins(slot.items(), as_json)?;
    if has_next && !as_json {
        println!("(more on page {})", request.page + 1);
    }
    Ok(())
}

/// Pins filed under one folder, fetched one by one from its membership list.
async fn run_folder_list(
    context: &CliContext,
    folder_id: FolderId,
    as_json: bool,
) -> Result<(), CliError> {
    let folder = context.find_folder(folder_id).await?;
    let mut slot = ListSlot::<Pin>::default();
    let ticket = slot.begin_load(context.state.refresh_token());

    let mut pins = Vec::with_capacity(folder.pin_ids.len());
    for pin_id in &folder.pin_ids {
        match context.gateway.get_pin(*pin_id).await {
            Ok(pin) => pins.push(pin),
            Err(error) if error.kind() == ErrorKind::NotFound => {
                tracing::warn!("Folder {} lists missing pin {}", folder.id, pin_id);
            }
            Err(error) => return Err(error.into()),
        }
    }
    slot.apply(&ticket, pins);
    print_pins(slot.items(), as_json)
}

fn print_pins(pins: &[Pin], as_json: bool) -> Result<(), CliError> {
    if as_json {
        let items = pins.iter().map(pin_to_list_item).collect::<Vec<PinListItem>>();
        println!("{}", serde_json::to_string_pretty(&items)?);
    } else {
        for line in format_pin_lines(pins) {
            println!("{line}");
        }
    }
    Ok(())
}

async fn run_add(context: &mut CliContext, fields: &PinFields) -> Result<(), CliError> {
    context.require_user()?;
    let location = resolve_location(context, fields).await?;
    let edits = draft_edits(fields)?;

    let state = &mut context.state;
    state.dispatch(Intent::ToggleEditor);
    for edit in edits {
        state.dispatch(Intent::EditDraft(edit));
    }
    if let Some(location) = location {
        state.dispatch(Intent::OpenLocationPicker);
        state.dispatch(Intent::SelectLocation(location));
    }

    let id = submit_draft(state, &context.gateway).await?;
    print_notice(state);
    println!("{id}");
    if let Some(folder) = fields.folder {
        context.file_pin(parse_id(folder, FolderId::new)?, id).await?;
    }
    Ok(())
}

async fn run_edit(context: &mut CliContext, id: PinId, fields: &PinFields) -> Result<(), CliError> {
    context.require_user()?;
    let pin = context.gateway.get_pin(id).await?;
    let location = resolve_location(context, fields).await?;
    let edits = draft_edits(fields)?;

    let state = &mut context.state;
    state.dispatch(Intent::OpenPinDetail {
        post: pin.clone(),
        origin: DetailOrigin::Other,
    });
    state.dispatch(Intent::OpenEditFromDetail(pin));
    for edit in edits {
        state.dispatch(Intent::EditDraft(edit));
    }
    if let Some(location) = location {
        state.dispatch(Intent::OpenLocationPicker);
        state.dispatch(Intent::SelectLocation(location));
    }

    submit_draft(state, &context.gateway).await?;
    print_notice(state);
    if let Some(folder) = fields.folder {
        context.file_pin(parse_id(folder, FolderId::new)?, id).await?;
    }
    Ok(())
}

async fn run_delete(context: &mut CliContext, id: PinId) -> Result<(), CliError> {
    context.require_user()?;
    let pin = context.gateway.get_pin(id).await?;
    let state = &mut context.state;
    state.dispatch(Intent::OpenPinDetail {
        post: pin,
        origin: DetailOrigin::Other,
    });
    delete_selected_pin(state, &context.gateway).await?;
    print_notice(state);
    Ok(())
}
