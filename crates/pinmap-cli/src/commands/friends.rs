use std::path::Path;

use pinmap_core::api::ApiGateway;
use pinmap_core::models::{Friendship, RequestDirection, UserId};

use crate::cli::FriendCommands;
use crate::commands::common::{parse_id, CliContext};
use crate::error::CliError;

pub async fn run_friends(command: FriendCommands, config_path: &Path) -> Result<(), CliError> {
    let context = CliContext::open(config_path).await?;
    let me = context.require_user()?;

    match command {
        FriendCommands::List { json } => {
            let friends = context.gateway.list_friends(me).await?;
            print_friendships(&friends, me, json)?;
        }
        FriendCommands::Requests { sent, json } => {
            let direction = if sent {
                RequestDirection::Sent
            } else {
                RequestDirection::Received
            };
            let requests = context.gateway.list_friend_requests(me, direction).await?;
            print_friendships(&requests, me, json)?;
        }
        FriendCommands::Add { user_id } => {
            let id = context
                .gateway
                .request_friend(me, parse_id(user_id, UserId::new)?)
                .await?;
            println!("Sent friend request {id} to user {user_id}");
        }
        FriendCommands::Accept { user_id } => {
            context
                .gateway
                .accept_friend(parse_id(user_id, UserId::new)?, me)
                .await?;
            println!("You are now friends with user {user_id}");
        }
        FriendCommands::Remove { user_id } => {
            let other = parse_id(user_id, UserId::new)?;
            let mut edges = context.gateway.list_friends(me).await?;
            edges.extend(
                context
                    .gateway
                    .list_friend_requests(me, RequestDirection::Sent)
                    .await?,
            );
            let edge = find_edge(&edges, me, other).ok_or(CliError::NoFriendship(user_id))?;
            context
                .gateway
                .remove_friend(edge.requester.id, edge.receiver.id)
                .await?;
            println!("Removed friendship with user {user_id}");
        }
    }
    Ok(())
}

/// The edge linking `me` and `other`, whichever side sent the request.
pub fn find_edge(edges: &[Friendship], me: UserId, other: UserId) -> Option<&Friendship> {
    edges
        .iter()
        .find(|edge| edge.counterpart(me).id == other)
}

fn print_friendships(edges: &[Friendship], me: UserId, as_json: bool) -> Result<(), CliError> {
    if as_json {
        println!("{}", serde_json::to_string_pretty(edges)?);
    } else {
        for line in format_friend_lines(edges, me) {
            println!("{line}");
        }
    }
    Ok(())
}

pub fn format_friend_lines(edges: &[Friendship], me: UserId) -> Vec<String> {
    edges
        .iter()
        .map(|edge| {
            let friend = edge.counterpart(me);
            format!("{:>6}  {} (user {})", edge.id, friend.username, friend.id)
        })
        .collect()
}
