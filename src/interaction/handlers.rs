//! Command handlers.
//!
//! Each handler works on the room the message came from. Invalid names, missing groups
//! and missing mentions are answered with a reply and never mutate the store.

use futures::future::try_join_all;

use crate::{
    base::{messages, types::ChatMessage},
    interaction::command::{CommandKind, Invocation, group_name},
    prelude::*,
    service::{
        chat::ChatClient,
        store::{CreateOutcome, Group, GroupStore},
    },
};

/// Runs the handler for the invocation.
#[instrument(skip_all, fields(command = ?invocation.kind, room_id = %message.room_id))]
pub async fn execute(invocation: &Invocation, message: &ChatMessage, store: &GroupStore, chat: &ChatClient) -> Void {
    let args = invocation.args.as_deref();

    match invocation.kind {
        CommandKind::Create => create(message, args, store, chat).await,
        CommandKind::Delete => delete(message, args, store, chat).await,
        CommandKind::GroupAdd => group_add(message, args, store, chat).await,
        CommandKind::GroupDel => group_del(message, args, store, chat).await,
        CommandKind::GroupList => group_list(message, args, store, chat).await,
        CommandKind::Tag => tag(message, args, store, chat).await,
        CommandKind::List => list(message, store, chat).await,
        CommandKind::Help => chat.send_markdown(&message.room_id, messages::HELP).await,
        CommandKind::Hello => chat.send_text(&message.room_id, messages::HELLO).await,
        CommandKind::Unknown => chat.send_text(&message.room_id, messages::unknown(&message.text)).await,
    }
}

/// The people a command targets: everyone mentioned except the first, which is the bot itself.
fn mentioned_targets(message: &ChatMessage) -> &[String] {
    message.mentioned_people.get(1..).unwrap_or_default()
}

/// Validates the group name, replying when it is invalid.
async fn require_name<'a>(message: &ChatMessage, args: Option<&'a str>, chat: &ChatClient) -> Res<Option<&'a str>> {
    let name = group_name(args);

    if name.is_none() {
        chat.send_text(&message.room_id, messages::invalid_group_name(args.unwrap_or_default())).await?;
    }

    Ok(name)
}

/// Looks up the group, replying when it does not exist.
async fn require_group(message: &ChatMessage, name: &str, store: &GroupStore, chat: &ChatClient) -> Res<Option<Group>> {
    let group = store.group(&message.room_id, name).await;

    if group.is_none() {
        chat.send_text(&message.room_id, messages::not_found(name)).await?;
    }

    Ok(group)
}

async fn create(message: &ChatMessage, args: Option<&str>, store: &GroupStore, chat: &ChatClient) -> Void {
    let Some(name) = require_name(message, args, chat).await? else {
        return Ok(());
    };

    match store.create_group(&message.room_id, name).await {
        CreateOutcome::AlreadyExists(count) => chat.send_text(&message.room_id, messages::already_created(name, count)).await,
        CreateOutcome::Created => {
            info!("Created group `{}`.", name);
            chat.send_text(&message.room_id, messages::created(name)).await
        }
    }
}

async fn delete(message: &ChatMessage, args: Option<&str>, store: &GroupStore, chat: &ChatClient) -> Void {
    let Some(name) = require_name(message, args, chat).await? else {
        return Ok(());
    };

    if !store.delete_group(&message.room_id, name).await {
        return chat.send_text(&message.room_id, messages::not_found(name)).await;
    }

    info!("Deleted group `{}`.", name);

    Ok(())
}

async fn group_add(message: &ChatMessage, args: Option<&str>, store: &GroupStore, chat: &ChatClient) -> Void {
    let Some(name) = require_name(message, args, chat).await? else {
        return Ok(());
    };

    if require_group(message, name, store, chat).await?.is_none() {
        return Ok(());
    }

    let targets = mentioned_targets(message);
    if targets.is_empty() {
        return chat.send_text(&message.room_id, messages::NO_PEOPLE).await;
    }

    let Some(missing) = store.missing_members(&message.room_id, name, targets).await else {
        return chat.send_text(&message.room_id, messages::not_found(name)).await;
    };

    // Fetch everyone first, then apply the whole batch at once.
    let people = try_join_all(missing.iter().map(|id| chat.get_person(id))).await?;

    match store.add_members(&message.room_id, name, people).await {
        Some(added) => info!("Added {} people to group `{}`.", added, name),
        None => warn!("Group `{}` was deleted while fetching people.", name),
    }

    Ok(())
}

async fn group_del(message: &ChatMessage, args: Option<&str>, store: &GroupStore, chat: &ChatClient) -> Void {
    let Some(name) = require_name(message, args, chat).await? else {
        return Ok(());
    };

    if require_group(message, name, store, chat).await?.is_none() {
        return Ok(());
    }

    if let Some(removed) = store.remove_members(&message.room_id, name, mentioned_targets(message)).await {
        info!("Removed {} people from group `{}`.", removed, name);
    }

    Ok(())
}

async fn group_list(message: &ChatMessage, args: Option<&str>, store: &GroupStore, chat: &ChatClient) -> Void {
    let Some(name) = require_name(message, args, chat).await? else {
        return Ok(());
    };

    let Some(group) = require_group(message, name, store, chat).await? else {
        return Ok(());
    };

    chat.send_markdown(&message.room_id, messages::group_contents(name, group.members())).await
}

async fn tag(message: &ChatMessage, args: Option<&str>, store: &GroupStore, chat: &ChatClient) -> Void {
    let Some(name) = require_name(message, args, chat).await? else {
        return Ok(());
    };

    let Some(group) = require_group(message, name, store, chat).await? else {
        return Ok(());
    };

    chat.send_markdown(&message.room_id, messages::tag(group.members())).await
}

async fn list(message: &ChatMessage, store: &GroupStore, chat: &ChatClient) -> Void {
    let names = store.group_names(&message.room_id).await;

    chat.send_text(&message.room_id, messages::group_names(names.iter().map(String::as_str))).await
}
