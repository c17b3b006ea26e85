//! Dispatcher schema and handler chain builders

use std::sync::Arc;

use teloxide::dispatching::dialogue::InMemStorage;
use teloxide::dispatching::{HandlerExt, UpdateFilterExt, UpdateHandler};
use teloxide::prelude::*;
use teloxide::types::{CallbackQuery, Chat, Message, MessageId};

use super::types::{sender_id, HandlerDeps, HandlerError, HandlerResult, SessionDialogue};
use crate::conversation::{AdminAction, Inbound, SessionState};
use crate::telegram::bot::Command;
use crate::telegram::delivery::deliver;

/// Creates the main dispatcher schema for the Telegram bot.
///
/// Only private chats are served. There the chat id is the user's id, so the
/// chat's dialogue is that one user's session; group updates fall through to
/// the dispatcher's default handler. The dispatcher must provide an
/// `Arc<InMemStorage<SessionState>>` dependency.
///
/// # Arguments
/// * `deps` - Handler dependencies
///
/// # Returns
/// The complete handler tree for the bot
pub fn schema(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    let deps_commands = deps.clone();
    let deps_messages = deps.clone();
    let deps_callback = deps;

    dptree::entry()
        .filter(|update: Update| is_private_chat(update.chat()))
        .enter_dialogue::<Update, InMemStorage<SessionState>, SessionState>()
        // Commands first so /start and /cancel are never taken as answers
        .branch(command_handler(deps_commands))
        .branch(message_handler(deps_messages))
        .branch(callback_handler(deps_callback))
}

/// Whether an update belongs to a chat with exactly one user in it.
pub(crate) fn is_private_chat(chat: Option<&Chat>) -> bool {
    chat.is_some_and(Chat::is_private)
}

/// Handler for /start and /cancel
fn command_handler(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    Update::filter_message().branch(dptree::entry().filter_command::<Command>().endpoint(
        move |bot: Bot, msg: Message, cmd: Command, dialogue: SessionDialogue| {
            let deps = deps.clone();
            async move {
                log::info!("Received command {:?} from chat {}", cmd, msg.chat.id);

                let Some(sender) = sender_id(msg.from.as_ref()) else {
                    log::warn!("Command without sender in chat {}", msg.chat.id);
                    return Ok(());
                };
                let event = match cmd {
                    Command::Start => Inbound::Start,
                    Command::Cancel => Inbound::Cancel,
                };
                run_event(&bot, &deps, &dialogue, sender, event, None).await
            }
        },
    ))
}

/// Handler for form answers, delete ordinals and anything else users type
fn message_handler(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    Update::filter_message().endpoint(move |bot: Bot, msg: Message, dialogue: SessionDialogue| {
        let deps = deps.clone();
        async move {
            let Some(sender) = sender_id(msg.from.as_ref()) else {
                return Ok(());
            };
            let event = match msg.text() {
                Some(text) => Inbound::Text(text.to_string()),
                None => Inbound::Unsupported,
            };
            run_event(&bot, &deps, &dialogue, sender, event, None).await
        }
    })
}

/// Handler for inline admin buttons
fn callback_handler(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    Update::filter_callback_query().endpoint(move |bot: Bot, q: CallbackQuery, dialogue: SessionDialogue| {
        let deps = deps.clone();
        async move {
            // Stop the client spinner whatever happens next
            if let Err(e) = bot.answer_callback_query(q.id.clone()).await {
                log::warn!("Failed to answer callback query {:?}: {}", q.id, e);
            }

            let Some(data) = q.data.as_deref() else {
                return Ok(());
            };
            let action = match data.parse::<AdminAction>() {
                Ok(action) => action,
                Err(e) => {
                    log::warn!("Ignoring callback from user {}: {}", q.from.id, e);
                    return Ok(());
                }
            };
            let Some(sender) = sender_id(Some(&q.from)) else {
                return Ok(());
            };
            let origin = q.message.as_ref().map(|m| m.id());

            log::debug!("Callback {} from user {}", action, sender);
            run_event(&bot, &deps, &dialogue, sender, Inbound::Action(action), origin).await
        }
    })
}

/// Loads the session, runs the controller and stores the next state before
/// delivering replies.
async fn run_event(
    bot: &Bot,
    deps: &HandlerDeps,
    dialogue: &SessionDialogue,
    sender: i64,
    event: Inbound,
    origin: Option<MessageId>,
) -> HandlerResult {
    let state = dialogue.get_or_default().await?;

    // Storage calls block; keep them off the async workers
    let controller = Arc::clone(&deps.controller);
    let transition = tokio::task::spawn_blocking(move || controller.handle(sender, state, event)).await?;

    dialogue.update(transition.next).await?;
    deliver(bot, dialogue.chat_id(), origin, transition.replies).await;
    Ok(())
}
