pub mod callback;
pub mod commands;
mod handler;
pub mod menu;
pub mod notifier;

use anyhow::Result;
use notifier::ThrottledBot;
use teloxide::dispatching::{Dispatcher, UpdateFilterExt};
use teloxide::dptree;
use teloxide::prelude::*;
use teloxide::types::{BotCommandScope, Recipient};
use tracing::{info, warn};

pub use commands::Command;
pub use handler::BotHandler;

/// Result type of dispatcher endpoints
type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

pub async fn run(bot: ThrottledBot, handler: BotHandler, operator_ids: Vec<i64>) -> Result<()> {
    info!("Starting Telegram Bot...");

    setup_commands(&bot, &operator_ids).await;

    let handler_tree = build_handler_tree();

    Dispatcher::builder(bot, handler_tree)
        .dependencies(dptree::deps![handler])
        .default_handler(|_| async {})
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}

fn build_handler_tree(
) -> teloxide::dispatching::UpdateHandler<Box<dyn std::error::Error + Send + Sync + 'static>> {
    let command_handler = Update::filter_message()
        .filter_command::<Command>()
        .endpoint(handle_command);

    let callback_handler = Update::filter_callback_query().endpoint(handle_callback);

    dptree::entry()
        .branch(command_handler)
        .branch(callback_handler)
}

async fn handle_command(
    bot: ThrottledBot,
    msg: Message,
    cmd: Command,
    handler: BotHandler,
) -> HandlerResult {
    handler.handle_command(bot, msg, cmd).await?;
    Ok(())
}

async fn handle_callback(bot: ThrottledBot, q: CallbackQuery, handler: BotHandler) -> HandlerResult {
    handler.handle_callback(bot, q).await?;
    Ok(())
}

/// Register the command menu: basic commands for everyone, /stats for operators
async fn setup_commands(bot: &ThrottledBot, operator_ids: &[i64]) {
    if let Err(e) = bot
        .set_my_commands(Command::user_commands())
        .scope(BotCommandScope::Default)
        .await
    {
        warn!("Failed to set default commands: {:#}", e);
    } else {
        info!("✅ Set default commands for all users");
    }

    for &operator_id in operator_ids {
        if let Err(e) = bot
            .set_my_commands(Command::operator_commands())
            .scope(BotCommandScope::Chat {
                chat_id: Recipient::Id(ChatId(operator_id)),
            })
            .await
        {
            warn!(
                "Failed to set commands for operator {}: {:#}",
                operator_id, e
            );
        } else {
            info!("✅ Set operator commands for user_id: {}", operator_id);
        }
    }
}
