use teloxide::types::BotCommand;
use teloxide::utils::command::BotCommands;

#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "Supported commands:")]
pub enum Command {
    #[command(description = "subscribe to the daily wallpaper")]
    Start,
    #[command(description = "show how the daily wallpaper works")]
    Help,
    #[command(description = "[operators] show the current usage summary")]
    Stats,
}

impl Command {
    /// Commands every user sees in the menu
    pub fn user_commands() -> Vec<BotCommand> {
        Self::bot_commands()
            .into_iter()
            .filter(|c| c.command.trim_start_matches('/') != "stats")
            .collect()
    }

    pub fn operator_commands() -> Vec<BotCommand> {
        Self::bot_commands()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        assert_eq!(Command::parse("/start", "wallbot").unwrap(), Command::Start);
        assert_eq!(Command::parse("/stats@wallbot", "wallbot").unwrap(), Command::Stats);
        assert!(Command::parse("/sub 123", "wallbot").is_err());
    }

    #[test]
    fn test_stats_hidden_from_users() {
        let user: Vec<String> = Command::user_commands()
            .into_iter()
            .map(|c| c.command.trim_start_matches('/').to_string())
            .collect();
        assert!(user.iter().any(|c| c == "start"));
        assert!(!user.iter().any(|c| c == "stats"));
        assert_eq!(Command::operator_commands().len(), 3);
    }
}
