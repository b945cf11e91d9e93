use teloxide::utils::command::BotCommands;

#[derive(BotCommands, Clone, Debug)]
#[command(rename_rule = "lowercase", description = "Token Sale Bot Commands:")]
pub enum Command {
    #[command(description = "Start the bot (carries the return_<id> deep link from the wallet page)")]
    Start(String),

    #[command(description = "Show help message")]
    Help,

    #[command(description = "Show user statistics")]
    Stats,

    #[command(description = "Export all conversation records as JSON")]
    Export,
}
