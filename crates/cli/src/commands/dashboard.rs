use crate::commands::context::{execute, load_config, CommandContext};
use crate::commands::CommandResult;

pub fn run() -> CommandResult {
    let config = match load_config("dashboard") {
        Ok(config) => config,
        Err(result) => return result,
    };

    execute("dashboard", async move {
        let context = CommandContext::open(config).await?;
        let snapshot = context.snapshot().await;
        let result = snapshot
            .map(|(stores, partners)| context.engine.ecosystem_dashboard(&stores, &partners));
        context.close().await;

        let dashboard = result?;
        let message = format!(
            "{} stores and {} partners in the ecosystem",
            dashboard.total_stores, dashboard.total_partners
        );
        Ok((message, dashboard))
    })
}
