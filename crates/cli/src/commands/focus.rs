use clap::Args;
use partnerfit_core::domain::store::StoreId;
use partnerfit_core::domain::taxonomy::CommerceStage;

use crate::commands::context::{domain_failure, execute, load_config, CommandContext};
use crate::commands::CommandResult;

#[derive(Debug, Clone, Args)]
pub struct FocusArgs {
    #[arg(long, help = "Store to group recommendations for")]
    pub store: String,
    #[arg(
        long = "stage",
        value_delimiter = ',',
        help = "Commerce stages to focus on; omit to derive them from the store's gaps"
    )]
    pub stages: Vec<CommerceStage>,
}

pub fn run(args: FocusArgs) -> CommandResult {
    let config = match load_config("focus") {
        Ok(config) => config,
        Err(result) => return result,
    };

    execute("focus", async move {
        let context = CommandContext::open(config).await?;
        let snapshot = context.snapshot().await;
        let mut jitter = context.jitter();

        let result = snapshot.and_then(|(stores, partners)| {
            context
                .engine
                .recommend_by_focus_area(
                    &StoreId::new(args.store.as_str()),
                    &stores,
                    &partners,
                    Some(args.stages.as_slice()),
                    &mut jitter,
                )
                .map_err(domain_failure)
        });
        context.close().await;

        let areas = result?;
        let mode = if args.stages.is_empty() { "derived" } else { "requested" };
        let message = format!("{} {mode} focus areas for store `{}`", areas.len(), args.store);
        Ok((message, areas))
    })
}
