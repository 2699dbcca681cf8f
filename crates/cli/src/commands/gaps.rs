use clap::Args;
use partnerfit_core::domain::store::StoreId;
use partnerfit_core::errors::DomainError;
use partnerfit_core::maturity::{GapRecord, MaturityProfile};
use serde::Serialize;

use crate::commands::context::{domain_failure, execute, load_config, CommandContext};
use crate::commands::CommandResult;

#[derive(Debug, Clone, Args)]
pub struct GapsArgs {
    #[arg(long, help = "Store to analyze")]
    pub store: String,
}

#[derive(Debug, Serialize)]
struct GapsOutput {
    store_id: String,
    maturity: MaturityProfile,
    gaps: Vec<GapRecord>,
}

pub fn run(args: GapsArgs) -> CommandResult {
    let config = match load_config("gaps") {
        Ok(config) => config,
        Err(result) => return result,
    };

    execute("gaps", async move {
        let context = CommandContext::open(config).await?;
        let snapshot = context.snapshot().await;
        let mut jitter = context.jitter();
        let store_id = StoreId::new(args.store.as_str());

        let result = snapshot.and_then(|(stores, _)| {
            let store = stores
                .find(&store_id)
                .ok_or_else(|| domain_failure(DomainError::StoreNotFound(store_id.clone())))?;
            let analyzer = context.engine.maturity_analyzer();
            let maturity = analyzer.analyze(store, &mut jitter);
            let gaps = GapRecord::from_profile(&maturity);
            Ok(GapsOutput { store_id: args.store.clone(), maturity, gaps })
        });
        context.close().await;

        let output = result?;
        let message = format!("{} gaps for store `{}`", output.gaps.len(), output.store_id);
        Ok((message, output))
    })
}
