use clap::Args;
use partnerfit_core::domain::store::StoreId;
use partnerfit_core::recommendations::RecommendationQuery;

use crate::commands::context::{
    domain_failure, execute, load_config, validation_failure, CommandContext,
};
use crate::commands::CommandResult;

#[derive(Debug, Clone, Args)]
pub struct RecommendArgs {
    #[arg(long, help = "Store to rank partners for")]
    pub store: String,
    #[arg(long, help = "Maximum number of recommendations (defaults to engine.default_limit)")]
    pub limit: Option<usize>,
    #[arg(long, help = "Minimum final score in [0, 1] (defaults to engine.default_min_score)")]
    pub min_score: Option<f64>,
}

pub fn run(args: RecommendArgs) -> CommandResult {
    let config = match load_config("recommend") {
        Ok(config) => config,
        Err(result) => return result,
    };

    execute("recommend", async move {
        let query = RecommendationQuery::new(
            args.limit.unwrap_or(config.engine.default_limit),
            args.min_score.unwrap_or(config.engine.default_min_score),
        )
        .map_err(validation_failure)?;

        let context = CommandContext::open(config).await?;
        let snapshot = context.snapshot().await;
        let result = snapshot.and_then(|(stores, partners)| {
            context
                .engine
                .recommend_for(
                    &StoreId::new(args.store.as_str()),
                    &stores,
                    &partners,
                    query.limit,
                    query.min_score,
                )
                .map_err(domain_failure)
        });
        context.close().await;

        let recommendations = result?;
        let message = format!(
            "{} recommendations for store `{}` (min score {})",
            recommendations.len(),
            args.store,
            query.min_score
        );
        Ok((message, recommendations))
    })
}
