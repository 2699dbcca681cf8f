use clap::Args;
use partnerfit_core::domain::partner::PartnerId;
use partnerfit_core::errors::DomainError;

use crate::commands::context::{domain_failure, execute, load_config, CommandContext};
use crate::commands::CommandResult;

#[derive(Debug, Clone, Args)]
pub struct ImpactArgs {
    #[arg(long, help = "Partner whose market reach should be measured")]
    pub partner: String,
}

pub fn run(args: ImpactArgs) -> CommandResult {
    let config = match load_config("impact") {
        Ok(config) => config,
        Err(result) => return result,
    };

    execute("impact", async move {
        let context = CommandContext::open(config).await?;
        let snapshot = context.snapshot().await;
        let partner_id = PartnerId::new(args.partner.as_str());

        let result = snapshot.and_then(|(stores, partners)| {
            let partner = partners
                .find(&partner_id)
                .ok_or_else(|| domain_failure(DomainError::PartnerNotFound(partner_id.clone())))?;
            Ok(context.engine.analyze_new_partner(partner, &stores))
        });
        context.close().await;

        let impact = result?;
        let message = format!(
            "partner `{}` is a potential match for {} of {} stores",
            args.partner, impact.potential_matches, impact.total_stores_analyzed
        );
        Ok((message, impact))
    })
}
