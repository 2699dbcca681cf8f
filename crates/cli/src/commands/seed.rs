use partnerfit_db::SampleDataset;

use crate::commands::context::{execute, load_config, CommandContext, Failure, EXIT_SEED};
use crate::commands::CommandResult;

const EXIT_SEED_VERIFICATION: u8 = EXIT_SEED + 1;

pub fn run() -> CommandResult {
    let config = match load_config("seed") {
        Ok(config) => config,
        Err(result) => return result,
    };

    execute("seed", async move {
        let context = CommandContext::open(config).await?;
        let result = load_and_verify(&context).await;
        context.close().await;
        result
    })
}

async fn load_and_verify(
    context: &CommandContext,
) -> Result<(String, partnerfit_db::SeedResult), Failure> {
    let seeded = SampleDataset::load(context.stores(), context.partners())
        .await
        .map_err(|error| ("seed_execution", error.to_string(), EXIT_SEED))?;

    let verification = SampleDataset::verify(context.stores(), context.partners())
        .await
        .map_err(|error| ("seed_verification", error.to_string(), EXIT_SEED_VERIFICATION))?;
    if !verification.all_present {
        let message = failed_checks_message(&verification.checks);
        return Err(("seed_verification", message, EXIT_SEED_VERIFICATION));
    }

    let message = format!(
        "sample dataset loaded: {} stores, {} partners",
        seeded.stores_seeded.len(),
        seeded.partners_seeded.len()
    );
    Ok((message, seeded))
}

fn failed_checks_message(checks: &[(&'static str, bool)]) -> String {
    let failed_checks =
        checks.iter().filter_map(|(check, passed)| (!passed).then_some(*check)).collect::<Vec<_>>();
    if failed_checks.is_empty() {
        "some seed records failed to load".to_string()
    } else {
        format!("seed verification failed for: {}", failed_checks.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::failed_checks_message;

    #[test]
    fn verification_message_targets_failed_checks() {
        let checks = [("store-fashion-001", true), ("ads-001", false), ("crm-007", false)];
        assert_eq!(
            failed_checks_message(&checks),
            "seed verification failed for: ads-001, crm-007"
        );
    }

    #[test]
    fn verification_message_falls_back_to_generic_when_no_labels() {
        let checks = [("store-fashion-001", true)];
        assert_eq!(failed_checks_message(&checks), "some seed records failed to load");
    }
}
