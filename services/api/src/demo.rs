use crate::infra::{DemoContexts, DemoGateway, InMemoryChecklistStore};
use clap::Args;
use std::sync::Arc;
use visabuddy::error::AppError;
use visabuddy::workflows::checklist::{
    AiChecklistGenerator, ApplicationId, ChecklistRequestGate, ChecklistResponse,
    FallbackChecklistProvider,
};

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Destination country code for the demo applicant
    #[arg(long, default_value = "GB")]
    pub(crate) country: String,
    /// Visa type for the demo applicant
    #[arg(long, default_value = "student")]
    pub(crate) visa_type: String,
    /// Simulate a completion backend outage to exercise the curated fallback
    #[arg(long)]
    pub(crate) outage: bool,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        country,
        visa_type,
        outage,
    } = args;

    println!("Checklist pipeline demo ({country}/{visa_type})");
    if outage {
        println!("Simulating a completion backend outage.");
    }

    let gateway = if outage {
        DemoGateway::Outage
    } else {
        DemoGateway::Scripted
    };
    let gate = ChecklistRequestGate::new(
        Arc::new(InMemoryChecklistStore::default()),
        Arc::new(DemoContexts::new(country, visa_type)),
        AiChecklistGenerator::new(Arc::new(gateway)),
        Arc::new(FallbackChecklistProvider::builtin()?),
    );

    let application = ApplicationId("demo-application".to_string());
    let response = gate.request_checklist(&application)?;
    render_response(&response);

    // A second request for the same application must replay the stored
    // checklist instead of generating again.
    let replay = gate.request_checklist(&application)?;
    println!(
        "\nSecond request replayed the stored checklist: {}",
        if replay == response { "yes" } else { "no" }
    );

    Ok(())
}

fn render_response(response: &ChecklistResponse) {
    match response {
        ChecklistResponse::Processing => {
            println!("Checklist is still being generated.");
        }
        ChecklistResponse::Ready {
            items,
            ai_fallback_used,
            ai_error_occurred,
        } => {
            println!(
                "\nChecklist ready ({} items, fallback: {}, ai error: {})",
                items.len(),
                ai_fallback_used,
                ai_error_occurred
            );
            for item in items {
                println!(
                    "  {:>2}. [{}] {} ({})",
                    item.order,
                    item.category.label(),
                    item.label,
                    item.document_type
                );
            }
        }
    }
}
