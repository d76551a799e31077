use serde::Serialize;

use crate::{
    configuration::ScraperSettings,
    dal::lead_db::LeadStore,
    domain::{lead_quality, LeadRecord, SearchQuery},
};

use super::{collect, BrowserLauncher, MapsLayout};

#[derive(Debug, Serialize)]
pub struct ScoredLead {
    #[serde(flatten)]
    pub lead: LeadRecord,
    pub score: u8,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum GenerateLeadsResponse {
    Success {
        success: bool,
        total: usize,
        leads: Vec<ScoredLead>,
    },
    Failure {
        success: bool,
        error: String,
    },
}

impl GenerateLeadsResponse {
    fn success(leads: Vec<LeadRecord>) -> Self {
        let leads: Vec<ScoredLead> = leads
            .into_iter()
            .map(|lead| ScoredLead {
                score: lead_quality::score(&lead),
                lead,
            })
            .collect();
        GenerateLeadsResponse::Success {
            success: true,
            total: leads.len(),
            leads,
        }
    }

    fn failure(error: impl ToString) -> Self {
        GenerateLeadsResponse::Failure {
            success: false,
            error: error.to_string(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, GenerateLeadsResponse::Success { .. })
    }
}

/// Collects leads for `query`, stores each one and reports the stored set.
/// Any error that escapes collection or storage fails the whole request.
pub async fn generate_leads<L: BrowserLauncher, S: LeadStore + ?Sized>(
    launcher: &L,
    store: &S,
    settings: &ScraperSettings,
    query: &SearchQuery,
) -> GenerateLeadsResponse {
    log::info!("Lead request received: {:?}", query);

    let outcome = match collect(launcher, settings, &MapsLayout::default(), query).await {
        Ok(outcome) => outcome,
        Err(e) => {
            log::error!("Lead collection failed: {}", e);
            return GenerateLeadsResponse::failure(e);
        }
    };
    log::info!("Leads extracted: {}", outcome.leads.len());

    for lead in outcome.leads.iter() {
        if let Err(e) = store.insert_lead(lead).await {
            log::error!("Error inserting lead in db: {:?}", e);
            return GenerateLeadsResponse::failure(e);
        }
    }

    GenerateLeadsResponse::success(outcome.leads)
}
