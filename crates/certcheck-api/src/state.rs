use certcheck_core::Config;
use certcheck_services::SubmissionService;

/// Shared application state handed to every handler
#[derive(Clone, Debug)]
pub struct AppState {
    pub config: Config,
    pub submissions: SubmissionService,
}

impl AppState {
    pub fn new(config: Config, submissions: SubmissionService) -> Self {
        Self {
            config,
            submissions,
        }
    }
}
