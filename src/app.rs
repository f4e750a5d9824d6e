use crate::analysis_client::NutritionAnalyzer;
use crate::api_connection::connection::ServiceError;
use crate::nutrition::NutritionRecord;

pub const INVALID_FOOD_MESSAGE: &str =
    "We couldn't identify that as a valid food item. Please try searching for something edible!";
pub const GENERIC_ERROR_MESSAGE: &str =
    "An error occurred while analyzing the food. Please check your connection and try again.";

#[derive(Debug, Clone, PartialEq)]
pub enum AppState {
    Idle,
    Loading { request_id: u64 },
    Success(NutritionRecord),
    Failure(String),
}

/// Issued by `submit`; hand it back to `complete` with the outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTicket {
    pub request_id: u64,
    pub query: String,
}

/// Drives the lookup flow: idle, then loading, then success or failure.
///
/// Every submission gets a fresh request id. Completions carrying an older id
/// are dropped, so a slow stale call can never overwrite a newer result.
#[derive(Debug)]
pub struct App {
    state: AppState,
    latest_request_id: u64,
    consecutive_failures: u32,
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl App {
    pub fn new() -> Self {
        Self {
            state: AppState::Idle,
            latest_request_id: 0,
            consecutive_failures: 0,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Starts a lookup. Blank queries leave the state untouched.
    pub fn submit(&mut self, query: &str) -> Option<RequestTicket> {
        if query.trim().is_empty() {
            return None;
        }
        self.latest_request_id += 1;
        let request_id = self.latest_request_id;
        self.state = AppState::Loading { request_id };
        tracing::info!(request_id, query, "submitting food lookup");
        Some(RequestTicket {
            request_id,
            query: query.to_string(),
        })
    }

    /// Applies the outcome of a lookup. Returns false if the ticket was superseded.
    pub fn complete(
        &mut self,
        ticket: &RequestTicket,
        outcome: Result<NutritionRecord, ServiceError>,
    ) -> bool {
        if ticket.request_id != self.latest_request_id {
            tracing::debug!(
                request_id = ticket.request_id,
                latest = self.latest_request_id,
                "discarding stale lookup result"
            );
            return false;
        }

        self.state = match outcome {
            Ok(record) if record.is_valid_food => {
                self.consecutive_failures = 0;
                AppState::Success(record)
            }
            Ok(_) => {
                self.consecutive_failures = 0;
                tracing::info!(query = %ticket.query, "query was not recognized as food");
                AppState::Failure(INVALID_FOOD_MESSAGE.to_string())
            }
            Err(e) => {
                self.consecutive_failures += 1;
                tracing::error!(
                    query = %ticket.query,
                    consecutive_failures = self.consecutive_failures,
                    "food analysis failed: {}",
                    e
                );
                AppState::Failure(GENERIC_ERROR_MESSAGE.to_string())
            }
        };
        true
    }

    /// Submits `query`, awaits the analyzer and applies the result.
    pub async fn run_query<A: NutritionAnalyzer>(&mut self, analyzer: &A, query: &str) -> &AppState {
        if let Some(ticket) = self.submit(query) {
            let outcome = analyzer.analyze(&ticket.query).await;
            self.complete(&ticket, outcome);
        }
        &self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nutrition::tests::avocado_toast;
    use std::sync::Mutex;

    /// Returns canned outcomes in order.
    struct ScriptedAnalyzer {
        outcomes: Mutex<Vec<Result<NutritionRecord, ServiceError>>>,
        calls: Mutex<Vec<String>>,
    }

    impl ScriptedAnalyzer {
        fn new(mut outcomes: Vec<Result<NutritionRecord, ServiceError>>) -> Self {
            outcomes.reverse();
            Self {
                outcomes: Mutex::new(outcomes),
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    impl NutritionAnalyzer for ScriptedAnalyzer {
        async fn analyze(&self, query: &str) -> Result<NutritionRecord, ServiceError> {
            self.calls.lock().unwrap().push(query.to_string());
            self.outcomes
                .lock()
                .unwrap()
                .pop()
                .expect("analyzer called more often than scripted")
        }
    }

    fn not_food() -> NutritionRecord {
        NutritionRecord {
            is_valid_food: false,
            food_name: "Brick".to_string(),
            calories: 9999.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_starts_idle() {
        assert_eq!(App::new().state(), &AppState::Idle);
    }

    #[test]
    fn test_blank_submit_is_noop() {
        let mut app = App::new();
        for blank in ["", "   ", "\t\n"] {
            assert!(app.submit(blank).is_none());
            assert_eq!(app.state(), &AppState::Idle);
        }

        let ticket = app.submit("apple").unwrap();
        app.complete(&ticket, Ok(avocado_toast()));
        assert!(app.submit("  ").is_none());
        assert_eq!(app.state(), &AppState::Success(avocado_toast()));
    }

    #[test]
    fn test_submit_clears_previous_result() {
        let mut app = App::new();
        let ticket = app.submit("avocado toast").unwrap();
        app.complete(&ticket, Ok(avocado_toast()));
        assert!(matches!(app.state(), AppState::Success(_)));

        let ticket = app.submit("banana").unwrap();
        assert_eq!(app.state(), &AppState::Loading { request_id: ticket.request_id });

        app.complete(&ticket, Err(ServiceError::EmptyResponse));
        let ticket = app.submit("pear").unwrap();
        assert_eq!(app.state(), &AppState::Loading { request_id: ticket.request_id });
    }

    #[test]
    fn test_request_ids_increase() {
        let mut app = App::new();
        let first = app.submit("a").unwrap();
        let second = app.submit("b").unwrap();
        assert!(second.request_id > first.request_id);
    }

    #[test]
    fn test_invalid_food_becomes_failure() {
        let mut app = App::new();
        let ticket = app.submit("brick").unwrap();
        assert!(app.complete(&ticket, Ok(not_food())));
        assert_eq!(app.state(), &AppState::Failure(INVALID_FOOD_MESSAGE.to_string()));
    }

    #[test]
    fn test_every_service_error_becomes_generic_failure() {
        let errors = vec![
            ServiceError::MissingCredential("GEMINI_API_KEY".to_string()),
            ServiceError::InvalidCredential {
                status: reqwest::StatusCode::UNAUTHORIZED,
                error_body: "bad key".to_string(),
            },
            ServiceError::TransportError("connection refused".to_string()),
            ServiceError::EmptyResponse,
            ServiceError::DecodeError("expected value".to_string()),
        ];
        for error in errors {
            let mut app = App::new();
            let ticket = app.submit("apple").unwrap();
            app.complete(&ticket, Err(error));
            assert_eq!(app.state(), &AppState::Failure(GENERIC_ERROR_MESSAGE.to_string()));
        }
    }

    #[test]
    fn test_stale_completion_is_discarded() {
        let mut app = App::new();
        let slow = app.submit("slow soup").unwrap();
        let fast = app.submit("avocado toast").unwrap();

        assert!(app.complete(&fast, Ok(avocado_toast())));
        assert!(!app.complete(&slow, Err(ServiceError::EmptyResponse)));
        assert_eq!(app.state(), &AppState::Success(avocado_toast()));
    }

    #[test]
    fn test_stale_completion_does_not_end_loading() {
        let mut app = App::new();
        let old = app.submit("first").unwrap();
        let new = app.submit("second").unwrap();
        assert!(!app.complete(&old, Ok(avocado_toast())));
        assert_eq!(app.state(), &AppState::Loading { request_id: new.request_id });
    }

    #[tokio::test]
    async fn test_run_query_avocado_toast() {
        let analyzer = ScriptedAnalyzer::new(vec![Ok(avocado_toast())]);
        let mut app = App::new();
        let state = app.run_query(&analyzer, "avocado toast").await;
        match state {
            AppState::Success(record) => assert_eq!(record.calories, 250.0),
            other => panic!("expected success, got {:?}", other),
        }
        assert_eq!(*analyzer.calls.lock().unwrap(), vec!["avocado toast".to_string()]);
    }

    #[tokio::test]
    async fn test_run_query_brick() {
        let analyzer = ScriptedAnalyzer::new(vec![Ok(not_food())]);
        let mut app = App::new();
        let state = app.run_query(&analyzer, "brick").await;
        assert_eq!(state, &AppState::Failure(INVALID_FOOD_MESSAGE.to_string()));
    }

    #[tokio::test]
    async fn test_run_query_blank_skips_analyzer() {
        let analyzer = ScriptedAnalyzer::new(vec![]);
        let mut app = App::new();
        let state = app.run_query(&analyzer, "   ").await;
        assert_eq!(state, &AppState::Idle);
        assert!(analyzer.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failure_streak_resets_on_success() {
        let analyzer = ScriptedAnalyzer::new(vec![
            Err(ServiceError::EmptyResponse),
            Err(ServiceError::TransportError("timeout".to_string())),
            Ok(avocado_toast()),
        ]);
        let mut app = App::new();
        app.run_query(&analyzer, "a").await;
        app.run_query(&analyzer, "b").await;
        assert_eq!(app.consecutive_failures, 2);
        app.run_query(&analyzer, "c").await;
        assert_eq!(app.consecutive_failures, 0);
        assert!(matches!(app.state(), AppState::Success(_)));
    }
}
