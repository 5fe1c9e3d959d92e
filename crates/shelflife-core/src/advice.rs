use async_trait::async_trait;
use tracing::{debug, warn};

use crate::models::Product;
use crate::Result;

pub const MISSING_KEY_MESSAGE: &str = "Please configure your API Key to get AI advice.";
pub const FAILURE_MESSAGE: &str =
    "Sorry, I couldn't fetch advice at this moment. Please check your internet connection.";
pub const EMPTY_MESSAGE: &str = "No advice available.";

/// Category name used for free-form questions that aren't about a tracked product
pub const GENERAL_CATEGORY: &str = "General";

/// Anything that can turn a prompt into advice text
///
/// The Gemini client is the real one; tests swap in a mock.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AdviceProvider: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String>;
}

/// Prompt for one product
pub fn build_prompt(product_name: &str, category: &str, is_expired: bool) -> String {
    let state = if is_expired {
        "currently EXPIRED"
    } else {
        "expiring soon"
    };

    format!(
        "I have a product: \"{product_name}\" (Category: {category}).\n\
         It is {state}.\n\
         \n\
         Please provide brief, bulleted advice on:\n\
         1. Is it safe to use?\n\
         2. How to properly dispose of it if needed.\n\
         3. Storage tips to prolong life (if not expired).\n\
         \n\
         Keep the tone helpful and concise (max 150 words). Format as Markdown."
    )
}

/// How one advice request ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdviceOutcome {
    /// The service answered with this text
    Advice(String),
    /// No API key, nothing was sent
    Unconfigured,
    /// The call failed; the detail is for logs, not for the user
    Failed(String),
}

impl AdviceOutcome {
    /// What to show the user
    pub fn message(&self) -> &str {
        match self {
            AdviceOutcome::Advice(text) => text,
            AdviceOutcome::Unconfigured => MISSING_KEY_MESSAGE,
            AdviceOutcome::Failed(_) => FAILURE_MESSAGE,
        }
    }
}

/// Front door for advice requests
///
/// One attempt per request, no retries. Every failure ends as an
/// [`AdviceOutcome`], never as an error.
pub struct Advisor {
    provider: Option<Box<dyn AdviceProvider>>,
}

impl Advisor {
    pub fn new(provider: Box<dyn AdviceProvider>) -> Self {
        Self {
            provider: Some(provider),
        }
    }

    /// Advisor without credentials - always answers with the setup hint
    pub fn unconfigured() -> Self {
        Self { provider: None }
    }

    pub fn is_configured(&self) -> bool {
        self.provider.is_some()
    }

    pub async fn request(
        &self,
        product_name: &str,
        category: &str,
        is_expired: bool,
    ) -> AdviceOutcome {
        let Some(provider) = &self.provider else {
            warn!("No API key configured, skipping advice request");
            return AdviceOutcome::Unconfigured;
        };

        let prompt = build_prompt(product_name, category, is_expired);
        debug!("Asking for advice on {} (expired: {})", product_name, is_expired);

        match provider.generate(&prompt).await {
            Ok(text) if text.trim().is_empty() => AdviceOutcome::Advice(EMPTY_MESSAGE.to_string()),
            Ok(text) => AdviceOutcome::Advice(text),
            Err(e) => {
                warn!("Advice request failed: {}", e);
                AdviceOutcome::Failed(e.to_string())
            }
        }
    }

    /// Advice for a tracked product, expired-ness decided by the caller's classification
    pub async fn advise(&self, product: &Product, is_expired: bool) -> AdviceOutcome {
        self.request(&product.name, product.category.as_str(), is_expired)
            .await
    }

    /// Free-form question with no product attached
    pub async fn ask(&self, question: &str) -> AdviceOutcome {
        self.request(question, GENERAL_CATEGORY, false).await
    }
}

/// Where the advice panel is at
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AdviceState {
    #[default]
    Idle,
    Pending {
        product_id: String,
    },
    Ready {
        product_id: String,
        text: String,
    },
    Failed {
        product_id: String,
        message: String,
    },
    Unconfigured {
        product_id: String,
    },
}

impl AdviceState {
    pub fn is_pending(&self) -> bool {
        matches!(self, AdviceState::Pending { .. })
    }

    /// Text to display, if there is any yet
    pub fn message(&self) -> Option<&str> {
        match self {
            AdviceState::Idle | AdviceState::Pending { .. } => None,
            AdviceState::Ready { text, .. } => Some(text),
            AdviceState::Failed { message, .. } => Some(message),
            AdviceState::Unconfigured { .. } => Some(MISSING_KEY_MESSAGE),
        }
    }
}

/// Request bookkeeping for the advice panel.
///
/// At most one request is outstanding. Asking again for the product that's
/// already pending is refused; asking about another product supersedes the
/// pending one, and the superseded answer is dropped when it arrives.
#[derive(Debug, Default)]
pub struct AdviceSession {
    state: AdviceState,
}

impl AdviceSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &AdviceState {
        &self.state
    }

    /// Mark a request for `product_id` as started. `false` means one is
    /// already in flight for it and nothing should be sent.
    pub fn begin(&mut self, product_id: &str) -> bool {
        if let AdviceState::Pending { product_id: pending } = &self.state {
            if pending == product_id {
                debug!("Advice for {} already pending", product_id);
                return false;
            }
        }

        self.state = AdviceState::Pending {
            product_id: product_id.to_string(),
        };
        true
    }

    /// Record the outcome. Returns `false` (and changes nothing) if the answer
    /// is for a request that's no longer the pending one.
    pub fn complete(&mut self, product_id: &str, outcome: AdviceOutcome) -> bool {
        match &self.state {
            AdviceState::Pending { product_id: pending } if pending == product_id => {}
            _ => {
                debug!("Dropping stale advice for {}", product_id);
                return false;
            }
        }

        let product_id = product_id.to_string();
        self.state = match outcome {
            AdviceOutcome::Advice(text) => AdviceState::Ready { product_id, text },
            AdviceOutcome::Unconfigured => AdviceState::Unconfigured { product_id },
            AdviceOutcome::Failed(_) => AdviceState::Failed {
                product_id,
                message: FAILURE_MESSAGE.to_string(),
            },
        };
        true
    }

    /// Begin, run and complete one request for `product`
    pub async fn run(
        &mut self,
        advisor: &Advisor,
        product: &Product,
        is_expired: bool,
    ) -> &AdviceState {
        if self.begin(&product.id) {
            let outcome = advisor.advise(product, is_expired).await;
            self.complete(&product.id, outcome);
        }
        &self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, StorageLocation};
    use chrono::NaiveDate;

    fn product(id: &str) -> Product {
        Product {
            id: id.to_string(),
            name: "Cough Syrup".to_string(),
            category: Category::Medicine,
            expiry_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            location: StorageLocation::MedicineCabinet,
            opened_date: None,
            image: None,
        }
    }

    #[test]
    fn test_prompt_mentions_product_and_state() {
        let prompt = build_prompt("Cough Syrup", "Medicine", true);
        assert!(prompt.contains("\"Cough Syrup\" (Category: Medicine)"));
        assert!(prompt.contains("currently EXPIRED"));
        assert!(prompt.contains("max 150 words"));

        let prompt = build_prompt("Cough Syrup", "Medicine", false);
        assert!(prompt.contains("expiring soon"));
        assert!(!prompt.contains("EXPIRED"));
    }

    #[tokio::test]
    async fn test_unconfigured_never_calls_out() {
        let advisor = Advisor::unconfigured();
        let outcome = advisor.advise(&product("1"), true).await;

        assert_eq!(outcome, AdviceOutcome::Unconfigured);
        assert_eq!(outcome.message(), MISSING_KEY_MESSAGE);
    }

    #[tokio::test]
    async fn test_provider_text_is_returned() {
        let mut provider = MockAdviceProvider::new();
        provider
            .expect_generate()
            .withf(|prompt: &str| prompt.contains("currently EXPIRED"))
            .times(1)
            .returning(|_| Ok("- Do not use it.".to_string()));

        let advisor = Advisor::new(Box::new(provider));
        let outcome = advisor.advise(&product("1"), true).await;

        assert_eq!(outcome.message(), "- Do not use it.");
    }

    #[tokio::test]
    async fn test_provider_failure_becomes_fallback() {
        let mut provider = MockAdviceProvider::new();
        provider
            .expect_generate()
            .times(1)
            .returning(|_| Err(crate::Error::AdviceError("timeout".into())));

        let advisor = Advisor::new(Box::new(provider));
        let outcome = advisor.ask("Is old sunscreen OK?").await;

        assert!(matches!(outcome, AdviceOutcome::Failed(_)));
        assert_eq!(outcome.message(), FAILURE_MESSAGE);
    }

    #[tokio::test]
    async fn test_blank_answer_becomes_no_advice() {
        let mut provider = MockAdviceProvider::new();
        provider
            .expect_generate()
            .returning(|_| Ok("  \n".to_string()));

        let advisor = Advisor::new(Box::new(provider));
        assert_eq!(advisor.ask("anything").await.message(), EMPTY_MESSAGE);
    }

    #[test]
    fn test_session_refuses_duplicate_pending() {
        let mut session = AdviceSession::new();

        assert!(session.begin("1"));
        assert!(!session.begin("1"));
        assert!(session.state().is_pending());
        assert_eq!(session.state().message(), None);
    }

    #[test]
    fn test_session_drops_superseded_answer() {
        let mut session = AdviceSession::new();

        assert!(session.begin("1"));
        assert!(session.begin("2"));

        assert!(!session.complete("1", AdviceOutcome::Advice("old".into())));
        assert!(session.state().is_pending());

        assert!(session.complete("2", AdviceOutcome::Advice("fresh".into())));
        assert_eq!(session.state().message(), Some("fresh"));
    }

    #[test]
    fn test_session_failure_shows_fallback() {
        let mut session = AdviceSession::new();
        session.begin("1");
        session.complete("1", AdviceOutcome::Failed("dns".into()));

        assert_eq!(session.state().message(), Some(FAILURE_MESSAGE));
        // A finished request can be re-issued by hand
        assert!(session.begin("1"));
    }

    #[tokio::test]
    async fn test_session_run() {
        let mut session = AdviceSession::new();
        let state = session.run(&Advisor::unconfigured(), &product("9"), false).await;

        assert_eq!(
            state,
            &AdviceState::Unconfigured {
                product_id: "9".to_string()
            }
        );
    }
}
