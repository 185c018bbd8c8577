//! Two-step wallet onboarding: register under the referral code, then
//! activate the node.

use std::sync::Arc;

use chrono::Utc;
use reqwest::Method;
use serde_json::{json, Value};
use tracing::{debug, instrument};

use crate::error::{MscoreError, Result};
use crate::proxy::RequestDispatcher;
use crate::services::progress::{NoopProgress, ProgressEvent, ProgressReporter};

pub const REGISTER_PATH: &str = "/user";
pub const ACTIVATE_PATH: &str = "/user/update-start-time";

/// Service responses for both onboarding steps
#[derive(Debug, Clone)]
pub struct Onboarded {
    pub registration: Value,
    pub activation: Value,
}

pub struct WalletOnboarding {
    dispatcher: Arc<RequestDispatcher>,
    referral_code: Option<String>,
}

impl WalletOnboarding {
    pub fn new(dispatcher: Arc<RequestDispatcher>, referral_code: Option<String>) -> Self {
        Self {
            dispatcher,
            referral_code: referral_code.filter(|c| !c.trim().is_empty()),
        }
    }

    pub fn referral_code(&self) -> Option<&str> {
        self.referral_code.as_deref()
    }

    /// `POST /user` with `{wallet, invite}`; fails fast without a referral code
    pub async fn register(&self, address: &str) -> Result<Value> {
        let code = self
            .referral_code
            .as_deref()
            .ok_or(MscoreError::MissingReferralCode)?;

        self.dispatcher
            .dispatch(
                Method::POST,
                REGISTER_PATH,
                json!({ "wallet": address, "invite": code }),
            )
            .await
    }

    /// `PUT /user/update-start-time` stamped with the current epoch millis
    pub async fn activate(&self, address: &str) -> Result<Value> {
        let start_time = Utc::now().timestamp_millis();

        self.dispatcher
            .dispatch(
                Method::PUT,
                ACTIVATE_PATH,
                json!({ "wallet": address, "startTime": start_time }),
            )
            .await
    }

    /// Register, then activate. Activation is never attempted after a failed registration.
    pub async fn onboard(&self, address: &str) -> Result<Onboarded> {
        self.onboard_reporting(address, &NoopProgress).await
    }

    /// [`onboard`](Self::onboard), reporting each completed step
    #[instrument(skip(self, progress))]
    pub async fn onboard_reporting(
        &self,
        address: &str,
        progress: &dyn ProgressReporter,
    ) -> Result<Onboarded> {
        let registration = self.register(address).await?;
        debug!("Registration response: {}", registration);
        progress.report(&ProgressEvent::Registered);

        let activation = self.activate(address).await?;
        debug!("Activation response: {}", activation);
        progress.report(&ProgressEvent::Activated);

        Ok(Onboarded {
            registration,
            activation,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proxy::dispatcher::tests::{FakeTransport, FakeValidator};
    use crate::proxy::{DispatcherConfig, ProxyPool};

    const ADDRESS: &str = "0x52908400098527886E0F7030069857D2E4169EE7";

    fn onboarding(transport: Arc<FakeTransport>, code: Option<&str>) -> WalletOnboarding {
        let dispatcher = RequestDispatcher::new(
            Arc::new(ProxyPool::direct()),
            Arc::new(FakeValidator::default()),
            transport,
            DispatcherConfig::default(),
        );
        WalletOnboarding::new(Arc::new(dispatcher), code.map(str::to_string))
    }

    #[tokio::test]
    async fn test_register_without_code_fails_fast() {
        let transport = Arc::new(FakeTransport::default());
        let onboarding = onboarding(transport.clone(), None);

        let result = onboarding.register(ADDRESS).await;

        assert!(matches!(result, Err(MscoreError::MissingReferralCode)));
        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test]
    async fn test_blank_code_counts_as_missing() {
        let onboarding = onboarding(Arc::new(FakeTransport::default()), Some("   "));
        assert!(onboarding.referral_code().is_none());
    }

    #[tokio::test]
    async fn test_onboard_registers_then_activates() {
        let transport = Arc::new(FakeTransport::default());
        let onboarding = onboarding(transport.clone(), Some("INVITE1"));

        let before = Utc::now().timestamp_millis();
        onboarding.onboard(ADDRESS).await.unwrap();

        let calls = transport.calls.lock().unwrap();
        assert_eq!(calls.len(), 2);

        assert_eq!(calls[0].0, "POST");
        assert_eq!(calls[0].1, REGISTER_PATH);
        assert_eq!(calls[0].3, json!({"wallet": ADDRESS, "invite": "INVITE1"}));

        assert_eq!(calls[1].0, "PUT");
        assert_eq!(calls[1].1, ACTIVATE_PATH);
        assert_eq!(calls[1].3["wallet"], ADDRESS);
        assert!(calls[1].3["startTime"].as_i64().unwrap() >= before);
    }

    #[tokio::test]
    async fn test_activation_skipped_when_registration_fails() {
        let transport = Arc::new(FakeTransport::failing(4));
        let onboarding = onboarding(transport.clone(), Some("INVITE1"));

        let result = onboarding.onboard(ADDRESS).await;

        assert!(matches!(result, Err(MscoreError::ExhaustedRetries { .. })));
        let calls = transport.calls.lock().unwrap();
        assert_eq!(calls.len(), 4);
        assert!(calls.iter().all(|(_, path, _, _)| path == REGISTER_PATH));
    }

    #[tokio::test]
    async fn test_activation_failure_aborts_onboarding() {
        // Registration succeeds, then four failed activation calls.
        let transport = Arc::new(FakeTransport::default());
        {
            let mut script = transport.script.lock().unwrap();
            script.push_back(Ok(json!({"success": true})));
            for i in 0..4 {
                script.push_back(Err(MscoreError::RequestFailed(format!("down {}", i))));
            }
        }
        let onboarding = onboarding(transport.clone(), Some("INVITE1"));

        let result = onboarding.onboard(ADDRESS).await;

        assert!(matches!(result, Err(MscoreError::ExhaustedRetries { .. })));
        assert_eq!(transport.call_count(), 5);
    }
}
