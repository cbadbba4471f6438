use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use assert_matches::assert_matches;
use gemini_bot::cog::{GeminiCog, KeyUpdateError, mask_key};
use gemini_bot::utils::database::ConfigStore;
use pretty_assertions::assert_eq;
use rstest::*;

use crate::common::fixtures::random_api_key;
use crate::common::mocks::{MockGenerator, unreachable_generator};
use crate::common::{administrator, cog_with, memory_store, regular_member};

#[fixture]
fn store() -> Arc<ConfigStore> {
    memory_store()
}

fn cog(store: &Arc<ConfigStore>) -> GeminiCog<MockGenerator> {
    cog_with(store.clone(), unreachable_generator())
}

#[rstest]
#[tokio::test]
async fn test_inline_key_round_trip(store: Arc<ConfigStore>) {
    let cog = cog(&store);
    let key = random_api_key();

    let masked = cog
        .set_key(&administrator(), Some(key.clone()), futures::future::pending())
        .await
        .unwrap();

    assert_eq!(masked, mask_key(&key));
    assert_eq!(store.api_key().unwrap(), Some(key));
}

#[rstest]
#[tokio::test]
async fn test_follow_up_key_round_trip(store: Arc<ConfigStore>) {
    let cog = cog(&store);
    let key = random_api_key();
    let reply = key.clone();

    cog.set_key(&administrator(), None, async move { Some(reply) })
        .await
        .unwrap();

    assert_eq!(store.api_key().unwrap(), Some(key));
}

#[rstest]
#[tokio::test]
async fn test_set_key_overwrites(store: Arc<ConfigStore>) {
    let cog = cog(&store);
    store.set_api_key("old-key").unwrap();

    cog.set_key(&administrator(), Some("new-key".to_string()), futures::future::pending())
        .await
        .unwrap();

    assert_eq!(store.api_key().unwrap(), Some("new-key".to_string()));
}

#[rstest]
#[tokio::test]
async fn test_non_admin_rejected_before_mutation(store: Arc<ConfigStore>) {
    let cog = cog(&store);
    store.set_api_key("existing-key").unwrap();
    let polled = AtomicBool::new(false);

    let inline = cog
        .set_key(&regular_member(), Some("hijack".to_string()), futures::future::pending())
        .await;
    let prompted = cog
        .set_key(&regular_member(), None, async {
            polled.store(true, Ordering::SeqCst);
            Some("hijack".to_string())
        })
        .await;

    assert_matches!(inline, Err(KeyUpdateError::NotAdministrator));
    assert_matches!(prompted, Err(KeyUpdateError::NotAdministrator));
    assert!(!polled.load(Ordering::SeqCst), "follow-up should never be awaited");
    assert_eq!(store.api_key().unwrap(), Some("existing-key".to_string()));
}

#[rstest]
#[tokio::test]
async fn test_timeout_leaves_key_unchanged(store: Arc<ConfigStore>) {
    let cog = cog(&store);
    store.set_api_key("existing-key").unwrap();

    let result = cog
        .set_key(&administrator(), None, futures::future::pending())
        .await;

    assert_matches!(result, Err(KeyUpdateError::TimedOut));
    assert_eq!(
        result.unwrap_err().to_string(),
        "Timed out waiting for the API key."
    );
    assert_eq!(store.api_key().unwrap(), Some("existing-key".to_string()));
}

#[rstest]
#[tokio::test]
async fn test_timeout_with_no_prior_key(store: Arc<ConfigStore>) {
    let cog = cog(&store);

    let result = cog
        .set_key(&administrator(), None, futures::future::pending())
        .await;

    assert_matches!(result, Err(KeyUpdateError::TimedOut));
    assert_eq!(store.api_key().unwrap(), None);
}
