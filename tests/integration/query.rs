use gemini_bot::cog::KEY_NOT_SET_MESSAGE;
use gemini_bot::utils::gemini_client::GeminiError;
use pretty_assertions::assert_eq;

use crate::common::fixtures::{SAMPLE_ANSWER, SAMPLE_QUERY};
use crate::common::mocks::{MockGenerator, unreachable_generator};
use crate::common::{cog_with, memory_store};
use crate::test_utils;

#[tokio::test]
async fn test_query_without_key_never_calls_api() {
    test_utils::init();
    let cog = cog_with(memory_store(), unreachable_generator());

    let reply = cog.query(SAMPLE_QUERY).await;

    assert_eq!(reply, KEY_NOT_SET_MESSAGE);
}

#[tokio::test]
async fn test_query_relays_text_verbatim() {
    test_utils::init();
    let store = memory_store();
    store.set_api_key("stored-key").unwrap();

    let mut generator = MockGenerator::new();
    generator
        .expect_generate()
        .times(1)
        .returning(|api_key, prompt| {
            assert_eq!(api_key, "stored-key");
            assert_eq!(prompt, SAMPLE_QUERY);
            Ok(SAMPLE_ANSWER.to_string())
        });
    let cog = cog_with(store, generator);

    assert_eq!(cog.query(SAMPLE_QUERY).await, SAMPLE_ANSWER);
}

#[tokio::test]
async fn test_query_failure_becomes_chat_text() {
    test_utils::init();
    let store = memory_store();
    store.set_api_key("stored-key").unwrap();

    let mut generator = MockGenerator::new();
    generator
        .expect_generate()
        .times(1)
        .returning(|_, _| Err(GeminiError::Blocked("SAFETY".to_string())));
    let cog = cog_with(store, generator);

    let reply = cog.query(SAMPLE_QUERY).await;

    assert_eq!(reply, "An error occurred: The prompt was blocked (SAFETY)");
}

#[tokio::test]
async fn test_query_reads_key_at_call_time() {
    test_utils::init();
    let store = memory_store();

    let mut generator = MockGenerator::new();
    generator
        .expect_generate()
        .times(1)
        .returning(|api_key, _| Ok(format!("used {api_key}")));
    let cog = cog_with(store.clone(), generator);

    assert_eq!(cog.query("first").await, KEY_NOT_SET_MESSAGE);

    store.set_api_key("late-key").unwrap();
    assert_eq!(cog.query("second").await, "used late-key");
}
