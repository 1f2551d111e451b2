use chatrelay::agent::{
    AgentManager, ContextWindow, ConversationTurn, Dispatcher, IntentClassifier, IntentKind,
    MessagePipeline,
};
use chatrelay::store::{ConversationStore, SqliteConversationStore};
use chatrelay::tools::DevinClient;
use std::sync::Arc;
use tempfile::TempDir;

fn agent(window: usize, locale: &str) -> Arc<AgentManager> {
    let tools = Arc::new(DevinClient::new(None, "http://127.0.0.1:9", 1));
    let classifier = IntentClassifier::new().expect("built-in rules should compile");
    Arc::new(
        AgentManager::new(classifier, Dispatcher::new(tools).with_locale(locale))
            .with_window(ContextWindow::new(window)),
    )
}

async fn sqlite_store(dir: &TempDir) -> Arc<dyn ConversationStore> {
    let store = SqliteConversationStore::open(&dir.path().join("conversations.db"))
        .await
        .expect("sqlite store should open");
    Arc::new(store)
}

#[tokio::test]
async fn conversation_survives_store_reopen() {
    let dir = TempDir::new().expect("temp dir should be created");

    {
        let pipeline = MessagePipeline::new(agent(10, "en"), sqlite_store(&dir).await);
        let reply = pipeline.handle("U1", "hello").await;
        assert_eq!(reply, "Hello! How can I assist you today?");
        pipeline.handle("U1", "What is Rust?").await;
    }

    let store = sqlite_store(&dir).await;
    let state = store.get("U1").await;
    assert_eq!(state.user_id, "U1");
    assert_eq!(state.context.len(), 4);
    assert_eq!(state.context[0], ConversationTurn::user("hello"));
    assert_eq!(state.last_intent, Some(IntentKind::Question));

    assert!(store.get("someone-else").await.context.is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_messages_for_one_user_are_all_kept() {
    let dir = TempDir::new().expect("temp dir should be created");
    let store = sqlite_store(&dir).await;
    let pipeline = Arc::new(MessagePipeline::new(agent(20, "en"), Arc::clone(&store)));

    let tasks: Vec<_> = (0..6)
        .map(|i| {
            let pipeline = Arc::clone(&pipeline);
            tokio::spawn(async move { pipeline.handle("U1", &format!("note {i}")).await })
        })
        .collect();
    for task in tasks {
        task.await.expect("pipeline task should not panic");
    }

    let state = store.get("U1").await;
    assert_eq!(state.context.len(), 12);
}

#[tokio::test]
async fn window_caps_history() {
    let dir = TempDir::new().expect("temp dir should be created");
    let store = sqlite_store(&dir).await;
    let pipeline = MessagePipeline::new(agent(4, "en"), Arc::clone(&store));

    for i in 0..5 {
        pipeline.handle("U1", &format!("line {i}")).await;
    }

    let context = store.get("U1").await.context;
    assert_eq!(context.len(), 4);
    assert_eq!(context[0], ConversationTurn::user("line 3"));
}

#[tokio::test]
async fn japanese_replies_follow_locale() {
    let dir = TempDir::new().expect("temp dir should be created");
    let pipeline = MessagePipeline::new(agent(10, "ja"), sqlite_store(&dir).await);
    assert_eq!(
        pipeline.handle("U1", "bye").await,
        "さようなら！いつでもお気軽にメッセージをお送りください。"
    );
}
