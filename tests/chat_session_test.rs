use serde_json::json;
use shopchat::chat::run_chat_session;
use shopchat::{constants, ChatWidget, WidgetConfig};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn run(widget: &ChatWidget, script: &str) -> String {
    let mut out = Vec::new();
    run_chat_session(widget, "₹", script.as_bytes(), &mut out).await.unwrap();
    String::from_utf8(out).unwrap()
}

#[test_log::test(tokio::test)]
async fn test_session_prints_replies_products_and_cart_ack() {
    let backend = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .and(body_json(json!({"message": "show shoes"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "reply": "Here are some footwear items:<br>",
            "products": [{"id": 1, "name": "Shoe", "price": 999, "offer": "10% off"}]
        })))
        .expect(1)
        .mount(&backend)
        .await;
    Mock::given(method("POST"))
        .and(path("/add_to_cart"))
        .and(body_json(json!({"id": 1})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&backend)
        .await;

    let widget = ChatWidget::new(&WidgetConfig::new(backend.uri()));
    let output = run(&widget, "show shoes\n/add 1\n/quit\nnever sent\n").await;

    assert!(output.contains(&format!("Bot: {}", constants::GREETING)));
    assert!(output.contains("You: show shoes"));
    assert!(output.contains("Bot: Here are some footwear items:"));
    assert!(output.contains("Bot: Shoe - ₹999 (10% off) [id: 1]"));
    assert!(output.contains(&format!("Bot: {}", constants::CART_ADDED)));
    assert!(!output.contains("never sent"));
}

#[test_log::test(tokio::test)]
async fn test_session_clear_reprints_greeting() {
    let widget = ChatWidget::new(&WidgetConfig::new("http://127.0.0.1:1"));
    let output = run(&widget, "hello\n\n/clear\n").await;

    assert!(output.contains("You: hello"));
    assert!(output.contains(&format!("Bot: {}", constants::CONNECTION_ERROR)));
    assert_eq!(output.matches(constants::GREETING).count(), 2);
    assert_eq!(widget.transcript_len(), 1);
}
