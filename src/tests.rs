use super::*;
use crate::api::CONNECTION_ERROR;
use crate::request::MockHttpClient;
use crate::web::surface::{ErrorSlot, FormId, HistoryView, Icon, MemorySurface, ToastKind};
use fraudwatch_shared::{FEATURE_COUNT, FEATURE_NAMES, Verdict};
use serde_json::{Value, json};
use std::time::Duration;

// =========================================================
// 辅助函数
// =========================================================

const BASE: &str = "http://test/api";
const LOGIN: &str = "http://test/api/login";
const REGISTER: &str = "http://test/api/register";
const LOGOUT: &str = "http://test/api/logout";
const CHECK: &str = "http://test/api/check-auth";
const PREDICT: &str = "http://test/api/predict";
const HISTORY: &str = "http://test/api/history";

type TestApp = App<Rc<MockHttpClient>>;

fn create_app(initial: &str) -> (Rc<MockHttpClient>, Rc<MemorySurface>, TestApp) {
    let client = Rc::new(MockHttpClient::new());
    let surface = Rc::new(MemorySurface::new());
    let config = ClientConfig::new(BASE).with_redirect_delay(Duration::ZERO);
    let app = App::new(client.clone(), config, surface.clone(), initial);
    (client, surface, app)
}

async fn logged_in_app() -> (Rc<MockHttpClient>, Rc<MemorySurface>, TestApp) {
    let (client, surface, app) = create_app("");
    app.dispatch().await;
    client.mock_response(LOGIN, 200, json!({"status": "success"}));
    client.mock_response(CHECK, 200, json!({}));
    app.submit_login(Credentials::new("ana", "secret")).await;
    assert_eq!(app.current_view(), Some(AppRoute::Dashboard));
    (client, surface, app)
}

// =========================================================
// 路由与守卫
// =========================================================

#[tokio::test]
async fn test_empty_fragment_shows_login_without_auth_check() {
    let (client, surface, app) = create_app("");
    app.dispatch().await;

    assert_eq!(app.current_view(), Some(AppRoute::Login));
    assert_eq!(client.count(CHECK), 0);
    let screen = surface.snapshot();
    assert!(!screen.navigation_visible);
    assert_eq!(screen.page_log, vec![AppRoute::Login]);
}

#[tokio::test]
async fn test_register_view_is_public() {
    let (client, _surface, app) = create_app("#register");
    app.dispatch().await;

    assert_eq!(app.current_view(), Some(AppRoute::Register));
    assert_eq!(client.count(CHECK), 0);
}

#[tokio::test]
async fn test_unknown_fragments_resolve_to_login() {
    for fragment in ["#settings", "#DASHBOARD", "#history/1", "##login"] {
        let (client, surface, app) = create_app(fragment);
        client.mock_response(CHECK, 401, json!({}));
        app.dispatch().await;

        assert_eq!(app.current_view(), Some(AppRoute::Login), "{fragment}");
        assert_eq!(app.fragment(), "#login");
        assert_eq!(surface.snapshot().page_log, vec![AppRoute::Login]);
    }
}

#[tokio::test]
async fn test_unknown_fragment_redirects_even_when_authenticated() {
    let (client, surface, app) = create_app("#admin");
    client.mock_response(CHECK, 200, json!({}));
    app.dispatch().await;

    // 未识别的名称先经过认证检查，再走失败分支
    assert_eq!(client.count(CHECK), 1);
    assert_eq!(app.current_view(), Some(AppRoute::Login));
    assert_eq!(surface.snapshot().page_log, vec![AppRoute::Login]);
}

#[tokio::test]
async fn test_protected_views_redirect_without_session() {
    for route in [AppRoute::Dashboard, AppRoute::History] {
        let (client, surface, app) = create_app(route.fragment());
        client.mock_response(CHECK, 401, json!({"error": "login required"}));
        app.dispatch().await;

        let screen = surface.snapshot();
        assert_eq!(screen.page_log, vec![AppRoute::Login]);
        assert!(!screen.navigation_visible);
        assert!(screen.history_log.is_empty());
        assert!(screen.fields.is_empty());
        assert_eq!(client.count(HISTORY), 0);
        assert_eq!(app.session_state(), SessionState::Unauthenticated);
    }
}

#[tokio::test]
async fn test_backend_unreachable_redirects_to_login() {
    let (client, _surface, app) = create_app("#dashboard");
    client.mock_network_failure(CHECK);
    app.dispatch().await;

    assert_eq!(app.current_view(), Some(AppRoute::Login));
}

#[tokio::test]
async fn test_reload_with_valid_session_shows_protected_view() {
    let (client, surface, app) = create_app("#dashboard");
    client.mock_response(CHECK, 200, json!({}));
    app.dispatch().await;

    assert_eq!(app.current_view(), Some(AppRoute::Dashboard));
    assert!(surface.snapshot().navigation_visible);
    assert_eq!(app.session_state(), SessionState::Authenticated);
}

#[tokio::test]
async fn test_every_protected_navigation_revalidates() {
    let (client, _surface, app) = logged_in_app().await;
    client.mock_response(HISTORY, 200, json!([]));
    // 第三次检查时会话已在后端过期
    client.mock_response(CHECK, 200, json!({}));
    client.mock_response(CHECK, 401, json!({}));

    app.show_history().await;
    app.show_dashboard().await;
    assert_eq!(client.count(CHECK), 2);
    assert_eq!(app.current_view(), Some(AppRoute::Dashboard));

    app.show_history().await;
    assert_eq!(client.count(CHECK), 3);
    assert_eq!(app.current_view(), Some(AppRoute::Login));
    assert_eq!(app.session_state(), SessionState::Unauthenticated);
}

// =========================================================
// 登录 / 注册 / 注销
// =========================================================

#[tokio::test]
async fn test_login_goes_to_dashboard_without_extra_round_trip() {
    let (client, surface, app) = create_app("");
    app.dispatch().await;
    client.mock_response(LOGIN, 200, json!({"status": "success"}));

    app.submit_login(Credentials::new("ana", "secret")).await;

    assert_eq!(app.session_state(), SessionState::Authenticated);
    assert_eq!(app.fragment(), "#dashboard");
    assert_eq!(app.current_view(), Some(AppRoute::Dashboard));
    assert_eq!(client.count(CHECK), 0);

    let screen = surface.snapshot();
    assert!(screen.navigation_visible);
    assert_eq!(screen.fields.len(), FEATURE_COUNT);
    assert!(!screen.disabled.contains(&FormId::Login));
}

#[tokio::test]
async fn test_login_failure_shows_backend_message() {
    let (client, surface, app) = create_app("");
    app.dispatch().await;
    client.mock_response(
        LOGIN,
        401,
        json!({"status": "error", "message": "Invalid username or password"}),
    );

    app.submit_login(Credentials::new("ana", "wrong")).await;

    let screen = surface.snapshot();
    assert_eq!(
        screen.errors.get(&ErrorSlot::Login).map(String::as_str),
        Some("Invalid username or password")
    );
    assert!(!screen.disabled.contains(&FormId::Login));
    assert_eq!(app.session_state(), SessionState::Unknown);
    assert_eq!(app.current_view(), Some(AppRoute::Login));
}

#[tokio::test]
async fn test_login_failure_falls_back_to_generic_message() {
    let (client, surface, app) = create_app("");
    app.dispatch().await;
    client.mock_raw(LOGIN, 500, "Internal Server Error", 0);

    app.submit_login(Credentials::new("ana", "pw")).await;
    assert_eq!(
        surface.snapshot().errors.get(&ErrorSlot::Login).map(String::as_str),
        Some("Invalid username or password")
    );
}

#[tokio::test]
async fn test_login_connection_failure_shows_transport_message() {
    let (client, surface, app) = create_app("");
    app.dispatch().await;
    client.mock_network_failure(LOGIN);

    app.submit_login(Credentials::new("ana", "pw")).await;
    assert_eq!(
        surface.snapshot().errors.get(&ErrorSlot::Login).map(String::as_str),
        Some(CONNECTION_ERROR)
    );
}

#[tokio::test]
async fn test_register_requires_exact_201() {
    let (client, surface, app) = create_app("#register");
    app.dispatch().await;
    client.mock_response(
        REGISTER,
        200,
        json!({"message": "User registered successfully"}),
    );

    app.submit_register(Credentials::new("bo", "pw")).await;

    let screen = surface.snapshot();
    assert!(screen.toasts.is_empty());
    assert_eq!(
        screen.errors.get(&ErrorSlot::Register).map(String::as_str),
        Some("User registered successfully")
    );
    assert_eq!(app.current_view(), Some(AppRoute::Register));
    assert!(!screen.disabled.contains(&FormId::Register));
}

#[tokio::test]
async fn test_register_created_toasts_then_redirects() {
    let (client, surface, app) = create_app("#register");
    app.dispatch().await;
    client.mock_response(
        REGISTER,
        201,
        json!({"message": "User registered successfully"}),
    );

    app.submit_register(Credentials::new("bo", "pw")).await;

    let screen = surface.snapshot();
    assert_eq!(
        screen.toasts,
        vec![(
            "Registration successful! Redirecting to login...".to_string(),
            ToastKind::Success
        )]
    );
    assert!(screen.errors.is_empty());
    assert_eq!(app.current_view(), Some(AppRoute::Login));
    // 注册不改变会话状态
    assert_eq!(app.session_state(), SessionState::Unknown);
}

#[tokio::test]
async fn test_register_failure_generic_message() {
    let (client, surface, app) = create_app("#register");
    app.dispatch().await;
    client.mock_raw(REGISTER, 400, "", 0);

    app.submit_register(Credentials::new("bo", "pw")).await;
    assert_eq!(
        surface.snapshot().errors.get(&ErrorSlot::Register).map(String::as_str),
        Some("Registration failed")
    );
}

#[tokio::test]
async fn test_logout_clears_session() {
    let (client, surface, app) = logged_in_app().await;
    client.mock_response(LOGOUT, 200, json!({"status": "success"}));

    app.logout().await;

    assert_eq!(app.session_state(), SessionState::Unauthenticated);
    assert_eq!(app.current_view(), Some(AppRoute::Login));
    let screen = surface.snapshot();
    assert!(!screen.navigation_visible);
    assert_eq!(
        screen.toasts.last(),
        Some(&("Logged out successfully".to_string(), ToastKind::Success))
    );
}

#[tokio::test]
async fn test_logout_failure_keeps_session() {
    let (client, surface, app) = logged_in_app().await;
    client.mock_network_failure(LOGOUT);

    app.logout().await;

    assert_eq!(app.session_state(), SessionState::Authenticated);
    assert_eq!(app.current_view(), Some(AppRoute::Dashboard));
    assert_eq!(
        surface.snapshot().toasts.last(),
        Some(&("Logout failed. Please try again.".to_string(), ToastKind::Error))
    );
}

// =========================================================
// 预测
// =========================================================

#[tokio::test]
async fn test_dashboard_fields_created_once_across_visits() {
    let (client, surface, app) = logged_in_app().await;
    client.mock_response(HISTORY, 200, json!([]));

    app.show_history().await;
    app.show_dashboard().await;

    let screen = surface.snapshot();
    assert_eq!(screen.field_renders, 1);
    assert_eq!(screen.fields.len(), FEATURE_COUNT);
}

#[tokio::test]
async fn test_blank_fields_sent_as_zero() {
    let (client, _surface, app) = logged_in_app().await;
    client.mock_response(
        PREDICT,
        200,
        json!({"is_fraud": false, "prediction_label": "Legitimate"}),
    );
    assert!(app.set_field("Time", "406"));
    assert!(app.set_field("V2", "-1.5"));
    assert!(app.set_field("V3", "abc"));

    app.submit_prediction().await;

    let body: Value = serde_json::from_str(&client.last_body(PREDICT).unwrap()).unwrap();
    let body = body.as_object().unwrap();
    assert_eq!(body.len(), FEATURE_COUNT);
    for name in FEATURE_NAMES {
        let expected = match name {
            "Time" => 406.0,
            "V2" => -1.5,
            _ => 0.0,
        };
        assert_eq!(body[name].as_f64(), Some(expected), "{name}");
    }
}

#[tokio::test]
async fn test_fraud_verdict_renders_alert_card() {
    let (client, surface, app) = logged_in_app().await;
    client.mock_response(
        PREDICT,
        200,
        json!({"is_fraud": true, "prediction_label": "Potential Fraud"}),
    );

    app.submit_prediction().await;

    let screen = surface.snapshot();
    let card = screen.result.expect("result card shown");
    assert_eq!(card.verdict, Verdict::Fraud);
    assert_eq!(card.message, "Potential Fraud");
    assert_eq!(card.title(), "Fraud Alert");
    assert_eq!(card.style(), "fraud-alert");
    assert_eq!(card.icon(), Icon::AlertCircle);
    assert!(!screen.disabled.contains(&FormId::Predict));

    app.close_result();
    assert!(surface.snapshot().result.is_none());
}

#[tokio::test]
async fn test_legitimate_verdict_renders_success_card() {
    let (client, surface, app) = logged_in_app().await;
    client.mock_response(
        PREDICT,
        200,
        json!({"is_fraud": false, "prediction_label": "Legitimate"}),
    );

    app.submit_prediction().await;

    let card = surface.snapshot().result.unwrap();
    assert_eq!(card.title(), "Legitimate Transaction");
    assert_eq!(card.icon(), Icon::CheckCircle);
}

#[tokio::test]
async fn test_prediction_failure_keeps_form() {
    let (client, surface, app) = logged_in_app().await;
    client.mock_response(PREDICT, 500, json!({"error": "Model not available"}));
    app.set_field("Amount", "250");

    app.submit_prediction().await;

    let screen = surface.snapshot();
    assert!(screen.result.is_none());
    assert_eq!(
        screen.toasts.last(),
        Some(&(
            "Prediction failed. Please try again.".to_string(),
            ToastKind::Error
        ))
    );
    assert!(!screen.disabled.contains(&FormId::Predict));
    assert_eq!(app.dashboard.form().value("Amount").as_deref(), Some("250"));
}

#[tokio::test]
async fn test_prediction_with_malformed_body_is_a_failure() {
    let (client, surface, app) = logged_in_app().await;
    client.mock_raw(PREDICT, 200, "not json", 0);

    app.submit_prediction().await;

    let screen = surface.snapshot();
    assert!(screen.result.is_none());
    assert_eq!(screen.toasts.last().map(|t| t.1), Some(ToastKind::Error));
}

// =========================================================
// 历史记录
// =========================================================

#[tokio::test]
async fn test_history_table_keeps_backend_order() {
    let (client, surface, app) = logged_in_app().await;
    client.mock_response(
        HISTORY,
        200,
        json!([
            {"timestamp": "2024-05-02T09:00:00Z", "prediction_result": "Potential Fraud", "is_fraud": true},
            {"timestamp": "garbage", "prediction_result": "Legitimate", "is_fraud": false}
        ]),
    );

    app.show_history().await;

    let screen = surface.snapshot();
    assert_eq!(screen.history_log.len(), 2);
    assert_eq!(screen.history_log[0], HistoryView::Loading);
    let Some(HistoryView::Table(rows)) = screen.history else {
        panic!("expected history table");
    };
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].result, "Potential Fraud");
    assert_eq!(rows[0].verdict.badge_label(), "Fraud");
    assert_ne!(rows[0].timestamp, "Invalid Date");
    assert_eq!(rows[1].verdict, Verdict::Legitimate);
    assert_eq!(rows[1].timestamp, "Invalid Date");
}

#[tokio::test]
async fn test_history_empty_and_failure_look_the_same() {
    let (client, surface, app) = logged_in_app().await;
    client.mock_response(HISTORY, 200, json!([]));
    client.mock_network_failure(HISTORY);

    app.show_history().await;
    let empty = surface.snapshot().history_log;

    app.show_dashboard().await;
    app.show_history().await;
    let screen = surface.snapshot();

    assert_eq!(empty, vec![HistoryView::Loading, HistoryView::Empty]);
    assert_eq!(
        screen.history_log,
        vec![
            HistoryView::Loading,
            HistoryView::Empty,
            HistoryView::Loading,
            HistoryView::Empty
        ]
    );
}

#[tokio::test]
async fn test_history_non_list_payload_is_empty() {
    let (client, surface, app) = logged_in_app().await;
    client.mock_response(HISTORY, 200, json!({"error": "oops"}));

    app.show_history().await;
    assert_eq!(surface.snapshot().history, Some(HistoryView::Empty));
}

#[tokio::test]
async fn test_history_refetched_on_every_visit() {
    let (client, _surface, app) = logged_in_app().await;
    client.mock_response(HISTORY, 200, json!([]));

    app.show_history().await;
    app.show_dashboard().await;
    app.show_history().await;

    assert_eq!(client.count(HISTORY), 2);
}

// =========================================================
// 交错的异步续延
// =========================================================

#[tokio::test]
async fn test_late_auth_check_is_discarded() {
    let (client, surface, app) = create_app("#login");
    app.dispatch().await;
    client.mock_delayed(CHECK, 200, json!({}), 5);

    futures::join!(app.goto("#dashboard"), app.goto("#register"));

    assert_eq!(app.current_view(), Some(AppRoute::Register));
    assert_eq!(
        surface.snapshot().page_log,
        vec![AppRoute::Login, AppRoute::Register]
    );
}

#[tokio::test]
async fn test_superseded_prediction_does_not_overwrite_result() {
    let (client, surface, app) = logged_in_app().await;
    client.mock_delayed(
        PREDICT,
        200,
        json!({"is_fraud": true, "prediction_label": "Potential Fraud"}),
        5,
    );
    client.mock_response(
        PREDICT,
        200,
        json!({"is_fraud": false, "prediction_label": "Legitimate"}),
    );

    futures::join!(app.submit_prediction(), app.submit_prediction());

    let screen = surface.snapshot();
    assert_eq!(client.count(PREDICT), 2);
    assert_eq!(screen.result.map(|c| c.message).as_deref(), Some("Legitimate"));
    assert!(!screen.disabled.contains(&FormId::Predict));
}

#[tokio::test]
async fn test_history_response_after_leaving_is_discarded() {
    let (client, surface, app) = logged_in_app().await;
    client.mock_delayed(
        HISTORY,
        200,
        json!([{"timestamp": "2024-05-02T09:00:00Z", "prediction_result": "Legitimate", "is_fraud": false}]),
        5,
    );

    futures::join!(app.show_history(), app.goto("#login"));

    let screen = surface.snapshot();
    assert_eq!(app.current_view(), Some(AppRoute::Login));
    assert_eq!(screen.history, Some(HistoryView::Loading));
}

#[tokio::test]
async fn test_login_during_pending_auth_check_wins() {
    let (client, surface, app) = create_app("");
    app.dispatch().await;
    client.mock_delayed(CHECK, 401, json!({}), 10);
    client.mock_response(LOGIN, 200, json!({"status": "success"}));

    futures::join!(
        app.goto("#dashboard"),
        app.submit_login(Credentials::new("ana", "secret"))
    );

    assert_eq!(app.session_state(), SessionState::Authenticated);
    assert_eq!(app.current_view(), Some(AppRoute::Dashboard));
    assert_eq!(app.fragment(), "#dashboard");
    assert_eq!(
        surface.snapshot().page_log,
        vec![AppRoute::Login, AppRoute::Dashboard]
    );
    assert_eq!(client.count(CHECK), 1);
}

#[tokio::test]
async fn test_login_after_navigating_away_still_revalidates() {
    let (client, _surface, app) = create_app("");
    app.dispatch().await;
    client.mock_delayed(LOGIN, 200, json!({"status": "success"}), 5);
    client.mock_response(CHECK, 401, json!({}));

    futures::join!(
        app.submit_login(Credentials::new("ana", "secret")),
        app.goto("#register")
    );
    assert_eq!(app.session_state(), SessionState::Authenticated);
    assert_eq!(app.current_view(), Some(AppRoute::Register));

    app.show_dashboard().await;
    assert_eq!(client.count(CHECK), 1);
    assert_eq!(app.current_view(), Some(AppRoute::Login));
}

#[tokio::test]
async fn test_register_redirect_skipped_after_navigation() {
    let client = Rc::new(MockHttpClient::new());
    let surface = Rc::new(MemorySurface::new());
    let config = ClientConfig::new(BASE).with_redirect_delay(Duration::from_millis(20));
    let app = App::new(client.clone(), config, surface.clone(), "#register");
    app.dispatch().await;
    client.mock_response(REGISTER, 201, json!({"message": "User registered successfully"}));
    client.mock_response(CHECK, 200, json!({}));

    futures::join!(
        app.submit_register(Credentials::new("bo", "pw")),
        app.goto("#dashboard")
    );

    assert_eq!(app.current_view(), Some(AppRoute::Dashboard));
    assert_eq!(app.fragment(), "#dashboard");
    assert_eq!(surface.snapshot().toasts.len(), 1);
}
