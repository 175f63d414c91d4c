//! Integration tests for the checkout flow

use std::{sync::Arc, time::Duration};

use rust_decimal::Decimal;
use testresult::TestResult;

use buyback::{
    app::BuybackApp,
    catalog::{CatalogStore, Condition},
    http::FakeBackend,
    locale::{LocaleResolver, Market},
    notifications::ToastKind,
    page::{PageAction, PageView, SubmissionForm},
    storage::PersistentStore,
    submission::SubmissionState,
};

fn is_confirmation_number(value: &str) -> bool {
    value
        .strip_prefix("BYB-")
        .is_some_and(|digits| digits.len() == 6 && digits.bytes().all(|b| b.is_ascii_digit()))
}

fn app(path: &str, backend: Arc<FakeBackend>) -> TestResult<BuybackApp> {
    Ok(BuybackApp::with_parts(
        LocaleResolver::default().resolve(path),
        PersistentStore::in_memory(),
        CatalogStore::bundled()?,
        backend,
    ))
}

async fn pick(app: &BuybackApp, product_id: &str, condition: Condition) -> TestResult {
    app.page()
        .dispatch(PageAction::PickCondition {
            product_id: product_id.to_string(),
            condition,
        })
        .await?;

    Ok(())
}

#[tokio::test(start_paused = true)]
async fn submitting_two_items_clears_list_and_confirms() -> TestResult {
    let backend = Arc::new(FakeBackend::new(Duration::from_millis(1500)));
    let app = app("/sa/en/buyback", Arc::clone(&backend))?;

    pick(&app, "10001", Condition::LikeNew).await?;
    pick(&app, "10002", Condition::VeryGood).await?;

    assert_eq!(app.buyback().item_count(), 2);
    assert_eq!(app.buyback().total_value(), Decimal::new(5300, 2));

    let form = SubmissionForm {
        email: "shopper@example.com".to_string(),
        store_id: Some("riyadh".to_string()),
        consent: true,
    };

    app.page().dispatch(PageAction::Submit(form)).await?;

    assert_eq!(app.buyback().item_count(), 0);
    assert_eq!(backend.submissions(), 1);

    let PageView::Confirmation {
        confirmation_number,
    } = app.page().view()
    else {
        return Err("expected the confirmation view".into());
    };

    assert!(
        is_confirmation_number(&confirmation_number),
        "unexpected confirmation number {confirmation_number}"
    );
    assert_eq!(
        app.workflow().state(),
        SubmissionState::Succeeded {
            confirmation_number
        }
    );

    Ok(())
}

#[tokio::test(start_paused = true)]
async fn unavailable_condition_leaves_list_unchanged() -> TestResult {
    let app = app("/sa/en/buyback", Arc::new(FakeBackend::default()))?;

    pick(&app, "10001", Condition::LikeNew).await?;

    let before = app.buyback().items();

    let result = app
        .page()
        .dispatch(PageAction::PickCondition {
            product_id: "10004".to_string(),
            condition: Condition::WellUsed,
        })
        .await;

    assert!(result.is_err(), "INGOLF is only offered as new");
    assert_eq!(app.buyback().items(), before);

    Ok(())
}

#[tokio::test(start_paused = true)]
async fn second_toast_replaces_first() -> TestResult {
    let app = app("/sa/en/buyback", Arc::new(FakeBackend::default()))?;

    pick(&app, "10001", Condition::LikeNew).await?;

    let result = app
        .page()
        .dispatch(PageAction::PickCondition {
            product_id: "10004".to_string(),
            condition: Condition::WellUsed,
        })
        .await;

    assert!(result.is_err(), "INGOLF is only offered as new");

    let toast = app.notifications().toast().ok_or("a toast should be visible")?;

    assert_eq!(toast.toast.kind, ToastKind::Error);
    assert_eq!(
        toast.toast.message,
        app.translation().validation.condition_unavailable
    );

    Ok(())
}

#[tokio::test(start_paused = true)]
async fn toast_expires_after_default_duration() -> TestResult {
    let app = app("/sa/en/buyback", Arc::new(FakeBackend::default()))?;

    pick(&app, "10001", Condition::LikeNew).await?;

    assert!(app.notifications().toast().is_some());

    tokio::time::sleep(Duration::from_secs(6)).await;

    assert!(app.notifications().toast().is_none());

    Ok(())
}

#[tokio::test(start_paused = true)]
async fn failed_submission_keeps_list_and_toasts() -> TestResult {
    let backend = Arc::new(FakeBackend::new(Duration::from_millis(100)));
    let app = app("/bh/ar/buyback", Arc::clone(&backend))?;

    pick(&app, "10001", Condition::LikeNew).await?;

    backend.fail_with(503, None);

    let form = SubmissionForm {
        email: "shopper@example.com".to_string(),
        store_id: Some("salmabad".to_string()),
        consent: true,
    };

    let result = app.page().submit(&form).await;

    assert!(result.is_err(), "503 should be propagated");
    assert_eq!(app.buyback().item_count(), 1);
    assert_eq!(app.page().view(), PageView::Browse);
    assert_eq!(app.workflow().state(), SubmissionState::Failed);
    assert_eq!(
        app.notifications().toast().map(|active| active.toast.message),
        Some(app.translation().errors.unavailable.to_string())
    );

    backend.recover();

    let response = app.page().submit(&form).await?;

    assert!(is_confirmation_number(&response.confirmation_number));
    assert!(app.buyback().is_empty());

    Ok(())
}

#[tokio::test(start_paused = true)]
async fn bahrain_store_is_rejected_in_saudi_market() -> TestResult {
    let backend = Arc::new(FakeBackend::default());
    let app = app("/sa/en/buyback", Arc::clone(&backend))?;

    pick(&app, "10001", Condition::LikeNew).await?;

    let form = SubmissionForm {
        email: "shopper@example.com".to_string(),
        store_id: Some("salmabad".to_string()),
        consent: true,
    };

    let result = app.page().submit(&form).await;

    assert!(result.is_err(), "store outside the market must be rejected");
    assert_eq!(backend.submissions(), 0);
    assert_eq!(app.buyback().item_count(), 1);

    Ok(())
}

#[test]
fn locale_drives_currency_and_direction() -> TestResult {
    let app = app("/bh/ar/buyback", Arc::new(FakeBackend::default()))?;

    assert_eq!(app.locale().market(), Market::Bh);
    assert_eq!(app.locale().html_attributes(), ("ar", "rtl"));
    assert_eq!(
        app.locale().format_currency(Decimal::new(2800, 2)),
        "28.000 د.ب"
    );

    Ok(())
}
