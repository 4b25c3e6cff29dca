use super::*;
use std::sync::atomic::{AtomicUsize, Ordering};

async fn run(errors: Vec<ApiError>) -> (Result<u32, ApiError>, usize) {
    let calls = AtomicUsize::new(0);
    let errors = std::sync::Mutex::new(errors.into_iter());
    let result = fetch(|| {
        calls.fetch_add(1, Ordering::SeqCst);
        let next = errors.lock().unwrap().next();
        async move {
            match next {
                Some(error) => Err(error),
                None => Ok(7),
            }
        }
    })
    .await;
    (result, calls.load(Ordering::SeqCst))
}

#[tokio::test]
async fn success_runs_once() {
    let (result, calls) = run(vec![]).await;
    assert_eq!(result.unwrap(), 7);
    assert_eq!(calls, 1);
}

#[tokio::test]
async fn transient_failure_is_retried_once() {
    let (result, calls) = run(vec![ApiError::Timeout]).await;
    assert_eq!(result.unwrap(), 7);
    assert_eq!(calls, 2);
}

#[tokio::test]
async fn second_transient_failure_is_returned() {
    let server = ApiError::Server { status: 503, message: None };
    let (result, calls) = run(vec![server, ApiError::Timeout]).await;
    assert!(matches!(result, Err(ApiError::Timeout)));
    assert_eq!(calls, 2);
}

#[tokio::test]
async fn client_errors_are_not_retried() {
    let rejected = ApiError::Rejected { status: 404, message: Some("Website not found".into()) };
    let (result, calls) = run(vec![rejected]).await;
    assert_eq!(result.unwrap_err().status(), Some(404));
    assert_eq!(calls, 1);

    let (result, calls) = run(vec![ApiError::Unauthorized { message: None }]).await;
    assert!(result.is_err());
    assert_eq!(calls, 1);
}
